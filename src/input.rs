// ==============================================================================
// input.rs - Input Stream Opening
// ==============================================================================
// Description: Gzip detection by magic bytes and line-oriented input streams
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// Detection ignores the file extension: "sites.txt" may be gzipped and
// "calls.vcf.gz" may be plain text.
// ==============================================================================

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{IngestError, Result};

/// First two bytes of every gzip member
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check whether `path` starts with the gzip magic bytes
///
/// Files shorter than two bytes are treated as plain text.
pub fn is_gzip_compressed(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|source| IngestError::InvalidInputFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut magic = Vec::with_capacity(2);
    file.take(2)
        .read_to_end(&mut magic)
        .map_err(|source| IngestError::InvalidInputFile {
            path: path.to_path_buf(),
            source,
        })?;

    let compressed = magic == GZIP_MAGIC;
    debug!("Checked {} for gzip magic: compressed={}", path.display(), compressed);
    Ok(compressed)
}

/// Line stream over a plain or gzip-compressed file
///
/// Dropping the stream closes the underlying file handle.
pub struct InputLines {
    path: PathBuf,
    compressed: bool,
    reader: Box<dyn BufRead>,
    line_number: usize,
}

impl InputLines {
    /// Open `path`, decompressing transparently if it is gzipped
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let compressed = is_gzip_compressed(path)?;

        let file = File::open(path).map_err(|source| IngestError::InvalidInputFile {
            path: path.to_path_buf(),
            source,
        })?;

        let reader: Box<dyn BufRead> = if compressed {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self {
            path: path.to_path_buf(),
            compressed,
            reader,
            line_number: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line without its terminator
    ///
    /// Returns `Ok(None)` at end of input. Both `\n` and `\r\n` endings are
    /// stripped. Lines are read as bytes; invalid UTF-8 is replaced with
    /// U+FFFD instead of failing the load.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut bytes)
            .map_err(|source| IngestError::ReadFailure {
                path: self.path.clone(),
                source,
            })?;

        if read == 0 {
            return Ok(None);
        }

        self.line_number += 1;
        if bytes.ends_with(b"\n") {
            bytes.pop();
            if bytes.ends_with(b"\r") {
                bytes.pop();
            }
        }

        let line = String::from_utf8(bytes).unwrap_or_else(|err| {
            debug!(
                "Line {} of {} is not valid UTF-8, decoding lossily",
                self.line_number,
                self.path.display()
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        });
        Ok(Some(line))
    }

    /// Read the next data line, treating an empty line as end of data
    pub fn next_data_line(&mut self) -> Result<Option<String>> {
        Ok(self.next_line()?.filter(|line| !line.is_empty()))
    }
}
