// ==============================================================================
// parsers/tokenizer.rs - Delimited Line Tokenizer
// ==============================================================================
// Description: Splits a line on the nearest of a fixed set of delimiters
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// Semantics:
//   "a,b"   -> ["a", "b"]
//   "a,,b"  -> ["a", "", "b"]
//   "a,b,"  -> ["a", "b", ""]
//   ""      -> []
// ==============================================================================

/// Delimiters for plain tabular rows (`CHROM POS v1 v2 ...`)
pub const TABULAR: &[char] = &[' ', ',', '\t', '\n'];

/// Delimiters between VCF columns
pub const VCF_COLUMNS: &[char] = &['\t', '\n'];

/// Delimiters between INFO sub-fields
pub const INFO: &[char] = &[';', '\t'];

/// Delimiters between FORMAT tags and sample sub-fields
pub const SAMPLE: &[char] = &[':', '\n'];

/// Split `line` into fields, left to right
///
/// Each field ends at the nearest occurrence of any delimiter in
/// `delimiters`; scanning resumes just past that delimiter. The last field
/// is whatever follows the final delimiter, so a trailing delimiter yields
/// a trailing empty field. An empty line yields no fields.
///
/// # Example
/// ```
/// use variant_ingest::parsers::tokenizer::{tokenize, TABULAR};
///
/// assert_eq!(tokenize("chr1 100,0.5\t7", TABULAR), vec!["chr1", "100", "0.5", "7"]);
/// ```
pub fn tokenize<'a>(line: &'a str, delimiters: &[char]) -> Vec<&'a str> {
    let mut fields = Vec::new();
    if line.is_empty() {
        return fields;
    }

    let mut start = 0;
    loop {
        match line[start..].find(delimiters) {
            Some(offset) => {
                let end = start + offset;
                fields.push(&line[start..end]);
                // All delimiters are single-byte ASCII
                start = end + 1;
            }
            None => {
                fields.push(&line[start..]);
                break;
            }
        }
    }

    fields
}

/// Lazily yield at most `limit` fields
///
/// Used by the VCF record parser, which never looks past the active sample
/// column.
pub fn fields_up_to<'a>(
    line: &'a str,
    delimiters: &'a [char],
    limit: usize,
) -> impl Iterator<Item = &'a str> + 'a {
    let mut rest = if line.is_empty() { None } else { Some(line) };
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(delimiters) {
            Some(end) => {
                rest = Some(&current[end + 1..]);
                Some(&current[..end])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
    .take(limit)
}
