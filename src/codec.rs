//! Fixed-width field codec for the toolkit's selection file.
//!
//! The selection file is column-addressed, not delimiter-separated: the
//! interpolation flag and the filter count each occupy the first three
//! columns of their lines, and each selected filter occupies columns 0-6 of
//! its line as a 4-column system code, a space, and a 2-column filter code.
//! Everything beyond the encoded columns must survive a rewrite
//! byte-for-byte, because the Fortran reader also consumes the trailing
//! commentary on those lines.
//!
//! Encode and decode are independent functions over named field widths so the
//! format lives in one place instead of being inferred from slice arithmetic
//! at the call sites.

use crate::errors::{BoloError, BoloResult};

/// Columns holding the interpolation flag on line 0.
pub const FLAG_WIDTH: usize = 3;

/// Columns holding the filter count on line 1.
pub const COUNT_WIDTH: usize = 3;

/// Columns holding the system code on a filter line.
pub const SYSTEM_WIDTH: usize = 4;

/// Columns holding the filter code on a filter line.
pub const FILTER_WIDTH: usize = 2;

/// Total columns rewritten on a filter line: system, separator, filter.
pub const PAIR_WIDTH: usize = SYSTEM_WIDTH + 1 + FILTER_WIDTH;

/// Right-justified interpolation flag, exactly [`FLAG_WIDTH`] columns.
pub fn encode_flag(flag: i32) -> String {
    format!("{:>width$}", flag, width = FLAG_WIDTH)
}

/// Right-justified filter count, exactly [`COUNT_WIDTH`] columns.
pub fn encode_count(count: usize) -> String {
    format!("{:>width$}", count, width = COUNT_WIDTH)
}

/// One selected filter, exactly [`PAIR_WIDTH`] columns:
/// `"<system, width 4> <filter, width 2>"`.
pub fn encode_pair(system: i32, filter: i32) -> String {
    format!(
        "{:>sw$} {:>fw$}",
        system,
        filter,
        sw = SYSTEM_WIDTH,
        fw = FILTER_WIDTH
    )
}

/// Overwrite the leading columns of `line` with `prefix`, preserving the
/// remainder byte-for-byte. Lines shorter than the prefix are replaced
/// entirely (there is nothing beyond the field to preserve).
pub fn splice_prefix(line: &str, prefix: &str) -> String {
    let rest = line.get(prefix.len()..).unwrap_or("");
    let mut out = String::with_capacity(prefix.len() + rest.len());
    out.push_str(prefix);
    out.push_str(rest);
    out
}

/// Decode the integer occupying `line[start..end]` (columns, end clamped to
/// the line length). `line_no` is 1-based and only used for error context.
pub fn decode_field(line: &str, start: usize, end: usize, line_no: usize) -> BoloResult<i32> {
    if start >= line.len() {
        return Err(BoloError::decode(
            line_no,
            format!("field start {} beyond line length {}", start, line.len()),
        ));
    }
    let end = end.min(line.len());
    let raw = line.get(start..end).ok_or_else(|| {
        BoloError::decode(line_no, format!("field {}..{} splits a character", start, end))
    })?;
    raw.trim().parse::<i32>().map_err(|_| {
        BoloError::decode(line_no, format!("expected integer in columns {}..{}, got '{}'", start, end, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_flag_fixture() {
        assert_eq!(encode_flag(1), "  1");
        assert_eq!(encode_flag(12), " 12");
    }

    #[test]
    fn test_encode_count_fixture() {
        assert_eq!(encode_count(3), "  3");
        assert_eq!(encode_count(5), "  5");
    }

    #[test]
    fn test_encode_pair_fixtures() {
        assert_eq!(encode_pair(1, 3), "   1  3");
        assert_eq!(encode_pair(10, 34), "  10 34");
        assert_eq!(encode_pair(27, 8), "  27  8");
        assert_eq!(encode_pair(1, 3).len(), PAIR_WIDTH);
    }

    #[test]
    fn test_splice_preserves_remainder() {
        let line = "888   ialf = 1: interpolate over [Fe/H]";
        let out = splice_prefix(line, &encode_flag(1));
        assert_eq!(out, "  1   ialf = 1: interpolate over [Fe/H]");
    }

    #[test]
    fn test_splice_pair_preserves_from_column_seven() {
        let line = "   2  9   (system, filter)";
        let out = splice_prefix(line, &encode_pair(10, 34));
        assert_eq!(out, "  10 34   (system, filter)");
        assert_eq!(&out[PAIR_WIDTH..], &line[PAIR_WIDTH..]);
    }

    #[test]
    fn test_splice_short_line() {
        assert_eq!(splice_prefix("ab", "  1"), "  1");
        assert_eq!(splice_prefix("", "  3"), "  3");
    }

    #[test]
    fn test_decode_field_round_trip() {
        let line = splice_prefix("          some trailing text", &encode_pair(10, 34));
        assert_eq!(decode_field(&line, 0, SYSTEM_WIDTH, 3).unwrap(), 10);
        assert_eq!(
            decode_field(&line, SYSTEM_WIDTH + 1, PAIR_WIDTH, 3).unwrap(),
            34
        );
    }

    #[test]
    fn test_decode_field_clamps_end() {
        assert_eq!(decode_field(" 42", 0, 10, 1).unwrap(), 42);
    }

    #[test]
    fn test_decode_field_start_beyond_line() {
        let err = decode_field("1", 4, 7, 2).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_decode_field_non_numeric() {
        let err = decode_field("  x", 0, 3, 1).unwrap_err();
        assert!(err.to_string().contains("expected integer"));
    }
}
