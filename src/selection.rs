//! Reading and rewriting the toolkit's `selectbc.data` selection file.
//!
//! The file is rewritten in place: only the encoded columns change, every
//! other byte (trailing commentary on the rewritten lines, all other lines)
//! survives verbatim, because the Fortran reader consumes the whole file.
//! The rewrite is not atomic; a crash mid-write leaves a corrupted file.
//! That matches the toolkit's own expectations (same path, same inode) and is
//! accepted here rather than papered over.

use crate::codec::{
    decode_field, encode_count, encode_flag, encode_pair, splice_prefix, COUNT_WIDTH, FLAG_WIDTH,
    PAIR_WIDTH, SYSTEM_WIDTH,
};
use crate::config::BoloConfig;
use crate::errors::{BoloError, BoloResult};
use crate::registry::{FilterSet, Registry};
use std::path::Path;

/// Interpolation flag written on line 0. The bridge treats it as an opaque
/// constant; the toolkit interprets it.
pub const DEFAULT_IALF: i32 = 1;

/// In-memory copy of the selection file.
#[derive(Debug, Clone)]
pub struct SelectionFile {
    lines: Vec<String>,

    ends_with_newline: bool,
}

impl SelectionFile {
    pub fn read(path: &Path) -> BoloResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BoloError::io(path, e))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            ends_with_newline: content.ends_with('\n'),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rewrite the encoded columns for `set`: line 0 carries `ialf`, line 1
    /// the filter count, lines `2..2+count` one (system, filter) pair each.
    ///
    /// Fails with [`BoloError::Decode`] when the file carries fewer lines
    /// than the set needs. The toolkit ships the file fully populated, so a
    /// short file means a corrupted installation; inventing trailing lines
    /// would hide that.
    pub fn apply(&mut self, set: &FilterSet, ialf: i32) -> BoloResult<()> {
        let needed = 2 + set.len();
        if self.lines.len() < needed {
            return Err(BoloError::decode(
                0,
                format!(
                    "selection file has {} lines, filter set '{}' needs {}",
                    self.lines.len(),
                    set.name,
                    needed
                ),
            ));
        }

        self.lines[0] = splice_prefix(&self.lines[0], &encode_flag(ialf));
        self.lines[1] = splice_prefix(&self.lines[1], &encode_count(set.len()));
        for (i, &filter) in set.filters.iter().enumerate() {
            self.lines[2 + i] =
                splice_prefix(&self.lines[2 + i], &encode_pair(set.system, filter));
        }
        Ok(())
    }

    /// Decode the current selection: `(ialf, (system, filter) pairs)`.
    ///
    /// Understands both the multi-filter format written by [`apply`] and the
    /// legacy single-set format, whose line 1 is already a pair line instead
    /// of a bare count header.
    ///
    /// [`apply`]: SelectionFile::apply
    pub fn selected(&self) -> BoloResult<(i32, Vec<(i32, i32)>)> {
        if self.lines.is_empty() {
            return Err(BoloError::decode(0, "selection file is empty"));
        }
        let ialf = decode_field(&self.lines[0], 0, FLAG_WIDTH, 1)?;

        if self.lines.len() < 2 {
            return Err(BoloError::decode(0, "selection file has no filter lines"));
        }

        // Multi-filter format: line 1 holds the count, the pair lines follow.
        // Legacy format: line 1 is itself a pair line. Prefer multi-filter;
        // fall back to legacy when line 1 does not decode as a count backed
        // by enough pair lines.
        if let Ok(count) = self.decode_count() {
            if let Ok(pairs) = self.decode_pairs_from(2, count) {
                return Ok((ialf, pairs));
            }
        }

        let system = decode_field(&self.lines[1], 0, SYSTEM_WIDTH, 2)?;
        let filter = decode_field(&self.lines[1], SYSTEM_WIDTH + 1, PAIR_WIDTH, 2)?;
        Ok((ialf, vec![(system, filter)]))
    }

    fn decode_count(&self) -> BoloResult<usize> {
        let count = decode_field(&self.lines[1], 0, COUNT_WIDTH, 2)?;
        if count < 0 {
            return Err(BoloError::decode(2, format!("negative filter count {}", count)));
        }
        Ok(count as usize)
    }

    fn decode_pairs_from(&self, first_line: usize, count: usize) -> BoloResult<Vec<(i32, i32)>> {
        if self.lines.len() < first_line + count {
            return Err(BoloError::decode(
                0,
                format!(
                    "selection file has {} lines, {} pair lines expected",
                    self.lines.len(),
                    count
                ),
            ));
        }
        let mut pairs = Vec::with_capacity(count);
        for i in 0..count {
            let line_no = first_line + i + 1;
            let line = &self.lines[first_line + i];
            let system = decode_field(line, 0, SYSTEM_WIDTH, line_no)?;
            let filter = decode_field(line, SYSTEM_WIDTH + 1, PAIR_WIDTH, line_no)?;
            pairs.push((system, filter));
        }
        Ok(pairs)
    }

    /// Write every line back, replacing the file's full contents.
    pub fn write(&self, path: &Path) -> BoloResult<()> {
        let mut content = self.lines.join("\n");
        if self.ends_with_newline {
            content.push('\n');
        }
        std::fs::write(path, content).map_err(|e| BoloError::io(path, e))
    }
}

/// Select `set_name` as the active filter set: resolve it, rewrite the
/// selection file under `config` in place, and report what changed.
pub fn select_filter_set(
    config: &BoloConfig,
    registry: &Registry,
    set_name: &str,
) -> BoloResult<()> {
    let set = registry.filter_set(set_name)?;
    let path = config.selection_file();
    let mut file = SelectionFile::read(&path)?;
    file.apply(set, DEFAULT_IALF)?;
    file.write(&path)?;
    log::debug!(
        "selected filter set '{}' ({} filters, system {}) in {}",
        set.name,
        set.len(),
        set.system,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    const FIXTURE: &str = "\
888   ialf = 1: interpolate over [Fe/H]
888   nfil: number of filters to compute
9999 99   (system, filter)
9999 99   (system, filter)
9999 99   (system, filter)
9999 99   (system, filter)
  99      trailing commentary line
";

    fn jhk() -> FilterSet {
        let registry = Registry::standard().unwrap();
        registry.filter_set("jhk").unwrap().clone()
    }

    #[test]
    fn test_apply_rewrites_header_lines() {
        let mut file = SelectionFile::parse(FIXTURE);
        file.apply(&jhk(), DEFAULT_IALF).unwrap();
        assert_eq!(file.lines()[0], "  1   ialf = 1: interpolate over [Fe/H]");
        assert_eq!(file.lines()[1], "  3   nfil: number of filters to compute");
    }

    #[test]
    fn test_apply_rewrites_exactly_count_pair_lines() {
        let mut file = SelectionFile::parse(FIXTURE);
        file.apply(&jhk(), DEFAULT_IALF).unwrap();
        assert_eq!(file.lines()[2], "   2  6   (system, filter)");
        assert_eq!(file.lines()[3], "   2  7   (system, filter)");
        assert_eq!(file.lines()[4], "   2  8   (system, filter)");
        // Beyond the count everything is byte-identical.
        assert_eq!(file.lines()[5], "9999 99   (system, filter)");
        assert_eq!(file.lines()[6], "  99      trailing commentary line");
    }

    #[test]
    fn test_apply_preserves_columns_past_the_pair_field() {
        let mut file = SelectionFile::parse(FIXTURE);
        file.apply(&jhk(), DEFAULT_IALF).unwrap();
        let original = FIXTURE.lines().nth(2).unwrap();
        assert_eq!(&file.lines()[2][PAIR_WIDTH..], &original[PAIR_WIDTH..]);
    }

    #[test]
    fn test_apply_short_file_fails() {
        let mut file = SelectionFile::parse("  1\n  3\n   2  6\n");
        let err = file.apply(&jhk(), DEFAULT_IALF).unwrap_err();
        assert!(err.to_string().contains("needs 5"));
    }

    #[test]
    fn test_selected_round_trip() {
        let mut file = SelectionFile::parse(FIXTURE);
        file.apply(&jhk(), DEFAULT_IALF).unwrap();
        let (ialf, pairs) = file.selected().unwrap();
        assert_eq!(ialf, 1);
        assert_eq!(pairs, vec![(2, 6), (2, 7), (2, 8)]);
    }

    #[test]
    fn test_selected_legacy_single_set() {
        // Legacy files carry no count header: line 1 is the pair itself.
        let file = SelectionFile::parse("  1   ialf\n   2  8   single selected filter\n");
        let (ialf, pairs) = file.selected().unwrap();
        assert_eq!(ialf, 1);
        assert_eq!(pairs, vec![(2, 8)]);
    }

    #[test]
    fn test_selected_empty_file_fails() {
        let file = SelectionFile::parse("");
        assert!(file.selected().is_err());
    }

    #[test]
    fn test_write_preserves_untouched_bytes() {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "bolo_selection_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&path, FIXTURE).unwrap();

        let mut file = SelectionFile::read(&path).unwrap();
        file.apply(&jhk(), DEFAULT_IALF).unwrap();
        file.write(&path).unwrap();

        let rewritten = std::fs::read_to_string(&path).unwrap();
        let rewritten_lines: Vec<&str> = rewritten.lines().collect();
        let original_lines: Vec<&str> = FIXTURE.lines().collect();
        assert_eq!(rewritten_lines.len(), original_lines.len());
        for i in 5..original_lines.len() {
            assert_eq!(rewritten_lines[i], original_lines[i]);
        }
        assert!(rewritten.ends_with('\n'));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = SelectionFile::read(Path::new("/nonexistent/selectbc.data")).unwrap_err();
        assert!(matches!(err, BoloError::Io { .. }));
    }
}
