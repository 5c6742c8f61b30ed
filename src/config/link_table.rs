//! Link mapping file parsing.
//!
//! The mapping file lists one link per line as `<source>-><target>`, where
//! `source` is relative to the dotfiles root and `target` is relative to the
//! home directory. There is no header, comment syntax, or escaping.
use std::path::Path;

use crate::error::{MalformedReason, MappingError};

/// Literal delimiter between source and target.
pub const DELIMITER: &str = "->";

/// One link to create: `home/target` will point at `dotfiles/source`.
///
/// # Examples
///
/// ```
/// use mac_bootstrap::config::link_table::LinkSpec;
///
/// let spec = LinkSpec::parse_line(" configs/.zshrc -> .zshrc ").unwrap();
/// assert_eq!(spec.source, "configs/.zshrc");
/// assert_eq!(spec.target, ".zshrc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// Path relative to the dotfiles root.
    pub source: String,
    /// Path relative to the home directory.
    pub target: String,
}

impl LinkSpec {
    /// Parse a single non-blank mapping line.
    ///
    /// The line is split at the **first** `->`; both halves are trimmed and
    /// trailing `/` is dropped from the target so it names the link itself.
    ///
    /// # Errors
    ///
    /// Returns the [`MalformedReason`] when the delimiter is missing or either
    /// half is empty after trimming.
    pub fn parse_line(line: &str) -> Result<Self, MalformedReason> {
        let (source, target) = line
            .split_once(DELIMITER)
            .ok_or(MalformedReason::MissingDelimiter)?;
        let source = source.trim();
        let target = target.trim().trim_end_matches('/');
        if source.is_empty() {
            return Err(MalformedReason::EmptySource);
        }
        if target.is_empty() {
            return Err(MalformedReason::EmptyTarget);
        }
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

/// Ordered link entries in mapping-file order.
///
/// Entries are not deduplicated; when two entries share a target the later
/// one wins because the installer processes them in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    /// Parsed entries, in file order.
    pub entries: Vec<LinkSpec>,
}

impl LinkTable {
    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, LinkSpec> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a LinkTable {
    type Item = &'a LinkSpec;
    type IntoIter = std::slice::Iter<'a, LinkSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A parsed mapping file: the usable entries plus one diagnostic per rejected line.
#[derive(Debug, Default)]
pub struct ParsedLinkTable {
    /// Well-formed entries.
    pub table: LinkTable,
    /// [`MappingError::MalformedLine`] for every rejected line, in file order.
    pub malformed: Vec<MappingError>,
}

/// Parse mapping-file content.
///
/// Blank and whitespace-only lines are skipped. Malformed lines are reported
/// in [`ParsedLinkTable::malformed`] and never become entries.
///
/// # Examples
///
/// ```
/// use mac_bootstrap::config::link_table::parse_str;
///
/// let parsed = parse_str("a->b\n\nbroken\nc -> d/e");
/// assert_eq!(parsed.table.len(), 2);
/// assert_eq!(parsed.malformed.len(), 1);
/// ```
#[must_use]
pub fn parse_str(content: &str) -> ParsedLinkTable {
    let mut parsed = ParsedLinkTable::default();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match LinkSpec::parse_line(line) {
            Ok(spec) => parsed.table.entries.push(spec),
            Err(reason) => parsed.malformed.push(MappingError::MalformedLine {
                line: index + 1,
                content: line.to_string(),
                reason,
            }),
        }
    }

    parsed
}

/// Read and parse the mapping file at `path`.
///
/// # Errors
///
/// Returns [`MappingError::MissingFile`] if the file does not exist and
/// [`MappingError::Io`] if it cannot be read.
pub fn load(path: &Path) -> Result<ParsedLinkTable, MappingError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            MappingError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            MappingError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(parse_str(&content))
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn spec(source: &str, target: &str) -> LinkSpec {
        LinkSpec {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn parses_simple_line() {
        assert_eq!(LinkSpec::parse_line("a/b->c/d"), Ok(spec("a/b", "c/d")));
    }

    #[test]
    fn trims_whitespace_on_both_sides() {
        assert_eq!(
            LinkSpec::parse_line("  a/b \t->  c/d  "),
            Ok(spec("a/b", "c/d"))
        );
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        assert_eq!(LinkSpec::parse_line("a->b->c"), Ok(spec("a", "b->c")));
    }

    #[test]
    fn line_without_delimiter_is_malformed() {
        assert_eq!(
            LinkSpec::parse_line("configs/.zshrc"),
            Err(MalformedReason::MissingDelimiter)
        );
    }

    #[test]
    fn single_arrow_character_is_not_a_delimiter() {
        assert_eq!(
            LinkSpec::parse_line("a-b>c"),
            Err(MalformedReason::MissingDelimiter)
        );
    }

    #[test]
    fn empty_source_is_malformed() {
        assert_eq!(
            LinkSpec::parse_line("  -> .zshrc"),
            Err(MalformedReason::EmptySource)
        );
    }

    #[test]
    fn empty_target_is_malformed() {
        assert_eq!(
            LinkSpec::parse_line("configs/.zshrc ->  "),
            Err(MalformedReason::EmptyTarget)
        );
    }

    #[test]
    fn trailing_slash_on_target_is_dropped() {
        assert_eq!(
            LinkSpec::parse_line("configs/nvim->.config/nvim/"),
            Ok(spec("configs/nvim", ".config/nvim"))
        );
        assert_eq!(
            LinkSpec::parse_line("configs/nvim -> .config/nvim// "),
            Ok(spec("configs/nvim", ".config/nvim"))
        );
    }

    #[test]
    fn separator_only_target_is_malformed() {
        assert_eq!(
            LinkSpec::parse_line("configs/nvim->/"),
            Err(MalformedReason::EmptyTarget)
        );
    }

    #[test]
    fn parse_preserves_file_order() {
        let parsed = parse_str("z->1\na->2\nm->3\n");
        let sources: Vec<&str> = parsed.table.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(sources, ["z", "a", "m"]);
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn trailing_line_without_newline_is_parsed() {
        let parsed = parse_str("a->b\nc->d");
        assert_eq!(parsed.table.entries, vec![spec("a", "b"), spec("c", "d")]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let parsed = parse_str("\n\na->b\n   \n\t\nc->d\n\n");
        assert_eq!(parsed.table.len(), 2);
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let parsed = parse_str("a->b\r\nc->d\r\n");
        assert_eq!(parsed.table.entries, vec![spec("a", "b"), spec("c", "d")]);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let parsed = parse_str("one->.rc\ntwo->.rc\n");
        assert_eq!(
            parsed.table.entries,
            vec![spec("one", ".rc"), spec("two", ".rc")]
        );
    }

    #[test]
    fn malformed_lines_are_reported_with_line_numbers() {
        let parsed = parse_str("a->b\n\nno delimiter here\n->x\nc->d\n");
        assert_eq!(parsed.table.len(), 2);
        assert_eq!(parsed.malformed.len(), 2);

        let lines: Vec<usize> = parsed
            .malformed
            .iter()
            .map(|e| match e {
                MappingError::MalformedLine { line, .. } => *line,
                other => panic!("unexpected error: {other}"),
            })
            .collect();
        assert_eq!(lines, [3, 4]);
    }

    #[test]
    fn empty_content_gives_empty_table() {
        let parsed = parse_str("");
        assert!(parsed.table.is_empty());
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn load_missing_file_is_missing_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("links.txt")).unwrap_err();
        assert!(matches!(err, MappingError::MissingFile { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(&path, "configs/.zshrc->.zshrc\nconfigs/.vimrc->.vim/.vimrc").unwrap();
        let parsed = load(&path).unwrap();
        assert_eq!(
            parsed.table.entries,
            vec![
                spec("configs/.zshrc", ".zshrc"),
                spec("configs/.vimrc", ".vim/.vimrc")
            ]
        );
    }
}
