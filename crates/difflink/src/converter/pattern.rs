use regex::{Captures, Regex, RegexBuilder};

use crate::domain::file::FileSet;

/// Characters that must be escaped for a path to match literally.
const PATTERN_METACHARACTERS: [char; 14] = [
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];
/// A line number or an inclusive `start-end` range, ASCII digits only.
const LINE_REF_PATTERN: &str = "[0-9]+(?:-[0-9]+)?";
/// Word boundary over ASCII word characters only, so a path next to
/// non-ASCII letters still matches.
const WORD_BOUNDARY: &str = r"(?-u:\b)";
const REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Escapes pattern metacharacters in `path` so it matches literally.
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for character in path.chars() {
        if PATTERN_METACHARACTERS.contains(&character) {
            escaped.push('\\');
        }
        escaped.push(character);
    }

    escaped
}

/// A known path found in prose, with its optional line suffix.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Mention<'h> {
    /// The exact matched text, including backticks for inline code.
    pub(crate) text: &'h str,
    pub(crate) path: &'h str,
    /// Raw `N` or `A-B` suffix as written after the `:`.
    pub(crate) line_ref: Option<&'h str>,
    pub(crate) is_inline_code: bool,
}

/// Single alternation matching every known path in three forms.
///
/// At each position the inline-code form wins over the bare form with a
/// line suffix, which wins over the bare path. Within a form, longer paths
/// are tried first so a path is never linked as the prefix of a longer
/// known path.
pub(crate) struct MentionPattern {
    regex: Regex,
}

impl MentionPattern {
    /// Builds the pattern for every path in `files`.
    ///
    /// Returns `Ok(None)` when `files` is empty since nothing can match.
    ///
    /// # Errors
    /// Returns an error when the compiled alternation exceeds the regex size
    /// limit.
    pub(crate) fn new(files: &FileSet) -> Result<Option<Self>, regex::Error> {
        if files.is_empty() {
            return Ok(None);
        }

        let mut paths = files.paths().collect::<Vec<_>>();
        paths.sort_by_key(|path| std::cmp::Reverse(path.len()));
        let alternation = paths
            .into_iter()
            .map(escape_path)
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(
            "`(?P<code_path>{alternation})(?::(?P<code_line>{LINE_REF_PATTERN}))?`\
             |{WORD_BOUNDARY}(?P<line_path>{alternation}):(?P<line>{LINE_REF_PATTERN}){WORD_BOUNDARY}\
             |{WORD_BOUNDARY}(?P<bare_path>{alternation}){WORD_BOUNDARY}"
        );
        let regex = RegexBuilder::new(&pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()?;

        Ok(Some(Self { regex }))
    }

    /// Finds non-overlapping mentions in `haystack`, left to right, along
    /// with the byte offset where each one starts.
    pub(crate) fn find_iter<'h>(
        &self,
        haystack: &'h str,
    ) -> impl Iterator<Item = (usize, Mention<'h>)> {
        self.regex.captures_iter(haystack).filter_map(|captures| {
            let start = captures.get(0)?.start();

            Some((start, mention_from_captures(&captures)?))
        })
    }
}

fn mention_from_captures<'h>(captures: &Captures<'h>) -> Option<Mention<'h>> {
    let text = captures.get(0)?.as_str();

    if let Some(path) = captures.name("code_path") {
        return Some(Mention {
            text,
            path: path.as_str(),
            line_ref: captures.name("code_line").map(|line| line.as_str()),
            is_inline_code: true,
        });
    }

    if let Some(path) = captures.name("line_path") {
        return Some(Mention {
            text,
            path: path.as_str(),
            line_ref: captures.name("line").map(|line| line.as_str()),
            is_inline_code: false,
        });
    }

    let path = captures.name("bare_path")?;

    Some(Mention {
        text,
        path: path.as_str(),
        line_ref: None,
        is_inline_code: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::file::FileEntry;

    fn file_set(paths: &[&str]) -> FileSet {
        paths
            .iter()
            .map(|path| FileEntry::new(*path, format!("https://example.com/{path}")))
            .collect()
    }

    fn mentions<'h>(pattern: &MentionPattern, haystack: &'h str) -> Vec<Mention<'h>> {
        pattern
            .find_iter(haystack)
            .map(|(_, mention)| mention)
            .collect()
    }

    #[test]
    fn test_escape_path_escapes_metacharacters() {
        // Arrange
        let paths = ["file.txt", "src/[file].js", "file(1).js", "a+b*c?{d}^$|e\\f"];

        // Act
        let escaped = paths.map(escape_path);

        // Assert
        assert_eq!(
            escaped,
            [
                "file\\.txt",
                "src/\\[file\\]\\.js",
                "file\\(1\\)\\.js",
                "a\\+b\\*c\\?\\{d\\}\\^\\$\\|e\\\\f",
            ]
        );
    }

    #[test]
    fn test_new_returns_none_for_empty_file_set() {
        // Arrange
        let files = FileSet::default();

        // Act
        let pattern = MentionPattern::new(&files);

        // Assert
        assert!(matches!(pattern, Ok(None)));
    }

    #[test]
    fn test_find_iter_recognizes_all_three_forms() {
        // Arrange
        let files = file_set(&["src/a.ts"]);
        let pattern = MentionPattern::new(&files)
            .expect("pattern should compile")
            .expect("pattern should exist");

        // Act
        let found = mentions(&pattern, "`src/a.ts:3` then src/a.ts:10-20 then src/a.ts");

        // Assert
        assert_eq!(
            found,
            vec![
                Mention {
                    text: "`src/a.ts:3`",
                    path: "src/a.ts",
                    line_ref: Some("3"),
                    is_inline_code: true,
                },
                Mention {
                    text: "src/a.ts:10-20",
                    path: "src/a.ts",
                    line_ref: Some("10-20"),
                    is_inline_code: false,
                },
                Mention {
                    text: "src/a.ts",
                    path: "src/a.ts",
                    line_ref: None,
                    is_inline_code: false,
                },
            ]
        );
    }

    #[test]
    fn test_find_iter_treats_dots_literally() {
        // Arrange
        let files = file_set(&["a.ts"]);
        let pattern = MentionPattern::new(&files)
            .expect("pattern should compile")
            .expect("pattern should exist");

        // Act
        let found = mentions(&pattern, "abts and a.ts");

        // Assert
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "a.ts");
    }

    #[test]
    fn test_find_iter_requires_word_boundaries() {
        // Arrange
        let files = file_set(&["lib.rs"]);
        let pattern = MentionPattern::new(&files)
            .expect("pattern should compile")
            .expect("pattern should exist");

        // Act
        let found = mentions(&pattern, "mylib.rs and lib.rsx");

        // Assert
        assert!(found.is_empty());
    }

    #[test]
    fn test_find_iter_matches_paths_next_to_non_ascii_letters() {
        // Arrange
        let files = file_set(&["lib.rs"]);
        let pattern = MentionPattern::new(&files)
            .expect("pattern should compile")
            .expect("pattern should exist");

        // Act
        let offsets = pattern
            .find_iter("修正lib.rs:3を見て élib.rsé")
            .map(|(start, mention)| (start, mention.text))
            .collect::<Vec<_>>();

        // Assert
        assert_eq!(offsets, vec![(6, "lib.rs:3"), (26, "lib.rs")]);
    }

    #[test]
    fn test_find_iter_prefers_longer_path_at_same_position() {
        // Arrange
        let files = file_set(&["src/a.ts", "src/a.ts.bak"]);
        let pattern = MentionPattern::new(&files)
            .expect("pattern should compile")
            .expect("pattern should exist");

        // Act
        let found = mentions(&pattern, "moved src/a.ts.bak:4");

        // Assert
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "src/a.ts.bak");
        assert_eq!(found[0].line_ref, Some("4"));
    }

    #[test]
    fn test_find_iter_reports_match_offsets() {
        // Arrange
        let files = file_set(&["x.rs"]);
        let pattern = MentionPattern::new(&files)
            .expect("pattern should compile")
            .expect("pattern should exist");

        // Act
        let offsets = pattern
            .find_iter("x.rs, x.rs")
            .map(|(start, _)| start)
            .collect::<Vec<_>>();

        // Assert
        assert_eq!(offsets, vec![0, 6]);
    }
}
