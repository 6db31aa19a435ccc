//! Rewrites file path mentions in comment text into diff links.

use tracing::{debug, warn};

use crate::domain::file::{FileEntry, FileSet};
use crate::domain::line_ref::LineRef;

/// Known-path alternation and path escaping.
mod pattern;
/// Fenced block, link, and URL shielding.
mod shield;

pub use pattern::escape_path;

use pattern::{Mention, MentionPattern};
use shield::Segment;

/// Result of one rewrite pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rewrite {
    /// Input text with every resolvable mention replaced by a link.
    pub text: String,
    /// Whether at least one mention was linked.
    pub changed: bool,
    /// Number of mentions that were linked.
    pub links: usize,
}

impl Rewrite {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changed: false,
            links: 0,
        }
    }
}

/// Replaces mentions of paths in `files` with markdown links to their diff
/// anchors.
///
/// Mentions may be bare (`src/a.ts`, `src/a.ts:10`, `src/a.ts:10-20`) or
/// inline code (`` `src/a.ts:10` ``). Fenced code blocks, existing inline
/// links, and bare URLs are reproduced byte-for-byte. When no mention
/// resolves, the returned text equals `text` and `changed` is `false`.
pub fn rewrite(text: &str, files: &FileSet) -> Rewrite {
    let pattern = match MentionPattern::new(files) {
        Ok(Some(pattern)) => pattern,
        Ok(None) => return Rewrite::unchanged(text),
        Err(error) => {
            warn!(%error, files = files.len(), "Failed to build file mention pattern");

            return Rewrite::unchanged(text);
        }
    };

    let mut rewritten = String::with_capacity(text.len());
    let mut links = 0;
    for segment in shield::segments(text) {
        match segment {
            Segment::Prose(prose) => {
                links += link_mentions(prose, files, &pattern, &mut rewritten);
            }
            Segment::Verbatim(verbatim) => rewritten.push_str(verbatim),
        }
    }

    Rewrite {
        text: rewritten,
        changed: links > 0,
        links,
    }
}

/// Appends `prose` to `output` with resolvable mentions linked and returns
/// how many were linked.
fn link_mentions(
    prose: &str,
    files: &FileSet,
    pattern: &MentionPattern,
    output: &mut String,
) -> usize {
    let mut links = 0;
    let mut copied_until = 0;

    for (start, mention) in pattern.find_iter(prose) {
        output.push_str(&prose[copied_until..start]);
        copied_until = start + mention.text.len();

        match resolve_link(&mention, files) {
            Some(link) => {
                output.push_str(&link);
                links += 1;
            }
            None => output.push_str(mention.text),
        }
    }
    output.push_str(&prose[copied_until..]);

    links
}

/// Returns the markdown link for `mention`, or `None` when its path is not
/// in `files`.
fn resolve_link(mention: &Mention<'_>, files: &FileSet) -> Option<String> {
    let entry = files.get(mention.path)?;
    // The pattern only captures digit suffixes, which always parse.
    let line_ref = mention.line_ref.and_then(LineRef::parse);

    debug!(
        path = mention.path,
        line_ref = ?line_ref,
        inline_code = mention.is_inline_code,
        "Linking file mention"
    );

    Some(markdown_link(mention.text, entry, line_ref))
}

/// Builds `[label](url + anchor)`.
///
/// The label is the matched text as written, so inline-code mentions keep
/// their backticks inside the link text.
fn markdown_link(label: &str, entry: &FileEntry, line_ref: Option<LineRef<'_>>) -> String {
    let anchor = line_ref.map(LineRef::anchor).unwrap_or_default();

    format!("[{label}]({}{anchor})", entry.url)
}
