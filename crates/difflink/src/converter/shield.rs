//! Splits comment text into prose and regions that must be copied verbatim.
//!
//! Verbatim regions are fenced code blocks, inline markdown links, and bare
//! `http(s)://` URLs. Only prose is scanned for file mentions, and
//! concatenating every segment in order reproduces the input exactly.

const FENCE: &str = "```";
const URL_SCHEMES: [&str; 2] = ["https://", "http://"];

/// A contiguous slice of the input text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'t> {
    /// Text that may contain file mentions.
    Prose(&'t str),
    /// Text that must be reproduced byte-for-byte.
    Verbatim(&'t str),
}

/// Splits `text` into alternating prose and verbatim segments.
///
/// Empty segments are never produced.
pub(crate) fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut link_delimiters = LinkDelimiters::default();
    let mut prose_start = 0;
    let mut cursor = 0;

    while let Some(character) = text[cursor..].chars().next() {
        let Some(length) = verbatim_len(text, cursor, &mut link_delimiters) else {
            cursor += character.len_utf8();

            continue;
        };

        if prose_start < cursor {
            segments.push(Segment::Prose(&text[prose_start..cursor]));
        }
        segments.push(Segment::Verbatim(&text[cursor..cursor + length]));
        cursor += length;
        prose_start = cursor;
    }

    if prose_start < text.len() {
        segments.push(Segment::Prose(&text[prose_start..]));
    }

    segments
}

/// Returns the byte length of the verbatim region starting at `cursor`.
fn verbatim_len(
    text: &str,
    cursor: usize,
    link_delimiters: &mut LinkDelimiters,
) -> Option<usize> {
    fenced_block_len(&text[cursor..])
        .or_else(|| inline_link_len(text, cursor, link_delimiters))
        .or_else(|| bare_url_len(text, cursor))
}

/// Matches a fence opening through the next fence, across lines.
///
/// An unclosed fence is not a block.
fn fenced_block_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix(FENCE)?;
    let closing = body.find(FENCE)?;

    Some(FENCE.len() + closing + FENCE.len())
}

/// Position of the next delimiter at or after the last searched offset.
///
/// Searches start at non-decreasing offsets, so a found position stays valid
/// until the offset passes it.
#[derive(Default)]
struct NextDelimiter {
    position: Option<usize>,
}

impl NextDelimiter {
    /// Returns the first position at or after `from` holding one of
    /// `delimiters`, or `text.len()` when there is none.
    fn find(&mut self, text: &str, from: usize, delimiters: [char; 2]) -> usize {
        if let Some(position) = self.position.filter(|position| *position >= from) {
            return position;
        }

        let position = text[from..]
            .find(delimiters)
            .map_or(text.len(), |offset| from + offset);
        self.position = Some(position);

        position
    }
}

/// Label and destination ends shared by every `[` in one scan.
#[derive(Default)]
struct LinkDelimiters {
    label_end: NextDelimiter,
    destination_end: NextDelimiter,
}

/// Matches `[label](destination)` where neither part spans a line break.
fn inline_link_len(
    text: &str,
    cursor: usize,
    link_delimiters: &mut LinkDelimiters,
) -> Option<usize> {
    if !text[cursor..].starts_with('[') {
        return None;
    }

    let label_end = link_delimiters
        .label_end
        .find(text, cursor + 1, [']', '\n']);
    if !text[label_end..].starts_with("](") {
        return None;
    }

    let destination_end =
        link_delimiters
            .destination_end
            .find(text, label_end + 2, [')', '\n']);
    if !text[destination_end..].starts_with(')') {
        return None;
    }

    Some(destination_end + 1 - cursor)
}

/// Matches a bare URL that does not continue a preceding word.
fn bare_url_len(text: &str, cursor: usize) -> Option<usize> {
    let rest = &text[cursor..];
    if !URL_SCHEMES.iter().any(|scheme| rest.starts_with(scheme)) {
        return None;
    }

    let continues_word = text[..cursor]
        .chars()
        .next_back()
        .is_some_and(char::is_alphanumeric);
    if continues_word {
        return None;
    }

    let length = rest
        .find(|character: char| {
            character.is_whitespace() || matches!(character, '<' | '>' | '"' | '`' | ')' | ']')
        })
        .unwrap_or(rest.len());

    Some(length)
}
