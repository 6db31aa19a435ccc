/// A line or inclusive line range attached to a file mention.
///
/// Numbers are kept exactly as written and are not validated beyond being
/// ASCII digits, so `30-10` or `007` still produce an anchor from the digits
/// as given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineRef<'a> {
    /// A single 1-based line, e.g. `25`.
    Line(&'a str),
    /// An inclusive `start-end` range, e.g. `10-20`.
    Range { start: &'a str, end: &'a str },
}

impl<'a> LineRef<'a> {
    /// Parses `N` or `A-B` made of ASCII digits.
    ///
    /// Returns `None` for any other shape.
    pub fn parse(text: &'a str) -> Option<Self> {
        match text.split_once('-') {
            Some((start, end)) => Some(Self::Range {
                start: line_number(start)?,
                end: line_number(end)?,
            }),
            None => Some(Self::Line(line_number(text)?)),
        }
    }

    /// Returns the diff fragment suffix pointing at the referenced lines on
    /// the right-hand side of the diff.
    pub fn anchor(self) -> String {
        match self {
            Self::Line(line) => format!("R{line}"),
            Self::Range { start, end } => format!("R{start}-R{end}"),
        }
    }
}

fn line_number(text: &str) -> Option<&str> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    Some(text)
}
