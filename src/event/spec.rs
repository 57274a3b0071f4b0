//! Comma-separated event specifications, e.g. `cycles,instructions`.

use std::ops::Range;

use arrayvec::ArrayString;
use thiserror::Error;

use super::Hardware;

/// Capacity of the scratch buffer each event name is copied into.
pub const MAX_EVENT_NAME: usize = 64;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("the event name is too long, {len}")]
    TooLong { span: Range<usize>, len: usize },
    #[error("empty event name at offset {}", .span.start)]
    Empty { span: Range<usize> },
    #[error("unknown event `{name}`")]
    Unknown { span: Range<usize>, name: String },
    #[error("no events specified")]
    NoEvents,
}

impl SpecError {
    /// Byte bounds of the offending token within the specification.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::TooLong { span, .. } | Self::Empty { span } | Self::Unknown { span, .. } => {
                Some(span.clone())
            }
            Self::NoEvents => None,
        }
    }
}

/// A validated event name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Bounds of the name within the specification string.
    pub span: Range<usize>,
    pub name: ArrayString<MAX_EVENT_NAME>,
    pub event: Hardware,
}

impl Token {
    fn parse(text: &str, span: Range<usize>) -> Result<Self, SpecError> {
        // The copy itself is the bounds check, an oversized name never
        // touches the buffer.
        let name = ArrayString::from(text).map_err(|_| SpecError::TooLong {
            span: span.clone(),
            len: text.len(),
        })?;

        if name.is_empty() {
            return Err(SpecError::Empty { span });
        }

        match Hardware::from_name(&name) {
            Some(event) => Ok(Self { span, name, event }),
            None => Err(SpecError::Unknown {
                span,
                name: name.to_string(),
            }),
        }
    }
}

/// Iterator over the tokens of a specification, see [`tokens`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    spec: &'a str,
    pos: usize,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, SpecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.pos;
        let end = match self.spec[start..].find(',') {
            Some(len) => {
                self.pos = start + len + 1;
                start + len
            }
            None => {
                self.done = true;
                self.spec.len()
            }
        };

        Some(Token::parse(&self.spec[start..end], start..end))
    }
}

/// Splits `spec` at commas and validates each name against the event table.
///
/// An empty specification yields no tokens at all, while an empty name
/// between two commas (or after a trailing one) yields [`SpecError::Empty`].
pub fn tokens(spec: &str) -> Tokens<'_> {
    Tokens {
        spec,
        pos: 0,
        done: spec.is_empty(),
    }
}

/// Returns the number of events in `spec`, failing on the first bad token.
pub fn check(spec: &str) -> Result<usize, SpecError> {
    tokens(spec).try_fold(0, |nr, token| token.map(|_| nr + 1))
}
