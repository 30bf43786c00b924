use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// A cursor into a named source text.
///
/// Positions are plain values: advancing returns a new `Position` and leaves
/// the old one untouched, so a span boundary is frozen simply by keeping it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    #[serde(skip)]
    pub source_name: Rc<str>,
    #[serde(skip)]
    pub source_text: Rc<str>,
}

impl Position {
    pub fn start(source_name: &str, source_text: &str) -> Self {
        Self {
            index: 0,
            line: 0,
            column: 0,
            source_name: Rc::from(source_name),
            source_text: Rc::from(source_text),
        }
    }

    /// Same source, but counting lines from `line` (zero based).
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Step past `current`. A newline moves to column 0 of the next line.
    pub fn advanced(&self, current: Option<char>) -> Self {
        let mut next = self.clone();
        next.index += 1;
        next.column += 1;

        if current == Some('\n') {
            next.line += 1;
            next.column = 0;
        }

        next
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source_name, self.line + 1, self.column + 1)
    }
}
