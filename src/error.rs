use crate::arrows::string_with_arrows;
use crate::context::Context;
use crate::position::Position;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub enum LangError {
    Lexing(LexingError),
    Syntax(SyntaxError),
    Runtime(RuntimeError),
}

impl Error for LangError {}

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LangError::Lexing(err) => write!(f, "{}", err),
            LangError::Syntax(err) => write!(f, "{}", err),
            LangError::Runtime(err) => write!(f, "{}", err),
        }
    }
}

impl From<LexingError> for LangError {
    fn from(err: LexingError) -> Self {
        LangError::Lexing(err)
    }
}

impl From<SyntaxError> for LangError {
    fn from(err: SyntaxError) -> Self {
        LangError::Syntax(err)
    }
}

impl From<RuntimeError> for LangError {
    fn from(err: RuntimeError) -> Self {
        LangError::Runtime(err)
    }
}

impl LangError {
    pub fn span(&self) -> (&Position, &Position) {
        match self {
            LangError::Lexing(err) => (&err.start, &err.end),
            LangError::Syntax(err) => (&err.start, &err.end),
            LangError::Runtime(err) => (&err.start, &err.end),
        }
    }

    /// The rendered error followed by the offending source line with carets
    /// under the failing span.
    pub fn with_arrows(&self) -> String {
        let (start, end) = self.span();
        format!(
            "{}\n\n{}",
            self,
            string_with_arrows(&start.source_text, start, end)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexingErrorKind {
    IllegalCharacter,
    ExpectedCharacter,
}

impl fmt::Display for LexingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LexingErrorKind::IllegalCharacter => write!(f, "Illegal Character"),
            LexingErrorKind::ExpectedCharacter => write!(f, "Expected Character"),
        }
    }
}

#[derive(Debug)]
pub struct LexingError {
    pub kind: LexingErrorKind,
    pub start: Position,
    pub end: Position,
    pub details: String,
}

impl Error for LexingError {}

impl LexingError {
    pub fn illegal_character(start: Position, end: Position, ch: char) -> Self {
        Self {
            kind: LexingErrorKind::IllegalCharacter,
            start,
            end,
            details: format!("'{}'", ch),
        }
    }

    pub fn expected_character(start: Position, end: Position, details: String) -> Self {
        Self {
            kind: LexingErrorKind::ExpectedCharacter,
            start,
            end,
            details,
        }
    }
}

impl fmt::Display for LexingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {}\nFile {}, line {}",
            self.kind,
            self.details,
            self.start.source_name,
            self.start.line + 1,
        )
    }
}

#[derive(Debug)]
pub struct SyntaxError {
    pub start: Position,
    pub end: Position,
    pub details: String,
}

impl Error for SyntaxError {}

impl SyntaxError {
    pub fn new(start: Position, end: Position, details: impl Into<String>) -> Self {
        Self {
            start,
            end,
            details: details.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid Syntax: {}\nFile {}, line {}",
            self.details,
            self.start.source_name,
            self.start.line + 1,
        )
    }
}

#[derive(Debug)]
pub struct RuntimeError {
    pub start: Position,
    pub end: Position,
    pub details: String,
    pub context: Rc<Context>,
}

impl Error for RuntimeError {}

impl RuntimeError {
    pub fn new(start: Position, end: Position, details: impl Into<String>, context: &Rc<Context>) -> Self {
        Self {
            start,
            end,
            details: details.into(),
            context: Rc::clone(context),
        }
    }

    /// Frames from the failing context outward, rendered oldest first.
    pub fn traceback(&self) -> String {
        let mut frames = Vec::new();
        let mut position = Some(&self.start);
        let mut context = Some(&self.context);

        while let Some(ctx) = context {
            match position {
                Some(pos) => frames.push(format!(
                    "  File {}, line {}, in {}\n",
                    pos.source_name,
                    pos.line + 1,
                    ctx.display_name
                )),
                None => frames.push(format!("  File <unknown>, in {}\n", ctx.display_name)),
            }
            position = ctx.parent_entry.as_ref();
            context = ctx.parent.as_ref();
        }

        frames.reverse();
        format!("Traceback (most recent call last):\n{}", frames.concat())
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}Runtime Error: {}", self.traceback(), self.details)
    }
}
