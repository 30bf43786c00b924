use crate::position::Position;
use serde::Serialize;
use std::fmt;

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Token {
    pub kind: Kind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TokenValue>,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    // Literals and names
    #[serde(rename = "integer-literal")]
    Int,
    #[serde(rename = "float-literal")]
    Float,
    Identifier,
    Keyword,

    // Arithmetic
    Plus,        // +
    Minus,       // -
    Multiply,    // *
    Divide,      // /
    Power,       // ^

    // Assignment and comparison
    #[serde(rename = "assign-equals")]
    Equals,      // =
    EqualsEquals, // ==
    NotEquals,   // !=
    LessThan,    // <
    GreaterThan, // >
    LessOrEqual, // <=
    GreaterOrEqual, // >=

    // Brackets
    #[serde(rename = "left-paren")]
    LParen,      // (
    #[serde(rename = "right-paren")]
    RParen,      // )

    #[serde(rename = "end-of-input")]
    EOF          // End of input marker
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    Var,
    And,
    Or,
    Not,
}

impl Keyword {
    pub fn from_ident(ident: &str) -> Option<Keyword> {
        match ident {
            "VAR" => Some(Keyword::Var),
            "AND" => Some(Keyword::And),
            "OR" => Some(Keyword::Or),
            "NOT" => Some(Keyword::Not),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let word = match self {
            Keyword::Var => "VAR",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
        };
        write!(f, "{}", word)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Int(i64),
    Float(f64),
    Name(String),
    Keyword(Keyword),
}

impl Token {
    pub fn new(kind: Kind, value: Option<TokenValue>, start: Position, end: Position) -> Self {
        Self { kind, value, start, end }
    }

    /// A keyword token carrying exactly `keyword`.
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == Kind::Keyword && self.value == Some(TokenValue::Keyword(keyword))
    }

    pub fn name(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Name(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            Some(TokenValue::Int(n)) => write!(f, "{:?}:{}", self.kind, n),
            Some(TokenValue::Float(n)) => write!(f, "{:?}:{:?}", self.kind, n),
            Some(TokenValue::Name(name)) => write!(f, "{:?}:{}", self.kind, name),
            Some(TokenValue::Keyword(keyword)) => write!(f, "{:?}:{}", self.kind, keyword),
            None => write!(f, "{:?}", self.kind),
        }
    }
}
