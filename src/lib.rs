//! BadLang: a small expression language for learning interpreter construction.
//!
//! Source text goes through [`lexer::Lexer`], [`parser::Parser`] and
//! [`interpreter::Interpreter`] in turn. Each stage stops at its first error.
//!
//! ```
//! use badlang::context::{Context, SymbolTable};
//!
//! let context = Context::root(SymbolTable::with_globals());
//! badlang::run("<doc>", "VAR answer = 6 * 7", &context).unwrap();
//! let value = badlang::run("<doc>", "answer - 2", &context).unwrap();
//! assert_eq!(value.to_string(), "40");
//! ```

pub mod arrows;
pub mod config;
pub mod context;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod number;
pub mod parser;
pub mod position;
pub mod token;

use crate::context::Context;
use crate::error::LangError;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::number::Number;
use crate::parser::{AstKind, Parser};
use crate::token::Token;
use std::rc::Rc;

pub fn tokenize(source_name: &str, source_text: &str) -> Result<Vec<Token>, LangError> {
    Ok(Lexer::new(source_text, source_name).tokenize()?)
}

pub fn parse(source_name: &str, source_text: &str) -> Result<AstKind, LangError> {
    let tokens = tokenize(source_name, source_text)?;
    Ok(Parser::new(tokens).parse()?)
}

/// Lex, parse and evaluate one statement against `context`.
pub fn run(source_name: &str, source_text: &str, context: &Rc<Context>) -> Result<Number, LangError> {
    let ast = parse(source_name, source_text)?;
    Ok(Interpreter::new().eval(&ast, context)?)
}

/// Like [`run`], but for line `line` (zero based) of a larger file.
pub fn run_line(source_name: &str, source_text: &str, line: usize, context: &Rc<Context>) -> Result<Number, LangError> {
    let tokens = Lexer::starting_at_line(source_text, source_name, line).tokenize()?;
    let ast = Parser::new(tokens).parse()?;
    Ok(Interpreter::new().eval(&ast, context)?)
}
