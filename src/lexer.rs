use crate::error::LexingError;
use crate::position::Position;
use crate::token::{Keyword, Kind, Token, TokenValue};

pub struct Lexer {
    chars: Vec<char>,
    position: Position,
}

impl Lexer {
    pub fn new(input: &str, file_name: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: Position::start(file_name, input),
        }
    }

    /// Lex `input` as line `line` (zero based) of a larger file.
    pub fn starting_at_line(input: &str, file_name: &str, line: usize) -> Self {
        Self {
            chars: input.chars().collect(),
            position: Position::start(file_name, input).at_line(line),
        }
    }

    fn at(&self) -> Option<char> {
        self.chars.get(self.position.index).copied()
    }

    fn advance(&mut self) {
        self.position = self.position.advanced(self.at());
    }

    fn is_eof(&self) -> bool {
        self.position.index >= self.chars.len()
    }

    /// A token covering the single character under the cursor.
    fn single(&mut self, kind: Kind) -> Token {
        let start = self.position.clone();
        self.advance();
        Token::new(kind, None, start, self.position.clone())
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexingError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.at() {
            let token = match ch {
                ' ' | '\t' => {
                    self.advance();
                    continue;
                }
                '+' => self.single(Kind::Plus),
                '-' => self.single(Kind::Minus),
                '*' => self.single(Kind::Multiply),
                '/' => self.single(Kind::Divide),
                '^' => self.single(Kind::Power),
                '(' => self.single(Kind::LParen),
                ')' => self.single(Kind::RParen),
                '!' => self.make_not_equals()?,
                '=' => self.make_with_optional_equals(Kind::Equals, Kind::EqualsEquals),
                '<' => self.make_with_optional_equals(Kind::LessThan, Kind::LessOrEqual),
                '>' => self.make_with_optional_equals(Kind::GreaterThan, Kind::GreaterOrEqual),
                c if c.is_ascii_digit() => self.make_number(),
                c if c.is_ascii_alphabetic() => self.make_identifier(),
                c => {
                    let start = self.position.clone();
                    self.advance();
                    return Err(LexingError::illegal_character(start, self.position.clone(), c));
                }
            };
            tokens.push(token);
        }

        let start = self.position.clone();
        let end = start.advanced(None);
        tokens.push(Token::new(Kind::EOF, None, start, end));

        tracing::trace!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    /// Digits with at most one `.`; a second `.` ends the literal.
    fn make_number(&mut self) -> Token {
        let start = self.position.clone();
        let mut number = String::new();
        let mut dot_count = 0;

        while let Some(c) = self.at() {
            if c == '.' {
                if dot_count == 1 {
                    break;
                }
                dot_count += 1;
            } else if !c.is_ascii_digit() {
                break;
            }
            number.push(c);
            self.advance();
        }

        let end = self.position.clone();
        // Digits with one optional dot always parse as f64.
        let as_float = || TokenValue::Float(number.parse::<f64>().unwrap_or(f64::INFINITY));

        if dot_count == 0 {
            // Integers past i64 keep their kind and carry the nearest float.
            let value = number.parse::<i64>().map(TokenValue::Int).unwrap_or_else(|_| as_float());
            Token::new(Kind::Int, Some(value), start, end)
        } else {
            Token::new(Kind::Float, Some(as_float()), start, end)
        }
    }

    fn make_identifier(&mut self) -> Token {
        let start = self.position.clone();
        let mut ident = String::new();

        while let Some(c) = self.at() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            ident.push(c);
            self.advance();
        }

        let end = self.position.clone();
        match Keyword::from_ident(&ident) {
            Some(keyword) => Token::new(Kind::Keyword, Some(TokenValue::Keyword(keyword)), start, end),
            None => Token::new(Kind::Identifier, Some(TokenValue::Name(ident)), start, end),
        }
    }

    fn make_not_equals(&mut self) -> Result<Token, LexingError> {
        let start = self.position.clone();
        self.advance();

        if self.at() == Some('=') {
            self.advance();
            return Ok(Token::new(Kind::NotEquals, None, start, self.position.clone()));
        }

        if !self.is_eof() {
            self.advance();
        }
        Err(LexingError::expected_character(
            start,
            self.position.clone(),
            "'=' (after '!')".to_string(),
        ))
    }

    fn make_with_optional_equals(&mut self, single: Kind, double: Kind) -> Token {
        let start = self.position.clone();
        self.advance();

        let kind = if self.at() == Some('=') {
            self.advance();
            double
        } else {
            single
        };

        Token::new(kind, None, start, self.position.clone())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lexer_never_panics(input in "\\PC{0,200}") {
            let _ = Lexer::new(&input, "<prop>").tokenize();
        }

        #[test]
        fn integer_literals_lex_to_int_then_eof(n in 0i64..=i64::MAX) {
            let tokens = Lexer::new(&n.to_string(), "<prop>").tokenize().unwrap();
            prop_assert_eq!(tokens.len(), 2);
            prop_assert_eq!(&tokens[0].value, &Some(TokenValue::Int(n)));
            prop_assert_eq!(tokens[1].kind, Kind::EOF);
        }

        #[test]
        fn any_digit_string_is_one_int_token(digits in "[0-9]{1,60}") {
            let tokens = Lexer::new(&digits, "<prop>").tokenize().unwrap();
            let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
            prop_assert_eq!(kinds, vec![Kind::Int, Kind::EOF]);
            prop_assert_eq!(tokens[0].end.index, digits.len());
        }

        #[test]
        fn unrecognized_character_is_reported_where_it_occurs(
            prefix in "[0-9a-z +*/()^-]{0,20}",
            bad in prop::sample::select(vec!['$', '#', '@', '?', ',', ';', '%', '&']),
        ) {
            let input = format!("{}{}", prefix, bad);
            let err = Lexer::new(&input, "<prop>").tokenize().unwrap_err();
            prop_assert_eq!(err.details, format!("'{}'", bad));
            prop_assert_eq!(err.start.index, prefix.chars().count());
        }

        #[test]
        fn successful_lexes_end_with_eof(input in "[0-9a-zA-Z_ .+*/()^<>=-]{0,60}") {
            if let Ok(tokens) = Lexer::new(&input, "<prop>").tokenize() {
                prop_assert_eq!(tokens.last().map(|t| t.kind), Some(Kind::EOF));
                for pair in tokens.windows(2) {
                    prop_assert!(pair[0].end.index <= pair[1].start.index);
                }
            }
        }
    }
}
