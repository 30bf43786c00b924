use crate::error::SyntaxError;
use crate::number::Scalar;
use crate::position::Position;
use crate::token::{Keyword, Kind, Token, TokenValue};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Names bound by `VAR` must be 6 to 8 characters long. Uses of a name are
/// not checked.
static DECLARATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{6,8}$").expect("declaration name pattern is valid"));

/// Deepest run of brackets, prefix operators, `VAR`s and `^` right-hand
/// sides the parser will recurse into.
pub const MAX_NESTING: usize = 64;

/// Tallest tree the parser will build. Evaluation recurses once per level.
pub const MAX_HEIGHT: usize = 512;

const TOO_DEEP: &str = "Expression nested too deeply";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        let operator = match token.kind {
            Kind::Plus => BinaryOperator::Add,
            Kind::Minus => BinaryOperator::Subtract,
            Kind::Multiply => BinaryOperator::Multiply,
            Kind::Divide => BinaryOperator::Divide,
            Kind::Power => BinaryOperator::Power,
            Kind::EqualsEquals => BinaryOperator::Equal,
            Kind::NotEquals => BinaryOperator::NotEqual,
            Kind::LessThan => BinaryOperator::Less,
            Kind::GreaterThan => BinaryOperator::Greater,
            Kind::LessOrEqual => BinaryOperator::LessOrEqual,
            Kind::GreaterOrEqual => BinaryOperator::GreaterOrEqual,
            Kind::Keyword if token.is_keyword(Keyword::And) => BinaryOperator::And,
            Kind::Keyword if token.is_keyword(Keyword::Or) => BinaryOperator::Or,
            _ => return None,
        };
        Some(operator)
    }

    fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Less
                | BinaryOperator::Greater
                | BinaryOperator::LessOrEqual
                | BinaryOperator::GreaterOrEqual
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "NOT",
        };
        write!(f, "{}", symbol)
    }
}

/// Tree nodes carry typed payloads; the source token is kept for its span.
#[derive(Debug, Clone, PartialEq)]
pub enum AstKind {
    NumberLiteral {
        value: Scalar,
        token: Token,
    },
    VariableAccess {
        name: String,
        token: Token,
    },
    VariableAssign {
        name: String,
        token: Token,
        value: Box<AstKind>,
    },
    BinaryOp {
        lhs: Box<AstKind>,
        operator: BinaryOperator,
        token: Token,
        rhs: Box<AstKind>,
    },
    UnaryOp {
        operator: UnaryOperator,
        token: Token,
        operand: Box<AstKind>,
    },
}

impl AstKind {
    pub fn start(&self) -> &Position {
        match self {
            AstKind::NumberLiteral { token, .. } => &token.start,
            AstKind::VariableAccess { token, .. } => &token.start,
            AstKind::VariableAssign { token, .. } => &token.start,
            AstKind::BinaryOp { lhs, .. } => lhs.start(),
            AstKind::UnaryOp { token, .. } => &token.start,
        }
    }

    pub fn end(&self) -> &Position {
        match self {
            AstKind::NumberLiteral { token, .. } => &token.end,
            AstKind::VariableAccess { token, .. } => &token.end,
            AstKind::VariableAssign { value, .. } => value.end(),
            AstKind::BinaryOp { rhs, .. } => rhs.end(),
            AstKind::UnaryOp { operand, .. } => operand.end(),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        match self {
            AstKind::NumberLiteral { .. } | AstKind::VariableAccess { .. } => 1,
            AstKind::VariableAssign { value, .. } => value.height() + 1,
            AstKind::BinaryOp { lhs, rhs, .. } => lhs.height().max(rhs.height()) + 1,
            AstKind::UnaryOp { operand, .. } => operand.height() + 1,
        }
    }
}

type ParseResult = Result<AstKind, SyntaxError>;
type SubParser = fn(&mut Parser) -> ParseResult;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    /// `tokens` must end with an `EOF` token, as produced by the lexer.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    fn at(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.current.min(last)]
    }

    fn next_token(&mut self) -> Token {
        let token = self.at().clone();
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn error_here(&self, message: &str) -> SyntaxError {
        let token = self.at();
        SyntaxError::new(token.start.clone(), token.end.clone(), message)
    }

    /// Replace a nested failure with `message`, but only when nothing was
    /// consumed since `start`; otherwise the deeper error is more precise.
    fn recover(&self, start: usize, result: ParseResult, message: &str) -> ParseResult {
        match result {
            Err(_) if self.current == start => Err(self.error_here(message)),
            other => other,
        }
    }

    /// Run `parse` one nesting level down.
    fn nested(&mut self, parse: SubParser) -> ParseResult {
        if self.depth >= MAX_NESTING {
            return Err(self.error_here(TOO_DEEP));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn checked_height(node: AstKind, height: usize) -> ParseResult {
        if height > MAX_HEIGHT {
            return Err(SyntaxError::new(node.start().clone(), node.end().clone(), TOO_DEEP));
        }
        Ok(node)
    }

    fn unary(&mut self, operator: UnaryOperator, operand: SubParser) -> ParseResult {
        let token = self.next_token();
        let operand = self.nested(operand)?;
        let height = operand.height() + 1;
        Self::checked_height(
            AstKind::UnaryOp {
                operator,
                token,
                operand: Box::new(operand),
            },
            height,
        )
    }

    pub fn parse(&mut self) -> ParseResult {
        if self.tokens.is_empty() {
            return Err(SyntaxError::new(
                Position::start("<unknown>", ""),
                Position::start("<unknown>", ""),
                "Expected 'VAR', int, float, identifier, '+', '-', '(' or 'NOT'",
            ));
        }

        let node = self.expr()?;

        if self.at().kind != Kind::EOF {
            return Err(self.error_here(
                "Expected '+', '-', '*', '/', '^', '==', '!=', '<', '>', '<=', '>=', 'AND' or 'OR'",
            ));
        }

        tracing::debug!(?node, "parsed expression");
        Ok(node)
    }

    fn expr(&mut self) -> ParseResult {
        if self.at().is_keyword(Keyword::Var) {
            self.next_token();

            let Some(name) = self.at().name().map(String::from) else {
                return Err(self.error_here("Expected identifier"));
            };

            if !DECLARATION_NAME.is_match(&name) {
                return Err(self.error_here("Identifiers must be 6-8 characters"));
            }

            let token = self.next_token();

            if self.at().kind != Kind::Equals {
                return Err(self.error_here("Expected '='"));
            }

            self.next_token();
            let value = self.nested(Self::expr)?;
            let height = value.height() + 1;
            return Self::checked_height(
                AstKind::VariableAssign {
                    name,
                    token,
                    value: Box::new(value),
                },
                height,
            );
        }

        let start = self.current;
        let result = self.bin_op(Self::comp_expr, BinaryOperator::is_logical, None);
        self.recover(
            start,
            result,
            "Expected 'VAR', int, float, identifier, '+', '-', '(' or 'NOT'",
        )
    }

    fn comp_expr(&mut self) -> ParseResult {
        if self.at().is_keyword(Keyword::Not) {
            return self.unary(UnaryOperator::Not, Self::comp_expr);
        }

        let start = self.current;
        let result = self.bin_op(Self::arith_expr, BinaryOperator::is_comparison, None);
        self.recover(
            start,
            result,
            "Expected int, float, identifier, '+', '-', '(' or 'NOT'",
        )
    }

    fn arith_expr(&mut self) -> ParseResult {
        self.bin_op(
            Self::term,
            |op| matches!(op, BinaryOperator::Add | BinaryOperator::Subtract),
            None,
        )
    }

    fn term(&mut self) -> ParseResult {
        self.bin_op(
            Self::factor,
            |op| matches!(op, BinaryOperator::Multiply | BinaryOperator::Divide),
            None,
        )
    }

    fn factor(&mut self) -> ParseResult {
        match self.at().kind {
            Kind::Plus => self.unary(UnaryOperator::Plus, Self::factor),
            Kind::Minus => self.unary(UnaryOperator::Minus, Self::factor),
            _ => self.power(),
        }
    }

    /// Right associative: the right-hand side re-enters `factor`.
    fn power(&mut self) -> ParseResult {
        self.bin_op(
            Self::atom,
            |op| op == BinaryOperator::Power,
            Some(Self::exponent),
        )
    }

    fn exponent(&mut self) -> ParseResult {
        self.nested(Self::factor)
    }

    fn atom(&mut self) -> ParseResult {
        let token = self.at();
        match (token.kind, &token.value) {
            (Kind::Int | Kind::Float, Some(TokenValue::Int(n))) => {
                let value = Scalar::Int(*n);
                Ok(AstKind::NumberLiteral {
                    value,
                    token: self.next_token(),
                })
            }
            (Kind::Int | Kind::Float, Some(TokenValue::Float(n))) => {
                let value = Scalar::Float(*n);
                Ok(AstKind::NumberLiteral {
                    value,
                    token: self.next_token(),
                })
            }
            (Kind::Identifier, Some(TokenValue::Name(name))) => {
                let name = name.clone();
                Ok(AstKind::VariableAccess {
                    name,
                    token: self.next_token(),
                })
            }
            (Kind::LParen, _) => {
                self.next_token();
                let expr = self.nested(Self::expr)?;
                if self.at().kind != Kind::RParen {
                    return Err(self.error_here("Expected ')'"));
                }
                self.next_token();
                Ok(expr)
            }
            _ => Err(self.error_here("Expected int, float, identifier, '+', '-', '('")),
        }
    }

    /// Left-folding chain `left (op right)*` shared by every binary level.
    /// `accepts` picks the operators that belong to this level.
    fn bin_op(
        &mut self,
        left: SubParser,
        accepts: fn(BinaryOperator) -> bool,
        right: Option<SubParser>,
    ) -> ParseResult {
        let right = right.unwrap_or(left);
        let mut lhs = left(self)?;
        let mut height = lhs.height();

        while let Some(operator) = BinaryOperator::from_token(self.at()).filter(|op| accepts(*op)) {
            let token = self.next_token();
            let rhs = right(self)?;
            height = height.max(rhs.height()) + 1;
            lhs = Self::checked_height(
                AstKind::BinaryOp {
                    lhs: Box::new(lhs),
                    operator,
                    token,
                    rhs: Box::new(rhs),
                },
                height,
            )?;
        }

        Ok(lhs)
    }
}

/// Compact s-expression form of a tree, used by tests and the `ast` command.
pub fn to_sexpr(node: &AstKind) -> String {
    match node {
        AstKind::NumberLiteral { value, .. } => value.to_string(),
        AstKind::VariableAccess { name, .. } => name.clone(),
        AstKind::VariableAssign { name, value, .. } => format!("(VAR {} {})", name, to_sexpr(value)),
        AstKind::BinaryOp { lhs, operator, rhs, .. } => {
            format!("({} {} {})", operator, to_sexpr(lhs), to_sexpr(rhs))
        }
        AstKind::UnaryOp { operator, operand, .. } => format!("({} {})", operator, to_sexpr(operand)),
    }
}
