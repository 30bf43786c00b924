use crate::context::Context;
use crate::error::RuntimeError;
use crate::number::Number;
use crate::parser::{AstKind, BinaryOperator, UnaryOperator};
use std::rc::Rc;

pub type RuntimeResult = Result<Number, RuntimeError>;

/// Tree-walking evaluator. Sub-expressions run left to right and the first
/// failure is returned without visiting anything further.
#[derive(Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn eval(&self, node: &AstKind, context: &Rc<Context>) -> RuntimeResult {
        let (start, end) = (node.start().clone(), node.end().clone());

        match node {
            AstKind::NumberLiteral { value, .. } => Ok(Number::new(*value).with_position(start, end)),

            AstKind::VariableAccess { name, .. } => match context.lookup(name) {
                Some(value) => {
                    tracing::trace!(name = %name, %value, "read variable");
                    Ok(value.with_position(start, end))
                }
                None => Err(RuntimeError::new(start, end, format!("'{}' is not defined", name), context)),
            },

            AstKind::VariableAssign { name, value, .. } => {
                let val = self.eval(value, context)?;
                tracing::debug!(name = %name, value = %val, context = %context.display_name, "assign variable");
                context.assign(name, val.clone());
                Ok(val)
            }

            AstKind::BinaryOp { lhs, operator, rhs, .. } => {
                let left = self.eval(lhs, context)?;
                let right = self.eval(rhs, context)?;

                let result = match operator {
                    BinaryOperator::Add => left.added_to(&right),
                    BinaryOperator::Subtract => left.subbed_by(&right),
                    BinaryOperator::Multiply => left.multed_by(&right),
                    BinaryOperator::Divide => left.dived_by(&right).map_err(|err| {
                        RuntimeError::new(
                            rhs.start().clone(),
                            rhs.end().clone(),
                            err.to_string(),
                            context,
                        )
                    })?,
                    BinaryOperator::Power => left.powed_by(&right),
                    BinaryOperator::Equal => left.comparison_eq(&right),
                    BinaryOperator::NotEqual => left.comparison_ne(&right),
                    BinaryOperator::Less => left.comparison_lt(&right),
                    BinaryOperator::Greater => left.comparison_gt(&right),
                    BinaryOperator::LessOrEqual => left.comparison_lte(&right),
                    BinaryOperator::GreaterOrEqual => left.comparison_gte(&right),
                    BinaryOperator::And => left.anded_by(&right),
                    BinaryOperator::Or => left.ored_by(&right),
                };

                Ok(result.with_position(start, end))
            }

            AstKind::UnaryOp { operator, operand, .. } => {
                let number = self.eval(operand, context)?;

                let result = match operator {
                    UnaryOperator::Plus => number,
                    UnaryOperator::Minus => number.multed_by(&Number::int(-1)),
                    UnaryOperator::Not => number.notted(),
                };

                Ok(result.with_position(start, end))
            }
        }
    }
}
