use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

/// The numeric payload of a value. Integer results that would overflow
/// `i64` are carried as floats instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Int(n) => n as f64,
            Scalar::Float(n) => n,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Scalar::Int(n) => n == 0,
            Scalar::Float(n) => n == 0.0,
        }
    }

    pub fn is_truthy(self) -> bool {
        !self.is_zero()
    }

    fn from_bool(value: bool) -> Scalar {
        Scalar::Int(i64::from(value))
    }

    fn arithmetic(self, other: Scalar, int_op: fn(i64, i64) -> Option<i64>, float_op: fn(f64, f64) -> f64) -> Scalar {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => match int_op(a, b) {
                Some(n) => Scalar::Int(n),
                None => Scalar::Float(float_op(a as f64, b as f64)),
            },
            (a, b) => Scalar::Float(float_op(a.as_f64(), b.as_f64())),
        }
    }

    fn power(self, other: Scalar) -> Scalar {
        if let (Scalar::Int(base), Scalar::Int(exp)) = (self, other) {
            if let Some(n) = u32::try_from(exp).ok().and_then(|exp| base.checked_pow(exp)) {
                return Scalar::Int(n);
            }
        }
        Scalar::Float(self.as_f64().powf(other.as_f64()))
    }

    fn compare(self, other: Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(n) if n.is_nan() => write!(f, "nan"),
            Scalar::Float(n) if n.is_infinite() => {
                write!(f, "{}", if *n > 0.0 { "inf" } else { "-inf" })
            }
            Scalar::Float(n) => write!(f, "{}", format_float(*n)),
        }
    }
}

/// Shortest round-trip digits. Magnitudes below `1e-4` or from `1e16` up use
/// exponent form with a signed, two digit exponent (`1e+20`, `1.5e-05`).
fn format_float(n: f64) -> String {
    let scientific = format!("{:e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if n != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let plain = n.to_string();
    if plain.contains('.') {
        plain
    } else {
        plain + ".0"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    DivisionByZero,
}

impl Error for NumberError {}

impl fmt::Display for NumberError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumberError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

/// The single runtime value type: a scalar plus the span it came from.
///
/// Operations never mutate; they build a fresh, unpositioned `Number` that the
/// interpreter then places at the span of the node that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub value: Scalar,
    pub start: Option<Position>,
    pub end: Option<Position>,
}

impl Number {
    pub fn new(value: Scalar) -> Self {
        Self {
            value,
            start: None,
            end: None,
        }
    }

    pub fn int(value: i64) -> Self {
        Self::new(Scalar::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(Scalar::Float(value))
    }

    pub fn with_position(mut self, start: Position, end: Position) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn added_to(&self, other: &Number) -> Number {
        Number::new(self.value.arithmetic(other.value, i64::checked_add, |a, b| a + b))
    }

    pub fn subbed_by(&self, other: &Number) -> Number {
        Number::new(self.value.arithmetic(other.value, i64::checked_sub, |a, b| a - b))
    }

    pub fn multed_by(&self, other: &Number) -> Number {
        Number::new(self.value.arithmetic(other.value, i64::checked_mul, |a, b| a * b))
    }

    /// True division; the result is always a float.
    pub fn dived_by(&self, other: &Number) -> Result<Number, NumberError> {
        if other.value.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        Ok(Number::float(self.value.as_f64() / other.value.as_f64()))
    }

    pub fn powed_by(&self, other: &Number) -> Number {
        Number::new(self.value.power(other.value))
    }

    pub fn comparison_eq(&self, other: &Number) -> Number {
        self.compared(other, |ord| ord == Some(Ordering::Equal))
    }

    pub fn comparison_ne(&self, other: &Number) -> Number {
        self.compared(other, |ord| ord != Some(Ordering::Equal))
    }

    pub fn comparison_lt(&self, other: &Number) -> Number {
        self.compared(other, |ord| ord == Some(Ordering::Less))
    }

    pub fn comparison_gt(&self, other: &Number) -> Number {
        self.compared(other, |ord| ord == Some(Ordering::Greater))
    }

    pub fn comparison_lte(&self, other: &Number) -> Number {
        self.compared(other, |ord| matches!(ord, Some(Ordering::Less | Ordering::Equal)))
    }

    pub fn comparison_gte(&self, other: &Number) -> Number {
        self.compared(other, |ord| matches!(ord, Some(Ordering::Greater | Ordering::Equal)))
    }

    pub fn anded_by(&self, other: &Number) -> Number {
        Number::new(Scalar::from_bool(self.value.is_truthy() && other.value.is_truthy()))
    }

    pub fn ored_by(&self, other: &Number) -> Number {
        Number::new(Scalar::from_bool(self.value.is_truthy() || other.value.is_truthy()))
    }

    pub fn notted(&self) -> Number {
        Number::new(Scalar::from_bool(self.value.is_zero()))
    }

    fn compared(&self, other: &Number, test: fn(Option<Ordering>) -> bool) -> Number {
        Number::new(Scalar::from_bool(test(self.value.compare(other.value))))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_stays_integer() {
        assert_eq!(Number::int(3).added_to(&Number::int(4)).value, Scalar::Int(7));
        assert_eq!(Number::int(8).subbed_by(&Number::int(3)).value, Scalar::Int(5));
        assert_eq!(Number::int(6).multed_by(&Number::int(7)).value, Scalar::Int(42));
    }

    #[test]
    fn mixed_arithmetic_is_float() {
        assert_eq!(Number::int(1).added_to(&Number::float(0.5)).value, Scalar::Float(1.5));
    }

    #[test]
    fn overflow_falls_back_to_float() {
        let result = Number::int(i64::MAX).added_to(&Number::int(1));
        assert!(matches!(result.value, Scalar::Float(_)));

        let negated = Number::int(i64::MIN).multed_by(&Number::int(-1));
        assert_eq!(negated.value, Scalar::Float(9.223372036854775808e18));
    }

    #[test]
    fn division_is_true_division() {
        assert_eq!(Number::int(7).dived_by(&Number::int(2)), Ok(Number::float(3.5)));
        assert_eq!(Number::int(6).dived_by(&Number::int(2)).map(|n| n.to_string()), Ok("3.0".to_string()));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(Number::int(7).dived_by(&Number::int(0)), Err(NumberError::DivisionByZero));
        assert_eq!(Number::int(7).dived_by(&Number::float(0.0)), Err(NumberError::DivisionByZero));
    }

    #[test]
    fn power_keeps_integers_for_non_negative_exponents() {
        assert_eq!(Number::int(2).powed_by(&Number::int(9)).value, Scalar::Int(512));
        assert_eq!(Number::int(2).powed_by(&Number::int(-1)).value, Scalar::Float(0.5));
        assert_eq!(Number::float(4.0).powed_by(&Number::float(0.5)).value, Scalar::Float(2.0));
    }

    #[test]
    fn comparisons_produce_zero_or_one() {
        assert_eq!(Number::int(5).comparison_eq(&Number::int(5)).value, Scalar::Int(1));
        assert_eq!(Number::int(5).comparison_ne(&Number::int(5)).value, Scalar::Int(0));
        assert_eq!(Number::int(1).comparison_eq(&Number::float(1.0)).value, Scalar::Int(1));
        assert_eq!(Number::int(2).comparison_lt(&Number::float(2.5)).value, Scalar::Int(1));
        assert_eq!(Number::int(3).comparison_gte(&Number::int(3)).value, Scalar::Int(1));
        assert_eq!(Number::int(3).comparison_lte(&Number::int(2)).value, Scalar::Int(0));
    }

    #[test]
    fn logic_is_truthy() {
        assert_eq!(Number::int(2).anded_by(&Number::int(3)).value, Scalar::Int(1));
        assert_eq!(Number::int(2).anded_by(&Number::int(0)).value, Scalar::Int(0));
        assert_eq!(Number::int(0).ored_by(&Number::float(0.5)).value, Scalar::Int(1));
        assert_eq!(Number::int(0).notted().value, Scalar::Int(1));
        assert_eq!(Number::float(-2.5).notted().value, Scalar::Int(0));
    }

    #[test]
    fn display_matches_literal_kind() {
        assert_eq!(Scalar::Int(5).to_string(), "5");
        assert_eq!(Scalar::Float(3.5).to_string(), "3.5");
        assert_eq!(Scalar::Float(3.0).to_string(), "3.0");
        assert_eq!(Scalar::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Scalar::Float(f64::NAN).to_string(), "nan");
    }

    #[test]
    fn large_and_tiny_floats_use_exponent_form() {
        assert_eq!(Scalar::Float(1e20).to_string(), "1e+20");
        assert_eq!(Scalar::Float(-2.5e16).to_string(), "-2.5e+16");
        assert_eq!(Scalar::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Scalar::Float(1e300).to_string(), "1e+300");

        assert_eq!(Scalar::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Scalar::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Scalar::Float(0.0).to_string(), "0.0");
        assert_eq!(Scalar::Float(-0.5).to_string(), "-0.5");
    }
}
