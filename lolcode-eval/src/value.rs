//! The dynamic value model and its typecast lattice.
//!
//! A `Value` is a tagged variant the same way the language itself is
//! dynamically typed; every arithmetic and comparison operator lifts its
//! operands into a common domain by calling into this module rather than
//! by matching ad hoc in the interpreter.

use std::fmt;
use std::rc::Rc;

use lolcode_par::ast::{Expr, Stmt, TypeKeyword};
use lolcode_util::{LolError, LolResult};

use crate::scope::ContextId;

/// A LOLCODE number, witness-tagged so arithmetic can tell whether it
/// started life as a `NUMBR` or a `NUMBAR`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Integer(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

/// A user-defined function: its signature, body, and the context it
/// closes over. Free variables inside the body resolve through `captured`,
/// never through the caller's context.
#[derive(Debug)]
pub struct FunctionData {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub return_expr: Option<Expr>,
    pub captured: ContextId,
}

#[derive(Debug, Clone)]
pub enum Value {
    Number(Number),
    String(String),
    Boolean(bool),
    Noob,
    Function(Rc<FunctionData>),
}

impl Value {
    pub fn integer(i: i64) -> Value {
        Value::Number(Number::Integer(i))
    }

    pub fn float(f: f64) -> Value {
        Value::Number(Number::Float(f))
    }

    /// The text `VISIBLE`/`SMOOSH` emit for this value — distinct from
    /// `cast_to(Yarn, ..)`, since e.g. `NOOB`'s printable form is the
    /// literal text `NOOB` while an explicit cast to `YARN` yields `""`.
    pub fn printable(&self) -> String {
        match self {
            Value::Number(Number::Integer(i)) => i.to_string(),
            Value::Number(Number::Float(f)) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::Boolean(true) => "WIN".to_string(),
            Value::Boolean(false) => "FAIL".to_string(),
            Value::Noob => "NOOB".to_string(),
            Value::Function(f) => f.name.clone(),
        }
    }

    /// Implicit cast to `Boolean`, the domain every boolean operator
    /// operates in. A live `Function` value is always truthy.
    pub fn to_boolean(&self, _line: u32) -> LolResult<bool> {
        Ok(match self {
            Value::Number(n) => !n.is_zero(),
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Noob => false,
            Value::Function(_) => true,
        })
    }

    /// Implicit cast to `Number`, the domain every arithmetic operator
    /// operates in. Preserves integer-vs-float kind so the caller can
    /// decide whether the overall operation stays integral.
    pub fn to_number(&self, line: u32) -> LolResult<Number> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(s) => parse_number_from_string(s, line),
            Value::Boolean(b) => Ok(Number::Integer(if *b { 1 } else { 0 })),
            Value::Noob => Err(LolError::runtime(
                "NOOB",
                line,
                "Cannot Cast NOOB to Number Implicitly",
            )),
            Value::Function(f) => Err(LolError::runtime(
                f.name.clone(),
                line,
                "Cannot Use Function In Arithmetic Expression",
            )),
        }
    }

    /// The full implicit/explicit typecast lattice. `explicit` selects
    /// between the `typecast`/`explicit_typecast` rows (e.g. `NUMBR` →
    /// `NUMBAR` is only legal when explicit).
    pub fn cast_to(&self, target: TypeKeyword, explicit: bool, line: u32) -> LolResult<Value> {
        if let Value::Function(_) = self {
            // Opaque: any cast of a function value succeeds as identity.
            return Ok(self.clone());
        }

        match (self, target) {
            (Value::Number(Number::Integer(_)), TypeKeyword::Numbr) => Ok(self.clone()),
            (Value::Number(Number::Integer(i)), TypeKeyword::Numbar) => {
                require_explicit(explicit, "NUMBR", "NUMBAR", line)?;
                Ok(Value::float(*i as f64))
            }
            (Value::Number(Number::Integer(i)), TypeKeyword::Troof) => {
                Ok(Value::Boolean(*i != 0))
            }
            (Value::Number(Number::Integer(i)), TypeKeyword::Yarn) => {
                Ok(Value::String(i.to_string()))
            }

            (Value::Number(Number::Float(f)), TypeKeyword::Numbr) => {
                require_explicit(explicit, "NUMBAR", "NUMBR", line)?;
                Ok(Value::integer(f.trunc() as i64))
            }
            (Value::Number(Number::Float(_)), TypeKeyword::Numbar) => Ok(self.clone()),
            (Value::Number(Number::Float(f)), TypeKeyword::Troof) => {
                Ok(Value::Boolean(*f != 0.0))
            }
            (Value::Number(Number::Float(f)), TypeKeyword::Yarn) => {
                Ok(Value::String(format_float(*f)))
            }

            (Value::Boolean(b), TypeKeyword::Numbr) => Ok(Value::integer(if *b { 1 } else { 0 })),
            (Value::Boolean(b), TypeKeyword::Numbar) => {
                Ok(Value::float(if *b { 1.0 } else { 0.0 }))
            }
            (Value::Boolean(_), TypeKeyword::Troof) => Ok(self.clone()),
            (Value::Boolean(b), TypeKeyword::Yarn) => {
                Ok(Value::String(if *b { "WIN" } else { "FAIL" }.to_string()))
            }

            (Value::String(s), TypeKeyword::Numbr) => {
                if is_integer_shaped(s) {
                    s.parse::<i64>()
                        .map(Value::integer)
                        .map_err(|_| malformed_number_error(s, line))
                } else {
                    Err(malformed_number_error(s, line))
                }
            }
            (Value::String(s), TypeKeyword::Numbar) => {
                if is_float_shaped(s) {
                    s.parse::<f64>()
                        .map(Value::float)
                        .map_err(|_| malformed_number_error(s, line))
                } else {
                    Err(malformed_number_error(s, line))
                }
            }
            (Value::String(s), TypeKeyword::Troof) => Ok(Value::Boolean(!s.is_empty())),
            (Value::String(_), TypeKeyword::Yarn) => Ok(self.clone()),

            (Value::Noob, TypeKeyword::Numbr) => {
                require_explicit(explicit, "NOOB", "NUMBR", line)?;
                Ok(Value::integer(0))
            }
            (Value::Noob, TypeKeyword::Numbar) => {
                require_explicit(explicit, "NOOB", "NUMBAR", line)?;
                Ok(Value::float(0.0))
            }
            (Value::Noob, TypeKeyword::Troof) => Ok(Value::Boolean(false)),
            (Value::Noob, TypeKeyword::Yarn) => {
                require_explicit(explicit, "NOOB", "YARN", line)?;
                Ok(Value::String(String::new()))
            }

            (Value::Function(_), _) => unreachable!("handled by the identity shortcut above"),
        }
    }
}

fn require_explicit(explicit: bool, from: &str, to: &str, line: u32) -> LolResult<()> {
    if explicit {
        Ok(())
    } else {
        Err(LolError::runtime(
            from,
            line,
            format!("Cannot Implicitly Cast {} to {}", from, to),
        ))
    }
}

fn malformed_number_error(lexeme: &str, line: u32) -> LolError {
    LolError::runtime(lexeme, line, "Cannot Cast String to Number")
}

fn parse_number_from_string(s: &str, line: u32) -> LolResult<Number> {
    if is_integer_shaped(s) {
        s.parse::<i64>()
            .map(Number::Integer)
            .map_err(|_| malformed_number_error(s, line))
    } else if is_float_shaped(s) {
        s.parse::<f64>()
            .map(Number::Float)
            .map_err(|_| malformed_number_error(s, line))
    } else {
        Err(malformed_number_error(s, line))
    }
}

/// `^-?\d+$`
fn is_integer_shaped(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `^-?\d*\.\d*$`
fn is_float_shaped(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    match s.split_once('.') {
        Some((int_part, frac_part)) => {
            int_part.bytes().all(|b| b.is_ascii_digit())
                && frac_part.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Truncates (never rounds) to two decimals: `int(x * 100) / 100`.
fn format_float(x: f64) -> String {
    let truncated = (x * 100.0).trunc() / 100.0;
    let mut s = format!("{}", truncated);
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// Python-style modulo: result takes the sign of the divisor, unlike
/// Rust's `%`, matching the reference interpreter's `self.value % other.value`.
fn py_mod_i64(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

fn py_mod_f64(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

/// Lifts `self` and `other` to `Number`, then joins the two magnitudes with
/// `op`. Integer arithmetic stays integral unless either operand was
/// already a float, matching the reference's Python semantics where `/`
/// always produces a float but every other operator preserves kind.
fn lift_numeric(
    lhs: &Value,
    rhs: &Value,
    line: u32,
    op: impl FnOnce(f64, f64) -> f64,
    int_op: impl FnOnce(i64, i64) -> Option<i64>,
) -> LolResult<Value> {
    let l = lhs.to_number(line)?;
    let r = rhs.to_number(line)?;
    match (l, r) {
        (Number::Integer(a), Number::Integer(b)) => match int_op(a, b) {
            Some(v) => Ok(Value::integer(v)),
            None => Ok(Value::float(op(a as f64, b as f64))),
        },
        _ => Ok(Value::float(op(l.as_f64(), r.as_f64()))),
    }
}

impl Value {
    pub fn add(&self, other: &Value, line: u32) -> LolResult<Value> {
        lift_numeric(self, other, line, |a, b| a + b, |a, b| a.checked_add(b))
    }

    pub fn subtract(&self, other: &Value, line: u32) -> LolResult<Value> {
        lift_numeric(self, other, line, |a, b| a - b, |a, b| a.checked_sub(b))
    }

    pub fn multiply(&self, other: &Value, line: u32) -> LolResult<Value> {
        lift_numeric(self, other, line, |a, b| a * b, |a, b| a.checked_mul(b))
    }

    pub fn divide(&self, other: &Value, line: u32) -> LolResult<Value> {
        let r = other.to_number(line)?;
        if r.is_zero() {
            return Err(LolError::runtime(other.printable(), line, "Division by Zero"));
        }
        let l = self.to_number(line)?;
        match (l, r) {
            (Number::Integer(a), Number::Integer(b)) if a % b == 0 => Ok(Value::integer(a / b)),
            _ => Ok(Value::float(l.as_f64() / r.as_f64())),
        }
    }

    pub fn modulo(&self, other: &Value, line: u32) -> LolResult<Value> {
        let r = other.to_number(line)?;
        if r.is_zero() {
            return Err(LolError::runtime(other.printable(), line, "Division by Zero"));
        }
        let l = self.to_number(line)?;
        match (l, r) {
            (Number::Integer(a), Number::Integer(b)) => Ok(Value::integer(py_mod_i64(a, b))),
            _ => Ok(Value::float(py_mod_f64(l.as_f64(), r.as_f64()))),
        }
    }

    pub fn max(&self, other: &Value, line: u32) -> LolResult<Value> {
        let l = self.to_number(line)?;
        let r = other.to_number(line)?;
        if l.as_f64() >= r.as_f64() {
            Ok(Value::Number(l))
        } else {
            Ok(Value::Number(r))
        }
    }

    pub fn min(&self, other: &Value, line: u32) -> LolResult<Value> {
        let l = self.to_number(line)?;
        let r = other.to_number(line)?;
        if l.as_f64() <= r.as_f64() {
            Ok(Value::Number(l))
        } else {
            Ok(Value::Number(r))
        }
    }

    pub fn and(&self, other: &Value, line: u32) -> LolResult<Value> {
        Ok(Value::Boolean(self.to_boolean(line)? && other.to_boolean(line)?))
    }

    pub fn or(&self, other: &Value, line: u32) -> LolResult<Value> {
        Ok(Value::Boolean(self.to_boolean(line)? || other.to_boolean(line)?))
    }

    pub fn xor(&self, other: &Value, line: u32) -> LolResult<Value> {
        Ok(Value::Boolean(self.to_boolean(line)? ^ other.to_boolean(line)?))
    }

    pub fn not(&self, line: u32) -> LolResult<Value> {
        Ok(Value::Boolean(!self.to_boolean(line)?))
    }

    /// `BOTH SAEM`: casts `other` to `self`'s type, then compares the
    /// underlying magnitude. Numbers compare by numeric value across the
    /// integer/float witness so `BOTH SAEM 3 AN 3.0` holds.
    pub fn is_equal(&self, other: &Value, line: u32) -> LolResult<bool> {
        match self {
            Value::Number(n) => {
                let other_n = other.to_number(line)?;
                Ok(n.as_f64() == other_n.as_f64())
            }
            Value::String(s) => {
                let other_s = other.cast_to(TypeKeyword::Yarn, false, line)?;
                match other_s {
                    Value::String(o) => Ok(*s == o),
                    _ => unreachable!("cast_to(Yarn) always yields a String"),
                }
            }
            Value::Boolean(b) => {
                let other_b = other.to_boolean(line)?;
                Ok(*b == other_b)
            }
            Value::Noob => Ok(matches!(other, Value::Noob)),
            Value::Function(f) => match other {
                Value::Function(g) => Ok(Rc::ptr_eq(f, g)),
                _ => Ok(false),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.printable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_to_boolean_is_nonzero() {
        assert!(Value::integer(1).to_boolean(1).unwrap());
        assert!(!Value::integer(0).to_boolean(1).unwrap());
    }

    #[test]
    fn string_to_number_parses_integer_shaped_text() {
        let n = Value::String("10".to_string()).to_number(1).unwrap();
        assert_eq!(n, Number::Integer(10));
    }

    #[test]
    fn string_to_number_rejects_non_numeric_text() {
        assert!(Value::String("abc".to_string()).to_number(1).is_err());
    }

    #[test]
    fn noob_to_number_is_a_runtime_error() {
        assert!(Value::Noob.to_number(1).is_err());
    }

    #[test]
    fn float_printable_form_truncates_to_two_decimals() {
        assert_eq!(Value::float(3.14159).printable(), "3.14");
    }

    #[test]
    fn noob_printable_form_is_the_word_noob() {
        assert_eq!(Value::Noob.printable(), "NOOB");
    }

    #[test]
    fn explicit_cast_of_noob_to_yarn_is_empty_string() {
        let cast = Value::Noob.cast_to(TypeKeyword::Yarn, true, 1).unwrap();
        assert_eq!(cast.printable(), "");
    }

    #[test]
    fn implicit_cast_of_noob_to_yarn_is_an_error() {
        assert!(Value::Noob.cast_to(TypeKeyword::Yarn, false, 1).is_err());
    }

    #[test]
    fn boolean_casts_to_yarn_as_win_or_fail() {
        assert_eq!(
            Value::Boolean(true).cast_to(TypeKeyword::Yarn, true, 1).unwrap().printable(),
            "WIN"
        );
        assert_eq!(
            Value::Boolean(false).cast_to(TypeKeyword::Yarn, true, 1).unwrap().printable(),
            "FAIL"
        );
    }

    #[test]
    fn add_with_string_operand_casts_implicitly() {
        let sum = Value::String("10".to_string()).add(&Value::integer(5), 1).unwrap();
        assert_eq!(sum.printable(), "15");
    }

    #[test]
    fn add_of_two_integers_stays_integral() {
        let sum = Value::integer(3).add(&Value::integer(4), 1).unwrap();
        assert!(matches!(sum, Value::Number(Number::Integer(7))));
    }

    #[test]
    fn divide_by_zero_is_a_runtime_error() {
        let err = Value::integer(10).divide(&Value::integer(0), 2).unwrap_err();
        assert!(matches!(err, LolError::Runtime { .. }));
        assert_eq!(err.to_string(), "Runtime Error: '0' at line 2\nDetails: Division by Zero\n");
    }

    #[test]
    fn divide_produces_a_float_when_not_evenly_divisible() {
        let result = Value::integer(7).divide(&Value::integer(2), 1).unwrap();
        assert_eq!(result.printable(), "3.5");
    }

    #[test]
    fn xor_is_exclusive() {
        assert!(!Value::Boolean(true).xor(&Value::Boolean(true), 1).unwrap().to_boolean(1).unwrap());
        assert!(Value::Boolean(true).xor(&Value::Boolean(false), 1).unwrap().to_boolean(1).unwrap());
    }

    #[test]
    fn is_equal_compares_integer_and_float_by_magnitude() {
        assert!(Value::integer(3).is_equal(&Value::float(3.0), 1).unwrap());
    }

    #[test]
    fn is_equal_on_strings_is_exact() {
        assert!(Value::String("hi".into()).is_equal(&Value::String("hi".into()), 1).unwrap());
        assert!(!Value::String("hi".into()).is_equal(&Value::String("bye".into()), 1).unwrap());
    }

    #[test]
    fn modulo_takes_the_sign_of_the_divisor() {
        let result = Value::integer(-7).modulo(&Value::integer(3), 1).unwrap();
        assert_eq!(result.printable(), "2");
    }
}
