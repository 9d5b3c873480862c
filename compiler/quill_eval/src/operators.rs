//! Binary operator evaluation.
//!
//! Operands are unwrapped before any arithmetic happens: references are
//! followed, `Undefined` is rejected and `None` is the identity on either
//! side. What remains is dispatched on the left operand's kind, which also
//! fixes the result kind. Every dispatch is an exhaustive `match`, so a new
//! `Value` kind cannot slip past without a decision here.

use quill_ir::{BinaryOp, SlotReader, Value};

use crate::errors::{division_by_zero, not_implemented, undefined_value_operation};
use crate::memory::follow;
use crate::EvalResult;

/// A numeric right-hand operand, before conversion to the left kind.
#[derive(Copy, Clone, Debug)]
enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Right operands convert to the left operand's kind with `as` semantics"
)]
impl Number {
    fn as_i64(self) -> i64 {
        match self {
            Number::Int(n) => n,
            Number::UInt(n) => n as i64,
            Number::Float(f) => f as i64,
        }
    }

    fn as_u64(self) -> u64 {
        match self {
            Number::Int(n) => n as u64,
            Number::UInt(n) => n,
            Number::Float(f) => f as u64,
        }
    }

    fn as_u8(self) -> u8 {
        self.as_u64() as u8
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::UInt(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

/// Read an already unwrapped operand as a number.
fn number(value: &Value, op: BinaryOp) -> EvalResult<Number> {
    match value {
        Value::Int(n) => Ok(Number::Int(*n)),
        Value::UInt(n) => Ok(Number::UInt(*n)),
        Value::Float(f) => Ok(Number::Float(*f)),
        Value::Bool(b) => Ok(Number::Int(i64::from(*b))),
        Value::Byte(b) => Ok(Number::UInt(u64::from(*b))),
        Value::Undefined => Err(undefined_value_operation(op.as_symbol())),
        Value::Char(_)
        | Value::StrView(_)
        | Value::None
        | Value::Reference(_)
        | Value::Str(_)
        | Value::Scope(_)
        | Value::Object(_)
        | Value::Method(_)
        | Value::NativeMethod(_)
        | Value::List(_) => Err(not_implemented(op.as_symbol(), value.kind())),
    }
}

macro_rules! wrapping_binary {
    ($name:ident, $ty:ty) => {
        fn $name(a: $ty, b: $ty, op: BinaryOp) -> EvalResult<$ty> {
            match op {
                BinaryOp::Add => Ok(a.wrapping_add(b)),
                BinaryOp::Sub => Ok(a.wrapping_sub(b)),
                BinaryOp::Mul => Ok(a.wrapping_mul(b)),
                BinaryOp::Div if b == 0 => Err(division_by_zero()),
                BinaryOp::Div => Ok(a.wrapping_div(b)),
            }
        }
    };
}

wrapping_binary!(int_binary, i64);
wrapping_binary!(uint_binary, u64);
wrapping_binary!(byte_binary, u8);

/// IEEE semantics: division by zero yields an infinity or NaN.
fn float_binary(a: f64, b: f64, op: BinaryOp) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
    }
}

/// Evaluate `left op right`.
///
/// `slots` resolves the targets of `Reference` operands.
pub fn evaluate_binary<S>(left: &Value, right: &Value, op: BinaryOp, slots: &S) -> EvalResult
where
    S: SlotReader + ?Sized,
{
    let left = follow(left, slots)?;
    let right = follow(right, slots)?;

    if left.is_undefined() || right.is_undefined() {
        return Err(undefined_value_operation(op.as_symbol()));
    }
    match (left, right) {
        (Value::None, other) | (other, Value::None) => return Ok(other.clone()),
        _ => {}
    }

    match left {
        Value::Int(a) => int_binary(*a, number(right, op)?.as_i64(), op).map(Value::Int),
        Value::UInt(a) => uint_binary(*a, number(right, op)?.as_u64(), op).map(Value::UInt),
        Value::Byte(a) => byte_binary(*a, number(right, op)?.as_u8(), op).map(Value::Byte),
        Value::Float(a) => Ok(Value::Float(float_binary(
            *a,
            number(right, op)?.as_f64(),
            op,
        ))),
        Value::Bool(a) => {
            int_binary(i64::from(*a), number(right, op)?.as_i64(), op).map(|n| Value::Bool(n != 0))
        }
        Value::Char(_)
        | Value::StrView(_)
        | Value::None
        | Value::Undefined
        | Value::Reference(_)
        | Value::Str(_)
        | Value::Scope(_)
        | Value::Object(_)
        | Value::Method(_)
        | Value::NativeMethod(_)
        | Value::List(_) => Err(not_implemented(op.as_symbol(), left.kind())),
    }
}

/// Evaluate `target op= right`, replacing `target` with the result.
///
/// `target` is left untouched when evaluation fails.
pub fn evaluate_binary_in_place<S>(
    target: &mut Value,
    right: &Value,
    op: BinaryOp,
    slots: &S,
) -> EvalResult<()>
where
    S: SlotReader + ?Sized,
{
    *target = evaluate_binary(target, right, op, slots)?;
    Ok(())
}
