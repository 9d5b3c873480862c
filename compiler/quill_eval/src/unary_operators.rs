//! Unary operator evaluation.

use quill_ir::{SlotReader, UnaryOp, Value};

use crate::errors::{not_implemented, undefined_value_operation};
use crate::memory::follow;
use crate::EvalResult;

/// Evaluate `op value`, following references first.
///
/// `None` negates to `None`. Unsigned kinds negate with wrapping, and
/// booleans negate as logical not.
pub fn evaluate_unary<S>(value: &Value, op: UnaryOp, slots: &S) -> EvalResult
where
    S: SlotReader + ?Sized,
{
    let value = follow(value, slots)?;
    match (value, op) {
        (Value::Undefined, _) => Err(undefined_value_operation(op.as_symbol())),
        (Value::None, UnaryOp::Negate) => Ok(Value::None),
        (Value::Int(n), UnaryOp::Negate) => Ok(Value::Int(n.wrapping_neg())),
        (Value::UInt(n), UnaryOp::Negate) => Ok(Value::UInt(n.wrapping_neg())),
        (Value::Byte(n), UnaryOp::Negate) => Ok(Value::Byte(n.wrapping_neg())),
        (Value::Float(f), UnaryOp::Negate) => Ok(Value::Float(-f)),
        (Value::Bool(b), UnaryOp::Negate) => Ok(Value::Bool(!b)),
        (
            Value::Char(_)
            | Value::StrView(_)
            | Value::Reference(_)
            | Value::Str(_)
            | Value::Scope(_)
            | Value::Object(_)
            | Value::Method(_)
            | Value::NativeMethod(_)
            | Value::List(_),
            UnaryOp::Negate,
        ) => Err(not_implemented(op.as_symbol(), value.kind())),
    }
}
