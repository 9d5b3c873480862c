//! Tests for unary operator evaluation.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use crate::errors::ErrorCode;
use crate::memory::Memory;
use crate::unary_operators::evaluate_unary;
use pretty_assertions::assert_eq;
use quill_ir::{CellRef, UnaryOp, Value};

fn negate(value: Value) -> Value {
    evaluate_unary(&value, UnaryOp::Negate, &Memory::default()).unwrap()
}

fn negate_code(value: Value) -> ErrorCode {
    evaluate_unary(&value, UnaryOp::Negate, &Memory::default())
        .unwrap_err()
        .code
}

#[test]
fn numeric_negation() {
    assert_eq!(negate(Value::int(5)), Value::int(-5));
    assert_eq!(negate(Value::float(1.5)), Value::float(-1.5));
    assert_eq!(negate(Value::int(i64::MIN)), Value::int(i64::MIN));
    assert_eq!(negate(Value::uint(1)), Value::uint(u64::MAX));
    assert_eq!(negate(Value::Byte(1)), Value::Byte(255));
}

#[test]
fn bool_negation_is_logical_not() {
    assert_eq!(negate(Value::Bool(true)), Value::Bool(false));
    assert_eq!(negate(Value::Bool(false)), Value::Bool(true));
}

#[test]
fn none_stays_none() {
    assert_eq!(negate(Value::None), Value::None);
}

#[test]
fn invalid_operands() {
    assert_eq!(negate_code(Value::Undefined), ErrorCode::UndefinedValueOperation);
    assert_eq!(negate_code(Value::Char('x')), ErrorCode::NotImplemented);
    assert_eq!(negate_code(Value::string("x")), ErrorCode::NotImplemented);
    assert_eq!(negate_code(Value::list(vec![])), ErrorCode::NotImplemented);
    assert_eq!(negate_code(Value::null_reference()), ErrorCode::NullReferenceOperation);
}

#[test]
fn references_are_followed() {
    let mut memory = Memory::default();
    let cell = CellRef::Static(memory.arena.allocate(Value::int(9)));
    assert_eq!(
        evaluate_unary(&Value::reference(cell), UnaryOp::Negate, &memory).unwrap(),
        Value::int(-9)
    );
}
