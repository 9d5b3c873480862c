//! Error types for action evaluation.
//!
//! The taxonomy is a flat [`ErrorCode`] enumeration. [`EvalError`] pairs a
//! code with a human-readable message; the `#[cold]` factory functions below
//! are the only places messages are spelled out.

use std::fmt;

use quill_ir::{CellRef, Name, ScopeId, SlotError, Value, ValueKind};

/// Result of an evaluation step.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Flat error taxonomy. Every performed action maps to exactly one code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,
    UndefinedValueOperation,
    NullReferenceOperation,
    VariableAlreadyDeclared,
    VariableNotDeclared,
    NotImplemented,
    ScopeNotDeclared,
    ScopeRedefinition,
    ConstantAssignment,
    DivisionByZero,
    TypeMismatch,
    NotCallable,
    ArityMismatch,
    RecursionLimitExceeded,
    StackUnderflow,
}

impl ErrorCode {
    /// Code of a result: `NoError` for `Ok`, the error's code otherwise.
    pub fn of<T>(result: &EvalResult<T>) -> ErrorCode {
        match result {
            Ok(_) => ErrorCode::NoError,
            Err(error) => error.code,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoError => "NoError",
            ErrorCode::UndefinedValueOperation => "UndefinedValueOperation",
            ErrorCode::NullReferenceOperation => "NullReferenceOperation",
            ErrorCode::VariableAlreadyDeclared => "VariableAlreadyDeclared",
            ErrorCode::VariableNotDeclared => "VariableNotDeclared",
            ErrorCode::NotImplemented => "NotImplemented",
            ErrorCode::ScopeNotDeclared => "ScopeNotDeclared",
            ErrorCode::ScopeRedefinition => "ScopeRedefinition",
            ErrorCode::ConstantAssignment => "ConstantAssignment",
            ErrorCode::DivisionByZero => "DivisionByZero",
            ErrorCode::TypeMismatch => "TypeMismatch",
            ErrorCode::NotCallable => "NotCallable",
            ErrorCode::ArityMismatch => "ArityMismatch",
            ErrorCode::RecursionLimitExceeded => "RecursionLimitExceeded",
            ErrorCode::StackUnderflow => "StackUnderflow",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub code: ErrorCode,
    pub message: String,
}

impl EvalError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EvalError {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for EvalError {}

impl From<SlotError> for EvalError {
    fn from(error: SlotError) -> Self {
        match error {
            SlotError::AlreadyPresent(name) => variable_already_declared(&name),
            SlotError::Missing(name) => variable_not_declared(name.as_str()),
        }
    }
}

// Operand errors

#[cold]
pub fn undefined_value_operation(op: &str) -> EvalError {
    EvalError::new(
        ErrorCode::UndefinedValueOperation,
        format!("undefined value used as operand of `{op}`"),
    )
}

#[cold]
pub fn null_reference_operation() -> EvalError {
    EvalError::new(
        ErrorCode::NullReferenceOperation,
        "dereferenced a null reference",
    )
}

#[cold]
pub fn dangling_reference(target: CellRef) -> EvalError {
    EvalError::new(
        ErrorCode::NullReferenceOperation,
        format!("reference to {target} does not address a live cell"),
    )
}

#[cold]
pub fn reference_chain_too_long(hops: usize) -> EvalError {
    EvalError::new(
        ErrorCode::NullReferenceOperation,
        format!("reference chain exceeds {hops} hops"),
    )
}

#[cold]
pub fn not_implemented(op: &str, kind: ValueKind) -> EvalError {
    EvalError::new(
        ErrorCode::NotImplemented,
        format!("operator `{op}` is not implemented for {kind}"),
    )
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(ErrorCode::DivisionByZero, "integer division by zero")
}

#[cold]
pub fn type_mismatch(expected: &str, got: ValueKind) -> EvalError {
    EvalError::new(
        ErrorCode::TypeMismatch,
        format!("expected {expected}, found {got}"),
    )
}

// Declaration errors

#[cold]
pub fn variable_already_declared(name: &Name) -> EvalError {
    EvalError::new(
        ErrorCode::VariableAlreadyDeclared,
        format!("`{name}` is already declared in this scope"),
    )
}

#[cold]
pub fn variable_not_declared(name: &str) -> EvalError {
    EvalError::new(
        ErrorCode::VariableNotDeclared,
        format!("`{name}` is not declared"),
    )
}

#[cold]
pub fn scope_not_declared(name: &str) -> EvalError {
    EvalError::new(
        ErrorCode::ScopeNotDeclared,
        format!("no namespace or class named `{name}` is visible"),
    )
}

#[cold]
pub fn foreign_scope(scope: ScopeId) -> EvalError {
    EvalError::new(
        ErrorCode::ScopeNotDeclared,
        format!("scope #{} was not issued by this program", scope.index()),
    )
}

#[cold]
pub fn scope_redefinition(name: &Name, existing: &str) -> EvalError {
    EvalError::new(
        ErrorCode::ScopeRedefinition,
        format!("`{name}` is already defined as a {existing}"),
    )
}

#[cold]
pub fn not_a_class(name: &str, kind: &str) -> EvalError {
    EvalError::new(
        ErrorCode::TypeMismatch,
        format!("`{name}` is a {kind}, not a class"),
    )
}

#[cold]
pub fn constant_assignment(target: CellRef) -> EvalError {
    EvalError::new(
        ErrorCode::ConstantAssignment,
        format!("cell {target} holds a constant"),
    )
}

// Call errors

#[cold]
pub fn not_callable(kind: ValueKind) -> EvalError {
    EvalError::new(ErrorCode::NotCallable, format!("{kind} is not callable"))
}

#[cold]
pub fn arity_mismatch(name: &Name, expected: usize, got: usize) -> EvalError {
    EvalError::new(
        ErrorCode::ArityMismatch,
        format!("`{name}` takes {expected} argument(s), {got} supplied"),
    )
}

#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::new(
        ErrorCode::RecursionLimitExceeded,
        format!("call depth limit of {limit} exceeded"),
    )
}

// Malformed blocks

#[cold]
pub fn stack_underflow(action: &str, needed: usize, depth: usize) -> EvalError {
    EvalError::new(
        ErrorCode::StackUnderflow,
        format!("{action} needs {needed} operand(s), stack holds {depth}"),
    )
}

#[cold]
pub fn zero_stack_offset(action: &str) -> EvalError {
    EvalError::new(
        ErrorCode::StackUnderflow,
        format!("{action} offsets count from 1 at the top"),
    )
}
