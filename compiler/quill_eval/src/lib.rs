//! Quill Eval - action interpreter and program runtime.
//!
//! # Architecture
//!
//! - `Program`: owns memory, the scope tree and the return slot; entry point
//!   is [`Program::run`]
//! - `Memory`: a `StaticArena` for program-lifetime cells, `FrameCells`
//!   for the parameters and locals of running calls, and an `OperandStack`
//!   for intermediate values
//! - `ScopeTree`: namespaces, classes and call scopes with parent-chain
//!   resolution
//! - `Interpreter`: performs `Action` blocks through the [`Perform`] trait
//! - `evaluate_binary` / `evaluate_unary`: enum dispatch over `Value` kinds
//!
//! # Re-exports
//!
//! The data model comes from `quill_ir` and is re-exported here:
//! `Value`, `Action`, `Name`, handles and slot types.

pub mod errors;
mod eval_mode;
mod format;
pub mod interpreter;
pub mod memory;
mod operators;
mod print_handler;
mod program;
pub mod scopes;
mod tracing_setup;
mod unary_operators;

pub use quill_ir::{
    Action, BinaryOp, CallArgs, CellId, CellRef, Name, NamedSlot, NamedSlotSet, NativeFn, Object,
    Operand, Parameter, RuntimeTypeId, ScopeId, ScopeKind, UnaryOp, Value, ValueKind,
};

pub use errors::{ErrorCode, EvalError, EvalResult};
pub use eval_mode::EvalMode;
pub use format::format_value;
pub use interpreter::{ActionFailure, Flow, Interpreter, Perform};
pub use memory::{follow, FrameCells, Memory, MemoryView, OperandStack, StaticArena};
pub use operators::{evaluate_binary, evaluate_binary_in_place};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use program::{Program, ProgramBuilder, DEFAULT_STACK_CAPACITY};
pub use scopes::ScopeTree;
pub use tracing_setup::init_tracing;
pub use unary_operators::evaluate_unary;

#[cfg(test)]
mod tests;
