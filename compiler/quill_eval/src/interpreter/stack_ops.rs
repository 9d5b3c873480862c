//! Operand stack plumbing and operators.

use quill_ir::{BinaryOp, UnaryOp, Value};

use super::{Flow, Interpreter};
use crate::errors::undefined_value_operation;
use crate::memory::{Memory, MemoryView};
use crate::operators::{evaluate_binary, evaluate_binary_in_place};
use crate::unary_operators::evaluate_unary;
use crate::EvalResult;

impl Interpreter<'_> {
    pub(super) fn push_literal(&mut self, value: &Value) -> EvalResult<Flow> {
        if value.is_undefined() {
            return Err(undefined_value_operation("push"));
        }
        self.program.memory.stack.push(value.clone());
        Ok(Flow::Continue)
    }

    pub(super) fn pop(&mut self) -> EvalResult<Flow> {
        self.program.memory.stack.pop();
        Ok(Flow::Continue)
    }

    pub(super) fn duplicate(&mut self, offset: usize) -> EvalResult<Flow> {
        self.program.memory.stack.push_copy_of(offset);
        Ok(Flow::Continue)
    }

    pub(super) fn swap(&mut self, offset: usize) -> EvalResult<Flow> {
        self.program.memory.stack.swap(offset);
        Ok(Flow::Continue)
    }

    /// Replace the top `len` elements with one list of their dereferenced
    /// copies, bottom element first.
    pub(super) fn build_list(&mut self, len: usize) -> EvalResult<Flow> {
        let base = self.program.memory.stack.len() - len;
        let items = self.program.memory.stack.as_slice()[base..]
            .iter()
            .map(|item| self.owned_value(item, "list"))
            .collect::<EvalResult<Vec<_>>>()?;
        let stack = &mut self.program.memory.stack;
        stack.truncate(base);
        stack.push(Value::list(items));
        Ok(Flow::Continue)
    }

    pub(super) fn unary(&mut self, op: UnaryOp) -> EvalResult<Flow> {
        let Memory { arena, frame, stack } = &mut self.program.memory;
        stack.unary_op(|rest, top| {
            evaluate_unary(top, op, &MemoryView::new(arena, frame.as_slice(), rest))
        })?;
        Ok(Flow::Continue)
    }

    pub(super) fn binary(&mut self, op: BinaryOp) -> EvalResult<Flow> {
        let Memory { arena, frame, stack } = &mut self.program.memory;
        stack.binary_op(|rest, lhs, rhs| {
            evaluate_binary(lhs, rhs, op, &MemoryView::new(arena, frame.as_slice(), rest))
        })?;
        Ok(Flow::Continue)
    }

    pub(super) fn binary_in_place(&mut self, op: BinaryOp) -> EvalResult<Flow> {
        let Memory { arena, frame, stack } = &mut self.program.memory;
        stack.in_place_binary_op(|rest, lhs, rhs| {
            evaluate_binary_in_place(lhs, rhs, op, &MemoryView::new(arena, frame.as_slice(), rest))
        })?;
        Ok(Flow::Continue)
    }
}
