//! Operand stack: transient evaluation values.

use quill_ir::Value;

use crate::EvalResult;

/// Resizable evaluation stack, after the classic bytecode operand stack.
///
/// Offsets count from the end: offset 1 is the top. Every access assumes the
/// caller validated the depth; underflow is a contract violation and panics.
/// The interpreter checks each action's operand arity before performing it.
///
/// The `*_op` methods hand their closure the part of the stack below the
/// operands, so references into the stack stay readable while it is being
/// mutated. The stack only changes when the closure succeeds.
#[derive(Debug, Default)]
pub struct OperandStack {
    values: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OperandStack {
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Absolute index lookup, for stack references.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[track_caller]
    fn require(&self, depth: usize) {
        assert!(
            self.values.len() >= depth,
            "operand stack underflow: need {depth}, have {}",
            self.values.len()
        );
    }

    #[track_caller]
    fn position(&self, offset: usize) -> usize {
        assert!(offset >= 1, "operand stack offsets start at 1");
        self.require(offset);
        self.values.len() - offset
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Discard the top.
    #[track_caller]
    pub fn pop(&mut self) {
        self.require(1);
        self.values.truncate(self.values.len() - 1);
    }

    /// Remove and return the top.
    #[track_caller]
    pub fn pop_and_take(&mut self) -> Value {
        self.require(1);
        let top = self.values.len() - 1;
        self.values.swap_remove(top)
    }

    #[track_caller]
    pub fn top(&self) -> &Value {
        self.top_at(1)
    }

    #[track_caller]
    pub fn top_at(&self, offset: usize) -> &Value {
        &self.values[self.position(offset)]
    }

    #[track_caller]
    pub fn top_mut(&mut self) -> &mut Value {
        self.top_at_mut(1)
    }

    #[track_caller]
    pub fn top_at_mut(&mut self, offset: usize) -> &mut Value {
        let position = self.position(offset);
        &mut self.values[position]
    }

    /// Push a deep copy of the element at `offset`.
    #[track_caller]
    pub fn push_copy_of(&mut self, offset: usize) {
        let copy = self.values[self.position(offset)].clone();
        self.values.push(copy);
    }

    /// Exchange the top with the element at `offset`.
    #[track_caller]
    pub fn swap(&mut self, offset: usize) {
        let other = self.position(offset);
        let top = self.values.len() - 1;
        self.values.swap(top, other);
    }

    /// Shrink the stack to `len` elements.
    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }

    /// Replace the top with `f(top)`.
    #[track_caller]
    pub fn unary_op<F>(&mut self, f: F) -> EvalResult<()>
    where
        F: FnOnce(&[Value], &Value) -> EvalResult<Value>,
    {
        self.require(1);
        let Some((top, rest)) = self.values.split_last_mut() else {
            unreachable!("depth checked above");
        };
        let result = f(rest, top)?;
        *top = result;
        Ok(())
    }

    /// Pop rhs then lhs and push `f(lhs, rhs)`.
    #[track_caller]
    pub fn binary_op<F>(&mut self, f: F) -> EvalResult<()>
    where
        F: FnOnce(&[Value], &Value, &Value) -> EvalResult<Value>,
    {
        self.require(2);
        let split = self.values.len() - 2;
        let (rest, operands) = self.values.split_at(split);
        let result = f(rest, &operands[0], &operands[1])?;
        self.values.truncate(split);
        self.values.push(result);
        Ok(())
    }

    /// Pop rhs and let `f` update the new top in place.
    #[track_caller]
    pub fn in_place_binary_op<F>(&mut self, f: F) -> EvalResult<()>
    where
        F: FnOnce(&[Value], &mut Value, &Value) -> EvalResult<()>,
    {
        self.require(2);
        let split = self.values.len() - 2;
        let (rest, operands) = self.values.split_at_mut(split);
        let (lhs, rhs) = operands.split_at_mut(1);
        f(rest, &mut lhs[0], &rhs[0])?;
        self.values.truncate(split + 1);
        Ok(())
    }
}
