//! Two-tier memory model.
//!
//! - [`StaticArena`]: cells with program lifetime and stable handles.
//! - [`OperandStack`]: transient intermediate values.
//!
//! [`FrameCells`] sits beside them and holds what interpreted calls bind,
//! for as long as the call runs. [`Memory`] owns one of each. [`MemoryView`] is the borrowed, read-only
//! form handed to operators and native methods while the operand stack is
//! mutably borrowed.

mod arena;
mod frame;
mod operand_stack;

pub use arena::StaticArena;
pub use frame::FrameCells;
pub use operand_stack::OperandStack;

use quill_ir::{CellRef, SlotReader, Value};

use crate::errors::{
    constant_assignment, dangling_reference, null_reference_operation, reference_chain_too_long,
};
use crate::EvalResult;

/// Longest reference chain `follow` walks before giving up.
pub const MAX_REFERENCE_HOPS: usize = 1 << 16;

/// Memory owned by one program.
#[derive(Debug, Default)]
pub struct Memory {
    pub arena: StaticArena,
    pub frame: FrameCells,
    pub stack: OperandStack,
}

impl Memory {
    pub fn with_stack_capacity(capacity: usize) -> Self {
        Memory {
            arena: StaticArena::new(),
            frame: FrameCells::new(),
            stack: OperandStack::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn view(&self) -> MemoryView<'_> {
        MemoryView::new(&self.arena, self.frame.as_slice(), self.stack.as_slice())
    }

    pub fn read(&self, target: CellRef) -> Option<&Value> {
        match target {
            CellRef::Static(cell) => self.arena.get(cell),
            CellRef::Frame(index) => self.frame.get(index),
            CellRef::Stack(index) => self.stack.get(index),
        }
    }

    /// Writable access to a cell. Constants and stale handles are refused.
    pub fn write(&mut self, target: CellRef) -> EvalResult<&mut Value> {
        match target {
            CellRef::Static(cell) if self.arena.is_constant(cell) => Err(constant_assignment(target)),
            CellRef::Static(cell) => self.arena.get_mut(cell).ok_or_else(|| dangling_reference(target)),
            CellRef::Frame(index) if self.frame.is_constant(index) => Err(constant_assignment(target)),
            CellRef::Frame(index) => self.frame.get_mut(index).ok_or_else(|| dangling_reference(target)),
            CellRef::Stack(index) => {
                if index >= self.stack.len() {
                    return Err(dangling_reference(target));
                }
                let offset = self.stack.len() - index;
                Ok(self.stack.top_at_mut(offset))
            }
        }
    }

    /// Follow references stored in cells, starting at `target`, to the cell
    /// that holds a non-reference value.
    pub fn resolve_target(&self, mut target: CellRef) -> EvalResult<CellRef> {
        for _ in 0..MAX_REFERENCE_HOPS {
            match self.read(target) {
                Some(Value::Reference(Some(next))) => target = *next,
                Some(Value::Reference(None)) => return Err(null_reference_operation()),
                Some(_) => return Ok(target),
                None => return Err(dangling_reference(target)),
            }
        }
        Err(reference_chain_too_long(MAX_REFERENCE_HOPS))
    }
}

impl SlotReader for Memory {
    fn read_slot(&self, target: CellRef) -> Option<&Value> {
        self.read(target)
    }
}

/// Read-only view of a program's memory.
///
/// `stack` may be a prefix of the operand stack; references past its end
/// read as dangling.
#[derive(Copy, Clone)]
pub struct MemoryView<'a> {
    arena: &'a StaticArena,
    frame: &'a [Value],
    stack: &'a [Value],
}

impl<'a> MemoryView<'a> {
    pub fn new(arena: &'a StaticArena, frame: &'a [Value], stack: &'a [Value]) -> Self {
        MemoryView {
            arena,
            frame,
            stack,
        }
    }
}

impl SlotReader for MemoryView<'_> {
    fn read_slot(&self, target: CellRef) -> Option<&Value> {
        match target {
            CellRef::Static(cell) => self.arena.get(cell),
            CellRef::Frame(index) => self.frame.get(index),
            CellRef::Stack(index) => self.stack.get(index),
        }
    }
}

/// Dereference `value` until it is not a `Reference`.
///
/// Fails with `NullReferenceOperation` on a null or dangling reference and
/// on chains longer than [`MAX_REFERENCE_HOPS`] (reference cycles).
pub fn follow<'v, S>(value: &'v Value, slots: &'v S) -> EvalResult<&'v Value>
where
    S: SlotReader + ?Sized,
{
    let mut current = value;
    for _ in 0..MAX_REFERENCE_HOPS {
        match current {
            Value::Reference(Some(target)) => {
                current = slots
                    .read_slot(*target)
                    .ok_or_else(|| dangling_reference(*target))?;
            }
            Value::Reference(None) => return Err(null_reference_operation()),
            _ => return Ok(current),
        }
    }
    Err(reference_chain_too_long(MAX_REFERENCE_HOPS))
}
