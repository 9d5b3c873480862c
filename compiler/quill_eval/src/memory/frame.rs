//! Frame cells: parameters and locals of interpreted calls.

use rustc_hash::FxHashSet;

use quill_ir::Value;

/// Cells owned by the active chain of interpreted calls.
///
/// Each call claims the cells above the length it saw on entry and truncates
/// back to it on return, so repeated calls reuse the same storage instead of
/// growing the static arena. Cells are addressed by `CellRef::Frame(index)`.
#[derive(Debug, Default)]
pub struct FrameCells {
    cells: Vec<Value>,
    constants: FxHashSet<usize>,
}

impl FrameCells {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn allocate(&mut self, value: Value) -> usize {
        self.cells.push(value);
        self.cells.len() - 1
    }

    pub fn allocate_constant(&mut self, value: Value) -> usize {
        let index = self.allocate(value);
        self.constants.insert(index);
        index
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }

    /// Mutable access without the constant check.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.cells.get_mut(index)
    }

    pub fn is_constant(&self, index: usize) -> bool {
        self.constants.contains(&index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.cells
    }

    /// Release every cell at or above `len`.
    pub fn truncate(&mut self, len: usize) {
        self.cells.truncate(len);
        self.constants.retain(|&index| index < len);
    }
}
