//! Static arena: program-lifetime cells.

use rustc_hash::FxHashSet;

use quill_ir::{ArenaId, CellId, Value};

/// Backing store for every declaration with program lifetime: variables,
/// namespace and class statics, class instance templates, parameter
/// defaults and constants. Declarations made inside a running call go to
/// `FrameCells` instead.
///
/// Cells are addressed by [`CellId`] handles. A handle is an index that the
/// arena never reuses or moves, so it stays valid however many cells are
/// allocated afterwards. There is no per-cell deallocation; all cells are
/// released together when the arena is dropped with its program.
#[derive(Debug)]
pub struct StaticArena {
    id: ArenaId,
    cells: Vec<Value>,
    constants: FxHashSet<usize>,
}

impl StaticArena {
    pub fn new() -> Self {
        StaticArena {
            id: ArenaId::fresh(),
            cells: Vec::new(),
            constants: FxHashSet::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Allocate an uninitialized cell.
    pub fn allocate_cell(&mut self) -> CellId {
        self.allocate(Value::Undefined)
    }

    /// Allocate a cell holding `value`.
    pub fn allocate(&mut self, value: Value) -> CellId {
        let index = u32::try_from(self.cells.len())
            .unwrap_or_else(|_| panic!("static arena exceeded {} cells", u32::MAX));
        self.cells.push(value);
        CellId::new(self.id, index)
    }

    /// Allocate a read-only cell holding `value`.
    pub fn allocate_constant(&mut self, value: Value) -> CellId {
        let cell = self.allocate(value);
        self.constants.insert(cell.index());
        cell
    }

    /// The cell addressed by `cell`, or `None` for a handle minted by
    /// another arena.
    pub fn get(&self, cell: CellId) -> Option<&Value> {
        if cell.arena() != self.id {
            return None;
        }
        self.cells.get(cell.index())
    }

    /// Mutable access without the constant check. Writers that honor
    /// constness go through `Memory::write`.
    pub fn get_mut(&mut self, cell: CellId) -> Option<&mut Value> {
        if cell.arena() != self.id {
            return None;
        }
        self.cells.get_mut(cell.index())
    }

    pub fn is_constant(&self, cell: CellId) -> bool {
        cell.arena() == self.id && self.constants.contains(&cell.index())
    }
}

impl Default for StaticArena {
    fn default() -> Self {
        Self::new()
    }
}
