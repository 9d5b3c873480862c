//! Typed handles into program-owned storage.
//!
//! The runtime never stores raw pointers. Cells, scopes and runtime types are
//! addressed by small `Copy` handles that the owning program resolves.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity of one program-owned store: a static arena or a scope tree.
///
/// Every store draws a fresh id, so a [`CellId`] or [`ScopeId`] minted by one
/// program is rejected by every other program.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u32);

impl ArenaId {
    /// Owner of the sentinel scopes every tree shares. Never handed out by
    /// [`ArenaId::fresh`].
    pub const SHARED: ArenaId = ArenaId(0);

    /// Allocate a process-unique arena id.
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Stable address of a cell in a static arena.
///
/// Issued once by `StaticArena::allocate_cell` and valid for the arena's
/// whole lifetime; later allocations never move or invalidate it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellId {
    arena: ArenaId,
    index: u32,
}

impl CellId {
    #[inline]
    pub const fn new(arena: ArenaId, index: u32) -> Self {
        CellId { arena, index }
    }

    #[inline]
    pub const fn arena(self) -> ArenaId {
        self.arena
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

/// Target of a binding or a reference value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellRef {
    /// A static arena cell (declarations, constants, parameters).
    Static(CellId),
    /// A frame cell of the running interpreted call (parameters and locals).
    /// Released when the call returns.
    Frame(usize),
    /// An absolute operand stack index (native call arguments).
    ///
    /// Only meaningful while the stack is at least `index + 1` deep; readers
    /// treat a stale index as a null reference.
    Stack(usize),
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRef::Static(cell) => write!(f, "static#{}", cell.index),
            CellRef::Frame(index) => write!(f, "frame#{index}"),
            CellRef::Stack(index) => write!(f, "stack#{index}"),
        }
    }
}

/// Address of a scope in a program's scope tree.
///
/// Carries the id of the tree that issued it. The two sentinels exist in
/// every tree at fixed positions and are owned by [`ArenaId::SHARED`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId {
    tree: ArenaId,
    index: u32,
}

impl ScopeId {
    /// The sentinel scope named `#`. Its parent is itself.
    pub const UNDEFINED: ScopeId = ScopeId::new(ArenaId::SHARED, 0);
    /// The unparented root scope. Its parent is itself.
    pub const GLOBAL: ScopeId = ScopeId::new(ArenaId::SHARED, 1);

    #[inline]
    pub const fn new(tree: ArenaId, index: u32) -> Self {
        ScopeId { tree, index }
    }

    #[inline]
    pub const fn tree(self) -> ArenaId {
        self.tree
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

/// Unique id assigned to every class when it is defined.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuntimeTypeId(u32);

impl RuntimeTypeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        RuntimeTypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
