//! Name to cell bindings.
//!
//! A [`NamedSlot`] does not own the value it names; it holds a [`CellRef`]
//! into a static arena cell or an operand stack cell. [`NamedSlotSet`] is the
//! ordered, name-unique collection used for scope declarations, class
//! instance templates, method parameters and native call arguments.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{CellRef, Name, Value};

/// Read access to the cells a [`CellRef`] can address.
///
/// Implemented by the evaluator's memory. Returns `None` for a handle that
/// does not address a live cell, which callers report as a null reference.
pub trait SlotReader {
    fn read_slot(&self, target: CellRef) -> Option<&Value>;
}

/// A name bound to a cell stored elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedSlot {
    name: Name,
    target: CellRef,
}

impl NamedSlot {
    pub fn new(name: Name, target: CellRef) -> Self {
        NamedSlot { name, target }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn target(&self) -> CellRef {
        self.target
    }
}

/// Failure of a checked slot lookup or insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotError {
    /// `insert` found the name already bound.
    AlreadyPresent(Name),
    /// `find` found no binding for the name.
    Missing(Name),
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotError::AlreadyPresent(name) => write!(f, "`{name}` is already bound"),
            SlotError::Missing(name) => write!(f, "`{name}` is not bound"),
        }
    }
}

impl std::error::Error for SlotError {}

/// Ordered set of slots, unique by name.
///
/// Lookups go through an `FxHashMap` index; positional order is the
/// insertion order and survives removals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedSlotSet {
    slots: Vec<NamedSlot>,
    index: FxHashMap<Name, usize>,
}

impl NamedSlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Bind `name` to `target`. Fails if the name is already bound.
    pub fn insert(&mut self, name: Name, target: CellRef) -> Result<(), SlotError> {
        if self.index.contains_key(&name) {
            return Err(SlotError::AlreadyPresent(name));
        }
        self.index.insert(name.clone(), self.slots.len());
        self.slots.push(NamedSlot::new(name, target));
        Ok(())
    }

    /// Look up a slot by name.
    pub fn find(&self, name: &str) -> Result<&NamedSlot, SlotError> {
        self.index
            .get(name)
            .map(|&position| &self.slots[position])
            .ok_or_else(|| SlotError::Missing(Name::from(name)))
    }

    /// Look up a slot the caller has already proven present.
    ///
    /// Panics if `name` is not bound. Only call this after `contains` or
    /// `find` succeeded on the same code path.
    #[inline]
    pub fn find_unchecked(&self, name: &str) -> &NamedSlot {
        &self.slots[self.index[name]]
    }

    /// Positional lookup in insertion order.
    #[inline]
    pub fn get(&self, position: usize) -> Option<&NamedSlot> {
        self.slots.get(position)
    }

    /// Position of `name` in insertion order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Remove the binding for `name`, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<NamedSlot> {
        let position = self.index.remove(name)?;
        let slot = self.slots.remove(position);
        for later in self.index.values_mut() {
            if *later > position {
                *later -= 1;
            }
        }
        Some(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedSlot> {
        self.slots.iter()
    }
}
