//! Quill IR - runtime data model and the action set.
//!
//! This crate holds everything the interpreter manipulates but nothing that
//! executes:
//!
//! - [`Value`]: the tagged runtime datum, with literal kinds held inline and
//!   heap kinds owned exclusively (cloning a `Value` deep-copies).
//! - [`NamedSlot`] / [`NamedSlotSet`]: name to cell bindings, used for scope
//!   declarations, class instance templates and call arguments.
//! - [`Scope`]: a declaration container addressed by [`ScopeId`].
//! - [`Action`]: one IR instruction. Interpreted methods own a body of actions,
//!   which is why values and actions live in the same crate.
//!
//! Memory is addressed through handles ([`CellId`], [`CellRef`], [`ScopeId`])
//! rather than pointers. Handles are plain data; the owning program validates
//! them on every access.

mod action;
mod handle;
mod name;
mod ops;
mod scope;
mod slots;
mod value;

pub use action::{Action, Operand, Parameter};
pub use handle::{ArenaId, CellId, CellRef, RuntimeTypeId, ScopeId};
pub use name::Name;
pub use ops::{BinaryOp, UnaryOp};
pub use scope::{ClassLayout, Scope, ScopeKind};
pub use slots::{NamedSlot, NamedSlotSet, SlotError, SlotReader};
pub use value::{CallArgs, Method, NativeFn, NativeMethod, Object, Value, ValueKind};
