//! Callable values: interpreted methods and native methods.

use std::fmt;
use std::sync::Arc;

use crate::{Action, Name, NamedSlotSet, ScopeId, SlotReader, Value};

/// An interpreted method.
///
/// `params` binds each parameter name to a static cell holding its default
/// (`Undefined` when the argument is required). `scope` is the lexical scope
/// the body resolves names against. The body is immutable and shared by
/// every copy of the method.
#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    name: Name,
    params: NamedSlotSet,
    scope: ScopeId,
    body: Arc<[Action]>,
}

impl Method {
    pub fn new(name: Name, params: NamedSlotSet, scope: ScopeId, body: Arc<[Action]>) -> Self {
        Method {
            name,
            params,
            scope,
            body,
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &NamedSlotSet {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    #[inline]
    pub fn body(&self) -> &[Action] {
        &self.body
    }

    /// Shared handle to the body, for running it while the method's cell
    /// may be overwritten.
    #[inline]
    pub fn shared_body(&self) -> Arc<[Action]> {
        Arc::clone(&self.body)
    }
}

/// Arguments handed to a native method.
///
/// Pairs the argument bindings with read access to the cells they name, so
/// a native reads its arguments in place without copying the operand stack.
pub struct CallArgs<'a> {
    slots: &'a NamedSlotSet,
    reader: &'a dyn SlotReader,
}

impl<'a> CallArgs<'a> {
    pub fn new(slots: &'a NamedSlotSet, reader: &'a dyn SlotReader) -> Self {
        CallArgs { slots, reader }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Argument bound to parameter `name`.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let reader = self.reader;
        let slot = self.slots.find(name).ok()?;
        reader.read_slot(slot.target())
    }

    /// Argument at `position`.
    pub fn get_index(&self, position: usize) -> Option<&'a Value> {
        let reader = self.reader;
        let slot = self.slots.get(position)?;
        reader.read_slot(slot.target())
    }

    #[inline]
    pub fn slots(&self) -> &'a NamedSlotSet {
        self.slots
    }
}

/// Fixed signature of every natively implemented method.
pub type NativeFn = fn(&CallArgs<'_>) -> Value;

/// A method implemented outside the interpreter.
#[derive(Clone)]
pub struct NativeMethod {
    name: Name,
    params: Vec<Name>,
    func: NativeFn,
}

impl NativeMethod {
    pub fn new(name: Name, params: Vec<Name>, func: NativeFn) -> Self {
        NativeMethod { name, params, func }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &[Name] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn call(&self, args: &CallArgs<'_>) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeMethod")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// Function pointers are not compared; two natives are equal when they are
// registered under the same name and signature.
impl PartialEq for NativeMethod {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}
