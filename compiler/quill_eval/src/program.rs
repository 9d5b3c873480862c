//! Program: the unit of execution.
//!
//! A [`Program`] owns everything one execution touches: the static arena,
//! the operand stack, the scope tree with its Global scope, and the return
//! slot. Dropping the program releases all of it at once.

use std::mem;

use quill_ir::{
    Action, CellId, CellRef, Name, NativeFn, NativeMethod, RuntimeTypeId, ScopeId, Value,
};

use crate::errors::{dangling_reference, variable_already_declared};
use crate::interpreter::{ActionFailure, Interpreter};
use crate::memory::{Memory, OperandStack, StaticArena};
use crate::print_handler::SharedPrintHandler;
use crate::scopes::ScopeTree;
use crate::{EvalMode, EvalResult};

/// Operand stack capacity reserved up front by [`ProgramBuilder`].
pub const DEFAULT_STACK_CAPACITY: usize = 64;

pub struct Program {
    pub(crate) memory: Memory,
    pub(crate) scopes: ScopeTree,
    pub(crate) return_slot: Value,
    pub(crate) mode: EvalMode,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) call_depth: usize,
    next_type_id: u32,
}

impl Program {
    /// A program in `Interpret` mode printing to stdout.
    pub fn new() -> Self {
        ProgramBuilder::new().build()
    }

    pub fn builder() -> ProgramBuilder {
        ProgramBuilder::new()
    }

    /// Perform `actions` against the Global scope.
    ///
    /// Returns the value left in the return slot, or `Undefined` if no
    /// `Return` ran. The slot is emptied either way, so each run starts
    /// fresh. Declarations and the operand stack persist across runs.
    pub fn run(&mut self, actions: &[Action]) -> Result<Value, ActionFailure> {
        self.run_in(actions, ScopeId::GLOBAL)
    }

    /// Perform `actions` against `scope`.
    ///
    /// A scope issued by another program fails with `ScopeNotDeclared`,
    /// attributed to the first action, before anything is performed.
    pub fn run_in(&mut self, actions: &[Action], scope: ScopeId) -> Result<Value, ActionFailure> {
        if let Err(error) = self.scopes.check(scope) {
            return Err(ActionFailure {
                index: 0,
                action: actions.first().map_or("Run", Action::name),
                error,
            });
        }
        let outcome = Interpreter::new(self).run_block(actions, scope);
        let returned = mem::take(&mut self.return_slot);
        outcome.map(|_| returned)
    }

    /// Declare a native method in the Global scope.
    pub fn register_native(
        &mut self,
        name: impl Into<Name>,
        params: &[&str],
        func: NativeFn,
    ) -> EvalResult<CellId> {
        let name = name.into();
        if self.scopes.contains_local(ScopeId::GLOBAL, name.as_str()) {
            return Err(variable_already_declared(&name));
        }
        let params = params.iter().map(|&param| Name::from(param)).collect();
        let native = NativeMethod::new(name.clone(), params, func);
        let cell = self.memory.arena.allocate_constant(Value::native(native));
        self.scopes
            .add_local(ScopeId::GLOBAL, name, CellRef::Static(cell))?;
        Ok(cell)
    }

    #[inline]
    pub fn global(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    #[inline]
    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    #[inline]
    pub fn stack(&self) -> &OperandStack {
        &self.memory.stack
    }

    #[inline]
    pub fn arena(&self) -> &StaticArena {
        &self.memory.arena
    }

    #[inline]
    pub fn mode(&self) -> &EvalMode {
        &self.mode
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn read(&self, target: CellRef) -> Option<&Value> {
        self.memory.read(target)
    }

    /// The value of `name` as seen from the Global scope.
    pub fn lookup(&self, name: &str) -> EvalResult<&Value> {
        let target = self.scopes.resolve(ScopeId::GLOBAL, name)?;
        self.memory.read(target).ok_or_else(|| dangling_reference(target))
    }

    pub(crate) fn next_type_id(&mut self) -> RuntimeTypeId {
        self.next_type_id += 1;
        RuntimeTypeId::new(self.next_type_id)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Program`].
///
/// The mode picks the print handler and call depth limit unless a handler
/// is given explicitly.
#[derive(Default)]
pub struct ProgramBuilder {
    mode: EvalMode,
    print_handler: Option<SharedPrintHandler>,
    stack_capacity: Option<usize>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Route `DebugPrint` output to `handler` instead of the mode default.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Program {
        let print_handler = self
            .print_handler
            .unwrap_or_else(|| self.mode.default_print_handler());
        let capacity = self.stack_capacity.unwrap_or(DEFAULT_STACK_CAPACITY);
        tracing::debug!(mode = ?self.mode, capacity, "building program");
        Program {
            memory: Memory::with_stack_capacity(capacity),
            scopes: ScopeTree::new(),
            return_slot: Value::Undefined,
            mode: self.mode,
            print_handler,
            call_depth: 0,
            next_type_id: 0,
        }
    }
}

#[cfg(test)]
mod tests;
