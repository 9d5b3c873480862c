//! Variable lifecycle: declare, resolve, assign, print.

use quill_ir::{CellRef, Name, Operand, ScopeId, ScopeKind, Value};

use super::{Flow, Interpreter};
use crate::errors::{dangling_reference, variable_already_declared};
use crate::format::format_value;
use crate::EvalResult;

impl Interpreter<'_> {
    /// Allocate a cell holding `value` and bind it to `name` in `scope`.
    ///
    /// Call scopes get a frame cell, everything else a static cell. The
    /// duplicate check runs first so a rejected declaration allocates
    /// nothing.
    pub(super) fn bind_new(
        &mut self,
        scope: ScopeId,
        name: &Name,
        value: Value,
        constant: bool,
    ) -> EvalResult<CellRef> {
        let program = &mut *self.program;
        let owner = program.scopes.get(scope);
        if owner.contains_local(name.as_str()) {
            return Err(variable_already_declared(name));
        }
        let memory = &mut program.memory;
        let target = match (owner.kind(), constant) {
            (ScopeKind::Call, false) => CellRef::Frame(memory.frame.allocate(value)),
            (ScopeKind::Call, true) => CellRef::Frame(memory.frame.allocate_constant(value)),
            (_, false) => CellRef::Static(memory.arena.allocate(value)),
            (_, true) => CellRef::Static(memory.arena.allocate_constant(value)),
        };
        program.scopes.add_local(scope, name.clone(), target)?;
        Ok(target)
    }

    pub(super) fn declare_local(&mut self, scope: ScopeId, name: &Name) -> EvalResult<Flow> {
        let target = self.bind_new(scope, name, Value::Undefined, false)?;
        tracing::debug!(%name, %target, "declared");
        Ok(Flow::Continue)
    }

    pub(super) fn declare_constant(
        &mut self,
        scope: ScopeId,
        name: &Name,
        value: &Value,
    ) -> EvalResult<Flow> {
        let value = self.owned_value(value, "const")?;
        let target = self.bind_new(scope, name, value, true)?;
        tracing::debug!(%name, %target, "declared constant");
        Ok(Flow::Continue)
    }

    pub(super) fn resolve_local(&mut self, scope: ScopeId, name: &Name) -> EvalResult<Flow> {
        let target = self.program.scopes.resolve(scope, name.as_str())?;
        self.program.memory.stack.push(Value::reference(target));
        Ok(Flow::Continue)
    }

    pub(super) fn resolve_qualified(
        &mut self,
        scope: ScopeId,
        nested: &Name,
        name: &Name,
    ) -> EvalResult<Flow> {
        let scopes = &self.program.scopes;
        let owner = scopes.resolve_scope(scope, nested.as_str())?;
        let target = scopes.get(owner).find_local(name.as_str())?;
        self.program.memory.stack.push(Value::reference(target));
        Ok(Flow::Continue)
    }

    /// Store into the cell bound to `name`. The stored value is a
    /// dereferenced copy, so variables never alias each other.
    pub(super) fn assign_local(
        &mut self,
        scope: ScopeId,
        name: &Name,
        source: &Operand,
    ) -> EvalResult<Flow> {
        let target = self.program.scopes.resolve(scope, name.as_str())?;
        let value = match source {
            Operand::Pop => self.owned_value(self.program.memory.stack.top(), "=")?,
            Operand::Literal(value) => self.owned_value(value, "=")?,
        };
        *self.program.memory.write(target)? = value;
        if let Operand::Pop = source {
            self.program.memory.stack.pop();
        }
        Ok(Flow::Continue)
    }

    pub(super) fn debug_print(&mut self, scope: ScopeId, name: &Name) -> EvalResult<Flow> {
        let program = &*self.program;
        let target = program.scopes.resolve(scope, name.as_str())?;
        let value = program
            .memory
            .read(target)
            .ok_or_else(|| dangling_reference(target))?;
        let line = format!("{name} = {}", format_value(value, &program.memory));
        tracing::debug!(%line, "debug print");
        program.print_handler.println(&line);
        Ok(Flow::Continue)
    }
}
