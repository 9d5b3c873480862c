//! Namespaces, classes and objects.

use quill_ir::{Action, CellRef, Name, Object, ScopeId, Value};

use super::{Flow, Interpreter};
use crate::errors::{
    dangling_reference, not_a_class, type_mismatch, variable_already_declared,
    variable_not_declared,
};
use crate::EvalResult;

impl Interpreter<'_> {
    /// Define `name` (or reopen it) and run `body` inside it.
    pub(super) fn define_namespace(
        &mut self,
        scope: ScopeId,
        name: &Name,
        body: &[Action],
    ) -> EvalResult<Flow> {
        let namespace = self.program.scopes.define_namespace(scope, name)?;
        self.run_block(body, namespace)
            .map_err(|failure| failure.into_nested(&format!("namespace `{name}`")))?;
        Ok(Flow::Continue)
    }

    pub(super) fn define_class(
        &mut self,
        scope: ScopeId,
        name: &Name,
        body: &[Action],
    ) -> EvalResult<Flow> {
        let type_id = self.program.next_type_id();
        let class = self.program.scopes.define_class(scope, name, type_id)?;
        self.run_block(body, class)
            .map_err(|failure| failure.into_nested(&format!("class `{name}`")))?;
        Ok(Flow::Continue)
    }

    pub(super) fn add_static_member(
        &mut self,
        scope: ScopeId,
        class: &Name,
        name: &Name,
        value: &Value,
    ) -> EvalResult<Flow> {
        let class = self.program.scopes.resolve_class(scope, class.as_str())?;
        let value = self.owned_value(value, "static member")?;
        self.bind_new(class, name, value, false)?;
        Ok(Flow::Continue)
    }

    /// Add `name` to the instance template. The template cell holds the
    /// value every new object starts with.
    pub(super) fn add_instance_member(
        &mut self,
        scope: ScopeId,
        class: &Name,
        name: &Name,
        value: &Value,
    ) -> EvalResult<Flow> {
        let class = self.program.scopes.resolve_class(scope, class.as_str())?;
        let value = self.owned_value(value, "instance member")?;
        let program = &mut *self.program;
        let declared = program
            .scopes
            .get(class)
            .instance_template()
            .is_some_and(|template| template.contains(name.as_str()));
        if declared {
            return Err(variable_already_declared(name));
        }
        let cell = program.memory.arena.allocate(value);
        program
            .scopes
            .add_instance_member(class, name.clone(), CellRef::Static(cell))?;
        Ok(Flow::Continue)
    }

    /// Push a new object whose members are deep copies of the template.
    pub(super) fn construct_instance(&mut self, scope: ScopeId, class: &Name) -> EvalResult<Flow> {
        let program = &mut *self.program;
        let id = program.scopes.resolve_class(scope, class.as_str())?;
        let class_scope = program.scopes.get(id);
        let Some(layout) = class_scope.class_layout() else {
            return Err(not_a_class(class.as_str(), class_scope.kind().as_str()));
        };
        let members = layout
            .instance()
            .iter()
            .map(|slot| -> EvalResult<(Name, Value)> {
                let value = program
                    .memory
                    .read(slot.target())
                    .ok_or_else(|| dangling_reference(slot.target()))?;
                Ok((slot.name().clone(), value.clone()))
            })
            .collect::<EvalResult<Vec<_>>>()?;
        let object = Object::new(id, class_scope.name().clone(), layout.type_id(), members);
        tracing::trace!(class = %class, "constructed instance");
        program.memory.stack.push(Value::object(object));
        Ok(Flow::Continue)
    }

    /// Cell holding the object bound to variable `object`.
    fn object_cell(&self, scope: ScopeId, object: &Name) -> EvalResult<CellRef> {
        let bound = self.program.scopes.resolve(scope, object.as_str())?;
        self.program.memory.resolve_target(bound)
    }

    pub(super) fn load_member(
        &mut self,
        scope: ScopeId,
        object: &Name,
        member: &Name,
    ) -> EvalResult<Flow> {
        let target = self.object_cell(scope, object)?;
        let memory = &self.program.memory;
        let holder = memory.read(target).ok_or_else(|| dangling_reference(target))?;
        let Some(instance) = holder.as_object() else {
            return Err(type_mismatch("object", holder.kind()));
        };
        let value = instance
            .member(member.as_str())
            .ok_or_else(|| variable_not_declared(member.as_str()))?
            .clone();
        self.program.memory.stack.push(value);
        Ok(Flow::Continue)
    }

    /// Pop the top into `member` of the object held by variable `object`.
    pub(super) fn assign_member(
        &mut self,
        scope: ScopeId,
        object: &Name,
        member: &Name,
    ) -> EvalResult<Flow> {
        let target = self.object_cell(scope, object)?;
        let value = self.owned_value(self.program.memory.stack.top(), "=")?;
        let holder = self.program.memory.write(target)?;
        let kind = holder.kind();
        let Some(instance) = holder.as_object_mut() else {
            return Err(type_mismatch("object", kind));
        };
        let slot = instance
            .member_mut(member.as_str())
            .ok_or_else(|| variable_not_declared(member.as_str()))?;
        *slot = value;
        self.program.memory.stack.pop();
        Ok(Flow::Continue)
    }
}
