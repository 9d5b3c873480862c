//! Method definition, calls and returns.

use std::mem;
use std::sync::Arc;

use quill_ir::{
    Action, CallArgs, CellRef, Method, Name, NamedSlotSet, NativeMethod, Parameter, ScopeId, Value,
};
use quill_stack::ensure_sufficient_stack;

use super::{Flow, Interpreter};
use crate::errors::{
    arity_mismatch, dangling_reference, not_callable, recursion_limit_exceeded,
};
use crate::memory::follow;
use crate::EvalResult;

impl Interpreter<'_> {
    /// Bind an interpreted method to `name` in `scope`.
    ///
    /// Each parameter gets a template cell holding its default, or
    /// `Undefined` when the argument is required. The method captures
    /// `scope`, so a call scope it is defined in outlives the call.
    pub(super) fn define_method(
        &mut self,
        scope: ScopeId,
        name: &Name,
        params: &[Parameter],
        body: &[Action],
    ) -> EvalResult<Flow> {
        let mut slots = NamedSlotSet::new();
        for param in params {
            let default = match &param.default {
                Some(value) => self.owned_value(value, "default")?,
                None => Value::Undefined,
            };
            let cell = self.program.memory.arena.allocate_constant(default);
            slots.insert(param.name.clone(), CellRef::Static(cell))?;
        }
        let method = Method::new(name.clone(), slots, scope, Arc::from(body));
        self.bind_new(scope, name, Value::method(method), false)?;
        self.program.scopes.retain(scope);
        tracing::debug!(method = %name, arity = params.len(), "defined method");
        Ok(Flow::Continue)
    }

    /// Call `callee` with the top `arity` stack elements as arguments and
    /// replace them with the result.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(super) fn call(&mut self, scope: ScopeId, callee: &Name, arity: usize) -> EvalResult<Flow> {
        let memory = &self.program.memory;
        let bound = self.program.scopes.resolve(scope, callee.as_str())?;
        let value = memory.read(bound).ok_or_else(|| dangling_reference(bound))?;
        match follow(value, memory)? {
            Value::Method(method) => {
                let method = Method::clone(method);
                self.call_method(&method, arity)?;
            }
            Value::NativeMethod(native) => {
                let native = NativeMethod::clone(native);
                self.call_native(&native, arity)?;
            }
            other => return Err(not_callable(other.kind())),
        }
        Ok(Flow::Continue)
    }

    fn call_method(&mut self, method: &Method, arity: usize) -> EvalResult<()> {
        let params = method.params();
        if arity > params.len() {
            return Err(arity_mismatch(method.name(), params.len(), arity));
        }
        if let Some(limit) = self.program.mode.max_call_depth() {
            if self.program.call_depth >= limit {
                return Err(recursion_limit_exceeded(limit));
            }
        }

        let base = self.program.memory.stack.len() - arity;
        let mut values = self.program.memory.stack.as_slice()[base..]
            .iter()
            .map(|arg| self.owned_value(arg, "argument"))
            .collect::<EvalResult<Vec<_>>>()?;
        for slot in params.iter().skip(arity) {
            let default = self
                .program
                .memory
                .read(slot.target())
                .ok_or_else(|| dangling_reference(slot.target()))?;
            if default.is_undefined() {
                return Err(arity_mismatch(method.name(), params.len(), arity));
            }
            values.push(default.clone());
        }

        let program = &mut *self.program;
        program.memory.stack.truncate(base);
        let cells = program.memory.frame.len();
        let call_scope = program.scopes.push_call_scope(method.scope(), method.name());
        let bound = params.iter().zip(values).try_for_each(|(slot, value)| {
            let cell = program.memory.frame.allocate(value);
            program
                .scopes
                .add_local(call_scope, slot.name().clone(), CellRef::Frame(cell))
        });
        if let Err(error) = bound {
            self.leave_frame(call_scope, cells, base);
            return Err(error);
        }

        let program = &mut *self.program;
        let saved = mem::take(&mut program.return_slot);
        program.call_depth += 1;
        let result = ensure_sufficient_stack(|| self.run_block(method.body(), call_scope));
        let program = &mut *self.program;
        program.call_depth -= 1;
        let returned = mem::replace(&mut program.return_slot, saved);
        self.leave_frame(call_scope, cells, base);
        result.map_err(|failure| failure.into_nested(&format!("method `{}`", method.name())))?;

        self.program.memory.stack.push(if returned.is_undefined() {
            Value::None
        } else {
            returned
        });
        Ok(())
    }

    /// Drop what the callee left on the stack, then its call scope and frame
    /// cells unless a definition inside the call retained them.
    fn leave_frame(&mut self, call_scope: ScopeId, cells: usize, base: usize) {
        let program = &mut *self.program;
        program.memory.stack.truncate(base);
        if program.scopes.release_call_scope(call_scope) {
            program.memory.frame.truncate(cells);
        }
    }

    /// Native arguments stay on the stack, dereferenced in place, and are
    /// bound by stack index for the duration of the call.
    fn call_native(&mut self, native: &NativeMethod, arity: usize) -> EvalResult<()> {
        if arity != native.arity() {
            return Err(arity_mismatch(native.name(), native.arity(), arity));
        }
        let base = self.program.memory.stack.len() - arity;
        let args = self.program.memory.stack.as_slice()[base..]
            .iter()
            .map(|arg| self.owned_value(arg, "argument"))
            .collect::<EvalResult<Vec<_>>>()?;

        let mut slots = NamedSlotSet::new();
        for (offset, (param, arg)) in native.params().iter().zip(args).enumerate() {
            let target = CellRef::Stack(base + offset);
            *self.program.memory.write(target)? = arg;
            slots.insert(param.clone(), target)?;
        }

        let memory = &self.program.memory;
        let result = native.call(&CallArgs::new(&slots, memory));
        tracing::trace!(native = %native.name(), %result, "native call returned");

        let stack = &mut self.program.memory.stack;
        stack.truncate(base);
        stack.push(result);
        Ok(())
    }

    /// Pop the top into the program's return slot.
    pub(super) fn return_top(&mut self) -> EvalResult<Flow> {
        let value = self.owned_value(self.program.memory.stack.top(), "return")?;
        let program = &mut *self.program;
        program.memory.stack.pop();
        program.return_slot = value;
        Ok(Flow::Return)
    }
}
