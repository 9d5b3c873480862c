//! The action interpreter.
//!
//! [`Interpreter`] borrows a [`Program`] and performs blocks of actions
//! against a target scope. Each action's [`Perform`] implementation returns
//! an explicit result; the first failure stops the block and is reported as
//! an [`ActionFailure`]. Effects of the actions performed before it remain.

mod calls;
mod classes;
mod stack_ops;
mod variables;

use std::fmt;

use quill_ir::{Action, ScopeId, Value};

use crate::errors::{
    stack_underflow, undefined_value_operation, zero_stack_offset, ErrorCode, EvalError,
};
use crate::memory::follow;
use crate::{EvalResult, Program};

/// How a performed action leaves its block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// A `Return` ran; the rest of the block is skipped.
    Return,
}

/// The first failed action of a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionFailure {
    /// Position of the failed action in its block.
    pub index: usize,
    pub action: &'static str,
    pub error: EvalError,
}

impl ActionFailure {
    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.error.code
    }

    /// Fold a failure inside a nested block (namespace, class or method body)
    /// into an error of the action that ran the block. The code is kept.
    pub fn into_nested(self, context: &str) -> EvalError {
        EvalError::new(
            self.error.code,
            format!(
                "in {context}, action #{} ({}): {}",
                self.index, self.action, self.error.message
            ),
        )
    }
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "action #{} ({}) failed: {}",
            self.index, self.action, self.error
        )
    }
}

impl std::error::Error for ActionFailure {}

/// One unit of work against a program.
pub trait Perform {
    fn perform(&self, interpreter: &mut Interpreter<'_>, scope: ScopeId) -> EvalResult<Flow>;
}

/// Performs actions against a borrowed program.
pub struct Interpreter<'p> {
    program: &'p mut Program,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p mut Program) -> Self {
        Interpreter { program }
    }

    /// Perform `actions` in order against `scope`.
    ///
    /// Stops at the first failure, or after a `Return`.
    #[tracing::instrument(level = "debug", skip(self, actions), fields(len = actions.len()))]
    pub fn run_block(&mut self, actions: &[Action], scope: ScopeId) -> Result<Flow, ActionFailure> {
        for (index, action) in actions.iter().enumerate() {
            tracing::trace!(
                index,
                action = action.name(),
                depth = self.program.memory.stack.len(),
                "perform"
            );
            let result = self
                .check_operands(action)
                .and_then(|()| action.perform(self, scope));
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Return) => return Ok(Flow::Return),
                Err(error) => {
                    tracing::debug!(index, action = action.name(), %error, "action failed");
                    return Err(ActionFailure {
                        index,
                        action: action.name(),
                        error,
                    });
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Reject actions the operand stack cannot satisfy, so stack accesses
    /// inside `perform` never underflow.
    fn check_operands(&self, action: &Action) -> EvalResult<()> {
        if let Action::Duplicate { offset: 0 } | Action::Swap { offset: 0 } = action {
            return Err(zero_stack_offset(action.name()));
        }
        let needed = action.operand_arity();
        let depth = self.program.memory.stack.len();
        if depth < needed {
            return Err(stack_underflow(action.name(), needed, depth));
        }
        Ok(())
    }

    /// Owned, dereferenced copy of `value` for storing in a cell.
    ///
    /// `op` names the operation for the `Undefined` error.
    fn owned_value(&self, value: &Value, op: &str) -> EvalResult<Value> {
        let value = follow(value, &self.program.memory)?;
        if value.is_undefined() {
            return Err(undefined_value_operation(op));
        }
        Ok(value.clone())
    }
}

impl Perform for Action {
    fn perform(&self, interpreter: &mut Interpreter<'_>, scope: ScopeId) -> EvalResult<Flow> {
        match self {
            Action::DeclareLocal { name } => interpreter.declare_local(scope, name),
            Action::DeclareConstant { name, value } => {
                interpreter.declare_constant(scope, name, value)
            }
            Action::ResolveLocal { name } => interpreter.resolve_local(scope, name),
            Action::ResolveQualified { scope: nested, name } => {
                interpreter.resolve_qualified(scope, nested, name)
            }
            Action::AssignLocal { name, source } => interpreter.assign_local(scope, name, source),
            Action::PushLiteral(value) => interpreter.push_literal(value),
            Action::Pop => interpreter.pop(),
            Action::Duplicate { offset } => interpreter.duplicate(*offset),
            Action::Swap { offset } => interpreter.swap(*offset),
            Action::BuildList { len } => interpreter.build_list(*len),
            Action::Unary(op) => interpreter.unary(*op),
            Action::Binary(op) => interpreter.binary(*op),
            Action::BinaryInPlace(op) => interpreter.binary_in_place(*op),
            Action::DefineNamespace { name, body } => {
                interpreter.define_namespace(scope, name, body)
            }
            Action::DefineClass { name, body } => interpreter.define_class(scope, name, body),
            Action::AddClassStaticMember { class, name, value } => {
                interpreter.add_static_member(scope, class, name, value)
            }
            Action::AddClassInstanceMember { class, name, value } => {
                interpreter.add_instance_member(scope, class, name, value)
            }
            Action::ConstructInstance { class } => interpreter.construct_instance(scope, class),
            Action::LoadMember { object, member } => {
                interpreter.load_member(scope, object, member)
            }
            Action::AssignMember { object, member } => {
                interpreter.assign_member(scope, object, member)
            }
            Action::DefineMethod { name, params, body } => {
                interpreter.define_method(scope, name, params, body)
            }
            Action::Call { callee, arity } => interpreter.call(scope, callee, *arity),
            Action::Return => interpreter.return_top(),
            Action::DebugPrint { name } => interpreter.debug_print(scope, name),
        }
    }
}

#[cfg(test)]
mod tests;
