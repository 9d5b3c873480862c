//! The IR action set.
//!
//! An [`Action`] is one instruction of a flat, already-ordered block produced
//! by the front end. Actions are data: executing them is the evaluator's job.
//! The set is closed; adding a variant means updating the evaluator's
//! dispatch, which the compiler enforces.

use crate::{BinaryOp, Name, UnaryOp, Value};

/// Where an assignment takes its value from.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// Pop the operand stack top.
    Pop,
    /// Use an inline literal.
    Literal(Value),
}

/// A declared parameter of an interpreted method.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: Name,
    pub default: Option<Value>,
}

impl Parameter {
    pub fn required(name: impl Into<Name>) -> Self {
        Parameter {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<Name>, default: Value) -> Self {
        Parameter {
            name: name.into(),
            default: Some(default),
        }
    }
}

/// One IR instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // Variable lifecycle
    /// Declare an uninitialized variable in the target scope.
    DeclareLocal { name: Name },
    /// Declare a read-only variable in the target scope.
    DeclareConstant { name: Name, value: Value },
    /// Push a reference to the cell bound to `name`.
    ResolveLocal { name: Name },
    /// Push a reference to `name` declared directly in nested scope `scope`.
    ResolveQualified { scope: Name, name: Name },
    /// Store into the cell bound to `name`.
    AssignLocal { name: Name, source: Operand },

    // Operand stack
    PushLiteral(Value),
    Pop,
    /// Push a copy of the element `offset` places from the end (1 = top).
    Duplicate { offset: usize },
    /// Exchange the top with the element `offset` places from the end.
    Swap { offset: usize },
    /// Collect the top `len` elements into a list, bottom first.
    BuildList { len: usize },

    // Operators
    Unary(UnaryOp),
    /// Pop rhs then lhs, push `lhs op rhs`.
    Binary(BinaryOp),
    /// Pop rhs, combine it into the new top.
    BinaryInPlace(BinaryOp),

    // Scopes and classes
    /// Define or extend a namespace and run `body` inside it.
    DefineNamespace { name: Name, body: Vec<Action> },
    /// Define a class and run `body` inside it. Classes are single-definition.
    DefineClass { name: Name, body: Vec<Action> },
    AddClassStaticMember { class: Name, name: Name, value: Value },
    AddClassInstanceMember { class: Name, name: Name, value: Value },
    /// Push a new object of `class`.
    ConstructInstance { class: Name },
    /// Push a copy of `member` of the object held by variable `object`.
    LoadMember { object: Name, member: Name },
    /// Pop the top into `member` of the object held by variable `object`.
    AssignMember { object: Name, member: Name },

    // Methods
    DefineMethod {
        name: Name,
        params: Vec<Parameter>,
        body: Vec<Action>,
    },
    /// Call `callee` with the top `arity` elements as arguments, push the result.
    Call { callee: Name, arity: usize },
    /// Pop the top into the return slot and leave the current block.
    Return,

    // Diagnostics
    DebugPrint { name: Name },
}

impl Action {
    pub fn declare(name: impl Into<Name>) -> Self {
        Action::DeclareLocal { name: name.into() }
    }

    pub fn resolve(name: impl Into<Name>) -> Self {
        Action::ResolveLocal { name: name.into() }
    }

    /// Assign an inline literal.
    pub fn assign(name: impl Into<Name>, value: Value) -> Self {
        Action::AssignLocal {
            name: name.into(),
            source: Operand::Literal(value),
        }
    }

    /// Assign the popped operand stack top.
    pub fn assign_popped(name: impl Into<Name>) -> Self {
        Action::AssignLocal {
            name: name.into(),
            source: Operand::Pop,
        }
    }

    pub fn debug_print(name: impl Into<Name>) -> Self {
        Action::DebugPrint { name: name.into() }
    }

    /// Variant name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Action::DeclareLocal { .. } => "DeclareLocal",
            Action::DeclareConstant { .. } => "DeclareConstant",
            Action::ResolveLocal { .. } => "ResolveLocal",
            Action::ResolveQualified { .. } => "ResolveQualified",
            Action::AssignLocal { .. } => "AssignLocal",
            Action::PushLiteral(_) => "PushLiteral",
            Action::Pop => "Pop",
            Action::Duplicate { .. } => "Duplicate",
            Action::Swap { .. } => "Swap",
            Action::BuildList { .. } => "BuildList",
            Action::Unary(UnaryOp::Negate) => "UnaryNegate",
            Action::Binary(BinaryOp::Add) => "BinaryAdd",
            Action::Binary(BinaryOp::Sub) => "BinarySubtract",
            Action::Binary(BinaryOp::Mul) => "BinaryMultiply",
            Action::Binary(BinaryOp::Div) => "BinaryDivide",
            Action::BinaryInPlace(_) => "BinaryInPlace",
            Action::DefineNamespace { .. } => "DefineNamespace",
            Action::DefineClass { .. } => "DefineClass",
            Action::AddClassStaticMember { .. } => "AddClassStaticMember",
            Action::AddClassInstanceMember { .. } => "AddClassInstanceMember",
            Action::ConstructInstance { .. } => "ConstructInstance",
            Action::LoadMember { .. } => "LoadMember",
            Action::AssignMember { .. } => "AssignMember",
            Action::DefineMethod { .. } => "DefineMethod",
            Action::Call { .. } => "Call",
            Action::Return => "Return",
            Action::DebugPrint { .. } => "DebugPrint",
        }
    }

    /// Minimum operand stack depth the action needs before it runs.
    pub fn operand_arity(&self) -> usize {
        match self {
            Action::AssignLocal {
                source: Operand::Pop,
                ..
            }
            | Action::Pop
            | Action::Unary(_)
            | Action::AssignMember { .. }
            | Action::Return => 1,
            Action::Binary(_) | Action::BinaryInPlace(_) => 2,
            Action::Duplicate { offset } | Action::Swap { offset } => *offset,
            Action::BuildList { len } => *len,
            Action::Call { arity, .. } => *arity,
            Action::DeclareLocal { .. }
            | Action::DeclareConstant { .. }
            | Action::ResolveLocal { .. }
            | Action::ResolveQualified { .. }
            | Action::AssignLocal {
                source: Operand::Literal(_),
                ..
            }
            | Action::PushLiteral(_)
            | Action::DefineNamespace { .. }
            | Action::DefineClass { .. }
            | Action::AddClassStaticMember { .. }
            | Action::AddClassInstanceMember { .. }
            | Action::ConstructInstance { .. }
            | Action::LoadMember { .. }
            | Action::DefineMethod { .. }
            | Action::DebugPrint { .. } => 0,
        }
    }
}
