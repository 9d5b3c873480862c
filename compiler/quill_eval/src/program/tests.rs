#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::errors::ErrorCode;
use crate::print_handler::buffer_handler;
use quill_ir::CallArgs;
use pretty_assertions::assert_eq;

#[test]
fn builder_defaults_follow_the_mode() {
    let program = Program::builder().mode(EvalMode::Capture).build();
    assert_eq!(program.mode(), &EvalMode::Capture);
    program.print_handler().println("kept");
    assert_eq!(program.print_handler().get_output(), "kept\n");

    let silent = Program::builder().mode(EvalMode::Silent).build();
    silent.print_handler().println("dropped");
    assert_eq!(silent.print_handler().get_output(), "");
}

#[test]
fn explicit_handler_wins_over_mode() {
    let handler = buffer_handler();
    let mut program = Program::builder()
        .mode(EvalMode::Silent)
        .print_handler(handler.clone())
        .stack_capacity(4)
        .build();
    program
        .run(&[Action::declare("x"), Action::debug_print("x")])
        .unwrap();
    assert_eq!(handler.get_output(), "x = undefined\n");
}

#[test]
fn fresh_program_has_only_sentinel_scopes() {
    let program = Program::default();
    assert_eq!(program.scopes().len(), 2);
    assert_eq!(program.global(), ScopeId::GLOBAL);
    assert!(program.arena().is_empty());
    assert!(program.stack().is_empty());
    assert_eq!(
        program.lookup("anything").unwrap_err().code,
        ErrorCode::VariableNotDeclared
    );
}

#[test]
fn handles_do_not_outlive_their_program() {
    let mut first = Program::builder().mode(EvalMode::Silent).build();
    first
        .run(&[Action::declare("x"), Action::assign("x", Value::int(1))])
        .unwrap();
    let target = first.scopes().resolve(ScopeId::GLOBAL, "x").unwrap();
    assert_eq!(first.read(target), Some(&Value::int(1)));
    drop(first);

    let mut second = Program::builder().mode(EvalMode::Silent).build();
    second
        .run(&[Action::declare("x"), Action::assign("x", Value::int(2))])
        .unwrap();
    assert_eq!(second.read(target), None);
}

#[test]
fn run_in_targets_a_nested_scope() {
    let mut program = Program::builder().mode(EvalMode::Silent).build();
    program
        .run(&[Action::DefineNamespace {
            name: Name::from("inner"),
            body: vec![],
        }])
        .unwrap();
    let inner = program
        .scopes()
        .resolve_scope(ScopeId::GLOBAL, "inner")
        .unwrap();
    program.run_in(&[Action::declare("y")], inner).unwrap();
    assert!(program.scopes().contains_local(inner, "y"));
    assert!(program.lookup("y").is_err());
}

#[test]
fn registered_natives_are_constants() {
    fn answer(_: &CallArgs<'_>) -> Value {
        Value::int(42)
    }

    let mut program = Program::builder().mode(EvalMode::Silent).build();
    let cell = program.register_native("answer", &[], answer).unwrap();
    assert!(program.arena().is_constant(cell));
    let failure = program
        .run(&[Action::assign("answer", Value::int(0))])
        .unwrap_err();
    assert_eq!(failure.code(), ErrorCode::ConstantAssignment);

    program
        .run(&[Action::Call {
            callee: Name::from("answer"),
            arity: 0,
        }])
        .unwrap();
    assert_eq!(program.stack().top(), &Value::int(42));
}

#[test]
fn run_in_rejects_scopes_of_another_program() {
    let namespace = |name: &str| Action::DefineNamespace {
        name: Name::from(name),
        body: vec![],
    };
    let mut first = Program::builder().mode(EvalMode::Silent).build();
    first.run(&[namespace("secret")]).unwrap();
    let theirs = first.scopes().resolve_scope(ScopeId::GLOBAL, "secret").unwrap();

    let mut second = Program::builder().mode(EvalMode::Silent).build();
    second.run(&[namespace("other")]).unwrap();
    let ours = second.scopes().resolve_scope(ScopeId::GLOBAL, "other").unwrap();
    assert_eq!(theirs.index(), ours.index());

    let failure = second.run_in(&[Action::declare("x")], theirs).unwrap_err();
    assert_eq!(failure.code(), ErrorCode::ScopeNotDeclared);
    assert_eq!(failure.action, "DeclareLocal");
    assert!(!second.scopes().contains_local(ours, "x"));
    assert!(second.arena().is_empty());
}
