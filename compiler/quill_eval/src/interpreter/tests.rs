#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::{buffer_handler, EvalMode};
use quill_ir::{BinaryOp, CallArgs, Name, Operand, Parameter, UnaryOp};

fn program() -> Program {
    Program::builder().print_handler(buffer_handler()).build()
}

fn run(program: &mut Program, actions: &[Action]) -> Result<Value, ActionFailure> {
    program.run(actions)
}

fn call(callee: &str, arity: usize) -> Action {
    Action::Call {
        callee: Name::from(callee),
        arity,
    }
}

fn push(n: i64) -> Action {
    Action::PushLiteral(Value::int(n))
}

fn stack(program: &Program) -> Vec<Value> {
    program.stack().as_slice().to_vec()
}

mod variables {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn constants_reject_assignment() {
        let mut program = program();
        let failure = run(
            &mut program,
            &[
                Action::DeclareConstant {
                    name: Name::from("limit"),
                    value: Value::int(10),
                },
                Action::assign("limit", Value::int(11)),
            ],
        )
        .unwrap_err();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.code(), ErrorCode::ConstantAssignment);
        assert_eq!(program.lookup("limit").unwrap(), &Value::int(10));
    }

    #[test]
    fn assignment_stores_a_copy_not_a_reference() {
        let mut program = program();
        run(
            &mut program,
            &[
                Action::declare("a"),
                Action::declare("b"),
                Action::assign("a", Value::int(1)),
                Action::resolve("a"),
                Action::assign_popped("b"),
                Action::assign("a", Value::int(2)),
            ],
        )
        .unwrap();
        assert_eq!(program.lookup("b").unwrap(), &Value::int(1));
    }

    #[test]
    fn undefined_cannot_be_assigned() {
        let mut program = program();
        let failure = run(
            &mut program,
            &[
                Action::declare("a"),
                Action::declare("b"),
                Action::resolve("a"),
                Action::assign_popped("b"),
            ],
        )
        .unwrap_err();
        assert_eq!(failure.code(), ErrorCode::UndefinedValueOperation);
        assert_eq!(program.stack().len(), 1);
    }

    #[test]
    fn qualified_names_read_namespace_locals() {
        let mut program = program();
        run(
            &mut program,
            &[
                Action::DefineNamespace {
                    name: Name::from("math"),
                    body: vec![Action::DeclareConstant {
                        name: Name::from("two"),
                        value: Value::int(2),
                    }],
                },
                Action::ResolveQualified {
                    scope: Name::from("math"),
                    name: Name::from("two"),
                },
                Action::Unary(UnaryOp::Negate),
            ],
        )
        .unwrap();
        assert_eq!(stack(&program), vec![Value::int(-2)]);

        let failure = run(
            &mut program,
            &[Action::ResolveQualified {
                scope: Name::from("physics"),
                name: Name::from("g"),
            }],
        )
        .unwrap_err();
        assert_eq!(failure.code(), ErrorCode::ScopeNotDeclared);
    }

    #[test]
    fn debug_print_formats_through_references() {
        let mut program = program();
        run(
            &mut program,
            &[
                Action::declare("x"),
                Action::declare("xs"),
                Action::debug_print("x"),
                Action::assign("x", Value::int(4)),
                Action::resolve("x"),
                Action::PushLiteral(Value::None),
                Action::BuildList { len: 2 },
                Action::assign_popped("xs"),
                Action::debug_print("xs"),
            ],
        )
        .unwrap();
        assert_eq!(
            program.print_handler().get_output(),
            "x = undefined\nxs = [4, none]\n"
        );
    }
}

mod stack_ops {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn duplicate_swap_and_pop() {
        let mut program = program();
        run(
            &mut program,
            &[
                push(1),
                push(2),
                Action::Duplicate { offset: 2 },
                Action::Swap { offset: 2 },
                Action::Pop,
            ],
        )
        .unwrap();
        assert_eq!(stack(&program), vec![Value::int(1), Value::int(1)]);
    }

    #[test]
    fn binary_pops_rhs_then_lhs() {
        let mut program = program();
        run(&mut program, &[push(10), push(4), Action::Binary(BinaryOp::Sub)]).unwrap();
        assert_eq!(stack(&program), vec![Value::int(6)]);
    }

    #[test]
    fn in_place_combines_into_new_top() {
        let mut program = program();
        run(
            &mut program,
            &[
                push(1),
                push(6),
                push(7),
                Action::BinaryInPlace(BinaryOp::Mul),
            ],
        )
        .unwrap();
        assert_eq!(stack(&program), vec![Value::int(1), Value::int(42)]);
    }

    #[test]
    fn build_list_keeps_stack_order() {
        let mut program = program();
        run(
            &mut program,
            &[push(1), push(2), push(3), Action::BuildList { len: 2 }],
        )
        .unwrap();
        assert_eq!(
            stack(&program),
            vec![
                Value::int(1),
                Value::list(vec![Value::int(2), Value::int(3)])
            ]
        );
    }

    #[test]
    fn malformed_blocks_report_underflow() {
        let mut program = program();
        let failure = run(&mut program, &[push(1), Action::Binary(BinaryOp::Add)]).unwrap_err();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.code(), ErrorCode::StackUnderflow);

        let failure = run(&mut program, &[Action::Duplicate { offset: 0 }]).unwrap_err();
        assert_eq!(failure.code(), ErrorCode::StackUnderflow);
    }

    #[test]
    fn undefined_literals_are_rejected() {
        let mut program = program();
        let failure = run(&mut program, &[Action::PushLiteral(Value::Undefined)]).unwrap_err();
        assert_eq!(failure.code(), ErrorCode::UndefinedValueOperation);
    }
}

mod classes {
    use pretty_assertions::assert_eq;
    use super::*;

    fn class(name: &str, body: Vec<Action>) -> Action {
        Action::DefineClass {
            name: Name::from(name),
            body,
        }
    }

    #[test]
    fn classes_are_single_definition() {
        let mut program = program();
        let failure = run(
            &mut program,
            &[class("Point", vec![]), class("Point", vec![])],
        )
        .unwrap_err();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.code(), ErrorCode::ScopeRedefinition);
    }

    #[test]
    fn namespaces_merge_on_redefinition() {
        let mut program = program();
        let namespace = |body| Action::DefineNamespace {
            name: Name::from("util"),
            body,
        };
        run(
            &mut program,
            &[
                namespace(vec![Action::declare("a")]),
                namespace(vec![Action::declare("b")]),
            ],
        )
        .unwrap();
        let util = program.scopes().resolve_scope(ScopeId::GLOBAL, "util").unwrap();
        assert!(program.scopes().contains_local(util, "a"));
        assert!(program.scopes().contains_local(util, "b"));
    }

    #[test]
    fn nested_failures_keep_their_code() {
        let mut program = program();
        let failure = run(
            &mut program,
            &[Action::DefineNamespace {
                name: Name::from("util"),
                body: vec![Action::declare("a"), Action::declare("a")],
            }],
        )
        .unwrap_err();
        assert_eq!(failure.index, 0);
        assert_eq!(failure.code(), ErrorCode::VariableAlreadyDeclared);
        assert!(failure.error.message.contains("namespace `util`"));
    }

    #[test]
    fn static_members_live_in_the_class_scope() {
        let mut program = program();
        run(
            &mut program,
            &[
                class(
                    "Config",
                    vec![Action::AddClassStaticMember {
                        class: Name::from("Config"),
                        name: Name::from("version"),
                        value: Value::int(3),
                    }],
                ),
                Action::ResolveQualified {
                    scope: Name::from("Config"),
                    name: Name::from("version"),
                },
            ],
        )
        .unwrap();
        let Value::Reference(Some(target)) = program.stack().top() else {
            panic!("expected a reference");
        };
        assert_eq!(program.read(*target), Some(&Value::int(3)));
    }

    #[test]
    fn members_load_and_type_ids_differ() {
        let mut program = program();
        run(
            &mut program,
            &[
                class(
                    "A",
                    vec![Action::AddClassInstanceMember {
                        class: Name::from("A"),
                        name: Name::from("n"),
                        value: Value::int(1),
                    }],
                ),
                class("B", vec![]),
                Action::declare("a"),
                Action::declare("b"),
                Action::ConstructInstance {
                    class: Name::from("A"),
                },
                Action::assign_popped("a"),
                Action::ConstructInstance {
                    class: Name::from("B"),
                },
                Action::assign_popped("b"),
                Action::LoadMember {
                    object: Name::from("a"),
                    member: Name::from("n"),
                },
            ],
        )
        .unwrap();
        assert_eq!(stack(&program), vec![Value::int(1)]);
        let a = program.lookup("a").unwrap().as_object().unwrap();
        let b = program.lookup("b").unwrap().as_object().unwrap();
        assert_ne!(a.type_id(), b.type_id());
        assert_eq!(a.class_name().as_str(), "A");
    }

    #[test]
    fn member_access_errors() {
        let mut program = program();
        run(
            &mut program,
            &[
                class("Empty", vec![]),
                Action::declare("e"),
                Action::declare("n"),
                Action::ConstructInstance {
                    class: Name::from("Empty"),
                },
                Action::assign_popped("e"),
                Action::assign("n", Value::int(1)),
            ],
        )
        .unwrap();

        let load = |object: &str| Action::LoadMember {
            object: Name::from(object),
            member: Name::from("missing"),
        };
        let failure = run(&mut program, &[load("e")]).unwrap_err();
        assert_eq!(failure.code(), ErrorCode::VariableNotDeclared);
        let failure = run(&mut program, &[load("n")]).unwrap_err();
        assert_eq!(failure.code(), ErrorCode::TypeMismatch);
        let failure = run(
            &mut program,
            &[Action::ConstructInstance {
                class: Name::from("Nope"),
            }],
        )
        .unwrap_err();
        assert_eq!(failure.code(), ErrorCode::ScopeNotDeclared);
    }
}

mod calls {
    use pretty_assertions::assert_eq;
    use super::*;

    fn add_native(args: &CallArgs<'_>) -> Value {
        match (args.get("a"), args.get("b")) {
            (Some(Value::Int(a)), Some(Value::Int(b))) => Value::int(a + b),
            _ => Value::None,
        }
    }

    #[test]
    fn native_methods_see_dereferenced_arguments() {
        let mut program = program();
        program.register_native("add", &["a", "b"], add_native).unwrap();
        run(
            &mut program,
            &[
                Action::declare("x"),
                Action::assign("x", Value::int(40)),
                push(7),
                Action::resolve("x"),
                push(2),
                call("add", 2),
            ],
        )
        .unwrap();
        assert_eq!(stack(&program), vec![Value::int(7), Value::int(42)]);

        let failure = run(&mut program, &[push(1), call("add", 1)]).unwrap_err();
        assert_eq!(failure.code(), ErrorCode::ArityMismatch);
        assert_eq!(
            program.register_native("add", &[], add_native).unwrap_err().code,
            ErrorCode::VariableAlreadyDeclared
        );
    }

    #[test]
    fn defaults_fill_missing_arguments() {
        let mut program = program();
        let returned = run(
            &mut program,
            &[
                Action::DefineMethod {
                    name: Name::from("scale"),
                    params: vec![
                        Parameter::required("n"),
                        Parameter::with_default("by", Value::int(10)),
                    ],
                    body: vec![
                        Action::resolve("n"),
                        Action::resolve("by"),
                        Action::Binary(BinaryOp::Mul),
                        Action::Return,
                    ],
                },
                push(4),
                call("scale", 1),
                push(4),
                push(2),
                call("scale", 2),
                Action::Binary(BinaryOp::Add),
                Action::Return,
            ],
        )
        .unwrap();
        assert_eq!(returned, Value::int(48));
    }

    #[test]
    fn missing_required_arguments_fail() {
        let mut program = program();
        let failure = run(
            &mut program,
            &[
                Action::DefineMethod {
                    name: Name::from("f"),
                    params: vec![Parameter::required("n")],
                    body: vec![],
                },
                call("f", 0),
            ],
        )
        .unwrap_err();
        assert_eq!(failure.code(), ErrorCode::ArityMismatch);

        let failure = run(&mut program, &[push(1), push(2), call("f", 2)]).unwrap_err();
        assert_eq!(failure.code(), ErrorCode::ArityMismatch);
    }

    #[test]
    fn bodies_without_return_yield_none() {
        let mut program = program();
        run(
            &mut program,
            &[
                Action::DefineMethod {
                    name: Name::from("noop"),
                    params: vec![],
                    body: vec![push(99)],
                },
                call("noop", 0),
            ],
        )
        .unwrap();
        assert_eq!(stack(&program), vec![Value::None]);
    }

    #[test]
    fn parameters_are_local_to_the_call() {
        let mut program = program();
        let failure = run(
            &mut program,
            &[
                Action::DefineMethod {
                    name: Name::from("f"),
                    params: vec![Parameter::required("n")],
                    body: vec![],
                },
                push(1),
                call("f", 1),
                Action::resolve("n"),
            ],
        )
        .unwrap_err();
        assert_eq!(failure.index, 3);
        assert_eq!(failure.code(), ErrorCode::VariableNotDeclared);
    }

    #[test]
    fn only_methods_are_callable() {
        let mut program = program();
        let failure = run(
            &mut program,
            &[
                Action::declare("x"),
                Action::assign("x", Value::int(1)),
                call("x", 0),
            ],
        )
        .unwrap_err();
        assert_eq!(failure.code(), ErrorCode::NotCallable);
    }

    #[test]
    fn recursion_is_bounded_by_mode() {
        let mut program = Program::builder().mode(EvalMode::Silent).build();
        let failure = run(
            &mut program,
            &[
                Action::DefineMethod {
                    name: Name::from("forever"),
                    params: vec![],
                    body: vec![call("forever", 0)],
                },
                call("forever", 0),
            ],
        )
        .unwrap_err();
        assert_eq!(failure.code(), ErrorCode::RecursionLimitExceeded);
        assert_eq!(program.call_depth, 0);
    }

    #[test]
    fn return_stops_the_block() {
        let mut program = program();
        let returned = run(
            &mut program,
            &[push(1), Action::Return, Action::PushLiteral(Value::Undefined)],
        )
        .unwrap();
        assert_eq!(returned, Value::int(1));
        assert!(program.stack().is_empty());
    }

    #[test]
    fn return_slot_is_reset_between_runs() {
        let mut program = program();
        assert_eq!(run(&mut program, &[push(1), Action::Return]).unwrap(), Value::int(1));
        assert_eq!(run(&mut program, &[]).unwrap(), Value::Undefined);
    }

    #[test]
    fn literal_operands_assign_inline() {
        let mut program = program();
        run(
            &mut program,
            &[
                Action::declare("x"),
                Action::AssignLocal {
                    name: Name::from("x"),
                    source: Operand::Literal(Value::string("hi")),
                },
            ],
        )
        .unwrap();
        assert_eq!(program.lookup("x").unwrap(), &Value::string("hi"));
    }

    #[test]
    fn repeated_calls_reuse_frame_storage() {
        let mut program = program();
        run(
            &mut program,
            &[Action::DefineMethod {
                name: Name::from("inc"),
                params: vec![Parameter::required("n")],
                body: vec![
                    Action::declare("step"),
                    Action::assign("step", Value::int(1)),
                    Action::resolve("n"),
                    Action::resolve("step"),
                    Action::Binary(BinaryOp::Add),
                    Action::Return,
                ],
            }],
        )
        .unwrap();
        let arena = program.arena().len();
        let scopes = program.scopes().len();

        for n in 0..1000 {
            let returned = run(&mut program, &[push(n), call("inc", 1), Action::Return]).unwrap();
            assert_eq!(returned, Value::int(n + 1));
        }
        assert_eq!(program.arena().len(), arena);
        assert_eq!(program.scopes().len(), scopes);
        assert!(program.memory().frame.is_empty());
        assert!(program.stack().is_empty());
    }

    #[test]
    fn failed_calls_release_their_frame() {
        let mut program = program();
        run(
            &mut program,
            &[Action::DefineMethod {
                name: Name::from("broken"),
                params: vec![Parameter::required("n")],
                body: vec![Action::declare("x"), push(5), Action::resolve("missing")],
            }],
        )
        .unwrap();
        let scopes = program.scopes().len();

        let failure = run(&mut program, &[push(1), push(2), call("broken", 1)]).unwrap_err();
        assert_eq!(failure.index, 2);
        assert_eq!(failure.code(), ErrorCode::VariableNotDeclared);
        assert_eq!(stack(&program), vec![Value::int(1)]);
        assert_eq!(program.scopes().len(), scopes);
        assert!(program.memory().frame.is_empty());
    }

    #[test]
    fn methods_defined_in_a_call_keep_its_locals() {
        let mut program = program();
        let returned = run(
            &mut program,
            &[
                Action::DefineMethod {
                    name: Name::from("make"),
                    params: vec![],
                    body: vec![
                        Action::declare("k"),
                        Action::assign("k", Value::int(7)),
                        Action::DefineMethod {
                            name: Name::from("get"),
                            params: vec![],
                            body: vec![Action::resolve("k"), Action::Return],
                        },
                        Action::resolve("get"),
                        Action::Return,
                    ],
                },
                Action::DefineMethod {
                    name: Name::from("noise"),
                    params: vec![Parameter::required("n")],
                    body: vec![
                        Action::declare("z"),
                        Action::assign("z", Value::int(100)),
                        Action::resolve("z"),
                        Action::Return,
                    ],
                },
                Action::declare("g"),
                call("make", 0),
                Action::assign_popped("g"),
                push(1),
                call("noise", 1),
                Action::Pop,
                call("g", 0),
                Action::Return,
            ],
        )
        .unwrap();
        assert_eq!(returned, Value::int(7));
    }
}
