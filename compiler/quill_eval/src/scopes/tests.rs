#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::errors::ErrorCode;
use quill_ir::{ArenaId, CellId};
use pretty_assertions::assert_eq;

fn cell(index: u32) -> CellRef {
    CellRef::Static(CellId::new(ArenaId::fresh(), index))
}

/// Global -> a -> b, plus a sibling of `a`.
fn chain() -> (ScopeTree, ScopeId, ScopeId, ScopeId) {
    let mut tree = ScopeTree::new();
    let a = tree.define_namespace(ScopeId::GLOBAL, &Name::from("a")).unwrap();
    let b = tree.define_namespace(a, &Name::from("b")).unwrap();
    let sibling = tree
        .define_namespace(ScopeId::GLOBAL, &Name::from("sibling"))
        .unwrap();
    (tree, a, b, sibling)
}

#[test]
fn sentinels_exist_and_parent_themselves() {
    let tree = ScopeTree::new();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.parent(ScopeId::UNDEFINED), ScopeId::UNDEFINED);
    assert_eq!(tree.parent(ScopeId::GLOBAL), ScopeId::GLOBAL);
    assert_eq!(tree.get(ScopeId::UNDEFINED).kind(), ScopeKind::Undefined);
}

#[test]
fn names_resolve_down_the_chain_only() {
    let (mut tree, a, b, sibling) = chain();
    let target = cell(0);
    tree.add_local(a, Name::from("x"), target).unwrap();

    assert_eq!(tree.resolve(b, "x").unwrap(), target);
    assert_eq!(tree.resolve(a, "x").unwrap(), target);
    assert_eq!(tree.resolve_unchecked(b, "x"), target);
    assert_eq!(
        tree.resolve(sibling, "x").unwrap_err().code,
        ErrorCode::VariableNotDeclared
    );
    assert_eq!(
        tree.resolve(ScopeId::GLOBAL, "x").unwrap_err().code,
        ErrorCode::VariableNotDeclared
    );
}

#[test]
fn absent_names_fail_at_global() {
    let (tree, _, b, _) = chain();
    let error = tree.resolve(b, "nowhere").unwrap_err();
    assert_eq!(error.code, ErrorCode::VariableNotDeclared);
}

#[test]
fn undefined_scope_never_resolves() {
    let mut tree = ScopeTree::new();
    tree.add_local(ScopeId::GLOBAL, Name::from("x"), cell(0))
        .unwrap();
    let error = tree.resolve(ScopeId::UNDEFINED, "x").unwrap_err();
    assert_eq!(error.code, ErrorCode::VariableNotDeclared);
}

#[test]
fn inner_declarations_shadow_outer() {
    let (mut tree, a, b, _) = chain();
    tree.add_local(a, Name::from("x"), cell(0)).unwrap();
    let inner = cell(1);
    tree.add_local(b, Name::from("x"), inner).unwrap();
    assert_eq!(tree.resolve(b, "x").unwrap(), inner);
}

#[test]
fn duplicate_locals_are_rejected() {
    let mut tree = ScopeTree::new();
    tree.add_local(ScopeId::GLOBAL, Name::from("x"), cell(0))
        .unwrap();
    let error = tree
        .add_local(ScopeId::GLOBAL, Name::from("x"), cell(1))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::VariableAlreadyDeclared);
}

#[test]
fn namespaces_merge_classes_do_not() {
    let mut tree = ScopeTree::new();
    let first = tree
        .define_namespace(ScopeId::GLOBAL, &Name::from("math"))
        .unwrap();
    let again = tree
        .define_namespace(ScopeId::GLOBAL, &Name::from("math"))
        .unwrap();
    assert_eq!(first, again);

    let player = Name::from("Player");
    tree.define_class(ScopeId::GLOBAL, &player, RuntimeTypeId::new(1))
        .unwrap();
    let error = tree
        .define_class(ScopeId::GLOBAL, &player, RuntimeTypeId::new(2))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ScopeRedefinition);
    let error = tree.define_namespace(ScopeId::GLOBAL, &player).unwrap_err();
    assert_eq!(error.code, ErrorCode::ScopeRedefinition);
}

#[test]
fn nested_scopes_resolve_along_the_chain() {
    let (mut tree, a, b, sibling) = chain();
    let class = tree
        .define_class(a, &Name::from("Point"), RuntimeTypeId::new(1))
        .unwrap();
    assert_eq!(tree.resolve_scope(b, "Point").unwrap(), class);
    assert_eq!(tree.resolve_class(b, "Point").unwrap(), class);
    assert_eq!(
        tree.resolve_scope(sibling, "Point").unwrap_err().code,
        ErrorCode::ScopeNotDeclared
    );
    assert_eq!(
        tree.resolve_class(ScopeId::GLOBAL, "a").unwrap_err().code,
        ErrorCode::TypeMismatch
    );
}

#[test]
fn instance_members_go_to_the_template() {
    let mut tree = ScopeTree::new();
    let class = tree
        .define_class(ScopeId::GLOBAL, &Name::from("Player"), RuntimeTypeId::new(1))
        .unwrap();
    tree.add_instance_member(class, Name::from("hp"), cell(0))
        .unwrap();
    let template = tree.get(class).instance_template().unwrap();
    assert!(template.contains("hp"));
    assert!(!tree.contains_local(class, "hp"));

    let error = tree
        .add_instance_member(ScopeId::GLOBAL, Name::from("hp"), cell(1))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::TypeMismatch);
}

#[test]
fn call_scopes_are_anonymous() {
    let mut tree = ScopeTree::new();
    let call = tree.push_call_scope(ScopeId::GLOBAL, &Name::from("f"));
    assert_eq!(tree.parent(call), ScopeId::GLOBAL);
    assert_eq!(
        tree.resolve_scope(ScopeId::GLOBAL, "f").unwrap_err().code,
        ErrorCode::ScopeNotDeclared
    );
}

#[test]
fn ids_from_another_tree_are_rejected() {
    let mut first = ScopeTree::new();
    let mut second = ScopeTree::new();
    let ours = second.define_namespace(ScopeId::GLOBAL, &Name::from("b")).unwrap();
    let theirs = first.define_namespace(ScopeId::GLOBAL, &Name::from("a")).unwrap();
    assert_eq!(ours.index(), theirs.index());

    assert!(second.owns(ours));
    assert!(!second.owns(theirs));
    assert!(second.owns(ScopeId::GLOBAL));
    assert_eq!(second.check(theirs).unwrap_err().code, ErrorCode::ScopeNotDeclared);
}

#[test]
#[should_panic(expected = "not live in this tree")]
fn get_panics_on_foreign_ids() {
    let mut first = ScopeTree::new();
    let theirs = first.define_namespace(ScopeId::GLOBAL, &Name::from("a")).unwrap();
    let second = ScopeTree::new();
    let _ = second.get(theirs);
}

#[test]
fn released_call_scopes_are_reused() {
    let mut tree = ScopeTree::new();
    let outer = tree.push_call_scope(ScopeId::GLOBAL, &Name::from("f"));
    let inner = tree.push_call_scope(outer, &Name::from("g"));
    assert!(tree.release_call_scope(inner));
    assert!(tree.release_call_scope(outer));
    assert_eq!(tree.len(), 2);
    assert!(!tree.owns(outer));

    let again = tree.push_call_scope(ScopeId::GLOBAL, &Name::from("f"));
    assert_eq!(again, outer);
}

#[test]
fn definitions_inside_a_call_retain_it() {
    let mut tree = ScopeTree::new();
    let call = tree.push_call_scope(ScopeId::GLOBAL, &Name::from("f"));
    let local = tree.define_namespace(call, &Name::from("inner")).unwrap();
    assert!(!tree.release_call_scope(call));
    assert!(tree.owns(call));
    assert!(tree.owns(local));

    let other = tree.push_call_scope(ScopeId::GLOBAL, &Name::from("g"));
    tree.retain(other);
    assert!(!tree.release_call_scope(other));
    assert_eq!(tree.len(), 5);
}
