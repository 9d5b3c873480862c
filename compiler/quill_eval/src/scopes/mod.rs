//! The program's scope tree.
//!
//! Scopes live in one `Vec` indexed by [`ScopeId`]. Index 0 is the Undefined
//! sentinel and index 1 is Global; both are created with the tree. A scope is
//! always pushed after its parent, so every parent id is lower than its
//! child's and walking the parent chain terminates.
//!
//! Call scopes are the only scopes that are ever removed. Anything that can
//! outlive a call (a namespace, a class, a method capturing its lexical
//! scope) retains its scope and everything below it.

use quill_ir::{ArenaId, CellRef, Name, RuntimeTypeId, Scope, ScopeId, ScopeKind};

use crate::errors::{
    foreign_scope, not_a_class, scope_not_declared, scope_redefinition, variable_not_declared,
};
use crate::EvalResult;

/// Scopes present in every tree.
const SENTINELS: usize = 2;

#[derive(Debug)]
pub struct ScopeTree {
    id: ArenaId,
    scopes: Vec<Scope>,
    /// Scopes below this index are never released.
    retained: usize,
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree {
            id: ArenaId::fresh(),
            scopes: vec![Scope::undefined(), Scope::global()],
            retained: SENTINELS,
        }
    }

    #[inline]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Whether `id` addresses a live scope of this tree.
    pub fn owns(&self, id: ScopeId) -> bool {
        if id.tree() == ArenaId::SHARED {
            id.index() < SENTINELS
        } else {
            id.tree() == self.id && id.index() < self.scopes.len()
        }
    }

    /// `id` itself, or `ScopeNotDeclared` when another tree issued it.
    pub fn check(&self, id: ScopeId) -> EvalResult<ScopeId> {
        if self.owns(id) {
            Ok(id)
        } else {
            Err(foreign_scope(id))
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false: the sentinels exist from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Panics on an id this tree did not hand out, or one it released.
    #[inline]
    pub fn get(&self, id: ScopeId) -> &Scope {
        assert!(self.owns(id), "scope #{} is not live in this tree", id.index());
        &self.scopes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        assert!(self.owns(id), "scope #{} is not live in this tree", id.index());
        &mut self.scopes[id.index()]
    }

    /// Parent of `id`. Undefined and Global return themselves.
    pub fn parent(&self, id: ScopeId) -> ScopeId {
        self.get(id).parent()
    }

    pub fn contains_local(&self, id: ScopeId, name: &str) -> bool {
        self.get(id).contains_local(name)
    }

    pub fn add_local(&mut self, id: ScopeId, name: Name, target: CellRef) -> EvalResult<()> {
        self.get_mut(id).add_local(name, target)?;
        Ok(())
    }

    /// Ids from `from` up to Global. Empty when starting at Undefined.
    fn chain(&self, from: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        let start = (from != ScopeId::UNDEFINED).then_some(from);
        std::iter::successors(start, move |&id| {
            let parent = self.parent(id);
            (parent != id).then_some(parent)
        })
    }

    /// Find the cell bound to `name`: locals of `from` first, then each
    /// parent in turn. Fails at Global when no scope declares it.
    pub fn resolve(&self, from: ScopeId, name: &str) -> EvalResult<CellRef> {
        self.chain(from)
            .find_map(|id| self.get(id).find_local(name).ok())
            .ok_or_else(|| variable_not_declared(name))
    }

    /// Resolution for a name the caller already proved visible.
    ///
    /// # Panics
    ///
    /// Panics if no scope on the chain declares `name`.
    pub fn resolve_unchecked(&self, from: ScopeId, name: &str) -> CellRef {
        let Some(owner) = self.chain(from).find(|&id| self.contains_local(id, name)) else {
            panic!("resolve_unchecked: `{name}` is not visible");
        };
        self.get(owner).find_local_unchecked(name)
    }

    /// Find a namespace or class named `name` declared in `from` or any of
    /// its parents.
    pub fn resolve_scope(&self, from: ScopeId, name: &str) -> EvalResult<ScopeId> {
        self.chain(from)
            .find_map(|id| self.get(id).nested_scope(name))
            .ok_or_else(|| scope_not_declared(name))
    }

    /// Like [`ScopeTree::resolve_scope`], but the result must be a class.
    pub fn resolve_class(&self, from: ScopeId, name: &str) -> EvalResult<ScopeId> {
        let id = self.resolve_scope(from, name)?;
        let scope = self.get(id);
        if scope.is_class() {
            Ok(id)
        } else {
            Err(not_a_class(name, scope.kind().as_str()))
        }
    }

    fn push(&mut self, scope: Scope) -> ScopeId {
        let raw = u32::try_from(self.scopes.len())
            .unwrap_or_else(|_| panic!("scope tree exceeded {} scopes", u32::MAX));
        self.scopes.push(scope);
        ScopeId::new(self.id, raw)
    }

    /// Define namespace `name` inside `parent`, or return the existing one so
    /// that later declarations merge into it.
    pub fn define_namespace(&mut self, parent: ScopeId, name: &Name) -> EvalResult<ScopeId> {
        if let Some(existing) = self.get(parent).nested_scope(name.as_str()) {
            let kind = self.get(existing).kind();
            if kind == ScopeKind::Namespace {
                return Ok(existing);
            }
            return Err(scope_redefinition(name, kind.as_str()));
        }
        let id = self.push(Scope::namespace(name.clone(), parent));
        self.retain(id);
        self.get_mut(parent).add_nested(name.clone(), id);
        tracing::debug!(namespace = %name, ?id, "defined namespace");
        Ok(id)
    }

    /// Define class `name` inside `parent`. Classes are single-definition.
    pub fn define_class(
        &mut self,
        parent: ScopeId,
        name: &Name,
        type_id: RuntimeTypeId,
    ) -> EvalResult<ScopeId> {
        if let Some(existing) = self.get(parent).nested_scope(name.as_str()) {
            return Err(scope_redefinition(name, self.get(existing).kind().as_str()));
        }
        let id = self.push(Scope::class(name.clone(), parent, type_id));
        self.retain(id);
        self.get_mut(parent).add_nested(name.clone(), id);
        tracing::debug!(class = %name, ?id, type_id = type_id.raw(), "defined class");
        Ok(id)
    }

    /// Add a member to the instance template of `class`.
    pub fn add_instance_member(
        &mut self,
        class: ScopeId,
        name: Name,
        target: CellRef,
    ) -> EvalResult<()> {
        let scope = self.get_mut(class);
        let kind = scope.kind();
        let label = scope.name().clone();
        let Some(template) = scope.instance_template_mut() else {
            return Err(not_a_class(label.as_str(), kind.as_str()));
        };
        template.insert(name, target)?;
        Ok(())
    }

    /// Anonymous scope for one method invocation. It is reachable only
    /// through the returned id, never by name.
    pub fn push_call_scope(&mut self, lexical: ScopeId, method: &Name) -> ScopeId {
        self.push(Scope::call(method.clone(), lexical))
    }

    /// Keep `id` and every scope pushed before it for the tree's lifetime.
    pub fn retain(&mut self, id: ScopeId) {
        self.retained = self.retained.max(id.index() + 1);
    }

    /// Drop call scope `id` along with the finished call scopes pushed after
    /// it. Returns false, keeping everything, when `id` was retained.
    pub fn release_call_scope(&mut self, id: ScopeId) -> bool {
        debug_assert_eq!(self.get(id).kind(), ScopeKind::Call);
        if id.index() < self.retained {
            return false;
        }
        self.scopes.truncate(id.index());
        true
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
