//! Declaration scopes.
//!
//! A [`Scope`] is plain data: its locals, the nested scopes declared inside
//! it, and, for classes, the instance template. Scopes refer to their parent
//! and nested scopes by [`ScopeId`]; the evaluator's scope tree owns them and
//! walks the parent chain for resolution.

use rustc_hash::FxHashMap;

use crate::{CellRef, Name, NamedSlotSet, RuntimeTypeId, ScopeId, SlotError};

/// Scope category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Sentinel scope named `#`. Never resolvable.
    Undefined,
    /// Named static declarations. Redefinition merges.
    Namespace,
    /// A namespace plus an instance template. Single definition.
    Class,
    /// Anonymous scope of one method invocation. Its locals live in frame
    /// cells and it is dropped when the call returns.
    Call,
    /// The unparented root.
    Global,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Undefined => "undefined",
            ScopeKind::Namespace => "namespace",
            ScopeKind::Class => "class",
            ScopeKind::Call => "call",
            ScopeKind::Global => "global",
        }
    }
}

/// Per-class data: runtime type id and the non-static member template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassLayout {
    type_id: RuntimeTypeId,
    instance: NamedSlotSet,
}

impl ClassLayout {
    #[inline]
    pub fn type_id(&self) -> RuntimeTypeId {
        self.type_id
    }

    /// Template cells copied into every new object of the class.
    #[inline]
    pub fn instance(&self) -> &NamedSlotSet {
        &self.instance
    }
}

/// A named declaration container with a parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    kind: ScopeKind,
    name: Name,
    parent: ScopeId,
    locals: NamedSlotSet,
    nested: FxHashMap<Name, ScopeId>,
    class: Option<ClassLayout>,
}

impl Scope {
    fn with_kind(kind: ScopeKind, name: Name, parent: ScopeId) -> Self {
        Scope {
            kind,
            name,
            parent,
            locals: NamedSlotSet::new(),
            nested: FxHashMap::default(),
            class: None,
        }
    }

    /// The sentinel scope. Its parent is itself.
    pub fn undefined() -> Self {
        Self::with_kind(ScopeKind::Undefined, Name::reserved(), ScopeId::UNDEFINED)
    }

    /// The root scope. Its parent is itself.
    pub fn global() -> Self {
        Self::with_kind(ScopeKind::Global, Name::from("global"), ScopeId::GLOBAL)
    }

    pub fn namespace(name: Name, parent: ScopeId) -> Self {
        Self::with_kind(ScopeKind::Namespace, name, parent)
    }

    /// Call scope for `method`, parented to the method's lexical scope.
    pub fn call(method: Name, lexical: ScopeId) -> Self {
        Self::with_kind(ScopeKind::Call, method, lexical)
    }

    pub fn class(name: Name, parent: ScopeId, type_id: RuntimeTypeId) -> Self {
        let mut scope = Self::with_kind(ScopeKind::Class, name, parent);
        scope.class = Some(ClassLayout {
            type_id,
            instance: NamedSlotSet::new(),
        });
        scope
    }

    #[inline]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Parent handle as stored. Undefined and Global store themselves.
    #[inline]
    pub fn parent(&self) -> ScopeId {
        self.parent
    }

    #[inline]
    pub fn locals(&self) -> &NamedSlotSet {
        &self.locals
    }

    #[inline]
    pub fn contains_local(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    /// Declare `name` in this scope. Fails if it is already declared here.
    pub fn add_local(&mut self, name: Name, target: CellRef) -> Result<(), SlotError> {
        self.locals.insert(name, target)
    }

    pub fn find_local(&self, name: &str) -> Result<CellRef, SlotError> {
        self.locals.find(name).map(|slot| slot.target())
    }

    /// Panics if `name` is not declared here; see [`NamedSlotSet::find_unchecked`].
    #[inline]
    pub fn find_local_unchecked(&self, name: &str) -> CellRef {
        self.locals.find_unchecked(name).target()
    }

    pub fn nested_scope(&self, name: &str) -> Option<ScopeId> {
        self.nested.get(name).copied()
    }

    pub fn add_nested(&mut self, name: Name, scope: ScopeId) {
        self.nested.insert(name, scope);
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        self.class.is_some()
    }

    pub fn class_layout(&self) -> Option<&ClassLayout> {
        self.class.as_ref()
    }

    pub fn type_id(&self) -> Option<RuntimeTypeId> {
        self.class.as_ref().map(ClassLayout::type_id)
    }

    pub fn instance_template(&self) -> Option<&NamedSlotSet> {
        self.class.as_ref().map(ClassLayout::instance)
    }

    pub fn instance_template_mut(&mut self) -> Option<&mut NamedSlotSet> {
        self.class.as_mut().map(|layout| &mut layout.instance)
    }
}
