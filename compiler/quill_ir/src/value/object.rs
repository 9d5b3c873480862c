//! Class instances.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{Name, RuntimeTypeId, ScopeId, Value};

/// An instance of a class.
///
/// Members are owned values, filled with deep copies of the class's instance
/// template when the object is constructed. Cloning an object therefore
/// never shares member state with the original. Like `NamedSlotSet`, members
/// keep declaration order and are looked up by name through a hash index.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    class: ScopeId,
    class_name: Name,
    type_id: RuntimeTypeId,
    members: Vec<(Name, Value)>,
    index: FxHashMap<Name, usize>,
}

impl Object {
    pub fn new(
        class: ScopeId,
        class_name: Name,
        type_id: RuntimeTypeId,
        members: Vec<(Name, Value)>,
    ) -> Self {
        let mut index = FxHashMap::default();
        for (position, (name, _)) in members.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Object {
            class,
            class_name,
            type_id,
            members,
            index,
        }
    }

    /// Back-reference to the originating class scope.
    #[inline]
    pub fn class(&self) -> ScopeId {
        self.class
    }

    #[inline]
    pub fn class_name(&self) -> &Name {
        &self.class_name
    }

    #[inline]
    pub fn type_id(&self) -> RuntimeTypeId {
        self.type_id
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        let &position = self.index.get(name)?;
        Some(&self.members[position].1)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut Value> {
        let &position = self.index.get(name)?;
        Some(&mut self.members[position].1)
    }

    pub fn members(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.members.iter().map(|(name, value)| (name, value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.class_name)?;
        for (i, (name, value)) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {name}: {value}")?;
        }
        if self.members.is_empty() {
            write!(f, "}}")
        } else {
            write!(f, " }}")
        }
    }
}
