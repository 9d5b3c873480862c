//! Runtime values for the Quill interpreter.
//!
//! [`Value`] is a closed sum type. Literal kinds are held inline; heap kinds
//! are owned exclusively, so `clone()` is always a recursive deep copy and two
//! values never share mutable state. A method's action body is immutable and
//! is the one payload copies share. The only aliasing kind is
//! [`Value::Reference`], a non-owning handle to a cell elsewhere.
//!
//! Every visitor over `Value` (display, operators, formatting) matches all
//! kinds explicitly. There is no wildcard fallback, so adding a kind is a
//! compile error at each dispatch site until it is handled.

mod method;
mod object;

use std::fmt;

use crate::{CellRef, Scope};

pub use method::{CallArgs, Method, NativeFn, NativeMethod};
pub use object::Object;

/// Runtime value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    // Literal kinds (inline)
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Unicode character.
    Char(char),
    /// Single byte.
    Byte(u8),
    /// Immutable string view.
    StrView(&'static str),
    /// First-class empty value. Identity element for arithmetic.
    None,
    /// Uninitialized or consumed binding. Not constructible from source.
    #[default]
    Undefined,
    /// Non-owning, nullable handle to another value.
    Reference(Option<CellRef>),

    // Heap kinds (owned, deep-copied)
    /// Owned string.
    Str(String),
    /// Snapshot of a scope.
    Scope(Box<Scope>),
    /// Class instance.
    Object(Box<Object>),
    /// Interpreted method.
    Method(Box<Method>),
    /// Natively implemented method.
    NativeMethod(Box<NativeMethod>),
    /// Ordered sequence.
    List(Vec<Value>),
}

/// The active tag of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    UInt,
    Float,
    Bool,
    Char,
    Byte,
    StrView,
    None,
    Undefined,
    Reference,
    Str,
    Scope,
    Object,
    Method,
    NativeMethod,
    List,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::UInt => "uint",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Char => "char",
            ValueKind::Byte => "byte",
            ValueKind::StrView => "str_view",
            ValueKind::None => "none",
            ValueKind::Undefined => "undefined",
            ValueKind::Reference => "reference",
            ValueKind::Str => "str",
            ValueKind::Scope => "scope",
            ValueKind::Object => "object",
            ValueKind::Method => "method",
            ValueKind::NativeMethod => "native_method",
            ValueKind::List => "list",
        }
    }

    /// Whether values of this kind are held inline.
    pub fn is_literal(self) -> bool {
        match self {
            ValueKind::Int
            | ValueKind::UInt
            | ValueKind::Float
            | ValueKind::Bool
            | ValueKind::Char
            | ValueKind::Byte
            | ValueKind::StrView
            | ValueKind::None
            | ValueKind::Undefined
            | ValueKind::Reference => true,
            ValueKind::Str
            | ValueKind::Scope
            | ValueKind::Object
            | ValueKind::Method
            | ValueKind::NativeMethod
            | ValueKind::List => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Factory methods

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn uint(n: u64) -> Self {
        Value::UInt(n)
    }

    #[inline]
    pub fn float(n: f64) -> Self {
        Value::Float(n)
    }

    /// Create an owned string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    #[inline]
    pub fn object(object: Object) -> Self {
        Value::Object(Box::new(object))
    }

    #[inline]
    pub fn method(method: Method) -> Self {
        Value::Method(Box::new(method))
    }

    #[inline]
    pub fn native(method: NativeMethod) -> Self {
        Value::NativeMethod(Box::new(method))
    }

    #[inline]
    pub fn scope(scope: Scope) -> Self {
        Value::Scope(Box::new(scope))
    }

    #[inline]
    pub fn reference(target: CellRef) -> Self {
        Value::Reference(Some(target))
    }

    #[inline]
    pub fn null_reference() -> Self {
        Value::Reference(None)
    }
}

// Inspection

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Char(_) => ValueKind::Char,
            Value::Byte(_) => ValueKind::Byte,
            Value::StrView(_) => ValueKind::StrView,
            Value::None => ValueKind::None,
            Value::Undefined => ValueKind::Undefined,
            Value::Reference(_) => ValueKind::Reference,
            Value::Str(_) => ValueKind::Str,
            Value::Scope(_) => ValueKind::Scope,
            Value::Object(_) => ValueKind::Object,
            Value::Method(_) => ValueKind::Method,
            Value::NativeMethod(_) => ValueKind::NativeMethod,
            Value::List(_) => ValueKind::List,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(&**object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(object) => Some(&mut **object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            Value::StrView(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "'{c}'"),
            Value::Byte(b) => write!(f, "0x{b:02x}"),
            Value::StrView(s) => write!(f, "\"{s}\""),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::None => write!(f, "none"),
            Value::Undefined => write!(f, "undefined"),
            Value::Reference(Some(target)) => write!(f, "&{target}"),
            Value::Reference(None) => write!(f, "&null"),
            Value::Scope(scope) => write!(f, "<{} {}>", scope.kind().as_str(), scope.name()),
            Value::Object(object) => write!(f, "{object}"),
            Value::Method(method) => write!(f, "<method {}/{}>", method.name(), method.arity()),
            Value::NativeMethod(native) => {
                write!(f, "<native {}/{}>", native.name(), native.arity())
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
