//! Rendering values for `DebugPrint`.
//!
//! `Value`'s own `Display` cannot see memory, so it prints references as
//! handles. `format_value` follows them and renders the target instead,
//! recursing through lists and object members.

use std::fmt::Write;

use quill_ir::{SlotReader, Value};
use quill_stack::ensure_sufficient_stack;

use crate::memory::follow;

/// Render `value`, following references through `slots`.
///
/// A reference that cannot be followed renders as the reference itself.
pub fn format_value<S>(value: &Value, slots: &S) -> String
where
    S: SlotReader + ?Sized,
{
    let mut out = String::new();
    write_value(&mut out, value, slots);
    out
}

fn write_value<S>(out: &mut String, value: &Value, slots: &S)
where
    S: SlotReader + ?Sized,
{
    let Ok(value) = follow(value, slots) else {
        let _ = write!(out, "{value}");
        return;
    };
    match value {
        Value::List(items) => ensure_sufficient_stack(|| {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, slots);
            }
            out.push(']');
        }),
        Value::Object(object) => ensure_sufficient_stack(|| {
            let _ = write!(out, "{} {{", object.class_name());
            for (i, (name, member)) in object.members().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, " {name}: ");
                write_value(out, member, slots);
            }
            out.push_str(if object.is_empty() { "}" } else { " }" });
        }),
        Value::Int(_)
        | Value::UInt(_)
        | Value::Float(_)
        | Value::Bool(_)
        | Value::Char(_)
        | Value::Byte(_)
        | Value::StrView(_)
        | Value::None
        | Value::Undefined
        | Value::Reference(_)
        | Value::Str(_)
        | Value::Scope(_)
        | Value::Method(_)
        | Value::NativeMethod(_) => {
            let _ = write!(out, "{value}");
        }
    }
}
