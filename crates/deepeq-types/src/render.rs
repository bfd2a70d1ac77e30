//! `Display` and `Debug` for values.
//!
//! Values render as JS-like literals. A container that re-enters itself is
//! printed as `[Circular]`, so cyclic graphs can be logged and asserted on.

use std::fmt::{self, Write};

use crate::container::{ArrayRef, Identity, MapRef, ObjectRef, SetRef};
use crate::value::Value;

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n == f64::INFINITY {
        "Infinity".to_owned()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else {
        format!("{n}")
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    let bare = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if bare {
        f.write_str(key)
    } else {
        write_string(f, key)
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

fn write_items(
    f: &mut fmt::Formatter<'_>,
    stack: &mut Vec<Identity>,
    items: &[Value],
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        render(f, stack, item)?;
    }
    Ok(())
}

fn render(f: &mut fmt::Formatter<'_>, stack: &mut Vec<Identity>, value: &Value) -> fmt::Result {
    if let Some(id) = value.identity() {
        if stack.contains(&id) {
            return f.write_str("[Circular]");
        }
    }
    match value {
        Value::Undefined => f.write_str("undefined"),
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => f.write_str(&format_number(*n)),
        Value::String(s) => write_string(f, s),
        Value::Regex(r) => f.write_str(&r.pattern()),
        Value::Array(a) => {
            let items = a.snapshot();
            if items.is_empty() {
                return f.write_str("[]");
            }
            stack.push(a.identity());
            f.write_str("[ ")?;
            write_items(f, stack, &items)?;
            stack.pop();
            f.write_str(" ]")
        }
        Value::Object(o) => {
            let entries = o.snapshot();
            if entries.is_empty() {
                return f.write_str("{}");
            }
            stack.push(o.identity());
            f.write_str("{ ")?;
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_key(f, key)?;
                f.write_str(": ")?;
                render(f, stack, item)?;
            }
            stack.pop();
            f.write_str(" }")
        }
        Value::Map(m) => {
            let entries = m.snapshot();
            write!(f, "Map({})", entries.len())?;
            if entries.is_empty() {
                return f.write_str(" {}");
            }
            stack.push(m.identity());
            f.write_str(" { ")?;
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                render(f, stack, key)?;
                f.write_str(" => ")?;
                render(f, stack, item)?;
            }
            stack.pop();
            f.write_str(" }")
        }
        Value::Set(s) => {
            let members = s.snapshot();
            write!(f, "Set({})", members.len())?;
            if members.is_empty() {
                return f.write_str(" {}");
            }
            stack.push(s.identity());
            f.write_str(" { ")?;
            write_items(f, stack, &members)?;
            stack.pop();
            f.write_str(" }")
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, &mut Vec::new(), self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

macro_rules! debug_as_value {
    ($($handle:ident => $variant:ident),* $(,)?) => {
        $(
            impl fmt::Debug for $handle {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&Value::$variant(self.clone()), f)
                }
            }
        )*
    };
}

debug_as_value!(ArrayRef => Array, ObjectRef => Object, MapRef => Map, SetRef => Set);

impl fmt::Debug for crate::container::RegexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}
