use std::fmt;

/// Runtime-shape classification of a [`Value`](crate::Value).
///
/// The kind decides how two values are traversed: containers of the same
/// kind are walked element by element, everything else is a leaf handed to
/// a leaf comparator. Regular expressions are leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Array,
    PlainObject,
    Map,
    Set,
    Leaf,
}

impl ContainerKind {
    /// Returns `true` for every kind the engines recurse into.
    pub fn is_container(self) -> bool {
        !matches!(self, Self::Leaf)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::PlainObject => "object",
            Self::Map => "map",
            Self::Set => "set",
            Self::Leaf => "leaf",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
