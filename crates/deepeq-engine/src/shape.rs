//! Container-kind dispatch shared by the comparison and diff engines.

use deepeq_types::{ArrayRef, ContainerKind, Identity, MapRef, ObjectRef, SetRef, Value};

/// How a pair of values is traversed.
#[derive(Debug)]
pub enum Shape<'v> {
    /// Both sides are containers of the same kind.
    Containers(ContainerPair<'v>),
    /// At least one side is a container and the kinds differ.
    Mismatch {
        actual: ContainerKind,
        expected: ContainerKind,
    },
    /// Neither side is a container.
    Leaves,
}

/// Two containers of the same kind.
#[derive(Debug)]
pub enum ContainerPair<'v> {
    Arrays(&'v ArrayRef, &'v ArrayRef),
    Objects(&'v ObjectRef, &'v ObjectRef),
    Maps(&'v MapRef, &'v MapRef),
    Sets(&'v SetRef, &'v SetRef),
}

impl<'v> Shape<'v> {
    pub fn of(actual: &'v Value, expected: &'v Value) -> Self {
        match (actual, expected) {
            (Value::Array(a), Value::Array(b)) => Self::Containers(ContainerPair::Arrays(a, b)),
            (Value::Object(a), Value::Object(b)) => Self::Containers(ContainerPair::Objects(a, b)),
            (Value::Map(a), Value::Map(b)) => Self::Containers(ContainerPair::Maps(a, b)),
            (Value::Set(a), Value::Set(b)) => Self::Containers(ContainerPair::Sets(a, b)),
            _ if actual.kind().is_container() || expected.kind().is_container() => Self::Mismatch {
                actual: actual.kind(),
                expected: expected.kind(),
            },
            _ => Self::Leaves,
        }
    }
}

impl ContainerPair<'_> {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Arrays(..) => ContainerKind::Array,
            Self::Objects(..) => ContainerKind::PlainObject,
            Self::Maps(..) => ContainerKind::Map,
            Self::Sets(..) => ContainerKind::Set,
        }
    }

    /// Identities of the two containers, for the cycle guard.
    pub fn identities(&self) -> (Identity, Identity) {
        match self {
            Self::Arrays(a, b) => (a.identity(), b.identity()),
            Self::Objects(a, b) => (a.identity(), b.identity()),
            Self::Maps(a, b) => (a.identity(), b.identity()),
            Self::Sets(a, b) => (a.identity(), b.identity()),
        }
    }
}
