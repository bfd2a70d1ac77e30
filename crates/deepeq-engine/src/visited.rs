//! Cycle guard.
//!
//! A [`Visited`] is the chain of container pairs currently being compared,
//! from the root down to the current recursion level. Each level lives in a
//! stack frame and points at its parent, so leaving a level drops it from
//! the chain, and concurrent async branches each see only their own
//! ancestry.
//!
//! A pair already on the chain, in either orientation, is treated as equal:
//! whatever the rest of that comparison finds is decided by the frame that
//! entered it first.

use deepeq_types::Identity;

#[derive(Clone, Copy, Debug, Default)]
pub struct Visited<'a> {
    pair: Option<(Identity, Identity)>,
    parent: Option<&'a Visited<'a>>,
}

impl<'a> Visited<'a> {
    /// An empty chain, for a new top-level comparison.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` if `(actual, expected)` or `(expected, actual)` is
    /// currently being compared.
    pub fn contains(&self, actual: Identity, expected: Identity) -> bool {
        let mut level = Some(self);
        while let Some(current) = level {
            if let Some((a, b)) = current.pair {
                if (a == actual && b == expected) || (a == expected && b == actual) {
                    return true;
                }
            }
            level = current.parent;
        }
        false
    }

    /// Extend the chain with a pair about to be compared.
    pub fn enter(&self, actual: Identity, expected: Identity) -> Visited<'_> {
        Visited {
            pair: Some((actual, expected)),
            parent: Some(self),
        }
    }

    /// Number of pairs on the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut level = Some(self);
        while let Some(current) = level {
            if current.pair.is_some() {
                depth += 1;
            }
            level = current.parent;
        }
        depth
    }
}
