//! Per-dimension visibility: everything, or an explicit allow-set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Visibility of one filter dimension.
///
/// `Unrestricted` shows everything. `Restricted` shows only its members,
/// and an empty `Restricted` set shows nothing; the two are never
/// interchangeable. On the wire this is `null` or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Option<BTreeSet<T>>",
    into = "Option<BTreeSet<T>>",
    bound(
        serialize = "T: Ord + Clone + Serialize",
        deserialize = "T: Ord + Deserialize<'de>"
    )
)]
pub enum Selection<T: Ord> {
    /// Every value passes, including ones not yet seen.
    Unrestricted,
    /// Only the listed values pass.
    Restricted(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection::Unrestricted
    }
}

impl<T: Ord> From<Option<BTreeSet<T>>> for Selection<T> {
    fn from(value: Option<BTreeSet<T>>) -> Self {
        match value {
            Some(set) => Selection::Restricted(set),
            None => Selection::Unrestricted,
        }
    }
}

impl<T: Ord> From<Selection<T>> for Option<BTreeSet<T>> {
    fn from(value: Selection<T>) -> Self {
        match value {
            Selection::Unrestricted => None,
            Selection::Restricted(set) => Some(set),
        }
    }
}

impl<T: Ord + Clone> Selection<T> {
    /// An explicit allow-set.
    pub fn only<I: IntoIterator<Item = T>>(items: I) -> Self {
        Selection::Restricted(items.into_iter().collect())
    }

    /// An explicit empty set: nothing visible.
    pub fn none() -> Self {
        Selection::Restricted(BTreeSet::new())
    }

    /// Whether everything in this dimension is visible.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Selection::Unrestricted)
    }

    /// Whether this dimension narrows anything, including the empty set.
    pub fn is_active(&self) -> bool {
        !self.is_unrestricted()
    }

    /// Whether `item` passes this dimension.
    pub fn allows(&self, item: &T) -> bool {
        match self {
            Selection::Unrestricted => true,
            Selection::Restricted(set) => set.contains(item),
        }
    }

    /// Whether `item` is filtered out by this dimension.
    pub fn excludes(&self, item: &T) -> bool {
        !self.allows(item)
    }

    /// The allow-set, if restricted.
    pub fn as_set(&self) -> Option<&BTreeSet<T>> {
        match self {
            Selection::Unrestricted => None,
            Selection::Restricted(set) => Some(set),
        }
    }

    /// Flip one item against the full `domain`.
    ///
    /// From `Unrestricted`, every domain item except `item` stays visible.
    /// Otherwise `item` is added or removed. A set covering the whole
    /// domain collapses back to `Unrestricted`; an empty set is kept.
    pub fn toggle(&mut self, item: &T, domain: &BTreeSet<T>) {
        let next = match std::mem::take(self) {
            Selection::Unrestricted => {
                let mut set = domain.clone();
                set.remove(item);
                set
            }
            Selection::Restricted(mut set) => {
                if !set.remove(item) {
                    set.insert(item.clone());
                }
                set
            }
        };
        *self = Self::collapse(next, domain);
    }

    /// Show everything (`true`) or nothing (`false`).
    pub fn set_all(&mut self, visible: bool) {
        *self = if visible {
            Selection::Unrestricted
        } else {
            Selection::none()
        };
    }

    /// Collapse in place if the allow-set now covers `domain`.
    ///
    /// Used when the domain itself changed under an existing selection.
    pub fn recollapse(&mut self, domain: &BTreeSet<T>) {
        if let Selection::Restricted(set) = self {
            if domain.is_subset(set) {
                *self = Selection::Unrestricted;
            }
        }
    }

    /// `Unrestricted` if `set` covers `domain`, otherwise `Restricted(set)`.
    pub fn collapse(set: BTreeSet<T>, domain: &BTreeSet<T>) -> Self {
        if domain.is_subset(&set) {
            Selection::Unrestricted
        } else {
            Selection::Restricted(set)
        }
    }
}
