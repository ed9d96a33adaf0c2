use std::fmt::Debug;
use std::hash::Hash;

pub use fixed_map::Key;
use fixed_map::Map as FixedMap;

use crate::membership::MembershipFunction;

/// A linguistic label, such as `Cold`, `Warm` or `Hot`.
///
/// Implemented on a fieldless enum that also derives [`Key`]. `ALL` must list
/// every variant exactly once; the order is used for tie breaking and
/// iteration everywhere in this crate.
pub trait Term: Key + Copy + Eq + Hash + Debug + 'static {
    const ALL: &'static [Self];

    /// Position of this term within [`Term::ALL`].
    ///
    /// Scans `ALL`, which is only done when a proposition is built or a
    /// degree is stored; evaluating a proposition reuses the ordinal captured
    /// at build time. Enums declaring `ALL` in variant order can return
    /// `self as usize` instead.
    fn ordinal(self) -> usize {
        Self::ALL
            .iter()
            .position(|term| *term == self)
            .expect("term to be declared in Term::ALL")
    }
}

/// Membership functions to bind to the terms of one domain.
pub struct Terms<K: Term>(pub(crate) FixedMap<K, MembershipFunction>);

impl<K: Term> Terms<K> {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: K, value: impl Into<MembershipFunction>) {
        self.0.insert(key, value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Term> Default for Terms<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Term, F: Into<MembershipFunction>> FromIterator<(K, F)> for Terms<K> {
    fn from_iter<T: IntoIterator<Item = (K, F)>>(iter: T) -> Self {
        let mut terms = Self::new();

        for (key, value) in iter {
            terms.insert(key, value);
        }

        terms
    }
}
