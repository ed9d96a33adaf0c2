use std::collections::HashMap;
use std::fmt;

use crate::terms::Term;
use crate::variable::{DomainId, Variable};

/// A term paired with its degree of membership.
///
/// The degree is not necessarily within `[0, 1]`; it gets clamped wherever an
/// expression reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyValue<T> {
    pub term: T,
    pub degree: f64,
}

impl<T> FuzzyValue<T> {
    pub fn new(term: T, degree: f64) -> Self {
        Self { term, degree }
    }
}

impl<T: fmt::Debug> fmt::Display for FuzzyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.term, self.degree)
    }
}

/// A term of one particular domain. Ordinals only need to be unique within a domain.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TermKey {
    pub(crate) variable: DomainId,
    pub(crate) ordinal: usize,
}

impl TermKey {
    pub(crate) fn new<T: Term>(variable: DomainId, term: T) -> Self {
        Self {
            variable,
            ordinal: term.ordinal(),
        }
    }

    pub fn variable(&self) -> DomainId {
        self.variable
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Degrees of terms from any number of domains. Missing terms read as zero.
#[derive(Clone, Debug, Default)]
pub struct FuzzyValueSet(HashMap<TermKey, f64>);

impl FuzzyValueSet {
    pub fn new() -> Self {
        FuzzyValueSet(HashMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FuzzyValueSet(HashMap::with_capacity(capacity))
    }

    /// Overwrites any previous degree of the same term
    pub fn set<T: Term>(&mut self, var: Variable<T>, value: FuzzyValue<T>) {
        self.set_degree(var, value.term, value.degree);
    }

    pub fn set_degree<T: Term>(&mut self, var: Variable<T>, term: T, degree: f64) {
        self.0.insert(TermKey::new(var.0, term), degree);
    }

    pub fn get<T: Term>(&self, var: Variable<T>, term: T) -> FuzzyValue<T> {
        FuzzyValue::new(term, self.degree(var, term))
    }

    pub fn degree<T: Term>(&self, var: Variable<T>, term: T) -> f64 {
        self.degree_of(TermKey::new(var.0, term))
    }

    pub(crate) fn degree_of(&self, key: TermKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
