use std::any::type_name;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use fixed_map::Map as FixedMap;
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::dsl::Expr;
use crate::error::ConfigError;
use crate::membership::MembershipFunction;
use crate::terms::{Term, Terms};
use crate::values::{FuzzyValue, FuzzyValueSet};

new_key_type! {
    /// Identifies one linguistic domain within its registry
    pub struct VariableKey;
}

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// Identifies one linguistic domain across every registry of the process.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DomainId {
    registry: u64,
    key: VariableKey,
}

impl DomainId {
    pub fn key(&self) -> VariableKey {
        self.key
    }
}

/// Handle naming a registered domain whose terms are `I`.
pub struct Variable<I>(pub(crate) DomainId, PhantomData<I>);

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Variable<I> {}

impl<I> PartialEq for Variable<I> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<I> Eq for Variable<I> {}

impl<I> std::fmt::Debug for Variable<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

impl<I> Variable<I> {
    pub fn id(self) -> DomainId {
        self.0
    }
}

/// Registry handing out a distinct id to every linguistic domain.
///
/// Ids from different registries never compare equal, so domains of several
/// registries can share one [`FuzzyValueSet`].
pub struct Variables {
    registry: u64,
    names: SlotMap<VariableKey, &'static str>,
}

impl Variables {
    pub fn new() -> Self {
        Self {
            registry: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            names: SlotMap::with_key(),
        }
    }

    /// Registers a domain for `I` and binds the given membership functions.
    /// Terms left out may be bound later with [`Domain::set`].
    pub fn add<I: Term>(&mut self, terms: Terms<I>) -> Result<Domain<I>, ConfigError> {
        let var = self.register::<I>()?;
        let mut domain = Domain::new(var);

        for (term, function) in terms.0.iter() {
            domain.set(term, *function);
        }

        Ok(domain)
    }

    /// Registers a domain for `I` without binding any functions.
    pub fn register<I: Term>(&mut self) -> Result<Variable<I>, ConfigError> {
        let domain = type_name::<I>();

        if I::ALL.is_empty() {
            return Err(ConfigError::EmptyDomain { domain });
        }

        let mut seen = HashSet::with_capacity(I::ALL.len());

        for term in I::ALL {
            if !seen.insert(*term) {
                return Err(ConfigError::DuplicateTerm {
                    domain,
                    term: format!("{term:?}"),
                });
            }
        }

        let key = self.names.insert(domain);

        debug!(domain, registry = self.registry, terms = I::ALL.len(), "registered linguistic domain");

        Ok(Variable(
            DomainId {
                registry: self.registry,
                key,
            },
            PhantomData,
        ))
    }

    /// Name of the term type a domain was registered with, if it was registered here
    pub fn name(&self, id: DomainId) -> Option<&'static str> {
        if id.registry != self.registry {
            return None;
        }

        self.names.get(id.key).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Variables {
    fn default() -> Self {
        Self::new()
    }
}

/// A linguistic domain: every term of `I` bound to at most one membership function.
pub struct Domain<I: Term> {
    var: Variable<I>,
    terms: FixedMap<I, MembershipFunction>,
}

impl<I: Term> Domain<I> {
    fn new(var: Variable<I>) -> Self {
        Self {
            var,
            terms: FixedMap::new(),
        }
    }

    pub fn variable(&self) -> Variable<I> {
        self.var
    }

    /// Binds `term` to `function`, replacing any previous binding.
    ///
    /// # Panics
    ///
    /// If `term` is missing from [`Term::ALL`].
    pub fn set(&mut self, term: I, function: impl Into<MembershipFunction>) {
        assert!(I::ALL.contains(&term), "term {term:?} is not declared in Term::ALL");

        self.terms.insert(term, function.into());
    }

    pub fn get(&self, term: I) -> Option<&MembershipFunction> {
        self.terms.get(term)
    }

    /// True once every term is bound
    pub fn is_valid(&self) -> bool {
        I::ALL.iter().all(|term| self.terms.contains_key(*term))
    }

    pub fn fx(&self, term: I, x: f64) -> Option<FuzzyValue<I>> {
        self.get(term).map(|function| FuzzyValue::new(term, function.fx(x)))
    }

    pub fn representative_value(&self, term: I) -> Option<f64> {
        self.get(term).map(MembershipFunction::representative_value)
    }

    /// Writes the degree of every bound term for the crisp value `x`.
    pub fn fuzzify(&self, x: f64, values: &mut FuzzyValueSet) {
        for term in I::ALL {
            if let Some(value) = self.fx(*term, x) {
                values.set(self.var, value);
            }
        }
    }

    /// The term `x` belongs to the most. Earlier terms win ties.
    pub fn classify(&self, x: f64) -> Option<I> {
        let mut best: Option<FuzzyValue<I>> = None;

        for term in I::ALL {
            let Some(value) = self.fx(*term, x) else {
                continue;
            };

            match best {
                Some(b) if value.degree > b.degree => best = Some(value),
                None => best = Some(value),
                _ => {},
            }
        }

        best.map(|value| value.term)
    }

    /// Proposition "this domain is `term`"
    pub fn is(&self, term: I) -> Expr {
        self.var.is(term)
    }
}
