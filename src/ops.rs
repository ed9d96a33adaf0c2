//! The three stages of an inference pass: rule evaluation, merging of the
//! rule conclusions and defuzzification. Each stage is a trait with one
//! default implementation.

use fixed_map::Map as FixedMap;
use tracing::{trace, warn};

use crate::rules::Rule;
use crate::terms::Term;
use crate::values::{FuzzyValue, FuzzyValueSet};
use crate::variable::{Domain, Variable};

/// Computes the firing strength of every rule.
pub trait RuleEvaluator<O: Term> {
    /// Replaces the contents of `outputs` with one conclusion per rule, in rule order.
    fn evaluate_rules(&self, rules: &[Rule<O>], inputs: &FuzzyValueSet, outputs: &mut Vec<FuzzyValue<O>>);
}

/// Evaluates rules one after the other into a reused buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialEvaluator;

impl<O: Term> RuleEvaluator<O> for SequentialEvaluator {
    fn evaluate_rules(&self, rules: &[Rule<O>], inputs: &FuzzyValueSet, outputs: &mut Vec<FuzzyValue<O>>) {
        // Keeps the allocation around while the rule count doesn't grow
        outputs.clear();
        outputs.extend(rules.iter().map(|rule| {
            let value = rule.evaluate(inputs);

            trace!(%rule, degree = value.degree, "rule evaluated");

            value
        }));
    }
}

/// Per term scratch lists of the conclusions that fired for it.
pub struct Accumulators<O: Term>(FixedMap<O, Vec<f64>>);

impl<O: Term> Accumulators<O> {
    pub fn new() -> Self {
        let mut map = FixedMap::new();

        for term in O::ALL {
            map.insert(*term, Vec::with_capacity(10));
        }

        Self(map)
    }

    /// Conclusions about terms missing from [`Term::ALL`] are dropped.
    pub fn push(&mut self, value: FuzzyValue<O>) {
        match self.0.get_mut(value.term) {
            Some(degrees) => degrees.push(value.degree),
            None => warn!(term = ?value.term, "dropping conclusion about an undeclared term"),
        }
    }

    /// Largest collected degree of `term`, or zero if none was collected.
    /// Empties the term's list.
    pub fn drain_max(&mut self, term: O) -> f64 {
        let Some(degrees) = self.0.get_mut(term) else {
            return 0.;
        };
        let max = degrees.iter().fold(0., |max, degree| if *degree > max { *degree } else { max });

        degrees.clear();

        max
    }

    pub fn clear(&mut self) {
        for term in O::ALL {
            if let Some(degrees) = self.0.get_mut(*term) {
                degrees.clear();
            }
        }
    }

    /// True when no degree is waiting to be merged
    pub fn is_empty(&self) -> bool {
        O::ALL
            .iter()
            .all(|term| self.0.get(*term).map_or(true, Vec::is_empty))
    }
}

impl<O: Term> Default for Accumulators<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Combines the conclusions of several rules about the same output term.
pub trait ValuesMerger<O: Term> {
    /// Writes one degree for every term of `O` into `merged`, keyed by `output`.
    /// `accumulators` must be left empty.
    fn merge_values(
        &self,
        values: &[FuzzyValue<O>],
        accumulators: &mut Accumulators<O>,
        output: Variable<O>,
        merged: &mut FuzzyValueSet,
    );
}

/// ORs conclusions together: each term gets the largest positive degree concluded for it.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxMerger;

impl<O: Term> ValuesMerger<O> for MaxMerger {
    fn merge_values(
        &self,
        values: &[FuzzyValue<O>],
        accumulators: &mut Accumulators<O>,
        output: Variable<O>,
        merged: &mut FuzzyValueSet,
    ) {
        for value in values {
            if value.degree <= 0. {
                continue;
            }

            accumulators.push(*value);
        }

        for term in O::ALL {
            let degree = accumulators.drain_max(*term);

            trace!(term = ?term, degree, "merged output");

            merged.set_degree(output, *term, degree);
        }
    }
}

/// Reduces merged output degrees to a single crisp value.
pub trait Defuzzer<O: Term> {
    fn defuzze(&self, output: &Domain<O>, merged: &FuzzyValueSet) -> f64;
}

/// Average of each term's representative value weighted by its degree.
///
/// Cheap stand-in for the centroid of the aggregated shape. Returns NaN when
/// no term has a positive degree.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxAvDefuzzer;

impl<O: Term> Defuzzer<O> for MaxAvDefuzzer {
    fn defuzze(&self, output: &Domain<O>, merged: &FuzzyValueSet) -> f64 {
        let var = output.variable();
        let mut sum_weighted = 0.;
        let mut sum_degrees = 0.;

        for term in O::ALL {
            let degree = merged.degree(var, *term);

            if degree <= 0. {
                continue;
            }

            let Some(representative) = output.representative_value(*term) else {
                return f64::NAN;
            };

            sum_weighted += representative * degree;
            sum_degrees += degree;
        }

        sum_weighted / sum_degrees
    }
}
