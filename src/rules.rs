use std::fmt;

use crate::dsl::Expr;
use crate::math::clamp01;
use crate::terms::Term;
use crate::values::{FuzzyValue, FuzzyValueSet};

/// `IF premise THEN output`
#[derive(Clone, Debug, PartialEq)]
pub struct Rule<O> {
    output: O,
    premise: Expr,
}

impl<O: Term> Rule<O> {
    pub fn new(output: O, premise: Expr) -> Self {
        Self { output, premise }
    }

    pub fn output(&self) -> O {
        self.output
    }

    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    /// Firing strength of this rule, attributed to its output term
    pub fn evaluate(&self, values: &FuzzyValueSet) -> FuzzyValue<O> {
        FuzzyValue::new(self.output, clamp01(self.premise.evaluate(values)))
    }
}

impl<O: Term> fmt::Display for Rule<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN {:?}", self.premise, self.output)
    }
}

/// An ordered rule base concluding terms of `O`
#[derive(Clone, Debug)]
pub struct Rules<O>(pub(crate) Vec<Rule<O>>);

impl<O: Term> Rules<O> {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, rule: Rule<O>) {
        self.0.push(rule);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule<O>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Rule<O>] {
        &self.0
    }
}

impl<O: Term> Default for Rules<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Term> Extend<Rule<O>> for Rules<O> {
    fn extend<T: IntoIterator<Item = Rule<O>>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<O: Term> FromIterator<Rule<O>> for Rules<O> {
    fn from_iter<T: IntoIterator<Item = Rule<O>>>(iter: T) -> Self {
        Rules(iter.into_iter().collect())
    }
}

impl<'r, O> IntoIterator for &'r Rules<O> {
    type Item = &'r Rule<O>;
    type IntoIter = std::slice::Iter<'r, Rule<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
