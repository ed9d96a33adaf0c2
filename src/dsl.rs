use std::fmt;

use crate::math::clamp01;
use crate::rules::Rule;
use crate::terms::Term;
use crate::values::{FuzzyValueSet, TermKey};
use crate::variable::{DomainId, Variable};

/// A rule premise. Every node evaluates to a degree within `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Degree of one term of one domain. `label` is only used for display.
    Is { key: TermKey, label: String },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    /// Intensifying hedge: the square of the inner degree
    Very(Box<Expr>),
    /// Diluting hedge: the square root of the inner degree
    Fairly(Box<Expr>),
}

impl Expr {
    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn very(self) -> Self {
        Expr::Very(Box::new(self))
    }

    pub fn fairly(self) -> Self {
        Expr::Fairly(Box::new(self))
    }

    /// Turns this premise into a rule concluding `output`.
    pub fn then<O: Term>(self, output: O) -> Rule<O> {
        Rule::new(output, self)
    }

    pub fn evaluate(&self, values: &FuzzyValueSet) -> f64 {
        match self {
            Expr::Is { key, .. } => clamp01(values.degree_of(*key)),
            Expr::And(lhs, rhs) => clamp01(f64::min(lhs.evaluate(values), rhs.evaluate(values))),
            Expr::Or(lhs, rhs) => clamp01(f64::max(lhs.evaluate(values), rhs.evaluate(values))),
            Expr::Not(expr) => 1. - clamp01(expr.evaluate(values)),
            Expr::Very(expr) => {
                let degree = clamp01(expr.evaluate(values));

                degree * degree
            },
            Expr::Fairly(expr) => clamp01(expr.evaluate(values)).sqrt(),
        }
    }

    /// Every term referenced by this expression, left to right
    pub fn propositions(&self) -> Vec<(DomainId, &str)> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<(DomainId, &'p str)>) {
            match expr {
                Expr::Is { key, label } => out.push((key.variable, label.as_str())),
                Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
                Expr::Not(expr) | Expr::Very(expr) | Expr::Fairly(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Is { label, .. } => f.write_str(label),
            Expr::And(lhs, rhs) => write!(f, "({lhs} AND {rhs})"),
            Expr::Or(lhs, rhs) => write!(f, "({lhs} OR {rhs})"),
            Expr::Not(expr) => write!(f, "NOT({expr})"),
            Expr::Very(expr) => write!(f, "VERY({expr})"),
            Expr::Fairly(expr) => write!(f, "FAIRLY({expr})"),
        }
    }
}

impl<I: Term> Variable<I> {
    pub fn is(self, rhs: I) -> Expr {
        Expr::Is {
            key: TermKey::new(self.0, rhs),
            label: format!("{rhs:?}"),
        }
    }
}
