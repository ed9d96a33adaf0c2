//! Fuzzy logic inference.
//!
//! Crisp measurements are fuzzified into the terms of linguistic domains,
//! a rule base built from AND / OR / NOT and the VERY / FAIRLY hedges is
//! evaluated against them, conclusions about the same output term are merged
//! by maximum, and the merged output is defuzzified with a weighted average
//! of each term's representative value.
//!
//! ```rust,ignore
//! let mut vars = Variables::new();
//! let distance = vars.add(distance_terms)?;
//! let ammo = vars.add(ammo_terms)?;
//! let desirability = Arc::new(vars.add(desirability_terms)?);
//!
//! let mut engine = InferenceEngine::new(desirability);
//!
//! engine.add(distance.is(Far).and(ammo.is(Loads)).then(Desirable));
//! engine.add(distance.is(Medium).and(ammo.is(Okay)).then(VeryDesirable));
//!
//! let mut inputs = FuzzyValueSet::new();
//!
//! distance.fuzzify(200., &mut inputs);
//! ammo.fuzzify(8., &mut inputs);
//!
//! let crisp = engine.evaluate(&inputs);
//! ```

mod dsl;
mod error;
mod inference;
mod math;
mod membership;
mod ops;
mod rules;
mod terms;
mod values;
mod variable;

pub use dsl::Expr;
pub use error::{ConfigError, InferenceError};
pub use inference::{EvalContext, InferenceEngine};
pub use math::{clamp01, lerp};
pub use membership::{Coords, MembershipFunction, Shoulder, Trapezoidal, Triangular};
pub use ops::{Accumulators, Defuzzer, MaxAvDefuzzer, MaxMerger, RuleEvaluator, SequentialEvaluator, ValuesMerger};
pub use rules::{Rule, Rules};
pub use terms::{Key, Term, Terms};
pub use values::{FuzzyValue, FuzzyValueSet, TermKey};
pub use variable::{Domain, DomainId, Variable, VariableKey, Variables};
