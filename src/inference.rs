use std::any::type_name;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::InferenceError;
use crate::ops::{Accumulators, Defuzzer, MaxAvDefuzzer, MaxMerger, RuleEvaluator, SequentialEvaluator, ValuesMerger};
use crate::rules::{Rule, Rules};
use crate::terms::Term;
use crate::values::{FuzzyValue, FuzzyValueSet};
use crate::variable::Domain;

/// Scratch buffers of one inference pass, reused from one pass to the next.
///
/// A context must only serve one evaluation at a time; the `&mut` borrows
/// taken by the engine enforce that.
pub struct EvalContext<O: Term> {
    rule_outputs: Vec<FuzzyValue<O>>,
    accumulators: Accumulators<O>,
    merged: FuzzyValueSet,
}

impl<O: Term> EvalContext<O> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Preallocates room for the conclusions of `n_rules` rules
    pub fn with_capacity(n_rules: usize) -> Self {
        Self {
            rule_outputs: Vec::with_capacity(n_rules),
            accumulators: Accumulators::new(),
            merged: FuzzyValueSet::with_capacity(O::ALL.len()),
        }
    }

    /// Conclusions of the last pass, one per rule
    pub fn rule_outputs(&self) -> &[FuzzyValue<O>] {
        &self.rule_outputs
    }

    /// Merged output degrees of the last pass
    pub fn merged(&self) -> &FuzzyValueSet {
        &self.merged
    }

    /// Whether any rule concluded with a positive degree in the last pass
    pub fn fired(&self) -> bool {
        self.rule_outputs.iter().any(|value| value.degree > 0.)
    }

    pub fn reset(&mut self) {
        self.rule_outputs.clear();
        self.accumulators.clear();
        self.merged.clear();
    }
}

impl<O: Term> Default for EvalContext<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// A rule base over one output domain, reduced to a crisp value by pluggable stages.
pub struct InferenceEngine<O: Term, E = SequentialEvaluator, M = MaxMerger, D = MaxAvDefuzzer> {
    output: Arc<Domain<O>>,
    rules: Rules<O>,
    evaluator: E,
    merger: M,
    defuzzer: D,
    context: EvalContext<O>,
}

impl<O: Term> InferenceEngine<O> {
    pub fn new(output: Arc<Domain<O>>) -> Self {
        Self::with_strategies(output, SequentialEvaluator, MaxMerger, MaxAvDefuzzer)
    }

    pub fn with_rules(output: Arc<Domain<O>>, rules: impl IntoIterator<Item = Rule<O>>) -> Self {
        let mut engine = Self::new(output);

        engine.extend(rules);
        engine
    }
}

impl<O, E, M, D> InferenceEngine<O, E, M, D>
where
    O: Term,
    E: RuleEvaluator<O>,
    M: ValuesMerger<O>,
    D: Defuzzer<O>,
{
    pub fn with_strategies(output: Arc<Domain<O>>, evaluator: E, merger: M, defuzzer: D) -> Self {
        Self {
            output,
            rules: Rules::new(),
            evaluator,
            merger,
            defuzzer,
            context: EvalContext::new(),
        }
    }

    /// Must not be called while an evaluation is running
    pub fn add(&mut self, rule: Rule<O>) {
        self.rules.add(rule);
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule<O>>) {
        self.rules.extend(rules);
    }

    pub fn rules(&self) -> &Rules<O> {
        &self.rules
    }

    pub fn output(&self) -> &Arc<Domain<O>> {
        &self.output
    }

    /// Buffers of the last [`InferenceEngine::evaluate`] call
    pub fn context(&self) -> &EvalContext<O> {
        &self.context
    }

    /// A fresh context sized for this rule base, for use with [`InferenceEngine::evaluate_with`]
    pub fn new_context(&self) -> EvalContext<O> {
        EvalContext::with_capacity(self.rules.len())
    }

    /// Runs every rule against `inputs` and defuzzifies the merged conclusions.
    ///
    /// Returns NaN when the output domain has unbound terms, and with the
    /// default defuzzer also when no rule fired.
    pub fn evaluate(&mut self, inputs: &FuzzyValueSet) -> f64 {
        self.try_evaluate(inputs).unwrap_or(f64::NAN)
    }

    /// Same as [`InferenceEngine::evaluate`] but using a caller owned context,
    /// so that one engine can be shared by several threads.
    pub fn evaluate_with(&self, context: &mut EvalContext<O>, inputs: &FuzzyValueSet) -> f64 {
        infer(
            &self.output,
            &self.rules,
            &self.evaluator,
            &self.merger,
            &self.defuzzer,
            context,
            inputs,
        )
        .unwrap_or(f64::NAN)
    }

    /// Like [`InferenceEngine::evaluate`], telling apart the two ways a pass can come up empty.
    pub fn try_evaluate(&mut self, inputs: &FuzzyValueSet) -> Result<f64, InferenceError> {
        let Self {
            output,
            rules,
            evaluator,
            merger,
            defuzzer,
            context,
        } = self;

        infer(output, rules, evaluator, merger, defuzzer, context, inputs)
    }
}

/// Nothing is evaluated when the output domain is incomplete. A pass where no
/// rule fired is only an error when the defuzzer has no answer for it.
fn infer<O, E, M, D>(
    output: &Domain<O>,
    rules: &Rules<O>,
    evaluator: &E,
    merger: &M,
    defuzzer: &D,
    context: &mut EvalContext<O>,
    inputs: &FuzzyValueSet,
) -> Result<f64, InferenceError>
where
    O: Term,
    E: RuleEvaluator<O>,
    M: ValuesMerger<O>,
    D: Defuzzer<O>,
{
    if !output.is_valid() {
        warn!(domain = type_name::<O>(), "output domain has unbound terms, skipping inference");
        context.reset();

        return Err(InferenceError::IncompleteOutput {
            domain: type_name::<O>(),
        });
    }

    context.merged.clear();
    evaluator.evaluate_rules(rules.as_slice(), inputs, &mut context.rule_outputs);
    merger.merge_values(
        &context.rule_outputs,
        &mut context.accumulators,
        output.variable(),
        &mut context.merged,
    );

    let crisp = defuzzer.defuzze(output, &context.merged);

    if !context.fired() {
        debug!(rules = rules.len(), crisp, "no rule fired");

        if crisp.is_nan() {
            return Err(InferenceError::NoRulesFired);
        }
    }

    debug!(crisp, rules = rules.len(), "inference complete");

    Ok(crisp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{Coords, Shoulder, Triangular};
    use crate::terms::{Key, Terms};
    use crate::variable::Variables;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Desirability {
        Undesirable,
        Desirable,
        VeryDesirable,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum DistanceToTarget {
        Close,
        Medium,
        Far,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum AmmoStatus {
        Low,
        Okay,
        Loads,
    }

    impl Term for Desirability {
        const ALL: &'static [Self] = &[Self::Undesirable, Self::Desirable, Self::VeryDesirable];
    }

    impl Term for DistanceToTarget {
        const ALL: &'static [Self] = &[Self::Close, Self::Medium, Self::Far];
    }

    impl Term for AmmoStatus {
        const ALL: &'static [Self] = &[Self::Low, Self::Okay, Self::Loads];
    }

    struct Weapons {
        desirability: Arc<Domain<Desirability>>,
        distance: Domain<DistanceToTarget>,
        ammo: Domain<AmmoStatus>,
    }

    fn desirability_terms() -> Terms<Desirability> {
        let mut terms = Terms::new();

        terms.insert(
            Desirability::Undesirable,
            Shoulder::new(0., Coords::new(25., 1.), Coords::new(50., 0.), 100.),
        );
        terms.insert(
            Desirability::Desirable,
            Triangular::new(Coords::new(25., 0.), Coords::new(50., 1.), Coords::new(75., 0.)),
        );
        terms.insert(
            Desirability::VeryDesirable,
            Shoulder::new(0., Coords::new(50., 0.), Coords::new(75., 1.), 100.),
        );
        terms
    }

    fn weapons() -> Weapons {
        let mut vars = Variables::new();
        let mut distance_terms = Terms::new();
        let mut ammo_terms = Terms::new();

        distance_terms.insert(
            DistanceToTarget::Close,
            Shoulder::new(0., Coords::new(25., 1.), Coords::new(150., 0.), 400.),
        );
        distance_terms.insert(
            DistanceToTarget::Medium,
            Triangular::new(Coords::new(25., 0.), Coords::new(150., 1.), Coords::new(300., 0.)),
        );
        distance_terms.insert(
            DistanceToTarget::Far,
            Shoulder::new(0., Coords::new(150., 0.), Coords::new(300., 1.), 400.),
        );
        ammo_terms.insert(
            AmmoStatus::Low,
            Shoulder::new(0., Coords::new(0., 1.), Coords::new(10., 0.), 40.),
        );
        ammo_terms.insert(
            AmmoStatus::Okay,
            Triangular::new(Coords::new(0., 0.), Coords::new(10., 1.), Coords::new(30., 0.)),
        );
        ammo_terms.insert(
            AmmoStatus::Loads,
            Shoulder::new(0., Coords::new(10., 0.), Coords::new(30., 1.), 40.),
        );

        Weapons {
            desirability: Arc::new(vars.add(desirability_terms()).unwrap()),
            distance: vars.add(distance_terms).unwrap(),
            ammo: vars.add(ammo_terms).unwrap(),
        }
    }

    fn rocket_launcher_rules(w: &Weapons) -> Vec<Rule<Desirability>> {
        use AmmoStatus::*;
        use Desirability::*;
        use DistanceToTarget::*;

        let (dist, ammo) = (&w.distance, &w.ammo);

        vec![
            dist.is(Far).and(ammo.is(Loads)).then(Desirable),
            dist.is(Far).and(ammo.is(Okay)).then(Undesirable),
            dist.is(Far).and(ammo.is(Low)).then(Undesirable),
            dist.is(Medium).and(ammo.is(Loads)).then(VeryDesirable),
            dist.is(Medium).and(ammo.is(Okay)).then(VeryDesirable),
            dist.is(Medium).and(ammo.is(Low)).then(Desirable),
            dist.is(Close).and(ammo.is(Loads)).then(Undesirable),
            dist.is(Close).and(ammo.is(Okay)).then(Undesirable),
            dist.is(Close).and(ammo.is(Low)).then(Undesirable),
        ]
    }

    fn inputs(w: &Weapons, distance: f64, ammo: f64) -> FuzzyValueSet {
        let mut values = FuzzyValueSet::new();

        w.distance.fuzzify(distance, &mut values);
        w.ammo.fuzzify(ammo, &mut values);
        values
    }

    fn assert_fuzzy_value<T: Term>(term: T, degree: f64, value: FuzzyValue<T>) {
        assert_eq!(value.term, term);
        assert!((value.degree - degree).abs() < 0.005, "{value} != {term:?}@{degree}");
    }

    #[test]
    fn test_domains_are_valid() {
        let w = weapons();

        assert!(w.desirability.is_valid());
        assert!(w.distance.is_valid());
        assert!(w.ammo.is_valid());
    }

    #[test]
    fn test_rules_display() {
        let w = weapons();
        let rules = rocket_launcher_rules(&w);

        assert_eq!(rules[0].to_string(), "IF (Far AND Loads) THEN Desirable");
    }

    #[test]
    fn test_rule_evaluation() {
        use Desirability::*;

        let w = weapons();
        let mut engine = InferenceEngine::with_rules(w.desirability.clone(), rocket_launcher_rules(&w));

        engine.evaluate(&inputs(&w, 200., 8.));

        let result = engine.context().rule_outputs();

        assert_eq!(result.len(), 9);
        assert_fuzzy_value(Desirable, 0., result[0]);
        assert_fuzzy_value(Undesirable, 0.33, result[1]);
        assert_fuzzy_value(Undesirable, 0.2, result[2]);
        assert_fuzzy_value(VeryDesirable, 0., result[3]);
        assert_fuzzy_value(VeryDesirable, 0.67, result[4]);
        assert_fuzzy_value(Desirable, 0.2, result[5]);
        assert_fuzzy_value(Undesirable, 0., result[6]);
        assert_fuzzy_value(Undesirable, 0., result[7]);
        assert_fuzzy_value(Undesirable, 0., result[8]);
    }

    #[test]
    fn test_value_merge_by_or() {
        use Desirability::*;

        let w = weapons();
        let mut engine = InferenceEngine::with_rules(w.desirability.clone(), rocket_launcher_rules(&w));

        engine.evaluate(&inputs(&w, 200., 8.));

        let merged = engine.context().merged();
        let var = w.desirability.variable();

        assert_fuzzy_value(Undesirable, 0.33, merged.get(var, Undesirable));
        assert_fuzzy_value(Desirable, 0.2, merged.get(var, Desirable));
        assert_fuzzy_value(VeryDesirable, 0.67, merged.get(var, VeryDesirable));
    }

    #[test]
    fn test_inference() {
        let w = weapons();
        let mut engine = InferenceEngine::new(w.desirability.clone());

        for rule in rocket_launcher_rules(&w) {
            engine.add(rule);
        }

        let result = engine.evaluate(&inputs(&w, 200., 8.));

        assert!((result - 60.625).abs() < 0.25, "{result}");
        assert_eq!(engine.try_evaluate(&inputs(&w, 200., 8.)), Ok(result));
    }

    #[test]
    fn test_inference_is_deterministic() {
        let w = weapons();
        let mut engine = InferenceEngine::with_rules(w.desirability.clone(), rocket_launcher_rules(&w));
        let values = inputs(&w, 120., 27.);
        let first = engine.evaluate(&values);

        for _ in 0..10 {
            assert_eq!(engine.evaluate(&values).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_incomplete_output_is_nan() {
        let w = weapons();
        let mut vars = Variables::new();
        let mut terms = desirability_terms();

        terms.0.remove(Desirability::VeryDesirable);

        let incomplete = Arc::new(vars.add(terms).unwrap());
        let mut engine = InferenceEngine::with_rules(incomplete, rocket_launcher_rules(&w));

        assert!(engine.evaluate(&inputs(&w, 200., 8.)).is_nan());
        assert!(engine.evaluate(&FuzzyValueSet::new()).is_nan());
        assert!(engine.context().rule_outputs().is_empty());
        assert!(matches!(
            engine.try_evaluate(&inputs(&w, 200., 8.)),
            Err(InferenceError::IncompleteOutput { .. })
        ));
    }

    #[test]
    fn test_no_rules_fired() {
        let w = weapons();
        let mut engine = InferenceEngine::with_rules(w.desirability.clone(), rocket_launcher_rules(&w));
        let empty = FuzzyValueSet::new();

        assert!(engine.evaluate(&empty).is_nan());
        assert_eq!(engine.try_evaluate(&empty), Err(InferenceError::NoRulesFired));

        let mut no_rules = InferenceEngine::new(w.desirability.clone());

        assert!(no_rules.evaluate(&inputs(&w, 200., 8.)).is_nan());
    }

    #[test]
    fn test_hedged_rules() {
        use Desirability::*;

        let w = weapons();
        let (dist, ammo) = (&w.distance, &w.ammo);
        let mut engine = InferenceEngine::new(w.desirability.clone());

        engine.add(dist.is(DistanceToTarget::Medium).very().then(VeryDesirable));
        engine.add(ammo.is(AmmoStatus::Low).fairly().then(Undesirable));
        engine.add(dist.is(DistanceToTarget::Close).not().and(ammo.is(AmmoStatus::Loads)).then(Desirable));

        // Medium = 2/3, Low = 0.2, Loads = 0
        let result = engine.evaluate(&inputs(&w, 200., 8.));
        let very_medium = (2f64 / 3.).powi(2);
        let fairly_low = 0.2f64.sqrt();
        let expected = (87.5 * very_medium + 12.5 * fairly_low) / (very_medium + fairly_low);

        assert!((result - expected).abs() < 1e-9, "{result} != {expected}");
        assert_eq!(engine.context().rule_outputs()[2].degree, 0.);
    }

    #[test]
    fn test_shared_engine_across_threads() {
        let w = weapons();
        let engine = InferenceEngine::with_rules(w.desirability.clone(), rocket_launcher_rules(&w));
        let values = inputs(&w, 200., 8.);
        let expected = {
            let mut context = engine.new_context();

            engine.evaluate_with(&mut context, &values)
        };

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let mut context = engine.new_context();

                    for _ in 0..100 {
                        assert_eq!(engine.evaluate_with(&mut context, &values).to_bits(), expected.to_bits());
                    }
                });
            }
        });
    }

    /// Picks the representative value of the strongest term
    struct StrongestDefuzzer;

    impl Defuzzer<Desirability> for StrongestDefuzzer {
        fn defuzze(&self, output: &Domain<Desirability>, merged: &FuzzyValueSet) -> f64 {
            let var = output.variable();
            let strongest = Desirability::ALL
                .iter()
                .copied()
                .max_by(|a, b| merged.degree(var, *a).total_cmp(&merged.degree(var, *b)))
                .expect("non empty domain");

            output.representative_value(strongest).unwrap_or(f64::NAN)
        }
    }

    #[test]
    fn test_custom_defuzzer() {
        let w = weapons();
        let mut engine = InferenceEngine::with_strategies(
            w.desirability.clone(),
            SequentialEvaluator,
            MaxMerger,
            StrongestDefuzzer,
        );

        engine.extend(rocket_launcher_rules(&w));

        assert_eq!(engine.evaluate(&inputs(&w, 200., 8.)), 87.5);
        assert_eq!(engine.rules().len(), 9);

        // Nothing fires, yet this defuzzer still has an answer
        let empty = FuzzyValueSet::new();

        assert_eq!(engine.try_evaluate(&empty), Ok(87.5));
        assert!(!engine.context().fired());
    }
}
