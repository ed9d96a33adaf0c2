//! Error types for fuzzy set configuration and inference.

/// Errors raised while building membership functions or registering domains.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The two inner points of a trapezoid must share the same height.
    #[error("trapezoid plateau mismatch: p1.y = {p1_y}, p2.y = {p2_y}")]
    PlateauMismatch { p1_y: f64, p2_y: f64 },

    /// A term type declared no terms at all.
    #[error("linguistic domain `{domain}` declares no terms")]
    EmptyDomain { domain: &'static str },

    /// A term type listed the same term more than once.
    #[error("linguistic domain `{domain}` declares term `{term}` more than once")]
    DuplicateTerm { domain: &'static str, term: String },
}

/// Reasons an inference pass produced no crisp value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// At least one output term has no membership function bound.
    #[error("output domain `{domain}` has unbound terms")]
    IncompleteOutput { domain: &'static str },

    /// Every rule concluded with a zero degree.
    #[error("no rule fired")]
    NoRulesFired,
}
