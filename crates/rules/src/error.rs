//! Error taxonomy for rule parsing, configuration and evaluation.

use crate::schema::RuleType;
use crate::threshold::ThresholdKind;

/// Errors raised while loading, compiling or evaluating alert rules.
///
/// Threshold and configuration errors are fatal at startup. `MissingGoalData`
/// is returned by the evaluator for a single (category, rule) pair and only
/// skips that pair.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The `at` expression matches none of the threshold grammars.
    #[error("invalid threshold expression: '{expression}'")]
    InvalidThresholdExpression { expression: String },

    /// The expression parsed, but its kind is not allowed for the rule type.
    #[error("threshold '{expression}' is a {kind} threshold, which {rule_type} rules do not accept")]
    IncompatibleThresholdKind {
        expression: String,
        kind: ThresholdKind,
        rule_type: RuleType,
    },

    /// A goal-dependent rule ran against a category with no usable limit.
    #[error("category '{category}' has no spending limit to evaluate against")]
    MissingGoalData { category: String },

    /// Structurally invalid configuration (bad numbers, duplicates, env refs).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any of the above, attributed to the category or section it came from.
    #[error("{scope}: {source}")]
    InScope {
        scope: String,
        source: Box<RuleError>,
    },

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl RuleError {
    /// Attach the category (or config section) the error was found in.
    pub fn in_scope(self, scope: impl Into<String>) -> Self {
        RuleError::InScope {
            scope: scope.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any scope wrappers removed.
    pub fn root(&self) -> &RuleError {
        match self {
            RuleError::InScope { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
