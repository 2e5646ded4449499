use super::context::RuleContext;
use crate::finding::{Category, Finding, Severity};

/// One entry of the rule table. Rules are independent pure functions over a
/// function summary; adding a rule never touches the existing ones.
pub trait Rule: Send + Sync {
    /// Category this rule reports. Each rule owns exactly one.
    fn category(&self) -> Category;

    /// Unique identifier, e.g. "unguarded-value-flow"
    fn name(&self) -> &str {
        self.category().id()
    }

    /// Human-readable description of what this rule checks
    fn description(&self) -> &str;

    /// Default severity of findings from this rule
    fn severity(&self) -> Severity;

    /// Evaluate the rule against one entry-point function
    fn evaluate(&self, context: &RuleContext) -> Vec<Finding>;
}
