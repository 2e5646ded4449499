use solflow::finding::*;
use solflow::rule::{Rule, RuleContext};

/// Flags public/external functions that change state or touch value/low-level
/// calls without any access-control evidence.
pub struct UnrestrictedEntryPoint;

impl Rule for UnrestrictedEntryPoint {
    fn category(&self) -> Category {
        Category::UnrestrictedEntryPoint
    }

    fn description(&self) -> &str {
        "State-changing or sensitive entry point callable by anyone"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let func = ctx.function;
        if func.has_access_control || !(func.mutates_state || !func.sensitive_ops.is_empty()) {
            return Vec::new();
        }

        let mut reasons = Vec::new();
        if func.mutates_state {
            reasons.push("modifies state".to_string());
        }
        reasons.extend(func.sensitive_ops.iter().map(|op| op.detail.clone()));

        vec![Finding {
            category: self.category(),
            severity: self.severity(),
            title: format!("Unrestricted entry point `{}`", func.name),
            message: format!(
                "Function `{}` is {} and {}, but has no access-control modifier or \
                 ownership check. Any account can call it.",
                func.name,
                visibility_label(ctx),
                reasons.join(", ")
            ),
            contract_name: ctx.contract.name.clone(),
            function_name: func.name.clone(),
            location: ctx.function_location(),
            detail: Some(reasons.join("; ")),
            recommendation: Some(
                "Restrict the function with a modifier such as `onlyOwner`, or check \
                 `msg.sender` against an authorized role."
                    .to_string(),
            ),
        }]
    }
}

fn visibility_label(ctx: &RuleContext) -> &'static str {
    match ctx.function.visibility {
        solflow::summary::Visibility::External => "external",
        _ => "public",
    }
}
