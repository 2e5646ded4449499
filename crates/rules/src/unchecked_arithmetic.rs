use solflow::finding::*;
use solflow::rule::{Rule, RuleContext};

/// Flags arithmetic mutations inside `unchecked { }` blocks.
pub struct UncheckedArithmetic;

impl Rule for UncheckedArithmetic {
    fn category(&self) -> Category {
        Category::UncheckedArithmetic
    }

    fn description(&self) -> &str {
        "Arithmetic inside an unchecked block can silently wrap"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let flow = &ctx.function.flow;
        if !flow.unchecked_has_arithmetic {
            return Vec::new();
        }
        let ops: Vec<_> = flow.unchecked_ops().collect();
        let Some(first) = ops.first() else {
            return Vec::new();
        };
        let texts: Vec<&str> = ops.iter().map(|op| op.text.as_str()).collect();

        vec![Finding {
            category: self.category(),
            severity: self.severity(),
            title: format!("Unchecked arithmetic in `{}`", ctx.function.name),
            message: format!(
                "`{}` runs without overflow checks: {}",
                ctx.function.name,
                texts.join(", ")
            ),
            contract_name: ctx.contract.name.clone(),
            function_name: ctx.function.name.clone(),
            location: ctx.body_location(first.offset),
            detail: Some(texts.join("; ")),
            recommendation: Some(
                "Keep unchecked blocks to operations whose bounds are proven, e.g. loop \
                 counters below a known length."
                    .to_string(),
            ),
        }]
    }
}
