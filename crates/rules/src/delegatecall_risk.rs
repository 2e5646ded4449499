use solflow::finding::*;
use solflow::flow::OperationKind;
use solflow::rule::{Rule, RuleContext};

/// Flags every entry point that performs a delegatecall, guarded or not.
pub struct DelegatecallRisk;

impl Rule for DelegatecallRisk {
    fn category(&self) -> Category {
        Category::DelegatecallRisk
    }

    fn description(&self) -> &str {
        "Entry point executes foreign code in this contract's storage context"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let Some(op) = ctx.function.first_op(OperationKind::Delegatecall) else {
            return Vec::new();
        };
        let func = ctx.function;

        vec![Finding {
            category: self.category(),
            severity: self.severity(),
            title: format!("delegatecall in `{}`", func.name),
            message: format!(
                "Function `{}` uses delegatecall. The callee runs with this contract's \
                 storage and balance{}.",
                func.name,
                if func.has_access_control {
                    ""
                } else {
                    ", and the function has no access control"
                }
            ),
            contract_name: ctx.contract.name.clone(),
            function_name: func.name.clone(),
            location: ctx.body_location(op.offset),
            detail: Some(op.detail.clone()),
            recommendation: Some(
                "Only delegatecall into fixed, trusted implementations and never into \
                 caller-supplied addresses."
                    .to_string(),
            ),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::run;

    #[test]
    fn test_reports_at_the_call() {
        let source = "contract Proxy {\n    function exec(address t, bytes memory d) external onlyOwner {\n        emit Called(t);\n        t.delegatecall(d);\n    }\n}\n";
        let findings = run(DelegatecallRisk, source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.line, 4);
        assert_eq!(findings[0].location.snippet, "t.delegatecall(d);");
        assert!(!findings[0].location.approximate);
    }

    #[test]
    fn test_no_delegatecall() {
        let findings = run(
            DelegatecallRisk,
            "contract C { function f(address t) external { t.call(\"\"); } }",
        );
        assert!(findings.is_empty());
    }
}
