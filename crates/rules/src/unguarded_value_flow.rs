use solflow::finding::*;
use solflow::rule::{Rule, RuleContext};

/// Flags entry points that send Ether or make value-bearing calls without
/// access control.
pub struct UnguardedValueFlow;

impl Rule for UnguardedValueFlow {
    fn category(&self) -> Category {
        Category::UnguardedValueFlow
    }

    fn description(&self) -> &str {
        "Ether transfer or value call reachable without access control"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let func = ctx.function;
        if func.has_access_control || !func.has_value_flow() {
            return Vec::new();
        }

        let ops: Vec<&str> = func
            .sensitive_ops
            .iter()
            .filter(|op| op.kind.is_value_flow())
            .map(|op| op.detail.as_str())
            .collect();

        vec![Finding {
            category: self.category(),
            severity: self.severity(),
            title: format!("Unguarded value flow in `{}`", func.name),
            message: format!(
                "Function `{}` moves Ether ({}) and any caller can trigger it.",
                func.name,
                ops.join(", ")
            ),
            contract_name: ctx.contract.name.clone(),
            function_name: func.name.clone(),
            location: ctx.function_location(),
            detail: Some(ops.join("; ")),
            recommendation: Some(
                "Guard the transfer with an ownership check or pull-payment accounting \
                 keyed on `msg.sender`."
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
    fn test_detects_unguarded_transfer() {
        let findings = run(
            UnguardedValueFlow,
            "contract C { function drain(address payable to) external { to.transfer(address(this).balance); } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].detail.as_deref(), Some("uses .transfer()"));
    }

    #[test]
    fn test_owner_guard_suppresses() {
        let findings = run(
            UnguardedValueFlow,
            "contract C { address admin; function drain(address payable to) external { require(msg.sender == admin); to.transfer(1); } }",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_delegatecall_is_not_value_flow() {
        let findings = run(
            UnguardedValueFlow,
            "contract C { function exec(address t, bytes memory d) external { t.delegatecall(d); } }",
        );
        assert!(findings.is_empty());
    }
}
