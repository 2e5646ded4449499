use solflow::finding::*;
use solflow::rule::{Rule, RuleContext};

/// Flags value-moving functions where an external call appears before a state
/// write. Ordering is textual: some call precedes some write anywhere in the
/// body, with no per-variable or per-path tracking.
pub struct ReentrancyOrdering;

impl Rule for ReentrancyOrdering {
    fn category(&self) -> Category {
        Category::ReentrancyOrdering
    }

    fn description(&self) -> &str {
        "External call precedes a state update (checks-effects-interactions)"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        let func = ctx.function;
        if !func.flow.external_call_precedes_state_write || !func.has_value_flow() {
            return Vec::new();
        }
        let location = match func.flow.first_reordered_call {
            Some(offset) => ctx.body_location(offset),
            None => ctx.function_location(),
        };

        vec![Finding {
            category: self.category(),
            severity: self.severity(),
            title: format!("State written after external call in `{}`", func.name),
            message: format!(
                "`{}` makes an external call before updating state. A re-entrant \
                 callee can observe and exploit the stale state.",
                func.name
            ),
            contract_name: ctx.contract.name.clone(),
            function_name: func.name.clone(),
            location,
            detail: None,
            recommendation: Some(
                "Apply checks-effects-interactions: update balances before the call, \
                 or add a reentrancy guard."
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
    fn test_call_then_write() {
        let source = "contract Bank {\n    mapping(address => uint) balances;\n    function withdraw(uint amount) external {\n        (bool ok,) = msg.sender.call{value: amount}(\"\");\n        balances[msg.sender] -= amount;\n    }\n}\n";
        let findings = run(ReentrancyOrdering, source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location.line, 4);
    }

    #[test]
    fn test_write_then_call_is_clean() {
        let source = "contract Bank { mapping(address => uint) balances; function withdraw(uint amount) external { balances[msg.sender] -= amount; payable(msg.sender).transfer(amount); } }";
        assert!(run(ReentrancyOrdering, source).is_empty());
    }

    #[test]
    fn test_access_control_does_not_exempt() {
        let source = "contract Bank { mapping(address => uint) balances; function sweep(address payable to) external onlyOwner { to.transfer(1); balances[to] = 0; } }";
        assert_eq!(run(ReentrancyOrdering, source).len(), 1);
    }

    #[test]
    fn test_requires_value_flow() {
        let source = "contract C { uint n; function ping(address t) external { t.call(\"\"); n = 1; } }";
        assert!(run(ReentrancyOrdering, source).is_empty());
    }
}
