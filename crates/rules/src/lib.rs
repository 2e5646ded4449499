pub mod delegatecall_risk;
pub mod missing_input_validation;
pub mod reentrancy_ordering;
pub mod unchecked_arithmetic;
pub mod unguarded_value_flow;
pub mod unrestricted_entry_point;

#[cfg(test)]
mod test_support;

use solflow::rule::Rule;

/// Returns all built-in rules, in evaluation order
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(unrestricted_entry_point::UnrestrictedEntryPoint),
        Box::new(unguarded_value_flow::UnguardedValueFlow),
        Box::new(delegatecall_risk::DelegatecallRisk),
        Box::new(unchecked_arithmetic::UncheckedArithmetic),
        Box::new(missing_input_validation::MissingZeroAddressCheck),
        Box::new(missing_input_validation::MissingBoundsCheck),
        Box::new(reentrancy_ordering::ReentrancyOrdering),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use solflow::finding::{Category, Severity};
    use test_support::run_all;

    fn categories(source: &str) -> Vec<(Category, Severity)> {
        run_all(all_rules(), source)
            .into_iter()
            .map(|f| (f.category, f.severity))
            .collect()
    }

    #[test]
    fn test_rule_table_order_and_names() {
        let names: Vec<String> = all_rules().iter().map(|r| r.name().to_string()).collect();
        let expected: Vec<String> = Category::ALL.iter().map(|c| c.id().to_string()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_withdraw_write_then_call() {
        let source = "contract Bank {\n    mapping(address => uint) balances;\n    function withdraw(uint amount) external {\n        balances[msg.sender] -= amount;\n        (bool ok,) = msg.sender.call{value: amount}(\"\");\n    }\n}\n";
        assert_eq!(
            categories(source),
            vec![
                (Category::UnrestrictedEntryPoint, Severity::High),
                (Category::UnguardedValueFlow, Severity::Critical),
                (Category::MissingBoundsCheck, Severity::Low),
            ]
        );
    }

    #[test]
    fn test_withdraw_call_then_write() {
        let source = "contract Bank {\n    mapping(address => uint) balances;\n    function withdraw(uint amount) external {\n        (bool ok,) = msg.sender.call{value: amount}(\"\");\n        balances[msg.sender] -= amount;\n    }\n}\n";
        let found = categories(source);
        assert_eq!(found.len(), 4);
        assert!(found.contains(&(Category::ReentrancyOrdering, Severity::High)));
    }

    #[test]
    fn test_owner_only_setter_still_needs_bounds() {
        let source = "contract Limits {\n    uint256 limit;\n    function setLimit(uint256 v) public onlyOwner { limit = v; }\n}\n";
        assert_eq!(
            categories(source),
            vec![(Category::MissingBoundsCheck, Severity::Low)]
        );

        let bounded = "contract Limits {\n    uint256 limit;\n    function setLimit(uint256 v) public onlyOwner { require(v <= 100); limit = v; }\n}\n";
        assert!(categories(bounded).is_empty());
    }

    #[test]
    fn test_unchecked_with_validated_amount() {
        let source = "contract Acc {\n    uint256 total;\n    function add(uint256 amount) public {\n        require(amount > 0);\n        unchecked { total += amount; }\n    }\n}\n";
        let findings = run_all(all_rules(), source);
        let unchecked: Vec<_> = findings
            .iter()
            .filter(|f| f.category == Category::UncheckedArithmetic)
            .collect();
        assert_eq!(unchecked.len(), 1);
        assert_eq!(unchecked[0].detail.as_deref(), Some("total += amount"));
        assert!(!findings.iter().any(|f| f.category.is_input_validation()));
    }

    #[test]
    fn test_guarding_a_function_only_removes_gated_rules() {
        let open = "contract P {\n    uint n;\n    function run(address t, bytes memory d) external {\n        t.delegatecall(d);\n        payable(t).transfer(1);\n        n = 1;\n    }\n}\n";
        let guarded = open.replace("external {", "external onlyOwner {");

        let before = categories(open);
        let after = categories(&guarded);
        assert!(before.contains(&(Category::UnrestrictedEntryPoint, Severity::High)));
        assert!(before.contains(&(Category::UnguardedValueFlow, Severity::Critical)));

        let gated = [Category::UnrestrictedEntryPoint, Category::UnguardedValueFlow];
        let expected: Vec<_> = before
            .into_iter()
            .filter(|(c, _)| !gated.contains(c))
            .collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_findings_only_reference_entry_points() {
        let source = "contract C {\n    uint n;\n    function _bump(uint256 x) internal { unchecked { n += x; } }\n    function _send(address payable to) private { to.transfer(1); }\n}\n";
        assert!(run_all(all_rules(), source).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let source = "contract Bank {\n    mapping(address => uint) balances;\n    function withdraw(uint amount) external {\n        (bool ok,) = msg.sender.call{value: amount}(\"\");\n        balances[msg.sender] -= amount;\n    }\n}\n";
        assert_eq!(run_all(all_rules(), source), run_all(all_rules(), source));
    }
}
