//! Fixed lexical signatures shared by the summarizer and the flow heuristics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Kind of capability-bearing call found in a function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    EtherTransfer,
    ExternalCall,
    Delegatecall,
    Selfdestruct,
}

impl OperationKind {
    /// Operations that can move value out of the contract.
    pub fn is_value_flow(&self) -> bool {
        matches!(self, Self::EtherTransfer | Self::ExternalCall)
    }
}

pub struct Signature {
    pub kind: OperationKind,
    pub detail: &'static str,
    pub regex: Lazy<Regex>,
}

pub static SENSITIVE_SIGNATURES: [Signature; 6] = [
    Signature {
        kind: OperationKind::EtherTransfer,
        detail: "uses .transfer()",
        regex: Lazy::new(|| Regex::new(r"\.transfer\s*\(").expect("transfer regex")),
    },
    Signature {
        kind: OperationKind::EtherTransfer,
        detail: "uses .send()",
        regex: Lazy::new(|| Regex::new(r"\.send\s*\(").expect("send regex")),
    },
    Signature {
        kind: OperationKind::ExternalCall,
        detail: "uses low-level call with value",
        regex: Lazy::new(|| Regex::new(r"(?s)\.call\s*\{[^}]*value").expect("call value regex")),
    },
    Signature {
        kind: OperationKind::ExternalCall,
        detail: "uses .call.value()",
        regex: Lazy::new(|| Regex::new(r"\.call\.value").expect("legacy call value regex")),
    },
    Signature {
        kind: OperationKind::Delegatecall,
        detail: "uses delegatecall",
        regex: Lazy::new(|| Regex::new(r"\.delegatecall\s*\(").expect("delegatecall regex")),
    },
    Signature {
        kind: OperationKind::Selfdestruct,
        detail: "can destroy contract",
        regex: Lazy::new(|| Regex::new(r"\bselfdestruct\s*\(").expect("selfdestruct regex")),
    },
];

/// Any call that hands control to another contract.
pub static EXTERNAL_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.call\s*[({]|\.call\.value|\.send\s*\(|\.transfer\s*\(|\.delegatecall\s*\(")
        .expect("external call regex")
});

/// Assignment, compound assignment, increment/decrement or `delete`.
/// Comparison operators and `=>` are excluded.
pub static STATE_MUTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<=|>>=|\+\+|--|[+\-*/%|&^]=|\bdelete\s|[^=!<>+\-*/%|&^]=[^=>]")
        .expect("state mutation regex")
});

pub static UNCHECKED_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bunchecked\s*\{").expect("unchecked regex"));

const LVALUE: &str = r"[A-Za-z_$][\w$.]*(?:\[[^\]\n]*\])*";

/// Arithmetic-mutation tokens: `x++`, `--x`, `x += y`, and `x = a + b`.
pub static ARITHMETIC_OP: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"{lv}\s*(?:\+\+|--)|(?:\+\+|--)\s*{lv}|{lv}\s*(?:\+=|-=|\*=|/=|%=)\s*[^;{{}}\n]+|{lv}\s*=\s*[^;{{}}=\n]*?[\w)\]]\s*[-+]\s*[\w(][^;{{}}\n]*",
        lv = LVALUE
    );
    Regex::new(&pattern).expect("arithmetic regex")
});

pub fn has_state_mutation(body: &str) -> bool {
    STATE_MUTATION.is_match(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(body: &str) -> Vec<String> {
        ARITHMETIC_OP
            .find_iter(body)
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }

    #[test]
    fn test_state_mutation_tokens() {
        assert!(has_state_mutation("{ limit = v; }"));
        assert!(has_state_mutation("{ balances[msg.sender] -= amount; }"));
        assert!(has_state_mutation("{ counter++; }"));
        assert!(has_state_mutation("{ delete pending[id]; }"));
        assert!(!has_state_mutation("{ return a == b && c != d && e <= f && g >= h; }"));
        assert!(!has_state_mutation("{ return balances[who]; }"));
    }

    #[test]
    fn test_arithmetic_ops() {
        assert_eq!(ops("{ total += amount; }"), vec!["total += amount"]);
        assert_eq!(ops("{ i++; --j; }"), vec!["i++", "--j"]);
        assert_eq!(ops("{ uint256 next = prev + step; }"), vec!["next = prev + step"]);
        assert_eq!(
            ops("{ balances[msg.sender] -= amount; }"),
            vec!["balances[msg.sender] -= amount"]
        );
    }

    #[test]
    fn test_arithmetic_ignores_comparisons_and_plain_assignment() {
        assert!(ops("{ require(a + b == c); }").is_empty());
        assert!(ops("{ owner = newOwner; }").is_empty());
        assert!(ops("{ ok = a <= b - 1; }").is_empty());
    }

    #[test]
    fn test_external_call_signatures() {
        assert!(EXTERNAL_CALL.is_match(r#"msg.sender.call{value: amount}("")"#));
        assert!(EXTERNAL_CALL.is_match("target.call(data)"));
        assert!(EXTERNAL_CALL.is_match("payable(to).transfer(1)"));
        assert!(!EXTERNAL_CALL.is_match("calculate(data)"));
    }

    #[test]
    fn test_value_flow_kinds() {
        assert!(OperationKind::EtherTransfer.is_value_flow());
        assert!(OperationKind::ExternalCall.is_value_flow());
        assert!(!OperationKind::Delegatecall.is_value_flow());
        assert!(!OperationKind::Selfdestruct.is_value_flow());
    }
}
