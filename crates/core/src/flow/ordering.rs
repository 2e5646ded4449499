use super::patterns::{EXTERNAL_CALL, STATE_MUTATION};

/// Offset of the earliest external call, when some external call appears before
/// some state mutation in the body text.
///
/// This is a pairwise existential test over textual offsets. It does not track
/// which variables are written or whether the call and the write share a path,
/// so it over-approximates on branches and under-approximates across functions.
pub fn call_before_write(body: &str) -> Option<usize> {
    let first_call = EXTERNAL_CALL.find_iter(body).map(|m| m.start()).min()?;
    let last_write = STATE_MUTATION.find_iter(body).map(|m| m.start()).max()?;
    (first_call < last_write).then_some(first_call)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_call_is_safe() {
        let body = r#"{ balances[msg.sender] -= amount; (bool ok,) = msg.sender.call{value: amount}(""); require(ok); }"#;
        assert_eq!(call_before_write(body), None);
    }

    #[test]
    fn test_call_then_write_is_flagged() {
        let body = r#"{ (bool ok,) = msg.sender.call{value: amount}(""); balances[msg.sender] -= amount; }"#;
        assert_eq!(call_before_write(body), body.find(".call"));
    }

    #[test]
    fn test_no_call_or_no_write() {
        assert_eq!(call_before_write("{ x = 1; y++; }"), None);
        assert_eq!(call_before_write("{ payable(to).transfer(1); }"), None);
    }

    #[test]
    fn test_any_later_write_counts() {
        let body = "{ token.transfer(to, amt); emit Sent(to); lastSent = block.timestamp; }";
        assert_eq!(call_before_write(body), body.find(".transfer"));
    }
}
