/// Trimmed-equality comparison between an actual and an expected output.
///
/// This is the single comparison routine for the whole pipeline: the client
/// uses it to compute `RunResult::passed`, and the evaluation loop uses it
/// against each hidden case's expected text. Keeping one routine means the
/// semantics do not depend on whether the judge's own server-side
/// comparison was requested.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_does_not_fail_a_match() {
        assert!(outputs_match("42", "42\n"));
        assert!(outputs_match("42\n", "42"));
    }

    #[test]
    fn different_values_do_not_match() {
        assert!(!outputs_match("42", "43"));
    }

    #[test]
    fn interior_whitespace_is_significant() {
        assert!(!outputs_match("4 2", "42"));
        assert!(outputs_match("  a b  \n", "a b"));
    }
}
