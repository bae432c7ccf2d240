//! String normalization for grouping keys and value comparison.
//!
//! Two folds with different audiences:
//! - [`normalize`] feeds grouping keys and consistency comparisons. Two album
//!   names differing only in case or spacing normalize to the same string.
//! - [`tidy`] feeds path construction and display. Whitespace is cleaned up
//!   but the user's casing survives.
//!
//! Both are idempotent: applying them to already-folded input is a no-op.

/// Fold a string for comparison: trim, collapse internal whitespace runs,
/// case-fold.
pub fn normalize(s: &str) -> String {
    tidy(s).to_lowercase()
}

/// Clean a string for display and path construction: trim and collapse
/// internal whitespace runs, preserving case.
pub fn tidy(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_and_whitespace() {
        assert_eq!(normalize("Foo"), "foo");
        assert_eq!(normalize("foo "), "foo");
        assert_eq!(normalize("  A  Night   at the Opera "), "a night at the opera");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn tidy_preserves_case() {
        assert_eq!(tidy("  A  Night   at the Opera "), "A Night at the Opera");
        assert_eq!(tidy("Queen"), "Queen");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["Foo Bar", "  spaced   out  ", "already normal", "MiXeD Case"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn tidy_is_idempotent() {
        for input in ["Foo Bar", "  spaced   out  ", "already normal"] {
            let once = tidy(input);
            assert_eq!(tidy(&once), once);
        }
    }
}
