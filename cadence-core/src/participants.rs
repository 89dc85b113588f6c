//! Participant set algebra.

use std::collections::BTreeSet;

/// Apply a participant delta to a set: union with `add`, then subtract
/// `remove`. The result is `(current ∪ add) \ remove`, so an id present in
/// both lists ends up removed. Remove is applied last unconditionally;
/// callers rely on that ordering.
pub fn apply(
    current: &BTreeSet<String>,
    add: &[String],
    remove: &[String],
) -> BTreeSet<String> {
    let mut result = current.clone();
    result.extend(add.iter().cloned());
    for user in remove {
        result.remove(user);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_and_remove() {
        let result = apply(&set(&["u1", "u2"]), &["u3".into()], &["u2".into()]);
        assert_eq!(result, set(&["u1", "u3"]));
    }

    #[test]
    fn test_remove_wins_over_add() {
        let result = apply(&set(&["u1"]), &["u2".into()], &["u2".into()]);
        assert_eq!(result, set(&["u1"]));
    }

    #[test]
    fn test_adding_existing_is_idempotent() {
        let result = apply(&set(&["u1"]), &["u1".into()], &[]);
        assert_eq!(result, set(&["u1"]));
    }

    #[test]
    fn test_removing_absent_is_noop() {
        let result = apply(&set(&["u1"]), &[], &["u9".into()]);
        assert_eq!(result, set(&["u1"]));
    }
}
