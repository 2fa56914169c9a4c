use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

static LAST_TIMESTAMP: Lazy<Mutex<i64>> = Lazy::new(|| Mutex::new(0));

/// Wall-clock milliseconds, bumped past the previously issued value so two
/// records created within the same millisecond still get distinct ids.
pub fn next_timestamp() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_TIMESTAMP
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let ts = if now > *last { now } else { *last + 1 };
    *last = ts;
    ts
}

/// Generate a record id of the form `<prefix>-<millis>`.
pub fn generate(prefix: &str) -> String {
    format!("{prefix}-{}", next_timestamp())
}

/// Id for a stored row that has none, derived from its position in the list.
/// Skips ids already in `taken`.
pub fn positional(prefix: &str, pos: usize, taken: &HashSet<String>) -> String {
    let mut n = pos + 1;
    loop {
        let id = format!("{prefix}-{n}");
        if !taken.contains(&id) {
            return id;
        }
        n += 1;
    }
}

/// Next id for records numbered within their parent (exercises of a workout,
/// sets of an exercise): one past the current maximum, starting at 1.
pub fn next_local_id<I: IntoIterator<Item = u32>>(existing: I) -> u32 {
    existing.into_iter().max().map_or(1, |m| m + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = generate("push");
        let b = generate("push");
        assert_ne!(a, b);
        assert!(a.starts_with("push-"));
    }

    #[test]
    fn timestamps_increase() {
        let a = next_timestamp();
        let b = next_timestamp();
        assert!(b > a);
    }

    #[test]
    fn positional_ids_skip_taken() {
        let taken: HashSet<String> = ["push-2".to_string()].into();
        assert_eq!(positional("push", 0, &taken), "push-1");
        assert_eq!(positional("push", 1, &taken), "push-3");
    }

    #[test]
    fn local_ids_follow_max() {
        assert_eq!(next_local_id(Vec::new()), 1);
        assert_eq!(next_local_id([1, 4, 2]), 5);
    }
}
