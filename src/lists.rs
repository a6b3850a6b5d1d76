//! Growing and shrinking the repeated field groups (requirements, presidents,
//! and so on) without disturbing what the user already typed.

/// Resize `items` to exactly `count` entries.
///
/// Growing appends `T::default()` values after the existing entries; shrinking
/// drops entries from the end. Entries below `min(old_len, count)` are never
/// touched or reordered. No lower bound is imposed here; callers clamp first.
pub fn resize<T: Default>(items: &mut Vec<T>, count: usize) {
    items.resize_with(count, T::default);
}

/// Inclusive range of entry counts a caller allows for one field group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    pub min: usize,
    pub max: usize,
}

impl CountBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, count: usize) -> usize {
        count.clamp(self.min, self.max)
    }

    /// Move `current` by `delta`, saturating at the bounds.
    pub fn step(self, current: usize, delta: isize) -> usize {
        let moved = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        self.clamp(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn growing_appends_blank_entries() {
        let mut items = strings(&["a", "b"]);
        resize(&mut items, 4);
        assert_eq!(items, strings(&["a", "b", "", ""]));
    }

    #[test]
    fn shrinking_truncates_from_the_end() {
        let mut items = strings(&["a", "b", "c"]);
        resize(&mut items, 1);
        assert_eq!(items, strings(&["a"]));

        resize(&mut items, 3);
        assert_eq!(items, strings(&["a", "", ""]), "dropped values stay dropped");
    }

    #[test]
    fn zero_is_allowed_at_this_layer() {
        let mut items = strings(&["a"]);
        resize(&mut items, 0);
        assert!(items.is_empty());
    }

    #[test]
    fn repeated_identical_counts_are_idempotent() {
        let mut items = strings(&["x", "y"]);
        resize(&mut items, 2);
        resize(&mut items, 2);
        assert_eq!(items, strings(&["x", "y"]));
    }

    #[test]
    fn bounds_clamp_and_step() {
        let bounds = CountBounds::new(1, 5);
        assert_eq!(bounds.clamp(0), 1);
        assert_eq!(bounds.clamp(9), 5);
        assert_eq!(bounds.step(1, -1), 1);
        assert_eq!(bounds.step(4, 1), 5);
        assert_eq!(bounds.step(5, 1), 5);
        assert_eq!(bounds.step(3, -2), 1);
    }

    proptest! {
        #[test]
        fn resize_keeps_common_prefix(
            initial in proptest::collection::vec("[a-z]{0,4}", 0..8),
            counts in proptest::collection::vec(0usize..12, 1..10),
        ) {
            let mut items = initial;
            for count in &counts {
                let before = items.clone();
                resize(&mut items, *count);
                prop_assert_eq!(items.len(), *count);
                let kept = before.len().min(*count);
                prop_assert_eq!(&items[..kept], &before[..kept]);
                prop_assert!(items[kept..].iter().all(String::is_empty));
            }
            prop_assert_eq!(items.len(), *counts.last().unwrap());
        }
    }
}
