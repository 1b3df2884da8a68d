#![forbid(unsafe_code)]

//! Circular index navigation.
//!
//! Pure arithmetic, no state: given the current position and the registry
//! size, compute where a forward or backward step lands. Wraparound is
//! exact at both boundaries: `Next` from the last item lands on the first,
//! `Previous` from the first lands on the last.

/// Direction of gallery navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Compute the index one step from `current` in `direction`, wrapping
/// circularly over `len` items.
///
/// Returns `None` when `len` is zero (navigation is unreachable in that
/// state, since the viewer never opens on an empty gallery). A `current`
/// beyond `len` — items removed while open — is folded into range first,
/// so the result is always a valid position.
pub fn advance(current: usize, direction: Direction, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current % len;
    Some(match direction {
        Direction::Next => (current + 1) % len,
        Direction::Previous => (current + len - 1) % len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn next_wraps_at_end() {
        assert_eq!(advance(2, Direction::Next, 3), Some(0));
    }

    #[test]
    fn previous_wraps_at_start() {
        assert_eq!(advance(0, Direction::Previous, 3), Some(2));
    }

    #[test]
    fn interior_steps() {
        assert_eq!(advance(0, Direction::Next, 3), Some(1));
        assert_eq!(advance(2, Direction::Previous, 3), Some(1));
    }

    #[test]
    fn single_item_is_a_fixed_point() {
        assert_eq!(advance(0, Direction::Next, 1), Some(0));
        assert_eq!(advance(0, Direction::Previous, 1), Some(0));
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(advance(0, Direction::Next, 0), None);
        assert_eq!(advance(7, Direction::Previous, 0), None);
    }

    #[test]
    fn out_of_range_current_folds_into_range() {
        // 5 % 3 == 2, then Next wraps to 0.
        assert_eq!(advance(5, Direction::Next, 3), Some(0));
    }

    proptest! {
        /// A forward step followed by a backward step returns to the start.
        #[test]
        fn next_then_previous_round_trips(start in 0usize..64, len in 1usize..64) {
            let start = start % len;
            let forward = advance(start, Direction::Next, len).unwrap();
            prop_assert_eq!(advance(forward, Direction::Previous, len), Some(start));
        }

        /// Stepping forward exactly `len` times returns to the start.
        #[test]
        fn cycle_closes_after_len_steps(start in 0usize..64, len in 1usize..64) {
            let start = start % len;
            let mut position = start;
            for _ in 0..len {
                position = advance(position, Direction::Next, len).unwrap();
            }
            prop_assert_eq!(position, start);
        }

        /// Every result is a valid registry position.
        #[test]
        fn result_always_in_range(current in 0usize..256, len in 1usize..64) {
            let next = advance(current, Direction::Next, len).unwrap();
            let previous = advance(current, Direction::Previous, len).unwrap();
            prop_assert!(next < len);
            prop_assert!(previous < len);
        }
    }
}
