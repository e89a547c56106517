//! In-place splicing of a bounded line array.
//!
//! Each operation reports whether it was applied. The array never holds
//! more than the capacity it is given; present lines are always the
//! prefix `0..len`.

use alloc::string::String;
use alloc::vec::Vec;

use crate::codec::matches_keyword;

/// Position that always appends after the last present line.
pub const APPEND: usize = usize::MAX;

/// Insert `line` so that it becomes line `position`, shifting later lines
/// down. Positions past the end append.
///
/// Fails when the array already holds `capacity` lines.
pub fn insert_at(lines: &mut Vec<String>, capacity: usize, position: usize, line: &str) -> bool {
    if lines.len() >= capacity {
        return false;
    }
    let position = position.min(lines.len());
    lines.insert(position, String::from(line));
    true
}

/// Remove line `position`, shifting later lines up.
pub fn delete_at(lines: &mut Vec<String>, position: usize) -> bool {
    if position >= lines.len() {
        return false;
    }
    lines.remove(position);
    true
}

/// Overwrite line `position` with `line` verbatim.
pub fn replace_at(lines: &mut [String], position: usize, line: &str) -> bool {
    match lines.get_mut(position) {
        Some(slot) => {
            slot.clear();
            slot.push_str(line);
            true
        }
        None => false,
    }
}

/// Remove the first line whose keyword is `keyword`.
pub fn delete_by_keyword(lines: &mut Vec<String>, keyword: &str) -> bool {
    match lines.iter().position(|line| matches_keyword(line, keyword)) {
        Some(position) => delete_at(lines, position),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn lines(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn insert_in_the_middle_shifts_down() {
        let mut v = lines(&["A", "C"]);
        assert!(insert_at(&mut v, 10, 1, "B"));
        assert_eq!(v, lines(&["A", "B", "C"]));
    }

    #[test]
    fn insert_at_front() {
        let mut v = lines(&["B"]);
        assert!(insert_at(&mut v, 10, 0, "A"));
        assert_eq!(v, lines(&["A", "B"]));
    }

    #[test]
    fn insert_past_end_appends() {
        let mut v = lines(&["A"]);
        assert!(insert_at(&mut v, 10, APPEND, "B"));
        assert!(insert_at(&mut v, 10, 7, "C"));
        assert_eq!(v, lines(&["A", "B", "C"]));
    }

    #[test]
    fn insert_respects_capacity() {
        let mut v = lines(&["A", "B"]);
        assert!(!insert_at(&mut v, 2, APPEND, "C"));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn insert_zero_capacity() {
        let mut v = vec![];
        assert!(!insert_at(&mut v, 0, 0, "A"));
        assert!(v.is_empty());
    }

    #[test]
    fn delete_shifts_up() {
        let mut v = lines(&["A", "B", "C"]);
        assert!(delete_at(&mut v, 0));
        assert_eq!(v, lines(&["B", "C"]));
        assert!(!delete_at(&mut v, 2));
    }

    #[test]
    fn replace_is_verbatim() {
        let mut v = lines(&["A", "B"]);
        assert!(replace_at(&mut v, 1, "  free text  "));
        assert_eq!(v[1], "  free text  ");
        assert!(!replace_at(&mut v, 2, "X"));
    }

    #[test]
    fn delete_by_keyword_removes_first_match() {
        let mut v = lines(&[
            "NAXIS   =                    2",
            "NAXIS1  =                  100",
            "NAXIS   =                    3",
        ]);
        assert!(delete_by_keyword(&mut v, "NAXIS"));
        assert_eq!(v.len(), 2);
        assert!(v[0].starts_with("NAXIS1"));
        assert!(v[1].ends_with('3'));
        assert!(!delete_by_keyword(&mut v, "BITPIX"));
    }
}
