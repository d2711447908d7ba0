//! Project ordering.
//!
//! Projects and side projects are shown as one list, newest first. A project
//! whose year is the sentinel `"Ongoing"` is newer than any dated one. Years
//! are read the forgiving way: leading whitespace, an optional sign, then as
//! many digits as there are (`"2019-2021"` reads as 2019). Anything without
//! leading digits reads as 0 and sinks to the bottom.
//!
//! The sort is stable, so equal keys keep their input order (projects before
//! side projects, then file order). Projects without attachments are dropped.

use crate::content::Project;
use std::cmp::Ordering;

/// Year value that marks a project as still in progress.
pub const ONGOING: &str = "Ongoing";

/// Sort key for a project year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearKey {
    Ongoing,
    Year(i64),
}

impl YearKey {
    pub fn parse(year: &str) -> Self {
        if year == ONGOING {
            YearKey::Ongoing
        } else {
            YearKey::Year(parse_leading_int(year))
        }
    }
}

/// Display order: `Ongoing` first, then years descending.
impl Ord for YearKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (YearKey::Ongoing, YearKey::Ongoing) => Ordering::Equal,
            (YearKey::Ongoing, YearKey::Year(_)) => Ordering::Less,
            (YearKey::Year(_), YearKey::Ongoing) => Ordering::Greater,
            (YearKey::Year(a), YearKey::Year(b)) => b.cmp(a),
        }
    }
}

impl PartialOrd for YearKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse the leading integer of `s`, or 0 if there is none.
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value = rest[..digits_end]
        .chars()
        .fold(0i64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(i64::from(c as u8 - b'0'))
        });
    if negative { -value } else { value }
}

/// Merge `projects` and `side_projects` into display order.
///
/// Pure: the inputs are never reordered, and running the result through
/// again yields the same sequence.
pub fn order_projects<'a>(projects: &'a [Project], side_projects: &'a [Project]) -> Vec<&'a Project> {
    let mut ordered: Vec<&Project> = projects
        .iter()
        .chain(side_projects)
        .filter(|p| p.is_displayable())
        .collect();
    ordered.sort_by_key(|p| YearKey::parse(&p.year));
    ordered
}
