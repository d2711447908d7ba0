//! Staggered entrance animations.
//!
//! Each view fades its items in one after another. Instead of querying the
//! page for elements and arming loose timers, a view owns a
//! [`RevealSchedule`]: an explicit list of targets, each with its own due
//! time. The shell feeds it the clock; dropping or cancelling the schedule
//! is the teardown, so a reveal can never land on a view that is gone.

use serde::Serialize;
use std::collections::BTreeSet;

/// Something that fades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum RevealTarget {
    OverviewCard(usize),
    GalleryMedia(usize),
    IndexRow(usize),
    AboutSection(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    target: RevealTarget,
    due_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RevealSchedule {
    pending: Vec<Pending>,
    revealed: BTreeSet<RevealTarget>,
    /// Time at which items drop their entrance transform, if scheduled.
    settle_at: Option<u64>,
    settled: bool,
}

impl RevealSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `targets` to reveal at `start_ms + i * step_ms`.
    pub fn stagger(
        &mut self,
        targets: impl IntoIterator<Item = RevealTarget>,
        start_ms: u64,
        step_ms: u64,
    ) {
        for (i, target) in targets.into_iter().enumerate() {
            self.revealed.remove(&target);
            self.pending.retain(|p| p.target != target);
            self.pending.push(Pending {
                target,
                due_ms: start_ms.saturating_add((i as u64).saturating_mul(step_ms)),
            });
        }
    }

    /// Schedule the one-off settle at `at_ms`.
    pub fn settle_at(&mut self, at_ms: u64) {
        self.settle_at = Some(at_ms);
        self.settled = false;
    }

    /// Reveal everything that is due at `now_ms`, in due order.
    pub fn poll(&mut self, now_ms: u64) -> Vec<RevealTarget> {
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by_key(|p| (p.due_ms, p.target));
        let targets: Vec<RevealTarget> = due.into_iter().map(|p| p.target).collect();
        self.revealed.extend(targets.iter().copied());
        targets
    }

    /// True exactly once, on the first poll past the settle time.
    pub fn poll_settle(&mut self, now_ms: u64) -> bool {
        match self.settle_at {
            Some(at) if !self.settled && now_ms >= at => {
                self.settled = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_revealed(&self, target: RevealTarget) -> bool {
        self.revealed.contains(&target)
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Due time of `target`, if it is still waiting.
    pub fn due_ms(&self, target: RevealTarget) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.target == target)
            .map(|p| p.due_ms)
    }

    /// Time of the pending settle, if it has not fired yet.
    pub fn settle_due_ms(&self) -> Option<u64> {
        self.settle_at.filter(|_| !self.settled)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop every pending reveal and the settle.
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.settle_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::RevealTarget::OverviewCard;

    #[test]
    fn reveals_in_stagger_order() {
        let mut schedule = RevealSchedule::new();
        schedule.stagger((0..3).map(OverviewCard), 1_000, 100);

        assert!(schedule.poll(999).is_empty());
        assert_eq!(schedule.poll(1_000), vec![OverviewCard(0)]);
        assert_eq!(schedule.poll(1_250), vec![OverviewCard(1), OverviewCard(2)]);
        assert_eq!(schedule.pending_len(), 0);
        assert!(schedule.is_revealed(OverviewCard(2)));
    }

    #[test]
    fn cancel_makes_late_ticks_noops() {
        let mut schedule = RevealSchedule::new();
        schedule.stagger((0..3).map(OverviewCard), 0, 100);
        schedule.settle_at(800);
        schedule.cancel();

        assert!(schedule.poll(10_000).is_empty());
        assert!(!schedule.poll_settle(10_000));
        assert!(!schedule.is_revealed(OverviewCard(0)));
    }

    #[test]
    fn settle_fires_once() {
        let mut schedule = RevealSchedule::new();
        schedule.settle_at(500);
        assert!(!schedule.poll_settle(499));
        assert_eq!(schedule.settle_due_ms(), Some(500));
        assert!(schedule.poll_settle(500));
        assert_eq!(schedule.settle_due_ms(), None);
        assert!(!schedule.poll_settle(600));
        assert!(schedule.is_settled());
    }

    #[test]
    fn due_times_saturate_near_the_end_of_time() {
        let mut schedule = RevealSchedule::new();
        schedule.stagger([OverviewCard(0), OverviewCard(1)], u64::MAX - 50, 100);
        assert_eq!(schedule.due_ms(OverviewCard(0)), Some(u64::MAX - 50));
        assert_eq!(schedule.due_ms(OverviewCard(1)), Some(u64::MAX));
        assert_eq!(schedule.poll(u64::MAX), vec![OverviewCard(0), OverviewCard(1)]);
    }

    #[test]
    fn restaggering_hides_and_reschedules() {
        let mut schedule = RevealSchedule::new();
        schedule.stagger([OverviewCard(0)], 0, 100);
        schedule.poll(0);
        assert!(schedule.is_revealed(OverviewCard(0)));

        schedule.stagger([OverviewCard(0)], 2_000, 100);
        assert!(!schedule.is_revealed(OverviewCard(0)));
        assert_eq!(schedule.due_ms(OverviewCard(0)), Some(2_000));
        assert_eq!(schedule.pending_len(), 1);
    }
}
