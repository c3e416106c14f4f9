//! Per-user progress state machine.
//!
//! A [`Progress`] value holds everything that changes as a user works
//! through the catalog: the unlock pointer, the set of completed projects,
//! the per-project task checklist, and the point total. The API layer loads
//! it from the user row, applies one operation, and writes it back in the
//! same transaction.
//!
//! Invariants maintained by the operations here:
//!
//! - `unlocked_index` only moves forward, one step at a time, and only when
//!   the currently unlocked project is completed for the first time. Only
//!   [`Progress::reset`] moves it back to zero.
//! - `points == PROJECT_REWARD_POINTS * completed_projects.len()`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::CoreError;
use crate::types::{ProjectIndex, TaskIndex};

/// Points awarded the first time a project is completed.
pub const PROJECT_REWARD_POINTS: u32 = 50;

/// Highest task index accepted by [`Progress::toggle_task`].
///
/// Indices past a project's known task list are recorded, but only up to
/// this cap so a single request cannot grow the stored checklist without
/// bound.
pub const MAX_TASK_INDEX: TaskIndex = 63;

/// Checklist state keyed by project index.
pub type TaskCompletion = BTreeMap<ProjectIndex, Vec<bool>>;

/// Result of [`Progress::complete_project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// First completion: points were awarded.
    Newly {
        /// Whether the unlock pointer advanced as part of this completion.
        unlocked_next: bool,
    },
    /// The project was already in the completed set; nothing changed.
    AlreadyCompleted,
}

impl Completion {
    pub fn changed(self) -> bool {
        matches!(self, Completion::Newly { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub unlocked_index: ProjectIndex,
    pub completed_projects: BTreeSet<ProjectIndex>,
    pub task_completion: TaskCompletion,
    pub points: u32,
}

impl Progress {
    /// Record the checked state of one task.
    ///
    /// Pads the project's checklist with `false` until `task_index` is a
    /// valid position, then stores `checked` there.
    pub fn toggle_task(
        &mut self,
        project_index: ProjectIndex,
        task_index: TaskIndex,
        checked: bool,
    ) -> Result<&TaskCompletion, CoreError> {
        catalog::validate_project_index(project_index)?;
        if task_index > MAX_TASK_INDEX {
            return Err(CoreError::Validation(format!(
                "task_index must be <= {MAX_TASK_INDEX}, got {task_index}"
            )));
        }

        let slot = task_index as usize;
        let tasks = self.task_completion.entry(project_index).or_default();
        if tasks.len() <= slot {
            tasks.resize(slot + 1, false);
        }
        tasks[slot] = checked;

        Ok(&self.task_completion)
    }

    /// Mark a project as completed.
    ///
    /// Idempotent: a project already in the completed set is left alone.
    /// The unlock pointer advances only when the completed project is the
    /// currently unlocked one and is not the last project; completing out of
    /// order still records the completion and awards points.
    pub fn complete_project(&mut self, project_index: ProjectIndex) -> Result<Completion, CoreError> {
        catalog::validate_project_index(project_index)?;

        if !self.completed_projects.insert(project_index) {
            return Ok(Completion::AlreadyCompleted);
        }

        self.points = self.points.saturating_add(PROJECT_REWARD_POINTS);

        let unlocked_next = project_index == self.unlocked_index
            && self.unlocked_index < catalog::last_project_index();
        if unlocked_next {
            self.unlocked_index += 1;
        }

        Ok(Completion::Newly { unlocked_next })
    }

    /// Clear all progress. Irreversible.
    pub fn reset(&mut self) {
        *self = Progress::default();
    }

    /// Whether the point total matches the completed set.
    pub fn points_consistent(&self) -> bool {
        u64::from(self.points)
            == u64::from(PROJECT_REWARD_POINTS) * self.completed_projects.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn toggle_on_empty_entry_pads_with_false() {
        let mut progress = Progress::default();
        let map = progress.toggle_task(1, 3, true).unwrap();

        assert_eq!(map.get(&1), Some(&vec![false, false, false, true]));
    }

    #[test]
    fn toggle_existing_entry_keeps_other_slots() {
        let mut progress = Progress::default();
        progress.toggle_task(0, 0, true).unwrap();
        progress.toggle_task(0, 2, true).unwrap();
        progress.toggle_task(0, 0, false).unwrap();

        assert_eq!(progress.task_completion[&0], vec![false, false, true]);
    }

    #[test]
    fn toggle_does_not_shrink_checklist() {
        let mut progress = Progress::default();
        progress.toggle_task(2, 4, true).unwrap();
        progress.toggle_task(2, 1, true).unwrap();

        assert_eq!(progress.task_completion[&2].len(), 5);
    }

    #[test]
    fn toggle_accepts_index_past_task_list() {
        // Project 1 has four tasks; index 10 is still recorded.
        let mut progress = Progress::default();
        progress.toggle_task(1, 10, true).unwrap();

        assert_eq!(progress.task_completion[&1].len(), 11);
    }

    #[test]
    fn toggle_rejects_index_over_cap() {
        let mut progress = Progress::default();
        let err = progress.toggle_task(0, MAX_TASK_INDEX + 1, true).unwrap_err();

        assert_matches!(err, CoreError::Validation(_));
        assert!(progress.task_completion.is_empty());
    }

    #[test]
    fn toggle_rejects_unknown_project() {
        let mut progress = Progress::default();
        assert_matches!(
            progress.toggle_task(7, 0, true),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn complete_current_project_advances_unlock() {
        let mut progress = Progress::default();
        let outcome = progress.complete_project(0).unwrap();

        assert_eq!(outcome, Completion::Newly { unlocked_next: true });
        assert_eq!(progress.unlocked_index, 1);
        assert_eq!(progress.points, 50);
        assert_eq!(progress.completed_projects, BTreeSet::from([0]));
    }

    #[test]
    fn complete_is_idempotent() {
        let mut progress = Progress::default();
        progress.complete_project(0).unwrap();
        let snapshot = progress.clone();

        let outcome = progress.complete_project(0).unwrap();

        assert_eq!(outcome, Completion::AlreadyCompleted);
        assert!(!outcome.changed());
        assert_eq!(progress, snapshot);
    }

    #[test]
    fn out_of_order_completion_keeps_unlock_pointer() {
        let mut progress = Progress::default();
        let outcome = progress.complete_project(2).unwrap();

        assert_eq!(outcome, Completion::Newly { unlocked_next: false });
        assert_eq!(progress.unlocked_index, 0);
        assert_eq!(progress.points, 50);
        assert!(progress.completed_projects.contains(&2));
    }

    #[test]
    fn last_project_does_not_advance_past_catalog() {
        let mut progress = Progress::default();
        for i in 0..4 {
            progress.complete_project(i).unwrap();
        }

        assert_eq!(progress.unlocked_index, 3);
        assert_eq!(progress.points, 200);
    }

    #[test]
    fn points_track_completed_set_through_any_sequence() {
        let mut progress = Progress::default();
        for idx in [3, 0, 0, 1, 3, 2, 1, 0] {
            progress.complete_project(idx).unwrap();
            assert!(progress.points_consistent());
        }
        assert_eq!(progress.completed_projects.len(), 4);
    }

    #[test]
    fn completing_earlier_project_after_skip_does_not_jump() {
        let mut progress = Progress::default();
        progress.complete_project(1).unwrap();
        progress.complete_project(0).unwrap();

        // Unlocking is strictly sequential: only one step for project 0.
        assert_eq!(progress.unlocked_index, 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut progress = Progress::default();
        progress.complete_project(0).unwrap();
        progress.complete_project(1).unwrap();
        progress.toggle_task(0, 2, true).unwrap();

        progress.reset();

        assert_eq!(progress, Progress::default());
        assert_eq!(progress.unlocked_index, 0);
        assert_eq!(progress.points, 0);
    }

    #[test]
    fn complete_rejects_unknown_project() {
        let mut progress = Progress::default();
        assert_matches!(
            progress.complete_project(4),
            Err(CoreError::Validation(_))
        );
        assert_eq!(progress.points, 0);
    }
}
