//! Derived views over published store state.
//!
//! # Responsibility
//! - Compute dashboard/listing projections from collections.
//!
//! # Invariants
//! - Every function is pure: same input, same output, input untouched.
//! - Filters keep collection order.

use crate::model::notification::Notification;
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};
use crate::model::Priority;
use std::collections::HashSet;

/// Share of tasks per status, in percent (`0.0..=100.0`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusDistribution {
    pub todo: f64,
    pub in_progress: f64,
    pub completed: f64,
}

impl StatusDistribution {
    pub fn percent(&self, status: TaskStatus) -> f64 {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }
}

/// Computes the status distribution; an empty collection yields zeros.
pub fn status_distribution(tasks: &[Task]) -> StatusDistribution {
    let total = tasks.len().max(1) as f64;
    let share = |status: TaskStatus| {
        let count = tasks.iter().filter(|task| task.status == status).count();
        count as f64 / total * 100.0
    };
    StatusDistribution {
        todo: share(TaskStatus::Todo),
        in_progress: share(TaskStatus::InProgress),
        completed: share(TaskStatus::Completed),
    }
}

/// Task list filter; `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self
                .assignee
                .as_deref()
                .map_or(true, |assignee| task.assignee == assignee)
    }
}

pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Project list filter; `search` matches name or description,
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub search: String,
    pub priority: Option<Priority>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = project.name.to_lowercase().contains(&needle)
            || project.description.to_lowercase().contains(&needle);
        matches_search
            && self.priority.map_or(true, |priority| project.priority == priority)
            && self.status.map_or(true, |status| project.status == status)
    }
}

pub fn filter_projects<'a>(projects: &'a [Project], filter: &ProjectFilter) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|project| filter.matches(project))
        .collect()
}

/// Distinct assignees in first-seen order.
pub fn unique_assignees(tasks: &[Task]) -> Vec<String> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .filter(|task| seen.insert(task.assignee.as_str()))
        .map(|task| task.assignee.clone())
        .collect()
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Resolves a project's task references, skipping dangling ids.
pub fn project_tasks<'a>(project: &Project, tasks: &'a [Task]) -> Vec<&'a Task> {
    project
        .tasks
        .iter()
        .filter_map(|id| tasks.iter().find(|task| &task.id == id))
        .collect()
}

/// Milestone badge for a progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementLevel {
    OnTheWay,
    KeepItUp,
    GoalGetter,
    GoalBlaster,
    MissionComplete,
}

impl AchievementLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::OnTheWay => "On the Way!",
            Self::KeepItUp => "Keep it Up!",
            Self::GoalGetter => "Goal Getter!",
            Self::GoalBlaster => "Goal Blaster!",
            Self::MissionComplete => "Mission Complete!",
        }
    }
}

pub fn achievement_level(progress: u8) -> AchievementLevel {
    match progress {
        100..=u8::MAX => AchievementLevel::MissionComplete,
        81..=99 => AchievementLevel::GoalBlaster,
        61..=80 => AchievementLevel::GoalGetter,
        21..=60 => AchievementLevel::KeepItUp,
        _ => AchievementLevel::OnTheWay,
    }
}

#[cfg(test)]
mod tests {
    use super::{achievement_level, status_distribution, AchievementLevel};

    #[test]
    fn empty_collection_has_zero_distribution() {
        let stats = status_distribution(&[]);
        assert_eq!(stats.todo, 0.0);
        assert_eq!(stats.in_progress, 0.0);
        assert_eq!(stats.completed, 0.0);
    }

    #[test]
    fn achievement_thresholds() {
        assert_eq!(achievement_level(0), AchievementLevel::OnTheWay);
        assert_eq!(achievement_level(21), AchievementLevel::KeepItUp);
        assert_eq!(achievement_level(61), AchievementLevel::GoalGetter);
        assert_eq!(achievement_level(81), AchievementLevel::GoalBlaster);
        assert_eq!(achievement_level(100), AchievementLevel::MissionComplete);
    }
}
