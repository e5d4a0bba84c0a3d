//! Fixed fallback dataset used when no valid persisted state exists.

use crate::model::notification::{Notification, NotificationKind};
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};
use crate::model::{Priority, Timestamp};
use chrono::{TimeZone, Utc};

/// Midnight UTC on a fixed calendar day.
fn day(year: i32, month: u32, day_of_month: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day_of_month, 0, 0, 0)
        .single()
        .expect("seed dates are fixed calendar days")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn seed_task(
    id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: Priority,
    due: Timestamp,
    assignee: &str,
    tags: &[&str],
    suggestions: &[&str],
    progress: u8,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        priority,
        due_date: due,
        assignee: assignee.to_string(),
        tags: strings(tags),
        ai_suggestions: Some(strings(suggestions)),
        progress: Some(progress),
        attachments: None,
        comments: None,
    }
}

/// Seed task collection.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        seed_task(
            "1",
            "Design System Implementation",
            "Create a comprehensive design system including color palette, typography, and component library",
            TaskStatus::InProgress,
            Priority::High,
            day(2024, 4, 15),
            "Leslie Alexander",
            &["design", "ui/ux", "foundation"],
            &[
                "Consider using Figma for better collaboration",
                "Document component usage guidelines",
            ],
            45,
        ),
        seed_task(
            "2",
            "User Authentication Flow",
            "Implement secure user authentication with email verification and password reset",
            TaskStatus::Todo,
            Priority::High,
            day(2024, 4, 20),
            "Dries Vincent",
            &["security", "backend", "user-management"],
            &[
                "Add two-factor authentication option",
                "Implement rate limiting for security",
            ],
            0,
        ),
        seed_task(
            "3",
            "API Documentation",
            "Create comprehensive API documentation with examples and usage guidelines",
            TaskStatus::Completed,
            Priority::Medium,
            day(2024, 4, 10),
            "Michael Foster",
            &["documentation", "api", "developer-experience"],
            &[
                "Add interactive API examples",
                "Include error handling documentation",
            ],
            100,
        ),
        seed_task(
            "4",
            "Performance Optimization",
            "Optimize application performance including load times and resource usage",
            TaskStatus::InProgress,
            Priority::Medium,
            day(2024, 4, 25),
            "Leslie Alexander",
            &["performance", "optimization", "technical"],
            &["Implement lazy loading for images", "Add caching strategy"],
            30,
        ),
        seed_task(
            "5",
            "Mobile Responsive Design",
            "Ensure all pages are fully responsive and optimized for mobile devices",
            TaskStatus::Todo,
            Priority::High,
            day(2024, 4, 30),
            "Michael Foster",
            &["mobile", "responsive", "ui/ux"],
            &[
                "Test on various device sizes",
                "Implement touch-friendly interactions",
            ],
            0,
        ),
    ]
}

/// Seed project collection. References tasks from `seed_tasks`.
pub fn seed_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            name: "Website Redesign".to_string(),
            description: "Modernize the company website".to_string(),
            tasks: strings(&["1", "3", "4"]),
            progress: 65,
            start_date: day(2024, 3, 1),
            end_date: day(2024, 4, 15),
            team: strings(&["1", "2", "3"]),
            status: ProjectStatus::Active,
            priority: Priority::High,
        },
        Project {
            id: "2".to_string(),
            name: "Mobile App Development".to_string(),
            description: "Create a new mobile app".to_string(),
            tasks: strings(&["2", "5"]),
            progress: 30,
            start_date: day(2024, 3, 15),
            end_date: day(2024, 5, 30),
            team: strings(&["2", "4", "5"]),
            status: ProjectStatus::Active,
            priority: Priority::Medium,
        },
    ]
}

/// Seed notification collection, stamped with `now`.
pub fn seed_notifications(now: Timestamp) -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            NotificationKind::Info,
            "Welcome to TaskTrack AI! Explore our powerful project management features.",
            now,
        ),
        Notification::new(
            "2",
            NotificationKind::Success,
            "New AI-powered task suggestions are now available!",
            now,
        ),
        Notification::new(
            "3",
            NotificationKind::Warning,
            "Project \"Website Redesign\" deadline is approaching in 5 days.",
            now,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{seed_projects, seed_tasks};
    use chrono::{Datelike, TimeZone, Utc};

    #[test]
    fn seed_projects_only_reference_seed_tasks() {
        let tasks = seed_tasks();
        for project in seed_projects() {
            for task_id in &project.tasks {
                assert!(tasks.iter().any(|task| &task.id == task_id));
            }
        }
    }

    #[test]
    fn seed_dates_are_midnight_utc_in_2024() {
        let first_due = seed_tasks()[0].due_date;
        assert_eq!(first_due, Utc.with_ymd_and_hms(2024, 4, 15, 0, 0, 0).unwrap());
        for project in seed_projects() {
            assert_eq!(project.start_date.year(), 2024);
            assert!(project.start_date < project.end_date);
        }
    }

    #[test]
    fn seed_records_are_valid() {
        for task in seed_tasks() {
            task.validate().unwrap();
        }
    }
}
