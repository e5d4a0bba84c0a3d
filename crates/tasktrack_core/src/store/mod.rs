//! Domain store for tasks, projects and notifications.
//!
//! # Responsibility
//! - Own the canonical in-memory collections and UI focus state.
//! - Apply every mutation, enforce cross-collection invariants, persist the
//!   affected collections and publish the new state to subscribers.
//!
//! # Invariants
//! - Each mutation replaces whole collection snapshots; published snapshots
//!   are never mutated afterwards.
//! - Deleting a task removes its id from every project's `tasks` list.
//! - Notifications are kept most-recent-first.
//! - Persistence failures never roll back or block the in-memory update.
//! - Observers see the new state before the mutating call returns, and a
//!   paired mutation publishes once, after both collections changed.
//!
//! # See also
//! - docs/architecture/store.md

mod seed;
mod subscription;

pub use seed::{seed_notifications, seed_projects, seed_tasks};
pub use subscription::{SubscriptionId, Subscriptions};

use crate::codec::{decode, encode, CodecResult, DATE_FIELD_NAMES};
use crate::ids::{allocate_id, IdError, IdGenerator, UuidIdGenerator};
use crate::model::notification::{Notification, NotificationId};
use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskId};
use crate::model::Timestamp;
use crate::storage::{KeyValueStore, StorageKey};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::sync::Arc;

const MAX_ID_ATTEMPTS: usize = 16;

/// Published store state. Collections are shared immutable snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub tasks: Arc<Vec<Task>>,
    pub projects: Arc<Vec<Project>>,
    pub notifications: Arc<Vec<Notification>>,
    pub selected_project_id: Option<ProjectId>,
    pub selected_task_id: Option<TaskId>,
}

/// Where one collection came from at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from a persisted blob.
    Persisted,
    /// No blob (or unreadable storage); seed data used.
    Seeded,
    /// Blob present but undecodable; seed data used.
    Recovered,
}

/// Per-collection initialization outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub tasks: LoadSource,
    pub projects: LoadSource,
    pub notifications: LoadSource,
}

/// Explicit store object; construct once and pass to every consumer.
pub struct Store<S: KeyValueStore> {
    storage: S,
    state: StoreState,
    ids: Box<dyn IdGenerator>,
    subscriptions: Subscriptions,
    degraded: BTreeSet<StorageKey>,
    load_report: LoadReport,
}

impl<S: KeyValueStore> Store<S> {
    /// Loads every collection from `storage`, falling back to seed data.
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, Box::new(UuidIdGenerator), Utc::now())
    }

    /// Like `open`, with an explicit id generator and seed timestamp.
    pub fn open_with(storage: S, ids: Box<dyn IdGenerator>, now: Timestamp) -> Self {
        let (tasks, tasks_source) = load_collection(&storage, StorageKey::Tasks, seed_tasks);
        let (projects, projects_source) =
            load_collection(&storage, StorageKey::Projects, seed_projects);
        let (notifications, notifications_source) =
            load_collection(&storage, StorageKey::Notifications, || {
                seed_notifications(now)
            });

        info!(
            "event=store_init module=store status=ok tasks={} projects={} notifications={} tasks_source={:?} projects_source={:?} notifications_source={:?}",
            tasks.len(),
            projects.len(),
            notifications.len(),
            tasks_source,
            projects_source,
            notifications_source
        );

        Self {
            storage,
            state: StoreState {
                tasks: Arc::new(tasks),
                projects: Arc::new(projects),
                notifications: Arc::new(notifications),
                selected_project_id: None,
                selected_task_id: None,
            },
            ids,
            subscriptions: Subscriptions::new(),
            degraded: BTreeSet::new(),
            load_report: LoadReport {
                tasks: tasks_source,
                projects: projects_source,
                notifications: notifications_source,
            },
        }
    }

    /// Builds a store around known state without reading or writing storage.
    pub fn with_state(storage: S, ids: Box<dyn IdGenerator>, state: StoreState) -> Self {
        Self {
            storage,
            state,
            ids,
            subscriptions: Subscriptions::new(),
            degraded: BTreeSet::new(),
            load_report: LoadReport {
                tasks: LoadSource::Seeded,
                projects: LoadSource::Seeded,
                notifications: LoadSource::Seeded,
            },
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.state.notifications
    }

    pub fn selected_project_id(&self) -> Option<&str> {
        self.state.selected_project_id.as_deref()
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.state.selected_task_id.as_deref()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|task| task.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.state.projects.iter().find(|project| project.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    /// Returns whether the last write of `key` failed.
    pub fn is_degraded(&self, key: StorageKey) -> bool {
        self.degraded.contains(&key)
    }

    /// Registers an observer of a derived slice of state.
    ///
    /// `listener` runs after a mutation only if the selected value changed.
    pub fn subscribe<T, F, L>(&mut self, selector: F, listener: L) -> SubscriptionId
    where
        T: PartialEq + 'static,
        F: Fn(&StoreState) -> T + 'static,
        L: FnMut(&T) + 'static,
    {
        self.subscriptions.subscribe(&self.state, selector, listener)
    }

    /// Registers an observer of every published state.
    pub fn subscribe_all<L>(&mut self, listener: L) -> SubscriptionId
    where
        L: FnMut(&StoreState) + 'static,
    {
        self.subscriptions.subscribe_all(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    /// Allocates a task id not present in the task collection.
    pub fn allocate_task_id(&mut self) -> Result<TaskId, IdError> {
        let tasks = Arc::clone(&self.state.tasks);
        allocate_id(&mut *self.ids, MAX_ID_ATTEMPTS, |candidate| {
            tasks.iter().any(|task| task.id == candidate)
        })
    }

    pub fn allocate_project_id(&mut self) -> Result<ProjectId, IdError> {
        let projects = Arc::clone(&self.state.projects);
        allocate_id(&mut *self.ids, MAX_ID_ATTEMPTS, |candidate| {
            projects.iter().any(|project| project.id == candidate)
        })
    }

    pub fn allocate_notification_id(&mut self) -> Result<NotificationId, IdError> {
        let notifications = Arc::clone(&self.state.notifications);
        allocate_id(&mut *self.ids, MAX_ID_ATTEMPTS, |candidate| {
            notifications.iter().any(|notification| notification.id == candidate)
        })
    }

    /// Allocates an id for records nested inside entities (e.g. comments).
    pub(crate) fn allocate_nested_id(
        &mut self,
        taken: impl Fn(&str) -> bool,
    ) -> Result<String, IdError> {
        allocate_id(&mut *self.ids, MAX_ID_ATTEMPTS, taken)
    }

    /// Sets UI focus on a project. Not persisted.
    pub fn set_selected_project(&mut self, id: Option<ProjectId>) {
        self.state.selected_project_id = id;
        self.publish();
    }

    /// Sets UI focus on a task. Not persisted.
    pub fn set_selected_task_id(&mut self, id: Option<TaskId>) {
        self.state.selected_task_id = id;
        self.publish();
    }

    /// Appends a task. The caller sets the id; duplicates are not checked.
    pub fn add_task(&mut self, task: Task) {
        let mut tasks = self.state.tasks.to_vec();
        tasks.push(task);
        self.state.tasks = Arc::new(tasks);
        self.persist(&[StorageKey::Tasks]);
        self.publish();
    }

    /// Replaces the task with the same id. No-op when absent.
    pub fn update_task(&mut self, task: Task) {
        let Some(index) = self.state.tasks.iter().position(|t| t.id == task.id) else {
            debug!("event=task_update module=store status=noop reason=not_found");
            return;
        };
        let mut tasks = self.state.tasks.to_vec();
        tasks[index] = task;
        self.state.tasks = Arc::new(tasks);
        self.persist(&[StorageKey::Tasks]);
        self.publish();
    }

    /// Removes a task and every project reference to it.
    ///
    /// Both collections are written as one batch and published together.
    pub fn delete_task(&mut self, id: &str) {
        let tasks: Vec<Task> = self
            .state
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        let mut references_removed = 0_usize;
        let projects: Vec<Project> = self
            .state
            .projects
            .iter()
            .cloned()
            .map(|mut project| {
                if project.remove_task_reference(id) {
                    references_removed += 1;
                }
                project
            })
            .collect();

        let task_removed = tasks.len() != self.state.tasks.len();
        if !task_removed && references_removed == 0 {
            debug!("event=task_delete module=store status=noop reason=not_found");
            return;
        }

        self.state.tasks = Arc::new(tasks);
        self.state.projects = Arc::new(projects);
        debug!(
            "event=task_delete module=store status=ok task_removed={task_removed} references_removed={references_removed}"
        );
        self.persist(&[StorageKey::Tasks, StorageKey::Projects]);
        self.publish();
    }

    /// Appends a project. The caller sets the id; duplicates are not checked.
    pub fn add_project(&mut self, project: Project) {
        let mut projects = self.state.projects.to_vec();
        projects.push(project);
        self.state.projects = Arc::new(projects);
        self.persist(&[StorageKey::Projects]);
        self.publish();
    }

    /// Replaces the project with the same id. No-op when absent.
    pub fn update_project(&mut self, project: Project) {
        let Some(index) = self.state.projects.iter().position(|p| p.id == project.id) else {
            debug!("event=project_update module=store status=noop reason=not_found");
            return;
        };
        let mut projects = self.state.projects.to_vec();
        projects[index] = project;
        self.state.projects = Arc::new(projects);
        self.persist(&[StorageKey::Projects]);
        self.publish();
    }

    /// Removes a project and sweeps the tasks it referenced.
    ///
    /// The sweep is evaluated against the project list as it was before the
    /// removal: every task referenced by the deleted project is removed from
    /// the task collection, even if other projects still reference it. Those
    /// other projects keep their (now dangling) references.
    pub fn delete_project(&mut self, id: &str) {
        let before = Arc::clone(&self.state.projects);
        let projects: Vec<Project> = before.iter().filter(|p| p.id != id).cloned().collect();
        if projects.len() == before.len() {
            debug!("event=project_delete module=store status=noop reason=not_found");
            return;
        }

        let tasks: Vec<Task> = self
            .state
            .tasks
            .iter()
            .filter(|task| {
                !before
                    .iter()
                    .any(|project| project.id == id && project.references_task(&task.id))
            })
            .cloned()
            .collect();
        let swept = self.state.tasks.len() - tasks.len();

        self.state.projects = Arc::new(projects);
        self.state.tasks = Arc::new(tasks);
        debug!("event=project_delete module=store status=ok tasks_swept={swept}");
        self.persist(&[StorageKey::Projects, StorageKey::Tasks]);
        self.publish();
    }

    /// Prepends a notification (most-recent-first).
    pub fn add_notification(&mut self, notification: Notification) {
        let mut notifications = Vec::with_capacity(self.state.notifications.len() + 1);
        notifications.push(notification);
        notifications.extend(self.state.notifications.iter().cloned());
        self.state.notifications = Arc::new(notifications);
        self.persist(&[StorageKey::Notifications]);
        self.publish();
    }

    /// Marks one notification read. No-op when absent or already read.
    pub fn mark_notification_as_read(&mut self, id: &str) {
        let Some(index) = self
            .state
            .notifications
            .iter()
            .position(|n| n.id == id && !n.read)
        else {
            return;
        };
        let mut notifications = self.state.notifications.to_vec();
        notifications[index].read = true;
        self.state.notifications = Arc::new(notifications);
        self.persist(&[StorageKey::Notifications]);
        self.publish();
    }

    /// Empties the notification collection and persists the empty state.
    pub fn clear_notifications(&mut self) {
        self.state.notifications = Arc::new(Vec::new());
        self.persist(&[StorageKey::Notifications]);
        self.publish();
    }

    fn publish(&mut self) {
        self.subscriptions.publish(&self.state);
    }

    fn encode_collection(&self, key: StorageKey) -> CodecResult<String> {
        match key {
            StorageKey::Tasks => encode(key, self.state.tasks.as_slice()),
            StorageKey::Projects => encode(key, self.state.projects.as_slice()),
            StorageKey::Notifications => encode(key, self.state.notifications.as_slice()),
        }
    }

    fn persist(&mut self, keys: &[StorageKey]) {
        let mut encoded: Vec<(StorageKey, String)> = Vec::with_capacity(keys.len());
        for key in keys {
            match self.encode_collection(*key) {
                Ok(text) => encoded.push((*key, text)),
                Err(err) => {
                    error!(
                        "event=blob_write module=store status=error key={} error_code={} error={}",
                        key,
                        err.error_code(),
                        err
                    );
                    self.mark_degraded(*key);
                }
            }
        }

        let entries: Vec<(StorageKey, &str)> = encoded
            .iter()
            .map(|(key, text)| (*key, text.as_str()))
            .collect();
        let result = match entries.as_slice() {
            [] => return,
            [(key, text)] => self.storage.write_raw(*key, text),
            many => self.storage.write_batch(many),
        };

        match result {
            Ok(()) => {
                for (key, _) in &entries {
                    self.mark_healthy(*key);
                }
            }
            Err(err) => {
                warn!(
                    "event=blob_write module=store status=error keys={} error={}",
                    join_keys(&entries),
                    err
                );
                for (key, _) in &entries {
                    self.mark_degraded(*key);
                }
            }
        }
    }

    fn mark_degraded(&mut self, key: StorageKey) {
        if self.degraded.insert(key) {
            warn!("event=persistence_mode module=store status=degraded key={key}");
        }
    }

    fn mark_healthy(&mut self, key: StorageKey) {
        if self.degraded.remove(&key) {
            info!("event=persistence_mode module=store status=recovered key={key}");
        }
    }
}

fn load_collection<S, T, F>(storage: &S, key: StorageKey, seed: F) -> (Vec<T>, LoadSource)
where
    S: KeyValueStore,
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    match storage.read_raw(key) {
        Ok(Some(text)) => match decode(key, &text, DATE_FIELD_NAMES) {
            Some(items) => (items, LoadSource::Persisted),
            None => (seed(), LoadSource::Recovered),
        },
        Ok(None) => (seed(), LoadSource::Seeded),
        Err(err) => {
            warn!("event=blob_read module=store status=fallback key={key} error={err}");
            (seed(), LoadSource::Seeded)
        }
    }
}

fn join_keys(entries: &[(StorageKey, &str)]) -> String {
    entries
        .iter()
        .map(|(key, _)| key.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
