//! Task cache.

use super::{DomainCache, Domain, ErrorCode, validate_title};
use crate::model::{Task, replace_by_id};
use crate::remote::Remote;
use crate::views::{self, TaskStats};

pub struct TaskStore {
    remote: Remote,
    cache: DomainCache<Vec<Task>>,
}

impl TaskStore {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            cache: DomainCache::new(Domain::Task),
        }
    }

    pub fn cache(&self) -> &DomainCache<Vec<Task>> {
        &self.cache
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.cache.read(|st| st.data.clone())
    }

    /// Replace the cached list with the backend's. Returns false on failure.
    pub async fn load(&self) -> bool {
        self.cache
            .run(
                ErrorCode::LoadTasksError,
                self.remote.get_all_tasks(),
                |tasks, fresh| *tasks = fresh,
            )
            .await
            .is_some()
    }

    /// Create a task; the confirmed task goes to the front (newest first).
    pub async fn add(&self, title: &str) -> Option<Task> {
        let title = match validate_title(title, "Task") {
            Ok(t) => t,
            Err(e) => {
                self.cache.set_error(e);
                return None;
            }
        };
        self.cache
            .run(
                ErrorCode::AddTaskError,
                self.remote.add_task(&title),
                |tasks, task: Task| {
                    tasks.insert(0, task.clone());
                    task
                },
            )
            .await
    }

    pub async fn toggle(&self, task_id: i32) -> Option<Task> {
        self.cache
            .run(
                ErrorCode::ToggleTaskError,
                self.remote.toggle_task_status(task_id),
                |tasks, task: Task| {
                    replace_by_id(tasks, task.clone());
                    task
                },
            )
            .await
    }

    pub async fn delete(&self, task_id: i32) -> bool {
        self.cache
            .run(
                ErrorCode::DeleteTaskError,
                self.remote.delete_task(task_id),
                |tasks, ()| tasks.retain(|t| t.id != task_id),
            )
            .await
            .is_some()
    }

    pub fn completed(&self) -> Vec<Task> {
        self.cache.read(|st| views::completed_tasks(&st.data))
    }

    pub fn pending(&self) -> Vec<Task> {
        self.cache.read(|st| views::pending_tasks(&st.data))
    }

    pub fn stats(&self) -> TaskStats {
        self.cache.read(|st| views::task_stats(&st.data))
    }

    pub fn clear_error(&self) {
        self.cache.clear_error();
    }

    pub fn reset(&self) {
        self.cache.reset();
    }
}
