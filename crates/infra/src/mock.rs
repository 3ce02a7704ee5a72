//! # テスト用モックリポジトリ
//!
//! ユースケーステスト・API テストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! taskflow-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use taskflow_domain::task::{Task, TaskFields, TaskId};

use crate::{error::InfraError, repository::TaskRepository};

// ===== MockTaskRepository =====

/// インメモリの TaskRepository
///
/// 挿入順に保持するため、`find_all` は作成順に返る。
#[derive(Clone, Default)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl MockTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_task(&self, task: Task) {
        self.tasks.lock().unwrap().push(task);
    }

    /// 保持しているタスク数
    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn find_all(&self) -> Result<Vec<Task>, InfraError> {
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, InfraError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned())
    }

    async fn insert(&self, task: &Task) -> Result<(), InfraError> {
        let mut tasks = self.tasks.lock().unwrap();
        if tasks.iter().any(|t| t.id() == task.id()) {
            return Err(InfraError::conflict("Task", task.id().to_string()));
        }
        tasks.push(task.clone());
        Ok(())
    }

    async fn update(&self, id: &TaskId, fields: &TaskFields) -> Result<Option<Task>, InfraError> {
        let mut tasks = self.tasks.lock().unwrap();
        let Some(slot) = tasks.iter_mut().find(|t| t.id() == id) else {
            return Ok(None);
        };
        let updated = slot.clone().overwritten(fields.clone());
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: &TaskId) -> Result<(), InfraError> {
        self.tasks.lock().unwrap().retain(|t| t.id() != id);
        Ok(())
    }
}
