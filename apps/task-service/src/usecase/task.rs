//! # タスクユースケース
//!
//! タスクの一覧・作成・更新・削除に関するビジネスロジックを実装する。
//! 各操作はリポジトリへの 1 回の呼び出しに対応する。

use std::sync::Arc;

use taskflow_domain::{
    DomainError,
    task::{NewTask, Task, TaskFields, TaskId},
};
use taskflow_infra::repository::TaskRepository;

use crate::error::TaskServiceError;

/// タスク作成の入力
#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub title:       String,
    pub description: Option<String>,
}

/// タスク更新の入力
///
/// 省略されたフィールドは空値で上書きされる。
#[derive(Debug, Clone)]
pub struct UpdateTaskInput {
    pub task_id:     TaskId,
    pub title:       Option<String>,
    pub description: Option<String>,
    pub completed:   Option<bool>,
}

/// タスクユースケース実装
pub struct TaskUseCaseImpl {
    task_repository: Arc<dyn TaskRepository>,
}

impl TaskUseCaseImpl {
    pub fn new(task_repository: Arc<dyn TaskRepository>) -> Self {
        Self { task_repository }
    }

    /// タスク一覧を作成順に取得する
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.task_repository.find_all().await?)
    }

    /// タスクを作成する
    ///
    /// ID を採番し、`completed = false` で保存する。
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task, TaskServiceError> {
        let task = Task::new(NewTask {
            id:          TaskId::new(),
            title:       input.title,
            description: input.description,
        });

        self.task_repository.insert(&task).await?;
        tracing::debug!(task_id = %task.id(), "タスクを作成しました");

        Ok(task)
    }

    /// タスクを上書き更新する
    ///
    /// 該当するタスクが存在しない場合は NotFound を返す。
    pub async fn update_task(&self, input: UpdateTaskInput) -> Result<Task, TaskServiceError> {
        let fields = TaskFields::overwrite_with(input.title, input.description, input.completed);

        self.task_repository
            .update(&input.task_id, &fields)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "Task",
                    id:          input.task_id.to_string(),
                }
                .into()
            })
    }

    /// タスクを削除する
    ///
    /// 存在しない ID の場合も成功として扱う。
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<(), TaskServiceError> {
        self.task_repository.delete(task_id).await?;
        tracing::debug!(%task_id, "タスクを削除しました");
        Ok(())
    }
}
