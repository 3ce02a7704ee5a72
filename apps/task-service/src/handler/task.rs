//! # タスク API ハンドラ
//!
//! Task Service のタスク関連エンドポイントを実装する。
//!
//! | メソッド | パス | 成功時 |
//! |---------|------|--------|
//! | GET | `/api/tasks` | 200 タスク配列 |
//! | POST | `/api/tasks` | 201 作成したタスク |
//! | PUT | `/api/tasks/{id}` | 200 更新後のタスク |
//! | DELETE | `/api/tasks/{id}` | 200 `{"deleted": 1}` |

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path,
        State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use taskflow_domain::task::{Task, TaskId};
use uuid::Uuid;

use crate::{
    error::TaskServiceError,
    usecase::{CreateTaskInput, TaskUseCaseImpl, UpdateTaskInput},
};

/// タスクハンドラーの State
pub struct TaskState {
    pub usecase: TaskUseCaseImpl,
}

// --- リクエスト型 ---

/// タスク作成リクエスト
///
/// `title` が欠けている場合は 400 Bad Request（Problem Details）で拒否する。
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title:       String,
    #[serde(default)]
    pub description: Option<String>,
}

/// タスク更新リクエスト
///
/// 全フィールド任意。省略されたフィールドは空値で上書きされる。
/// ボディ自体が省略された場合は `{}` と同じ扱いになる。
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title:       Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed:   Option<bool>,
}

// --- レスポンス型 ---

/// タスク DTO
#[derive(Debug, Serialize)]
pub struct TaskDto {
    pub id:          String,
    pub title:       String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed:   bool,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id:          task.id().to_string(),
            title:       task.title().to_string(),
            description: task.description().map(str::to_string),
            completed:   task.completed(),
        }
    }
}

/// タスク削除レスポンス
///
/// 対象の有無にかかわらず `deleted` は常に 1。
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub deleted: u32,
}

// --- ハンドラ ---

/// タスク一覧を取得する
///
/// ## エンドポイント
/// GET /api/tasks
#[tracing::instrument(skip_all)]
pub async fn list_tasks(
    State(state): State<Arc<TaskState>>,
) -> Result<Response, TaskServiceError> {
    let tasks = state.usecase.list_tasks().await?;

    let response: Vec<TaskDto> = tasks.iter().map(TaskDto::from).collect();
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// タスクを作成する
///
/// ## エンドポイント
/// POST /api/tasks
#[tracing::instrument(skip_all)]
pub async fn create_task(
    State(state): State<Arc<TaskState>>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Response, TaskServiceError> {
    let Json(req) = body?;
    let task = state
        .usecase
        .create_task(CreateTaskInput {
            title:       req.title,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TaskDto::from(&task))).into_response())
}

/// タスクを上書き更新する
///
/// ## エンドポイント
/// PUT /api/tasks/{id}
#[tracing::instrument(skip_all, fields(id = tracing::field::Empty))]
pub async fn update_task(
    State(state): State<Arc<TaskState>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Option<Json<UpdateTaskRequest>>, JsonRejection>,
) -> Result<Response, TaskServiceError> {
    let Path(id) = path?;
    tracing::Span::current().record("id", tracing::field::display(id));
    let req = body?.map(|Json(req)| req).unwrap_or_default();

    let task = state
        .usecase
        .update_task(UpdateTaskInput {
            task_id:     TaskId::from_uuid(id),
            title:       req.title,
            description: req.description,
            completed:   req.completed,
        })
        .await?;

    Ok((StatusCode::OK, Json(TaskDto::from(&task))).into_response())
}

/// タスクを削除する
///
/// ## エンドポイント
/// DELETE /api/tasks/{id}
#[tracing::instrument(skip_all, fields(id = tracing::field::Empty))]
pub async fn delete_task(
    State(state): State<Arc<TaskState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, TaskServiceError> {
    let Path(id) = path?;
    tracing::Span::current().record("id", tracing::field::display(id));
    state.usecase.delete_task(&TaskId::from_uuid(id)).await?;

    Ok((StatusCode::OK, Json(DeleteTaskResponse { deleted: 1 })).into_response())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use taskflow_domain::task::NewTask;

    use super::*;

    #[test]
    fn test_task_dtoはdescriptionがない場合に省略される() {
        let task = Task::new(NewTask {
            id:          TaskId::new(),
            title:       "説明なし".to_string(),
            description: None,
        });

        let json = serde_json::to_value(TaskDto::from(&task)).unwrap();

        assert_eq!(
            json,
            json!({
                "id": task.id().to_string(),
                "title": "説明なし",
                "completed": false,
            })
        );
    }

    #[test]
    fn test_update_task_requestは空オブジェクトを受け付ける() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(req.title, None);
        assert_eq!(req.description, None);
        assert_eq!(req.completed, None);
    }

    #[test]
    fn test_create_task_requestはtitleが必須() {
        let result = serde_json::from_str::<CreateTaskRequest>(r#"{"description":"d"}"#);

        assert!(result.is_err());
    }
}
