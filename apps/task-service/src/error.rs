//! # Task Service エラー定義
//!
//! Task Service 固有のエラーと、HTTP レスポンスへの変換を定義する。

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use taskflow_domain::DomainError;
use taskflow_infra::InfraError;
use taskflow_shared::ErrorResponse;
use thiserror::Error;

/// Task Service で発生するエラー
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    ///
    /// パスパラメータや JSON ボディのエクストラクタが拒否した場合も含む。
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 競合（同じ ID のタスクが既に存在する）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(InfraError),
}

impl From<InfraError> for TaskServiceError {
    fn from(err: InfraError) -> Self {
        match err.as_conflict() {
            Some((entity, id)) => Self::Conflict(format!("{entity} が既に存在します: {id}")),
            None => Self::Database(err),
        }
    }
}

impl From<PathRejection> for TaskServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for TaskServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<DomainError> for TaskServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::BadRequest(msg),
            DomainError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} が見つかりません: {id}"))
            }
        }
    }
}

impl IntoResponse for TaskServiceError {
    fn into_response(self) -> Response {
        let body = match &self {
            TaskServiceError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            TaskServiceError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            TaskServiceError::Conflict(msg) => ErrorResponse::conflict(msg.clone()),
            TaskServiceError::Database(e) => {
                tracing::error!(
                    error.kind = "database",
                    span_trace = %e.span_trace(),
                    "データベースエラー: {}",
                    e
                );
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::not_found(TaskServiceError::NotFound("x".to_string()), StatusCode::NOT_FOUND)]
    #[case::bad_request(TaskServiceError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST)]
    #[case::conflict(TaskServiceError::Conflict("x".to_string()), StatusCode::CONFLICT)]
    #[case::database(
        TaskServiceError::Database(InfraError::dynamo_db("x")),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_into_responseのステータスコード(
        #[case] error: TaskServiceError,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn test_infra_errorのconflictはconflictに変換される() {
        let err: TaskServiceError = InfraError::conflict("Task", "T-1").into();

        assert!(matches!(err, TaskServiceError::Conflict(msg) if msg.contains("T-1")));
    }

    #[test]
    fn test_infra_errorのその他はdatabaseに変換される() {
        let err: TaskServiceError = InfraError::dynamo_db("timeout").into();

        assert!(matches!(err, TaskServiceError::Database(_)));
    }

    #[test]
    fn test_domain_errorのnot_foundはnot_foundに変換される() {
        let err: TaskServiceError = DomainError::NotFound {
            entity_type: "Task",
            id:          "abc".to_string(),
        }
        .into();

        assert!(matches!(err, TaskServiceError::NotFound(msg) if msg.contains("abc")));
    }

    #[test]
    fn test_domain_errorのvalidationはbad_requestに変換される() {
        let err: TaskServiceError = DomainError::Validation("不正".to_string()).into();

        assert!(matches!(err, TaskServiceError::BadRequest(msg) if msg == "不正"));
    }
}
