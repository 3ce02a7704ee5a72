//! # ルーター構築
//!
//! Task Service の axum ルーターとミドルウェアを組み立てる。
//! `main` と API テストの双方から使用する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};
use taskflow_infra::repository::TaskRepository;
use taskflow_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{TaskState, create_task, delete_task, health_check, list_tasks, update_task},
    usecase::TaskUseCaseImpl,
};

/// ルーターを構築する
///
/// レイヤーは下から順に適用される（最後の `.layer()` が最外層）:
///
/// 1. `SetRequestIdLayer`: `X-Request-Id` がなければ UUID v7 を採番
/// 2. `TraceLayer`: Request ID 付きのリクエストスパンを作成
/// 3. `PropagateRequestIdLayer`: レスポンスに `X-Request-Id` を付与
/// 4. `CorsLayer`: 全オリジンを許可
pub fn build_app(task_repository: Arc<dyn TaskRepository>) -> Router {
    let task_state = Arc::new(TaskState {
        usecase: TaskUseCaseImpl::new(task_repository),
    });

    Router::new()
        .route("/health", get(health_check))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
        .with_state(task_state)
        .layer(CorsLayer::permissive())
        // Request ID レイヤー（下に書いたものが外側）
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
