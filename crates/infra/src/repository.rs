//! # リポジトリ
//!
//! タスクの永続化インターフェースとその実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: ユースケースは `Arc<dyn TaskRepository>` を受け取る
//! - **1 操作 = 1 ストア呼び出し**: 各メソッドは DynamoDB への単一リクエストに対応する
//! - **テスタビリティ**: トレイト経由でインメモリ実装に差し替え可能

pub mod task_repository;

pub use task_repository::{DynamoDbTaskRepository, TaskRepository};
