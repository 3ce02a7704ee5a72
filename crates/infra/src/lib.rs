//! # TaskFlow インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **ストア接続**: DynamoDB クライアントの作成とテーブルの自動作成
//! - **リポジトリ実装**: タスクの永続化（[`repository::TaskRepository`]）
//!
//! ## 依存関係
//!
//! ```text
//! task-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`dynamodb`] - DynamoDB 接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと実装
//! - `mock` - テスト用インメモリリポジトリ（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use taskflow_infra::{dynamodb, repository::DynamoDbTaskRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client("http://localhost:18000", "ap-northeast-1").await;
//!     dynamodb::ensure_task_table(&client, "tasks").await?;
//!     let repository = DynamoDbTaskRepository::new(client, "tasks".to_string());
//!     Ok(())
//! }
//! ```

pub mod dynamodb;
pub mod error;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{InfraError, InfraErrorKind};
