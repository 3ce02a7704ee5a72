//! # TaskFlow ドメイン層
//!
//! タスク管理のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! task-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`task`] - タスクエンティティと識別子
//!
//! ## 使用例
//!
//! ```rust
//! use taskflow_domain::task::{NewTask, Task, TaskId};
//!
//! let task = Task::new(NewTask {
//!     id:          TaskId::new(),
//!     title:       "牛乳を買う".to_string(),
//!     description: None,
//! });
//!
//! assert!(!task.completed());
//! ```

#[macro_use]
mod macros;

pub mod error;
pub mod task;

pub use error::DomainError;
