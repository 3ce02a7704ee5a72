//! # ユースケース層
//!
//! Task Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod task;

pub use task::{CreateTaskInput, TaskUseCaseImpl, UpdateTaskInput};
