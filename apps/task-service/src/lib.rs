//! # Task Service ライブラリ
//!
//! Task Service の設定・ユースケース・ハンドラ・ルーター構築を公開する。
//! API テストからルーターを直接組み立てるために使用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
