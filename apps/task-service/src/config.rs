//! # Task Service 設定
//!
//! 環境変数から Task Service サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_TABLE_NAME: &str = "tasks";
const DEFAULT_REGION: &str = "ap-northeast-1";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Task Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskServiceConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// DynamoDB エンドポイント URL
    pub dynamodb_endpoint: String,
    /// タスクを格納するテーブル名
    pub tasks_table_name: String,
    /// AWS リージョン
    pub aws_region: String,
}

impl TaskServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let port = match get("TASK_SERVICE_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "TASK_SERVICE_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("TASK_SERVICE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            dynamodb_endpoint: get("DYNAMODB_ENDPOINT")
                .ok_or(ConfigError::Missing("DYNAMODB_ENDPOINT"))?,
            tasks_table_name: get("TASKS_TABLE_NAME")
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            aws_region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }
}
