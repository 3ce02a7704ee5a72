//! # Task Service サーバー
//!
//! タスク（ToDo）の作成・一覧・更新・削除を提供する REST API サーバー。
//!
//! ## 構成
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Client     │────▶│ Task Service │────▶│   DynamoDB   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `TASK_SERVICE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `TASK_SERVICE_PORT` | No | ポート番号（デフォルト: `5001`） |
//! | `DYNAMODB_ENDPOINT` | **Yes** | DynamoDB エンドポイント URL |
//! | `TASKS_TABLE_NAME` | No | テーブル名（デフォルト: `tasks`） |
//! | `AWS_REGION` | No | AWS リージョン（デフォルト: `ap-northeast-1`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（DynamoDB Local）
//! docker run -d -p 18000:8000 amazon/dynamodb-local
//! DYNAMODB_ENDPOINT=http://localhost:18000 cargo run -p taskflow-task-service
//!
//! # 本番環境
//! DYNAMODB_ENDPOINT=https://dynamodb.ap-northeast-1.amazonaws.com LOG_FORMAT=json \
//!   cargo run -p taskflow-task-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use taskflow_infra::{dynamodb, repository::DynamoDbTaskRepository};
use taskflow_shared::observability::{TracingConfig, init_tracing};
use taskflow_task_service::{app_builder::build_app, config::TaskServiceConfig};
use tokio::net::TcpListener;

/// Task Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(TracingConfig::from_env("task-service"));
    let _tracing_guard = tracing::info_span!("app", service = "task-service").entered();

    // 設定読み込み
    let config = match TaskServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("設定の読み込みに失敗しました: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Task Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // DynamoDB 接続とテーブル準備
    let client = dynamodb::create_client(&config.dynamodb_endpoint, &config.aws_region).await;
    if let Err(e) = dynamodb::ensure_task_table(&client, &config.tasks_table_name).await {
        tracing::error!("DynamoDB の準備に失敗しました: {}", e);
        std::process::exit(1);
    }
    tracing::info!(
        "DynamoDB に接続しました: テーブル '{}'",
        config.tasks_table_name
    );

    let task_repository = Arc::new(DynamoDbTaskRepository::new(
        client,
        config.tasks_table_name.clone(),
    ));
    let app = build_app(task_repository);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Task Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
