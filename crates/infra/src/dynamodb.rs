//! # DynamoDB 接続管理
//!
//! タスクを格納するドキュメントストア（Amazon DynamoDB）への接続管理を行う。
//!
//! ## 設計方針
//!
//! - **ローカル開発**: DynamoDB Local を使用（認証情報はダミー値）
//! - **本番環境**: 標準の認証情報プロバイダチェーン（IAM ロール等）で接続
//! - **テーブル自動作成**: 起動時にテーブルが存在しなければ作成（冪等）
//!
//! ## テーブルスキーマ
//!
//! | 属性 | 型 | キー |
//! |------|----|------|
//! | `id` | S | HASH |
//! | `title` | S | - |
//! | `description` | S | -（任意） |
//! | `completed` | BOOL | - |

use aws_sdk_dynamodb::{
    Client,
    error::DisplayErrorContext,
    types::{
        AttributeDefinition,
        BillingMode,
        KeySchemaElement,
        KeyType,
        ScalarAttributeType,
    },
};

use crate::InfraError;

/// DynamoDB クライアントを作成する
///
/// エンドポイントがローカルホストを指す場合は DynamoDB Local とみなし、
/// ダミーの認証情報を設定する（DynamoDB Local は認証情報を検証しないが、
/// SDK はプロバイダを必要とする）。
///
/// # 引数
///
/// * `endpoint` - DynamoDB エンドポイント URL（例: `http://localhost:18000`）
/// * `region` - AWS リージョン
pub async fn create_client(endpoint: &str, region: &str) -> Client {
    let loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .endpoint_url(endpoint)
        .region(aws_config::Region::new(region.to_string()));

    let loader = if is_local_endpoint(endpoint) {
        loader.credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
            "local", "local", None, None, "local",
        ))
    } else {
        loader
    };

    Client::new(&loader.load().await)
}

/// エンドポイントが DynamoDB Local（ローカルホスト）を指しているか判定する
pub fn is_local_endpoint(endpoint: &str) -> bool {
    let without_scheme = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"))
        .unwrap_or(endpoint);
    let host = without_scheme
        .split(['/', ':'])
        .next()
        .unwrap_or(without_scheme);

    matches!(host, "localhost" | "127.0.0.1" | "dynamodb-local")
}

/// タスクテーブルが存在しなければ作成する（冪等）
///
/// 並行起動時に発生しうる `ResourceInUseException` は成功扱いにする。
pub async fn ensure_task_table(client: &Client, table_name: &str) -> Result<(), InfraError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!("テーブル '{}' は既に存在します", table_name);
            return Ok(());
        }
        Err(err) => {
            let not_found = err
                .as_service_error()
                .map(|e| e.is_resource_not_found_exception())
                .unwrap_or(false);
            if !not_found {
                return Err(InfraError::dynamo_db(format!(
                    "テーブル '{}' の確認に失敗: {}",
                    table_name,
                    DisplayErrorContext(&err)
                )));
            }
        }
    }

    tracing::info!("テーブル '{}' を作成します", table_name);

    let key_schema = KeySchemaElement::builder()
        .attribute_name("id")
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| InfraError::unexpected(format!("KeySchema 構築エラー: {e}")))?;
    let attribute_definition = AttributeDefinition::builder()
        .attribute_name("id")
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| InfraError::unexpected(format!("AttributeDefinition 構築エラー: {e}")))?;

    let create_result = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_schema)
        .attribute_definitions(attribute_definition)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    if let Err(err) = create_result {
        let in_use = err
            .as_service_error()
            .map(|e| e.is_resource_in_use_exception())
            .unwrap_or(false);
        if !in_use {
            return Err(InfraError::dynamo_db(format!(
                "テーブル '{}' の作成に失敗: {}",
                table_name,
                DisplayErrorContext(&err)
            )));
        }
        tracing::debug!(
            "テーブル '{}' は既に作成中または存在します（ResourceInUseException）",
            table_name
        );
        return Ok(());
    }

    tracing::info!("テーブル '{}' を作成しました", table_name);

    Ok(())
}
