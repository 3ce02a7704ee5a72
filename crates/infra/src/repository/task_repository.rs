//! # TaskRepository
//!
//! タスクの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **DynamoDB**: 1 タスク = 1 アイテム、パーティションキーは `id`
//! - **一覧の順序**: `Scan` の返却順は不定のため、ID（UUID v7 = 生成順）でソートして返す
//! - **強い整合性**: 読み取りはすべて `ConsistentRead` で行い、直前の書き込みを必ず反映する
//! - **更新は条件付き書き込み**: `attribute_exists(id)` で存在しないアイテムの新規作成を防ぐ
//! - **削除は冪等**: 存在しない ID の削除も成功として扱う

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    Client,
    error::DisplayErrorContext,
    operation::{get_item::builders::GetItemFluentBuilder, scan::builders::ScanFluentBuilder},
    types::{AttributeValue, ReturnValue},
};
use taskflow_domain::task::{Task, TaskFields, TaskId};

use crate::InfraError;

type Item = HashMap<String, AttributeValue>;

/// タスクリポジトリトレイト
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 全タスクを作成順に取得する
    async fn find_all(&self) -> Result<Vec<Task>, InfraError>;

    /// ID でタスクを取得する
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, InfraError>;

    /// タスクを新規作成する
    ///
    /// 同じ ID のタスクが既に存在する場合は Conflict を返す。
    async fn insert(&self, task: &Task) -> Result<(), InfraError>;

    /// タスクの `title` / `description` / `completed` を上書きする
    ///
    /// 更新後のタスクを返す。該当タスクが存在しない場合は `None`。
    async fn update(&self, id: &TaskId, fields: &TaskFields) -> Result<Option<Task>, InfraError>;

    /// タスクを削除する（存在しなくても成功）
    async fn delete(&self, id: &TaskId) -> Result<(), InfraError>;
}

/// DynamoDB 実装の TaskRepository
pub struct DynamoDbTaskRepository {
    client:     Client,
    table_name: String,
}

impl DynamoDbTaskRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// 一覧取得用の Scan リクエストを組み立てる
    fn scan_request(&self, exclusive_start_key: Option<Item>) -> ScanFluentBuilder {
        self.client
            .scan()
            .table_name(&self.table_name)
            .consistent_read(true)
            .set_exclusive_start_key(exclusive_start_key)
    }

    /// 単一取得用の GetItem リクエストを組み立てる
    fn get_item_request(&self, id: &TaskId) -> GetItemFluentBuilder {
        self.client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .consistent_read(true)
    }
}

#[async_trait]
impl TaskRepository for DynamoDbTaskRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Task>, InfraError> {
        let mut tasks = Vec::new();
        let mut exclusive_start_key: Option<Item> = None;

        // Scan は 1MB ごとに分割されるため LastEvaluatedKey が尽きるまで読む
        loop {
            let output = self
                .scan_request(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| {
                    InfraError::dynamo_db(format!(
                        "タスク一覧の取得に失敗: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            for item in output.items() {
                tasks.push(item_to_task(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }

        tasks.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(tasks)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, InfraError> {
        let output = self
            .get_item_request(id)
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!("タスクの取得に失敗: {}", DisplayErrorContext(&e)))
            })?;

        output.item().map(item_to_task).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %task.id()))]
    async fn insert(&self, task: &Task) -> Result<(), InfraError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(task_to_item(task)))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                Err(InfraError::conflict("Task", task.id().to_string()))
            }
            Err(e) => Err(InfraError::dynamo_db(format!(
                "タスクの作成に失敗: {}",
                DisplayErrorContext(&e)
            ))),
        }
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn update(&self, id: &TaskId, fields: &TaskFields) -> Result<Option<Task>, InfraError> {
        let mut builder = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .update_expression(update_expression(fields))
            .condition_expression("attribute_exists(id)")
            .expression_attribute_names("#title", "title")
            .expression_attribute_names("#description", "description")
            .expression_attribute_names("#completed", "completed")
            .expression_attribute_values(":title", AttributeValue::S(fields.title.clone()))
            .expression_attribute_values(":completed", AttributeValue::Bool(fields.completed))
            .return_values(ReturnValue::AllNew);

        if let Some(description) = &fields.description {
            builder = builder
                .expression_attribute_values(":description", AttributeValue::S(description.clone()));
        }

        match builder.send().await {
            Ok(output) => output
                .attributes()
                .map(item_to_task)
                .transpose()?
                .map(Some)
                .ok_or_else(|| InfraError::unexpected("更新後のタスクが返されませんでした")),
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                Ok(None)
            }
            Err(e) => Err(InfraError::dynamo_db(format!(
                "タスクの更新に失敗: {}",
                DisplayErrorContext(&e)
            ))),
        }
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &TaskId) -> Result<(), InfraError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!("タスクの削除に失敗: {}", DisplayErrorContext(&e)))
            })?;

        Ok(())
    }
}

/// 上書き用の UpdateExpression を組み立てる
///
/// `description` が `None` の場合は属性を削除する。
fn update_expression(fields: &TaskFields) -> String {
    match fields.description {
        Some(_) => {
            "SET #title = :title, #description = :description, #completed = :completed"
                .to_string()
        }
        None => "SET #title = :title, #completed = :completed REMOVE #description".to_string(),
    }
}

/// Task を DynamoDB アイテムに変換する
fn task_to_item(task: &Task) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), AttributeValue::S(task.id().to_string()));
    item.insert(
        "title".to_string(),
        AttributeValue::S(task.title().to_string()),
    );
    if let Some(description) = task.description() {
        item.insert(
            "description".to_string(),
            AttributeValue::S(description.to_string()),
        );
    }
    item.insert(
        "completed".to_string(),
        AttributeValue::Bool(task.completed()),
    );
    item
}

/// DynamoDB アイテムを Task に変換する
fn item_to_task(item: &Item) -> Result<Task, InfraError> {
    let id_str = get_s(item, "id")?;
    let id = TaskId::parse_str(&id_str).map_err(|e| InfraError::invalid_data(e.to_string()))?;
    let title = get_s(item, "title")?;
    let description = item.get("description").and_then(|v| v.as_s().ok()).cloned();
    let completed = item
        .get("completed")
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| InfraError::invalid_data("真偽値属性 'completed' が見つかりません"))?;

    Ok(Task::from_stored(id, title, description, completed))
}

/// DynamoDB アイテムから文字列属性を取得する
fn get_s(item: &Item, key: &str) -> Result<String, InfraError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| InfraError::invalid_data(format!("属性 '{key}' が見つかりません")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use taskflow_domain::task::NewTask;

    use super::*;
    use crate::InfraErrorKind;

    /// 送信しない前提のリクエスト組み立て確認用リポジトリ
    fn offline_repository() -> DynamoDbTaskRepository {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .region(aws_sdk_dynamodb::config::Region::new("ap-northeast-1"))
            .build();
        DynamoDbTaskRepository::new(Client::from_conf(config), "tasks".to_string())
    }

    fn sample_task(description: Option<&str>) -> Task {
        Task::new(NewTask {
            id:          TaskId::new(),
            title:       "レポートを書く".to_string(),
            description: description.map(str::to_string),
        })
    }

    #[test]
    fn test_task_to_itemとitem_to_taskで同じタスクに戻る() {
        let task = sample_task(Some("月曜まで"));

        let restored = item_to_task(&task_to_item(&task)).unwrap();

        assert_eq!(restored, task);
    }

    #[test]
    fn test_descriptionがないタスクは属性を持たない() {
        let task = sample_task(None);

        let item = task_to_item(&task);

        assert!(!item.contains_key("description"));
        assert_eq!(item.get("completed"), Some(&AttributeValue::Bool(false)));
    }

    #[test]
    fn test_item_to_taskで必須属性が欠けているとinvalid_dataになる() {
        let mut item = task_to_item(&sample_task(None));
        item.remove("title");

        let err = item_to_task(&item).unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::InvalidData(msg) if msg.contains("title")));
    }

    #[test]
    fn test_item_to_taskで不正なidはinvalid_dataになる() {
        let mut item = task_to_item(&sample_task(None));
        item.insert("id".to_string(), AttributeValue::S("xyz".to_string()));

        let err = item_to_task(&item).unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::InvalidData(_)));
    }

    #[test]
    fn test_update_expressionはdescriptionなしでremoveを含む() {
        let fields = TaskFields::overwrite_with(Some("t".to_string()), None, Some(true));

        assert_eq!(
            update_expression(&fields),
            "SET #title = :title, #completed = :completed REMOVE #description"
        );
    }

    #[test]
    fn test_update_expressionはdescriptionありで3属性をsetする() {
        let fields =
            TaskFields::overwrite_with(Some("t".to_string()), Some("d".to_string()), None);

        assert_eq!(
            update_expression(&fields),
            "SET #title = :title, #description = :description, #completed = :completed"
        );
    }

    #[test]
    fn test_scan_requestは強い整合性で読み取る() {
        let repo = offline_repository();

        let request = repo.scan_request(None);

        assert_eq!(request.get_table_name(), &Some("tasks".to_string()));
        assert_eq!(request.get_consistent_read(), &Some(true));
        assert_eq!(request.get_exclusive_start_key(), &None);
    }

    #[test]
    fn test_scan_requestは継続キーを引き継ぐ() {
        let repo = offline_repository();
        let mut key = HashMap::new();
        key.insert("id".to_string(), AttributeValue::S("k".to_string()));

        let request = repo.scan_request(Some(key.clone()));

        assert_eq!(request.get_exclusive_start_key(), &Some(key));
        assert_eq!(request.get_consistent_read(), &Some(true));
    }

    #[test]
    fn test_get_item_requestは強い整合性で読み取る() {
        let repo = offline_repository();
        let id = TaskId::new();

        let request = repo.get_item_request(&id);

        assert_eq!(request.get_consistent_read(), &Some(true));
        assert_eq!(
            request.get_key().as_ref().and_then(|k| k.get("id")),
            Some(&AttributeValue::S(id.to_string()))
        );
    }
}
