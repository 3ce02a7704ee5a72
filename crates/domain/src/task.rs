//! # タスク
//!
//! ユーザーが管理する ToDo タスクのモデル。
//!
//! ## ライフサイクル
//!
//! - **作成**: [`Task::new`] で `completed = false` として生成される
//! - **更新**: [`TaskFields`] で `title` / `description` / `completed` を丸ごと上書きする
//! - **削除**: ストアから物理削除される（論理削除・バージョン管理はしない）
//!
//! ## 更新の意味論
//!
//! 更新は部分更新（merge patch）ではなく全置換である。
//! リクエストで省略されたフィールドは保持されず、空値で上書きされる。
//!
//! | フィールド | 省略時の値 |
//! |-----------|-----------|
//! | `title` | `""` |
//! | `description` | なし（属性を削除） |
//! | `completed` | `false` |

define_uuid_id! {
    /// タスク ID（一意識別子）
    ///
    /// 作成時に一度だけ採番され、以後変わらない。
    pub struct TaskId;
}

/// 新規タスクの生成パラメータ
pub struct NewTask {
    pub id:          TaskId,
    pub title:       String,
    pub description: Option<String>,
}

/// 更新で上書きされるフィールドの集合
///
/// 3 フィールドすべてが常に書き込まれる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title:       String,
    pub description: Option<String>,
    pub completed:   bool,
}

impl TaskFields {
    /// リクエストの値から上書き内容を組み立てる
    ///
    /// 省略されたフィールドは空値になる（全置換）。
    pub fn overwrite_with(
        title: Option<String>,
        description: Option<String>,
        completed: Option<bool>,
    ) -> Self {
        Self {
            title: title.unwrap_or_default(),
            description,
            completed: completed.unwrap_or(false),
        }
    }
}

/// タスクエンティティ
///
/// # 不変条件
///
/// - `id` は作成後に変更されない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id:          TaskId,
    title:       String,
    description: Option<String>,
    completed:   bool,
}

impl Task {
    /// 新しいタスクを作成する（未完了）
    pub fn new(params: NewTask) -> Self {
        Self {
            id:          params.id,
            title:       params.title,
            description: params.description,
            completed:   false,
        }
    }

    /// 永続化済みの値からタスクを復元する
    pub fn from_stored(
        id: TaskId,
        title: String,
        description: Option<String>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            title,
            description,
            completed,
        }
    }

    /// 上書き内容を適用したタスクを返す
    pub fn overwritten(self, fields: TaskFields) -> Self {
        Self {
            id:          self.id,
            title:       fields.title,
            description: fields.description,
            completed:   fields.completed,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn sample_task() -> Task {
        Task::new(NewTask {
            id:          TaskId::new(),
            title:       "買い物".to_string(),
            description: Some("牛乳と卵".to_string()),
        })
    }

    #[test]
    fn test_newで未完了のタスクが作成される() {
        let task = sample_task();

        assert_eq!(task.title(), "買い物");
        assert_eq!(task.description(), Some("牛乳と卵"));
        assert!(!task.completed());
    }

    #[test]
    fn test_overwrittenでidは維持され他のフィールドは置き換わる() {
        let task = sample_task();
        let id = task.id().clone();

        let updated = task.overwritten(TaskFields {
            title:       "買い物（済）".to_string(),
            description: None,
            completed:   true,
        });

        assert_eq!(updated.id(), &id);
        assert_eq!(updated.title(), "買い物（済）");
        assert_eq!(updated.description(), None);
        assert!(updated.completed());
    }

    #[rstest]
    #[case::全フィールド指定(
        Some("t"), Some("d"), Some(true),
        TaskFields { title: "t".to_string(), description: Some("d".to_string()), completed: true }
    )]
    #[case::titleのみ指定(
        Some("t"), None, None,
        TaskFields { title: "t".to_string(), description: None, completed: false }
    )]
    #[case::すべて省略(
        None, None, None,
        TaskFields { title: String::new(), description: None, completed: false }
    )]
    fn test_overwrite_withは省略フィールドを空値にする(
        #[case] title: Option<&str>,
        #[case] description: Option<&str>,
        #[case] completed: Option<bool>,
        #[case] expected: TaskFields,
    ) {
        let fields = TaskFields::overwrite_with(
            title.map(str::to_string),
            description.map(str::to_string),
            completed,
        );

        assert_eq!(fields, expected);
    }

    #[test]
    fn test_task_idは生成順に並ぶ() {
        let first = TaskId::new();
        let second = TaskId::new();

        assert!(first < second);
    }

    #[test]
    fn test_task_idは文字列として直列化される() {
        let id = TaskId::new();
        let json = serde_json::to_value(&id).unwrap();

        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }

    #[test]
    fn test_parse_strで不正な文字列はバリデーションエラーになる() {
        let result = TaskId::parse_str("not-a-uuid");

        assert!(matches!(result, Err(crate::DomainError::Validation(_))));
    }

    #[test]
    fn test_parse_strで文字列表現から復元できる() {
        let id = TaskId::new();

        let restored = TaskId::parse_str(&id.to_string()).unwrap();

        assert_eq!(restored, id);
    }
}
