use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryBookError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("データ取得エラー: {0}")]
    Aggregation(String),

    #[error("HTMLレンダリングエラー: {0}")]
    Render(String),

    #[error("PDF生成エラー: {0}")]
    Assembly(String),

    #[error("要素が見つかりません: #{0}")]
    ElementNotFound(String),

    #[error("レイアウトエラー: {0}")]
    Layout(#[from] memory_book_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("タスク実行エラー: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MemoryBookError {
    /// 利用者向けの通知文（CLIで1回だけ表示）
    pub fn user_message(&self) -> &'static str {
        match self {
            MemoryBookError::Aggregation(_) => {
                "データの読み込みに失敗しました。サーバーが起動しているか確認してください"
            }
            MemoryBookError::Render(_) | MemoryBookError::Assembly(_) | MemoryBookError::Task(_) => {
                "メモリーブックの作成に失敗しました。もう一度お試しください"
            }
            MemoryBookError::ElementNotFound(_) => "指定された要素がHTMLにありません",
            MemoryBookError::Config(_) | MemoryBookError::Layout(_) => "設定を確認してください",
            MemoryBookError::JsonParse(_) | MemoryBookError::Io(_) => {
                "ファイルの読み書きに失敗しました"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, MemoryBookError>;
