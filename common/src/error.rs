//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid bitmap: {width}x{height}")]
    InvalidBitmap { width: u32, height: u32 },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
