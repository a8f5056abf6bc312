use crate::error::{MemoryBookError, Result};
use memory_book_common::layout::{
    DEFAULT_DEVICE_SCALE, DEFAULT_HISTORY_IMAGES_PER_GROUP, DEFAULT_PHOTOS_PER_PAGE,
};
use memory_book_common::{BookLayout, SliceBoundary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIベースURLの環境変数
pub const API_BASE_ENV: &str = "MEMORY_BOOK_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    /// 出力ファイル名の接頭辞
    pub book_name: String,
    /// ヘッドレスブラウザの実行ファイル
    pub browser: String,
    pub device_scale_factor: f32,
    pub request_timeout_seconds: u64,
    /// ブラウザの仮想時間予算（画像読み込み待ち）
    pub render_budget_ms: u64,
    pub photos_per_page: usize,
    pub history_images_per_group: usize,
    pub slice_boundary: SliceBoundary,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000/api".into(),
            book_name: "كتاب-الذكريات-الجامعية".into(),
            browser: "chromium".into(),
            device_scale_factor: DEFAULT_DEVICE_SCALE,
            request_timeout_seconds: 30,
            render_budget_ms: 10_000,
            photos_per_page: DEFAULT_PHOTOS_PER_PAGE,
            history_images_per_group: DEFAULT_HISTORY_IMAGES_PER_GROUP,
            slice_boundary: SliceBoundary::Strict,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MemoryBookError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("memory-book").join("config.json"))
    }

    /// 環境変数を優先
    fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                self.api_base = base.trim().to_string();
            }
        }
        self
    }

    pub fn set_api_base(&mut self, base: String) -> Result<()> {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(MemoryBookError::Config(format!("URLが不正です: {}", base)));
        }
        self.api_base = base;
        self.save()
    }

    pub fn layout(&self) -> Result<BookLayout> {
        Ok(BookLayout::new(self.photos_per_page, self.history_images_per_group)?)
    }
}
