//! メモリーブック生成の窓口
//!
//! 組版 → 描画 → PDF化 を1回の呼び出しで行う。呼び出しごとに新しい
//! アセンブラを使うため、並行して呼んでも状態は共有されない。

use crate::config::Config;
use crate::error::Result;
use crate::export::{MemoryBookPdf, PdfAssembler};
use crate::render::{isolate_element, ChromiumRenderer, HtmlRenderer};
use chrono::{Local, NaiveDate};
use log::info;
use memory_book_common::compose::BOOK_TITLE;
use memory_book_common::{compose, BookLayout, MemoryBookData, SliceBoundary};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct MemoryBookGenerator {
    renderer: Arc<dyn HtmlRenderer>,
    layout: BookLayout,
    boundary: SliceBoundary,
    book_name: String,
}

impl MemoryBookGenerator {
    pub fn new(renderer: Arc<dyn HtmlRenderer>) -> Self {
        let defaults = Config::default();
        Self {
            renderer,
            layout: BookLayout::default(),
            boundary: SliceBoundary::default(),
            book_name: defaults.book_name,
        }
    }

    /// 設定からChromiumレンダラ付きで構築
    pub fn from_config(config: &Config) -> Result<Self> {
        let renderer = Arc::new(ChromiumRenderer::from_config(config));
        Ok(Self::new(renderer)
            .with_layout(config.layout()?)
            .with_boundary(config.slice_boundary)
            .with_book_name(config.book_name.clone()))
    }

    pub fn with_layout(mut self, layout: BookLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_boundary(mut self, boundary: SliceBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_book_name(mut self, book_name: impl Into<String>) -> Self {
        self.book_name = book_name.into();
        self
    }

    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    /// 今日の日付で生成
    pub fn generate_memory_book(&self, data: &MemoryBookData) -> Result<MemoryBookPdf> {
        self.generate_memory_book_on(data, Local::now().date_naive())
    }

    /// 日付を指定して生成（表紙・ファイル名に使う）
    pub fn generate_memory_book_on(&self, data: &MemoryBookData, generated_on: NaiveDate) -> Result<MemoryBookPdf> {
        let html = compose(data, &self.layout, generated_on);
        info!("組版完了: {}文字", html.len());

        let bitmap = self.renderer.render(&html)?;
        let bytes = PdfAssembler::new(BOOK_TITLE, self.boundary).assemble(&bitmap)?;
        info!("PDF生成完了: {}バイト", bytes.len());

        Ok(MemoryBookPdf::new(bytes, &self.book_name, generated_on))
    }

    /// 非同期版（描画はブロッキングスレッドで実行）
    pub async fn generate_memory_book_async(&self, data: MemoryBookData) -> Result<MemoryBookPdf> {
        let generator = self.clone();
        tokio::task::spawn_blocking(move || generator.generate_memory_book(&data)).await?
    }

    /// 既存HTMLをPDF化（要素指定時はその要素だけ）
    pub fn generate_from_html(&self, html: &str, element_id: Option<&str>, output: &Path) -> Result<PathBuf> {
        let html = match element_id {
            Some(id) => isolate_element(html, id)?,
            None => html.to_string(),
        };

        let bitmap = self.renderer.render(&html)?;
        let bytes = PdfAssembler::new(BOOK_TITLE, self.boundary).assemble(&bitmap)?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output, bytes)?;
        Ok(output.to_path_buf())
    }
}
