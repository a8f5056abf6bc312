pub mod pdf;

pub use pdf::PdfAssembler;

use crate::error::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// 出力PDFのMIMEタイプ
pub const MIME_TYPE: &str = "application/pdf";

/// 生成済みのメモリーブック
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryBookPdf {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl MemoryBookPdf {
    pub fn new(bytes: Vec<u8>, book_name: &str, generated_on: NaiveDate) -> Self {
        Self {
            bytes,
            file_name: file_name_for(book_name, generated_on),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// 保存（ディレクトリ指定ならファイル名を付ける）
    pub fn save(&self, output: &Path) -> Result<PathBuf> {
        let path = output_path_for(output, &self.file_name);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `<名前>-<YYYY-MM-DD>.pdf`
pub fn file_name_for(book_name: &str, generated_on: NaiveDate) -> String {
    format!("{}-{}.pdf", book_name, generated_on.format("%Y-%m-%d"))
}

fn output_path_for(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}
