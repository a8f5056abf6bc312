//! メモリーブック生成ライブラリ
//!
//! 集約（REST API）→ 組版（HTML）→ 描画（ビットマップ）→ PDF化 のパイプライン

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod render;

pub use error::{MemoryBookError, Result};
pub use export::{MemoryBookPdf, MIME_TYPE};
pub use generator::MemoryBookGenerator;
