//! Memory Book Common Library
//!
//! CLIとレンダラ実装で共有される型と純粋ロジック
//! （データモデル・レイアウト定数・HTML組版・ページ分割計算）

pub mod types;
pub mod layout;
pub mod error;
pub mod compose;
pub mod export;

pub use types::{
    BookStats, Colleague, Graduation, GraduationEvent, HistoryGroup, HistoryImage,
    MemoryBookData, Photo,
};
pub use layout::BookLayout;
pub use error::{Error, Result};
pub use compose::{compose, compose_pages, BookPage, PageKind, PhotoSection};
pub use export::pdf_core::{PageGeometry, SliceBoundary, SlicePlan};
