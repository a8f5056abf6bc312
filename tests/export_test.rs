//! PDF出力の統合テスト

use chrono::NaiveDate;
use image::{Rgb, RgbImage};
use memory_book::export::{MemoryBookPdf, PdfAssembler, MIME_TYPE};
use memory_book_common::layout::{A4_HEIGHT_MM, A4_WIDTH_MM};
use memory_book_common::{PageGeometry, SliceBoundary};
use tempfile::tempdir;

fn tall_bitmap(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| Rgb([(y % 200) as u8, 80, 160]))
}

fn page_sizes_mm(bytes: &[u8]) -> Vec<(f32, f32)> {
    let doc = lopdf::Document::load_mem(bytes).expect("PDF読み込み失敗");
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).expect("ページ取得失敗");
            let media_box = page
                .get(b"MediaBox")
                .and_then(|b| b.as_array())
                .expect("MediaBox無し");
            let number = |i: usize| media_box[i].as_float().expect("数値でない");
            let to_mm = |pt: f32| pt * 25.4 / 72.0;
            (to_mm(number(2) - number(0)), to_mm(number(3) - number(1)))
        })
        .collect()
}

#[test]
fn test_pages_are_a4() {
    let assembler = PdfAssembler::new("كتاب الذكريات الجامعية", SliceBoundary::Strict);
    let bytes = assembler.assemble(&tall_bitmap(794, 3000)).expect("PDF生成失敗");

    let sizes = page_sizes_mm(&bytes);
    assert!(!sizes.is_empty());
    for (width, height) in sizes {
        assert!((width - A4_WIDTH_MM as f32).abs() < 0.5);
        assert!((height - A4_HEIGHT_MM as f32).abs() < 0.5);
    }
}

#[test]
fn test_page_count_follows_image_height() {
    // 794px幅で3000px → 約793.45mm → 3ページ
    let assembler = PdfAssembler::new("test", SliceBoundary::Strict);
    let bytes = assembler.assemble(&tall_bitmap(794, 3000)).expect("PDF生成失敗");
    assert_eq!(page_sizes_mm(&bytes).len(), 3);
}

#[test]
fn test_custom_geometry() {
    let geometry = PageGeometry { width_mm: 100.0, media_height_mm: 100.0, step_mm: 100.0 };
    let assembler = PdfAssembler::new("test", SliceBoundary::Strict).with_geometry(geometry);
    let bytes = assembler.assemble(&tall_bitmap(100, 250)).expect("PDF生成失敗");
    assert_eq!(page_sizes_mm(&bytes).len(), 3);
}

#[test]
fn test_save_memory_book_pdf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let assembler = PdfAssembler::new("test", SliceBoundary::Strict);
    let bytes = assembler.assemble(&tall_bitmap(210, 400)).expect("PDF生成失敗");

    let date = NaiveDate::from_ymd_opt(2025, 1, 2).expect("日付");
    let pdf = MemoryBookPdf::new(bytes, "كتاب-الذكريات-الجامعية", date);
    assert_eq!(pdf.mime_type(), MIME_TYPE);

    let path = pdf.save(dir.path()).expect("保存失敗");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("كتاب-الذكريات-الجامعية-2025-01-02.pdf")
    );

    let written = std::fs::read(&path).expect("読み込み失敗");
    assert!(written.starts_with(b"%PDF"));
}
