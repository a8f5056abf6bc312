use memory_book_common::{PageGeometry, SliceBoundary, SlicePlan};
use std::env;

/// 画像高さ（mm）ごとのページ分割を表示する確認用ツール
fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: slice_cases <height_mm> [height_mm ...]");
        std::process::exit(1);
    }

    let geometry = PageGeometry::a4();
    println!(
        "{:>10}  {:>6}  {:>9}  offsets(mm)",
        "height", "strict", "inclusive"
    );

    for arg in &args {
        let Ok(height_mm) = arg.parse::<f64>() else {
            eprintln!("数値ではありません: {}", arg);
            continue;
        };

        let strict = SlicePlan::for_image_height(height_mm, geometry, SliceBoundary::Strict);
        let inclusive = SlicePlan::for_image_height(height_mm, geometry, SliceBoundary::Inclusive);
        let offsets = strict
            .offsets_mm()
            .iter()
            .map(|o| format!("{:.2}", o))
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "{:>10.2}  {:>6}  {:>9}  [{}]",
            height_mm,
            strict.page_count(),
            inclusive.page_count(),
            offsets
        );
    }
}
