//! HTML → ビットマップ変換（ラスタライザ）
//!
//! 組版済みHTMLを縦長の画像1枚に描画する。実際の描画は `HtmlRenderer`
//! 実装（ヘッドレスChromium）に任せ、ここでは描画前後の加工を行う。

pub mod chromium;

pub use chromium::ChromiumRenderer;

use crate::error::{MemoryBookError, Result};
use image::{Rgb, RgbImage};
use regex::Regex;
use std::sync::OnceLock;

/// 描画結果（RGB、上から下へ）
pub type Bitmap = RgbImage;

/// 描画ウィンドウの上限（CSS px）。これを超える文書は描画しない
pub const MAX_WINDOW_HEIGHT_PX: u32 = 60_000;

/// 計測高さに足す余白（CSS px）。撮影後にこの余白が背景のまま残ることを確認する
pub const TRAILING_MARGIN_PX: u32 = 32;

const MEASURE_ID: &str = "memory-book-measure";

/// 計測用スクリプト（load後に文書高さと読み込み失敗画像を `<meta>` に書き出す）
const MEASURE_SCRIPT: &str = r#"<script data-memory-book-measure>
window.addEventListener('load', function () {
  var broken = Array.prototype.filter.call(document.images, function (img) {
    return !(img.complete && img.naturalWidth > 0);
  });
  var root = document.documentElement;
  var height = Math.ceil(Math.max(root.scrollHeight, document.body ? document.body.scrollHeight : 0));
  var meta = document.createElement('meta');
  meta.id = 'memory-book-measure';
  meta.setAttribute('data-height', String(height));
  meta.setAttribute('data-broken', String(broken.length));
  meta.setAttribute('data-first-broken', broken.length ? (broken[0].getAttribute('src') || '') : '');
  document.head.appendChild(meta);
});
</script>"#;

pub trait HtmlRenderer: Send + Sync {
    /// HTML文書を描画する（幅はA4相当、高さは内容全体）
    fn render(&self, html: &str) -> Result<Bitmap>;
}

/// 計測パスの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeasurement {
    /// 文書全体の高さ（CSS px）
    pub height_px: u32,
    pub broken_images: u32,
    pub first_broken_src: Option<String>,
}

impl PageMeasurement {
    /// 撮影ウィンドウの高さ（CSS px）
    ///
    /// 画像の読み込み失敗、または上限を超える高さは `Render` エラー。
    pub fn window_height_px(&self) -> Result<u32> {
        if self.broken_images > 0 {
            return Err(MemoryBookError::Render(format!(
                "画像を読み込めませんでした: {}件 ({})",
                self.broken_images,
                self.first_broken_src.as_deref().unwrap_or("-")
            )));
        }

        let window = self.height_px.max(1).saturating_add(TRAILING_MARGIN_PX);
        if window > MAX_WINDOW_HEIGHT_PX {
            return Err(MemoryBookError::Render(format!(
                "文書が長すぎます: {}px (上限 {}px)",
                self.height_px,
                MAX_WINDOW_HEIGHT_PX - TRAILING_MARGIN_PX
            )));
        }
        Ok(window)
    }
}

/// 計測スクリプトを差し込んだHTML
pub fn with_measurement_script(html: &str) -> String {
    inject_into_head(html, MEASURE_SCRIPT)
}

/// `--dump-dom` の出力から計測結果を取り出す
pub fn parse_measurement(dom: &str) -> Result<PageMeasurement> {
    static META_RE: OnceLock<Regex> = OnceLock::new();
    let meta = META_RE
        .get_or_init(|| {
            Regex::new(&format!(r#"<meta\b[^>]*\bid="{}"[^>]*>"#, MEASURE_ID)).expect("measure meta regex")
        })
        .find(dom)
        .map(|m| m.as_str())
        .ok_or_else(|| MemoryBookError::Render("文書の高さを計測できませんでした".into()))?;

    let number = |name: &str| -> Result<u32> {
        attribute(meta, name)
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| MemoryBookError::Render(format!("計測値が不正です: {}", name)))
    };

    Ok(PageMeasurement {
        height_px: number("data-height")?,
        broken_images: number("data-broken")?,
        first_broken_src: attribute(meta, "data-first-broken").filter(|s| !s.is_empty()),
    })
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"\b{}="([^"]*)""#, regex::escape(name));
    Regex::new(&pattern)
        .ok()?
        .captures(tag)
        .and_then(|c| c.get(1))
        .map(|m| unescape_attribute(m.as_str()))
}

fn unescape_attribute(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// 末尾の背景色だけの行を切り詰める
///
/// 左下のピクセルを背景色とみなす。最低1行は残す。
pub fn trim_trailing_background(bitmap: Bitmap) -> Bitmap {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height <= 1 {
        return bitmap;
    }

    let background: Rgb<u8> = *bitmap.get_pixel(0, height - 1);
    let mut content_height = height;
    while content_height > 1 {
        let y = content_height - 1;
        if (0..width).any(|x| *bitmap.get_pixel(x, y) != background) {
            break;
        }
        content_height -= 1;
    }

    if content_height == height {
        return bitmap;
    }

    log::debug!("背景行を切り詰め: {}px → {}px", height, content_height);
    image::imageops::crop_imm(&bitmap, 0, 0, width, content_height).to_image()
}

/// 末尾の余白を切り詰め、余白が足りなければエラー
///
/// ウィンドウは計測高さ＋余白で撮影するため、末尾には背景だけの行が
/// `min_margin_rows` 行以上残るはず。足りなければ内容が下端で切れている。
pub fn trim_to_content(bitmap: Bitmap, min_margin_rows: u32) -> Result<Bitmap> {
    let height = bitmap.height();
    if bitmap.width() == 0 || height == 0 {
        return Err(MemoryBookError::Render("描画結果が空です".into()));
    }

    let trimmed = trim_trailing_background(bitmap);
    let margin = height - trimmed.height();
    if margin < min_margin_rows {
        return Err(MemoryBookError::Render(format!(
            "内容が撮影範囲の下端に達しています（余白 {}px / 必要 {}px）",
            margin, min_margin_rows
        )));
    }
    Ok(trimmed)
}

/// HTML内に指定idの要素があるか
pub fn contains_element(html: &str, element_id: &str) -> bool {
    let pattern = format!(r#"id\s*=\s*["']{}["']"#, regex::escape(element_id));
    Regex::new(&pattern)
        .map(|re| re.is_match(html))
        .unwrap_or(false)
}

/// 指定要素だけが見えるようにスタイルを差し込む
///
/// 要素が無い場合は `ElementNotFound`。
pub fn isolate_element(html: &str, element_id: &str) -> Result<String> {
    if !contains_element(html, element_id) {
        return Err(MemoryBookError::ElementNotFound(element_id.to_string()));
    }

    let selector = format!(r#"[id="{}"]"#, css_escape(element_id));
    let style = format!(
        "<style data-memory-book-isolate>\
body {{ background: none !important; }}\
body * {{ visibility: hidden !important; }}\
{sel}, {sel} * {{ visibility: visible !important; }}\
{sel} {{ position: absolute !important; left: 0 !important; top: 0 !important; margin: 0 !important; }}\
</style>",
        sel = selector
    );

    Ok(inject_into_head(html, &style))
}

/// `</head>` の直前に差し込む（headが無ければ先頭）
fn inject_into_head(html: &str, fragment: &str) -> String {
    static HEAD_END_RE: OnceLock<Regex> = OnceLock::new();
    let head_end = HEAD_END_RE
        .get_or_init(|| Regex::new(r"(?i)</head\s*>").expect("head end regex"))
        .find(html);
    match head_end {
        Some(m) => {
            let mut out = String::with_capacity(html.len() + fragment.len());
            out.push_str(&html[..m.start()]);
            out.push_str(fragment);
            out.push_str(&html[m.start()..]);
            out
        }
        None => format!("{}{}", fragment, html),
    }
}

fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap_with_content(width: u32, height: u32, content_rows: u32) -> Bitmap {
        RgbImage::from_fn(width, height, |_, y| {
            if y < content_rows {
                Rgb([10, 20, 30])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn test_trim_trailing_background() {
        let trimmed = trim_trailing_background(bitmap_with_content(8, 100, 40));
        assert_eq!(trimmed.dimensions(), (8, 40));
    }

    #[test]
    fn test_trim_keeps_full_content() {
        let trimmed = trim_trailing_background(bitmap_with_content(8, 50, 50));
        assert_eq!(trimmed.height(), 50);
    }

    #[test]
    fn test_trim_blank_keeps_one_row() {
        let blank = RgbImage::from_pixel(8, 30, Rgb([255, 255, 255]));
        assert_eq!(trim_trailing_background(blank).height(), 1);
    }

    #[test]
    fn test_trim_to_content_with_margin() {
        let trimmed = trim_to_content(bitmap_with_content(8, 100, 90), 10).expect("切り詰め失敗");
        assert_eq!(trimmed.height(), 90);
    }

    #[test]
    fn test_content_at_bottom_is_truncation() {
        // 最下行まで内容（行ごとに色が違う）→ 撮影範囲が足りていない
        let cut = RgbImage::from_fn(8, 100, |_, y| Rgb([y as u8, 40, 80]));
        let result = trim_to_content(cut, 10);
        assert!(matches!(result, Err(MemoryBookError::Render(_))));
    }

    #[test]
    fn test_short_margin_is_truncation() {
        let result = trim_to_content(bitmap_with_content(8, 100, 95), 10);
        assert!(matches!(result, Err(MemoryBookError::Render(_))));
    }

    #[test]
    fn test_trim_to_content_rejects_empty() {
        assert!(matches!(trim_to_content(RgbImage::new(0, 0), 1), Err(MemoryBookError::Render(_))));
    }

    fn measured_dom(height: u32, broken: u32, first: &str) -> String {
        format!(
            r#"<html><head><meta id="memory-book-measure" data-height="{}" data-broken="{}" data-first-broken="{}"></head><body></body></html>"#,
            height, broken, first
        )
    }

    #[test]
    fn test_parse_measurement() {
        let m = parse_measurement(&measured_dom(4521, 0, "")).expect("計測失敗");
        assert_eq!(m.height_px, 4521);
        assert_eq!(m.broken_images, 0);
        assert_eq!(m.first_broken_src, None);
        assert_eq!(m.window_height_px().expect("高さ"), 4521 + TRAILING_MARGIN_PX);
    }

    #[test]
    fn test_parse_measurement_missing() {
        let result = parse_measurement("<html><head></head><body></body></html>");
        assert!(matches!(result, Err(MemoryBookError::Render(_))));
    }

    #[test]
    fn test_window_covers_long_colleague_page() {
        // 同期400名（1人100px以上）でも計測値どおりの高さで撮影する
        let m = parse_measurement(&measured_dom(40_000, 0, "")).expect("計測失敗");
        assert!(m.window_height_px().expect("高さ") > 40_000);
    }

    #[test]
    fn test_too_tall_document_is_error() {
        // 思い出1000枚規模（28万px超）は切らずにエラー
        let m = parse_measurement(&measured_dom(286_365, 0, "")).expect("計測失敗");
        assert!(matches!(m.window_height_px(), Err(MemoryBookError::Render(_))));
    }

    #[test]
    fn test_broken_image_is_error() {
        let m = parse_measurement(&measured_dom(2000, 2, "http://img/a.jpg?x=1&amp;y=2")).expect("計測失敗");
        assert_eq!(m.first_broken_src.as_deref(), Some("http://img/a.jpg?x=1&y=2"));
        match m.window_height_px() {
            Err(MemoryBookError::Render(message)) => assert!(message.contains("http://img/a.jpg")),
            other => panic!("Renderエラーになっていない: {:?}", other),
        }
    }

    #[test]
    fn test_measurement_script_injected() {
        let html = with_measurement_script("<html><head></head><body></body></html>");
        assert!(html.contains("data-memory-book-measure"));
        assert!(html.find("<script").expect("script無し") < html.find("</head>").expect("head無し"));
        assert!(html.contains(MEASURE_ID));
    }

    #[test]
    fn test_contains_element() {
        let html = r#"<div id="memory-book"><p id='inner'>x</p></div>"#;
        assert!(contains_element(html, "memory-book"));
        assert!(contains_element(html, "inner"));
        assert!(!contains_element(html, "memory"));
        assert!(!contains_element(html, "missing"));
    }

    #[test]
    fn test_isolate_element_injects_before_head_end() {
        let html = "<html><head><title>t</title></head><body><div id=\"book\"></div></body></html>";
        let isolated = isolate_element(html, "book").expect("差し込み失敗");
        let style_pos = isolated.find("data-memory-book-isolate").expect("style無し");
        let head_end = isolated.find("</head>").expect("head無し");
        assert!(style_pos < head_end);
        assert!(isolated.contains(r#"[id="book"]"#));
        assert!(isolated.contains("body { background: none !important; }"));
    }

    #[test]
    fn test_isolate_element_without_head() {
        let isolated = isolate_element(r#"<div id="x.y"></div>"#, "x.y").expect("差し込み失敗");
        assert!(isolated.starts_with("<style"));
    }

    #[test]
    fn test_isolate_missing_element() {
        let result = isolate_element("<div id=\"a\"></div>", "b");
        assert!(matches!(result, Err(MemoryBookError::ElementNotFound(id)) if id == "b"));
    }
}
