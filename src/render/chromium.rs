//! ヘッドレスChromiumによる描画
//!
//! 2回起動する。1回目は `--dump-dom` で文書の高さと画像の読み込み状況を
//! 計測し、2回目はその高さ＋余白のウィンドウで `--screenshot` を撮る。
//! 一時ディレクトリはドロップ時に削除される（失敗時も同様）。

use super::{
    parse_measurement, trim_to_content, with_measurement_script, Bitmap, HtmlRenderer,
    TRAILING_MARGIN_PX,
};
use crate::config::Config;
use crate::error::{MemoryBookError, Result};
use log::{debug, info};
use memory_book_common::layout::{A4_HEIGHT_PX, A4_WIDTH_PX};
use std::path::{Path, PathBuf};
use std::process::Command;

const MEASURE_FILE: &str = "measure.html";
const HTML_FILE: &str = "book.html";
const SCREENSHOT_FILE: &str = "book.png";

#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    browser: PathBuf,
    device_scale_factor: f32,
    virtual_time_budget_ms: u64,
}

impl ChromiumRenderer {
    pub fn new(browser: impl Into<PathBuf>, device_scale_factor: f32, virtual_time_budget_ms: u64) -> Self {
        Self {
            browser: browser.into(),
            device_scale_factor,
            virtual_time_budget_ms,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.browser, config.device_scale_factor, config.render_budget_ms)
    }

    fn common_args(&self, window_height_px: u32) -> Vec<String> {
        vec![
            "--headless".into(),
            "--disable-gpu".into(),
            "--no-sandbox".into(),
            "--hide-scrollbars".into(),
            "--allow-file-access-from-files".into(),
            format!("--force-device-scale-factor={}", self.device_scale_factor),
            format!("--window-size={},{}", A4_WIDTH_PX, window_height_px),
            format!("--virtual-time-budget={}", self.virtual_time_budget_ms),
        ]
    }

    /// 計測パスの引数（DOMを標準出力へ）
    pub fn measure_args(&self, html_path: &Path) -> Vec<String> {
        let mut args = self.common_args(A4_HEIGHT_PX);
        args.push("--dump-dom".into());
        args.push(file_url(html_path));
        args
    }

    /// 撮影パスの引数
    pub fn screenshot_args(&self, html_path: &Path, screenshot_path: &Path, window_height_px: u32) -> Vec<String> {
        let mut args = self.common_args(window_height_px);
        args.push(format!("--screenshot={}", screenshot_path.display()));
        args.push(file_url(html_path));
        args
    }

    /// 撮影結果の末尾に残るべき余白行数（丸め誤差分は許容）
    fn min_margin_rows(&self) -> u32 {
        (TRAILING_MARGIN_PX as f32 * self.device_scale_factor / 2.0).floor().max(1.0) as u32
    }

    fn run_browser(&self, args: &[String]) -> Result<String> {
        debug!("{} {}", self.browser.display(), args.join(" "));

        let output = Command::new(&self.browser)
            .args(args)
            .output()
            .map_err(|e| {
                MemoryBookError::Render(format!(
                    "ブラウザ起動エラー ({}): {}",
                    self.browser.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MemoryBookError::Render(format!(
                "browser failed (code {:?}): {}",
                output.status.code(),
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl HtmlRenderer for ChromiumRenderer {
    fn render(&self, html: &str) -> Result<Bitmap> {
        let work_dir = tempfile::Builder::new()
            .prefix("memory-book-")
            .tempdir()
            .map_err(|e| MemoryBookError::Render(format!("一時ディレクトリ作成エラー: {}", e)))?;

        // 1. 計測
        let measure_path = work_dir.path().join(MEASURE_FILE);
        std::fs::write(&measure_path, with_measurement_script(html))?;
        let dom = self.run_browser(&self.measure_args(&measure_path))?;
        let measurement = parse_measurement(&dom)?;
        let window_height = measurement.window_height_px()?;
        debug!("文書高さ {}px → ウィンドウ {}px", measurement.height_px, window_height);

        // 2. 撮影
        let html_path = work_dir.path().join(HTML_FILE);
        let screenshot_path = work_dir.path().join(SCREENSHOT_FILE);
        std::fs::write(&html_path, html)?;
        self.run_browser(&self.screenshot_args(&html_path, &screenshot_path, window_height))?;

        if !screenshot_path.exists() {
            return Err(MemoryBookError::Render("スクリーンショットが出力されませんでした".into()));
        }

        let bitmap = image::open(&screenshot_path)
            .map_err(|e| MemoryBookError::Render(format!("スクリーンショット読み込みエラー: {}", e)))?
            .to_rgb8();

        let bitmap = trim_to_content(bitmap, self.min_margin_rows())?;
        info!("描画完了: {}x{}px", bitmap.width(), bitmap.height());

        Ok(bitmap)
    }
}

fn file_url(path: &Path) -> String {
    let normalized = path.display().to_string().replace('\\', "/");
    if normalized.starts_with('/') {
        format!("file://{}", normalized)
    } else {
        format!("file:///{}", normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_args() {
        let renderer = ChromiumRenderer::new("chromium", 2.0, 5000);
        let args = renderer.screenshot_args(Path::new("/tmp/x/book.html"), Path::new("/tmp/x/book.png"), 2246);

        assert!(args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--force-device-scale-factor=2".to_string()));
        assert!(args.contains(&"--window-size=794,2246".to_string()));
        assert!(args.contains(&"--virtual-time-budget=5000".to_string()));
        assert!(args.contains(&"--screenshot=/tmp/x/book.png".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("file:///tmp/x/book.html"));
    }

    #[test]
    fn test_measure_args() {
        let renderer = ChromiumRenderer::new("chromium", 2.0, 5000);
        let args = renderer.measure_args(Path::new("/tmp/x/measure.html"));
        assert!(args.contains(&"--dump-dom".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--screenshot")));
        assert_eq!(args.last().map(String::as_str), Some("file:///tmp/x/measure.html"));
    }

    #[test]
    fn test_min_margin_rows() {
        assert_eq!(ChromiumRenderer::new("chromium", 2.0, 0).min_margin_rows(), TRAILING_MARGIN_PX);
        assert_eq!(ChromiumRenderer::new("chromium", 1.0, 0).min_margin_rows(), TRAILING_MARGIN_PX / 2);
    }

    #[test]
    fn test_file_url_windows_path() {
        assert_eq!(file_url(Path::new(r"C:\tmp\book.html")), "file:///C:/tmp/book.html");
    }

    #[test]
    fn test_missing_browser_is_render_error() {
        let renderer = ChromiumRenderer::new("/nonexistent/memory-book-browser", 1.0, 100);
        let result = renderer.render("<html><body><div class=\"page\"></div></body></html>");
        assert!(matches!(result, Err(MemoryBookError::Render(_))));
    }

    #[test]
    fn test_from_config() {
        let config = Config { browser: "google-chrome".into(), ..Default::default() };
        let renderer = ChromiumRenderer::from_config(&config);
        assert_eq!(renderer.browser, PathBuf::from("google-chrome"));
        assert_eq!(renderer.virtual_time_budget_ms, config.render_budget_ms);
    }
}
