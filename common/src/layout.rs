//! レイアウト設定モジュール
//!
//! mm基準のページ寸法と、組版ポリシー（1ページあたりの写真数など）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================
// ページ寸法（mm）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

/// PDF分割時の1ページ送り量（mm）
pub const PAGE_STEP_MM: f64 = 295.0;

/// HTMLページの内側余白（mm）
pub const PAGE_PADDING_MM: f64 = 25.0;

// ============================================
// ラスタ寸法（px）
// ============================================

/// A4幅 @96dpi
pub const A4_WIDTH_PX: u32 = 794;

/// A4高さ @96dpi
pub const A4_HEIGHT_PX: u32 = 1123;

/// 印刷品質用のデバイスピクセル倍率
pub const DEFAULT_DEVICE_SCALE: f32 = 2.0;

// ============================================
// 組版ポリシー
// ============================================

/// 写真セクションの1ページあたり枚数
pub const DEFAULT_PHOTOS_PER_PAGE: usize = 4;

/// 歴史グループごとの最大画像数（超過分は収録しない）
pub const DEFAULT_HISTORY_IMAGES_PER_GROUP: usize = 4;

/// 画像行の高さ（ページ高さに対する比率）
pub const IMAGE_ROW_HEIGHT_RATIO: f64 = 0.2;

/// 画像行の高さ上限（px）
pub const IMAGE_ROW_MAX_HEIGHT_PX: u32 = 120;

/// 画像枠の高さ（px）
pub const IMAGE_CONTAINER_HEIGHT_PX: u32 = 80;

/// 同期カードのプロフィール画像幅（px）
pub const PROFILE_IMAGE_MAX_WIDTH_PX: u32 = 150;

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// mm → px変換 (96dpi基準)
pub const MM_TO_PX: f64 = 96.0 / 25.4;

/// 組版ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookLayout {
    /// 写真セクションの1ページあたり枚数
    pub photos_per_page: usize,
    /// 歴史グループごとの最大画像数
    pub history_images_per_group: usize,
}

impl Default for BookLayout {
    fn default() -> Self {
        Self {
            photos_per_page: DEFAULT_PHOTOS_PER_PAGE,
            history_images_per_group: DEFAULT_HISTORY_IMAGES_PER_GROUP,
        }
    }
}

impl BookLayout {
    pub fn new(photos_per_page: usize, history_images_per_group: usize) -> Result<Self> {
        let layout = Self { photos_per_page, history_images_per_group };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        if self.photos_per_page == 0 {
            return Err(Error::InvalidLayout("1ページあたりの写真数は1以上".into()));
        }
        if self.history_images_per_group == 0 {
            return Err(Error::InvalidLayout("歴史グループの画像数は1以上".into()));
        }
        Ok(())
    }

    /// 写真セクションのページ数: ceil(count / photos_per_page)
    pub fn pages_for(&self, count: usize) -> usize {
        count.div_ceil(self.photos_per_page.max(1))
    }

    /// 画像行の高さ（mm）
    pub fn image_row_height_mm(&self) -> f64 {
        A4_HEIGHT_MM * IMAGE_ROW_HEIGHT_RATIO
    }
}

// ============================================
// ヘルパー関数
// ============================================

#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * MM_TO_PT
}

#[inline]
pub fn mm_to_px(mm: f64) -> f64 {
    mm * MM_TO_PX
}

/// ビットマップ高さ（px）をページ幅基準のmmに換算
#[inline]
pub fn image_height_mm(width_px: u32, height_px: u32, page_width_mm: f64) -> f64 {
    height_px as f64 * page_width_mm / width_px as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert!((mm_to_px(A4_WIDTH_MM) - A4_WIDTH_PX as f64).abs() < 1.0);
        assert!((mm_to_px(A4_HEIGHT_MM) - A4_HEIGHT_PX as f64).abs() < 1.0);
        assert!(PAGE_STEP_MM < A4_HEIGHT_MM);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
        assert!((image_height_mm(794, 1588, A4_WIDTH_MM) - 420.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_layout() {
        let layout = BookLayout::default();
        assert_eq!(layout.photos_per_page, 4);
        assert_eq!(layout.history_images_per_group, 4);
        assert!((layout.image_row_height_mm() - 59.4).abs() < 0.01);
    }

    #[test]
    fn test_pages_for() {
        let layout = BookLayout::default();
        assert_eq!(layout.pages_for(0), 0);
        assert_eq!(layout.pages_for(1), 1);
        assert_eq!(layout.pages_for(4), 1);
        assert_eq!(layout.pages_for(5), 2);
        assert_eq!(layout.pages_for(9), 3);
    }

    #[test]
    fn test_invalid_layout() {
        assert!(BookLayout::new(0, 4).is_err());
        assert!(BookLayout::new(4, 0).is_err());
        assert!(BookLayout::new(2, 6).is_ok());
    }
}
