//! PDFページ分割の計算（レンダラ・PDFライタ非依存）
//!
//! 縦長ビットマップ1枚をA4ページに分割する。各ページには同じ画像全体を
//! 1ページ送り量ずつ上にずらして描画し、ページのクリップで見える範囲だけが残る。

use crate::error::{Error, Result};
use crate::layout::{image_height_mm, A4_HEIGHT_MM, A4_WIDTH_MM, PAGE_STEP_MM};
use serde::{Deserialize, Serialize};

/// 分割ループの継続条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceBoundary {
    /// 残り高さが正の間だけページを追加（295mmちょうど → 1ページ）
    #[default]
    Strict,
    /// 残り高さが0以上ならページを追加（送り量の整数倍で末尾に空ページが付く）
    Inclusive,
}

impl SliceBoundary {
    fn has_more(self, remaining_height: f64) -> bool {
        match self {
            SliceBoundary::Strict => remaining_height > 0.0,
            SliceBoundary::Inclusive => remaining_height >= 0.0,
        }
    }
}

impl std::str::FromStr for SliceBoundary {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(SliceBoundary::Strict),
            "inclusive" | "legacy" => Ok(SliceBoundary::Inclusive),
            _ => Err(format!("Unknown boundary: {}. Use strict or inclusive", s)),
        }
    }
}

impl std::fmt::Display for SliceBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceBoundary::Strict => write!(f, "strict"),
            SliceBoundary::Inclusive => write!(f, "inclusive"),
        }
    }
}

/// 出力ページの寸法（mm）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// 画像を合わせるページ幅
    pub width_mm: f64,
    /// PDFページ（MediaBox）の高さ
    pub media_height_mm: f64,
    /// 1ページごとの送り量
    pub step_mm: f64,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width_mm: A4_WIDTH_MM,
            media_height_mm: A4_HEIGHT_MM,
            step_mm: PAGE_STEP_MM,
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// 分割計画: ページごとの画像上端オフセット（mm、ページ上端基準、下向き正）
#[derive(Debug, Clone, PartialEq)]
pub struct SlicePlan {
    geometry: PageGeometry,
    image_height_mm: f64,
    offsets_mm: Vec<f64>,
}

impl SlicePlan {
    /// ビットマップのpx寸法から計画を作る
    pub fn for_bitmap(
        width_px: u32,
        height_px: u32,
        geometry: PageGeometry,
        boundary: SliceBoundary,
    ) -> Result<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(Error::InvalidBitmap { width: width_px, height: height_px });
        }
        let height_mm = image_height_mm(width_px, height_px, geometry.width_mm);
        Ok(Self::for_image_height(height_mm, geometry, boundary))
    }

    /// 画像高さ（mm）から計画を作る
    pub fn for_image_height(
        image_height_mm: f64,
        geometry: PageGeometry,
        boundary: SliceBoundary,
    ) -> Self {
        // 1ページ目は常にオフセット0
        let mut offsets_mm = vec![0.0];
        let mut remaining_height = image_height_mm - geometry.step_mm;

        while boundary.has_more(remaining_height) {
            offsets_mm.push(remaining_height - image_height_mm);
            remaining_height -= geometry.step_mm;
        }

        Self { geometry, image_height_mm, offsets_mm }
    }

    pub fn page_count(&self) -> usize {
        self.offsets_mm.len()
    }

    pub fn image_height_mm(&self) -> f64 {
        self.image_height_mm
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// 各ページの画像上端オフセット（mm、0以下）
    pub fn offsets_mm(&self) -> &[f64] {
        &self.offsets_mm
    }

    /// PDF座標（原点左下）での画像下端Y（mm）
    pub fn bottom_y_mm(&self, page: usize) -> Option<f64> {
        self.offsets_mm
            .get(page)
            .map(|offset| self.geometry.media_height_mm - (offset + self.image_height_mm))
    }
}
