//! ビットマップ → 複数ページPDF（アセンブラ）
//!
//! 画像は1回だけ埋め込み、各ページで同じXObjectを縦にずらして配置する。

use crate::error::{MemoryBookError, Result};
use crate::render::Bitmap;
use log::debug;
use memory_book_common::{PageGeometry, SliceBoundary, SlicePlan};
use printpdf::*;

#[derive(Debug, Clone)]
pub struct PdfAssembler {
    title: String,
    geometry: PageGeometry,
    boundary: SliceBoundary,
}

impl PdfAssembler {
    pub fn new(title: impl Into<String>, boundary: SliceBoundary) -> Self {
        Self {
            title: title.into(),
            geometry: PageGeometry::a4(),
            boundary,
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// 分割計画（ページ数・各ページのオフセット）
    pub fn plan(&self, bitmap: &Bitmap) -> Result<SlicePlan> {
        SlicePlan::for_bitmap(bitmap.width(), bitmap.height(), self.geometry, self.boundary)
            .map_err(|e| MemoryBookError::Assembly(e.to_string()))
    }

    /// PDFバイト列を生成
    pub fn assemble(&self, bitmap: &Bitmap) -> Result<Vec<u8>> {
        let plan = self.plan(bitmap)?;
        debug!(
            "画像高さ {:.2}mm → {}ページ",
            plan.image_height_mm(),
            plan.page_count()
        );

        let mut doc = PdfDocument::new(&self.title);
        let image_id = doc.add_image(&to_raw_image(bitmap));

        // ページ幅に合わせるDPI（高さも同じ比率で決まる）
        let dpi = bitmap.width() as f64 * 25.4 / self.geometry.width_mm;

        let pages = (0..plan.page_count())
            .filter_map(|page| plan.bottom_y_mm(page))
            .map(|bottom_y| {
                let ops = vec![Op::UseXobject {
                    id: image_id.clone(),
                    transform: XObjectTransform {
                        translate_x: Some(Pt(0.0)),
                        translate_y: Some(Mm(bottom_y as f32).into_pt()),
                        rotate: None,
                        scale_x: None,
                        scale_y: None,
                        dpi: Some(dpi as f32),
                    },
                }];
                PdfPage::new(
                    Mm(self.geometry.width_mm as f32),
                    Mm(self.geometry.media_height_mm as f32),
                    ops,
                )
            })
            .collect::<Vec<_>>();

        doc.pages = pages;

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!("PDF警告: {}件", warnings.len());
        }

        Ok(bytes)
    }
}

fn to_raw_image(bitmap: &Bitmap) -> RawImage {
    RawImage {
        pixels: RawImageData::U8(bitmap.as_raw().clone()),
        width: bitmap.width() as usize,
        height: bitmap.height() as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    }
}
