//! 組版用スタイルシート
//!
//! 改ページ制御（section-page / image-row）はレイアウト定数から生成する。

use crate::layout::{
    A4_HEIGHT_MM, A4_WIDTH_MM, IMAGE_CONTAINER_HEIGHT_PX, IMAGE_ROW_HEIGHT_RATIO,
    IMAGE_ROW_MAX_HEIGHT_PX, PAGE_PADDING_MM, PROFILE_IMAGE_MAX_WIDTH_PX,
};

const BASE_CSS: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
html { background: #ffffff; }
body {
    font-family: 'Amiri', 'Cairo', 'Arial', sans-serif;
    line-height: 1.8;
    color: #2c3e50;
    background: linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%);
    direction: rtl;
    text-align: right;
}
.cover-page {
    display: flex;
    flex-direction: column;
    justify-content: center;
    align-items: center;
    text-align: center;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
}
.cover-title { font-size: 3rem; font-weight: bold; margin-bottom: 2rem; text-shadow: 2px 2px 4px rgba(0,0,0,0.3); }
.cover-subtitle { font-size: 1.5rem; margin-bottom: 3rem; opacity: 0.9; }
.cover-highlights {
    margin: 2rem 0;
    padding: 1.5rem;
    background: rgba(255,255,255,0.15);
    border-radius: 15px;
    border: 1px solid rgba(255,255,255,0.2);
}
.cover-highlights p { font-size: 1.2rem; margin-bottom: 0.8rem; font-weight: 600; }
.cover-date { font-size: 1.2rem; opacity: 0.8; }
.section-title {
    font-size: 2.8rem;
    font-weight: 700;
    margin: 0 0 2rem 0;
    padding-bottom: 1.5rem;
    border-bottom: 4px solid #3498db;
    text-align: center;
}
.section-lead { font-size: 1.2rem; margin-bottom: 2rem; }
.stats-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; margin: 2rem 0; }
.stat-card { color: white; padding: 1.5rem; border-radius: 8px; text-align: center; }
.stat-card.photos { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
.stat-card.colleagues { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); }
.stat-card.events { background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%); }
.stat-icon { font-size: 2.5rem; margin-bottom: 0.5rem; }
.stat-number { font-size: 2rem; font-weight: bold; margin-bottom: 0.5rem; }
.stat-label { font-size: 1rem; opacity: 0.9; }
.grand-total {
    margin-top: 3rem;
    padding: 2rem;
    background: linear-gradient(135deg, #f8f9fa 0%, #e9ecef 100%);
    border-radius: 15px;
    text-align: center;
}
.grand-total-number { font-size: 2rem; font-weight: bold; color: #3498db; }
.event-card, .colleague-card, .photo-card {
    background: #f8f9fa;
    border: 1px solid #dee2e6;
    border-radius: 8px;
    padding: 1rem;
    margin: 1rem 0;
    break-inside: avoid;
    page-break-inside: avoid;
}
.event-title, .colleague-name { font-size: 1.3rem; font-weight: bold; margin-bottom: 0.5rem; }
.event-details, .colleague-info {
    display: grid;
    grid-template-columns: 1fr 1fr;
    gap: 0.5rem;
    margin: 0.5rem 0;
    font-size: 0.9rem;
    color: #6c757d;
}
.event-description, .colleague-bio { margin-top: 0.5rem; font-style: italic; color: #495057; }
.photo-title { font-size: 1.2rem; font-weight: bold; margin-bottom: 0.5rem; }
.photo-description { margin: 0.5rem 0; color: #495057; line-height: 1.6; }
.images-grid {
    display: flex;
    flex-direction: column;
    gap: 20px;
    margin: 20px 0;
    padding: 20px;
    background: linear-gradient(135deg, #f8f9fa 0%, #e9ecef 100%);
    border-radius: 12px;
    break-inside: avoid;
    page-break-inside: avoid;
}
.image-container {
    width: 100%;
    display: flex;
    align-items: center;
    justify-content: center;
    overflow: hidden;
    border-radius: 6px;
    background: white;
    border: 1px solid #e9ecef;
    break-inside: avoid;
    page-break-inside: avoid;
}
img {
    display: block;
    margin: 0 auto;
    max-width: 100%;
    max-height: 100%;
    width: auto;
    height: auto;
    object-fit: contain;
    break-inside: avoid;
    page-break-inside: avoid;
}
.image-row.featured { border: 2px solid #f39c12; }
.footer {
    text-align: center;
    margin-top: 3rem;
    padding-top: 2rem;
    border-top: 2px solid #e9ecef;
    color: #6c757d;
    font-size: 0.9rem;
}
.footer-title { margin-bottom: 2rem; }
.footer-note { font-size: 1.1rem; margin-bottom: 1rem; }
"#;

/// スタイルシート全体（寸法依存部分を含む）
pub fn stylesheet() -> String {
    let row_height_vh = IMAGE_ROW_HEIGHT_RATIO * 100.0;
    format!(
        r#"{base}
.page {{
    width: {page_w}mm;
    min-height: {page_h}mm;
    padding: {padding}mm;
    margin: 0 auto;
    background: white;
    position: relative;
    break-after: page;
    page-break-after: always;
    break-inside: avoid;
    page-break-inside: avoid;
}}
.section-page {{
    break-before: page;
    page-break-before: always;
    break-after: page;
    page-break-after: always;
    break-inside: avoid;
    page-break-inside: avoid;
}}
.image-row {{
    display: flex;
    flex-direction: column;
    align-items: center;
    justify-content: center;
    height: {row_vh}vh;
    min-height: {row_max}px;
    max-height: {row_max}px;
    padding: 10px;
    border: 1px solid #e0e0e0;
    border-radius: 8px;
    background: white;
    break-inside: avoid;
    page-break-inside: avoid;
}}
.image-container {{ height: {container}px; }}
.profile-image {{ max-width: {profile}px; border-radius: 8px; margin: 0.5rem 0; }}
"#,
        base = BASE_CSS,
        page_w = A4_WIDTH_MM,
        page_h = A4_HEIGHT_MM,
        padding = PAGE_PADDING_MM,
        row_vh = row_height_vh,
        row_max = IMAGE_ROW_MAX_HEIGHT_PX,
        container = IMAGE_CONTAINER_HEIGHT_PX,
        profile = PROFILE_IMAGE_MAX_WIDTH_PX,
    )
}
