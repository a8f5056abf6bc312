//! HTML組版モジュール
//!
//! `MemoryBookData` を右横書き（RTL）の1枚のHTML文書に変換する。
//! ページ単位のブロック（`div.page`）を並べ、写真セクションは1ページあたり
//! `BookLayout::photos_per_page` 枚で分割する。I/Oを行わない純粋関数。

mod style;

pub use style::stylesheet;

use crate::layout::BookLayout;
use crate::types::{Colleague, GraduationEvent, HistoryGroup, MemoryBookData, Photo};
use chrono::{Datelike, NaiveDate};

/// 文書タイトル
pub const BOOK_TITLE: &str = "كتاب الذكريات الجامعية";

const COVER_SUBTITLE: &str = "مجموعة شاملة من الذكريات واللحظات المميزة";
const COVER_HIGHLIGHTS: [&str; 3] = [
    "🎓 رحلة تعليمية مليئة بالإنجازات والنجاحات",
    "📸 لحظات لا تُنسى مع الزملاء والأصدقاء",
    "🌟 ذكريات ستبقى في القلب للأبد",
];

/// ページの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Statistics,
    Graduation,
    HistoryGroups,
    Photos(PhotoSection),
    Colleagues,
    Footer,
}

/// 写真セクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSection {
    Memories,
    Meetings,
    Historical,
}

impl PhotoSection {
    pub const ALL: [PhotoSection; 3] =
        [PhotoSection::Memories, PhotoSection::Meetings, PhotoSection::Historical];

    pub fn title(self) -> &'static str {
        match self {
            PhotoSection::Memories => "الصور التذكارية",
            PhotoSection::Meetings => "صور اللقاءات",
            PhotoSection::Historical => "الصور التاريخية",
        }
    }

    pub fn photos(self, data: &MemoryBookData) -> &[Photo] {
        match self {
            PhotoSection::Memories => &data.memories,
            PhotoSection::Meetings => &data.meetings,
            PhotoSection::Historical => &data.historical,
        }
    }
}

/// 組版済みの1ページ
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    pub kind: PageKind,
    pub title: String,
    /// `div.page` 要素全体
    pub html: String,
}

impl BookPage {
    /// ページ内の `<img>` 数
    pub fn image_count(&self) -> usize {
        self.html.matches("<img ").count()
    }
}

/// ページ列を組版
pub fn compose_pages(
    data: &MemoryBookData,
    layout: &BookLayout,
    generated_on: NaiveDate,
) -> Vec<BookPage> {
    let mut pages = vec![cover_page(generated_on), statistics_page(data), graduation_page(data)];

    if !data.history_groups().is_empty() {
        pages.push(history_page(data.history_groups(), layout));
    }

    for section in PhotoSection::ALL {
        pages.extend(photo_pages(section, section.photos(data), layout));
    }

    pages.push(colleagues_page(&data.colleagues));
    pages.push(footer_page(generated_on));
    pages
}

/// HTML文書全体を組版
pub fn compose(data: &MemoryBookData, layout: &BookLayout, generated_on: NaiveDate) -> String {
    render_document(&compose_pages(data, layout, generated_on))
}

/// ページ列をHTML文書に包む
pub fn render_document(pages: &[BookPage]) -> String {
    let body: String = pages.iter().map(|p| p.html.as_str()).collect();
    format!(
        r#"<!DOCTYPE html>
<html dir="rtl" lang="ar">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = BOOK_TITLE,
        css = stylesheet(),
        body = body,
    )
}

// ============================================
// 各ページ
// ============================================

fn cover_page(generated_on: NaiveDate) -> BookPage {
    let highlights: String = COVER_HIGHLIGHTS.iter().map(|h| format!("<p>{}</p>", h)).collect();
    let html = format!(
        r#"<div class="page cover-page">
<h1 class="cover-title">📚 {title}</h1>
<p class="cover-subtitle">{subtitle}</p>
<div class="cover-highlights">{highlights}</div>
<p class="cover-date">تاريخ الإنشاء: {date}</p>
</div>
"#,
        title = BOOK_TITLE,
        subtitle = COVER_SUBTITLE,
        highlights = highlights,
        date = format_arabic_date(generated_on),
    );
    BookPage { kind: PageKind::Cover, title: BOOK_TITLE.to_string(), html }
}

fn statistics_page(data: &MemoryBookData) -> BookPage {
    let stats = data.stats();
    let title = "📊 إحصائيات الكتاب";
    let html = format!(
        r#"<div class="page">
<h2 class="section-title">{title}</h2>
<div class="stats-grid">
<div class="stat-card photos"><div class="stat-icon">📸</div><div class="stat-number">{photos}</div><div class="stat-label">صورة</div></div>
<div class="stat-card colleagues"><div class="stat-icon">👥</div><div class="stat-number">{colleagues}</div><div class="stat-label">زميل</div></div>
<div class="stat-card events"><div class="stat-icon">🎓</div><div class="stat-number">{events}</div><div class="stat-label">فعالية</div></div>
</div>
<div class="grand-total">
<h3>🎯 المجموع الكلي</h3>
<p class="grand-total-number">{total} عنصر</p>
<p>من الذكريات واللحظات المميزة</p>
</div>
</div>
"#,
        title = title,
        photos = stats.total_photos,
        colleagues = stats.total_colleagues,
        events = stats.total_events,
        total = stats.grand_total(),
    );
    BookPage { kind: PageKind::Statistics, title: title.to_string(), html }
}

fn graduation_page(data: &MemoryBookData) -> BookPage {
    let title = "حفلة التخرج";
    let events: String = data
        .graduation
        .events
        .iter()
        .enumerate()
        .map(|(index, event)| event_card(index + 1, event))
        .collect();
    let html = format!(
        r#"<div class="page section-page">
<h2 class="section-title">{title}</h2>
<p class="section-lead">{lead}</p>
{events}</div>
"#,
        title = title,
        lead = escape_html(&data.graduation.title),
        events = events,
    );
    BookPage { kind: PageKind::Graduation, title: title.to_string(), html }
}

fn event_card(number: usize, event: &GraduationEvent) -> String {
    format!(
        r#"<div class="event-card">
<h3 class="event-title">{number}. {title}</h3>
<div class="event-details">
<div><strong>التاريخ:</strong> {date}</div>
<div><strong>الوقت:</strong> {time}</div>
<div><strong>المكان:</strong> {location}</div>
</div>
<p class="event-description">{description}</p>
</div>
"#,
        number = number,
        title = escape_html(&event.title),
        date = escape_html(&event.date),
        time = escape_html(&event.time),
        location = escape_html(&event.location),
        description = escape_html(&event.description),
    )
}

fn history_page(groups: &[HistoryGroup], layout: &BookLayout) -> BookPage {
    let title = "المسيرة التاريخية";
    let body: String = groups.iter().map(|g| history_group(g, layout)).collect();
    let html = format!(
        r#"<div class="page section-page">
<h2 class="section-title">{title}</h2>
{body}</div>
"#,
        title = title,
        body = body,
    );
    BookPage { kind: PageKind::HistoryGroups, title: title.to_string(), html }
}

fn history_group(group: &HistoryGroup, layout: &BookLayout) -> String {
    let description = group
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(r#"<p class="photo-description">{}</p>"#, escape_html(d)))
        .unwrap_or_default();

    // 先頭 history_images_per_group 枚のみ収録
    let rows: String = group
        .images
        .iter()
        .take(layout.history_images_per_group)
        .map(|img| {
            // 空のキャプションは無いものとして扱う
            let alt = img
                .caption
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(&group.title);
            image_row(&img.src, alt, None, false)
        })
        .collect();

    format!(
        r#"<div class="history-group photo-card">
<h3 class="photo-title">{title}</h3>
{description}<div class="images-grid">
{rows}</div>
</div>
"#,
        title = escape_html(&group.title),
        description = description,
        rows = rows,
    )
}

fn photo_pages(section: PhotoSection, photos: &[Photo], layout: &BookLayout) -> Vec<BookPage> {
    let total_pages = layout.pages_for(photos.len());

    photos
        .chunks(layout.photos_per_page.max(1))
        .enumerate()
        .map(|(index, chunk)| {
            let title = if total_pages > 1 {
                format!("{} - الصفحة {}", section.title(), index + 1)
            } else {
                section.title().to_string()
            };
            let rows: String = chunk
                .iter()
                .map(|p| image_row(&p.image, &p.title, Some(&p.category), p.is_featured))
                .collect();
            let html = format!(
                r#"<div class="page section-page">
<h2 class="section-title">{title}</h2>
<div class="images-grid">
{rows}</div>
</div>
"#,
                title = title,
                rows = rows,
            );
            BookPage { kind: PageKind::Photos(section), title, html }
        })
        .collect()
}

fn image_row(src: &str, alt: &str, category: Option<&str>, featured: bool) -> String {
    let class = if featured { "image-row featured" } else { "image-row" };
    let category_attr = category
        .map(|c| format!(r#" data-category="{}""#, escape_html(c)))
        .unwrap_or_default();
    format!(
        r#"<div class="{class}"{category_attr}>
<div class="image-container"><img src="{src}" alt="{alt}" /></div>
</div>
"#,
        class = class,
        category_attr = category_attr,
        src = escape_html(src),
        alt = escape_html(alt),
    )
}

fn colleagues_page(colleagues: &[Colleague]) -> BookPage {
    let title = "الزملاء";
    let cards: String = colleagues.iter().map(colleague_card).collect();
    let html = format!(
        r#"<div class="page section-page">
<h2 class="section-title">{title}</h2>
{cards}</div>
"#,
        title = title,
        cards = cards,
    );
    BookPage { kind: PageKind::Colleagues, title: title.to_string(), html }
}

fn colleague_card(colleague: &Colleague) -> String {
    let bio = if colleague.bio.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="colleague-bio">{}</p>"#, escape_html(&colleague.bio))
    };
    let image = if colleague.profile_image.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img src="{}" alt="{}" class="profile-image" />"#,
            escape_html(&colleague.profile_image),
            escape_html(&colleague.name),
        )
    };
    format!(
        r#"<div class="colleague-card">
<h3 class="colleague-name">{name}</h3>
<div class="colleague-info">
<div><strong>سنة التخرج:</strong> {year}</div>
<div><strong>الوظيفة الحالية:</strong> {job}</div>
<div><strong>البريد الإلكتروني:</strong> {email}</div>
<div><strong>الهاتف:</strong> {phone}</div>
</div>
{bio}{image}</div>
"#,
        name = escape_html(&colleague.name),
        year = escape_html(&colleague.graduation_year),
        job = escape_html(&colleague.current_job),
        email = escape_html(&colleague.email),
        phone = escape_html(&colleague.phone),
        bio = bio,
        image = image,
    )
}

fn footer_page(generated_on: NaiveDate) -> BookPage {
    let title = "نهاية الكتاب";
    let html = format!(
        r#"<div class="page">
<div class="footer">
<h2 class="footer-title">{title}</h2>
<p class="footer-note">تم إنشاء هذا الكتاب تلقائياً من نظام الذكريات الجامعية</p>
<p>جميع الحقوق محفوظة © {year}</p>
</div>
</div>
"#,
        title = title,
        year = generated_on.year(),
    );
    BookPage { kind: PageKind::Footer, title: title.to_string(), html }
}

// ============================================
// テキストユーティリティ
// ============================================

/// HTML特殊文字をエスケープ
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 西洋数字をアラビア・インド数字に置換
pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|ch| match ch.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(ch),
            None => ch,
        })
        .collect()
}

/// 表紙の日付表記: "18/10/2026" → "١٨/١٠/٢٠٢٦"
pub fn format_arabic_date(date: NaiveDate) -> String {
    to_arabic_digits(&date.format("%d/%m/%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Graduation, HistoryImage};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 18).unwrap()
    }

    fn photo(id: u64, category: &str) -> Photo {
        Photo {
            id,
            title: format!("صورة {}", id),
            image: format!("http://example.com/{}.jpg", id),
            category: category.to_string(),
            ..Default::default()
        }
    }

    fn sample_data() -> MemoryBookData {
        MemoryBookData {
            graduation: Graduation {
                title: "حفلة التخرج".to_string(),
                events: vec![GraduationEvent {
                    title: "حفل التخرج الرئيسي".to_string(),
                    date: "15 يونيو 2024".to_string(),
                    time: "10:00 صباحاً".to_string(),
                    location: "القاعة الكبرى".to_string(),
                    description: "حفل التخرج السنوي".to_string(),
                }],
            },
            memories: (1..=9).map(|i| photo(i, "حفل")).collect(),
            meetings: (10..=11).map(|i| photo(i, "لقاء")).collect(),
            historical: vec![],
            colleagues: vec![Colleague {
                id: 1,
                name: "أحمد".to_string(),
                graduation_year: "2024".to_string(),
                ..Default::default()
            }],
            history_groups: None,
        }
    }

    fn count_pages(pages: &[BookPage], section: PhotoSection) -> usize {
        pages.iter().filter(|p| p.kind == PageKind::Photos(section)).count()
    }

    #[test]
    fn test_page_sequence() {
        let pages = compose_pages(&sample_data(), &BookLayout::default(), date());
        assert_eq!(pages.first().map(|p| p.kind), Some(PageKind::Cover));
        assert_eq!(pages[1].kind, PageKind::Statistics);
        assert_eq!(pages[2].kind, PageKind::Graduation);
        assert_eq!(pages[pages.len() - 2].kind, PageKind::Colleagues);
        assert_eq!(pages.last().map(|p| p.kind), Some(PageKind::Footer));
        // 固定5ページ + 思い出3 + 集まり1
        assert_eq!(pages.len(), 5 + 3 + 1);
    }

    #[test]
    fn test_photo_pages_split_by_four() {
        let pages = compose_pages(&sample_data(), &BookLayout::default(), date());
        let memory_counts: Vec<usize> = pages
            .iter()
            .filter(|p| p.kind == PageKind::Photos(PhotoSection::Memories))
            .map(|p| p.image_count())
            .collect();
        assert_eq!(memory_counts, vec![4, 4, 1]);
        assert_eq!(count_pages(&pages, PhotoSection::Meetings), 1);
        assert_eq!(count_pages(&pages, PhotoSection::Historical), 0);
    }

    #[test]
    fn test_page_suffix_only_when_paginated() {
        let pages = compose_pages(&sample_data(), &BookLayout::default(), date());
        let memory_titles: Vec<&str> = pages
            .iter()
            .filter(|p| p.kind == PageKind::Photos(PhotoSection::Memories))
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(memory_titles[0], "الصور التذكارية - الصفحة 1");
        assert_eq!(memory_titles[2], "الصور التذكارية - الصفحة 3");

        let meeting = pages
            .iter()
            .find(|p| p.kind == PageKind::Photos(PhotoSection::Meetings))
            .expect("集まりページがない");
        assert_eq!(meeting.title, "صور اللقاءات");
    }

    #[test]
    fn test_photo_pages_render_images_only() {
        let pages = compose_pages(&sample_data(), &BookLayout::default(), date());
        let page = pages
            .iter()
            .find(|p| p.kind == PageKind::Photos(PhotoSection::Memories))
            .unwrap();
        assert!(page.html.contains(r#"alt="صورة 1""#));
        assert!(!page.html.contains("photo-title"));
        assert!(!page.html.contains("photo-description"));
    }

    #[test]
    fn test_custom_photos_per_page() {
        let layout = BookLayout::new(2, 4).unwrap();
        let pages = compose_pages(&sample_data(), &layout, date());
        assert_eq!(count_pages(&pages, PhotoSection::Memories), 5);
    }

    #[test]
    fn test_history_group_truncated() {
        let mut data = sample_data();
        data.history_groups = Some(vec![HistoryGroup {
            title: "الجامعة في فترة تأسيسها".to_string(),
            description: Some("صور نادرة".to_string()),
            images: (1..=10)
                .map(|i| HistoryImage { src: format!("/assets/image-{}.jpg", i), caption: None })
                .collect(),
        }]);

        let pages = compose_pages(&data, &BookLayout::default(), date());
        let history = pages
            .iter()
            .find(|p| p.kind == PageKind::HistoryGroups)
            .expect("歴史ページがない");
        assert_eq!(history.image_count(), 4);
        assert!(history.html.contains("image-4.jpg"));
        assert!(!history.html.contains("image-5.jpg"));
        // キャプションなし → グループタイトルを代替テキストに
        assert!(history.html.contains(r#"alt="الجامعة في فترة تأسيسها""#));
    }

    #[test]
    fn test_history_empty_caption_uses_group_title() {
        let mut data = sample_data();
        data.history_groups = Some(vec![HistoryGroup {
            title: "المكتبة".to_string(),
            description: None,
            images: vec![
                HistoryImage { src: "/assets/a.jpg".to_string(), caption: Some(String::new()) },
                HistoryImage { src: "/assets/b.jpg".to_string(), caption: Some("القاعة".to_string()) },
            ],
        }]);

        let html = compose(&data, &BookLayout::default(), date());
        assert!(html.contains(r#"<img src="/assets/a.jpg" alt="المكتبة" />"#));
        assert!(html.contains(r#"<img src="/assets/b.jpg" alt="القاعة" />"#));
        assert!(!html.contains(r#"alt="""#));
    }

    #[test]
    fn test_history_section_omitted_when_empty() {
        let mut data = sample_data();
        data.history_groups = Some(vec![]);
        let pages = compose_pages(&data, &BookLayout::default(), date());
        assert!(pages.iter().all(|p| p.kind != PageKind::HistoryGroups));
    }

    #[test]
    fn test_category_and_featured_marking() {
        let mut data = sample_data();
        data.memories = vec![photo(1, "حفل")];
        data.memories[0].is_featured = true;

        let html = compose(&data, &BookLayout::default(), date());
        assert!(html.contains(r#"data-category="حفل""#));
        assert!(html.contains(r#"class="image-row featured""#));
    }

    #[test]
    fn test_document_shell() {
        let html = compose(&sample_data(), &BookLayout::default(), date());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html dir="rtl" lang="ar">"#));
        assert!(html.contains("تاريخ الإنشاء: ١٨/٠١/٢٠٢٦"));
        assert!(html.contains("© 2026"));
    }

    #[test]
    fn test_statistics_values() {
        let pages = compose_pages(&sample_data(), &BookLayout::default(), date());
        let stats = &pages[1].html;
        assert!(stats.contains(r#"<div class="stat-number">11</div>"#));
        assert!(stats.contains(r#"<div class="stat-number">1</div>"#));
        assert!(stats.contains("13 عنصر"));
    }

    #[test]
    fn test_colleague_optional_fields() {
        let mut data = sample_data();
        data.colleagues.push(Colleague {
            id: 2,
            name: "سارة".to_string(),
            bio: "مهندسة".to_string(),
            profile_image: "http://example.com/p.jpg".to_string(),
            ..Default::default()
        });

        let pages = compose_pages(&data, &BookLayout::default(), date());
        let page = pages.iter().find(|p| p.kind == PageKind::Colleagues).unwrap();
        assert_eq!(page.image_count(), 1);
        assert_eq!(page.html.matches("colleague-bio").count(), 1);
        assert!(page.html.contains(r#"class="profile-image""#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"a" & 'b'</b>"#), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");

        let mut data = sample_data();
        data.colleagues[0].name = "<script>".to_string();
        let html = compose(&data, &BookLayout::default(), date());
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_arabic_digits() {
        assert_eq!(to_arabic_digits("2024-06"), "٢٠٢٤-٠٦");
        assert_eq!(format_arabic_date(date()), "١٨/٠١/٢٠٢٦");
    }

    #[test]
    fn test_compose_is_deterministic() {
        let data = sample_data();
        let a = compose(&data, &BookLayout::default(), date());
        let b = compose(&data, &BookLayout::default(), date());
        assert_eq!(a, b);
    }
}
