use crate::error::{MemoryBookError, Result};
use memory_book_common::{Graduation, GraduationEvent, HistoryGroup, Photo};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// カテゴリ（思い出・集まり共通）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// APIの写真レコード
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub title_ar: String,         // タイトル

    #[serde(default, deserialize_with = "lenient_string")]
    pub description_ar: String,   // 説明

    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,            // 画像URL

    #[serde(default, deserialize_with = "lenient_id")]
    pub category: Option<u64>,    // カテゴリID

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

/// APIの同期レコード
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColleagueRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub graduation_year: String,  // 数値で返るAPIもある

    #[serde(default, deserialize_with = "lenient_string")]
    pub current_job: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_image: String,
}

/// APIから取得しない静的コンテンツ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticContent {
    pub graduation: Graduation,
    pub historical: Vec<Photo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_groups: Option<Vec<HistoryGroup>>,
}

impl Default for StaticContent {
    fn default() -> Self {
        Self {
            graduation: default_graduation(),
            historical: Vec::new(),
            history_groups: None,
        }
    }
}

impl StaticContent {
    /// JSONファイルから読み込み（省略項目は既定値）
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MemoryBookError::Config(format!(
                "静的コンテンツファイルが見つかりません: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// 既定の卒業行事
pub fn default_graduation() -> Graduation {
    let event = |title: &str, date: &str, time: &str, location: &str, description: &str| {
        GraduationEvent {
            title: title.into(),
            date: date.into(),
            time: time.into(),
            location: location.into(),
            description: description.into(),
        }
    };

    Graduation {
        title: "حفلة التخرج".into(),
        events: vec![
            event(
                "حفل التخرج الرئيسي",
                "15 يونيو 2024",
                "10:00 صباحاً",
                "القاعة الكبرى - الحرم الجامعي",
                "حفل التخرج السنوي مع توزيع الشهادات وإلقاء كلمات التخرج",
            ),
            event(
                "حفل الوداع",
                "14 يونيو 2024",
                "7:00 مساءً",
                "حديقة الجامعة",
                "أمسية وداعية مع الزملاء وأعضاء هيئة التدريس",
            ),
            event(
                "التصوير التذكاري",
                "13 يونيو 2024",
                "2:00 ظهراً",
                "أمام المبنى الإداري",
                "جلسة تصوير جماعية للدفعة الخريجة",
            ),
        ],
    }
}

// =============================================
// 寛容なデシリアライズ（null・数値・文字列の混在）
// =============================================

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
