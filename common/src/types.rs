//! メモリーブックのデータモデル
//!
//! 集約結果（`MemoryBookData`）はHTML組版の唯一の入力。
//! - GraduationEvent: 卒業行事（静的コンテンツ）
//! - Photo: 思い出・集まり・歴史写真（カテゴリ名は解決済み）
//! - Colleague: 同期名簿
//! - HistoryGroup: まとめて収録する歴史写真グループ

use serde::{Deserialize, Serialize};

/// 卒業行事
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraduationEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

/// 卒業セクション
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Graduation {
    pub title: String,
    pub events: Vec<GraduationEvent>,
}

/// 写真（思い出・集まり・歴史共通）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// 画像URL
    pub image: String,
    /// 解決済みカテゴリ名（IDではない）
    pub category: String,
    pub is_featured: bool,
    pub created_at: String,
}

/// 同期
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colleague {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub graduation_year: String,
    pub current_job: String,
    pub bio: String,
    /// プロフィール画像URL（空なら非表示）
    pub profile_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryImage {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// 歴史写真グループ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryGroup {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<HistoryImage>,
}

/// メモリーブック全体の入力データ
///
/// 生成1回ごとに作られ、PDF出力後に破棄される。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBookData {
    pub graduation: Graduation,
    pub memories: Vec<Photo>,
    pub meetings: Vec<Photo>,
    pub historical: Vec<Photo>,
    pub colleagues: Vec<Colleague>,
    #[serde(
        rename = "historyGroups",
        alias = "history_groups",
        skip_serializing_if = "Option::is_none"
    )]
    pub history_groups: Option<Vec<HistoryGroup>>,
}

impl MemoryBookData {
    /// 歴史グループ（未設定なら空スライス）
    pub fn history_groups(&self) -> &[HistoryGroup] {
        self.history_groups.as_deref().unwrap_or(&[])
    }

    pub fn stats(&self) -> BookStats {
        BookStats::from_data(self)
    }
}

/// 統計ページの集計値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookStats {
    /// 思い出 + 集まり + 歴史写真
    pub total_photos: usize,
    pub total_colleagues: usize,
    pub total_events: usize,
}

impl BookStats {
    pub fn from_data(data: &MemoryBookData) -> Self {
        Self {
            total_photos: data.memories.len() + data.meetings.len() + data.historical.len(),
            total_colleagues: data.colleagues.len(),
            total_events: data.graduation.events.len(),
        }
    }

    /// 総合計（5コレクションの件数合計）
    pub fn grand_total(&self) -> usize {
        self.total_photos + self.total_colleagues + self.total_events
    }
}
