//! データ集約モジュール
//!
//! 5つのエンドポイントを並列に取得し、カテゴリIDを表示名に解決して
//! `MemoryBookData` にまとめる。1つでも失敗したら全体を失敗とする。

pub mod source;
pub mod types;

pub use source::{build_api_url, Endpoint, HttpSource, JsonSource};
pub use types::{CategoryRecord, ColleagueRecord, PhotoRecord, StaticContent};

use crate::error::{MemoryBookError, Result};
use log::{debug, info};
use memory_book_common::{Colleague, MemoryBookData, Photo};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// 未登録カテゴリの表示名
pub const UNSPECIFIED_CATEGORY: &str = "غير محدد";

pub struct Aggregator<S> {
    source: S,
    static_content: StaticContent,
}

impl<S: JsonSource> Aggregator<S> {
    pub fn new(source: S, static_content: StaticContent) -> Self {
        Self { source, static_content }
    }

    /// 全データを取得して集約
    pub async fn fetch_all(&self) -> Result<MemoryBookData> {
        let (memory_categories, memory_photos, meeting_categories, meeting_photos, colleagues) = tokio::try_join!(
            self.fetch_records::<CategoryRecord>(Endpoint::MemoryCategories),
            self.fetch_records::<PhotoRecord>(Endpoint::MemoryPhotos),
            self.fetch_records::<CategoryRecord>(Endpoint::MeetingCategories),
            self.fetch_records::<PhotoRecord>(Endpoint::MeetingPhotos),
            self.fetch_records::<ColleagueRecord>(Endpoint::Colleagues),
        )?;

        // カテゴリ検索マップ
        let memory_map = category_map(&memory_categories);
        let meeting_map = category_map(&meeting_categories);

        let data = MemoryBookData {
            graduation: self.static_content.graduation.clone(),
            memories: resolve_photos(memory_photos, &memory_map),
            meetings: resolve_photos(meeting_photos, &meeting_map),
            historical: self.static_content.historical.clone(),
            colleagues: colleagues.into_iter().map(to_colleague).collect(),
            history_groups: self.static_content.history_groups.clone(),
        };

        info!(
            "集約完了: 思い出{}件, 集まり{}件, 歴史{}件, 同期{}名",
            data.memories.len(),
            data.meetings.len(),
            data.historical.len(),
            data.colleagues.len()
        );

        Ok(data)
    }

    async fn fetch_records<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Vec<T>> {
        let value = self.source.fetch(endpoint).await?;
        let records = parse_records(endpoint, value)?;
        debug!("{}: {}件", endpoint.path(), records.len());
        Ok(records)
    }
}

/// レスポンスをレコード配列に変換
///
/// 配列そのもの、またはページネーション形式（`{"results": [...]}`）を受け付ける。
pub fn parse_records<T: DeserializeOwned>(endpoint: Endpoint, value: Value) -> Result<Vec<T>> {
    let array = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("results") {
            Some(results @ Value::Array(_)) => results,
            _ => {
                return Err(MemoryBookError::Aggregation(format!(
                    "{}: 配列ではないレスポンス",
                    endpoint.path()
                )))
            }
        },
        _ => {
            return Err(MemoryBookError::Aggregation(format!(
                "{}: 配列ではないレスポンス",
                endpoint.path()
            )))
        }
    };

    serde_json::from_value(array)
        .map_err(|e| MemoryBookError::Aggregation(format!("{}: {}", endpoint.path(), e)))
}

/// id → 表示名 のマップを構築
pub fn category_map(categories: &[CategoryRecord]) -> HashMap<u64, String> {
    categories
        .iter()
        .filter_map(|c| c.id.map(|id| (id, c.name.clone())))
        .collect()
}

/// カテゴリ名を解決して写真に変換（順序はレスポンス順）
pub fn resolve_photos(records: Vec<PhotoRecord>, categories: &HashMap<u64, String>) -> Vec<Photo> {
    records
        .into_iter()
        .map(|record| {
            let category = record
                .category
                .and_then(|id| categories.get(&id))
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| UNSPECIFIED_CATEGORY.to_string());

            Photo {
                id: record.id.unwrap_or_default(),
                title: record.title_ar,
                description: record.description_ar,
                image: record.image,
                category,
                is_featured: record.is_featured,
                created_at: record.created_at,
            }
        })
        .collect()
}

fn to_colleague(record: ColleagueRecord) -> Colleague {
    Colleague {
        id: record.id.unwrap_or_default(),
        name: record.name,
        email: record.email,
        phone: record.phone,
        graduation_year: record.graduation_year,
        current_job: record.current_job,
        bio: record.bio,
        profile_image: record.profile_image,
    }
}
