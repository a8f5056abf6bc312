//! JSONデータソース
//!
//! REST APIの5エンドポイントを `JsonSource` で抽象化する。
//! 本番は `HttpSource`（reqwest）、テストはメモリ上のスタブを使う。

use crate::error::{MemoryBookError, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

/// 取得対象のエンドポイント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    MemoryCategories,
    MemoryPhotos,
    MeetingCategories,
    MeetingPhotos,
    Colleagues,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::MemoryCategories,
        Endpoint::MemoryPhotos,
        Endpoint::MeetingCategories,
        Endpoint::MeetingPhotos,
        Endpoint::Colleagues,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::MemoryCategories => "memory-categories/",
            Endpoint::MemoryPhotos => "memory-photos/",
            Endpoint::MeetingCategories => "meeting-categories/",
            Endpoint::MeetingPhotos => "meeting-photos/",
            Endpoint::Colleagues => "colleagues/",
        }
    }
}

#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value>;
}

/// ベースURLとエンドポイントをスラッシュ1つで連結
pub fn build_api_url(base: &str, endpoint: &str) -> String {
    let clean_endpoint = endpoint.trim_start_matches('/');
    let clean_base = base.trim_end_matches('/');
    format!("{}/{}", clean_base, clean_endpoint)
}

/// REST APIから取得するソース
pub struct HttpSource {
    client: reqwest::Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MemoryBookError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self { client, base: base.to_string() })
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        build_api_url(&self.base, endpoint.path())
    }
}

#[async_trait]
impl JsonSource for HttpSource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value> {
        let url = self.url_for(endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MemoryBookError::Aggregation(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MemoryBookError::Aggregation(format!(
                "{}: HTTP {}",
                url,
                status.as_u16()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| MemoryBookError::Aggregation(format!("{}: JSONが不正です ({})", url, e)))
    }
}
