use crate::errors::FetchError;
use crate::models::Surah;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.alquran.cloud/v1";
pub const EDITION: &str = "quran-uthmani";

/// Anything that can produce the full text of a surah.
#[async_trait]
pub trait SurahSource: Send + Sync {
    async fn fetch_surah(&self, number: u16) -> Result<Surah, FetchError>;
}

#[derive(Clone)]
pub struct AlQuranClient {
    client: Client,
    base_url: String,
}

impl AlQuranClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn surah_url(&self, number: u16) -> String {
        format!(
            "{}/surah/{number}/{EDITION}",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct SurahEnvelope {
    data: Surah,
}

#[async_trait]
impl SurahSource for AlQuranClient {
    async fn fetch_surah(&self, number: u16) -> Result<Surah, FetchError> {
        let url = self.surah_url(number);
        debug!(%url, "fetching surah");

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|err| FetchError::Transport {
                    surah: number,
                    message: err.to_string(),
                })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                surah: number,
                status: response.status().as_u16(),
            });
        }

        let body: SurahEnvelope = response.json().await.map_err(|err| FetchError::Body {
            surah: number,
            message: err.to_string(),
        })?;
        Ok(body.data)
    }
}

/// Session-lifetime memo of fetched surahs. Only successes are kept, so a
/// failed surah is fetched again the next time it is asked for.
pub struct SurahCache {
    source: Arc<dyn SurahSource>,
    surahs: Mutex<HashMap<u16, Arc<Surah>>>,
}

impl SurahCache {
    pub fn new(source: Arc<dyn SurahSource>) -> Self {
        Self {
            source,
            surahs: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, number: u16) -> Result<Arc<Surah>, FetchError> {
        {
            let surahs = self.surahs.lock().await;
            if let Some(surah) = surahs.get(&number) {
                debug!(surah = number, "surah cache hit");
                return Ok(Arc::clone(surah));
            }
        }

        let fetched = Arc::new(self.source.fetch_surah(number).await?);
        let mut surahs = self.surahs.lock().await;
        let surah = surahs.entry(number).or_insert(fetched);
        Ok(Arc::clone(surah))
    }

    pub async fn len(&self) -> usize {
        self.surahs.lock().await.len()
    }
}
