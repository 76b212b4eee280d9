//! CubeCobra card source.

use super::normalize::{RawPayload, normalize};
use super::{CardRecord, CardSource};
use crate::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

pub const CUBECOBRA_BASE_URL: &str = "https://cubecobra.com";

pub struct CubeCobraSource {
    http: reqwest::Client,
    cube_id: String,
}

impl CubeCobraSource {
    pub fn new(http: reqwest::Client, cube_id: impl Into<String>) -> Self {
        Self {
            http,
            cube_id: cube_id.into(),
        }
    }

    pub fn cube_json_url(&self) -> String {
        format!("{CUBECOBRA_BASE_URL}/cube/api/cubeJSON/{}", self.cube_id)
    }
}

#[async_trait]
impl CardSource for CubeCobraSource {
    #[instrument(level = "debug", skip(self), fields(cube = %self.cube_id))]
    async fn fetch_records(&self) -> Result<Vec<CardRecord>, FetchError> {
        let response = self.http.get(self.cube_json_url()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let json: Value = response.json().await?;
        let cards = normalize(RawPayload::Catalog(json));
        debug!(target = "source.cubecobra", cards = cards.len(), "fetched cube");
        Ok(cards)
    }

    fn overview_url(&self) -> Option<String> {
        Some(format!("{CUBECOBRA_BASE_URL}/cube/overview/{}", self.cube_id))
    }
}
