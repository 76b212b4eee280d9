//! Card records, the source trait the dispatcher is wired with, and the pure
//! selections the commands run over a fetched snapshot.

pub mod cubecobra;
pub mod normalize;
pub mod sheets;

use crate::config::SourceSettings;
use crate::constants::OWNED_STATUS;
use crate::error::FetchError;
use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;

/// One catalog entry, rebuilt from a live fetch on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    pub mana_value: u32,
    pub name: String,
    /// Free-form card type line.
    pub category: String,
    /// Display color string; multi-color entries are already joined.
    pub attribute: String,
    /// Set name.
    pub collection: String,
    /// Ownership status; empty means "no status", which is not the same as "owned".
    pub status: String,
}

/// Where card data comes from. Constructed once at startup and injected into
/// the dispatcher.
#[async_trait]
pub trait CardSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<CardRecord>, FetchError>;

    /// Public page for the catalog, if the source has one.
    fn overview_url(&self) -> Option<String> {
        None
    }
}

/// Stand-in used when no card source is configured; every fetch reports
/// the missing variable.
pub struct Unconfigured(pub &'static str);

#[async_trait]
impl CardSource for Unconfigured {
    async fn fetch_records(&self) -> Result<Vec<CardRecord>, FetchError> {
        Err(FetchError::NotConfigured(self.0))
    }
}

/// Build the configured source. The HTTP client is shared by every fetch.
pub fn from_settings(http: reqwest::Client, settings: &SourceSettings) -> Arc<dyn CardSource> {
    match settings {
        SourceSettings::Sheets(sheets) => Arc::new(sheets::SheetsSource::new(http, sheets.clone())),
        SourceSettings::CubeCobra { cube_id } => {
            Arc::new(cubecobra::CubeCobraSource::new(http, cube_id.clone()))
        }
        SourceSettings::Unconfigured(var) => Arc::new(Unconfigured(*var)),
    }
}

/// Cards still to acquire: anything whose status is not "owned" in any case.
pub fn buylist(cards: &[CardRecord]) -> Vec<CardRecord> {
    cards
        .iter()
        .filter(|c| c.status.to_lowercase() != OWNED_STATUS)
        .cloned()
        .collect()
}

/// Exact, case-insensitive name match.
pub fn find_by_name<'a>(cards: &'a [CardRecord], name: &str) -> Option<&'a CardRecord> {
    let wanted = name.to_lowercase();
    cards.iter().find(|c| c.name.to_lowercase() == wanted)
}

/// Draw `count` distinct records uniformly at random (all of them when fewer
/// exist), in random order. Partial Fisher-Yates over the snapshot.
pub fn sample_pack<R: Rng + ?Sized>(
    mut cards: Vec<CardRecord>,
    count: usize,
    rng: &mut R,
) -> Vec<CardRecord> {
    let take = count.min(cards.len());
    let (picked, _) = cards.partial_shuffle(rng, take);
    picked.to_vec()
}

#[cfg(test)]
pub(crate) fn card(name: &str, status: &str) -> CardRecord {
    CardRecord {
        mana_value: 1,
        name: name.to_string(),
        category: "Instant".to_string(),
        attribute: "Red".to_string(),
        collection: "Alpha".to_string(),
        status: status.to_string(),
    }
}
