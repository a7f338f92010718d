//! Process-wide advisor handle
//!
//! Building an advisor means loading the index bundle from disk and setting
//! up provider clients, so serving processes do it once and reuse the result
//! for every question. `reset` tears the cached advisor down; the next
//! `get_or_init` rebuilds it, which is the hook for configuration changes.

use crate::api::advisor::Advisor;
use crate::config::Config;
use crate::error::Result;
use lazy_static::lazy_static;
use std::sync::Arc;
use tokio::sync::Mutex;

lazy_static! {
    static ref CACHED_ADVISOR: Mutex<Option<Arc<Advisor>>> = Mutex::new(None);
}

/// Return the cached advisor, building it on first use.
pub async fn get_or_init(config: &Config) -> Result<Arc<Advisor>> {
    let mut guard = CACHED_ADVISOR.lock().await;

    if let Some(advisor) = guard.as_ref() {
        return Ok(advisor.clone());
    }

    log::info!("Building advisor pipeline (index + provider clients)");
    let advisor = Arc::new(Advisor::from_config(config)?);
    *guard = Some(advisor.clone());
    Ok(advisor)
}

/// Drop the cached advisor so the next `get_or_init` rebuilds it.
pub async fn reset() {
    let mut guard = CACHED_ADVISOR.lock().await;
    if guard.take().is_some() {
        log::info!("Advisor pipeline cache cleared");
    }
}
