use anyhow::Context;
use gob_config::DashboardConfig;
use gob_core::enums::Collection;
use gob_store::AppContext;
use tokio::task::JoinSet;

use crate::api::ApiClient;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SyncArgs;
use crate::commands::summarize;
use crate::output::output;

/// Handle `gob sync`.
pub async fn handle(
    args: &SyncArgs,
    ctx: &mut AppContext,
    config: &DashboardConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api).context("failed to build HTTP client")?;
    let collections = args
        .collection
        .map_or_else(|| Collection::ALL.to_vec(), |collection| vec![collection]);

    let mut fetches = JoinSet::new();
    for &collection in &collections {
        ctx.db.begin_list(collection);
        let client = client.clone();
        fetches.spawn(async move { (collection, client.list(collection).await) });
    }
    while let Some(joined) = fetches.join_next().await {
        let (collection, result) = joined.context("list fetch task failed")?;
        ctx.db.apply_list_value(collection, result);
    }

    output(&summarize(&ctx.db, &collections), flags.format)
}
