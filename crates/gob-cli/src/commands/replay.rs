use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Context;
use gob_core::enums::Collection;
use gob_core::events::RealtimeEvent;
use gob_store::AppContext;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReplayArgs;
use crate::commands::{CollectionSummary, summarize};
use crate::output::output;

#[derive(Debug, Default, Serialize)]
struct ReplaySummary {
    events: usize,
    unparsable: usize,
    collections: BTreeMap<Collection, CollectionSummary>,
}

/// Handle `gob replay`.
///
/// Events are applied as they are read; store ticks are interleaved so
/// debounced writes happen on time during a slow stream on stdin.
pub async fn handle(
    args: &ReplayArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let reader: Box<dyn AsyncBufRead + Unpin> = if args.input == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(&args.input)
            .await
            .with_context(|| format!("failed to open {}", args.input))?;
        Box::new(BufReader::new(file))
    };

    let summary = replay(reader, ctx).await?;
    output(&summary, flags.format)
}

async fn replay(
    reader: impl AsyncBufRead + Unpin,
    ctx: &mut AppContext,
) -> anyhow::Result<ReplaySummary> {
    let mut lines = reader.lines();
    let mut summary = ReplaySummary::default();

    loop {
        let deadline = ctx.next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read replay input")? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match RealtimeEvent::parse(line) {
                    Ok(event) => {
                        summary.events += 1;
                        ctx.db.apply_realtime_event(event);
                    }
                    Err(error) => {
                        summary.unparsable += 1;
                        tracing::warn!(%error, "skipping unparsable event line");
                    }
                }
            }
            () = sleep_until(deadline) => ctx.tick(),
        }
    }

    summary.collections = summarize(&ctx.db, &Collection::ALL);
    Ok(summary)
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
