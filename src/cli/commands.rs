use crate::app::{AppContext, Result};
use crate::config::Settings;
use crate::pipeline::RunStats;
use crate::store::SaveOutcome;

/// One polling pass: load state, process every feed, merge with the latest
/// stored state and persist it once.
///
/// A state store failure on load aborts before anything is sent; on save it
/// is returned after delivery already happened.
pub async fn run(ctx: &AppContext, settings: &Settings) -> Result<RunStats> {
    let feeds = settings.feed_list()?;
    if feeds.is_empty() {
        tracing::warn!("No feeds configured");
    }

    let rules = settings.keyword_rules();
    tracing::info!(
        feeds = feeds.len(),
        include = rules.include().len(),
        exclude = rules.exclude().len(),
        "Starting run"
    );

    let mut seen = ctx.store.load().await?;
    let mut pipeline = ctx.pipeline(settings);
    let stats = pipeline.run(&feeds, &mut seen).await;

    // Keep whatever another run persisted meanwhile.
    seen.merge(ctx.store.load().await?);

    match ctx.store.save(&seen).await? {
        SaveOutcome::Created { id } => {
            tracing::warn!(gist = %id, "Created a new state gist; set GIST_ID to reuse it");
            println!("New state gist created: GIST_ID={}", id);
        }
        SaveOutcome::Updated => {}
    }

    Ok(stats)
}

pub fn list_feeds(settings: &Settings) -> Result<()> {
    let feeds = settings.feed_list()?;

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in feeds {
        println!("{}", feed);
    }

    Ok(())
}
