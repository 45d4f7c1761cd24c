//! The `save-fits` command: recompute splits and upload each as a saved
//! fitting.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use indicatif::ProgressBar;
use tracing::warn;

use cargohold_core::MAX_ENTRIES_PER_SPLIT;
use cargohold_esi::fittings::UPLOAD_PACING;
use cargohold_esi::{EsiConfig, Fitting, FittingsClient, SsoAuth, ITERON_MARK_V_TYPE_ID};

use crate::commands::split::compute_outcome;
use crate::error::AppResult;
use crate::prefs::Preferences;
use crate::render;

/// Runs the save-fits command.
pub async fn run(
    input: Option<PathBuf>,
    max_value: Option<f64>,
    max_volume: Option<f64>,
    ship_type: Option<i64>,
) -> AppResult<()> {
    let mut prefs = Preferences::load_or_default();
    let ship_type_id = ship_type
        .or(prefs.ship_type_id)
        .unwrap_or(ITERON_MARK_V_TYPE_ID);
    if ship_type.is_some() {
        prefs.ship_type_id = ship_type;
        prefs.save()?;
    }

    let outcome = compute_outcome(input, max_value, max_volume).await?;
    render::print_unplaced(&outcome.unplaced);

    let config = EsiConfig::load_or_default(None);
    let auth = Arc::new(SsoAuth::new(config.clone()));
    let client = FittingsClient::new(config, auth);

    let total = outcome.splits.len();
    let progress = ProgressBar::new(total as u64);
    let mut saved_fits = Vec::new();

    for (index, split) in outcome.splits.iter().enumerate() {
        if split.entry_count() > MAX_ENTRIES_PER_SPLIT {
            warn!(
                split = index + 1,
                entries = split.entry_count(),
                "Skipping split, exceeds the fitting item limit"
            );
            progress.inc(1);
            continue;
        }

        let fitting = Fitting::from_split(index, split, ship_type_id);
        match client.save_fitting(&fitting).await {
            Ok(fitting_id) => saved_fits.push(fitting_id),
            Err(e) => {
                progress.suspend(|| {
                    eprintln!(
                        "{} saving split {}: {e}",
                        style("Error").red().bold(),
                        index + 1
                    );
                });
            }
        }

        progress.inc(1);

        // Stay friendly with the endpoint's rate limiting.
        if index + 1 < total {
            tokio::time::sleep(UPLOAD_PACING).await;
        }
    }

    progress.finish_and_clear();

    if saved_fits.is_empty() {
        println!("No fits were saved. Please check the errors and try again.");
    } else {
        println!(
            "{} {} fits",
            style("Saved").green().bold(),
            saved_fits.len()
        );
        prefs.saved_fits = saved_fits;
        prefs.save()?;
    }

    Ok(())
}
