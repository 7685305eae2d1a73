//! The shoppers offer-effectiveness analysis.
//!
//! [`run`] loads the three datasets named by a [`ShoppersConfig`], answers every
//! query in [`analysis`] and returns a printable [`ShoppersReport`].

pub mod analysis;
pub mod config;
pub mod loaders;
pub mod records;
pub mod report;

pub use analysis::{HistoryOffer, TopOffer};
pub use config::ShoppersConfig;
pub use records::{FromFields, HistoryRecord, OfferRecord, RecordError, RecordKind, TransactionRecord};
pub use report::ShoppersReport;

use crate::Pipeline;
use anyhow::{Context, Result};
use log::info;

/// Load the configured inputs and run every query.
///
/// # Errors
/// Returns an error if any input fails to load or any query fails.
pub fn run(cfg: &ShoppersConfig) -> Result<ShoppersReport> {
    let ctx = &cfg.exec;
    let p = Pipeline::default();

    let history = loaders::load::<HistoryRecord>(&p, &cfg.history).context("load history")?;
    let offers = loaders::load::<OfferRecord>(&p, &cfg.offers).context("load offers")?;
    let transactions =
        loaders::load::<TransactionRecord>(&p, &cfg.transactions).context("load transactions")?;

    let joined = analysis::join_history_offers(&history, &offers);
    let top_offers = analysis::top_offers(&joined, ctx, cfg.top_k)?;
    info!(
        "reporting max repeat trips for offers worth exactly {:?} dollars; the question is phrased for 5-dollar offers",
        cfg.offer_value
    );
    let max_repeattrips = analysis::max_repeattrips_for_offer_value(&joined, ctx, cfg.offer_value)?;
    let repeattrips_by_offer_value = analysis::max_repeattrips_by_offer_value(&joined, ctx)?;
    let avg_spend_per_trip = analysis::avg_spend_per_trip(&transactions, ctx)?;
    let avg_spend_in_offer_category =
        analysis::avg_spend_per_trip_in_offer_category(&transactions, &joined, ctx)?;

    info!(
        "shoppers run done: {} top offers, {} customers with trips",
        top_offers.len(),
        avg_spend_per_trip.len()
    );
    Ok(ShoppersReport {
        top_offers,
        offer_value: cfg.offer_value,
        max_repeattrips,
        repeattrips_by_offer_value,
        avg_spend_per_trip,
        avg_spend_in_offer_category,
    })
}
