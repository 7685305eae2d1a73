//! Offer-effectiveness queries over the shoppers datasets.
//!
//! Every query takes collections and an [`ExecutionContext`] and returns plain
//! values; results do not depend on the context's partitioning.

use super::records::{HistoryRecord, OfferRecord, TransactionRecord};
use crate::combiners::{AverageF64, Max};
use crate::context::ExecutionContext;
use crate::PCollection;
use anyhow::Result;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A history row matched with the offer it redeemed, keyed by `offer_id`.
pub type HistoryOffer = (String, (HistoryRecord, OfferRecord));

/// One ranked offer redemption.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopOffer {
    pub customer_id: String,
    pub offer_id: String,
    pub repeattrips: u64,
    pub offervalue: f64,
}

impl TopOffer {
    #[must_use]
    pub fn from_joined((offer_id, (h, o)): &HistoryOffer) -> Self {
        Self {
            customer_id: h.customer_id.clone(),
            offer_id: offer_id.clone(),
            repeattrips: h.repeattrips,
            offervalue: o.offervalue,
        }
    }
}

/// Join every history row with its offer on `offer_id`.
///
/// History rows whose offer is missing are dropped; duplicate offer ids yield one
/// row per duplicate.
#[must_use]
pub fn join_history_offers(
    history: &PCollection<HistoryRecord>,
    offers: &PCollection<OfferRecord>,
) -> PCollection<HistoryOffer> {
    history.join_on(offers, |h| h.offer_id.clone(), |o| o.offer_id.clone())
}

/// The `k` redemptions with the most repeat trips, most first.
///
/// Redemptions with equal repeat trips come out in no particular order.
///
/// # Errors
/// Propagates any pipeline failure.
pub fn top_offers(
    joined: &PCollection<HistoryOffer>,
    ctx: &ExecutionContext,
    k: usize,
) -> Result<Vec<TopOffer>> {
    joined
        .clone()
        .map(TopOffer::from_joined)
        .top_k_by(ctx, k, |t| t.repeattrips)
}

/// Highest repeat-trip count among redemptions of offers worth exactly `offer_value`.
///
/// `None` when no joined offer has that value.
///
/// # Errors
/// Propagates any pipeline failure.
#[allow(clippy::float_cmp)]
pub fn max_repeattrips_for_offer_value(
    joined: &PCollection<HistoryOffer>,
    ctx: &ExecutionContext,
    offer_value: f64,
) -> Result<Option<u64>> {
    let first = joined
        .clone()
        .filter(move |(_, (_, o))| o.offervalue == offer_value)
        .group_by(|(_, (h, _))| h.repeattrips)
        .sort_by_key(true)
        .first(ctx)?;
    Ok(first.map(|(trips, _)| trips))
}

/// Highest repeat-trip count for every distinct offer value, by ascending value.
///
/// # Errors
/// Propagates any pipeline failure.
pub fn max_repeattrips_by_offer_value(
    joined: &PCollection<HistoryOffer>,
    ctx: &ExecutionContext,
) -> Result<Vec<(f64, u64)>> {
    let rows = joined
        .clone()
        .map(|(_, (h, o))| (OrderedFloat(o.offervalue), h.repeattrips))
        .combine_by_key(Max::new())
        .sort_by_key(false)
        .collect(ctx)?;
    Ok(rows.into_iter().map(|(v, trips)| (v.into_inner(), trips)).collect())
}

/// Average spend per shopping trip for every customer, by customer id.
///
/// A trip is one customer on one date. Trip totals come from a combine keyed by
/// `(customer_id, date)`; the per-customer mean then uses a sum-count combine.
///
/// # Errors
/// Propagates any pipeline failure.
pub fn avg_spend_per_trip(
    transactions: &PCollection<TransactionRecord>,
    ctx: &ExecutionContext,
) -> Result<Vec<(String, f64)>> {
    trip_average(transactions.clone(), ctx)
}

/// Like [`avg_spend_per_trip`], counting only items whose category matches the
/// category of an offer the customer redeemed.
///
/// Customers without any such item are absent from the result.
///
/// # Errors
/// Propagates any pipeline failure.
pub fn avg_spend_per_trip_in_offer_category(
    transactions: &PCollection<TransactionRecord>,
    joined: &PCollection<HistoryOffer>,
    ctx: &ExecutionContext,
) -> Result<Vec<(String, f64)>> {
    let offered = joined
        .clone()
        .map(|(_, (h, o))| ((h.customer_id.clone(), o.category.clone()), ()))
        .reduce_by_key(|a, _| a);
    let matching = transactions
        .clone()
        .key_by(|t| (t.customer_id.clone(), t.category.clone()))
        .join_inner(&offered)
        .map(|(_, (t, ()))| t.clone());
    trip_average(matching, ctx)
}

fn trip_average(
    transactions: PCollection<TransactionRecord>,
    ctx: &ExecutionContext,
) -> Result<Vec<(String, f64)>> {
    transactions
        .key_by(|t| (t.customer_id.clone(), t.date.clone()))
        .combine_by_key_fns(
            |t: TransactionRecord| t.purchaseamount,
            |acc: f64, t: TransactionRecord| acc + t.purchaseamount,
            |a: f64, b: f64| a + b,
        )
        .map(|((customer, _), total)| (customer.clone(), *total))
        .combine_by_key(AverageF64)
        .sort_by_key(false)
        .collect(ctx)
}
