//! Shoppers record fixtures.
//!
//! The builders fill the fields no query reads with fixed placeholders, so tests
//! only spell out what they assert on.

use crate::shoppers::{HistoryRecord, OfferRecord, TransactionRecord};

#[must_use]
pub fn history(customer_id: &str, offer_id: &str, repeattrips: u64) -> HistoryRecord {
    HistoryRecord {
        customer_id: customer_id.to_string(),
        chain: 4,
        offer_id: offer_id.to_string(),
        market: "1".to_string(),
        repeattrips,
        repeater: repeattrips > 0,
        offerdate: "2013-04-24".to_string(),
    }
}

#[must_use]
pub fn offer(offer_id: &str, category: &str, offervalue: f64) -> OfferRecord {
    OfferRecord {
        offer_id: offer_id.to_string(),
        category: category.to_string(),
        quantity: 1,
        company: "104460040".to_string(),
        offervalue,
        brand: "7668".to_string(),
    }
}

#[must_use]
pub fn transaction(customer_id: &str, date: &str, category: &str, purchaseamount: f64) -> TransactionRecord {
    TransactionRecord {
        customer_id: customer_id.to_string(),
        chain: 4,
        dept: "9".to_string(),
        category: category.to_string(),
        company: "104460040".to_string(),
        brand: "7668".to_string(),
        date: date.to_string(),
        productsize: 16.0,
        productmeasure: "OZ".to_string(),
        purchasequantity: 1,
        purchaseamount,
    }
}

/// Two offers and four redemptions with distinct repeat-trip counts.
///
/// | customer | offer | repeattrips | offer value |
/// |----------|-------|-------------|-------------|
/// | c1       | o1    | 2124        | 0.75        |
/// | c2       | o1    | 1418        | 0.75        |
/// | c3       | o2    | 549         | 1.0         |
/// | c4       | o2    | 104         | 1.0         |
///
/// `c5` redeemed `o9`, which is not in the catalog.
#[must_use]
pub fn sample_history_and_offers() -> (Vec<HistoryRecord>, Vec<OfferRecord>) {
    let history = vec![
        history("c1", "o1", 2124),
        history("c2", "o1", 1418),
        history("c3", "o2", 549),
        history("c4", "o2", 104),
        history("c5", "o9", 9000),
    ];
    let offers = vec![offer("o1", "cat-a", 0.75), offer("o2", "cat-b", 1.0)];
    (history, offers)
}

/// Transactions for `c1` over two dates: trips of 10.00 and 8.00, average 9.00.
/// The `cat-a` items alone come to 4.00 and 3.00, average 3.50.
#[must_use]
pub fn sample_transactions() -> Vec<TransactionRecord> {
    vec![
        transaction("c1", "2013-01-01", "cat-a", 4.0),
        transaction("c1", "2013-01-01", "cat-z", 6.0),
        transaction("c1", "2013-01-02", "cat-z", 5.0),
        transaction("c1", "2013-01-02", "cat-a", 3.0),
    ]
}
