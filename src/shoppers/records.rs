//! Typed records of the three shoppers datasets.
//!
//! Every source line is a headerless, comma-separated row. [`FromFields`] turns one
//! parsed row into a record, checking the field count and coercing numeric and
//! boolean fields. Records are immutable once built.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Which dataset a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    History,
    Offer,
    Transaction,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RecordKind::History => "history",
            RecordKind::Offer => "offer",
            RecordKind::Transaction => "transaction",
        })
    }
}

/// A source row that cannot become a typed record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{kind} record: expected {expected} fields, found {found}")]
    FieldCount {
        kind: RecordKind,
        expected: usize,
        found: usize,
    },
    #[error("{kind} record: field `{field}` has invalid value {value:?}")]
    InvalidField {
        kind: RecordKind,
        field: &'static str,
        value: String,
    },
    #[error("{kind} record: unreadable line: {reason}")]
    Unreadable { kind: RecordKind, reason: String },
}

/// Construction of a record from one comma-separated row.
pub trait FromFields: Sized {
    const KIND: RecordKind;
    /// Field names in column order.
    const FIELDS: &'static [&'static str];

    /// Build from a row whose length was already checked against `FIELDS`.
    fn from_checked(row: &StringRecord) -> Result<Self, RecordError>;

    /// Build from a parsed row.
    ///
    /// # Errors
    /// [`RecordError::FieldCount`] on a wrong number of fields,
    /// [`RecordError::InvalidField`] when a numeric field does not parse.
    fn from_fields(row: &StringRecord) -> Result<Self, RecordError> {
        if row.len() != Self::FIELDS.len() {
            return Err(RecordError::FieldCount {
                kind: Self::KIND,
                expected: Self::FIELDS.len(),
                found: row.len(),
            });
        }
        Self::from_checked(row)
    }

    /// Parse a single raw line.
    ///
    /// # Errors
    /// Same as [`from_fields`](Self::from_fields), plus
    /// [`RecordError::Unreadable`] when the line is not valid CSV.
    fn parse_line(line: &str) -> Result<Self, RecordError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        let mut row = StringRecord::new();
        let found = rdr.read_record(&mut row).map_err(|e| RecordError::Unreadable {
            kind: Self::KIND,
            reason: e.to_string(),
        })?;
        if !found {
            return Err(RecordError::FieldCount {
                kind: Self::KIND,
                expected: Self::FIELDS.len(),
                found: 0,
            });
        }
        Self::from_fields(&row)
    }
}

fn text(row: &StringRecord, idx: usize) -> String {
    row.get(idx).unwrap_or_default().to_string()
}

fn number<T: FromStr>(
    kind: RecordKind,
    fields: &'static [&'static str],
    row: &StringRecord,
    idx: usize,
) -> Result<T, RecordError> {
    let raw = row.get(idx).unwrap_or_default();
    raw.trim().parse::<T>().map_err(|_| RecordError::InvalidField {
        kind,
        field: fields[idx],
        value: raw.to_string(),
    })
}

/// One offer redemption by one customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub customer_id: String,
    pub chain: i64,
    pub offer_id: String,
    pub market: String,
    pub repeattrips: u64,
    pub repeater: bool,
    pub offerdate: String,
}

impl FromFields for HistoryRecord {
    const KIND: RecordKind = RecordKind::History;
    const FIELDS: &'static [&'static str] = &[
        "customer_id",
        "chain",
        "offer_id",
        "market",
        "repeattrips",
        "repeater",
        "offerdate",
    ];

    fn from_checked(row: &StringRecord) -> Result<Self, RecordError> {
        let (k, f) = (Self::KIND, Self::FIELDS);
        Ok(Self {
            customer_id: text(row, 0),
            chain: number(k, f, row, 1)?,
            offer_id: text(row, 2),
            market: text(row, 3),
            repeattrips: number(k, f, row, 4)?,
            // Only the literal `t` marks a repeater.
            repeater: row.get(5) == Some("t"),
            offerdate: text(row, 6),
        })
    }
}

/// One entry of the offer catalog. `offer_id` is expected to be unique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferRecord {
    pub offer_id: String,
    pub category: String,
    pub quantity: i64,
    pub company: String,
    pub offervalue: f64,
    pub brand: String,
}

impl FromFields for OfferRecord {
    const KIND: RecordKind = RecordKind::Offer;
    const FIELDS: &'static [&'static str] = &[
        "offer_id",
        "category",
        "quantity",
        "company",
        "offervalue",
        "brand",
    ];

    fn from_checked(row: &StringRecord) -> Result<Self, RecordError> {
        let (k, f) = (Self::KIND, Self::FIELDS);
        Ok(Self {
            offer_id: text(row, 0),
            category: text(row, 1),
            quantity: number(k, f, row, 2)?,
            company: text(row, 3),
            offervalue: number(k, f, row, 4)?,
            brand: text(row, 5),
        })
    }
}

/// One purchased line item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub customer_id: String,
    pub chain: i64,
    pub dept: String,
    pub category: String,
    pub company: String,
    pub brand: String,
    pub date: String,
    pub productsize: f64,
    pub productmeasure: String,
    pub purchasequantity: i64,
    pub purchaseamount: f64,
}

impl FromFields for TransactionRecord {
    const KIND: RecordKind = RecordKind::Transaction;
    const FIELDS: &'static [&'static str] = &[
        "customer_id",
        "chain",
        "dept",
        "category",
        "company",
        "brand",
        "date",
        "productsize",
        "productmeasure",
        "purchasequantity",
        "purchaseamount",
    ];

    fn from_checked(row: &StringRecord) -> Result<Self, RecordError> {
        let (k, f) = (Self::KIND, Self::FIELDS);
        Ok(Self {
            customer_id: text(row, 0),
            chain: number(k, f, row, 1)?,
            dept: text(row, 2),
            category: text(row, 3),
            company: text(row, 4),
            brand: text(row, 5),
            date: text(row, 6),
            productsize: number(k, f, row, 7)?,
            productmeasure: text(row, 8),
            purchasequantity: number(k, f, row, 9)?,
            purchaseamount: number(k, f, row, 10)?,
        })
    }
}
