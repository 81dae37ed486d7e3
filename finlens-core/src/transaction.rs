//! Transaction records as handed over by the storage layer.
//!
//! Input is frequently messy (amounts stored as strings, `null` types, half a
//! location), so deserialization never fails on a single bad field. Bad values
//! become `None` and the filters in [`crate::filter`] decide what counts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl TransactionType {
    /// Parse the stored label; unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// A fully specified map coordinate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Location as stored; either half may be missing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Location {
    /// Both halves present and finite. Zero is a valid coordinate.
    pub fn point(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(GeoPoint { lat, lng })
            }
            _ => None,
        }
    }
}

/// A single income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "TransactionRecord")]
pub struct Transaction {
    /// Opaque identifier (`_id` in storage exports)
    pub id: String,
    /// `None` when the stored type is missing or unrecognised
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// `None` when the stored amount is missing, null or non-numeric
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<Location>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionType,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind),
            amount: Some(amount),
            category: None,
            description: None,
            date: Some(date),
            location: None,
        }
    }

    pub fn income(id: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(id, TransactionType::Income, amount, date)
    }

    pub fn expense(id: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::new(id, TransactionType::Expense, amount, date)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(Location {
            lat: Some(lat),
            lng: Some(lng),
        });
        self
    }

    /// The coordinate if this record is geo-tagged
    pub fn geo_point(&self) -> Option<GeoPoint> {
        self.location.as_ref().and_then(Location::point)
    }

    pub fn is_geo_tagged(&self) -> bool {
        self.geo_point().is_some()
    }
}

/// A field value of unknown shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Loose {
    fn number(&self) -> Option<f64> {
        let n = match self {
            Loose::Number(n) => *n,
            Loose::Text(s) => s.trim().parse::<f64>().ok()?,
            Loose::Other(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    fn text(&self) -> Option<String> {
        match self {
            Loose::Text(s) if !s.trim().is_empty() => Some(s.clone()),
            Loose::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        match self {
            Loose::Text(s) => parse_date(s),
            Loose::Number(ms) => DateTime::from_timestamp_millis(*ms as i64).map(|dt| dt.date_naive()),
            Loose::Other(_) => None,
        }
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 and naive ISO timestamps. Zoned timestamps
/// are bucketed by their UTC date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseLocation {
    Pair {
        #[serde(default)]
        lat: Option<Loose>,
        #[serde(default)]
        lng: Option<Loose>,
    },
    Other(IgnoredAny),
}

#[derive(Deserialize)]
struct TransactionRecord {
    #[serde(default, alias = "_id")]
    id: Option<Loose>,
    #[serde(default, rename = "type")]
    kind: Option<Loose>,
    #[serde(default)]
    amount: Option<Loose>,
    #[serde(default)]
    category: Option<Loose>,
    #[serde(default)]
    description: Option<Loose>,
    #[serde(default)]
    date: Option<Loose>,
    #[serde(default)]
    location: Option<LooseLocation>,
}

impl From<TransactionRecord> for Transaction {
    fn from(raw: TransactionRecord) -> Self {
        let location = match raw.location {
            Some(LooseLocation::Pair { lat, lng }) => Some(Location {
                lat: lat.as_ref().and_then(Loose::number),
                lng: lng.as_ref().and_then(Loose::number),
            }),
            _ => None,
        };

        Transaction {
            id: raw.id.as_ref().and_then(Loose::text).unwrap_or_default(),
            kind: raw
                .kind
                .as_ref()
                .and_then(Loose::text)
                .and_then(|t| TransactionType::parse(&t)),
            amount: raw.amount.as_ref().and_then(Loose::number),
            category: raw.category.as_ref().and_then(Loose::text),
            description: raw.description.as_ref().and_then(Loose::text),
            date: raw.date.as_ref().and_then(Loose::date),
            location,
        }
    }
}
