//! CSV snapshots with a header row. Recognised columns:
//! `id,type,amount,category,description,date,lat,lng` (any order, any subset).
//! Unknown columns are ignored.

use finlens_core::Transaction;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;

use super::fill_missing_ids;
use crate::error::IngestError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "_id")]
    id: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    amount: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lng: String,
}

impl CsvRow {
    /// Route the row through the same lenient record reader as JSON input.
    fn into_transaction(self) -> Result<Transaction, serde_json::Error> {
        let mut obj = Map::new();
        let mut put = |key: &str, value: String| {
            if !value.is_empty() {
                obj.insert(key.to_string(), Value::String(value));
            }
        };
        put("id", self.id);
        put("type", self.kind);
        put("amount", self.amount);
        put("category", self.category);
        put("description", self.description);
        put("date", self.date);

        if !self.lat.is_empty() || !self.lng.is_empty() {
            let mut loc = Map::new();
            loc.insert("lat".to_string(), Value::String(self.lat));
            loc.insert("lng".to_string(), Value::String(self.lng));
            obj.insert("location".to_string(), Value::Object(loc));
        }

        serde_json::from_value(Value::Object(obj))
    }
}

pub fn parse_csv(input: impl Read) -> Result<Vec<Transaction>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut txns = Vec::new();
    for result in rdr.deserialize::<CsvRow>() {
        let row = result?;
        txns.push(row.into_transaction()?);
    }

    fill_missing_ids(&mut txns);
    Ok(txns)
}
