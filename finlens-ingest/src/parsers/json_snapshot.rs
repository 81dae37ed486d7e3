//! JSON exports: either a bare array of records or an object carrying a
//! `transactions` array (`{success, user, transactions, count}`).

use finlens_core::Transaction;
use serde_json::Value;

use super::fill_missing_ids;
use crate::error::IngestError;

pub fn parse_json(text: &str) -> Result<Vec<Transaction>, IngestError> {
    let root: Value = serde_json::from_str(text)?;
    let records = match root {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("transactions") {
            Some(Value::Array(items)) => items,
            _ => return Err(IngestError::UnexpectedShape),
        },
        _ => return Err(IngestError::UnexpectedShape),
    };

    let total = records.len();
    let mut txns: Vec<Transaction> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| match serde_json::from_value::<Transaction>(v) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(index = i, error = %e, "skipping non-object record");
                None
            }
        })
        .collect();

    if txns.len() < total {
        tracing::debug!(kept = txns.len(), total, "dropped unreadable records");
    }

    fill_missing_ids(&mut txns);
    Ok(txns)
}
