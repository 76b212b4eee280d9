//! Maps the raw shapes returned by the card sources onto [`CardRecord`].
//!
//! A malformed cell or field falls back to a default; it never fails the
//! batch.

use super::CardRecord;
use crate::constants::{COLORLESS, UNKNOWN_CARD_NAME};
use serde_json::Value;

/// A payload as fetched, before normalization.
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// Spreadsheet range: row 0 holds headers, columns are
    /// mana value, name, type, color, set, status.
    Grid(Vec<Vec<String>>),
    /// CubeCobra cube JSON.
    Catalog(Value),
}

pub fn normalize(payload: RawPayload) -> Vec<CardRecord> {
    match payload {
        RawPayload::Grid(rows) => from_grid(rows),
        RawPayload::Catalog(json) => from_catalog(&json),
    }
}

fn from_grid(rows: Vec<Vec<String>>) -> Vec<CardRecord> {
    rows.into_iter()
        .skip(1)
        .map(|row| {
            let mut cells = row.into_iter();
            let mut next = || cells.next().unwrap_or_default();
            CardRecord {
                mana_value: parse_mana_value(&next()),
                name: next(),
                category: next(),
                attribute: next(),
                collection: next(),
                status: next(),
            }
        })
        .collect()
}

/// Leading digits of the trimmed cell ("3", "2.5" -> 2, "4 (X)" -> 4); 0 otherwise.
pub fn parse_mana_value(cell: &str) -> u32 {
    let digits: String = cell
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn from_catalog(json: &Value) -> Vec<CardRecord> {
    let cards = &json["cards"];
    let list = cards["mainboard"]
        .as_array()
        .or_else(|| cards.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();

    list.iter()
        .filter(|entry| entry.is_object())
        .filter(|entry| !entry["markedForDelete"].as_bool().unwrap_or(false))
        .map(catalog_record)
        .collect()
}

fn catalog_record(entry: &Value) -> CardRecord {
    let name = text_field(entry, &["name"]).unwrap_or_default();
    let colors: Vec<&str> = field(entry, &["colors"])
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    CardRecord {
        mana_value: field(entry, &["cmc"]).map(mana_from_json).unwrap_or(0),
        name: if name.is_empty() {
            UNKNOWN_CARD_NAME.to_string()
        } else {
            name
        },
        category: text_field(entry, &["type_line", "type"]).unwrap_or_default(),
        attribute: if colors.is_empty() {
            COLORLESS.to_string()
        } else {
            colors.join(", ")
        },
        collection: text_field(entry, &["set_name", "set"]).unwrap_or_default(),
        status: entry["status"].as_str().unwrap_or_default().to_string(),
    }
}

/// First non-null value among `keys`, looked up on the entry and then on its
/// `details` object.
fn field<'a>(entry: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    [entry, &entry["details"]]
        .into_iter()
        .flat_map(|obj| keys.iter().map(move |k| &obj[*k]))
        .find(|v| !v.is_null())
}

fn text_field(entry: &Value, keys: &[&str]) -> Option<String> {
    field(entry, keys).and_then(Value::as_str).map(str::to_string)
}

fn mana_from_json(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| f.floor() as u32)
            .unwrap_or(0),
        Value::String(s) => parse_mana_value(s),
        _ => 0,
    }
}
