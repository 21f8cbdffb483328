//! Typed query results.
//!
//! Rows from the store are free-form maps; they are decoded once, by the
//! template's [`Shape`], into a [`QueryResult`] variant so the formatter can
//! match exhaustively. Missing or mistyped columns decode to `None`.

use serde::Serialize;
use serde_json::Value;

use crate::model::Category;
use crate::store::Row;
use crate::translate::Shape;

/// One entry of a listing or timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Everything known about a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub category: Option<Category>,
    pub full_name: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub agency: Option<String>,
    pub vehicle: Option<String>,
    pub site: Option<String>,
    pub country: Option<String>,
    pub budget_usd: Option<f64>,
    pub payload_capacity_kg: Option<f64>,
    pub success_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub category: Category,
    pub count: i64,
}

/// Result of one template, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResult {
    Count { count: i64 },
    Listing { items: Vec<Item> },
    Timeline { items: Vec<Item> },
    Detail { record: Record },
    /// Records found for the compared names, in the order they were asked. May hold one
    /// record when only one side exists in the graph.
    Comparison { records: Vec<Record> },
    Breakdown { counts: Vec<LabelCount>, total: i64 },
    Empty,
}

impl QueryResult {
    /// Decode store rows by the shape of the template that produced them.
    pub fn decode(shape: Shape, rows: &[Row]) -> Self {
        match shape {
            // A count query always yields a number; no rows means zero.
            Shape::Count => QueryResult::Count {
                count: rows.first().and_then(|r| integer(r, "count")).unwrap_or(0),
            },
            Shape::Listing | Shape::Timeline => {
                let items: Vec<Item> = rows.iter().filter_map(decode_item).collect();
                match (items.is_empty(), shape) {
                    (true, _) => QueryResult::Empty,
                    (false, Shape::Timeline) => QueryResult::Timeline { items },
                    (false, _) => QueryResult::Listing { items },
                }
            }
            Shape::Detail => match rows.iter().find_map(decode_record) {
                Some(record) => QueryResult::Detail { record },
                None => QueryResult::Empty,
            },
            Shape::Comparison => {
                let records: Vec<Record> = rows.iter().filter_map(decode_record).collect();
                if records.is_empty() {
                    QueryResult::Empty
                } else {
                    QueryResult::Comparison { records }
                }
            }
            Shape::Breakdown => {
                let counts: Vec<LabelCount> = rows
                    .iter()
                    .filter_map(|r| {
                        let category = text(r, "label").and_then(|l| Category::from_label(&l))?;
                        Some(LabelCount { category, count: integer(r, "count").unwrap_or(0) })
                    })
                    .collect();
                if counts.is_empty() {
                    QueryResult::Empty
                } else {
                    let total = counts.iter().map(|c| c.count).sum();
                    QueryResult::Breakdown { counts, total }
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryResult::Empty)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QueryResult::Count { .. } => "count",
            QueryResult::Listing { .. } => "listing",
            QueryResult::Timeline { .. } => "timeline",
            QueryResult::Detail { .. } => "detail",
            QueryResult::Comparison { .. } => "comparison",
            QueryResult::Breakdown { .. } => "breakdown",
            QueryResult::Empty => "empty",
        }
    }
}

fn decode_item(row: &Row) -> Option<Item> {
    Some(Item {
        name: text(row, "name")?,
        category: text(row, "label").and_then(|l| Category::from_label(&l)),
        summary: text(row, "summary"),
        date: text(row, "date"),
        status: text(row, "status"),
    })
}

fn decode_record(row: &Row) -> Option<Record> {
    Some(Record {
        name: text(row, "name")?,
        category: text(row, "label").and_then(|l| Category::from_label(&l)),
        full_name: text(row, "full_name"),
        summary: text(row, "summary"),
        status: text(row, "status"),
        date: text(row, "date"),
        agency: text(row, "agency"),
        vehicle: text(row, "vehicle"),
        site: text(row, "site"),
        country: text(row, "country"),
        budget_usd: number(row, "budget_usd"),
        payload_capacity_kg: number(row, "payload_capacity_kg"),
        success_rate: number(row, "success_rate"),
    })
}

fn text(row: &Row, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(row: &Row, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer(row: &Row, key: &str) -> Option<i64> {
    let value = row.get(key)?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}
