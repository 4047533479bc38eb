//! Row types for the stats queries. The stats query is assembled at run time,
//! so its rows are decoded dynamically into [`RawRow`] rather than through a
//! `FromRow` struct.
use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::Result;

#[derive(Debug, sqlx::FromRow)]
pub struct PlayerRow {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "siteId")]
    pub site_id: i64,
}

/// One result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) => Some(*v as i64),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Result row keyed by lower-cased column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    values: HashMap<String, Value>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&Value::Null)
    }

    pub fn insert(&mut self, column: &str, value: Value) {
        self.values.insert(column.to_lowercase(), value);
    }
}

impl<const N: usize> From<[(&str, Value); N]> for RawRow {
    fn from(cells: [(&str, Value); N]) -> Self {
        let mut row = RawRow::default();
        for (column, value) in cells {
            row.insert(column, value);
        }
        row
    }
}

/// Decode by the storage class SQLite reports for each value, since
/// expression columns carry no declared type.
pub fn decode_row(row: &SqliteRow) -> Result<RawRow> {
    let mut out = RawRow::default();
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_ascii_uppercase();
            match type_name.as_str() {
                "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => Value::Int(row.try_get::<i64, _>(i)?),
                "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => Value::Float(row.try_get::<f64, _>(i)?),
                _ => Value::Text(row.try_get::<String, _>(i)?),
            }
        };
        out.insert(column.name(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_read_as_null() {
        let row = RawRow::from([("N", Value::Int(3))]);
        assert_eq!(row.get("n"), &Value::Int(3));
        assert_eq!(row.get("vpip"), &Value::Null);
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Float(5.9).as_i64(), Some(5));
        assert_eq!(Value::Int(550).as_f64(), Some(550.0));
        assert_eq!(Value::Text(" 12 ".to_string()).as_i64(), Some(12));
        assert_eq!(Value::Null.as_f64(), None);
        assert_eq!(Value::Int(1).as_str(), None);
    }
}
