//! Domain models shared by the parser and the expander.
//!
//! - [`Dimension`] - one `VALUES("title")` axis with its labels
//! - [`Record`] - one fully labeled output row
//! - [`DATA_KEY`] - the reserved record key holding the data value

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Reserved record key bound to the data value of each combination.
pub const DATA_KEY: &str = "data";

// =============================================================================
// Dimension
// =============================================================================

/// One categorical axis of a PX table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Dimension {
    /// Text between `VALUES("` and `")`.
    pub title: String,
    /// Labels in source order.
    pub labels: Vec<String>,
}

impl Dimension {
    pub fn new(title: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            title: title.into(),
            labels,
        }
    }

    /// Extract the dimension title from a statement key.
    ///
    /// Returns `None` unless the key is exactly `VALUES("<title>")`.
    pub fn title_from_key(key: &str) -> Option<&str> {
        key.strip_prefix("VALUES(\"")?.strip_suffix("\")")
    }
}

// =============================================================================
// Record
// =============================================================================

/// An insertion-ordered string map with last-write-wins semantics.
///
/// Inserting a key that is already present replaces its value and keeps the
/// position of the first insertion. Lookups are linear; a record holds one
/// entry per dimension plus [`DATA_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert or overwrite `key`. Returns the previous value, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The data value of this record.
    pub fn data(&self) -> Option<&str> {
        self.get(DATA_KEY)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

// Serialized in insertion order, independent of serde_json's map ordering.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_key() {
        assert_eq!(Dimension::title_from_key("VALUES(\"year\")"), Some("year"));
        assert_eq!(Dimension::title_from_key("VALUES(\"\")"), Some(""));
        assert_eq!(Dimension::title_from_key("VALUES(year)"), None);
        assert_eq!(Dimension::title_from_key("VALUES(\"year\""), None);
        assert_eq!(Dimension::title_from_key("DATA"), None);
    }

    #[test]
    fn test_insert_last_write_wins() {
        let mut record = Record::new();
        assert_eq!(record.insert("region", "North"), None);
        record.insert("year", "1988");
        assert_eq!(record.insert("region", "South"), Some("North".to_string()));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("region"), Some("South"));
        // First insertion keeps its position
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["region", "year"]);
    }

    #[test]
    fn test_serialize_in_insertion_order() {
        let record: Record = vec![("year", "1988"), ("month", "Jan"), (DATA_KEY, "1")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"year":"1988","month":"Jan","data":"1"}"#);
    }

    #[test]
    fn test_serialize_as_object() {
        let record: Record = vec![(DATA_KEY, "7")].into_iter().collect();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, serde_json::json!({ "data": "7" }));
        assert_eq!(record.data(), Some("7"));
    }
}
