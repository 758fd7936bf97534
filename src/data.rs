//! Loading node records.
//!
//! Input is JSON: either an array of records or an object with a `nodes` array.
//!
//! ```json
//! [{ "id": 1, "embedding": [0.1, 0.2], "author": "a", "publishedAt": "2020-01-01", "text": "..." }]
//! ```

use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::NodeId;

/// One input item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Unique id.
    pub id: NodeId,
    /// Fixed-length embedding.
    pub embedding: Vec<f32>,
    /// Author name.
    #[serde(default)]
    pub author: String,
    /// Publication timestamp.
    #[serde(default)]
    pub published_at: String,
    /// Text content.
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Bare(Vec<NodeRecord>),
    Wrapped { nodes: Vec<NodeRecord> },
}

impl RecordFile {
    fn into_records(self) -> Vec<NodeRecord> {
        match self {
            RecordFile::Bare(records) | RecordFile::Wrapped { nodes: records } => records,
        }
    }
}

/// Parse records from a JSON string.
pub fn records_from_json_str(json: &str) -> Result<Vec<NodeRecord>> {
    let file: RecordFile = serde_json::from_str(json)?;
    check_unique(file.into_records())
}

/// Parse records from a reader.
pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<NodeRecord>> {
    let file: RecordFile = serde_json::from_reader(reader)?;
    check_unique(file.into_records())
}

fn check_unique(records: Vec<NodeRecord>) -> Result<Vec<NodeRecord>> {
    let mut seen = HashSet::with_capacity(records.len());
    for r in &records {
        if !seen.insert(r.id) {
            return Err(Error::DuplicateNode(r.id));
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array() {
        let json = r#"[
            {"id": 1, "embedding": [0.0, 1.0], "author": "a", "publishedAt": "2021-03-04", "text": "x"},
            {"id": 2, "embedding": [1.0, 0.0], "author": "b", "publishedAt": "2021-03-05", "text": "y"}
        ]"#;
        let records = records_from_json_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].published_at, "2021-03-04");
        assert_eq!(records[1].embedding, vec![1.0, 0.0]);
    }

    #[test]
    fn wrapped_and_sparse_records() {
        let json = r#"{"nodes": [{"id": 7, "embedding": [3.0]}]}"#;
        let records = records_from_reader(json.as_bytes()).unwrap();
        assert_eq!(records[0].id, 7);
        assert!(records[0].author.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[{"id": 1, "embedding": [0.0]}, {"id": 1, "embedding": [1.0]}]"#;
        assert!(matches!(records_from_json_str(json), Err(Error::DuplicateNode(1))));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(records_from_json_str("{"), Err(Error::Json(_))));
    }
}
