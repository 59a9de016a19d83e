//! Wire models of the Zotero Connector protocol subset we speak.
//!
//! - `GET /connector/ping` answers with [`PING_PAGE`]
//! - `POST /connector/ping` answers with [`PING_PREFS`]
//! - `POST /connector/getSelectedCollection` answers with [`SelectedCollection`]
//! - `POST /connector/saveItems` accepts a [`SaveItemsRequest`] and echoes it
//!
//! A `saveItems` body as sent by the browser connector:
//!
//! ```json
//! {
//!   "items": [
//!     {
//!       "id": "a1b2c3",
//!       "itemType": "journalArticle",
//!       "title": "On Computable Numbers",
//!       "DOI": "10.1112/plms/s2-42.1.230",
//!       "tags": ["computability", "logic"],
//!       "attachments": [
//!         {"title": "Full Text PDF", "mimeType": "application/pdf", "url": "https://..."}
//!       ]
//!     }
//!   ],
//!   "uri": "https://...",
//!   "sessionID": "..."
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version of the desktop client we claim to be
pub const ZOTERO_VERSION: &str = "5.0.25";
/// Connector API version we implement
pub const CONNECTOR_API_VERSION: u32 = 2;

pub const ZOTERO_VERSION_HEADER: &str = "x-zotero-version";
pub const CONNECTOR_API_VERSION_HEADER: &str = "x-zotero-connector-api-version";

pub const PING_PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>Zotero Connector Server is Available</title>
    </head>
    <body>
        Zotero Connector Server is Available
    </body>
</html>
"#;

/// Sent verbatim; the spacing is part of the expected response.
pub const PING_PREFS: &str = r#"{"prefs": {"automaticSnapshots": true}}"#;

/// `saveItems` request; other top-level keys are ignored
#[derive(Debug, Deserialize)]
pub struct SaveItemsRequest {
    pub items: Vec<Value>,
}

/// Library descriptor returned by `getSelectedCollection`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SelectedCollection {
    #[serde(rename = "libraryID")]
    pub library_id: u32,
    #[serde(rename = "libraryName")]
    pub library_name: String,
    #[serde(rename = "libraryEditable")]
    pub library_editable: bool,
    pub editable: bool,
    /// Collections do not exist here; always null
    pub id: Option<String>,
    pub name: String,
}

impl SelectedCollection {
    /// Descriptor for the single configured library
    pub fn library(name: &str) -> Self {
        Self {
            library_id: 1,
            library_name: name.to_string(),
            library_editable: true,
            editable: true,
            id: None,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selected_collection_wire_format() {
        let value = serde_json::to_value(SelectedCollection::library("papers")).unwrap();
        assert_eq!(
            value,
            json!({
                "libraryID": 1,
                "libraryName": "papers",
                "libraryEditable": true,
                "editable": true,
                "id": null,
                "name": "papers"
            })
        );
    }

    #[test]
    fn test_ping_prefs_is_valid_json() {
        let value: Value = serde_json::from_str(PING_PREFS).unwrap();
        assert_eq!(value, json!({"prefs": {"automaticSnapshots": true}}));
    }

    #[test]
    fn test_save_items_request_ignores_extra_keys() {
        let request: SaveItemsRequest =
            serde_json::from_str(r#"{"items": [{"title": "T"}, 3], "sessionID": "s"}"#).unwrap();
        assert_eq!(request.items.len(), 2);
    }
}
