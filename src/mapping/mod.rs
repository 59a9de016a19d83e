//! Connector item -> library record translation
//!
//! [`translate`] is the pure part: it strips the connector-only keys, renames
//! the fields listed in [`CanonicalField`], flattens `tags`, and copies every
//! other key through unchanged. [`FieldMapper`] adds the optional DOI
//! enrichment on top.

mod fields;

pub use fields::CanonicalField;

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::enrichment::MetadataLookup;

const ID_KEY: &str = "id";
const ATTACHMENTS_KEY: &str = "attachments";
const TAGS_KEY: &str = "tags";
const TITLE_KEY: &str = "title";

/// File the connector wants downloaded alongside an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDescriptor {
    pub mime_type: Option<String>,
    pub url: Option<String>,
}

impl AttachmentDescriptor {
    /// Declared media type mentions "pdf" (any case)
    pub fn is_pdf(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.to_ascii_lowercase().contains("pdf"))
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);
        Some(Self {
            mime_type: text("mimeType"),
            url: text("url"),
        })
    }
}

/// One entry of a `saveItems` batch
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorItem {
    /// Connector-side identifier, kept for logging only
    pub external_id: Option<Value>,
    pub attachments: Vec<AttachmentDescriptor>,
    /// Remaining metadata, `id` and `attachments` already removed
    pub fields: Map<String, Value>,
}

#[derive(Debug, thiserror::Error)]
#[error("item must be a JSON object, got {0}")]
pub struct NotAnObject(&'static str);

impl TryFrom<Value> for ConnectorItem {
    type Error = NotAnObject;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut fields = match value {
            Value::Object(map) => map,
            other => return Err(NotAnObject(json_kind(&other))),
        };

        let external_id = fields.remove(ID_KEY);
        let attachments = match fields.remove(ATTACHMENTS_KEY) {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(AttachmentDescriptor::from_value)
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            external_id,
            attachments,
            fields,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Record in the library's schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    pub fields: Map<String, Value>,
}

impl NormalizedRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// DOI as a lookup key; non-string values are rendered as JSON text
    pub fn doi(&self) -> Option<String> {
        match self.get(CanonicalField::Doi.as_str())? {
            Value::Null => None,
            Value::String(doi) => Some(doi.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Translate connector metadata into the library schema.
///
/// Order matters: translated fields are written first, then leftover keys are
/// copied over them, so a key that already uses the library name wins over a
/// translated duplicate.
pub fn translate(mut fields: Map<String, Value>) -> NormalizedRecord {
    fields.remove(ID_KEY);
    fields.remove(ATTACHMENTS_KEY);

    let mut out = Map::new();

    for field in CanonicalField::ALL {
        match fields.remove(field.source_key()) {
            None | Some(Value::Null) => {}
            Some(value) => {
                out.insert(field.as_str().to_string(), value);
            }
        }
    }

    if let Some(joined) = fields.get(TAGS_KEY).and_then(join_tags) {
        fields.remove(TAGS_KEY);
        out.insert(TAGS_KEY.to_string(), Value::String(joined));
    }

    out.extend(fields);

    NormalizedRecord { fields: out }
}

fn join_tags(tags: &Value) -> Option<String> {
    let tags = tags.as_array()?;
    let words: Option<Vec<&str>> = tags.iter().map(Value::as_str).collect();
    words.map(|words| words.join(" "))
}

/// Field mapper with optional DOI enrichment
#[derive(Clone, Default)]
pub struct FieldMapper {
    lookup: Option<Arc<dyn MetadataLookup>>,
}

impl FieldMapper {
    pub fn new(lookup: Option<Arc<dyn MetadataLookup>>) -> Self {
        Self { lookup }
    }

    /// Mapper that never calls out
    pub fn offline() -> Self {
        Self { lookup: None }
    }

    /// Translate and, when the record has a DOI, merge looked-up metadata.
    ///
    /// The captured title always survives enrichment. Lookup errors leave the
    /// record as translated.
    pub async fn map(&self, fields: Map<String, Value>) -> NormalizedRecord {
        let mut record = translate(fields);

        let (Some(lookup), Some(doi)) = (&self.lookup, record.doi()) else {
            return record;
        };

        match lookup.lookup(&doi).await {
            Ok(mut extra) => {
                extra.remove(TITLE_KEY);
                info!(%doi, fields = extra.len(), "Updating document with looked-up metadata");
                record.fields.extend(extra);
            }
            Err(e) => {
                warn!(%doi, error = %e, "Metadata lookup failed, keeping captured fields");
            }
        }

        debug!(fields = record.fields.len(), "Mapped connector item");
        record
    }
}

impl std::fmt::Debug for FieldMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMapper")
            .field("enrichment", &self.lookup.is_some())
            .finish()
    }
}
