/*!
 * Row Sets
 * Column projections and tabular results handed back to the host
 */

use serde::{Deserialize, Serialize};

use crate::core::{ProviderError, ProviderResult};

/// Columns a host may request on document or root rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "document_id")]
    DocumentId,
    #[serde(rename = "mime_type")]
    MimeType,
    #[serde(rename = "_display_name")]
    DisplayName,
    #[serde(rename = "last_modified")]
    LastModified,
    #[serde(rename = "flags")]
    Flags,
    #[serde(rename = "_size")]
    Size,
    #[serde(rename = "icon")]
    Icon,
    #[serde(rename = "root_id")]
    RootId,
    #[serde(rename = "mime_types")]
    MimeTypes,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "summary")]
    Summary,
    #[serde(rename = "available_bytes")]
    AvailableBytes,
}

impl Column {
    /// Wire name of the column
    pub const fn name(self) -> &'static str {
        match self {
            Column::DocumentId => "document_id",
            Column::MimeType => "mime_type",
            Column::DisplayName => "_display_name",
            Column::LastModified => "last_modified",
            Column::Flags => "flags",
            Column::Size => "_size",
            Column::Icon => "icon",
            Column::RootId => "root_id",
            Column::MimeTypes => "mime_types",
            Column::Title => "title",
            Column::Summary => "summary",
            Column::AvailableBytes => "available_bytes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "document_id" => Column::DocumentId,
            "mime_type" => Column::MimeType,
            "_display_name" => Column::DisplayName,
            "last_modified" => Column::LastModified,
            "flags" => Column::Flags,
            "_size" => Column::Size,
            "icon" => Column::Icon,
            "root_id" => Column::RootId,
            "mime_types" => Column::MimeTypes,
            "title" => Column::Title,
            "summary" => Column::Summary,
            "available_bytes" => Column::AvailableBytes,
            _ => return None,
        })
    }
}

/// Ordered set of requested columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection(Vec<Column>);

impl Projection {
    pub fn new(columns: Vec<Column>) -> Self {
        Self(columns)
    }

    /// Columns returned for documents when the host requests none
    pub fn document_default() -> Self {
        Self(vec![
            Column::DocumentId,
            Column::MimeType,
            Column::DisplayName,
            Column::LastModified,
            Column::Flags,
            Column::Size,
        ])
    }

    /// Columns returned for roots when the host requests none
    pub fn root_default() -> Self {
        Self(vec![
            Column::RootId,
            Column::MimeTypes,
            Column::Flags,
            Column::Icon,
            Column::Title,
            Column::Summary,
            Column::DocumentId,
            Column::AvailableBytes,
        ])
    }

    /// Parse wire column names, rejecting unknown ones
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ProviderResult<Self> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Column::from_name(name).ok_or_else(|| {
                    ProviderError::InvalidArgument(format!("unknown column {}", name))
                })
            })
            .collect::<ProviderResult<Vec<_>>>()
            .map(Self)
    }

    pub fn columns(&self) -> &[Column] {
        &self.0
    }
}

/// One cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Anything that can fill a row by column
pub trait RowSource {
    /// Value for a column, `Value::Null` when the source has none
    fn value(&self, column: Column) -> Value;
}

/// Tabular result: projected columns, rows, and an optional change-notification key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSet {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_uri: Option<String>,
}

impl RowSet {
    pub fn new(projection: &Projection) -> Self {
        Self {
            columns: projection.columns().to_vec(),
            rows: Vec::new(),
            notification_uri: None,
        }
    }

    /// Append a row, keeping only the projected columns
    pub fn push<R: RowSource + ?Sized>(&mut self, source: &R) {
        let row = self.columns.iter().map(|c| source.value(*c)).collect();
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row index and column
    pub fn get(&self, row: usize, column: Column) -> Option<&Value> {
        let index = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row)?.get(index)
    }

    /// All text values of one column, skipping non-text cells
    pub fn strings(&self, column: Column) -> Vec<&str> {
        (0..self.rows.len())
            .filter_map(|row| self.get(row, column).and_then(Value::as_str))
            .collect()
    }

    pub fn set_notification_uri(&mut self, uri: String) {
        self.notification_uri = Some(uri);
    }

    pub fn notification_uri(&self) -> Option<&str> {
        self.notification_uri.as_deref()
    }
}
