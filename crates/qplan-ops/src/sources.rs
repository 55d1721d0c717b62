//! Built-in data source kinds: `file` and `table`.

use std::any::Any;

use qplan_core::document::to_payload;
use qplan_core::prelude::DataSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::{OpError, SourceKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Json,
    Csv,
    Parquet,
}

/// Files at `path` (a single file or a directory of them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSource {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub format: FileFormat,
    /// Reader options, passed through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl FileSource {
    pub fn new(name: impl Into<String>, path: impl Into<String>, format: FileFormat) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            format,
            options: Map::new(),
        }
    }
}

impl DataSource for FileSource {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_value(&self) -> qplan_core::Result<Value> {
        to_payload(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl SourceKind for FileSource {
    const KIND: &'static str = "file";

    fn check(&self) -> Result<(), OpError> {
        if self.name.trim().is_empty() {
            return Err(OpError::Empty("name"));
        }
        if self.path.trim().is_empty() {
            return Err(OpError::Empty("path"));
        }
        Ok(())
    }
}

/// A catalog table, optionally qualified by catalog name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    pub table: String,
}

impl TableSource {
    /// `catalog.table`, or just `table` when unqualified.
    pub fn qualified_table(&self) -> String {
        match &self.catalog {
            Some(catalog) => format!("{catalog}.{}", self.table),
            None => self.table.clone(),
        }
    }
}

impl DataSource for TableSource {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_value(&self) -> qplan_core::Result<Value> {
        to_payload(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl SourceKind for TableSource {
    const KIND: &'static str = "table";

    fn check(&self) -> Result<(), OpError> {
        if self.name.trim().is_empty() {
            return Err(OpError::Empty("name"));
        }
        if self.table.trim().is_empty() {
            return Err(OpError::Empty("table"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::decode_source;
    use qplan_core::{Error, VariantFamily};
    use serde_json::json;

    #[test]
    fn file_source_defaults_and_round_trip() {
        let source = decode_source::<FileSource>(json!({"name": "logs", "path": "/data/logs"}))
            .unwrap();
        let file = source.as_any().downcast_ref::<FileSource>().unwrap();
        assert_eq!(file.format, FileFormat::Json);
        assert!(file.options.is_empty());
        assert_eq!(
            source.to_value().unwrap(),
            json!({"name": "logs", "path": "/data/logs", "format": "json"})
        );
    }

    #[test]
    fn file_source_requires_a_path() {
        let err = decode_source::<FileSource>(json!({"name": "logs", "path": " "})).unwrap_err();
        match err {
            Error::InvalidVariant { tag, message, .. } => {
                assert_eq!(tag, "file");
                assert!(message.contains("path"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn table_source_qualifies_by_catalog() {
        let t = TableSource {
            name: "orders".into(),
            catalog: Some("sales".into()),
            table: "orders_2024".into(),
        };
        assert_eq!(t.qualified_table(), "sales.orders_2024");
        assert_eq!(
            t.to_value().unwrap(),
            json!({"name": "orders", "catalog": "sales", "table": "orders_2024"})
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = decode_source::<TableSource>(json!({"name": "t", "table": "t", "schema": "x"}))
            .unwrap_err();
        match err {
            Error::InvalidVariant { family, tag, message } => {
                assert_eq!(family, VariantFamily::Source);
                assert_eq!(tag, "table");
                assert!(message.contains("schema"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
