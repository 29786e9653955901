//! In-memory annex tables with normalized code columns.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use grouper_model::{normalize_code, normalize_code_list};
use tracing::debug;

use crate::csv_utils::{TableRow, get_field, parse_csv_rows};
use crate::error::StandardsError;
use crate::hash::sha256_hex;
use crate::manifest::{MANIFEST_FILE, load_manifest, validate_manifest, verify_file};
use crate::schema::{ColumnKind, DERIVED_LISTS, TABLE_SPECS, table_spec};

/// One annex table: ordered rows of column name to value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl ReferenceTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<TableRow>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Parse a `;`-delimited table with a header row.
    pub fn from_csv_bytes(name: &str, bytes: &[u8], path: &Path) -> Result<Self, StandardsError> {
        let (columns, rows) = parse_csv_rows(bytes, path)?;
        Ok(Self::new(name, columns, rows))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Values of one column in row order, empty values skipped.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rows
            .iter()
            .map(move |row| get_field(row, column))
            .filter(|value| !value.is_empty())
    }

    fn map_column(&mut self, column: &str, f: impl Fn(&str) -> String) {
        for row in &mut self.rows {
            if let Some(value) = row.get_mut(column) {
                *value = f(value);
            }
        }
    }
}

/// Where a table was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub path: PathBuf,
    pub sha256: String,
}

/// Every annex table of one rule-book edition plus the derived lists.
///
/// Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    tables: BTreeMap<String, ReferenceTable>,
    lists: BTreeMap<String, Vec<String>>,
    sources: BTreeMap<String, TableSource>,
    rule_book_pin: Option<String>,
}

impl ReferenceStore {
    /// Load every `*.csv` file of `annex_dir` as a table named after its stem.
    ///
    /// When `manifest.toml` is present every file it lists is checked
    /// against its pinned digest first.
    pub fn load_dir(annex_dir: &Path) -> Result<Self, StandardsError> {
        let manifest_path = annex_dir.join(MANIFEST_FILE);
        let rule_book_pin = if manifest_path.is_file() {
            let manifest = load_manifest(&manifest_path)?;
            validate_manifest(&manifest)?;
            for file in &manifest.files {
                verify_file(annex_dir, file)?;
            }
            debug!(
                rule_book = %manifest.pins.rule_book,
                files = manifest.files.len(),
                "annex manifest verified"
            );
            Some(manifest.pins.rule_book)
        } else {
            None
        };

        let entries =
            std::fs::read_dir(annex_dir).map_err(|e| StandardsError::io(annex_dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StandardsError::io(annex_dir, e))?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut tables = Vec::with_capacity(paths.len());
        let mut sources = BTreeMap::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let name = name.to_string();
            let bytes = std::fs::read(&path).map_err(|e| StandardsError::io(&path, e))?;
            let table = ReferenceTable::from_csv_bytes(&name, &bytes, &path)?;
            if table_spec(&name).is_none() {
                debug!(table = %name, rows = table.len(), "loaded unrecognized annex table");
            } else {
                debug!(table = %name, rows = table.len(), "loaded annex table");
            }
            sources.insert(
                name,
                TableSource {
                    sha256: sha256_hex(&bytes),
                    path,
                },
            );
            tables.push(table);
        }

        let mut store = Self::from_tables(tables)?;
        store.sources = sources;
        store.rule_book_pin = rule_book_pin;
        Ok(store)
    }

    /// Build a store from already parsed tables.
    ///
    /// Checks that every required table and column is present, normalizes the
    /// code columns of recognized tables and derives the flattened lists.
    pub fn from_tables(
        tables: impl IntoIterator<Item = ReferenceTable>,
    ) -> Result<Self, StandardsError> {
        let mut by_name: BTreeMap<String, ReferenceTable> = tables
            .into_iter()
            .map(|table| (table.name.clone(), table))
            .collect();

        for spec in TABLE_SPECS {
            let Some(table) = by_name.get_mut(spec.name) else {
                if spec.required {
                    return Err(StandardsError::MissingTable {
                        table: spec.name.to_string(),
                    });
                }
                continue;
            };
            for column in spec.columns {
                if !table.has_column(column.name) {
                    return Err(StandardsError::MissingColumn {
                        table: spec.name.to_string(),
                        column: column.name.to_string(),
                    });
                }
                match column.kind {
                    ColumnKind::Code => table.map_column(column.name, normalize_code),
                    ColumnKind::CodeList => table.map_column(column.name, |value| {
                        normalize_code_list(value).join(",")
                    }),
                    ColumnKind::Text => {}
                }
            }
        }

        let mut lists = BTreeMap::new();
        for list in DERIVED_LISTS {
            let values = by_name
                .get(list.table)
                .map(|table| table.column_values(list.column).map(str::to_string).collect())
                .unwrap_or_default();
            lists.insert(list.name.to_string(), values);
        }

        Ok(Self {
            tables: by_name,
            lists,
            sources: BTreeMap::new(),
            rule_book_pin: None,
        })
    }

    pub fn table(&self, name: &str) -> Option<&ReferenceTable> {
        self.tables.get(name)
    }

    /// Like [`table`](Self::table) but a missing table is an error.
    pub fn require(&self, name: &str) -> Result<&ReferenceTable, StandardsError> {
        self.table(name).ok_or_else(|| StandardsError::MissingTable {
            table: name.to_string(),
        })
    }

    /// Derived list by name (`p5_signifikantne_OP_vykony`, ...).
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    pub fn tables(&self) -> impl Iterator<Item = &ReferenceTable> {
        self.tables.values()
    }

    pub fn lists(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn source(&self, table: &str) -> Option<&TableSource> {
        self.sources.get(table)
    }

    /// Rule-book edition pinned by the manifest, if one was present.
    pub fn rule_book_pin(&self) -> Option<&str> {
        self.rule_book_pin.as_deref()
    }
}
