//! Display column definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Callback rendering one cell from a row.
pub type CellCallback = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Where a cell's text comes from.
#[derive(Clone)]
pub enum CellSource {
    /// Dotted path into the row object (`"profile.city"`). Missing values
    /// render empty.
    Path(String),
    /// Fixed text, the same on every row.
    Literal(String),
    Callback(CellCallback),
}

impl CellSource {
    /// Render the cell text for a row.
    pub fn render(&self, row: &Value) -> String {
        match self {
            Self::Path(path) => lookup(row, path).map(scalar_text).unwrap_or_default(),
            Self::Literal(text) => text.clone(),
            Self::Callback(callback) => callback(row),
        }
    }
}

impl fmt::Debug for CellSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Walk a dotted path through objects (and arrays, by index).
fn lookup<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(row, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `created_at` → `Created At`.
pub(crate) fn title_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// A display column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) hidden: bool,
    pub(crate) sortable: bool,
    pub(crate) classname: String,
    pub(crate) source: CellSource,
}

impl TableColumn {
    /// Column reading the row field `name`, labelled with its title case.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: title_case(&name),
            source: CellSource::Path(name.clone()),
            name,
            hidden: false,
            sortable: true,
            classname: String::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// CSS class name for the rendering layer.
    pub fn classname(mut self, classname: impl Into<String>) -> Self {
        self.classname = classname.into();
        self
    }

    /// Read the cell from a dotted path instead of the column name.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.source = CellSource::Path(path.into());
        self
    }

    pub fn literal(mut self, text: impl Into<String>) -> Self {
        self.source = CellSource::Literal(text.into());
        self
    }

    pub fn callback(mut self, callback: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.source = CellSource::Callback(Arc::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn header(&self) -> ColumnHeader {
        ColumnHeader {
            name: self.name.clone(),
            label: self.label.clone(),
            hidden: self.hidden,
            sortable: self.sortable,
            classname: self.classname.clone(),
        }
    }
}

/// Declarative column definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Dotted row path (defaults to the name).
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default = "default_sortable")]
    pub sortable: bool,

    #[serde(default)]
    pub classname: String,
}

fn default_sortable() -> bool {
    true
}

impl From<ColumnSpec> for TableColumn {
    fn from(spec: ColumnSpec) -> Self {
        let mut column = TableColumn::new(spec.name)
            .sortable(spec.sortable)
            .classname(spec.classname);
        if let Some(label) = spec.label {
            column = column.label(label);
        }
        if let Some(path) = spec.path {
            column = column.path(path);
        }
        if spec.hidden {
            column = column.hidden();
        }
        column
    }
}

/// Column header as handed to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnHeader {
    pub name: String,
    pub label: String,
    pub hidden: bool,
    pub sortable: bool,
    pub classname: String,
}
