//! CSV file source: one output port per column.

use serde::{Deserialize, Serialize};
use serde_json::json;
use senal_graph::{NodeContext, NodeError, Operator, PortLayout, Ui, Value, ValueKind};

use crate::csv::{load_csv, CsvData, CsvError};

/// Parameters of [`CsvNode`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvParams {
    /// Path of the CSV file; empty means "no file yet".
    #[serde(rename = "filePath")]
    pub file_path: String,
}

/// Source exposing each column of a CSV file as an output port.
///
/// The file is parsed once at construction because the column set
/// determines the port layout; changing the path means recreating the
/// node. An empty path yields a node with no outputs.
#[derive(Debug)]
pub struct CsvNode {
    file_path: String,
    data: CsvData,
}

impl CsvNode {
    /// Creates the source, parsing `file_path` unless it is empty.
    pub fn new(params: CsvParams) -> Result<Self, CsvError> {
        let data = if params.file_path.is_empty() {
            CsvData::new()
        } else {
            load_csv(&params.file_path)?
        };

        Ok(Self {
            file_path: params.file_path,
            data,
        })
    }

    /// Column names, in file order.
    pub fn columns(&self) -> Vec<&str> {
        self.data.column_names()
    }
}

impl Operator for CsvNode {
    fn type_name(&self) -> &'static str {
        "CSVNode"
    }

    fn label(&self) -> &'static str {
        "CSV Import"
    }

    fn ports(&self) -> PortLayout {
        let mut layout = PortLayout::new();
        for (name, _) in &self.data.columns {
            layout = layout.output(name.clone(), ValueKind::Signal);
        }
        layout
    }

    fn parameters(&self) -> serde_json::Value {
        json!({ "filePath": self.file_path })
    }

    fn compute(&self, port: &str, _ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        let samples = self
            .data
            .column(port)
            .ok_or_else(|| NodeError::operator(format!("no CSV column named '{port}'")))?;
        Ok(Value::signal(samples.to_vec()))
    }

    fn render(&mut self, ui: &mut dyn Ui, _ctx: &NodeContext<'_>) {
        if self.file_path.is_empty() {
            ui.text("File: (none)");
        } else {
            ui.text(&format!("File: {}", self.file_path));
        }
        ui.text(&format!(
            "Columns: {}, Rows: {}",
            self.data.columns.len(),
            self.data.rows()
        ));
    }
}
