//! Dataset parameter conversion
//!
//! Dataset references arrive at the pipeline boundary either as raw JSON
//! text or as an already-structured mapping. Both variants converge on one
//! registry constructor; an already-resolved dataset passes through
//! unchanged. The registry is an explicit object handed to callers rather
//! than a process-wide lookup.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Access mode of a dataset reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Read,
    Write,
    ReadWrite,
}

/// Executor-supplied construction context
///
/// Carries the facts a dataset needs from its host pipeline: where the
/// datastore lives and which program is currently running.
#[derive(Debug, Clone)]
pub struct ExecutorContext {
    /// Root of the batch datastore
    pub datastore_path: PathBuf,
    /// Name of the currently running program
    pub current_program_name: String,
}

impl ExecutorContext {
    pub fn new(datastore_path: impl Into<PathBuf>, current_program_name: impl Into<String>) -> Self {
        Self {
            datastore_path: datastore_path.into(),
            current_program_name: current_program_name.into(),
        }
    }
}

/// Keyword mapping a dataset parameter deserializes into
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSpec {
    /// Dataset kind, resolved against the registry
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Dataset name (PascalCase by convention)
    pub name: String,

    /// Program the dataset belongs to; defaults to the running program
    #[serde(default)]
    pub program_name: Option<String>,

    /// Access mode
    #[serde(default)]
    pub mode: Mode,
}

fn default_kind() -> String {
    "batch".to_string()
}

/// A fully-constructed dataset reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    pub mode: Mode,
}

impl Dataset {
    /// Constructor for the batch dataset kind
    pub fn batch(spec: DatasetSpec) -> Result<Self> {
        Ok(Self {
            kind: spec.kind,
            name: spec.name,
            program_name: spec.program_name,
            mode: spec.mode,
        })
    }
}

/// Constructor registered for one dataset kind
pub type DatasetFactory = fn(DatasetSpec) -> Result<Dataset>;

/// Registry of dataset kinds
///
/// Passed into converters explicitly; the host wires it up once at startup.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    factories: BTreeMap<String, DatasetFactory>,
}

impl DatasetRegistry {
    /// A registry with the built-in `batch` kind registered
    pub fn new() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };
        registry.register("batch", Dataset::batch);
        registry
    }

    /// Register a constructor for a dataset kind, replacing any previous one
    pub fn register(&mut self, kind: impl Into<String>, factory: DatasetFactory) {
        self.factories.insert(kind.into(), factory);
    }

    /// Construct a dataset from a keyword mapping
    pub fn from_keys(&self, keys: &Map<String, Value>) -> Result<Dataset> {
        let spec: DatasetSpec = serde_json::from_value(Value::Object(keys.clone()))
            .map_err(|e| Error::InvalidDataset(e.to_string()))?;

        if spec.name.is_empty() {
            return Err(Error::InvalidDataset("dataset name is empty".into()));
        }

        let factory = self
            .factories
            .get(&spec.kind)
            .ok_or_else(|| Error::InvalidDataset(format!("unknown dataset kind '{}'", spec.kind)))?;

        factory(spec)
    }
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A dataset parameter as received at the boundary, before resolution
#[derive(Debug, Clone)]
pub enum DatasetValue {
    /// Raw JSON text, e.g. from a command-line argument
    Text(String),
    /// An already-parsed keyword mapping
    Mapping(Map<String, Value>),
    /// A constructed dataset, passed through unchanged
    Resolved(Dataset),
}

impl DatasetValue {
    /// Resolve this parameter into a dataset through the registry
    pub fn resolve(self, registry: &DatasetRegistry) -> Result<Dataset> {
        match self {
            DatasetValue::Text(text) => {
                let value: Value =
                    serde_json::from_str(&text).map_err(Error::MalformedParam)?;
                let Value::Object(keys) = value else {
                    return Err(Error::InvalidDataset(
                        "dataset parameter must be a JSON object".into(),
                    ));
                };
                registry.from_keys(&keys)
            }
            DatasetValue::Mapping(keys) => registry.from_keys(&keys),
            DatasetValue::Resolved(dataset) => Ok(dataset),
        }
    }
}
