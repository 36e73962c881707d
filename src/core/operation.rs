//! The operation vocabulary and operation lists
//!
//! An [`Operation`] is one declarative, key-level edit. An [`OperationSet`] is
//! the ordered list applied to every document of a batch. Two surface
//! syntaxes decode into the same list:
//!
//! - a **record list**, one tagged record per operation:
//!
//!   ```yaml
//!   - op: rename
//!     key: title
//!     new_key: slug
//!   - op: add_array_member
//!     key: tags
//!     value: rust
//!   ```
//!
//! - an **action map** from action name to changes, expanded in the order the
//!   actions and their entries appear:
//!
//!   ```yaml
//!   add: {author: Jane Doe}
//!   delete: [outdated_field]
//!   nest:
//!     featured_image: {new_key: cover, subkey: image, additional: {alt: ""}}
//!   rename: {abbrlink: slug}
//!   ```

use crate::error::{MattershiftError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// One key-level edit of a front matter mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Set `key` to `value`, overwriting any existing value
    Add { key: String, value: Value },
    /// Remove `key`
    Delete { key: String },
    /// Move the value of `key` to `new_key`
    Rename { key: String, new_key: String },
    /// Replace the value of an existing `key`
    Modify { key: String, value: Value },
    /// Push `value` onto the end of `key`, creating or promoting to a sequence
    Append { key: String, value: Value },
    /// Insert `value` at the front of `key`, creating or promoting to a sequence
    Prepend { key: String, value: Value },
    /// Wrap the value of `key` as `{subkey: value}` under `new_key`
    Nest {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_key: Option<String>,
        subkey: String,
        #[serde(default, skip_serializing_if = "Mapping::is_empty")]
        additional: Mapping,
    },
    /// Pull `subkey` out of the mapping under `key` into `new_key`
    Unnest {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subkey: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_key: Option<String>,
    },
    /// Set `subkey` inside the mapping under `key`
    AddSubkey {
        key: String,
        subkey: String,
        value: Value,
    },
    /// Remove `subkey` from the mapping under `key`
    DeleteSubkey { key: String, subkey: String },
    /// Replace `key` with `new_key: {key: value}`
    AddParent {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_key: Option<String>,
    },
    /// Promote every field of the mapping under `key` to the top level
    DeleteParent { key: String },
    /// Push `value` onto the sequence under `key`
    AddArrayMember { key: String, value: Value },
    /// Remove element `index` from the sequence under `key`
    DeleteArrayMember { key: String, index: i64 },
    /// Replace element `index` of the sequence under `key`
    RenameArrayMember {
        key: String,
        index: i64,
        value: Value,
    },
}

impl Operation {
    /// The top-level key this operation targets
    pub fn key(&self) -> &str {
        match self {
            Self::Add { key, .. }
            | Self::Delete { key }
            | Self::Rename { key, .. }
            | Self::Modify { key, .. }
            | Self::Append { key, .. }
            | Self::Prepend { key, .. }
            | Self::Nest { key, .. }
            | Self::Unnest { key, .. }
            | Self::AddSubkey { key, .. }
            | Self::DeleteSubkey { key, .. }
            | Self::AddParent { key, .. }
            | Self::DeleteParent { key }
            | Self::AddArrayMember { key, .. }
            | Self::DeleteArrayMember { key, .. }
            | Self::RenameArrayMember { key, .. } => key,
        }
    }

    /// The record-syntax tag of this operation
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Rename { .. } => "rename",
            Self::Modify { .. } => "modify",
            Self::Append { .. } => "append",
            Self::Prepend { .. } => "prepend",
            Self::Nest { .. } => "nest",
            Self::Unnest { .. } => "unnest",
            Self::AddSubkey { .. } => "add_subkey",
            Self::DeleteSubkey { .. } => "delete_subkey",
            Self::AddParent { .. } => "add_parent",
            Self::DeleteParent { .. } => "delete_parent",
            Self::AddArrayMember { .. } => "add_array_member",
            Self::DeleteArrayMember { .. } => "delete_array_member",
            Self::RenameArrayMember { .. } => "rename_array_member",
        }
    }
}

/// An ordered list of operations shared read-only by a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OperationSet {
    operations: Vec<Operation>,
}

impl OperationSet {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Append an operation, builder style
    pub fn with(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }

    /// Decode YAML text in either surface syntax
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| MattershiftError::invalid_operations(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode JSON text in either surface syntax
    pub fn from_json_str(text: &str) -> Result<Self> {
        // Straight into a YAML value so object keys keep their written order.
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Decode an already-parsed document
    ///
    /// A sequence is read as a record list, a mapping as an action map, and
    /// an empty document as an empty list.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Sequence(_) => serde_yaml::from_value::<Vec<Operation>>(value)
                .map(Self::new)
                .map_err(|e| MattershiftError::invalid_operations(e.to_string())),
            Value::Mapping(actions) => expand_action_map(&actions).map(Self::new),
            _ => Err(MattershiftError::invalid_operations(
                "expected a list of operation records or a mapping of actions",
            )),
        }
    }

    /// Read an operation file; `.json` files are decoded as JSON, all others as YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Serialize in the record syntax
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.operations)?)
    }

    /// Serialize in the record syntax as pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.operations)?)
    }
}

impl From<Vec<Operation>> for OperationSet {
    fn from(operations: Vec<Operation>) -> Self {
        Self::new(operations)
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OperationSet {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[derive(Deserialize)]
struct NestSpec {
    subkey: String,
    #[serde(default)]
    new_key: Option<String>,
    #[serde(default)]
    additional: Mapping,
}

#[derive(Default, Deserialize)]
struct UnnestSpec {
    #[serde(default)]
    subkey: Option<String>,
    #[serde(default)]
    new_key: Option<String>,
}

fn expand_action_map(actions: &Mapping) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();

    for (action, changes) in actions {
        let action = string_of("action name", action)?;

        match action.as_str() {
            "add" => {
                for (key, value) in entries(&action, changes)? {
                    operations.push(Operation::Add {
                        key: string_of(&action, key)?,
                        value: value.clone(),
                    });
                }
            }
            "delete" => {
                for key in one_or_many(changes) {
                    operations.push(Operation::Delete {
                        key: string_of(&action, key)?,
                    });
                }
            }
            "rename" => {
                for (key, new_key) in entries(&action, changes)? {
                    operations.push(Operation::Rename {
                        key: string_of(&action, key)?,
                        new_key: string_of(&action, new_key)?,
                    });
                }
            }
            "modify" | "append" | "prepend" | "add_array_member" => {
                for (key, value) in entries(&action, changes)? {
                    let key = string_of(&action, key)?;
                    let value = value.clone();
                    operations.push(match action.as_str() {
                        "modify" => Operation::Modify { key, value },
                        "append" => Operation::Append { key, value },
                        "prepend" => Operation::Prepend { key, value },
                        _ => Operation::AddArrayMember { key, value },
                    });
                }
            }
            "nest" => {
                for (key, spec) in entries(&action, changes)? {
                    let spec: NestSpec = serde_yaml::from_value(spec.clone())
                        .map_err(|e| invalid(&action, e))?;
                    operations.push(Operation::Nest {
                        key: string_of(&action, key)?,
                        new_key: spec.new_key,
                        subkey: spec.subkey,
                        additional: spec.additional,
                    });
                }
            }
            "unnest" => {
                for (key, spec) in entries(&action, changes)? {
                    let spec: UnnestSpec = if spec.is_null() {
                        UnnestSpec::default()
                    } else {
                        serde_yaml::from_value(spec.clone()).map_err(|e| invalid(&action, e))?
                    };
                    operations.push(Operation::Unnest {
                        key: string_of(&action, key)?,
                        subkey: spec.subkey,
                        new_key: spec.new_key,
                    });
                }
            }
            "add_subkey" => {
                for (key, fields) in entries(&action, changes)? {
                    let key = string_of(&action, key)?;
                    for (subkey, value) in entries(&action, fields)? {
                        operations.push(Operation::AddSubkey {
                            key: key.clone(),
                            subkey: string_of(&action, subkey)?,
                            value: value.clone(),
                        });
                    }
                }
            }
            "delete_subkey" => {
                for (key, subkeys) in entries(&action, changes)? {
                    let key = string_of(&action, key)?;
                    for subkey in one_or_many(subkeys) {
                        operations.push(Operation::DeleteSubkey {
                            key: key.clone(),
                            subkey: string_of(&action, subkey)?,
                        });
                    }
                }
            }
            "add_parent" => {
                for (key, new_key) in entries(&action, changes)? {
                    let new_key = if new_key.is_null() {
                        None
                    } else {
                        Some(string_of(&action, new_key)?)
                    };
                    operations.push(Operation::AddParent {
                        key: string_of(&action, key)?,
                        new_key,
                    });
                }
            }
            "delete_parent" => {
                for key in one_or_many(changes) {
                    operations.push(Operation::DeleteParent {
                        key: string_of(&action, key)?,
                    });
                }
            }
            "delete_array_member" => {
                for (key, indexes) in entries(&action, changes)? {
                    let key = string_of(&action, key)?;
                    for index in one_or_many(indexes) {
                        operations.push(Operation::DeleteArrayMember {
                            key: key.clone(),
                            index: index_of(&action, index)?,
                        });
                    }
                }
            }
            "rename_array_member" => {
                for (key, members) in entries(&action, changes)? {
                    let key = string_of(&action, key)?;
                    for (index, value) in entries(&action, members)? {
                        operations.push(Operation::RenameArrayMember {
                            key: key.clone(),
                            index: index_of(&action, index)?,
                            value: value.clone(),
                        });
                    }
                }
            }
            unknown => warn!("Ignoring unknown action '{}' in operation list", unknown),
        }
    }

    Ok(operations)
}

fn entries<'a>(action: &str, changes: &'a Value) -> Result<&'a Mapping> {
    changes.as_mapping().ok_or_else(|| {
        MattershiftError::invalid_operations(format!("'{}' expects a mapping", action))
    })
}

fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Sequence(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

fn string_of(action: &str, value: &Value) -> Result<String> {
    value.as_str().map(str::to_owned).ok_or_else(|| {
        MattershiftError::invalid_operations(format!(
            "'{}' expects a string, found {:?}",
            action, value
        ))
    })
}

fn index_of(action: &str, value: &Value) -> Result<i64> {
    value.as_i64().ok_or_else(|| {
        MattershiftError::invalid_operations(format!(
            "'{}' expects an integer index, found {:?}",
            action, value
        ))
    })
}

fn invalid(action: &str, err: serde_yaml::Error) -> MattershiftError {
    MattershiftError::invalid_operations(format!("'{}': {}", action, err))
}
