//! Ordered application of operations to a front matter mapping
//!
//! Every operation is a guarded mutation: when its precondition does not hold
//! for a document it leaves the mapping untouched and the run carries on. This
//! lets one operation list be reused across documents with different shapes.

use crate::core::{Frontmatter, Operation, OperationSet};
use log::debug;
use serde_yaml::{Mapping, Value};

/// Apply `operations` in order to `frontmatter`
pub fn apply(mut frontmatter: Frontmatter, operations: &OperationSet) -> Frontmatter {
    for operation in operations {
        if !operation.apply_to(&mut frontmatter) {
            debug!(
                "Skipped {} on '{}': precondition not met",
                operation.name(),
                operation.key()
            );
        }
    }
    frontmatter
}

impl Operation {
    /// Apply this operation in place
    ///
    /// Returns `false` when the precondition did not hold and nothing changed.
    pub fn apply_to(&self, fm: &mut Frontmatter) -> bool {
        match self {
            Self::Add { key, value } => {
                fm.insert(key, value.clone());
                true
            }
            Self::Delete { key } => fm.remove(key).is_some(),
            Self::Rename { key, new_key } => match fm.remove(key) {
                Some(value) => {
                    fm.insert(new_key, value);
                    true
                }
                None => false,
            },
            Self::Modify { key, value } => match fm.get_mut(key) {
                Some(slot) => {
                    *slot = value.clone();
                    true
                }
                None => false,
            },
            Self::Append { key, value } => {
                match fm.get_mut(key) {
                    Some(Value::Sequence(items)) => items.push(value.clone()),
                    Some(slot) => {
                        let old = std::mem::replace(slot, Value::Null);
                        *slot = Value::Sequence(vec![old, value.clone()]);
                    }
                    None => {
                        fm.insert(key, Value::Sequence(vec![value.clone()]));
                    }
                }
                true
            }
            Self::Prepend { key, value } => {
                match fm.get_mut(key) {
                    Some(Value::Sequence(items)) => items.insert(0, value.clone()),
                    Some(slot) => {
                        let old = std::mem::replace(slot, Value::Null);
                        *slot = Value::Sequence(vec![value.clone(), old]);
                    }
                    None => {
                        fm.insert(key, Value::Sequence(vec![value.clone()]));
                    }
                }
                true
            }
            Self::Nest {
                key,
                new_key,
                subkey,
                additional,
            } => {
                let Some(value) = fm.remove(key) else {
                    return false;
                };
                let mut nested = Mapping::new();
                nested.insert(Value::String(subkey.clone()), value);
                for (k, v) in additional {
                    nested.insert(k.clone(), v.clone());
                }
                fm.insert(new_key.as_deref().unwrap_or(key), Value::Mapping(nested));
                true
            }
            Self::Unnest {
                key,
                subkey,
                new_key,
            } => {
                let Some(Value::Mapping(nested)) = fm.get(key) else {
                    return false;
                };
                // Without an explicit subkey the first nested field is used.
                let subkey = match subkey {
                    Some(subkey) => Value::String(subkey.clone()),
                    None => match nested.iter().next() {
                        Some((first, _)) => first.clone(),
                        None => return false,
                    },
                };
                let Some(extracted) = nested.get(&subkey).cloned() else {
                    return false;
                };

                let target = new_key.as_deref().unwrap_or(key);
                fm.insert(target, extracted);
                if target != key {
                    fm.remove(key);
                }
                true
            }
            Self::AddSubkey { key, subkey, value } => match fm.get_mut(key) {
                Some(Value::Mapping(nested)) => {
                    nested.insert(Value::String(subkey.clone()), value.clone());
                    true
                }
                _ => false,
            },
            Self::DeleteSubkey { key, subkey } => match fm.get_mut(key) {
                Some(Value::Mapping(nested)) => nested.shift_remove(subkey.as_str()).is_some(),
                _ => false,
            },
            Self::AddParent { key, new_key } => {
                let target = new_key.as_deref().unwrap_or(key);
                if target == key {
                    let Some(slot) = fm.get_mut(key) else {
                        return false;
                    };
                    let old = std::mem::replace(slot, Value::Null);
                    *slot = wrap(key, old);
                } else {
                    let Some(old) = fm.remove(key) else {
                        return false;
                    };
                    fm.insert(target, wrap(key, old));
                }
                true
            }
            Self::DeleteParent { key } => {
                if !matches!(fm.get(key), Some(Value::Mapping(_))) {
                    return false;
                }
                // The parent goes first so a child sharing its name survives promotion.
                if let Some(Value::Mapping(nested)) = fm.remove(key) {
                    for (k, v) in nested {
                        fm.insert_entry(k, v);
                    }
                }
                true
            }
            Self::AddArrayMember { key, value } => match fm.get_mut(key) {
                Some(Value::Sequence(items)) => {
                    items.push(value.clone());
                    true
                }
                _ => false,
            },
            Self::DeleteArrayMember { key, index } => match fm.get_mut(key) {
                Some(Value::Sequence(items)) => match checked_index(*index, items.len()) {
                    Some(i) => {
                        items.remove(i);
                        true
                    }
                    None => false,
                },
                _ => false,
            },
            Self::RenameArrayMember { key, index, value } => match fm.get_mut(key) {
                Some(Value::Sequence(items)) => match checked_index(*index, items.len()) {
                    Some(i) => {
                        items[i] = value.clone();
                        true
                    }
                    None => false,
                },
                _ => false,
            },
        }
    }
}

fn wrap(key: &str, value: Value) -> Value {
    let mut parent = Mapping::new();
    parent.insert(Value::String(key.to_owned()), value);
    Value::Mapping(parent)
}

fn checked_index(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}
