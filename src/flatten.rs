//! Attribute merging and flattening.
//!
//! Handlers accumulate attributes as a tree: each `with_group` call opens a
//! scope, and attributes added afterwards land inside the innermost scope.
//! Before rendering, the tree is merged with the record's own attributes,
//! pruned of empty entries and expanded into dotted keys.

use std::collections::HashMap;

use crate::attr::{Attr, Value};

/// Separator placed between group names in flattened keys.
pub const KEY_SEPARATOR: char = '.';

/// A scalar attribute addressed by its full dotted key.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatAttr {
    pub key: String,
    pub value: Value,
}

impl FlatAttr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Insert `new_attrs` under the group path `groups` within `actual`.
///
/// Existing group nodes along the path are reused when their key matches;
/// missing ones are appended. `actual` is never modified: the result is a
/// fresh tree.
pub fn append_attrs_to_group(groups: &[String], actual: &[Attr], new_attrs: &[Attr]) -> Vec<Attr> {
    let mut out = actual.to_vec();
    let Some((head, rest)) = groups.split_first() else {
        out.extend_from_slice(new_attrs);
        return uniq_attrs(out);
    };

    for attr in &mut out {
        if attr.key == *head
            && let Value::Group(inner) = &attr.value
        {
            let merged = append_attrs_to_group(rest, inner, new_attrs);
            attr.value = Value::Group(merged);
            return out;
        }
    }

    out.push(Attr::group(
        head.clone(),
        append_attrs_to_group(rest, &[], new_attrs),
    ));
    uniq_attrs(out)
}

/// Collapse duplicate keys: the last value wins but keeps the position of
/// the first occurrence.
pub fn uniq_attrs(attrs: Vec<Attr>) -> Vec<Attr> {
    let mut out: Vec<Attr> = Vec::with_capacity(attrs.len());
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(attrs.len());
    for attr in attrs {
        match seen.get(&attr.key) {
            Some(&idx) => out[idx] = attr,
            None => {
                seen.insert(attr.key.clone(), out.len());
                out.push(attr);
            }
        }
    }
    out
}

/// Drop keyless attributes, empty values, and groups left empty after
/// their own members were pruned.
pub fn remove_empty_attrs(attrs: Vec<Attr>) -> Vec<Attr> {
    attrs
        .into_iter()
        .filter_map(|attr| {
            if attr.key.is_empty() {
                return None;
            }
            match attr.value {
                Value::Group(inner) => {
                    let inner = remove_empty_attrs(inner);
                    (!inner.is_empty()).then(|| Attr::group(attr.key, inner))
                }
                value if value.is_empty() => None,
                value => Some(Attr {
                    key: attr.key,
                    value,
                }),
            }
        })
        .collect()
}

/// Expand groups into dotted keys, preserving declaration order.
pub fn flatten(attrs: &[Attr]) -> Vec<FlatAttr> {
    let mut out = Vec::with_capacity(attrs.len());
    flatten_into("", attrs, &mut out);
    out
}

fn flatten_into(prefix: &str, attrs: &[Attr], out: &mut Vec<FlatAttr>) {
    for attr in attrs {
        let key = if prefix.is_empty() {
            attr.key.clone()
        } else {
            format!("{prefix}{KEY_SEPARATOR}{}", attr.key)
        };
        match &attr.value {
            Value::Group(inner) => flatten_into(&key, inner, out),
            value => out.push(FlatAttr {
                key,
                value: value.clone(),
            }),
        }
    }
}

/// Append a record's attributes after the accumulated ones, each wrapped in
/// the open group path. Unlike [`append_attrs_to_group`], nothing is
/// de-duplicated: repeated keys on a record are all kept, in order.
pub fn append_record_attrs(groups: &[String], accumulated: &[Attr], record_attrs: &[Attr]) -> Vec<Attr> {
    let mut out = Vec::with_capacity(accumulated.len() + record_attrs.len());
    out.extend_from_slice(accumulated);
    out.extend(record_attrs.iter().map(|attr| {
        groups
            .iter()
            .rev()
            .fold(attr.clone(), |inner, group| Attr::group(group.clone(), vec![inner]))
    }));
    out
}

/// Merge handler state with a record's attributes and flatten the result.
pub fn flatten_record_attrs(
    groups: &[String],
    accumulated: &[Attr],
    record_attrs: &[Attr],
) -> Vec<FlatAttr> {
    let merged = append_record_attrs(groups, accumulated, record_attrs);
    flatten(&remove_empty_attrs(merged))
}
