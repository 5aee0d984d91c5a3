// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Normalizers for the optional array fields of a message.
//!
//! All of them share one policy:
//!
//! | input            | result                         |
//! |------------------|--------------------------------|
//! | missing / `[]`   | `Ok(None)` (field is omitted)  |
//! | `null`           | `Err(ExpectedArray)`           |
//! | non-array        | `Err(ExpectedArray)`           |
//! | array            | every element checked + copied |

use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{
    assert_allowed_keys, assert_nullable_number, assert_nullable_string, assert_object,
    assert_string, field_path, index_path, Object,
};
use crate::types::{FileInfo, HiddenMessageInfo, ImageInfo, SearchResult, Segment};

const ATTACHMENT_KEYS: &[&str] = &["filename", "originalName"];
const SEARCH_RESULT_KEYS: &[&str] = &["url", "title", "domain"];
const HIDDEN_INFO_KEYS: &[&str] = &["category", "title", "depth", "content"];
const TEXT_SEGMENT_KEYS: &[&str] = &["type", "content"];
const HIDDEN_SEGMENT_KEYS: &[&str] = &["type", "category", "title", "depth", "content"];

/// Apply the shared array policy, then run `element` on each item with its
/// indexed context path.
fn normalize_array<T>(
    value: Option<&Value>,
    context: &str,
    element: impl Fn(&Value, usize, &str) -> SchemaResult<T>,
) -> SchemaResult<Option<Vec<T>>> {
    let items = match value {
        None => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(SchemaError::ExpectedArray {
                context: context.to_string(),
            })
        }
    };
    if items.is_empty() {
        return Ok(None);
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| element(item, i, &index_path(context, i)))
        .collect::<SchemaResult<Vec<T>>>()
        .map(Some)
}

/// Check an element is an object with only `allowed` keys.
fn closed_object<'a>(
    value: &'a Value,
    allowed: &[&str],
    context: &str,
) -> SchemaResult<&'a Object> {
    let object = assert_object(value, context)?;
    assert_allowed_keys(object, allowed, context)?;
    Ok(object)
}

fn attachment_fields(object: &Object, context: &str) -> SchemaResult<(String, Option<String>)> {
    let filename = assert_string(object.get("filename"), &field_path(context, "filename"))?;
    let original_name =
        assert_nullable_string(object.get("originalName"), &field_path(context, "originalName"))?;
    Ok((filename, original_name))
}

pub fn normalize_images(
    value: Option<&Value>,
    context: &str,
) -> SchemaResult<Option<Vec<ImageInfo>>> {
    normalize_array(value, context, |item, _, ctx| {
        let object = closed_object(item, ATTACHMENT_KEYS, ctx)?;
        let (filename, original_name) = attachment_fields(object, ctx)?;
        Ok(ImageInfo { filename, original_name })
    })
}

pub fn normalize_files(
    value: Option<&Value>,
    context: &str,
) -> SchemaResult<Option<Vec<FileInfo>>> {
    normalize_array(value, context, |item, _, ctx| {
        let object = closed_object(item, ATTACHMENT_KEYS, ctx)?;
        let (filename, original_name) = attachment_fields(object, ctx)?;
        Ok(FileInfo { filename, original_name })
    })
}

pub fn normalize_search_queries(
    value: Option<&Value>,
    context: &str,
) -> SchemaResult<Option<Vec<String>>> {
    normalize_array(value, context, |item, _, ctx| assert_string(Some(item), ctx))
}

pub fn normalize_search_results(
    value: Option<&Value>,
    context: &str,
) -> SchemaResult<Option<Vec<SearchResult>>> {
    normalize_array(value, context, |item, _, ctx| {
        let object = closed_object(item, SEARCH_RESULT_KEYS, ctx)?;
        Ok(SearchResult {
            url: assert_string(object.get("url"), &field_path(ctx, "url"))?,
            title: assert_string(object.get("title"), &field_path(ctx, "title"))?,
            domain: assert_nullable_string(object.get("domain"), &field_path(ctx, "domain"))?,
        })
    })
}

/// Read the four fields of a hidden annotation from an already key-checked object.
pub(crate) fn hidden_info_fields(
    object: &Object,
    context: &str,
) -> SchemaResult<HiddenMessageInfo> {
    Ok(HiddenMessageInfo {
        category: assert_string(object.get("category"), &field_path(context, "category"))?,
        title: assert_nullable_string(object.get("title"), &field_path(context, "title"))?,
        depth: assert_nullable_number(object.get("depth"), &field_path(context, "depth"))?,
        content: assert_string(object.get("content"), &field_path(context, "content"))?,
    })
}

pub fn normalize_hidden_messages(
    value: Option<&Value>,
    context: &str,
) -> SchemaResult<Option<Vec<HiddenMessageInfo>>> {
    normalize_array(value, context, |item, _, ctx| {
        let object = closed_object(item, HIDDEN_INFO_KEYS, ctx)?;
        hidden_info_fields(object, ctx)
    })
}

pub fn normalize_segments(
    value: Option<&Value>,
    context: &str,
) -> SchemaResult<Option<Vec<Segment>>> {
    normalize_array(value, context, |item, index, ctx| {
        let object = assert_object(item, ctx)?;
        match object.get("type") {
            Some(Value::String(t)) if t == "text" => {
                assert_allowed_keys(object, TEXT_SEGMENT_KEYS, ctx)?;
                Ok(Segment::Text {
                    content: assert_string(object.get("content"), &field_path(ctx, "content"))?,
                })
            }
            Some(Value::String(t)) if t == "hidden" => {
                assert_allowed_keys(object, HIDDEN_SEGMENT_KEYS, ctx)?;
                hidden_info_fields(object, ctx).map(Segment::Hidden)
            }
            other => Err(SchemaError::InvalidSegmentType {
                segment_type: match other {
                    Some(Value::String(t)) => t.clone(),
                    Some(v) => v.to_string(),
                    None => "undefined".to_string(),
                },
                index,
                context: context.to_string(),
            }),
        }
    })
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
