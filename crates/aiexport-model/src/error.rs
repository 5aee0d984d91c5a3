// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use thiserror::Error;

/// Every way a conversation document can fail validation.
///
/// The `context` carried by each variant is a dotted/indexed field path such
/// as `Message[2].images[0].filename`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("[AIExport] Unexpected field \"{key}\" in {context}")]
    UnexpectedField { key: String, context: String },

    #[error("[AIExport] Expected {expected} for {context}")]
    TypeMismatch { expected: &'static str, context: String },

    #[error("[AIExport] Expected array for {context}")]
    ExpectedArray { context: String },

    #[error("[AIExport] Invalid message type for {context}")]
    InvalidVariant { context: String },

    #[error("[AIExport] Invalid segment type \"{segment_type}\" at index {index} in {context}")]
    InvalidSegmentType {
        segment_type: String,
        index: usize,
        context: String,
    },

    #[error("[AIExport] Could not serialize {context}: {message}")]
    Serialization { context: String, message: String },
}

pub type SchemaResult<T> = Result<T, SchemaError>;
