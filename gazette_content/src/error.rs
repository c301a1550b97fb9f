// Copyright 2026 the Gazette Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store errors.

use crate::record::ContentKind;

/// Errors returned by [`ContentStore`](crate::store::ContentStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// No record of `kind` has this id.
    #[error("{kind} `{id}` not found")]
    NotFound {
        /// Table that was searched.
        kind: ContentKind,
        /// Requested id.
        id: String,
    },
    /// A record failed validation before being written.
    #[error("invalid {kind}: {reason}")]
    Validation {
        /// Table the record belongs to.
        kind: ContentKind,
        /// What was wrong.
        reason: &'static str,
    },
    /// An image already exists at this path.
    #[error("image `{0}` already exists")]
    ImageExists(String),
    /// No image is stored at this path.
    #[error("image `{0}` not found")]
    ImageNotFound(String),
    /// Upload rejected before storing.
    #[error("invalid image name `{0}`")]
    InvalidImageName(String),
}
