// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::record::{
    AttachmentId, ContentRecord, MetaValue, NewRecord, RawMeta, RecordId, TermId,
};
use std::fmt;

/// The store rejected an operation; the message is surfaced to callers.
#[derive(Debug, Clone)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content store error: {}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// The content-store capability injected into the duplication components.
///
/// Hosts back this with their persistent store; tests and embedded setups
/// use [`MemoryContentStore`](crate::content::MemoryContentStore).
pub trait ContentStore: Send + Sync {
    fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StoreError>;

    /// Persists a new record and returns its freshly allocated id.
    fn create_record(&self, record: NewRecord) -> Result<RecordId, StoreError>;

    /// Taxonomies applicable to records of the given type.
    fn taxonomies_for_type(&self, type_tag: &str) -> Result<Vec<String>, StoreError>;

    fn terms(&self, id: RecordId, taxonomy: &str) -> Result<Vec<TermId>, StoreError>;

    /// Replaces the record's assignment set for the taxonomy. Replacement
    /// rather than append keeps repeated copies idempotent.
    fn set_terms(&self, id: RecordId, taxonomy: &str, terms: &[TermId]) -> Result<(), StoreError>;

    /// All metadata pairs in their raw storage representation.
    fn meta(&self, id: RecordId) -> Result<RawMeta, StoreError>;

    /// Appends one value under the key, preserving existing values.
    fn add_meta(&self, id: RecordId, key: &str, value: &MetaValue) -> Result<(), StoreError>;

    fn featured_image(&self, id: RecordId) -> Result<Option<AttachmentId>, StoreError>;

    fn set_featured_image(&self, id: RecordId, image: AttachmentId) -> Result<(), StoreError>;
}
