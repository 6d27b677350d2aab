// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::record::{
    ContentRecord, MetaValue, NewRecord, RecordId, RecordStatus, UserId,
};
use crate::content::store::ContentStore;
use std::fmt;
use std::sync::Arc;

/// Marker appended to the duplicate's title.
pub const COPY_TITLE_SUFFIX: &str = " (Copy)";

/// Internal meta keys never carried over to a duplicate.
pub const RESERVED_META_KEYS: [&str; 3] = ["_old_slug", "_edit_lock", "_edit_last"];

#[derive(Debug, Clone)]
pub enum DuplicateError {
    InvalidRequest(String),
    Forbidden(String),
    NotFound(RecordId),
    Persistence(String),
}

impl fmt::Display for DuplicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            DuplicateError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            DuplicateError::NotFound(id) => write!(f, "Record not found: {}", id),
            DuplicateError::Persistence(msg) => write!(f, "Store rejected creation: {}", msg),
        }
    }
}

impl std::error::Error for DuplicateError {}

/// Copies a content record into a new draft.
///
/// Only record creation is fatal. Taxonomy, metadata, and featured-image
/// copies are best-effort: a failure there leaves the freshly created
/// record in place and is logged, never rolled back. Callers get at least
/// one record for every `Ok` return.
pub struct Duplicator {
    store: Arc<dyn ContentStore>,
}

impl Duplicator {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Duplicates `source` on behalf of `actor`, returning the new id.
    ///
    /// The duplicate is always a draft, titled `<source title> (Copy)`,
    /// and authored by `actor` rather than the source author.
    pub fn duplicate(
        &self,
        source: &ContentRecord,
        actor: UserId,
    ) -> Result<RecordId, DuplicateError> {
        let new_record = NewRecord {
            type_tag: source.type_tag.clone(),
            title: format!("{}{}", source.title, COPY_TITLE_SUFFIX),
            body: source.body.clone(),
            excerpt: source.excerpt.clone(),
            status: RecordStatus::Draft,
            author: actor,
            parent: source.parent,
            menu_order: source.menu_order,
            comment_policy: source.comment_policy,
            ping_policy: source.ping_policy,
        };

        let new_id = self
            .store
            .create_record(new_record)
            .map_err(|err| DuplicateError::Persistence(err.message().to_string()))?;

        log::info!(
            "Duplicated record {} into {} for user {}",
            source.id,
            new_id,
            actor.0
        );

        self.copy_taxonomies(source, new_id);
        self.copy_meta(source.id, new_id);
        self.copy_featured_image(source.id, new_id);

        Ok(new_id)
    }

    fn copy_taxonomies(&self, source: &ContentRecord, target: RecordId) {
        let taxonomies = match self.store.taxonomies_for_type(&source.type_tag) {
            Ok(taxonomies) => taxonomies,
            Err(err) => {
                log::warn!(
                    "Skipping taxonomy copy for record {}: {}",
                    source.id,
                    err
                );
                return;
            }
        };

        for taxonomy in taxonomies {
            let terms = match self.store.terms(source.id, &taxonomy) {
                Ok(terms) => terms,
                Err(err) => {
                    log::warn!(
                        "Skipping taxonomy '{}' for record {}: {}",
                        taxonomy,
                        source.id,
                        err
                    );
                    continue;
                }
            };
            if terms.is_empty() {
                continue;
            }
            if let Err(err) = self.store.set_terms(target, &taxonomy, &terms) {
                log::warn!(
                    "Failed to assign taxonomy '{}' on record {}: {}",
                    taxonomy,
                    target,
                    err
                );
            }
        }
    }

    fn copy_meta(&self, source: RecordId, target: RecordId) {
        let meta = match self.store.meta(source) {
            Ok(meta) => meta,
            Err(err) => {
                log::warn!("Skipping meta copy for record {}: {}", source, err);
                return;
            }
        };

        for (key, values) in meta {
            if RESERVED_META_KEYS.contains(&key.as_str()) {
                continue;
            }
            for raw in values {
                let value = MetaValue::from_storage(&raw);
                if let Err(err) = self.store.add_meta(target, &key, &value) {
                    log::warn!(
                        "Failed to copy meta '{}' to record {}: {}",
                        key,
                        target,
                        err
                    );
                }
            }
        }
    }

    fn copy_featured_image(&self, source: RecordId, target: RecordId) {
        match self.store.featured_image(source) {
            Ok(Some(image)) => {
                if let Err(err) = self.store.set_featured_image(target, image) {
                    log::warn!(
                        "Failed to copy featured image to record {}: {}",
                        target,
                        err
                    );
                }
            }
            Ok(None) => {}
            Err(err) => {
                log::warn!(
                    "Skipping featured image copy for record {}: {}",
                    source,
                    err
                );
            }
        }
    }
}
