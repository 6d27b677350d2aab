// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::record::RecordId;
use serde::Deserialize;

/// Settings for the duplication extension. The host deserializes this as
/// part of its own configuration; every field has a sensible default.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateConfig {
    #[serde(default = "default_admin_path")]
    pub admin_path: String,
    #[serde(default = "default_listing_path")]
    pub listing_path: String,
    /// Lifetime of issued action tokens. The host passes this to
    /// `ActionTokenStore::with_expiry_seconds` when building the store.
    #[serde(default = "default_token_expiry_seconds")]
    pub token_expiry_seconds: u64,
}

fn default_admin_path() -> String {
    "/admin".to_string()
}

fn default_listing_path() -> String {
    "/content".to_string()
}

fn default_token_expiry_seconds() -> u64 {
    crate::util::ACTION_TOKEN_EXPIRY_SECONDS
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        DuplicateConfig {
            admin_path: default_admin_path(),
            listing_path: default_listing_path(),
            token_expiry_seconds: default_token_expiry_seconds(),
        }
    }
}

impl DuplicateConfig {
    /// Path of the admin content listing, e.g. `/admin/content`.
    pub fn listing_url(&self) -> String {
        format!(
            "{}{}",
            normalize_path(&self.admin_path),
            normalize_path(&self.listing_path)
        )
    }

    /// Path the duplicate action endpoint is mounted on.
    pub fn action_url(&self) -> String {
        format!("{}/action", self.listing_url())
    }

    /// Edit page of a record, used by the success notice.
    pub fn edit_url(&self, id: RecordId) -> String {
        format!("{}/{}/edit", self.listing_url(), id)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
