// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::admin::DUPLICATE_ACTION;
use crate::config::DuplicateConfig;
use crate::content::record::ContentRecord;
use crate::iam::{Actor, Capability, CapabilityChecker};
use crate::util::ActionTokenStore;
use std::sync::Arc;

/// One action link in an admin listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub id: String,
    pub label: String,
    pub url: String,
}

/// Appends the Duplicate action to listing rows for callers holding the
/// edit capability.
pub struct DuplicateRowAction {
    checker: Arc<dyn CapabilityChecker>,
    tokens: ActionTokenStore,
    config: DuplicateConfig,
}

impl DuplicateRowAction {
    pub fn new(
        checker: Arc<dyn CapabilityChecker>,
        tokens: ActionTokenStore,
        config: DuplicateConfig,
    ) -> Self {
        Self {
            checker,
            tokens,
            config,
        }
    }

    /// Returns the row actions for `record`, with a token-bearing
    /// Duplicate link appended when `actor` may edit content. Actions are
    /// returned unchanged otherwise; minting the token is the only side
    /// effect.
    pub fn augment(
        &self,
        mut actions: Vec<RowAction>,
        record: &ContentRecord,
        actor: &Actor,
    ) -> Vec<RowAction> {
        if !self.checker.allows(actor, Capability::EditContent) {
            return actions;
        }

        let token = self.tokens.issue(DUPLICATE_ACTION, record.id);
        let url = format!(
            "{}?action={}&post_id={}&token={}",
            self.config.action_url(),
            DUPLICATE_ACTION,
            record.id,
            urlencoding::encode(&token)
        );

        actions.push(RowAction {
            id: "duplicate".to_string(),
            label: "Duplicate".to_string(),
            url,
        });
        actions
    }
}
