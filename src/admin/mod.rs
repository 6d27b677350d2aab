// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod duplicate;
pub mod notice;
pub mod row_actions;

/// Action name carried in the endpoint's `action` query parameter and
/// bound into every minted token.
pub const DUPLICATE_ACTION: &str = "duplicate_post";

pub use duplicate::{ActionQuery, DuplicateRequest, configure, handle_action};
pub use notice::{NoticeParams, duplicated_notice_html};
pub use row_actions::{DuplicateRowAction, RowAction};
