// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod memory;
pub mod record;
pub mod store;

pub use memory::MemoryContentStore;
pub use record::{
    AttachmentId, ContentRecord, DEFAULT_TYPE_TAG, DiscussionPolicy, MetaValue, NewRecord,
    RawMeta, RecordId, RecordStatus, TermId, UserId,
};
pub use store::{ContentStore, StoreError};
