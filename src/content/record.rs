// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The default record type; records of this type are listed without a
/// `post_type` query parameter.
pub const DEFAULT_TYPE_TAG: &str = "post";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Draft,
    Pending,
    Published,
    Private,
    Trash,
}

/// Comment and ping acceptance flags carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionPolicy {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    pub type_tag: String,
    pub title: String,
    pub body: String,
    pub excerpt: String,
    pub status: RecordStatus,
    pub author: UserId,
    pub parent: Option<RecordId>,
    pub menu_order: i32,
    pub comment_policy: DiscussionPolicy,
    pub ping_policy: DiscussionPolicy,
}

/// Creation payload for the store; the store allocates the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub type_tag: String,
    pub title: String,
    pub body: String,
    pub excerpt: String,
    pub status: RecordStatus,
    pub author: UserId,
    pub parent: Option<RecordId>,
    pub menu_order: i32,
    pub comment_policy: DiscussionPolicy,
    pub ping_policy: DiscussionPolicy,
}

/// Raw record metadata as the store keeps it: multi-valued per key, each
/// value in its serialized storage representation.
pub type RawMeta = BTreeMap<String, Vec<String>>;

/// A metadata value decoded from its storage representation.
///
/// Stores keep meta values as strings. Values written through this type
/// round-trip as JSON; values written by other tooling that are not valid
/// JSON are carried as plain strings rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaValue(pub serde_json::Value);

impl MetaValue {
    pub fn from_storage(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => MetaValue(value),
            Err(_) => MetaValue(serde_json::Value::String(raw.to_string())),
        }
    }

    pub fn to_storage(&self) -> String {
        match &self.0 {
            // Plain strings stay plain so foreign values round-trip untouched
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}
