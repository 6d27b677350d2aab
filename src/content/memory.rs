// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::record::{
    AttachmentId, ContentRecord, MetaValue, NewRecord, RawMeta, RecordId, TermId,
};
use crate::content::store::{ContentStore, StoreError};
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc;
use std::thread;

/// In-process content store backed by a worker thread.
///
/// All state lives on the worker; callers talk to it over a channel and
/// block on a reply, so the store is `Send + Sync` without locks.
#[derive(Clone)]
pub struct MemoryContentStore {
    sender: mpsc::Sender<StoreCommand>,
}

struct StoredRecord {
    record: ContentRecord,
    terms: BTreeMap<String, Vec<TermId>>,
    meta: RawMeta,
    featured_image: Option<AttachmentId>,
}

enum StoreCommand {
    Get {
        id: RecordId,
        reply: mpsc::Sender<Option<ContentRecord>>,
    },
    Create {
        record: NewRecord,
        reply: mpsc::Sender<RecordId>,
    },
    RegisterTaxonomy {
        type_tag: String,
        taxonomy: String,
    },
    TaxonomiesForType {
        type_tag: String,
        reply: mpsc::Sender<Vec<String>>,
    },
    Terms {
        id: RecordId,
        taxonomy: String,
        reply: mpsc::Sender<Vec<TermId>>,
    },
    SetTerms {
        id: RecordId,
        taxonomy: String,
        terms: Vec<TermId>,
        reply: mpsc::Sender<Result<(), StoreError>>,
    },
    Meta {
        id: RecordId,
        reply: mpsc::Sender<RawMeta>,
    },
    AddMeta {
        id: RecordId,
        key: String,
        value: String,
        reply: mpsc::Sender<Result<(), StoreError>>,
    },
    FeaturedImage {
        id: RecordId,
        reply: mpsc::Sender<Option<AttachmentId>>,
    },
    SetFeaturedImage {
        id: RecordId,
        image: AttachmentId,
        reply: mpsc::Sender<Result<(), StoreError>>,
    },
    RecordCount {
        reply: mpsc::Sender<usize>,
    },
}

impl MemoryContentStore {
    pub fn new() -> Self {
        MemoryContentStore {
            sender: start_store_worker(),
        }
    }

    /// Declares a taxonomy applicable to records of the given type.
    pub fn register_taxonomy(&self, type_tag: &str, taxonomy: &str) {
        self.send_command(StoreCommand::RegisterTaxonomy {
            type_tag: type_tag.to_string(),
            taxonomy: taxonomy.to_string(),
        });
    }

    /// Number of records held; used by tests to assert nothing was created.
    pub fn record_count(&self) -> usize {
        self.request(|reply| StoreCommand::RecordCount { reply }, 0)
    }

    fn request<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> StoreCommand, fallback: T) -> T {
        let (reply, receive) = mpsc::channel();
        if self.sender.send(build(reply)).is_err() {
            log::error!("🚨 CRITICAL: MemoryContentStore channel closed");
            return fallback;
        }
        receive.recv().unwrap_or(fallback)
    }

    fn send_command(&self, command: StoreCommand) {
        if self.sender.send(command).is_err() {
            log::error!("🚨 CRITICAL: MemoryContentStore channel closed");
        }
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn closed() -> StoreError {
    StoreError::new("store worker unavailable")
}

impl ContentStore for MemoryContentStore {
    fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StoreError> {
        Ok(self.request(|reply| StoreCommand::Get { id, reply }, None))
    }

    fn create_record(&self, record: NewRecord) -> Result<RecordId, StoreError> {
        let id = self.request(
            |reply| StoreCommand::Create { record, reply },
            RecordId(0),
        );
        if id.0 == 0 {
            return Err(closed());
        }
        Ok(id)
    }

    fn taxonomies_for_type(&self, type_tag: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.request(
            |reply| StoreCommand::TaxonomiesForType {
                type_tag: type_tag.to_string(),
                reply,
            },
            Vec::new(),
        ))
    }

    fn terms(&self, id: RecordId, taxonomy: &str) -> Result<Vec<TermId>, StoreError> {
        Ok(self.request(
            |reply| StoreCommand::Terms {
                id,
                taxonomy: taxonomy.to_string(),
                reply,
            },
            Vec::new(),
        ))
    }

    fn set_terms(&self, id: RecordId, taxonomy: &str, terms: &[TermId]) -> Result<(), StoreError> {
        self.request(
            |reply| StoreCommand::SetTerms {
                id,
                taxonomy: taxonomy.to_string(),
                terms: terms.to_vec(),
                reply,
            },
            Err(closed()),
        )
    }

    fn meta(&self, id: RecordId) -> Result<RawMeta, StoreError> {
        Ok(self.request(|reply| StoreCommand::Meta { id, reply }, RawMeta::new()))
    }

    fn add_meta(&self, id: RecordId, key: &str, value: &MetaValue) -> Result<(), StoreError> {
        self.request(
            |reply| StoreCommand::AddMeta {
                id,
                key: key.to_string(),
                value: value.to_storage(),
                reply,
            },
            Err(closed()),
        )
    }

    fn featured_image(&self, id: RecordId) -> Result<Option<AttachmentId>, StoreError> {
        Ok(self.request(|reply| StoreCommand::FeaturedImage { id, reply }, None))
    }

    fn set_featured_image(&self, id: RecordId, image: AttachmentId) -> Result<(), StoreError> {
        self.request(
            |reply| StoreCommand::SetFeaturedImage { id, image, reply },
            Err(closed()),
        )
    }
}

fn start_store_worker() -> mpsc::Sender<StoreCommand> {
    let (sender, receiver) = mpsc::channel();
    let thread = thread::Builder::new().name("memory-content-store".to_string());
    if let Err(err) = thread.spawn(move || run_store_worker(receiver)) {
        log::error!("MemoryContentStore worker failed to start: {}", err);
    }
    sender
}

fn run_store_worker(receiver: mpsc::Receiver<StoreCommand>) {
    let mut records: HashMap<RecordId, StoredRecord> = HashMap::new();
    let mut taxonomies: BTreeMap<String, Vec<String>> = BTreeMap::new();
    // Ids start at 1; 0 is the sentinel for a dead worker
    let mut next_id: u64 = 1;

    while let Ok(command) = receiver.recv() {
        match command {
            StoreCommand::Get { id, reply } => {
                let record = records.get(&id).map(|stored| stored.record.clone());
                let _ = reply.send(record);
            }
            StoreCommand::Create { record, reply } => {
                let id = RecordId(next_id);
                next_id += 1;
                records.insert(
                    id,
                    StoredRecord {
                        record: ContentRecord {
                            id,
                            type_tag: record.type_tag,
                            title: record.title,
                            body: record.body,
                            excerpt: record.excerpt,
                            status: record.status,
                            author: record.author,
                            parent: record.parent,
                            menu_order: record.menu_order,
                            comment_policy: record.comment_policy,
                            ping_policy: record.ping_policy,
                        },
                        terms: BTreeMap::new(),
                        meta: RawMeta::new(),
                        featured_image: None,
                    },
                );
                log::debug!("Created content record {}", id);
                let _ = reply.send(id);
            }
            StoreCommand::RegisterTaxonomy { type_tag, taxonomy } => {
                let list = taxonomies.entry(type_tag).or_default();
                if !list.contains(&taxonomy) {
                    list.push(taxonomy);
                }
            }
            StoreCommand::TaxonomiesForType { type_tag, reply } => {
                let list = taxonomies.get(&type_tag).cloned().unwrap_or_default();
                let _ = reply.send(list);
            }
            StoreCommand::Terms { id, taxonomy, reply } => {
                let terms = records
                    .get(&id)
                    .and_then(|stored| stored.terms.get(&taxonomy))
                    .cloned()
                    .unwrap_or_default();
                let _ = reply.send(terms);
            }
            StoreCommand::SetTerms {
                id,
                taxonomy,
                terms,
                reply,
            } => {
                let result = match records.get_mut(&id) {
                    Some(stored) => {
                        stored.terms.insert(taxonomy, terms);
                        Ok(())
                    }
                    None => Err(StoreError::new(format!("record {} not found", id))),
                };
                let _ = reply.send(result);
            }
            StoreCommand::Meta { id, reply } => {
                let meta = records
                    .get(&id)
                    .map(|stored| stored.meta.clone())
                    .unwrap_or_default();
                let _ = reply.send(meta);
            }
            StoreCommand::AddMeta {
                id,
                key,
                value,
                reply,
            } => {
                let result = match records.get_mut(&id) {
                    Some(stored) => {
                        stored.meta.entry(key).or_default().push(value);
                        Ok(())
                    }
                    None => Err(StoreError::new(format!("record {} not found", id))),
                };
                let _ = reply.send(result);
            }
            StoreCommand::FeaturedImage { id, reply } => {
                let image = records.get(&id).and_then(|stored| stored.featured_image);
                let _ = reply.send(image);
            }
            StoreCommand::SetFeaturedImage { id, image, reply } => {
                let result = match records.get_mut(&id) {
                    Some(stored) => {
                        stored.featured_image = Some(image);
                        Ok(())
                    }
                    None => Err(StoreError::new(format!("record {} not found", id))),
                };
                let _ = reply.send(result);
            }
            StoreCommand::RecordCount { reply } => {
                let _ = reply.send(records.len());
            }
        }
    }
}
