// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpMessage, web};
use nop_duplicate::config::DuplicateConfig;
use nop_duplicate::content::{
    ContentStore, DiscussionPolicy, MemoryContentStore, MetaValue, NewRecord, RecordId,
    RecordStatus, TermId, UserId,
};
use nop_duplicate::iam::{Actor, Capability, CapabilityChecker, RoleCapabilityChecker};
use nop_duplicate::util::ActionTokenStore;
use nop_duplicate::{admin, duplicator};
use std::sync::Arc;

pub const SOURCE_TITLE: &str = "Hello";
pub const SOURCE_AUTHOR: UserId = UserId(1);

pub struct TestHarness {
    pub store: Arc<MemoryContentStore>,
    pub checker: Arc<dyn CapabilityChecker>,
    pub tokens: ActionTokenStore,
    pub config: DuplicateConfig,
    pub source_id: RecordId,
}

impl TestHarness {
    /// Seeds a store with the spec's reference record: a published post by
    /// user 1 with one category term, a `color` meta value, and an edit
    /// lock marker.
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let store = Arc::new(MemoryContentStore::new());
        store.register_taxonomy("post", "category");
        store.register_taxonomy("event", "category");

        let source_id = store
            .create_record(NewRecord {
                type_tag: "post".to_string(),
                title: SOURCE_TITLE.to_string(),
                body: "Body text".to_string(),
                excerpt: "Excerpt".to_string(),
                status: RecordStatus::Published,
                author: SOURCE_AUTHOR,
                parent: None,
                menu_order: 0,
                comment_policy: DiscussionPolicy::Open,
                ping_policy: DiscussionPolicy::Closed,
            })
            .expect("seed record");
        store
            .set_terms(source_id, "category", &[TermId(3)])
            .expect("seed terms");
        store
            .add_meta(source_id, "color", &MetaValue::from_storage("red"))
            .expect("seed meta");
        store
            .add_meta(source_id, "_edit_lock", &MetaValue::from_storage("167..."))
            .expect("seed meta");

        let checker: Arc<dyn CapabilityChecker> = Arc::new(
            RoleCapabilityChecker::new()
                .grant("editor", Capability::EditContent)
                .expect("valid role"),
        );

        // Hosts are expected to wire the store to the configured expiry
        let config = DuplicateConfig::default();
        let tokens = ActionTokenStore::with_expiry_seconds(config.token_expiry_seconds);

        TestHarness {
            store,
            checker,
            tokens,
            config,
            source_id,
        }
    }

    pub fn editor(&self) -> Actor {
        Actor {
            id: UserId(7),
            name: "Edith Editor".to_string(),
            roles: vec!["editor".to_string()],
        }
    }

    pub fn subscriber(&self) -> Actor {
        Actor {
            id: UserId(9),
            name: "Sam Subscriber".to_string(),
            roles: vec!["subscriber".to_string()],
        }
    }

    pub fn issue_token(&self, record: RecordId) -> String {
        self.tokens.issue(admin::DUPLICATE_ACTION, record)
    }

    /// URL the row-action injector would produce for the record.
    pub fn action_url(&self, record: RecordId, token: &str) -> String {
        format!(
            "{}?action={}&post_id={}&token={}",
            self.config.action_url(),
            admin::DUPLICATE_ACTION,
            record,
            urlencoding::encode(token)
        )
    }

    pub fn record_count(&self) -> usize {
        self.store.record_count()
    }

    pub fn duplicator(&self) -> duplicator::Duplicator {
        duplicator::Duplicator::new(self.store.clone())
    }
}

/// Builds the admin app the way a host embeds the extension: capabilities
/// as `web::Data`, routes via `admin::configure`. The optional actor
/// stands in for the host's authentication middleware.
pub fn build_test_app(
    harness: &TestHarness,
    actor: Option<Actor>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let store: Arc<dyn ContentStore> = harness.store.clone();
    let config = harness.config.clone();

    App::new()
        .app_data(web::Data::from(store))
        .app_data(web::Data::from(harness.checker.clone()))
        .app_data(web::Data::new(harness.tokens.clone()))
        .app_data(web::Data::new(harness.config.clone()))
        .wrap_fn(move |req, srv| {
            if let Some(actor) = actor.clone() {
                req.extensions_mut().insert(actor);
            }
            srv.call(req)
        })
        .configure(move |cfg| admin::configure(cfg, &config))
}
