// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{TestHarness, build_test_app};
use nop_duplicate::admin::{DuplicateRowAction, NoticeParams, duplicated_notice_html};
use nop_duplicate::content::ContentStore;

/// The full click path: the injected row action's URL drives the handler,
/// and the redirect's query state drives the notice.
#[actix_web::test]
async fn row_action_click_ends_in_a_rendered_notice() {
    let harness = TestHarness::new();
    let editor = harness.editor();

    let injector = DuplicateRowAction::new(
        harness.checker.clone(),
        harness.tokens.clone(),
        harness.config.clone(),
    );
    let source = harness
        .store
        .get_record(harness.source_id)
        .unwrap()
        .expect("source record");
    let actions = injector.augment(Vec::new(), &source, &editor);
    assert_eq!(actions.len(), 1);

    let app = test::init_service(build_test_app(&harness, Some(editor))).await;
    let req = test::TestRequest::get().uri(&actions[0].url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp
        .headers()
        .get("Location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let query = location.split('?').nth(1).expect("redirect query");
    let params: NoticeParams =
        serde_urlencoded::from_str(query).expect("notice params parse");

    let notice =
        duplicated_notice_html(&params, &harness.config).expect("notice rendered");
    assert!(notice.contains("Record duplicated."));
    assert!(notice.contains("/edit"));
}

#[actix_web::test]
async fn listing_without_success_state_shows_no_notice() {
    let harness = TestHarness::new();
    let params = NoticeParams::default();
    assert!(duplicated_notice_html(&params, &harness.config).is_none());
}
