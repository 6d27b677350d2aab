// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::admin::DUPLICATE_ACTION;
use crate::config::DuplicateConfig;
use crate::content::record::{DEFAULT_TYPE_TAG, RecordId};
use crate::content::store::ContentStore;
use crate::duplicator::{DuplicateError, Duplicator};
use crate::iam::{ActorRequest, Capability, CapabilityChecker};
use crate::util::ActionTokenStore;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Deserialize;

pub fn configure(cfg: &mut web::ServiceConfig, config: &DuplicateConfig) {
    cfg.route(&config.action_url(), web::get().to(handle_action));
}

/// Raw query parameters of the admin action endpoint. Everything is
/// optional here; [`DuplicateRequest`] is the validated form.
#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
    pub post_id: Option<String>,
    pub token: Option<String>,
}

/// A duplicate request that passed boundary validation.
#[derive(Debug, Clone)]
pub struct DuplicateRequest {
    pub record: RecordId,
    pub token: String,
}

impl DuplicateRequest {
    /// Builds the validated request from raw query parameters.
    ///
    /// The record identity is checked first (missing or malformed ids are
    /// an invalid request); a missing token is a forbidden request, the
    /// same terminal outcome an invalid token produces later.
    pub fn from_query(query: &ActionQuery) -> std::result::Result<Self, DuplicateError> {
        let raw_id = query
            .post_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| DuplicateError::InvalidRequest("post_id is required".to_string()))?;

        let id: u64 = raw_id.parse().map_err(|_| {
            DuplicateError::InvalidRequest(format!("post_id '{}' is not a record id", raw_id))
        })?;
        if id == 0 {
            return Err(DuplicateError::InvalidRequest(
                "post_id must be positive".to_string(),
            ));
        }

        let token = query
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| DuplicateError::Forbidden("missing action token".to_string()))?;

        Ok(DuplicateRequest {
            record: RecordId(id),
            token: token.to_string(),
        })
    }
}

/// Admin action endpoint. Validates the request, runs the duplicator, and
/// redirects back to the listing; every failure is a terminal error page
/// and leaves no partial state behind.
pub async fn handle_action(
    req: HttpRequest,
    query: web::Query<ActionQuery>,
    store: web::Data<dyn ContentStore>,
    checker: web::Data<dyn CapabilityChecker>,
    tokens: web::Data<ActionTokenStore>,
    config: web::Data<DuplicateConfig>,
) -> Result<HttpResponse> {
    // Other admin actions may share this endpoint; unknown ones are not ours
    if query.action.as_deref() != Some(DUPLICATE_ACTION) {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(terminal_error_html("Unknown admin action.")));
    }

    let request = match DuplicateRequest::from_query(&query) {
        Ok(request) => request,
        Err(error) => {
            log::warn!("Rejected duplicate request: {}", error);
            return Ok(terminal_error_response(&error));
        }
    };

    if !tokens.validate(&request.token, DUPLICATE_ACTION, request.record) {
        let error = DuplicateError::Forbidden("invalid or expired action token".to_string());
        log::warn!(
            "Rejected duplicate request for record {}: {}",
            request.record,
            error
        );
        return Ok(terminal_error_response(&error));
    }

    let actor = match req.actor() {
        Some(actor) if checker.allows(&actor, Capability::EditContent) => actor,
        Some(actor) => {
            let error =
                DuplicateError::Forbidden("missing edit capability".to_string());
            log::warn!(
                "User {} may not duplicate record {}",
                actor.id.0,
                request.record
            );
            return Ok(terminal_error_response(&error));
        }
        None => {
            let error = DuplicateError::Forbidden("authentication required".to_string());
            log::warn!(
                "Unauthenticated duplicate request for record {}",
                request.record
            );
            return Ok(terminal_error_response(&error));
        }
    };

    let source = match store.get_record(request.record) {
        Ok(Some(record)) => record,
        Ok(None) => {
            let error = DuplicateError::NotFound(request.record);
            log::warn!("{}", error);
            return Ok(terminal_error_response(&error));
        }
        Err(err) => {
            let error = DuplicateError::Persistence(err.message().to_string());
            log::error!("Failed to load record {}: {}", request.record, err);
            return Ok(terminal_error_response(&error));
        }
    };

    let duplicator = Duplicator::new(store.clone().into_inner());
    let new_id = match duplicator.duplicate(&source, actor.id) {
        Ok(new_id) => new_id,
        Err(error) => {
            log::error!("Duplication of record {} failed: {}", source.id, error);
            return Ok(terminal_error_response(&error));
        }
    };

    Ok(HttpResponse::Found()
        .insert_header((
            "Location",
            listing_redirect_url(&config, &source.type_tag, new_id),
        ))
        .finish())
}

/// Listing URL carrying the success flag and the new record's identity.
/// The default record type is left implicit, as the listing expects.
fn listing_redirect_url(config: &DuplicateConfig, type_tag: &str, new_id: RecordId) -> String {
    let mut url = format!("{}?", config.listing_url());
    if type_tag != DEFAULT_TYPE_TAG {
        url.push_str(&format!("post_type={}&", urlencoding::encode(type_tag)));
    }
    url.push_str(&format!("duplicated=1&new_post_id={}", new_id));
    url
}

fn terminal_error_response(error: &DuplicateError) -> HttpResponse {
    let status = match error {
        DuplicateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        DuplicateError::Forbidden(_) => StatusCode::FORBIDDEN,
        DuplicateError::NotFound(_) => StatusCode::NOT_FOUND,
        DuplicateError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
        .body(terminal_error_html(&error.to_string()))
}

fn terminal_error_html(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Duplicate failed</title></head>
<body><h1>Duplicate failed</h1><p>{}</p></body></html>"#,
        escape_html(message)
    )
}

// Store rejection messages may echo caller input
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
