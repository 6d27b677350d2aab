// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::DuplicateConfig;
use crate::content::record::RecordId;
use serde::Deserialize;

/// Transient navigation state the listing passes through after a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeParams {
    pub duplicated: Option<String>,
    pub new_post_id: Option<String>,
}

/// Renders the dismissible success notice for the listing view, linking to
/// the new record's edit page. Returns `None` unless the navigation state
/// carries a well-formed success flag and record identity. Purely derived
/// from the query; nothing is read or written elsewhere.
pub fn duplicated_notice_html(params: &NoticeParams, config: &DuplicateConfig) -> Option<String> {
    if params.duplicated.as_deref() != Some("1") {
        return None;
    }
    let new_id: u64 = params.new_post_id.as_deref()?.parse().ok()?;
    if new_id == 0 {
        return None;
    }

    Some(format!(
        r#"<div class="notice notice-success is-dismissible"><p>Record duplicated. <a href="{}">Edit the duplicate &rarr;</a></p></div>"#,
        config.edit_url(RecordId(new_id))
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(duplicated: Option<&str>, new_post_id: Option<&str>) -> NoticeParams {
        NoticeParams {
            duplicated: duplicated.map(str::to_string),
            new_post_id: new_post_id.map(str::to_string),
        }
    }

    #[test]
    fn renders_notice_with_edit_link() {
        let html = duplicated_notice_html(&params(Some("1"), Some("9")), &DuplicateConfig::default())
            .expect("notice");
        assert!(html.contains("notice-success"));
        assert!(html.contains("is-dismissible"));
        assert!(html.contains(r#"href="/admin/content/9/edit""#));
    }

    #[test]
    fn absent_flags_render_nothing() {
        let config = DuplicateConfig::default();
        assert!(duplicated_notice_html(&params(None, None), &config).is_none());
        assert!(duplicated_notice_html(&params(Some("1"), None), &config).is_none());
        assert!(duplicated_notice_html(&params(None, Some("9")), &config).is_none());
    }

    #[test]
    fn malformed_state_renders_nothing() {
        let config = DuplicateConfig::default();
        assert!(duplicated_notice_html(&params(Some("yes"), Some("9")), &config).is_none());
        assert!(duplicated_notice_html(&params(Some("1"), Some("nine")), &config).is_none());
        assert!(duplicated_notice_html(&params(Some("1"), Some("0")), &config).is_none());
    }
}
