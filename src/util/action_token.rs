// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::record::RecordId;
use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const ACTION_TOKEN_EXPIRY_SECONDS: u64 = 3600;

/// Scope an action token is minted for. A token only validates against the
/// exact action name and record it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TokenScope {
    action: String,
    record: RecordId,
}

#[derive(Debug, Clone)]
struct ActionTokenData {
    created_at: Instant,
    scope: TokenScope,
}

/// Anti-forgery tokens for destructive admin row actions.
///
/// Tokens live on a worker thread; callers talk to it over a channel. A
/// token is renewed on successful validation rather than consumed, so a
/// listing page full of action links stays usable until expiry.
#[derive(Clone)]
pub struct ActionTokenStore {
    sender: mpsc::Sender<TokenCommand>,
    expiry: Duration,
}

enum TokenCommand {
    Issue {
        scope: TokenScope,
        reply: mpsc::Sender<String>,
    },
    Validate {
        token_value: String,
        scope: TokenScope,
        reply: mpsc::Sender<bool>,
    },
    #[cfg(test)]
    TokenCount {
        reply: mpsc::Sender<usize>,
    },
}

impl ActionTokenStore {
    pub fn new() -> Self {
        Self::with_expiry_seconds(ACTION_TOKEN_EXPIRY_SECONDS)
    }

    pub fn with_expiry_seconds(seconds: u64) -> Self {
        let expiry = Duration::from_secs(seconds);
        ActionTokenStore {
            sender: start_token_worker(expiry),
            expiry,
        }
    }

    pub fn expiry_seconds(&self) -> u64 {
        self.expiry.as_secs()
    }

    /// Mints a token bound to the action name and record id.
    pub fn issue(&self, action: &str, record: RecordId) -> String {
        self.request(
            |reply| TokenCommand::Issue {
                scope: TokenScope {
                    action: action.to_string(),
                    record,
                },
                reply,
            },
            String::new(),
        )
    }

    /// Validates a token against the action name and record id it should
    /// have been minted for. A valid token is renewed; a token presented
    /// for the wrong scope is revoked.
    pub fn validate(&self, token_value: &str, action: &str, record: RecordId) -> bool {
        self.request(
            |reply| TokenCommand::Validate {
                token_value: token_value.to_string(),
                scope: TokenScope {
                    action: action.to_string(),
                    record,
                },
                reply,
            },
            false,
        )
    }

    #[cfg(test)]
    fn token_count(&self) -> usize {
        self.request(|reply| TokenCommand::TokenCount { reply }, 0)
    }

    fn generate_new_token_value() -> String {
        Uuid::new_v4().to_string()
    }

    fn request<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> TokenCommand, fallback: T) -> T {
        let (reply, receive) = mpsc::channel();
        if self.sender.send(build(reply)).is_err() {
            log::error!("🚨 CRITICAL: ActionTokenStore channel closed");
            return fallback;
        }
        receive.recv().unwrap_or(fallback)
    }
}

impl Default for ActionTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

fn start_token_worker(expiry: Duration) -> mpsc::Sender<TokenCommand> {
    let (sender, receiver) = mpsc::channel();
    let thread = thread::Builder::new().name("action-token-store".to_string());
    if let Err(err) = thread.spawn(move || run_token_worker(receiver, expiry)) {
        log::error!("ActionTokenStore worker failed to start: {}", err);
    }
    sender
}

fn run_token_worker(receiver: mpsc::Receiver<TokenCommand>, expiry: Duration) {
    let mut tokens: HashMap<String, ActionTokenData> = HashMap::new();
    while let Ok(command) = receiver.recv() {
        let now = Instant::now();
        cleanup_expired_tokens(&mut tokens, now, expiry);
        match command {
            TokenCommand::Issue { scope, reply } => {
                let token_value = ActionTokenStore::generate_new_token_value();
                log::debug!(
                    "Issued {} token for record {}",
                    scope.action,
                    scope.record
                );
                tokens.insert(
                    token_value.clone(),
                    ActionTokenData {
                        created_at: now,
                        scope,
                    },
                );
                let _ = reply.send(token_value);
            }
            TokenCommand::Validate {
                token_value,
                scope,
                reply,
            } => {
                let is_valid = match tokens.get_mut(&token_value) {
                    Some(token_data) => {
                        if token_data.scope == scope {
                            token_data.created_at = now;
                            true
                        } else {
                            log::warn!(
                                "Action token scope mismatch. Expected: {} record {}, got: {} record {}",
                                token_data.scope.action,
                                token_data.scope.record,
                                scope.action,
                                scope.record
                            );
                            tokens.remove(&token_value);
                            false
                        }
                    }
                    None => false,
                };
                let _ = reply.send(is_valid);
            }
            #[cfg(test)]
            TokenCommand::TokenCount { reply } => {
                let _ = reply.send(tokens.len());
            }
        }
    }
}

fn cleanup_expired_tokens(
    tokens: &mut HashMap<String, ActionTokenData>,
    now: Instant,
    expiry: Duration,
) {
    tokens.retain(|_, token_data| now.duration_since(token_data.created_at) < expiry);
}
