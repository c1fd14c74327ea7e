// src/session/mod.rs
//! Session bootstrap: the single-phase authentication variant of the
//! request/response/error pattern, producing an explicit session context.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{AuthService, Credentials};

pub const MSG_CAMPOS_OBRIGATORIOS: &str = "Por favor, preencha todos os campos.";
pub const MSG_CREDENCIAIS_INVALIDAS: &str = "Usuário ou senha inválidos.";
pub const MSG_ERRO_LOGIN: &str = "Erro ao realizar login. Por favor, tente novamente.";

/// Authenticated session context. Created at login, passed explicitly to
/// the operations that require it, invalidated at logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            created_at: Utc::now(),
        }
    }
}

/// Why an authentication attempt did not produce a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// A required field was empty; no request was sent.
    Validation,
    /// Well-formed response, credentials refused.
    Credentials,
    /// The request did not complete, or the response was unusable.
    Transport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Idle,
    Authenticating,
    Authenticated { session: Session },
    Rejected { kind: RejectionKind, message: String },
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Authenticating)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated { session } => Some(session),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AuthState::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

struct AuthInner {
    state: AuthState,
    seq: u64,
}

/// One bootstrap instance per login form. Same sequence-token scheme as the
/// submission orchestrator: the latest issued attempt wins, late responses
/// are discarded.
pub struct SessionBootstrap<A> {
    service: A,
    inner: Mutex<AuthInner>,
}

impl<A: AuthService> SessionBootstrap<A> {
    pub fn new(service: A) -> Self {
        Self {
            service,
            inner: Mutex::new(AuthInner {
                state: AuthState::Idle,
                seq: 0,
            }),
        }
    }

    pub fn state(&self) -> AuthState {
        self.inner.lock().unwrap().state.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.lock().unwrap().state.session().cloned()
    }

    /// One authentication attempt. All outcomes are absorbed into the
    /// state machine; the returned snapshot is the resulting state.
    pub async fn login(&self, username: &str, password: &str) -> AuthState {
        if username.trim().is_empty() || password.trim().is_empty() {
            let mut inner = self.inner.lock().unwrap();
            inner.seq += 1;
            inner.state = AuthState::Rejected {
                kind: RejectionKind::Validation,
                message: MSG_CAMPOS_OBRIGATORIOS.to_string(),
            };
            return inner.state.clone();
        }

        let token = {
            let mut inner = self.inner.lock().unwrap();
            inner.seq += 1;
            inner.state = AuthState::Authenticating;
            inner.seq
        };

        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let outcome = self.service.login(&credentials).await;
        drop(credentials);

        let mut inner = self.inner.lock().unwrap();
        if inner.seq != token {
            debug!(token, latest = inner.seq, "discarding stale login response");
            return inner.state.clone();
        }

        inner.state = match outcome {
            Ok(ack) if ack.success => match ack.user {
                Some(user) => AuthState::Authenticated {
                    session: Session::new(user),
                },
                // Success signaled without a session identifier is not
                // observable as a success.
                None => {
                    warn!("login response signaled success without a user identifier");
                    AuthState::Rejected {
                        kind: RejectionKind::Transport,
                        message: MSG_ERRO_LOGIN.to_string(),
                    }
                }
            },
            Ok(_) => AuthState::Rejected {
                kind: RejectionKind::Credentials,
                message: MSG_CREDENCIAIS_INVALIDAS.to_string(),
            },
            Err(err) => {
                warn!(error = %err, "login request failed");
                AuthState::Rejected {
                    kind: RejectionKind::Transport,
                    message: MSG_ERRO_LOGIN.to_string(),
                }
            }
        };
        inner.state.clone()
    }

    /// Invalidates the session. Also bumps the sequence so an in-flight
    /// login cannot resurrect a logged-out state.
    pub fn logout(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.seq += 1;
        inner.state = AuthState::Idle;
    }
}
