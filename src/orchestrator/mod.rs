// src/orchestrator/mod.rs
//! Two-phase submission orchestrator: classify free-text symptoms, then
//! optionally commit the result for specialist review. All failures are
//! absorbed into the state machine; no operation returns an error.

use std::sync::Mutex;

use tracing::{debug, warn};

use crate::api::{ClassificationResult, PersistRequest, TriageService};

pub const MSG_VALIDACAO_SINTOMAS: &str = "Por favor, insira os sintomas do paciente.";
pub const MSG_ERRO_CLASSIFICACAO: &str = "Erro ao processar a triagem. Por favor, tente novamente.";
pub const MSG_ERRO_ENVIO: &str = "Erro ao enviar para validação. Por favor, tente novamente.";

/// Explicit submission state. One variant per phase, with the payload each
/// phase actually has; impossible flag combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Classifying,
    Classified {
        result: ClassificationResult,
    },
    Persisting {
        result: ClassificationResult,
    },
    Persisted {
        result: ClassificationResult,
        record_id: String,
    },
    Failed {
        message: String,
        /// Present only after a failed persist: the classified result the
        /// user keeps and may retry sending.
        retained: Option<ClassificationResult>,
    },
}

impl SubmissionState {
    /// True only while a request is in flight, for disabling the
    /// triggering control.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            SubmissionState::Classifying | SubmissionState::Persisting { .. }
        )
    }

    /// True only once a persist phase has completed with an identifier.
    pub fn validation_sent(&self) -> bool {
        matches!(self, SubmissionState::Persisted { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            SubmissionState::Classified { result }
            | SubmissionState::Persisting { result }
            | SubmissionState::Persisted { result, .. } => Some(result),
            SubmissionState::Failed {
                retained: Some(result),
                ..
            } => Some(result),
            _ => None,
        }
    }

    pub fn record_id(&self) -> Option<&str> {
        match self {
            SubmissionState::Persisted { record_id, .. } => Some(record_id),
            _ => None,
        }
    }
}

struct Inner {
    state: SubmissionState,
    sintomas: String,
    seq: u64,
}

/// One orchestrator instance per active intake form.
///
/// Interior state lives behind a mutex that is locked only around state
/// reads/writes, never across an await. Every state-setting operation bumps
/// the request sequence; a response is applied only if its captured token
/// still equals the latest sequence, so late responses from superseded
/// calls are discarded.
pub struct SubmissionOrchestrator<S> {
    service: S,
    inner: Mutex<Inner>,
}

impl<S: TriageService> SubmissionOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner {
                state: SubmissionState::Idle,
                sintomas: String::new(),
                seq: 0,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SubmissionState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Phase one: classify the symptom text. Clears any prior result and
    /// error. Returns the resulting state snapshot.
    pub async fn classify(&self, sintomas: &str) -> SubmissionState {
        if sintomas.trim().is_empty() {
            let mut inner = self.inner.lock().unwrap();
            inner.seq += 1;
            inner.state = SubmissionState::Failed {
                message: MSG_VALIDACAO_SINTOMAS.to_string(),
                retained: None,
            };
            return inner.state.clone();
        }

        let token = {
            let mut inner = self.inner.lock().unwrap();
            inner.seq += 1;
            inner.sintomas = sintomas.to_string();
            inner.state = SubmissionState::Classifying;
            inner.seq
        };

        let outcome = self.service.classify(sintomas).await;

        let mut inner = self.inner.lock().unwrap();
        if inner.seq != token {
            debug!(token, latest = inner.seq, "discarding stale classify response");
            return inner.state.clone();
        }

        inner.state = match outcome {
            Ok(result) => SubmissionState::Classified { result },
            Err(err) => {
                warn!(error = %err, "classification request failed");
                SubmissionState::Failed {
                    message: MSG_ERRO_CLASSIFICACAO.to_string(),
                    retained: None,
                }
            }
        };
        inner.state.clone()
    }

    /// Phase two: commit the current classification for specialist review.
    ///
    /// No-op unless a result exists (classified, persisted, or retained
    /// after a failed persist). Re-invoking after success re-sends and
    /// creates a new record; there is no idempotency key.
    pub async fn persist(&self) -> SubmissionState {
        let (request, token) = {
            let mut inner = self.inner.lock().unwrap();
            let result = match &inner.state {
                SubmissionState::Classified { result }
                | SubmissionState::Persisted { result, .. }
                | SubmissionState::Failed {
                    retained: Some(result),
                    ..
                } => result.clone(),
                _ => return inner.state.clone(),
            };

            inner.seq += 1;
            let request = PersistRequest {
                sintomas: inner.sintomas.clone(),
                classificacao: result.classificacao.clone(),
                justificativa: result.justificativa.clone(),
                condutas: result.condutas.clone(),
            };
            inner.state = SubmissionState::Persisting { result };
            (request, inner.seq)
        };

        let outcome = self.service.persist(&request).await;

        let mut inner = self.inner.lock().unwrap();
        if inner.seq != token {
            debug!(token, latest = inner.seq, "discarding stale persist response");
            return inner.state.clone();
        }

        let result = match &inner.state {
            SubmissionState::Persisting { result } => result.clone(),
            _ => return inner.state.clone(),
        };

        inner.state = match outcome {
            // A persisted record without a traceable identifier is not
            // observable as a success; require the identifier.
            Ok(ack) => match ack.record_id {
                Some(record_id) => SubmissionState::Persisted { result, record_id },
                None => {
                    warn!(accepted = ack.accepted, "persist response carried no record identifier");
                    SubmissionState::Failed {
                        message: MSG_ERRO_ENVIO.to_string(),
                        retained: Some(result),
                    }
                }
            },
            Err(err) => {
                warn!(error = %err, "persist request failed");
                SubmissionState::Failed {
                    message: MSG_ERRO_ENVIO.to_string(),
                    retained: Some(result),
                }
            }
        };
        inner.state.clone()
    }
}
