// src/review/mod.rs
//! Staff-facing review panel: listing, validating, deleting and counting
//! persisted triage records. Every operation runs under an explicit
//! session context; there is no ambient login state.

use tracing::info;

use crate::api::{
    ApiError, ReviewFilter, ReviewService, TriagemRecord, TriagemStats, ValidationOutcome,
    ValidationRequest,
};
use crate::session::Session;

pub const MSG_TRIAGEM_OBRIGATORIA: &str = "Selecione uma triagem.";

/// Review-panel client, constructed with the session obtained at login.
/// Unlike the caregiver-facing orchestrators, failures propagate to the
/// caller.
pub struct ReviewPanel<R> {
    service: R,
    session: Session,
}

impl<R: ReviewService> ReviewPanel<R> {
    pub fn new(service: R, session: Session) -> Self {
        Self { service, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Triage records for the given filter, newest first (backend order).
    pub async fn list(&self, filter: ReviewFilter) -> Result<Vec<TriagemRecord>, ApiError> {
        self.service.list_triagens(filter).await
    }

    /// Marks a record as validated, stamped with the authenticated user.
    pub async fn validate(
        &self,
        triagem_id: &str,
        feedback: &str,
    ) -> Result<ValidationOutcome, ApiError> {
        let triagem_id = triagem_id.trim();
        if triagem_id.is_empty() {
            return Err(ApiError::Validation(MSG_TRIAGEM_OBRIGATORIA.to_string()));
        }

        let request = ValidationRequest {
            triagem_id: triagem_id.to_string(),
            validado_por: self.session.user.clone(),
            feedback: feedback.trim().to_string(),
        };
        let outcome = self.service.validate_triagem(&request).await?;
        info!(triagem_id, validado_por = %self.session.user, "triagem validated");
        Ok(outcome)
    }

    pub async fn remove(&self, triagem_id: &str) -> Result<(), ApiError> {
        let triagem_id = triagem_id.trim();
        if triagem_id.is_empty() {
            return Err(ApiError::Validation(MSG_TRIAGEM_OBRIGATORIA.to_string()));
        }

        self.service.delete_triagem(triagem_id).await
    }

    pub async fn stats(&self) -> Result<TriagemStats, ApiError> {
        self.service.stats().await
    }
}
