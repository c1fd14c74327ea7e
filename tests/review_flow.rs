// tests/review_flow.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use triagem::api::{
    ApiError, ReviewFilter, ReviewService, TriagemRecord, TriagemStats, ValidationOutcome,
    ValidationRequest,
};
use triagem::review::ReviewPanel;
use triagem::session::Session;

#[derive(Clone, Default)]
struct MockReview {
    inner: Arc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    records: Mutex<Vec<TriagemRecord>>,
    last_filter: Mutex<Option<ReviewFilter>>,
    validations: Mutex<VecDeque<Result<ValidationOutcome, ApiError>>>,
    last_validation: Mutex<Option<ValidationRequest>>,
    delete_calls: AtomicUsize,
}

impl MockReview {
    fn with_records(records: Vec<TriagemRecord>) -> Self {
        let mock = Self::default();
        *mock.inner.records.lock().unwrap() = records;
        mock
    }

    fn push_validation(&self, outcome: Result<ValidationOutcome, ApiError>) {
        self.inner.validations.lock().unwrap().push_back(outcome);
    }

    fn last_filter(&self) -> Option<ReviewFilter> {
        *self.inner.last_filter.lock().unwrap()
    }

    fn last_validation(&self) -> Option<ValidationRequest> {
        self.inner.last_validation.lock().unwrap().clone()
    }

    fn delete_calls(&self) -> usize {
        self.inner.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewService for MockReview {
    async fn list_triagens(&self, filter: ReviewFilter) -> Result<Vec<TriagemRecord>, ApiError> {
        *self.inner.last_filter.lock().unwrap() = Some(filter);
        Ok(self.inner.records.lock().unwrap().clone())
    }

    async fn validate_triagem(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationOutcome, ApiError> {
        *self.inner.last_validation.lock().unwrap() = Some(request.clone());
        self.inner
            .validations
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected validate call")
    }

    async fn delete_triagem(&self, _triagem_id: &str) -> Result<(), ApiError> {
        self.inner.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stats(&self) -> Result<TriagemStats, ApiError> {
        Ok(TriagemStats {
            total: 10,
            pendentes: 4,
            validadas: 6,
        })
    }
}

fn registro(id: &str, validado: i64) -> TriagemRecord {
    TriagemRecord {
        id: id.to_string(),
        sintomas: "febre e tosse".to_string(),
        resposta: "Triagem processada".to_string(),
        data_hora: "2025-06-01 10:00:00".to_string(),
        validado,
        feedback: None,
        validado_por: None,
        data_validacao: None,
    }
}

fn sessao(user: &str) -> Session {
    Session::new(user)
}

#[tokio::test]
async fn test_list_passes_the_filter_through() {
    let service = MockReview::with_records(vec![registro("t-1", 0), registro("t-2", 1)]);
    let panel = ReviewPanel::new(service.clone(), sessao("medico"));

    let registros = panel.list(ReviewFilter::Pendentes).await.unwrap();

    assert_eq!(service.last_filter(), Some(ReviewFilter::Pendentes));
    assert_eq!(registros.len(), 2);
    assert!(!registros[0].is_validated());
    assert!(registros[1].is_validated());
}

#[tokio::test]
async fn test_validate_stamps_the_authenticated_user() {
    let service = MockReview::default();
    service.push_validation(Ok(ValidationOutcome {
        success: true,
        message: "Triagem validada com sucesso".to_string(),
    }));
    let panel = ReviewPanel::new(service.clone(), sessao("medico"));

    let outcome = panel.validate("  t-1  ", "classificação adequada").await.unwrap();
    assert!(outcome.success);

    let request = service.last_validation().expect("validation payload captured");
    assert_eq!(request.triagem_id, "t-1");
    assert_eq!(request.validado_por, "medico");
    assert_eq!(request.feedback, "classificação adequada");
}

#[tokio::test]
async fn test_validate_rejects_a_blank_record_id_locally() {
    let service = MockReview::default();
    let panel = ReviewPanel::new(service.clone(), sessao("admin"));

    let err = panel.validate("   ", "ok").await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(service.last_validation(), None);
}

#[tokio::test]
async fn test_remove_rejects_a_blank_record_id_locally() {
    let service = MockReview::default();
    let panel = ReviewPanel::new(service.clone(), sessao("admin"));

    let err = panel.remove("").await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(service.delete_calls(), 0);
}

#[tokio::test]
async fn test_stats_passthrough() {
    let service = MockReview::default();
    let panel = ReviewPanel::new(service, sessao("admin"));

    let stats = panel.stats().await.unwrap();

    assert_eq!(
        stats,
        TriagemStats {
            total: 10,
            pendentes: 4,
            validadas: 6,
        }
    );
}
