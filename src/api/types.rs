// src/api/types.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of the stateless classify phase, as returned by the backend.
///
/// Immutable once received; a new classify submission replaces it wholesale.
/// The record identifier gained on persist success lives next to it in the
/// orchestrator state, never inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classificacao: String,
    #[serde(default)]
    pub justificativa: String,
    #[serde(default)]
    pub condutas: String,
}

/// Payload of the persist phase. Carries the original symptom text together
/// with the classify result, since the classify phase is stateless on the
/// server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistRequest {
    pub sintomas: String,
    pub classificacao: String,
    pub justificativa: String,
    pub condutas: String,
}

/// Normalized persist acknowledgment.
///
/// The backend historically signals success with a `success` flag, an `id`
/// field, or a `triagem_id` field, in any combination, with the identifier
/// serialized as either a string or a number. All of that is collapsed here;
/// nothing downstream inspects raw JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistAck {
    pub accepted: bool,
    pub record_id: Option<String>,
    pub message: Option<String>,
}

impl PersistAck {
    pub fn from_raw(raw: &Value) -> Self {
        // `id` is authoritative, `triagem_id` is the compatibility fallback.
        let record_id = raw
            .get("id")
            .and_then(identifier_to_string)
            .or_else(|| raw.get("triagem_id").and_then(identifier_to_string));
        let accepted =
            raw.get("success").and_then(Value::as_bool).unwrap_or(false) || record_id.is_some();
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Self {
            accepted,
            record_id,
            message,
        }
    }
}

fn identifier_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Transient credential pair. Built for the duration of one authentication
/// request and dropped afterwards.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Normalized authentication acknowledgment. A well-formed body with
/// `success: false` (or no `success` at all) is a credential rejection,
/// distinct from a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A persisted triage record as returned by the review listing.
/// `validado` keeps the backend's 0/1 integer encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriagemRecord {
    pub id: String,
    pub sintomas: String,
    #[serde(default)]
    pub resposta: String,
    pub data_hora: String,
    #[serde(default)]
    pub validado: i64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub validado_por: Option<String>,
    #[serde(default)]
    pub data_validacao: Option<String>,
}

impl TriagemRecord {
    pub fn is_validated(&self) -> bool {
        self.validado != 0
    }
}

/// Filter for the review listing, mapped to the backend's `filtro` query
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    Todas,
    Pendentes,
    Validadas,
}

impl ReviewFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewFilter::Todas => "todas",
            ReviewFilter::Pendentes => "pendentes",
            ReviewFilter::Validadas => "validadas",
        }
    }
}

/// Payload marking a triage record as validated by a specialist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub triagem_id: String,
    pub validado_por: String,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Review-panel counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriagemStats {
    pub total: i64,
    pub pendentes: i64,
    pub validadas: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_persist_ack_prefers_id_over_triagem_id() {
        let ack = PersistAck::from_raw(&json!({ "id": "abc", "triagem_id": "def" }));
        assert_eq!(ack.record_id.as_deref(), Some("abc"));
        assert!(ack.accepted);
    }

    #[test]
    fn test_persist_ack_falls_back_to_triagem_id() {
        let ack = PersistAck::from_raw(&json!({ "triagem_id": 7 }));
        assert_eq!(ack.record_id.as_deref(), Some("7"));
        assert!(ack.accepted);
    }

    #[test]
    fn test_persist_ack_accepts_numeric_identifier() {
        let ack = PersistAck::from_raw(&json!({ "id": 42 }));
        assert_eq!(ack.record_id.as_deref(), Some("42"));
        assert!(ack.accepted);
    }

    #[test]
    fn test_persist_ack_success_flag_without_identifier() {
        let ack = PersistAck::from_raw(&json!({ "success": true, "message": "ok" }));
        assert!(ack.accepted);
        assert_eq!(ack.record_id, None);
        assert_eq!(ack.message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_persist_ack_empty_body_is_not_accepted() {
        let ack = PersistAck::from_raw(&json!({}));
        assert!(!ack.accepted);
        assert_eq!(ack.record_id, None);
    }

    #[test]
    fn test_persist_ack_ignores_blank_string_identifier() {
        let ack = PersistAck::from_raw(&json!({ "id": "  " }));
        assert_eq!(ack.record_id, None);
        assert!(!ack.accepted);
    }

    #[test]
    fn test_classification_result_tolerates_extra_fields() {
        let result: ClassificationResult = serde_json::from_value(json!({
            "id": "tmp-uuid",
            "classificacao": "vermelho",
            "justificativa": "r",
            "condutas": "a",
            "success": true
        }))
        .unwrap();

        assert_eq!(result.classificacao, "vermelho");
        assert_eq!(result.justificativa, "r");
        assert_eq!(result.condutas, "a");
    }

    #[test]
    fn test_login_ack_defaults_to_rejection() {
        let ack: LoginAck = serde_json::from_value(json!({ "message": "?" })).unwrap();
        assert!(!ack.success);
        assert_eq!(ack.user, None);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "admin".to_string(),
            password: "admin".to_string(),
        };
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("password: \"admin\""));
        assert!(rendered.contains("<redacted>"));
    }
}
