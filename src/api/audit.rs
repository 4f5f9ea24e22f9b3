use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::api::error_response;
use crate::audit::entry::{AuditEventType, Snapshot};
use crate::audit::recorder::{AuditRecorder, NewAuditEvent};
use crate::audit::verify::verify_chain;
use crate::config::AppConfig;
use crate::database::queries::{AuditTrailFilter, Queries};
use crate::database::Database;

#[derive(Debug, Deserialize)]
pub struct AuditTrailParams {
    pub company_id: Uuid,
    pub event_type: Option<String>,
    pub entity_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// One page of a tenant's audit trail, newest first, with the chain
/// report for that page.
pub async fn get_audit_trail(
    State((_config, database)): State<(AppConfig, Database)>,
    Query(params): Query<AuditTrailParams>,
) -> (StatusCode, Json<Value>) {
    let event_type = match params.event_type.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<AuditEventType>() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": e })),
                );
            }
        },
    };

    let filter = AuditTrailFilter {
        event_type,
        entity_type: params.entity_type,
        from: params.from,
        to: params.to,
    };

    let entries = match Queries::audit_trail(database.pool(), params.company_id, &filter).await {
        Ok(entries) => entries,
        Err(e) => return error_response(e),
    };

    let report = verify_chain(&entries);
    info!(
        "Audit trail page for {}: {}",
        params.company_id,
        report.summary()
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "entries": entries,
            "verification": {
                "status": report.status.as_str(),
                "entry_count": report.entry_count,
                "checked_links": report.checked_links,
                "skipped_links": report.skipped_links,
                "break_at": report.break_at,
                "summary": report.summary(),
            },
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub company_id: Uuid,
    pub event_type: AuditEventType,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub old_values: Option<Snapshot>,
    pub new_values: Option<Snapshot>,
}

/// Record a tracked action into the tenant's audit trail.
pub async fn record_event(
    State((_config, database)): State<(AppConfig, Database)>,
    Json(request): Json<RecordEventRequest>,
) -> (StatusCode, Json<Value>) {
    let recorder = AuditRecorder::new(database.clone());

    let event = NewAuditEvent {
        company_id: request.company_id,
        event_type: request.event_type,
        entity_type: request.entity_type,
        entity_id: request.entity_id,
        actor_id: request.actor_id,
        old_values: request.old_values,
        new_values: request.new_values,
    };

    match recorder.record(event).await {
        Ok(entry) => (StatusCode::CREATED, Json(serde_json::json!({ "entry": entry }))),
        Err(e) => error_response(e),
    }
}
