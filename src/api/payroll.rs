use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::api::error_response;
use crate::config::AppConfig;
use crate::database::queries::Queries;
use crate::database::Database;
use crate::payroll::rates::{LockedRateSet, MissingRatePolicy};
use crate::payroll::split::calculate_net_pay_split;

#[derive(Debug, Deserialize)]
pub struct SplitPreviewRequest {
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub net_pay: Decimal,
    pub currency: String,
    pub pay_date: Option<NaiveDate>,
    pub payroll_run_id: Option<Uuid>,
}

/// Preview the disbursement legs for an employee's net pay.
///
/// Preview is lenient: a missing rate falls back to 1 so the client can
/// still render an estimate before the run's rates are locked.
pub async fn split_preview(
    State((_config, database)): State<(AppConfig, Database)>,
    Json(request): Json<SplitPreviewRequest>,
) -> (StatusCode, Json<Value>) {
    let pay_date = request
        .pay_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let preference = match Queries::active_preference(
        database.pool(),
        request.company_id,
        request.employee_id,
        pay_date,
    )
    .await
    {
        Ok(preference) => preference,
        Err(e) => return error_response(e),
    };

    let rates = match request.payroll_run_id {
        Some(run_id) => match Queries::locked_rates(database.pool(), run_id).await {
            Ok(rates) => rates,
            Err(e) => return error_response(e),
        },
        None => LockedRateSet::new(),
    };

    let splits = match calculate_net_pay_split(
        request.net_pay,
        &request.currency,
        preference.as_ref(),
        &rates,
        MissingRatePolicy::DefaultToUnity,
    ) {
        Ok(splits) => splits,
        Err(e) => return error_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({ "splits": splits })),
    )
}

#[derive(Debug, Deserialize)]
pub struct DisburseRequest {
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub net_pay: Decimal,
    pub currency: String,
    pub pay_date: Option<NaiveDate>,
}

/// Compute and persist the disbursement legs for an employee in a run.
///
/// Disbursement fails closed: a missing locked rate is an error, never a
/// silent parity assumption.
pub async fn disburse_run(
    State((_config, database)): State<(AppConfig, Database)>,
    Path(run_id): Path<Uuid>,
    Json(request): Json<DisburseRequest>,
) -> (StatusCode, Json<Value>) {
    let pay_date = request
        .pay_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let preference = match Queries::active_preference(
        database.pool(),
        request.company_id,
        request.employee_id,
        pay_date,
    )
    .await
    {
        Ok(preference) => preference,
        Err(e) => return error_response(e),
    };

    let rates = match Queries::locked_rates(database.pool(), run_id).await {
        Ok(rates) => rates,
        Err(e) => return error_response(e),
    };

    let splits = match calculate_net_pay_split(
        request.net_pay,
        &request.currency,
        preference.as_ref(),
        &rates,
        MissingRatePolicy::Fail,
    ) {
        Ok(splits) => splits,
        Err(e) => return error_response(e),
    };

    if let Err(e) =
        Queries::insert_disbursements(database.pool(), run_id, request.employee_id, &splits).await
    {
        return error_response(e);
    }

    info!(
        "Disbursed {} {} for employee {} in run {} across {} legs",
        request.net_pay,
        request.currency,
        request.employee_id,
        run_id,
        splits.len()
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({ "run_id": run_id, "splits": splits })),
    )
}
