use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde_json::json;

use crate::{
    application::usercases::error_reports::ErrorReportUseCase,
    domain::{
        repositories::error_reports::ErrorReportRepository,
        value_objects::error_reports::ReportErrorModel,
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{AppError, from_usecase_error},
        },
        postgres::{
            postgres_connection::PgPoolSquad, repositories::error_reports::ErrorReportPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let error_report_repository = ErrorReportPostgres::new(Arc::clone(&db_pool));
    let error_report_usecase = ErrorReportUseCase::new(Arc::new(error_report_repository));

    Router::new()
        .route("/report", post(report))
        .with_state(Arc::new(error_report_usecase))
}

pub async fn report<E>(
    State(error_report_usecase): State<Arc<ErrorReportUseCase<E>>>,
    auth: AuthUser,
    Json(report_error_model): Json<ReportErrorModel>,
) -> Result<impl IntoResponse, AppError>
where
    E: ErrorReportRepository + Send + Sync + 'static,
{
    let report_id = error_report_usecase
        .report(auth.user_id, report_error_model)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "report_id": report_id })))
}
