use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usercases::notifications::NotificationUseCase,
    domain::{
        repositories::notifications::NotificationRepository,
        value_objects::notifications::{ListNotificationsFilter, MarkNotificationsReadModel},
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{AppError, from_usecase_error},
        },
        postgres::{
            postgres_connection::PgPoolSquad, repositories::notifications::NotificationPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let notification_repository = NotificationPostgres::new(Arc::clone(&db_pool));
    let notification_usecase = NotificationUseCase::new(Arc::new(notification_repository));

    Router::new()
        .route("/", get(list))
        .route("/read", post(mark_read))
        .with_state(Arc::new(notification_usecase))
}

pub async fn list<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Query(filter): Query<ListNotificationsFilter>,
) -> Result<impl IntoResponse, AppError>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    let notifications = notification_usecase
        .list(auth.user_id, filter)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "notifications": notifications })))
}

pub async fn mark_read<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Json(mark_read_model): Json<MarkNotificationsReadModel>,
) -> Result<impl IntoResponse, AppError>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    let updated = notification_usecase
        .mark_read(auth.user_id, mark_read_model)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "updated": updated })))
}
