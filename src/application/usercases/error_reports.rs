use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::error_reports::InsertErrorReportEntity;
use crate::domain::repositories::error_reports::ErrorReportRepository;
use crate::domain::value_objects::error_reports::{ReportErrorModel, classify_error, hash_string};

const MAX_MESSAGE_CHARS: usize = 1200;
const MAX_STACK_CHARS: usize = 12_000;
const MAX_PATHNAME_CHARS: usize = 512;
const MAX_URL_CHARS: usize = 2048;
const MAX_USER_AGENT_CHARS: usize = 1024;
const MAX_SOURCE_CHARS: usize = 64;

pub struct ErrorReportUseCase<E>
where
    E: ErrorReportRepository + Send + Sync + 'static,
{
    error_report_repository: Arc<E>,
}

impl<E> ErrorReportUseCase<E>
where
    E: ErrorReportRepository + Send + Sync + 'static,
{
    pub fn new(error_report_repository: Arc<E>) -> Self {
        Self {
            error_report_repository,
        }
    }

    /// Stores a client-side error report, trimmed to column limits and
    /// classified for triage. New reports always land with status `new`.
    pub async fn report(&self, user_id: Uuid, model: ReportErrorModel) -> Result<Uuid> {
        let message = truncate(model.message.trim(), MAX_MESSAGE_CHARS);
        if message.is_empty() {
            return Err(anyhow!("Error message is required"));
        }

        let source = model
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| truncate(s, MAX_SOURCE_CHARS))
            .unwrap_or_else(|| "client".to_string());
        let classification = classify_error(&message, &source);
        let signature = hash_string(&format!("{}|{}", source, message));

        let report_id = self
            .error_report_repository
            .insert(InsertErrorReportEntity {
                user_id,
                message: message.clone(),
                stack: trim_optional(model.stack, MAX_STACK_CHARS),
                pathname: trim_optional(model.pathname, MAX_PATHNAME_CHARS),
                url: trim_optional(model.url, MAX_URL_CHARS),
                user_agent: trim_optional(model.user_agent, MAX_USER_AGENT_CHARS),
                app_version: model.app_version,
                source,
                category: classification.category.to_string(),
                severity: classification.severity.to_string(),
                meta: model.meta.unwrap_or_else(|| json!({})),
                status: "new".to_string(),
                created_at: Utc::now(),
            })
            .await?;

        info!(
            %user_id,
            %report_id,
            category = %classification.category,
            severity = %classification.severity,
            signature,
            "error_reports: stored"
        );
        Ok(report_id)
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

fn trim_optional(value: Option<String>, max_chars: usize) -> Option<String> {
    value
        .map(|v| truncate(v.trim(), max_chars))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::error_reports::MockErrorReportRepository;

    fn model(message: &str) -> ReportErrorModel {
        ReportErrorModel {
            message: message.to_string(),
            stack: None,
            pathname: None,
            url: None,
            user_agent: None,
            app_version: None,
            source: None,
            meta: None,
        }
    }

    #[tokio::test]
    async fn classifies_and_stores_with_status_new() {
        let mut repository = MockErrorReportRepository::new();
        repository
            .expect_insert()
            .withf(|report| {
                report.category == "network"
                    && report.severity == "warn"
                    && report.status == "new"
                    && report.source == "client"
            })
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        ErrorReportUseCase::new(Arc::new(repository))
            .report(Uuid::new_v4(), model("TypeError: Failed to fetch"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn trims_oversized_fields_to_column_limits() {
        let mut repository = MockErrorReportRepository::new();
        repository
            .expect_insert()
            .withf(|report| {
                report.message.chars().count() == 1200
                    && report.stack.as_ref().unwrap().chars().count() == 12_000
                    && report.source.chars().count() == 64
            })
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let mut oversized = model(&"x".repeat(5000));
        oversized.stack = Some("s".repeat(20_000));
        oversized.source = Some("y".repeat(100));

        ErrorReportUseCase::new(Arc::new(repository))
            .report(Uuid::new_v4(), oversized)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejects_empty_messages() {
        let err = ErrorReportUseCase::new(Arc::new(MockErrorReportRepository::new()))
            .report(Uuid::new_v4(), model("   "))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("message is required"));
    }
}
