//! Webhook gateway: the externally reachable trigger.
//!
//! A call moves through authenticate, rate-limit, resolve tenant, normalize,
//! select and dispatch. Every step before dispatch can short-circuit with a
//! [`WebhookError`] and none of them writes anything. A dispatch failure is
//! surfaced as [`WebhookError::Execution`]; the company's administrators are
//! emailed from a detached task, so delivery never delays the response.

use std::sync::Arc;
use std::time::Duration;

use maintflow_types::alert::GrafanaAlert;
use maintflow_types::error::WebhookError;
use maintflow_types::webhook::WebhookConfig;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::normalizer::normalize_bytes;
use super::rate_limiter::{RateLimiter, webhook_key};
use crate::notify::Notifier;
use crate::repository::company::CompanyRepository;
use crate::repository::maintenance::MaintenanceRepository;
use crate::repository::webhook_config::WebhookConfigRepository;
use crate::repository::workflow::WorkflowRepository;
use crate::workflow::dispatcher::DispatchOutcome;
use crate::workflow::engine::WorkflowEngine;

/// Successful terminal states of a webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Executed {
        workflow_id: Uuid,
        outcome: DispatchOutcome,
    },
    NoMatch,
}

impl WebhookOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            WebhookOutcome::Executed { .. } => "Workflow executed successfully",
            WebhookOutcome::NoMatch => "No matching workflow found for this alert",
        }
    }
}

/// Short SHA-256 prefix of an API key, safe to log.
pub fn key_fingerprint(api_key: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(api_key.as_bytes()));
    digest[..12].to_string()
}

pub struct WebhookGateway<W, M, C, K, N>
where
    W: WorkflowRepository,
    M: MaintenanceRepository,
    C: WebhookConfigRepository,
    K: CompanyRepository,
    N: Notifier + 'static,
{
    engine: WorkflowEngine<W, M>,
    configs: C,
    companies: K,
    notifier: Arc<N>,
    limiter: RateLimiter,
    dispatch_timeout: Duration,
}

impl<W, M, C, K, N> WebhookGateway<W, M, C, K, N>
where
    W: WorkflowRepository,
    M: MaintenanceRepository,
    C: WebhookConfigRepository,
    K: CompanyRepository,
    N: Notifier + 'static,
{
    pub fn new(
        engine: WorkflowEngine<W, M>,
        configs: C,
        companies: K,
        notifier: N,
        limiter: RateLimiter,
        dispatch_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            configs,
            companies,
            notifier: Arc::new(notifier),
            limiter,
            dispatch_timeout,
        }
    }

    /// Process one webhook call.
    ///
    /// `payload` is the raw request body; it is only parsed once the caller
    /// has been authenticated and admitted by the rate limiter.
    #[tracing::instrument(skip_all, fields(key = tracing::field::Empty, company_id = tracing::field::Empty))]
    pub async fn handle(
        &self,
        api_key: Option<&str>,
        payload: &[u8],
    ) -> Result<WebhookOutcome, WebhookError> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .ok_or(WebhookError::MissingApiKey)?;
        let span = tracing::Span::current();
        span.record("key", key_fingerprint(api_key).as_str());

        if !self.limiter.allow(&webhook_key(api_key)) {
            tracing::warn!("webhook rate limit exceeded");
            return Err(WebhookError::RateLimited);
        }

        let config = self.resolve(api_key).await?;
        span.record("company_id", config.company_id.to_string().as_str());

        let alert = normalize_bytes(payload).inspect_err(|e| {
            tracing::info!(error = %e, "rejected webhook payload");
        })?;

        let Some(workflow) = self
            .engine
            .select_webhook(&config.company_id, &alert)
            .await?
        else {
            tracing::info!(alert_id = %alert.alert_id, alert_name = %alert.alert_name, "no matching workflow");
            return Ok(WebhookOutcome::NoMatch);
        };

        let dispatched = tokio::time::timeout(
            self.dispatch_timeout,
            self.engine.dispatch_webhook(&workflow, &alert),
        )
        .await;
        let failure = match dispatched {
            Ok(Ok(outcome)) => {
                tracing::info!(workflow_id = %workflow.id, alert_id = %alert.alert_id, ?outcome, "webhook workflow executed");
                return Ok(WebhookOutcome::Executed {
                    workflow_id: workflow.id,
                    outcome,
                });
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("dispatch timed out after {:?}", self.dispatch_timeout),
        };

        tracing::error!(workflow_id = %workflow.id, alert_id = %alert.alert_id, error = %failure, "webhook workflow failed");
        self.notify_admins(&config.company_id, &alert, &failure).await;
        Err(WebhookError::Execution(failure))
    }

    async fn resolve(&self, api_key: &str) -> Result<WebhookConfig, WebhookError> {
        let config = self
            .configs
            .find_by_api_key(api_key)
            .await?
            .ok_or(WebhookError::InvalidApiKey)?;
        if !config.enabled {
            return Err(WebhookError::Disabled);
        }
        Ok(config)
    }

    /// Best effort: lookup and delivery failures are logged, never returned.
    /// Emails go out on a spawned task; this returns once admins are known.
    async fn notify_admins(&self, company_id: &Uuid, alert: &GrafanaAlert, error: &str) {
        let company_name = match self.companies.find_by_id(company_id).await {
            Ok(Some(company)) => company.name,
            Ok(None) => company_id.to_string(),
            Err(e) => {
                tracing::warn!(%company_id, error = %e, "company lookup failed for notification");
                company_id.to_string()
            }
        };
        let admins = match self.companies.find_admins(company_id).await {
            Ok(admins) => admins,
            Err(e) => {
                tracing::warn!(%company_id, error = %e, "admin lookup failed, notification skipped");
                return;
            }
        };

        let subject = format!("Webhook Processing Error: {}", alert.alert_name);
        let body = failure_email_body(alert, &company_name, error);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            for admin in admins {
                if let Err(e) = notifier.send_email(&admin.email, &subject, &body).await {
                    tracing::warn!(to = %admin.email, error = %e, "failed to send webhook failure notification");
                }
            }
        });
    }
}

fn failure_email_body(alert: &GrafanaAlert, company: &str, error: &str) -> String {
    format!(
        "Dear Administrator,\n\n\
         An error occurred while processing a webhook alert for your company.\n\n\
         Alert: {}\n\
         Severity: {}\n\
         Status: {}\n\
         Company: {}\n\
         Error: {}\n\n\
         Please review your workflow configuration.\n\n\
         Best regards,\n\
         Maintflow",
        alert.alert_name, alert.severity, alert.status, company, error
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        MemCompanies, MemMaintenance, MemWebhookConfigs, MemWorkflows, RecordingNotifier,
        workflow,
    };
    use maintflow_types::company::{Company, RoleType, User};
    use maintflow_types::maintenance::{Priority, Status};
    use maintflow_types::workflow::{MainCondition, TaskAction, WorkflowAction, WorkflowCondition};
    use serde_json::json;

    type TestGateway = WebhookGateway<
        MemWorkflows,
        MemMaintenance,
        MemWebhookConfigs,
        MemCompanies,
        RecordingNotifier,
    >;

    struct Fixture {
        gateway: TestGateway,
        key: String,
        maintenance: MemMaintenance,
        notifier: RecordingNotifier,
    }

    fn fixture_with(maintenance: MemMaintenance, enabled: bool, notifier: RecordingNotifier) -> Fixture {
        let company = Company::new("Acme Plant");
        let mut config = WebhookConfig::new(company.id);
        config.enabled = enabled;
        let key = config.api_key.clone();

        let companies = MemCompanies::default();
        companies.companies.lock().unwrap().push(company.clone());
        companies.users.lock().unwrap().extend([
            User {
                id: Uuid::now_v7(),
                company_id: company.id,
                email: "admin@acme.test".to_string(),
                role: RoleType::Admin,
            },
            User {
                id: Uuid::now_v7(),
                company_id: company.id,
                email: "tech@acme.test".to_string(),
                role: RoleType::Technician,
            },
        ]);

        let wf = workflow(
            company.id,
            MainCondition::Webhook,
            vec![WorkflowCondition {
                alert_name: Some("TestAlert".to_string()),
                severity: Some("critical".to_string()),
                ..Default::default()
            }],
            WorkflowAction {
                task_action: Some(TaskAction::CreateWorkOrder),
                ..Default::default()
            },
        );

        let gateway = WebhookGateway::new(
            WorkflowEngine::new(MemWorkflows::with(vec![wf]), maintenance.clone()),
            MemWebhookConfigs::with(config),
            companies,
            notifier.clone(),
            RateLimiter::default(),
            Duration::from_secs(5),
        );
        Fixture {
            gateway,
            key,
            maintenance,
            notifier,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemMaintenance::default(), true, RecordingNotifier::default())
    }

    /// Emails are sent from a spawned task; poll until `n` have been recorded.
    async fn wait_for_emails(notifier: &RecordingNotifier, n: usize) -> Vec<(String, String, String)> {
        for _ in 0..100 {
            let sent = notifier.sent.lock().unwrap().clone();
            if sent.len() >= n {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        notifier.sent.lock().unwrap().clone()
    }

    fn body(alert_name: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "alertId": "a1",
            "alertName": alert_name,
            "status": "firing",
            "severity": "critical",
            "message": "m",
            "customData": {"priority": "high"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_matching_alert_creates_work_order() {
        let f = fixture();
        let outcome = f.gateway.handle(Some(f.key.as_str()), &body("TestAlert")).await.unwrap();
        assert!(matches!(outcome, WebhookOutcome::Executed { .. }));
        assert_eq!(outcome.message(), "Workflow executed successfully");

        let created = f.maintenance.work_orders.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].title, "Auto-created: TestAlert");
        assert_eq!(created[0].status, Status::Open);
        assert_eq!(created[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn test_unmatched_alert_is_success_without_side_effect() {
        let f = fixture();
        let outcome = f.gateway.handle(Some(f.key.as_str()), &body("Other")).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::NoMatch);
        assert!(f.maintenance.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_unknown_keys() {
        let f = fixture();
        assert!(matches!(
            f.gateway.handle(None, &body("TestAlert")).await,
            Err(WebhookError::MissingApiKey)
        ));
        assert!(matches!(
            f.gateway.handle(Some(""), &body("TestAlert")).await,
            Err(WebhookError::MissingApiKey)
        ));
        assert!(matches!(
            f.gateway.handle(Some("  "), &body("TestAlert")).await,
            Err(WebhookError::InvalidApiKey)
        ));
        assert!(matches!(
            f.gateway.handle(Some("nope"), &body("TestAlert")).await,
            Err(WebhookError::InvalidApiKey)
        ));
    }

    #[tokio::test]
    async fn test_padded_key_is_not_trimmed() {
        let f = fixture();
        let padded = format!("{} ", f.key);
        assert!(matches!(
            f.gateway.handle(Some(padded.as_str()), &body("TestAlert")).await,
            Err(WebhookError::InvalidApiKey)
        ));
        assert!(f.maintenance.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_config_is_rejected_before_dispatch() {
        let f = fixture_with(MemMaintenance::default(), false, RecordingNotifier::default());
        let result = f.gateway.handle(Some(f.key.as_str()), &body("TestAlert")).await;
        assert!(matches!(result, Err(WebhookError::Disabled)));
        assert!(f.maintenance.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_applies_before_validation() {
        let f = fixture();
        for _ in 0..15 {
            let _ = f.gateway.handle(Some(f.key.as_str()), b"{}").await;
        }
        let result = f.gateway.handle(Some(f.key.as_str()), &body("TestAlert")).await;
        assert!(matches!(result, Err(WebhookError::RateLimited)));
    }

    #[tokio::test]
    async fn test_invalid_payload_is_validation_error() {
        let f = fixture();
        let result = f.gateway.handle(Some(f.key.as_str()), br#"{"alertName":"x"}"#).await;
        match result {
            Err(WebhookError::Validation(msg)) => assert!(msg.contains("alertId")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_failure_notifies_admins_only() {
        let f = fixture_with(MemMaintenance::failing(), true, RecordingNotifier::default());
        let result = f.gateway.handle(Some(f.key.as_str()), &body("TestAlert")).await;
        match result {
            Err(WebhookError::Execution(msg)) => assert!(msg.contains("disk I/O error")),
            other => panic!("unexpected {other:?}"),
        }

        let sent = wait_for_emails(&f.notifier, 1).await;
        assert_eq!(sent.len(), 1);
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "admin@acme.test");
        assert_eq!(subject, "Webhook Processing Error: TestAlert");
        assert!(body.contains("Company: Acme Plant"));
        assert!(body.contains("Severity: critical"));
    }

    #[tokio::test]
    async fn test_notification_failure_is_swallowed() {
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let f = fixture_with(MemMaintenance::failing(), true, notifier);
        let result = f.gateway.handle(Some(f.key.as_str()), &body("TestAlert")).await;
        assert!(matches!(result, Err(WebhookError::Execution(_))));
        assert_eq!(wait_for_emails(&f.notifier, 1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_mail_relay_does_not_delay_response() {
        let notifier = RecordingNotifier {
            stall: true,
            ..Default::default()
        };
        let f = fixture_with(MemMaintenance::failing(), true, notifier);
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            f.gateway.handle(Some(f.key.as_str()), &body("TestAlert")),
        )
        .await
        .expect("handle returned while mail delivery is stalled");
        assert!(matches!(result, Err(WebhookError::Execution(_))));
    }

    #[test]
    fn test_fingerprint_hides_key() {
        let fp = key_fingerprint("secret-key");
        assert_eq!(fp.len(), 12);
        assert!(!fp.contains("secret"));
        assert_eq!(fp, key_fingerprint("secret-key"));
    }
}
