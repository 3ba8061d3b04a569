//! Storage self-check
//!
//! Walks the same path a document upload takes: bucket reachable, user
//! signed in, a small object written under the user's prefix, then removed.
//! Stops at the first failing step.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use kisan_core::models::UserContext;
use kisan_storage::keys::probe_key;
use kisan_storage::Storage;
use serde::Serialize;

use crate::identity::IdentityGate;

const PROBE_CONTENT: &[u8] = b"Test content";
const PROBE_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticStep {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub steps: Vec<DiagnosticStep>,
}

impl DiagnosticReport {
    /// True when every step ran and passed.
    pub fn is_healthy(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.passed)
    }

    pub fn failed_step(&self) -> Option<&DiagnosticStep> {
        self.steps.iter().find(|s| !s.passed)
    }

    fn pass(&mut self, name: &'static str, detail: impl Into<String>) {
        self.steps.push(DiagnosticStep {
            name,
            passed: true,
            detail: detail.into(),
        });
    }

    fn fail(&mut self, name: &'static str, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::warn!(step = name, detail = %detail, "Storage diagnostic step failed");
        self.steps.push(DiagnosticStep {
            name,
            passed: false,
            detail,
        });
    }
}

pub struct StorageDiagnostics {
    storage: Arc<dyn Storage>,
}

impl StorageDiagnostics {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Run the check for whoever is signed in at `gate`.
    pub async fn run(&self, gate: &dyn IdentityGate) -> DiagnosticReport {
        let mut report = DiagnosticReport::default();
        if !self.check_bucket(&mut report).await {
            return report;
        }

        let user = match gate.current_user().await {
            Ok(session) => session.map(|s| s.user),
            Err(e) => {
                report.fail("user_authenticated", format!("Auth error: {}", e));
                return report;
            }
        };
        self.check_user_and_probe(user.as_ref(), &mut report).await;
        report
    }

    /// Only check that the bucket is reachable.
    pub async fn check_storage(&self) -> DiagnosticReport {
        let mut report = DiagnosticReport::default();
        self.check_bucket(&mut report).await;
        report
    }

    /// Run the check for an explicit user, skipping the identity provider.
    pub async fn run_for_user(&self, user: Option<&UserContext>) -> DiagnosticReport {
        let mut report = DiagnosticReport::default();
        if self.check_bucket(&mut report).await {
            self.check_user_and_probe(user, &mut report).await;
        }
        report
    }

    async fn check_bucket(&self, report: &mut DiagnosticReport) -> bool {
        match self.storage.health_check().await {
            Ok(()) => {
                report.pass(
                    "storage_reachable",
                    format!(
                        "{} bucket '{}' reachable",
                        self.storage.backend_type(),
                        self.storage.bucket()
                    ),
                );
                true
            }
            Err(e) => {
                report.fail("storage_reachable", e.to_string());
                false
            }
        }
    }

    async fn check_user_and_probe(
        &self,
        user: Option<&UserContext>,
        report: &mut DiagnosticReport,
    ) {
        let Some(user) = user else {
            report.fail("user_authenticated", "No user signed in");
            return;
        };
        report.pass("user_authenticated", format!("User authenticated: {}", user.user_id));

        let key = probe_key(user.user_id, Utc::now().timestamp_millis());
        match self
            .storage
            .store(&key, Bytes::from_static(PROBE_CONTENT), PROBE_CONTENT_TYPE, false)
            .await
        {
            Ok(stored) => report.pass("probe_upload", format!("Test file uploaded: {}", stored.path)),
            Err(e) => {
                report.fail("probe_upload", format!("Upload error: {}", e));
                return;
            }
        }

        match self.storage.delete(&key).await {
            Ok(()) => report.pass("probe_cleanup", "Test file cleaned up"),
            Err(e) => report.fail("probe_cleanup", format!("Cleanup error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn step_names(report: &DiagnosticReport) -> Vec<&'static str> {
        report.steps.iter().map(|s| s.name).collect()
    }

    #[tokio::test]
    async fn test_all_steps_pass() {
        let storage = MockStorage::new();
        let diagnostics = StorageDiagnostics::new(Arc::new(storage.clone()));
        let gate = MockIdentityGate::signed_in(test_user());

        let report = diagnostics.run(&gate).await;

        assert!(report.is_healthy());
        assert_eq!(
            step_names(&report),
            vec![
                "storage_reachable",
                "user_authenticated",
                "probe_upload",
                "probe_cleanup"
            ]
        );
        assert_eq!(storage.store_calls(), 1);
        assert_eq!(storage.last_upsert(), Some(false));
        assert_eq!(storage.object_count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_bucket_stops_early() {
        let storage = MockStorage::new();
        storage.set_unreachable(true);
        let diagnostics = StorageDiagnostics::new(Arc::new(storage.clone()));

        let report = diagnostics.run_for_user(Some(&test_user())).await;

        assert!(!report.is_healthy());
        assert_eq!(step_names(&report), vec!["storage_reachable"]);
        assert_eq!(storage.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_check_storage_only() {
        let storage = MockStorage::new();
        let diagnostics = StorageDiagnostics::new(Arc::new(storage.clone()));

        let report = diagnostics.check_storage().await;

        assert!(report.is_healthy());
        assert_eq!(step_names(&report), vec!["storage_reachable"]);
        assert_eq!(storage.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_signed_out_user_skips_probe() {
        let storage = MockStorage::new();
        let diagnostics = StorageDiagnostics::new(Arc::new(storage.clone()));

        let report = diagnostics.run(&MockIdentityGate::new()).await;

        assert_eq!(
            report.failed_step().map(|s| s.name),
            Some("user_authenticated")
        );
        assert_eq!(storage.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_reported() {
        let storage = MockStorage::new();
        storage.set_fail_uploads(true);
        let diagnostics = StorageDiagnostics::new(Arc::new(storage.clone()));

        let report = diagnostics.run_for_user(Some(&test_user())).await;

        let failed = report.failed_step().unwrap();
        assert_eq!(failed.name, "probe_upload");
        assert!(failed.detail.contains("mock upload failure"));
    }
}
