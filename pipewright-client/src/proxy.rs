//! Deployment-facing facade over the raw pipeline service
//!
//! [`PipelineProxy`] owns the client-side policy the deployment workflow
//! relies on: a fresh idempotency token for every create call, best-effort
//! removal that reports failure instead of raising it, validation messages
//! flattened in the order the service returned them, and pipeline lookup
//! that walks the paginated listing with an anchored name pattern.

use std::sync::Arc;

use pipewright_core::domain::definition::PipelineObjectSpec;
use pipewright_core::dto::pipeline::{CreatePipelineRequest, ValidationGroup};
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::service::PipelineService;

/// Flattened outcome of a remote validation
///
/// Message order is exactly the order the service reported: groups first,
/// then messages within each group.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// True when the service blocks the definition outright
    pub errored: bool,
}

/// Facade the deployment workflow drives
///
/// Wraps any [`PipelineService`] implementation behind an `Arc`, so the
/// production HTTP client and in-memory test services are interchangeable.
#[derive(Clone)]
pub struct PipelineProxy {
    service: Arc<dyn PipelineService>,
}

impl PipelineProxy {
    pub fn new(service: Arc<dyn PipelineService>) -> Self {
        Self { service }
    }

    /// Registers a new pipeline and returns its assigned id
    ///
    /// Every call carries a freshly generated idempotency token, so a
    /// repeated deployment always produces a new pipeline rather than
    /// resurrecting an earlier request.
    pub async fn create_pipeline(&self, name: &str, description: &str) -> Result<String> {
        let request = CreatePipelineRequest {
            name: name.to_string(),
            description: description.to_string(),
            unique_id: Uuid::new_v4().to_string(),
        };
        let response = self.service.create(request).await?;
        Ok(response.pipeline_id)
    }

    /// Deletes a pipeline, reporting success as a bool
    ///
    /// Removal is best-effort: any failure is logged and mapped to `false`
    /// so callers can carry on with a stale pipeline still present.
    pub async fn remove_pipeline(&self, pipeline_id: &str) -> bool {
        match self.service.delete(pipeline_id).await {
            Ok(()) => true,
            Err(err) if err.is_not_found() => {
                debug!(pipeline_id, "pipeline to remove was already gone");
                false
            }
            Err(err) => {
                debug!(pipeline_id, error = %err, "pipeline removal failed");
                false
            }
        }
    }

    /// Validates `objects` against `pipeline_id`
    ///
    /// Grouped remote messages are flattened into flat error and warning
    /// lists, preserving the order the service returned them in.
    pub async fn validate_definition(
        &self,
        pipeline_id: &str,
        objects: &[PipelineObjectSpec],
    ) -> Result<ValidationReport> {
        let outcome = self.service.validate(pipeline_id, objects).await?;
        Ok(ValidationReport {
            errors: flatten(outcome.validation_errors),
            warnings: flatten(outcome.validation_warnings),
            errored: outcome.errored,
        })
    }

    /// Commits the definition to the pipeline
    ///
    /// Returns `Ok(false)` when the service refuses the definition without
    /// failing the call itself.
    pub async fn put_definition(
        &self,
        pipeline_id: &str,
        objects: &[PipelineObjectSpec],
    ) -> Result<bool> {
        let outcome = self.service.put(pipeline_id, objects).await?;
        Ok(!outcome.errored)
    }

    /// Starts executing the committed definition
    pub async fn activate(&self, pipeline_id: &str) -> Result<()> {
        self.service.activate(pipeline_id).await
    }

    /// Finds the id of the first pipeline whose name matches `name_pattern`
    ///
    /// Pages are scanned in listing order and entries in page order; the
    /// first match wins. The pattern must match the whole name, not a
    /// prefix of it. Returns an empty string when the listing is exhausted
    /// without a match.
    pub async fn find_pipeline_id(&self, name_pattern: &str) -> Result<String> {
        let matcher = Regex::new(&format!("^(?:{name_pattern})$"))?;
        let mut marker: Option<String> = None;

        loop {
            let page = self.service.list(marker.as_deref()).await?;
            if let Some(handle) = page.entries.iter().find(|h| matcher.is_match(&h.name)) {
                debug!(pipeline_id = %handle.id, name = %handle.name, "matched existing pipeline");
                return Ok(handle.id.clone());
            }
            // Without a cursor there is no next page to ask for, whatever
            // has_more claims.
            match (page.has_more, page.next_marker) {
                (true, Some(next)) => marker = Some(next),
                _ => return Ok(String::new()),
            }
        }
    }
}

fn flatten(groups: Vec<ValidationGroup>) -> Vec<String> {
    groups.into_iter().flat_map(|group| group.messages).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pipewright_core::dto::pipeline::{
        CreatePipelineResponse, PipelineHandle, PipelineListing, PutOutcome, ValidationOutcome,
    };

    use super::*;
    use crate::error::ClientError;

    /// Scripted service: listing pages are indexed by their marker, other
    /// operations return canned outcomes.
    #[derive(Default)]
    struct FakeService {
        pages: Vec<PipelineListing>,
        validation: ValidationOutcome,
        put_errored: bool,
        delete_failure: Option<u16>,
        created: Mutex<Vec<CreatePipelineRequest>>,
        list_markers: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl PipelineService for FakeService {
        async fn create(&self, request: CreatePipelineRequest) -> Result<CreatePipelineResponse> {
            self.created.lock().unwrap().push(request);
            Ok(CreatePipelineResponse {
                pipeline_id: "df-0123456789".to_string(),
            })
        }

        async fn delete(&self, _pipeline_id: &str) -> Result<()> {
            match self.delete_failure {
                Some(status) => Err(ClientError::ApiError {
                    status,
                    message: "delete refused".to_string(),
                }),
                None => Ok(()),
            }
        }

        async fn list(&self, marker: Option<&str>) -> Result<PipelineListing> {
            self.list_markers
                .lock()
                .unwrap()
                .push(marker.map(str::to_string));
            let index = marker.map(|m| m.parse::<usize>().unwrap()).unwrap_or(0);
            Ok(self.pages.get(index).cloned().unwrap_or_default())
        }

        async fn validate(
            &self,
            _pipeline_id: &str,
            _objects: &[PipelineObjectSpec],
        ) -> Result<ValidationOutcome> {
            Ok(self.validation.clone())
        }

        async fn put(
            &self,
            _pipeline_id: &str,
            _objects: &[PipelineObjectSpec],
        ) -> Result<PutOutcome> {
            Ok(PutOutcome {
                errored: self.put_errored,
            })
        }

        async fn activate(&self, _pipeline_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn page(entries: &[(&str, &str)], next: Option<usize>) -> PipelineListing {
        PipelineListing {
            entries: entries
                .iter()
                .map(|(id, name)| PipelineHandle::new(*id, *name))
                .collect(),
            has_more: next.is_some(),
            next_marker: next.map(|n| n.to_string()),
        }
    }

    fn proxy_over(service: FakeService) -> (Arc<FakeService>, PipelineProxy) {
        let service = Arc::new(service);
        (service.clone(), PipelineProxy::new(service))
    }

    #[tokio::test]
    async fn test_create_pipeline_generates_fresh_token_per_call() {
        let (service, proxy) = proxy_over(FakeService::default());

        proxy.create_pipeline("p1-reports-4", "build 4").await.unwrap();
        proxy.create_pipeline("p1-reports-4", "build 4").await.unwrap();

        let created = service.created.lock().unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].name, "p1-reports-4");
        assert_eq!(created[0].description, "build 4");
        assert!(!created[0].unique_id.is_empty());
        assert_ne!(created[0].unique_id, created[1].unique_id);
    }

    #[tokio::test]
    async fn test_remove_pipeline_reports_success() {
        let (_, proxy) = proxy_over(FakeService::default());
        assert!(proxy.remove_pipeline("df-old").await);
    }

    #[tokio::test]
    async fn test_remove_pipeline_reports_failure_without_error() {
        let (_, proxy) = proxy_over(FakeService {
            delete_failure: Some(500),
            ..Default::default()
        });
        assert!(!proxy.remove_pipeline("df-old").await);
    }

    #[tokio::test]
    async fn test_remove_pipeline_reports_false_for_missing_pipeline() {
        let (_, proxy) = proxy_over(FakeService {
            delete_failure: Some(404),
            ..Default::default()
        });
        assert!(!proxy.remove_pipeline("df-gone").await);
    }

    #[tokio::test]
    async fn test_validate_flattens_groups_preserving_order() {
        let (_, proxy) = proxy_over(FakeService {
            validation: ValidationOutcome {
                validation_errors: vec![
                    ValidationGroup::new(Some("obj-1"), ["4", "5"]),
                    ValidationGroup::new(Some("obj-2"), ["6"]),
                ],
                validation_warnings: vec![ValidationGroup::new(Some("obj-1"), ["1", "2", "3"])],
                errored: true,
            },
            ..Default::default()
        });

        let report = proxy.validate_definition("df-1", &[]).await.unwrap();

        assert_eq!(report.errors, vec!["4", "5", "6"]);
        assert_eq!(report.warnings, vec!["1", "2", "3"]);
        assert!(report.errored);
    }

    #[tokio::test]
    async fn test_validate_clean_outcome() {
        let (_, proxy) = proxy_over(FakeService::default());

        let report = proxy.validate_definition("df-1", &[]).await.unwrap();

        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(!report.errored);
    }

    #[tokio::test]
    async fn test_put_definition_accepted() {
        let (_, proxy) = proxy_over(FakeService::default());
        assert!(proxy.put_definition("df-1", &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_definition_rejected_maps_to_false() {
        let (_, proxy) = proxy_over(FakeService {
            put_errored: true,
            ..Default::default()
        });
        assert!(!proxy.put_definition("df-1", &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_returns_first_match_in_listing_order() {
        let (_, proxy) = proxy_over(FakeService {
            pages: vec![
                page(&[("df-1", "unrelated")], Some(1)),
                page(&[("df-2", "p1-reports-3"), ("df-3", "p1-reports-7")], None),
            ],
            ..Default::default()
        });

        let id = proxy.find_pipeline_id(r"p1-reports-\d+").await.unwrap();
        assert_eq!(id, "df-2");
    }

    #[tokio::test]
    async fn test_find_matches_whole_names_only() {
        let (_, proxy) = proxy_over(FakeService {
            pages: vec![page(
                &[
                    ("df-1", "p1-this-is-a-test-pipeline-1"),
                    ("df-2", "d2-this-is-a-test-pipeline-1"),
                    ("df-3", "p1-this-is-a-test-pipeline-21"),
                ],
                None,
            )],
            ..Default::default()
        });

        let id = proxy
            .find_pipeline_id("p1-this-is-a-test-pipeline-2")
            .await
            .unwrap();
        assert_eq!(id, "");
    }

    #[tokio::test]
    async fn test_find_returns_empty_string_when_exhausted() {
        let (_, proxy) = proxy_over(FakeService {
            pages: vec![page(&[("df-1", "other")], Some(1)), page(&[], None)],
            ..Default::default()
        });

        let id = proxy.find_pipeline_id("p1-reports-1").await.unwrap();
        assert_eq!(id, "");
    }

    #[tokio::test]
    async fn test_find_walks_pages_with_markers() {
        let (service, proxy) = proxy_over(FakeService {
            pages: vec![
                page(&[("df-1", "a")], Some(1)),
                page(&[("df-2", "b")], Some(2)),
                page(&[("df-3", "p1-reports-9")], None),
            ],
            ..Default::default()
        });

        let id = proxy.find_pipeline_id(r"p1-reports-\d+").await.unwrap();
        assert_eq!(id, "df-3");

        let markers = service.list_markers.lock().unwrap();
        assert_eq!(
            *markers,
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_find_stops_when_cursor_is_missing() {
        let (service, proxy) = proxy_over(FakeService {
            pages: vec![PipelineListing {
                entries: vec![PipelineHandle::new("df-1", "other")],
                has_more: true,
                next_marker: None,
            }],
            ..Default::default()
        });

        let id = proxy.find_pipeline_id("p1-reports-1").await.unwrap();
        assert_eq!(id, "");
        assert_eq!(service.list_markers.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_rejects_invalid_pattern() {
        let (_, proxy) = proxy_over(FakeService::default());

        let err = proxy.find_pipeline_id("(").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidPattern(_)));
    }
}
