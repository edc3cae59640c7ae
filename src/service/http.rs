//! HTTP implementation of the details service.

use super::DetailsService;
use super::models::{MachineTypeRecord, MetricKind, StaticDetailsRecord, UtilizationSample};
use crate::config::Config;
use crate::error::AppError;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Creates an HTTP client with request timeout and connection pooling.
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
}

/// Details service backed by a JSON HTTP API.
///
/// Endpoints, relative to the configured API domain:
/// - `GET /details` -> [`StaticDetailsRecord`]
/// - `GET /machine-types` -> `[MachineTypeRecord]`
/// - `GET /utilization/{cpu|memory|gpu}` -> [`UtilizationSample`]
#[derive(Debug, Clone)]
pub struct HttpDetailsService {
    client: Client,
    base_url: String,
}

impl HttpDetailsService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::new(client, config.api_domain.clone()))
    }

    pub fn details_url(&self) -> String {
        format!("{}/details", self.base_url)
    }

    pub fn machine_types_url(&self) -> String {
        format!("{}/machine-types", self.base_url)
    }

    pub fn utilization_url(&self, kind: MetricKind) -> String {
        format!("{}/utilization/{}", self.base_url, kind.path_segment())
    }
}

impl DetailsService for HttpDetailsService {
    fn fetch_static_details(&self) -> BoxFuture<'_, Result<StaticDetailsRecord, AppError>> {
        async move { fetch(&self.client, &self.details_url()).await }.boxed()
    }

    fn fetch_machine_types(&self) -> BoxFuture<'_, Result<Vec<MachineTypeRecord>, AppError>> {
        async move { fetch(&self.client, &self.machine_types_url()).await }.boxed()
    }

    fn fetch_utilization(
        &self,
        kind: MetricKind,
    ) -> BoxFuture<'_, Result<UtilizationSample, AppError>> {
        async move {
            let sample: UtilizationSample = fetch(&self.client, &self.utilization_url(kind)).await?;
            if sample.kind != kind {
                return Err(AppError::api_unexpected_structure(
                    format!("expected {kind} sample, got {}", sample.kind),
                    self.utilization_url(kind),
                ));
            }
            Ok(sample)
        }
        .boxed()
    }
}

/// GET `url` and decode the JSON body, mapping HTTP and payload failures to `AppError`.
#[instrument(skip(client))]
async fn fetch<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, AppError> {
    debug!("Fetching data from URL: {url}");

    let response = client.get(url).send().await.map_err(|e| {
        error!("Request failed for URL {}: {}", url, e);
        if e.is_timeout() {
            AppError::network_timeout(url)
        } else if e.is_connect() {
            AppError::network_connection(url, e.to_string())
        } else {
            AppError::ApiFetch(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("Unknown error");
        error!("HTTP {} - {} (URL: {})", status.as_u16(), reason, url);
        return Err(status_error(status.as_u16(), reason, url));
    }

    let response_text = response.text().await?;
    debug!("Response length: {} bytes", response_text.len());

    serde_json::from_str::<T>(&response_text).map_err(|e| {
        error!("Failed to parse API response: {} (URL: {})", e, url);
        parse_error(&response_text, e, url)
    })
}

fn status_error(status_code: u16, reason: &str, url: &str) -> AppError {
    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

fn parse_error(body: &str, e: serde_json::Error, url: &str) -> AppError {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        AppError::api_no_data("Response body is empty", url)
    } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        AppError::api_malformed_json("Response is not valid JSON", url)
    } else {
        AppError::api_unexpected_structure(e.to_string(), url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::assembly::{CPU, MEMORY};
    use crate::panel::{Panel, PanelConfig, SlotId, SlotStatus};
    use crate::testing_utils::TestDataBuilder;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn mock_service(mock_server: &MockServer) -> HttpDetailsService {
        let client = create_http_client_with_timeout(5).expect("client");
        HttpDetailsService::new(client, mock_server.uri())
    }

    fn service() -> HttpDetailsService {
        let client = create_http_client_with_timeout(5).expect("client");
        HttpDetailsService::new(client, "http://localhost:8080/")
    }

    #[test]
    fn test_endpoint_urls() {
        let service = service();
        assert_eq!(service.details_url(), "http://localhost:8080/details");
        assert_eq!(service.machine_types_url(), "http://localhost:8080/machine-types");
        assert_eq!(
            service.utilization_url(MetricKind::Gpu),
            "http://localhost:8080/utilization/gpu"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        let url = "http://localhost:8080/details";
        assert!(matches!(status_error(404, "Not Found", url), AppError::ApiNotFound { .. }));
        assert!(matches!(
            status_error(429, "Too Many Requests", url),
            AppError::ApiRateLimit { .. }
        ));
        assert!(matches!(
            status_error(503, "Service Unavailable", url),
            AppError::ApiServiceUnavailable { status: 503, .. }
        ));
        assert!(matches!(
            status_error(401, "Unauthorized", url),
            AppError::ApiClientError { status: 401, .. }
        ));
        assert!(matches!(
            status_error(500, "Internal Server Error", url),
            AppError::ApiServerError { status: 500, .. }
        ));
    }

    #[test]
    fn test_parse_error_classification() {
        let url = "http://localhost:8080/utilization/cpu";
        let err = serde_json::from_str::<UtilizationSample>("").unwrap_err();
        assert!(matches!(parse_error("  ", err, url), AppError::ApiNoData { .. }));

        let err = serde_json::from_str::<UtilizationSample>("<html>").unwrap_err();
        assert!(matches!(
            parse_error("<html>", err, url),
            AppError::ApiMalformedJson { .. }
        ));

        let err = serde_json::from_str::<UtilizationSample>(r#"{"percent":1}"#).unwrap_err();
        assert!(matches!(
            parse_error(r#"{"percent":1}"#, err, url),
            AppError::ApiUnexpectedStructure { .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_static_details_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/details"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(TestDataBuilder::reference_details()),
            )
            .mount(&mock_server)
            .await;

        let service = mock_service(&mock_server);
        let details = service.fetch_static_details().await.unwrap();
        assert_eq!(details, TestDataBuilder::reference_details());
    }

    #[tokio::test]
    async fn test_fetch_machine_types_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/machine-types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::machine_types()))
            .mount(&mock_server)
            .await;

        let service = mock_service(&mock_server);
        let machine_types = service.fetch_machine_types().await.unwrap();
        assert_eq!(machine_types.len(), 2);
        assert_eq!(machine_types[1].description, "4 vCPUs, 15 GB RAM");
    }

    #[tokio::test]
    async fn test_fetch_utilization_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/utilization/gpu"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::reference_sample(MetricKind::Gpu)),
            )
            .mount(&mock_server)
            .await;

        let service = mock_service(&mock_server);
        let sample = service.fetch_utilization(MetricKind::Gpu).await.unwrap();
        assert_eq!(sample.percent, 100.0);
        assert_eq!(sample.device.as_deref(), Some("Tesla K80"));
    }

    #[tokio::test]
    async fn test_fetch_utilization_rejects_wrong_metric() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/utilization/cpu"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::reference_sample(MetricKind::Memory)),
            )
            .mount(&mock_server)
            .await;

        let service = mock_service(&mock_server);
        let result = service.fetch_utilization(MetricKind::Cpu).await;
        assert!(matches!(result, Err(AppError::ApiUnexpectedStructure { .. })));
    }

    #[tokio::test]
    async fn test_fetch_server_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/details"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let service = mock_service(&mock_server);
        let result = service.fetch_static_details().await;
        assert!(matches!(
            result,
            Err(AppError::ApiServerError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/utilization/memory"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let service = mock_service(&mock_server);
        let result = service.fetch_utilization(MetricKind::Memory).await;
        assert!(matches!(result, Err(AppError::ApiNotFound { .. })));
    }

    #[tokio::test]
    async fn test_panel_refresh_failure_names_metric() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/details"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(TestDataBuilder::reference_details()),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/machine-types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestDataBuilder::machine_types()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/utilization/cpu"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::reference_sample(MetricKind::Cpu)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/utilization/memory"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let service: Arc<dyn DetailsService> = Arc::new(mock_service(&mock_server));
        let mut panel = Panel::mount(service, PanelConfig::default()).await.unwrap();
        for _ in 0..4 {
            panel.advance();
        }

        let memory = SlotId::from(MEMORY);
        let cpu = SlotId::from(CPU);
        let settled = |panel: &Panel| {
            panel.slot(&memory).map(|slot| slot.status) == Some(SlotStatus::Error)
                && panel.slot(&cpu).map(|slot| slot.status) == Some(SlotStatus::Ready)
        };
        while !settled(&panel) {
            let event = tokio::time::timeout(Duration::from_secs(5), panel.next_event())
                .await
                .expect("refresh timed out")
                .expect("event queue closed");
            panel.handle_event(event);
        }
        panel.dispose();

        let last_error = panel
            .slot(&memory)
            .and_then(|slot| slot.last_error.clone())
            .unwrap();
        assert!(last_error.starts_with(
            "Failed to refresh Memory utilization: API service unavailable (503)"
        ));
        assert!(last_error.ends_with("/utilization/memory)"));
        assert_eq!(
            panel.slot(&cpu).and_then(|slot| slot.value.as_deref()),
            Some("CPU: 50.0%")
        );
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/machine-types"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let service = mock_service(&mock_server);
        let result = service.fetch_machine_types().await;
        assert!(matches!(result, Err(AppError::ApiMalformedJson { .. })));
    }
}
