use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
    response::{Html, IntoResponse},
    routing::get,
};
use mex_prometheus::{Encoder, TextEncoder};
use tracing::debug;

use crate::{error::ApiError, handler::MetricsHandler};

/// Header Prometheus sends with its scrape timeout in seconds.
pub const SCRAPE_TIMEOUT_HEADER: &str = "x-prometheus-scrape-timeout-seconds";

/// Headroom kept between the upstream deadline and Prometheus' own timeout.
const SCRAPE_TIMEOUT_MARGIN: Duration = Duration::from_millis(250);

/// HTTP service builder for the exporter.
pub struct HttpApi<H> {
    handler: Arc<H>,
    metrics_path: Arc<str>,
}

struct ApiState<H> {
    handler: Arc<H>,
    metrics_path: Arc<str>,
}

impl<H> Clone for ApiState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            metrics_path: Arc::clone(&self.metrics_path),
        }
    }
}

impl<H> HttpApi<H>
where
    H: MetricsHandler,
{
    /// `metrics_path` must pass [`validate_metrics_path`].
    pub fn new(handler: Arc<H>, metrics_path: &str) -> Result<Self, ApiError> {
        validate_metrics_path(metrics_path)?;
        Ok(Self {
            handler,
            metrics_path: Arc::from(metrics_path),
        })
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET / - Landing page
    /// - GET <metrics_path> - Prometheus text exposition
    pub fn router(self) -> Router {
        let state = ApiState {
            handler: self.handler,
            metrics_path: Arc::clone(&self.metrics_path),
        };
        Router::new()
            .route("/", get(index::<H>))
            .route(&self.metrics_path, get(metrics::<H>))
            .with_state(state)
    }
}

/// Checks a telemetry path before it is mounted.
///
/// The path must be absolute, must not be `/`, and must be a plain literal.
/// Route syntax (`{`, `}`, `*`, `:`), query or fragment markers, and
/// characters that would need escaping in the landing page link are rejected.
pub fn validate_metrics_path(path: &str) -> Result<(), ApiError> {
    const RESERVED: &[char] = &['{', '}', '*', ':', '?', '#', '<', '>', '&', '\'', '"'];
    let literal = path
        .chars()
        .all(|c| c.is_ascii_graphic() && !RESERVED.contains(&c));
    if !path.starts_with('/') || path == "/" || !literal {
        return Err(ApiError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// GET /
async fn index<H>(State(state): State<ApiState<H>>) -> Html<String>
where
    H: MetricsHandler,
{
    let path = &state.metrics_path;
    Html(format!(
        "<html>\n\
         <head><title>Marathon Exporter</title></head>\n\
         <body>\n\
         <h1>Marathon Exporter</h1>\n\
         <p><a href='{path}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    ))
}

/// GET <metrics_path>
///
/// Always 200 once encoded; a failed scrape shows up in the exporter's own metrics.
async fn metrics<H>(
    State(state): State<ApiState<H>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    H: MetricsHandler,
{
    let timeout = scrape_timeout(&headers);
    debug!(?timeout, "serving metrics");

    let families = state.handler.gather(timeout).await;
    let encoder = TextEncoder::new();
    let body = encoder.encode_to_string(&families)?;

    Ok(([(CONTENT_TYPE, encoder.format_type().to_string())], body))
}

fn scrape_timeout(headers: &HeaderMap) -> Option<Duration> {
    let secs: f64 = headers
        .get(SCRAPE_TIMEOUT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let timeout = Duration::try_from_secs_f64(secs).ok()?;
    Some(
        timeout
            .checked_sub(SCRAPE_TIMEOUT_MARGIN)
            .filter(|t| !t.is_zero())
            .unwrap_or(timeout),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use mex_prometheus::MetricFamily;
    use prometheus::{IntGauge, Registry};
    use tower::ServiceExt;

    use super::*;

    #[derive(Default)]
    struct FakeHandler {
        timeouts: Mutex<Vec<Option<Duration>>>,
    }

    #[async_trait]
    impl MetricsHandler for FakeHandler {
        async fn gather(&self, timeout: Option<Duration>) -> Vec<MetricFamily> {
            self.timeouts.lock().unwrap().push(timeout);
            let registry = Registry::new();
            let up = IntGauge::new("marathon_up", "Whether the last scrape succeeded.").unwrap();
            up.set(0);
            registry.register(Box::new(up)).unwrap();
            registry.gather()
        }
    }

    fn router(handler: Arc<FakeHandler>, path: &str) -> Router {
        HttpApi::new(handler, path).unwrap().router()
    }

    async fn get(router: Router, uri: &str, timeout: Option<&str>) -> (StatusCode, HeaderMap, String) {
        let mut request = Request::builder().uri(uri);
        if let Some(t) = timeout {
            request = request.header(SCRAPE_TIMEOUT_HEADER, t);
        }
        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_links_metrics_path() {
        let (status, _, body) = get(router(Arc::default(), "/stats"), "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<a href='/stats'>Metrics</a>"));
    }

    #[tokio::test]
    async fn metrics_served_as_text_even_when_down() {
        let (status, headers, body) = get(router(Arc::default(), "/metrics"), "/metrics", None).await;

        assert_eq!(status, StatusCode::OK);
        let content_type = headers.get(CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains("marathon_up 0\n"));
    }

    #[tokio::test]
    async fn scrape_timeout_header_is_forwarded() {
        let handler = Arc::new(FakeHandler::default());
        get(router(handler.clone(), "/metrics"), "/metrics", Some("10")).await;
        get(router(handler.clone(), "/metrics"), "/metrics", Some("junk")).await;
        get(router(handler.clone(), "/metrics"), "/metrics", None).await;

        assert_eq!(
            *handler.timeouts.lock().unwrap(),
            vec![Some(Duration::from_millis(9_750)), None, None]
        );
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (status, _, _) = get(router(Arc::default(), "/metrics"), "/other", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejects_bad_metrics_paths() {
        let handler = Arc::new(FakeHandler::default());
        for path in [
            "metrics", "/", "", "/m{x}", "/m/{*rest}", "/m*", "/:id", "/m?x=1", "/a b", "/m'><x>",
        ] {
            assert!(
                matches!(HttpApi::new(handler.clone(), path), Err(ApiError::InvalidPath(_))),
                "{path:?} accepted"
            );
        }
    }

    #[test]
    fn accepts_plain_metrics_paths() {
        for path in ["/metrics", "/stats/prom", "/m_x-1.txt"] {
            assert!(validate_metrics_path(path).is_ok(), "{path:?} rejected");
        }
    }

    #[test]
    fn tiny_timeouts_keep_full_budget() {
        let mut headers = HeaderMap::new();
        headers.insert(SCRAPE_TIMEOUT_HEADER, "0.2".parse().unwrap());
        assert_eq!(scrape_timeout(&headers), Some(Duration::from_millis(200)));

        headers.insert(SCRAPE_TIMEOUT_HEADER, "-1".parse().unwrap());
        assert_eq!(scrape_timeout(&headers), None);
    }

    #[test]
    fn unrepresentable_timeouts_are_ignored() {
        let mut headers = HeaderMap::new();
        for raw in ["1e300", "inf", "NaN"] {
            headers.insert(SCRAPE_TIMEOUT_HEADER, raw.parse().unwrap());
            assert_eq!(scrape_timeout(&headers), None, "{raw}");
        }
    }

    #[tokio::test]
    async fn huge_timeout_header_still_serves_metrics() {
        let handler = Arc::new(FakeHandler::default());
        let (status, _, body) = get(router(handler.clone(), "/metrics"), "/metrics", Some("1e300")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("marathon_up 0\n"));
        assert_eq!(*handler.timeouts.lock().unwrap(), vec![None]);
    }
}
