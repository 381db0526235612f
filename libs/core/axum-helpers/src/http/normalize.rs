use axum::Router;
use tower_http::normalize_path::NormalizePath;

/// Routes `/products/` the same as `/products`.
///
/// `Router::layer` runs after routing, so the path is rewritten by a
/// `NormalizePath` installed as the fallback of an otherwise empty router.
/// Apply it to API routes only: the docs UIs redirect `/swagger-ui` to
/// `/swagger-ui/` and would loop.
pub fn trim_trailing_slash(router: Router) -> Router {
    Router::new().fallback_service(NormalizePath::trim_trailing_slash(router))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        let products = Router::new().route("/", get(|| async { "list" }));
        trim_trailing_slash(Router::new().nest("/products", products))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_trailing_slash_is_trimmed() {
        assert_eq!(status_of("/products/").await, StatusCode::OK);
        assert_eq!(status_of("/products").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_still_missing() {
        assert_eq!(status_of("/orders/").await, StatusCode::NOT_FOUND);
    }
}
