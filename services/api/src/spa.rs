use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Location of the built single-page application.
#[derive(Debug, Clone)]
pub(crate) struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a request path onto the asset directory. `None` when the path tries to escape it.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => resolved.push(segment),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }

    fn index(&self) -> PathBuf {
        self.root.join("index.html")
    }
}

/// Catch-all router: unknown API paths get JSON 404s, everything else gets the SPA.
pub(crate) fn spa_router(assets: StaticAssets) -> Router {
    Router::new()
        .fallback(spa_fallback)
        .with_state(Arc::new(assets))
}

pub(crate) async fn spa_fallback(
    State(assets): State<Arc<StaticAssets>>,
    method: Method,
    uri: Uri,
) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no API route for {path}") })),
        )
            .into_response();
    }

    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    if path.contains('\\') {
        return traversal_rejected(path);
    }
    let Some(candidate) = assets.resolve(path) else {
        return traversal_rejected(path);
    };

    if candidate != assets.root && is_file(&candidate).await {
        return serve_file(&candidate).await;
    }

    let index = assets.index();
    if is_file(&index).await {
        return serve_file(&index).await;
    }

    warn!(root = %assets.root.display(), "SPA entry point missing");
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "single-page application bundle not found" })),
    )
        .into_response()
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            debug!(path = %path.display(), %mime, "serving static asset");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.essence_str().to_string())],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read static asset");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "failed to read static asset" })),
            )
                .into_response()
        }
    }
}

fn traversal_rejected(path: &str) -> Response {
    warn!(%path, "rejected path traversal attempt");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid asset path" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "workboard-spa-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(dir.join("assets")).expect("create fixture dir");
        std::fs::write(dir.join("index.html"), "<!doctype html><div id=\"root\"></div>")
            .expect("write index");
        std::fs::write(dir.join("assets/app.js"), "console.log('workboard');")
            .expect("write asset");
        dir
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes")
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn client_routes_receive_index() {
        let router = spa_router(StaticAssets::new(fixture_dir("index")));
        let response = get(router, "/jobs/job-000001/apply").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html"
        );
        assert!(body_text(response).await.contains("root"));
    }

    #[tokio::test]
    async fn existing_assets_are_served_with_guessed_type() {
        let router = spa_router(StaticAssets::new(fixture_dir("asset")));
        let response = get(router, "/assets/app.js").await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE]
            .to_str()
            .expect("ascii header")
            .to_string();
        assert!(content_type.contains("javascript"));
        assert!(body_text(response).await.contains("workboard"));
    }

    #[tokio::test]
    async fn unknown_api_paths_return_json_not_found() {
        let router = spa_router(StaticAssets::new(fixture_dir("api")));
        let response = get(router, "/api/v1/nothing-here").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("no API route"));
    }

    #[test]
    fn resolve_rejects_parent_segments() {
        let assets = StaticAssets::new("/srv/public");
        assert!(assets.resolve("/../etc/passwd").is_none());
        assert!(assets.resolve("/assets/../../secret").is_none());
        assert_eq!(
            assets.resolve("/assets/./app.js"),
            Some(PathBuf::from("/srv/public/assets/app.js"))
        );
    }

    #[tokio::test]
    async fn missing_bundle_is_reported() {
        let router = spa_router(StaticAssets::new("/definitely/not/a/bundle"));
        let response = get(router, "/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
