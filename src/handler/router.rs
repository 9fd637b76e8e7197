//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching, dispatching, and the headers every response carries.

use crate::api;
use crate::config::{AppState, Site, SiteKind};
use crate::handler::{pages, static_files};
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::header::CONTENT_LENGTH;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw (still percent-encoded) request path
    pub path: String,
    pub query: Option<String>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            is_head: *req.method() == Method::HEAD,
            if_modified_since: header("if-modified-since"),
        }
    }
}

/// What a request resolves to on a given site
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    Preflight,
    MethodNotAllowed,
    AppInfo,
    FileList { dir: &'a Path, url_prefix: &'a str },
    LandingPage,
    Redirect { target: &'a str },
    Static,
}

/// Match method and path against the site's route table
pub fn match_route<'a>(method: &Method, path: &str, site: &'a Site) -> Route<'a> {
    match method {
        &Method::OPTIONS => return Route::Preflight,
        &Method::GET | &Method::HEAD => {}
        _ => return Route::MethodNotAllowed,
    }

    match (&site.kind, path) {
        (SiteKind::Portal { .. }, "/api/info") => Route::AppInfo,
        (
            SiteKind::Portal {
                downloads_dir,
                downloads_url_prefix,
            },
            "/api/files",
        ) => Route::FileList {
            dir: downloads_dir,
            url_prefix: downloads_url_prefix,
        },
        (SiteKind::Mirror { .. }, "/") => Route::LandingPage,
        (SiteKind::Mirror { latest_apk }, "/download/latest") => Route::Redirect {
            target: latest_apk,
        },
        _ => Route::Static,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, peer_addr));
    drop(req);

    logger::log_debug(&format!(
        "[{}] {} {}",
        state.site.name(),
        ctx.method,
        ctx.path
    ));

    let route = match_route(&ctx.method, &ctx.path, &state.site);
    let mut response = dispatch(route, &ctx, &state).await;
    http::apply_default_headers(&mut response, &state.config.http.server_name);

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = body_bytes(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Bytes the response body will carry; streamed files only know it from the header
fn body_bytes(response: &Response<ResponseBody>) -> u64 {
    response.body().size_hint().exact().unwrap_or_else(|| {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    })
}

async fn dispatch(
    route: Route<'_>,
    ctx: &RequestContext,
    state: &AppState,
) -> Response<ResponseBody> {
    match route {
        Route::Preflight => http::build_options_response(),
        Route::MethodNotAllowed => {
            logger::log_warning(&format!("Method not allowed: {}", ctx.method));
            http::build_405_response()
        }
        Route::AppInfo => api::handle_info(&state.config.app),
        Route::FileList { dir, url_prefix } => api::handle_files(dir, url_prefix).await,
        Route::LandingPage => http::build_html_response(pages::LANDING_PAGE, ctx.is_head),
        Route::Redirect { target } => http::build_redirect_response(target, 302),
        Route::Static => static_files::serve_static(ctx, &state.site).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::body::Bytes;
    use std::fs;
    use std::path::PathBuf;

    fn test_config() -> Config {
        let mut cfg = Config::load_from("this-config-file-does-not-exist").unwrap();
        cfg.logging.access_log = false;
        cfg
    }

    fn portal_state(root: &Path) -> Arc<AppState> {
        let site = Site {
            addr: "127.0.0.1:0".parse().unwrap(),
            root_dir: root.to_path_buf(),
            index_files: vec!["index.html".to_string()],
            kind: SiteKind::Portal {
                downloads_dir: root.join("downloads"),
                downloads_url_prefix: "/downloads/".to_string(),
            },
        };
        Arc::new(AppState::new(test_config(), site))
    }

    fn mirror_state(root: &Path) -> Arc<AppState> {
        let site = Site {
            addr: "127.0.0.1:0".parse().unwrap(),
            root_dir: root.to_path_buf(),
            index_files: vec!["index.html".to_string()],
            kind: SiteKind::Mirror {
                latest_apk: "/android/nexus-controller-hub-v2.apk".to_string(),
            },
        };
        Arc::new(AppState::new(test_config(), site))
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> (Response<ResponseBody>, Bytes) {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        let peer = "127.0.0.1:5555".parse().unwrap();
        let resp = handle_request(req, peer, Arc::clone(state)).await.unwrap();
        let (parts, body) = resp.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (Response::from_parts(parts, http::body::full(bytes.clone())), bytes)
    }

    fn assert_cors(resp: &Response<ResponseBody>) {
        let h = resp.headers();
        assert_eq!(h["access-control-allow-origin"], "*");
        assert_eq!(h["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(h["access-control-allow-headers"], "*");
    }

    #[test]
    fn test_match_route_portal() {
        let state = portal_state(Path::new("web"));
        let site = &state.site;
        assert_eq!(match_route(&Method::GET, "/api/info", site), Route::AppInfo);
        assert_eq!(
            match_route(&Method::HEAD, "/api/files", site),
            Route::FileList {
                dir: Path::new("web/downloads"),
                url_prefix: "/downloads/",
            }
        );
        assert_eq!(match_route(&Method::GET, "/", site), Route::Static);
        assert_eq!(match_route(&Method::GET, "/download/latest", site), Route::Static);
        assert_eq!(match_route(&Method::OPTIONS, "/anything", site), Route::Preflight);
        assert_eq!(match_route(&Method::POST, "/api/info", site), Route::MethodNotAllowed);
    }

    #[test]
    fn test_match_route_mirror() {
        let state = mirror_state(Path::new("."));
        let site = &state.site;
        assert_eq!(match_route(&Method::GET, "/", site), Route::LandingPage);
        assert_eq!(
            match_route(&Method::GET, "/download/latest", site),
            Route::Redirect {
                target: "/android/nexus-controller-hub-v2.apk"
            }
        );
        assert_eq!(match_route(&Method::GET, "/api/info", site), Route::Static);
    }

    #[tokio::test]
    async fn test_existing_file_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        fs::write(dir.path().join("blob.bin"), &content).unwrap();
        let state = portal_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/blob.bin").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body.as_ref(), content.as_slice());
        assert_eq!(resp.headers()["content-type"], "application/octet-stream");
        assert!(resp.headers().contains_key("last-modified"));
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_missing_file_is_404_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        let state = mirror_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/missing.txt").await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body.as_ref(), b"404 Not Found");
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_traversal_is_404() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("site");
        fs::create_dir(&root).unwrap();
        fs::write(parent.path().join("secret.txt"), b"secret").unwrap();
        let state = mirror_state(&root);

        let (resp, body) = send(&state, Method::GET, "/%2e%2e/secret.txt").await;
        assert_eq!(resp.status(), 404);
        assert_ne!(body.as_ref(), b"secret");
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_apk_headers() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("android")).unwrap();
        fs::write(dir.path().join("android/nexus-v2.apk"), b"PK\x03\x04").unwrap();
        let state = mirror_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/android/nexus-v2.apk").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body.as_ref(), b"PK\x03\x04");
        assert_eq!(
            resp.headers()["content-type"],
            "application/vnd.android.package-archive"
        );
        let disposition = resp.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("nexus-v2.apk"));
    }

    #[tokio::test]
    async fn test_options_empty_200() {
        let dir = tempfile::tempdir().unwrap();
        for state in [portal_state(dir.path()), mirror_state(dir.path())] {
            let (resp, body) = send(&state, Method::OPTIONS, "/any/path").await;
            assert_eq!(resp.status(), 200);
            assert!(body.is_empty());
            assert_cors(&resp);
        }
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = portal_state(dir.path());
        let (resp, _) = send(&state, Method::DELETE, "/index.html").await;
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["allow"], "GET, HEAD, OPTIONS");
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_mirror_landing_and_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let state = mirror_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), 200);
        assert!(resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(!body.is_empty());

        let (resp, body) = send(&state, Method::GET, "/download/latest").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(
            resp.headers()["location"],
            "/android/nexus-controller-hub-v2.apk"
        );
        assert!(body.is_empty());
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_portal_root_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), b"<h1>portal</h1>").unwrap();
        let state = portal_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body.as_ref(), b"<h1>portal</h1>");
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_directory_redirect_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let state = portal_state(dir.path());

        let (resp, _) = send(&state, Method::GET, "/docs?lang=en").await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/docs/?lang=en");
    }

    #[tokio::test]
    async fn test_directory_redirect_stays_on_host() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("android")).unwrap();
        let state = mirror_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "//android").await;
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/android/");
        assert!(body.is_empty());
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_head_static_file_has_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.apk"), vec![7u8; 2048]).unwrap();
        let state = mirror_state(dir.path());

        let (get, get_body) = send(&state, Method::GET, "/app.apk").await;
        let (head, head_body) = send(&state, Method::HEAD, "/app.apk").await;
        assert_eq!(head.status(), 200);
        assert_eq!(get_body.len(), 2048);
        assert!(head_body.is_empty());
        assert_eq!(head.headers()["content-length"], "2048");
        assert_eq!(head.headers(), get.headers());
    }

    #[tokio::test]
    async fn test_large_file_streamed_intact() {
        let dir = tempfile::tempdir().unwrap();
        let content: Vec<u8> = (0..=250u8).cycle().take(3 * 1024 * 1024 + 5).collect();
        fs::write(dir.path().join("big.apk"), &content).unwrap();
        let state = mirror_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/big.apk").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], content.len().to_string().as_str());
        assert_eq!(body.len(), content.len());
        assert!(body.as_ref() == content.as_slice());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_file_is_500() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.txt");
        fs::write(&path, b"secret").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&path).is_ok() {
            // Permission bits do not apply (running as root)
            return;
        }
        let state = portal_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/locked.txt").await;
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers()["content-type"], "text/plain; charset=utf-8");
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("500 Internal Server Error: "));
        assert!(text.len() > "500 Internal Server Error: ".len());
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_if_modified_since_returns_304() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        let state = portal_state(dir.path());

        let (first, _) = send(&state, Method::GET, "/a.txt").await;
        let last_modified = first.headers()["last-modified"].to_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/a.txt")
            .header("If-Modified-Since", last_modified)
            .body(())
            .unwrap();
        let resp = handle_request(req, "127.0.0.1:1".parse().unwrap(), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(resp.status(), 304);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_repeated_get_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.html"), b"<p>same</p>").unwrap();
        let state = portal_state(dir.path());

        let (a, body_a) = send(&state, Method::GET, "/page.html").await;
        let (b, body_b) = send(&state, Method::GET, "/page.html").await;
        assert_eq!(a.status(), b.status());
        assert_eq!(a.headers(), b.headers());
        assert_eq!(body_a, body_b);
    }

    #[tokio::test]
    async fn test_api_files_missing_dir_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let state = portal_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/api/files").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body.as_ref(), b"[]");
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_api_files_single_apk() {
        let dir = tempfile::tempdir().unwrap();
        let downloads: PathBuf = dir.path().join("downloads");
        fs::create_dir(&downloads).unwrap();
        fs::write(downloads.join("demo.apk"), vec![0u8; 1024]).unwrap();
        let state = portal_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/api/files").await;
        assert_eq!(resp.status(), 200);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "demo.apk");
        assert_eq!(entries[0]["size"], 1024);
        assert_eq!(entries[0]["download_url"], "/downloads/demo.apk");
        assert!(entries[0]["modified"].is_string());
    }

    #[tokio::test]
    async fn test_api_info_ignores_query_and_has_app_name() {
        let dir = tempfile::tempdir().unwrap();
        let state = portal_state(dir.path());

        let (resp, body) = send(&state, Method::GET, "/api/info?x=1").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "application/json");
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["app_name"], "Nexus Controller Hub");
        assert_cors(&resp);
    }
}
