//! Static file serving module
//!
//! Resolves request paths under a site root, opens the file and builds the
//! response with content type, download disposition and `Last-Modified`.
//! File bodies are streamed from disk.

use crate::config::Site;
use crate::error::ServeError;
use crate::handler::router::RequestContext;
use crate::http::{self, body, cache, mime, ResponseBody};
use crate::logger;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// A regular file opened under the site root
#[derive(Debug)]
pub struct StaticFile {
    pub path: PathBuf,
    pub file: fs::File,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Outcome of resolving a request path
#[derive(Debug)]
pub enum Resolution {
    File(StaticFile),
    /// Directory requested without a trailing slash; holds the
    /// normalized, percent-encoded target path ending in `/`
    AddSlash(String),
}

/// Serve a request path from the site root
pub async fn serve_static(ctx: &RequestContext, site: &Site) -> Response<ResponseBody> {
    match resolve(&site.root_dir, &ctx.path, &site.index_files).await {
        Ok(Resolution::File(file)) => build_file_response(file, ctx),
        Ok(Resolution::AddSlash(target)) => {
            let location = match &ctx.query {
                Some(q) => format!("{target}?{q}"),
                None => target,
            };
            http::build_redirect_response(&location, 301)
        }
        Err(err) => {
            match &err {
                ServeError::Forbidden(p) => {
                    logger::log_warning(&format!("Path traversal attempt blocked: {p}"));
                }
                ServeError::Io(e) => {
                    logger::log_error(&format!("Failed to read '{}': {e}", ctx.path));
                }
                ServeError::NotFound => {}
            }
            http::build_error_response(&err)
        }
    }
}

/// Resolve a raw (percent-encoded) request path to a file under `root`
pub async fn resolve(
    root: &Path,
    raw_path: &str,
    index_files: &[String],
) -> Result<Resolution, ServeError> {
    let decoded = urlencoding::decode(raw_path).map_err(|_| ServeError::NotFound)?;
    let relative = relative_path(&decoded)?;
    let mut file_path = root.join(&relative);

    let meta = fs::metadata(&file_path)
        .await
        .map_err(|_| ServeError::NotFound)?;

    if meta.is_dir() {
        if !decoded.ends_with('/') && !relative.as_os_str().is_empty() {
            return Ok(Resolution::AddSlash(slash_target(&relative)));
        }
        file_path = find_index_file(&file_path, index_files)
            .await
            .ok_or(ServeError::NotFound)?;
    } else if !meta.is_file() {
        return Err(ServeError::NotFound);
    }

    ensure_within_root(root, &file_path, &decoded).await?;

    // The file is confirmed to exist; failing to open it now is a server error
    let file = fs::File::open(&file_path).await?;
    let meta = file.metadata().await?;

    Ok(Resolution::File(StaticFile {
        path: file_path,
        file,
        len: meta.len(),
        modified: meta.modified().ok(),
    }))
}

/// Absolute redirect target for a directory, rebuilt from the normalized
/// path so a request like `//host` can never become `Location: //host/`
fn slash_target(relative: &Path) -> String {
    let mut target = String::from("/");
    for part in relative.iter() {
        target.push_str(&urlencoding::encode(&part.to_string_lossy()));
        target.push('/');
    }
    target
}

/// Turn a decoded URL path into a root-relative path
///
/// `..` may walk back inside the path but never above the root.
pub fn relative_path(decoded: &str) -> Result<PathBuf, ServeError> {
    if decoded.contains('\0') {
        return Err(ServeError::NotFound);
    }

    let mut relative = PathBuf::new();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(ServeError::Forbidden(decoded.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ServeError::Forbidden(decoded.to_string()));
            }
        }
    }
    Ok(relative)
}

async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

/// Symlinks may point anywhere; the canonical target must stay under the root
async fn ensure_within_root(root: &Path, file_path: &Path, decoded: &str) -> Result<(), ServeError> {
    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Site root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Err(ServeError::NotFound);
        }
    };
    let file_canonical = fs::canonicalize(file_path)
        .await
        .map_err(|_| ServeError::NotFound)?;

    if file_canonical.starts_with(&root_canonical) {
        Ok(())
    } else {
        Err(ServeError::Forbidden(format!(
            "{decoded} -> {}",
            file_canonical.display()
        )))
    }
}

/// Build the 200 (or 304) response for an opened file
fn build_file_response(file: StaticFile, ctx: &RequestContext) -> Response<ResponseBody> {
    let last_modified = file.modified.map(cache::format_http_date);

    if let Some(modified) = file.modified {
        if cache::not_modified_since(ctx.if_modified_since.as_deref(), modified) {
            return http::build_304_response(last_modified.as_deref().unwrap_or_default());
        }
    }

    let extension = file.path.extension().and_then(|e| e.to_str());
    let content_type = mime::get_content_type(extension);

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", file.len);

    if let Some(ref lm) = last_modified {
        builder = builder.header("Last-Modified", lm);
    }

    if mime::is_apk(extension) {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        builder = builder.header("Content-Disposition", attachment_disposition(&name));
    }

    let payload = if ctx.is_head {
        body::empty()
    } else {
        body::file_stream(file.file, file.len)
    };

    builder.body(payload).unwrap_or_else(|e| {
        http::response::log_build_error("200", &e);
        Response::new(body::empty())
    })
}

/// `attachment; filename="<name>"` with quotes escaped and control characters replaced
pub fn attachment_disposition(file_name: &str) -> String {
    let mut quoted = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => quoted.push('_'),
            c => quoted.push(c),
        }
    }
    format!("attachment; filename=\"{quoted}\"")
}
