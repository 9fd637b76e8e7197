// Site module
// A site is one listener with its own root directory and route set

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use super::parse_socket_addr;
use super::types::{MirrorConfig, PortalConfig};

/// Site-specific routes layered on top of static file serving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteKind {
    /// `/api/info` and `/api/files`
    Portal {
        downloads_dir: PathBuf,
        downloads_url_prefix: String,
    },
    /// Landing page at `/` and `/download/latest` redirect
    Mirror { latest_apk: String },
}

/// Runnable site built from a configuration section
#[derive(Debug, Clone)]
pub struct Site {
    pub addr: SocketAddr,
    pub root_dir: PathBuf,
    pub index_files: Vec<String>,
    pub kind: SiteKind,
}

impl Site {
    pub fn portal(cfg: &PortalConfig) -> Result<Self, String> {
        let root_dir = PathBuf::from(&cfg.root_dir);
        let downloads_dir = resolve_under(&root_dir, &cfg.downloads_dir);
        Ok(Self {
            addr: parse_socket_addr(&cfg.bind_address, cfg.port)?,
            root_dir,
            index_files: cfg.index_files.clone(),
            kind: SiteKind::Portal {
                downloads_dir,
                downloads_url_prefix: cfg.downloads_url_prefix.clone(),
            },
        })
    }

    pub fn mirror(cfg: &MirrorConfig) -> Result<Self, String> {
        Ok(Self {
            addr: parse_socket_addr(&cfg.bind_address, cfg.port)?,
            root_dir: PathBuf::from(&cfg.root_dir),
            index_files: cfg.index_files.clone(),
            kind: SiteKind::Mirror {
                latest_apk: cfg.latest_apk.clone(),
            },
        })
    }

    /// Directory listed by `/api/files` when its download links would not be
    /// served by this site, i.e. it is not `root_dir` joined with the URL prefix
    pub fn unserved_downloads_dir(&self) -> Option<&Path> {
        match &self.kind {
            SiteKind::Portal {
                downloads_dir,
                downloads_url_prefix,
            } => {
                let served = self.root_dir.join(downloads_url_prefix.trim_matches('/'));
                (served != *downloads_dir).then_some(downloads_dir.as_path())
            }
            SiteKind::Mirror { .. } => None,
        }
    }

    /// Short name used in log lines
    pub const fn name(&self) -> &'static str {
        match self.kind {
            SiteKind::Portal { .. } => "portal",
            SiteKind::Mirror { .. } => "mirror",
        }
    }
}

fn resolve_under(root: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}
