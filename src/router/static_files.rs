//! Registers the files of a directory as constant `GET` routes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

use crate::context::Context;
use crate::parser::Method;
use crate::response::StatusCode;
use crate::router::{Error, Router};

/// Content type served for a file extension, if one is known.
pub fn content_type_for(extension: &str) -> Option<String> {
    match extension {
        "html" | "htm" => Some("text/html".to_string()),
        "css" => Some("text/css".to_string()),
        "js" => Some("text/javascript".to_string()),
        "png" | "jpg" | "jpeg" | "gif" => Some(format!("image/{extension}")),
        _ => None,
    }
}

/// Collects every regular file below `dir`, with its path relative to `root`.
fn collect_files(root: &Path, dir: &Path, files: &mut Vec<(PathBuf, PathBuf)>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("skipping unreadable directory {}: {e}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, files);
        } else if let Ok(relative) = path.strip_prefix(root).map(Path::to_path_buf) {
            files.push((path, relative));
        }
    }
}

/// The pattern a file is served under; `index.html` and `index.htm` stand
/// for their directory.
fn pattern_for(prefix: &str, relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if matches!(parts.last().map(String::as_str), Some("index.html" | "index.htm")) {
        parts.pop();
    }

    format!("{}/{}", prefix.trim_end_matches('/'), parts.join("/"))
}

impl Router {
    /// Serve every file under `dir` at `prefix`, e.g. `dir/css/site.css` as
    /// `GET {prefix}/css/site.css`.
    ///
    /// Files are read once, now, and served from memory. Unreadable files
    /// are logged and skipped. Returns the number of routes registered.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::StaticDir`] when `dir` does not exist or is not
    /// a directory.
    pub fn static_dir(&mut self, prefix: &str, dir: impl AsRef<Path>) -> Result<usize, Error> {
        let dir = dir.as_ref();
        let metadata = fs::metadata(dir).map_err(|source| Error::StaticDir {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::StaticDir {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let mut files = Vec::new();
        collect_files(dir, dir, &mut files);

        let mut registered = 0;
        for (path, relative) in files {
            let content: Arc<[u8]> = match fs::read(&path) {
                Ok(content) => content.into(),
                Err(e) => {
                    warn!("error reading file {}: {e}", path.display());
                    continue;
                }
            };

            let content_type = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(content_type_for);
            let pattern = pattern_for(prefix, &relative);

            self.add_route_fn(
                Method::GET,
                pattern,
                Arc::new(move |ctx: &mut Context| {
                    if let Some(content_type) = &content_type {
                        ctx.set_header("Content-Type", content_type.as_str());
                    }
                    ctx.send(StatusCode::Ok, content.to_vec())
                }),
            );
            registered += 1;
        }

        info!("registered {registered} static routes from {}", dir.display());
        Ok(registered)
    }
}
