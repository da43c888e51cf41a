//! Restricted `file:` scheme resolution.
//!
//! # Responsibilities
//! - Map a scheme-stripped URL path onto the host filesystem
//! - Reject relative, drive-less, and network-share paths
//! - Hand back an open read handle for streaming

use std::path::PathBuf;

use thiserror::Error;
use tokio::fs::File;

/// Error type for local file retrieval.
#[derive(Debug, Error)]
pub enum FileTransportError {
    /// The request named a path outside the allowed shape.
    #[error("invalid file path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },
    /// The path was acceptable but the filesystem refused it.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolver for the `file:` pseudo-protocol on the outbound transport.
///
/// The handler can be pointed at URLs assembled from request input, so only
/// rooted paths are ever opened: no relative paths, and on drive-letter
/// platforms no UNC shares.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl FileTransport {
    /// Resolve a scheme-stripped URL path and open it for reading.
    pub async fn open(&self, url_path: &str) -> Result<File, FileTransportError> {
        let path = resolve_path(url_path)?;
        Ok(File::open(path).await?)
    }
}

/// Apply the platform path rules to the URL path component.
fn resolve_path(url_path: &str) -> Result<PathBuf, FileTransportError> {
    let invalid = |reason| FileTransportError::InvalidPath {
        path: url_path.to_string(),
        reason,
    };

    let mut name = url_path.to_string();
    if cfg!(windows) {
        use std::path::{Component, Path, Prefix};

        name = name.replace('/', "\\");
        // A file URL path arrives as /C:/dir/file; the leading separator is
        // not part of the drive-rooted path.
        let trimmed = name
            .strip_prefix('\\')
            .ok_or_else(|| invalid("missing leading separator"))?
            .to_string();
        match Path::new(&trimmed).components().next() {
            Some(Component::Prefix(prefix)) => match prefix.kind() {
                Prefix::UNC(..) | Prefix::VerbatimUNC(..) | Prefix::DeviceNS(..) => {
                    return Err(invalid("network share is not allowed"));
                }
                _ => {}
            },
            _ => return Err(invalid("missing drive letter")),
        }
        name = trimmed;
    }

    let path = PathBuf::from(name);
    if !path.is_absolute() {
        return Err(invalid("path is not absolute"));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn relative_path_is_rejected() {
        let err = FileTransport.open("tmp/module.zip").await.unwrap_err();
        assert!(matches!(err, FileTransportError::InvalidPath { .. }), "{err}");
    }

    #[tokio::test]
    async fn missing_file_surfaces_io_error() {
        let err = FileTransport
            .open("/definitely/not/here/module.info")
            .await
            .unwrap_err();
        match err {
            FileTransportError::Io(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
            other => panic!("expected Io error, got {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn absolute_path_returns_exact_contents() {
        use std::io::Write;

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"module zip bytes").unwrap();

        let mut file = FileTransport
            .open(tmp.path().to_str().unwrap())
            .await
            .unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"module zip bytes");
    }

    #[cfg(windows)]
    #[tokio::test]
    async fn unc_share_is_rejected() {
        let err = FileTransport
            .open("//share/host/module.zip")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FileTransportError::InvalidPath { reason: "missing leading separator", .. }
                | FileTransportError::InvalidPath { reason: "network share is not allowed", .. }
        ));
        let err = FileTransport
            .open("/\\\\share\\host\\module.zip")
            .await
            .unwrap_err();
        assert!(matches!(err, FileTransportError::InvalidPath { .. }));
    }

    #[cfg(windows)]
    #[tokio::test]
    async fn driveless_path_is_rejected() {
        let err = FileTransport.open("/dir/module.zip").await.unwrap_err();
        assert!(matches!(
            err,
            FileTransportError::InvalidPath { reason: "missing drive letter", .. }
        ));
    }
}
