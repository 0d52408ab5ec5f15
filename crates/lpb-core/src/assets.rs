//! Transient Asset Store: local copies of images attached to drafts.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};

use crate::{errors::Error, Result};

const MAX_NAME_ATTEMPTS: usize = 1000;

#[derive(Clone, Debug)]
pub struct AssetStore {
    dir: PathBuf,
    http: reqwest::Client,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_client(dir, reqwest::Client::new())
    }

    pub fn with_client(dir: impl Into<PathBuf>, http: reqwest::Client) -> Self {
        Self {
            dir: dir.into(),
            http,
        }
    }

    /// Download `url` into the store directory (created on demand).
    ///
    /// The file is named after the last path segment of the URL. If a file of
    /// that name is already present, a numeric prefix is added so that no two
    /// drafts ever share a path.
    pub async fn download(&self, url: &str) -> Result<PathBuf> {
        let name = file_name_from_url(url)?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::DownloadFailed(format!("request error: {}", e.without_url())))?;
        if !resp.status().is_success() {
            return Err(Error::DownloadFailed(format!(
                "unexpected status {}",
                resp.status()
            )));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::DownloadFailed(format!("body error: {}", e.without_url())))?;

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::DownloadFailed(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let (path, mut file) = self.reserve(&name).await?;
        let written = async {
            file.write_all(&bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            drop(file);
            self.discard(&path).await;
            return Err(Error::DownloadFailed(format!(
                "failed to write {}: {e}",
                path.display()
            )));
        }

        debug!(path = %path.display(), bytes = bytes.len(), "image downloaded");
        Ok(path)
    }

    /// Delete a local copy. A file that is already gone is not an error.
    pub async fn discard(&self, path: &Path) -> bool {
        match fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to delete local image");
                false
            }
        }
    }

    async fn reserve(&self, name: &str) -> Result<(PathBuf, fs::File)> {
        for n in 0..MAX_NAME_ATTEMPTS {
            let candidate = if n == 0 {
                self.dir.join(name)
            } else {
                self.dir.join(format!("{n}-{name}"))
            };
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(f) => return Ok((candidate, f)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(Error::DownloadFailed(format!(
                        "failed to create {}: {e}",
                        candidate.display()
                    )))
                }
            }
        }
        Err(Error::DownloadFailed(format!(
            "no free file name for {name} in {}",
            self.dir.display()
        )))
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name_from_url(url: &str) -> Result<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or("");
    let name = without_query.rsplit('/').next().unwrap_or("").trim();
    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        return Err(Error::DownloadFailed(
            "URL has no usable file name".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn file_name_is_last_path_segment() {
        assert_eq!(
            file_name_from_url("https://api.telegram.org/file/bot1:x/photos/file_3.jpg").unwrap(),
            "file_3.jpg"
        );
        assert_eq!(
            file_name_from_url("https://h/a/b.png?sig=1#frag").unwrap(),
            "b.png"
        );
        assert!(file_name_from_url("https://h/a/").is_err());
        assert!(file_name_from_url("https://h/..").is_err());
    }

    async fn serve_photo(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/photos/file_1.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn download_creates_dir_and_writes_file() {
        let server = MockServer::start().await;
        serve_photo(&server).await;
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::new(tmp.path().join("downloads"));

        let path = store
            .download(&format!("{}/photos/file_1.jpg", server.uri()))
            .await
            .unwrap();

        assert_eq!(path, tmp.path().join("downloads").join("file_1.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn same_source_twice_gets_distinct_paths() {
        let server = MockServer::start().await;
        serve_photo(&server).await;
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::new(tmp.path());
        let url = format!("{}/photos/file_1.jpg", server.uri());

        let first = store.download(&url).await.unwrap();
        let second = store.download(&url).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(second, tmp.path().join("1-file_1.jpg"));
        assert!(first.exists() && second.exists());
    }

    #[tokio::test]
    async fn non_success_status_is_download_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::new(tmp.path().join("downloads"));

        let err = store
            .download(&format!("{}/photos/missing.jpg", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DownloadFailed(_)));
        assert!(!tmp.path().join("downloads").join("missing.jpg").exists());
    }

    #[tokio::test]
    async fn discard_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AssetStore::new(tmp.path());
        let p = tmp.path().join("x.jpg");
        std::fs::write(&p, b"x").unwrap();

        assert!(store.discard(&p).await);
        assert!(!p.exists());
        assert!(!store.discard(&p).await);
    }
}
