//! Media file downloading.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::api::SiteClient;
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, part_path};
use crate::output::Progress;

/// Something that can fetch one asset to a local path.
#[async_trait]
pub trait AssetDownloader: Send + Sync {
    /// Download `url` to `destination`, returning the number of bytes written.
    ///
    /// On success the file at `destination` is complete. On failure no file
    /// appears at `destination`.
    async fn download(&self, url: &str, destination: &Path) -> Result<u64>;
}

/// Streams assets over HTTP into `.part` files and renames them into place.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: SiteClient,
    read_timeout: Duration,
    progress: Progress,
}

impl HttpDownloader {
    /// `read_timeout` bounds the wait for the response and for every chunk.
    pub fn new(client: SiteClient, read_timeout: Duration, progress: Progress) -> Self {
        Self {
            client,
            read_timeout,
            progress,
        }
    }

    async fn fetch(&self, url: &str) -> Result<Response> {
        timeout(self.read_timeout, self.client.download_file(url))
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "no response from {} within {:?}",
                    url, self.read_timeout
                ))
            })?
    }

    /// Stream the body to `target`, returning the byte count.
    async fn stream_to_file(
        &self,
        url: &str,
        response: Response,
        target: &Path,
        bar: &ProgressBar,
    ) -> Result<u64> {
        let expected = response.content_length();
        let mut file = File::create(target).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        loop {
            let next = timeout(self.read_timeout, stream.next())
                .await
                .map_err(|_| {
                    Error::Timeout(format!(
                        "no data from {} for {:?} after {} bytes",
                        url, self.read_timeout, downloaded
                    ))
                })?;

            let Some(chunk) = next else { break };
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            bar.set_position(downloaded);
        }

        file.flush().await?;
        file.sync_all().await?;

        if let Some(expected) = expected {
            if downloaded != expected {
                return Err(Error::Download(format!(
                    "Incomplete body: got {} of {} bytes",
                    downloaded, expected
                )));
            }
        }

        Ok(downloaded)
    }
}

#[async_trait]
impl AssetDownloader for HttpDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        if let Some(parent) = destination.parent() {
            ensure_dir(parent).await?;
        }

        let response = self.fetch(url).await?;

        let label = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Content-Length only sizes the bar; a missing one is not an error.
        let bar = self.progress.download_bar(response.content_length(), &label);

        let part = part_path(destination);
        let result = match self.stream_to_file(url, response, &part, &bar).await {
            Ok(bytes) => tokio::fs::rename(&part, destination)
                .await
                .map(|_| bytes)
                .map_err(Error::from),
            Err(e) => Err(e),
        };

        if result.is_err() {
            let _ = tokio::fs::remove_file(&part).await;
            bar.abandon();
        } else {
            bar.finish_and_clear();
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn downloader(read_timeout: Duration) -> HttpDownloader {
        let client = SiteClient::new(
            "Mozilla/5.0 (Test)".to_string(),
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
        .unwrap();
        HttpDownloader::new(client, read_timeout, Progress::hidden())
    }

    #[tokio::test]
    async fn test_download_writes_file_and_creates_dir() {
        let server = MockServer::start().await;
        let body = vec![7u8; 64 * 1024];
        Mock::given(method("GET"))
            .and(path("/v/1.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("STCVideo").join("1-Intro.mp4");

        let bytes = downloader(Duration::from_secs(5))
            .download(&format!("{}/v/1.mp4", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(bytes, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_download_overwrites_previous_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("1-Intro.mp4");
        std::fs::write(&dest, b"stale leftover data").unwrap();
        std::fs::write(part_path(&dest), b"partial").unwrap();

        downloader(Duration::from_secs(5))
            .download(&format!("{}/v.mp4", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_http_error_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("2-Missing.mp4");

        let err = downloader(Duration::from_secs(5))
            .download(&format!("{}/v/2.mp4", server.uri()), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_unresponsive_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"late".to_vec())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("3-Slow.mp4");

        let err = downloader(Duration::from_millis(300))
            .download(&format!("{}/v/3.mp4", server.uri()), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout(_)));
        assert!(!dest.exists());
    }

    /// Serve `response` verbatim to one client, then hold the connection open
    /// for `linger` before closing it.
    async fn raw_server(response: &'static [u8], linger: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket.write_all(response).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(linger).await;
        });

        format!("http://{}/video.mp4", addr)
    }

    #[tokio::test]
    async fn test_missing_content_length_is_not_an_error() {
        let url = raw_server(
            b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nhello world",
            Duration::ZERO,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("4-Unsized.mp4");

        let bytes = downloader(Duration::from_secs(5))
            .download(&url, &dest)
            .await
            .unwrap();

        assert_eq!(bytes, 11);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_stall_mid_body_times_out() {
        let url = raw_server(
            b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n0123456789",
            Duration::from_secs(10),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("5-Stalled.mp4");

        let err = downloader(Duration::from_millis(500))
            .download(&url, &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout(_)), "got {:?}", err);
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_truncated_body_leaves_no_file() {
        let url = raw_server(
            b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n0123456789",
            Duration::ZERO,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("6-Truncated.mp4");

        let result = downloader(Duration::from_secs(5))
            .download(&url, &dest)
            .await;

        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }
}
