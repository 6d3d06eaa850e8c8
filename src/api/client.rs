//! HTTP client for the source site and its media host.

use std::time::Duration;

use reqwest::{header, Client, Response};

use crate::config::Config;
use crate::error::{Error, Result};

/// HTTP client shared by the probe, the page extractor and the downloader.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    user_agent: String,
    request_timeout: Duration,
}

impl SiteClient {
    /// Create a client with a browser user agent and a connect timeout.
    ///
    /// `request_timeout` bounds page fetches and probes end to end. Media
    /// downloads are bounded per read instead, see
    /// [`crate::download::HttpDownloader`].
    pub fn new(
        user_agent: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent,
            request_timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.network.user_agent.clone(),
            config.connect_timeout(),
            config.request_timeout(),
        )
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetch a page body as text. Non-2xx statuses are errors.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let response = check_status(url, response)?;
        response.text().await.map_err(|e| transport_error(url, e))
    }

    /// Return the status code a URL answers with, without reading the body.
    pub async fn probe(&self, url: &str) -> Result<u16> {
        tracing::debug!("PROBE {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        Ok(response.status().as_u16())
    }

    /// Start downloading a file; the caller streams the body.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        tracing::debug!("DOWNLOAD {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        check_status(url, response)
    }
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

fn transport_error(url: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("request to {}", url))
    } else {
        Error::Http(err)
    }
}
