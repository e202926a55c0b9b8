use std::{io::Read, time::Duration};

use miette::{Context, IntoDiagnostic};
use reqwest::{
    blocking::{Client, Response},
    header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT},
};
use tracing::{debug, trace};

use crate::result::{Error, Result};

/// A remote body ready to be read, along with its announced size
pub struct RemoteStream {
    pub content_length: Option<u64>,
    pub body: Box<dyn Read>,
}

/// Interface for getting post pages and video files over the network
pub trait PageFetcher {
    /// Get the HTML of a page
    fn fetch_html(&self, url: &str) -> Result<String>;

    /// Start requesting a file and return its body without reading it.
    ///
    /// A non-success status must be reported here, before any byte is read.
    fn open_stream(&self, url: &str) -> Result<RemoteStream>;
}

/// What the HTTP client sends and how long it waits
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub accept_language: String,
    /// Whole request timeout when getting a page, also the connect timeout
    pub html_timeout: Duration,
    /// Longest wait for the response headers or for any read of a file body.
    /// A download that keeps receiving data is never cut.
    pub download_timeout: Duration,
}

/// [`PageFetcher`] talking to the real servers through `reqwest`
#[derive(Debug)]
pub struct HttpClient {
    pages: Client,
    files: Client,
    html_timeout: Duration,
}

impl HttpClient {
    /// Build the clients with their default headers. They never change afterwards.
    pub fn new(config: &ClientConfig) -> miette::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .into_diagnostic()
                .wrap_err("Invalid user agent header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .into_diagnostic()
                .wrap_err("Invalid accept-language header")?,
        );
        debug!("Default headers: {headers:?}");

        // Page requests get a deadline per request
        let pages = Self::build_client(headers.clone(), config.html_timeout, None)?;
        // The blocking client timeout applies to each body read
        let files = Self::build_client(
            headers,
            config.html_timeout,
            Some(config.download_timeout),
        )?;

        Ok(Self {
            pages,
            files,
            html_timeout: config.html_timeout,
        })
    }

    fn build_client(
        headers: HeaderMap,
        connect_timeout: Duration,
        timeout: Option<Duration>,
    ) -> miette::Result<Client> {
        Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build the HTTP client")
    }

    fn check_status(url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        trace!("GET {url} -> {status}");
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Remote {
                url: url.to_owned(),
                status: status.as_u16(),
            })
        }
    }
}

impl PageFetcher for HttpClient {
    fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .pages
            .get(url)
            .timeout(self.html_timeout)
            .send()
            .map_err(Error::network(url))?;
        let html = Self::check_status(url, response)?
            .text()
            .map_err(Error::network(url))?;
        trace!("Page is {} bytes long", html.len());
        Ok(html)
    }

    fn open_stream(&self, url: &str) -> Result<RemoteStream> {
        let response = self.files.get(url).send().map_err(Error::network(url))?;
        let response = Self::check_status(url, response)?;
        Ok(RemoteStream {
            content_length: response.content_length().filter(|&len| len > 0),
            body: Box::new(response),
        })
    }
}
