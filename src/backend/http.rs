//! reqwest implementation of [`Backend`]

use crate::backend::{Backend, RawResponse};
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::types::{FormDescriptor, HttpMethod, JobHandle, ProgressSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use tracing::debug;
use url::Url;

/// Header value marking a request as a background (AJAX) request
pub const REQUESTED_WITH: &str = "XMLHttpRequest";

/// Path prefix of the job progress endpoint
const PROGRESS_PATH: &str = "/clean_progress/";

/// Endpoint that prepares a comparison with another user
pub const COMPARE_PATH: &str = "/compare_fetch";

/// Backend talking to the playlist server over HTTP
///
/// One client is shared by submissions and polls, so session cookies set by
/// the server travel with every request (same-origin credentials).
pub struct HttpBackend {
    client: Client,
    server: Url,
}

impl HttpBackend {
    /// Create a backend from settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static(REQUESTED_WITH));

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            server: settings.server.clone(),
        })
    }

    /// Server base URL
    pub const fn server(&self) -> &Url {
        &self.server
    }

    fn action_url(&self, form: &FormDescriptor) -> Result<Url> {
        Ok(self.server.join(&form.action)?)
    }

    fn progress_url(&self, job: &JobHandle) -> Result<Url> {
        let path = format!("{PROGRESS_PATH}{}", urlencoding::encode(&job.task_id));
        Ok(self.server.join(&path)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn submit(&self, form: &FormDescriptor) -> Result<RawResponse> {
        let url = self.action_url(form)?;
        let fields = form.serialize();
        debug!("submitting {} field(s) to {url}", fields.len());

        let request = match form.method {
            HttpMethod::Get => self.client.get(url).query(&fields),
            HttpMethod::Post => self.client.post(url).form(&fields),
        };
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }

    async fn fetch_progress(&self, job: &JobHandle) -> Result<ProgressSnapshot> {
        let url = self.progress_url(job)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn compare(&self, user: &str) -> Result<RawResponse> {
        let url = self.server.join(COMPARE_PATH)?;
        debug!("requesting comparison with {user}");
        let response = self
            .client
            .post(url)
            .json(&json!({ "compare_user": user }))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
