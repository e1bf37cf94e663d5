use super::error::{TagSyncError, TagSyncResult};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote inventory operations tag synchronization relies on.
#[allow(async_fn_in_trait)]
pub trait TagApi {
    /// Host names matching `query`.
    async fn search_hosts(&self, query: &str) -> TagSyncResult<Vec<String>>;

    async fn get_tags(&self, host: &str) -> TagSyncResult<Vec<String>>;

    /// Replaces the host's tags with `tags` and returns the API's echo.
    async fn create_tags(&self, host: &str, tags: &[String], source: &str) -> TagSyncResult<Value>;

    async fn delete_tags(&self, host: &str, source: &str) -> TagSyncResult<()>;
}

#[derive(Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Deserialize)]
struct SearchResults {
    #[serde(default)]
    hosts: Vec<String>,
}

#[derive(Deserialize)]
struct HostTags {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Serialize)]
struct TagsBody<'a> {
    tags: &'a [String],
}

/// Datadog v1 API client, authenticated with an API key and an application key.
pub struct DatadogClient {
    client: Client,
    api_host: String,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    pub fn new(
        api_host: impl Into<String>,
        api_key: impl Into<String>,
        app_key: impl Into<String>,
    ) -> TagSyncResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_host: api_host.into(),
            api_key: api_key.into(),
            app_key: app_key.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> TagSyncResult<Url> {
        let mut url =
            Url::parse(&self.api_host).map_err(|_| TagSyncError::InvalidUrl(self.api_host.clone()))?;
        url.path_segments_mut()
            .map_err(|_| TagSyncError::InvalidUrl(self.api_host.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_KEY_HEADER, &self.app_key)
    }

    async fn send(&self, request: RequestBuilder) -> TagSyncResult<Response> {
        let response = self.authorized(request).send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(TagSyncError::Api { status, body })
        }
    }
}

impl TagApi for DatadogClient {
    async fn search_hosts(&self, query: &str) -> TagSyncResult<Vec<String>> {
        let url = self.endpoint(&["api", "v1", "search"])?;
        debug!("Searching hosts matching '{}'", query);

        let response = self
            .send(self.client.get(url).query(&[("q", query)]))
            .await?;
        let body: SearchResponse = response.json().await?;
        Ok(body.results.hosts)
    }

    async fn get_tags(&self, host: &str) -> TagSyncResult<Vec<String>> {
        let url = self.endpoint(&["api", "v1", "tags", "hosts", host])?;

        let response = self.send(self.client.get(url)).await?;
        let body: HostTags = response.json().await?;
        Ok(body.tags)
    }

    async fn create_tags(&self, host: &str, tags: &[String], source: &str) -> TagSyncResult<Value> {
        let url = self.endpoint(&["api", "v1", "tags", "hosts", host])?;
        debug!("Setting {} tags on '{}'", tags.len(), host);

        let response = self
            .send(
                self.client
                    .put(url)
                    .query(&[("source", source)])
                    .json(&TagsBody { tags }),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn delete_tags(&self, host: &str, source: &str) -> TagSyncResult<()> {
        let url = self.endpoint(&["api", "v1", "tags", "hosts", host])?;
        debug!("Deleting all tags on '{}'", host);

        self.send(self.client.delete(url).query(&[("source", source)]))
            .await?;
        Ok(())
    }
}
