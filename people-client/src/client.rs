use async_trait::async_trait;
use martin_core::DirectorySync;
use martin_core::IdentityHandle;
use martin_core::PendingPatch;
use martin_core::RemoteError;
use martin_core::RemotePerson;
use martin_core::config::DirectoryConfig;
use martin_core::people::ConnectionsPage;
use martin_core::people::PERSON_FIELDS;
use reqwest::Response;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Google error response format.
#[derive(Debug, Deserialize)]
struct GoogleError {
    code: Option<u16>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: GoogleError,
}

/// Talks to `people/me/connections` and `people/*:updateContact` with a
/// bearer token.
#[derive(Clone)]
pub struct PeopleClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
    headers: HeaderMap,
}

impl std::fmt::Debug for PeopleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeopleClient")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl PeopleClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: &str,
        page_size: u32,
    ) -> Result<Self, RemoteError> {
        Self::with_client(reqwest::Client::new(), base_url, access_token, page_size)
    }

    /// Creates a client with a custom HTTP client, e.g. for tests.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        access_token: &str,
        page_size: u32,
    ) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|_| RemoteError::Credentials("access token is not a valid header".into()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: page_size.max(1),
            headers,
        })
    }

    /// Build a client from the `[directory]` config section, resolving the
    /// access token from the environment or token file.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self, RemoteError> {
        let token = config.resolve_access_token()?;
        Self::new(config.base_url.clone(), &token, config.page_size)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of connections.
    pub async fn list_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<ConnectionsPage, RemoteError> {
        let url = format!("{}/v1/people/me/connections", self.base_url);
        let mut query = vec![
            ("personFields", PERSON_FIELDS.join(",")),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .query(&query)
            .send()
            .await
            .map_err(|e| RemoteError::transport_with_source("listing connections", e))?;
        decode(check(response).await?).await
    }
}

#[async_trait]
impl DirectorySync for PeopleClient {
    async fn list_records(&self) -> Result<Vec<RemotePerson>, RemoteError> {
        let mut people = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.list_page(page_token.as_deref()).await?;
            tracing::debug!(
                count = page.connections.len(),
                total = ?page.total_people,
                "fetched connections page"
            );
            people.extend(page.connections);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    return Err(RemoteError::Decode(format!("page token {next} repeated")));
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }
        Ok(people)
    }

    async fn patch_record(
        &self,
        handle: &IdentityHandle,
        patch: &PendingPatch,
    ) -> Result<RemotePerson, RemoteError> {
        let url = format!(
            "{}/v1/{}:updateContact",
            self.base_url,
            handle.resource_name()
        );
        let mask = patch.update_mask();
        let person_fields = PERSON_FIELDS.join(",");
        tracing::debug!(resource = handle.resource_name(), %mask, "updating contact");

        let response = self
            .client
            .patch(&url)
            .headers(self.headers.clone())
            .query(&[
                ("updatePersonFields", mask.as_str()),
                ("personFields", person_fields.as_str()),
            ])
            .json(&patch.body(handle.etag()))
            .send()
            .await
            .map_err(|e| RemoteError::transport_with_source("updating contact", e))?;
        decode(check(response).await?).await
    }
}

/// Map a non-success response to [`RemoteError::Http`], preferring the
/// message from Google's error envelope.
async fn check(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let err = match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => RemoteError::Http {
            status: body.error.code.unwrap_or(status.as_u16()),
            message: body.error.message,
        },
        Err(_) => RemoteError::Http {
            status: status.as_u16(),
            message: text,
        },
    };
    tracing::warn!("{err}");
    Err(err)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let text = response
        .text()
        .await
        .map_err(|e| RemoteError::transport_with_source("reading response body", e))?;
    serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))
}
