//! HTTP plumbing shared by the resource modules.

use std::time::Duration;

use reqwest::{header::LOCATION, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::{ClientConfig, ClientError, ClientResult};

/// API client bound to one realm of a Keycloak server.
///
/// Resource methods live in the `groups`, `roles` and `users` modules.
/// Every path they pass here is relative to `/admin/realms/{realm}`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    realm_url: String,
    realm: String,
    access_token: Option<String>,
}

impl ApiClient {
    /// Creates a new API client.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            realm_url: config.realm_base_url(),
            realm: config.realm.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Realm this client is bound to.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Base URL of the realm's admin resources.
    pub fn realm_url(&self) -> &str {
        &self.realm_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.realm_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        handle_response(request.send().await?).await
    }

    /// Makes a GET request with query parameters.
    pub async fn get_with_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)).query(query));
        handle_response(request.send().await?).await
    }

    /// Makes a POST request that creates a resource and returns its `Location`.
    pub async fn post_created<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<String>> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        handle_empty_response(response).await?;
        Ok(location)
    }

    /// Makes a POST request without response body.
    pub async fn post_no_response<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        handle_empty_response(request.send().await?).await
    }

    /// Makes a PUT request.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let request = self.authorize(self.client.put(self.url(path)).json(body));
        handle_empty_response(request.send().await?).await
    }

    /// Makes a PUT request without a body.
    pub async fn put_empty(&self, path: &str) -> ClientResult<()> {
        let request = self.authorize(self.client.put(self.url(path)));
        handle_empty_response(request.send().await?).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.authorize(self.client.delete(self.url(path)));
        handle_empty_response(request.send().await?).await
    }

    /// Makes a DELETE request carrying a JSON body.
    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        let request = self.authorize(self.client.delete(self.url(path)).json(body));
        handle_empty_response(request.send().await?).await
    }
}

/// Extracts the created resource id from a `Location` header value.
#[must_use]
pub fn id_from_location(location: &str) -> Option<&str> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
}

/// Encodes a value for use as a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Handles a response with a body.
async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();

    if status.is_success() {
        response.json().await.map_err(ClientError::Http)
    } else {
        Err(api_error(status.as_u16(), response).await)
    }
}

/// Handles a response without a body.
async fn handle_empty_response(response: Response) -> ClientResult<()> {
    let status = response.status();

    if status.is_success() {
        Ok(())
    } else {
        Err(api_error(status.as_u16(), response).await)
    }
}

async fn api_error(status: u16, response: Response) -> ClientError {
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::debug!(status, %message, "admin API request failed");
    ClientError::Api { status, message }
}
