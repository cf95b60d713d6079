//! REST transport over `reqwest`, speaking the backend's JSON API.
//!
//! Requires the `http` feature.
//!
//! ## Routes
//!
//! - `GET {stores}?wu&wc[&f]` - list stores
//! - `GET {comments}?wu&ws` / `POST {comments}` - list / create comments
//! - `PATCH {comments}/:id` / `DELETE {comments}/:id` - edit / delete a comment
//! - `PATCH {catalogue}/bystore/:storeId` - change one entry's availability
//! - `GET {catalogue}?s[&f]&wf&ws` / `POST {catalogue}` - list / add entries
//! - `DELETE {catalogue}/bystoreandfood/:storeId/:foodLocalId` - remove an entry
//!
//! Error responses carry `{ "message": ... }`; that message becomes the
//! [`TransportError`] message.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    AvailabilityPatch, CatalogueQuery, CommentPatch, CommentQuery, NewCatalogueEntry, NewComment,
    StoreQuery, Transport, TransportError,
};
use crate::config::ClientConfig;
use crate::model::{CatalogueEntry, Comment, Store};
use crate::session::Credential;

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn flag(value: bool) -> String {
    value.to_string()
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::new(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

/// HTTP client for the backend. Attaches the credential, if any, as a bearer
/// token on every request.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: Client,
    config: ClientConfig,
    credential: Option<Credential>,
}

impl RestTransport {
    pub fn new(config: ClientConfig, credential: Option<Credential>) -> Self {
        Self::with_client(Client::new(), config, credential)
    }

    pub fn with_client(client: Client, config: ClientConfig, credential: Option<Credential>) -> Self {
        Self {
            client,
            config,
            credential,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Some(credential) => request.header(AUTHORIZATION, credential.bearer()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
            });
        Err(TransportError::new(Some(status.as_u16()), message))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }
}

impl Transport for RestTransport {
    async fn fetch_stores(&self, query: &StoreQuery) -> Result<Vec<Store>, TransportError> {
        let mut params = vec![
            ("wu", flag(query.with_user)),
            ("wc", flag(query.with_catalogue)),
        ];
        if let Some(food) = &query.food_local_id {
            params.push(("f", food.clone()));
        }
        let request = self.client.get(self.config.stores_url()).query(&params);
        self.send_json(request).await
    }

    async fn fetch_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>, TransportError> {
        let params = [("wu", flag(query.with_user)), ("ws", flag(query.with_store))];
        let request = self.client.get(self.config.comments_url()).query(&params);
        self.send_json(request).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, TransportError> {
        let request = self.client.post(self.config.comments_url()).json(comment);
        self.send_json(request).await
    }

    async fn update_comment(&self, id: &str, patch: &CommentPatch) -> Result<Comment, TransportError> {
        let url = format!("{}/{id}", self.config.comments_url());
        self.send_json(self.client.patch(url).json(patch)).await
    }

    async fn delete_comment(&self, id: &str) -> Result<(), TransportError> {
        let url = format!("{}/{id}", self.config.comments_url());
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn patch_catalogue_entry(
        &self,
        store_id: &str,
        patch: &AvailabilityPatch,
    ) -> Result<CatalogueEntry, TransportError> {
        let url = format!("{}/bystore/{store_id}", self.config.catalogue_url());
        self.send_json(self.client.patch(url).json(patch)).await
    }

    async fn fetch_catalogue(&self, query: &CatalogueQuery) -> Result<Vec<CatalogueEntry>, TransportError> {
        let mut params = vec![("s", query.store_id.clone())];
        if let Some(food) = &query.food_local_id {
            params.push(("f", food.clone()));
        }
        params.push(("wf", flag(query.with_food)));
        params.push(("ws", flag(query.with_store)));
        let request = self.client.get(self.config.catalogue_url()).query(&params);
        self.send_json(request).await
    }

    async fn add_catalogue_entry(&self, entry: &NewCatalogueEntry) -> Result<CatalogueEntry, TransportError> {
        let request = self.client.post(self.config.catalogue_url()).json(entry);
        self.send_json(request).await
    }

    async fn remove_catalogue_entry(&self, store_id: &str, food_local_id: &str) -> Result<(), TransportError> {
        let url = format!(
            "{}/bystoreandfood/{store_id}/{food_local_id}",
            self.config.catalogue_url()
        );
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
