use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::api::{ErrorResponse, MessageResponse, EVENTS_PATH};
use crate::config::ClientConfig;
use crate::error::{http_error, not_found_error, validation_error, AppResult};
use crate::events::{Event, EventPatch, NewEvent};

/// Operations the client needs from the event API
#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Event>>;

    async fn create(&self, payload: &NewEvent) -> AppResult<Event>;

    async fn update(&self, id: &str, patch: &EventPatch) -> AppResult<Event>;

    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// [`EventsApi`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    client: Client,
    events_url: Url,
}

impl HttpEventsApi {
    /// Resolve the events collection against `base_url`
    pub fn new(base_url: &str) -> AppResult<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let events_url = base.join(EVENTS_PATH.trim_start_matches('/'))?;

        Ok(Self {
            client: Client::new(),
            events_url,
        })
    }

    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Self::new(&config.api_base_url)
    }

    /// URL of the collection
    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    /// URL addressing one record through the `id` query parameter
    pub fn record_url(&self, id: &str) -> Url {
        let mut url = self.events_url.clone();
        url.query_pairs_mut().append_pair("id", id);
        url
    }

    /// Decode a success body, or turn the error body back into our error type
    async fn read<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        debug!("Event API returned {}: {}", status, message);

        let err = if status == StatusCode::BAD_REQUEST {
            validation_error(&message)
        } else if status == StatusCode::NOT_FOUND {
            not_found_error(&message)
        } else {
            http_error(&format!("{}: {}", status, message))
        };
        Err(err)
    }
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn list(&self) -> AppResult<Vec<Event>> {
        let response = self.client.get(self.events_url.clone()).send().await?;
        Self::read(response).await
    }

    async fn create(&self, payload: &NewEvent) -> AppResult<Event> {
        let response = self
            .client
            .post(self.events_url.clone())
            .json(payload)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn update(&self, id: &str, patch: &EventPatch) -> AppResult<Event> {
        let response = self
            .client
            .patch(self.record_url(id))
            .json(patch)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let response = self.client.delete(self.record_url(id)).send().await?;
        let _: MessageResponse = Self::read(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_url_resolution() {
        let api = HttpEventsApi::new("http://localhost:3000").unwrap();
        assert_eq!(api.events_url().as_str(), "http://localhost:3000/events");

        let api = HttpEventsApi::new("http://localhost:3000/api").unwrap();
        assert_eq!(api.events_url().as_str(), "http://localhost:3000/api/events");
    }

    #[test]
    fn test_record_url_encodes_id() {
        let api = HttpEventsApi::new("http://localhost:3000/").unwrap();
        assert_eq!(
            api.record_url("a b&c").as_str(),
            "http://localhost:3000/events?id=a+b%26c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpEventsApi::new("not a url").is_err());
    }
}
