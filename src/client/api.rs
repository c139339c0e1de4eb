use async_trait::async_trait;
use reqwest::{Client, Response};
use uuid::Uuid;

use super::{ClientConfig, ClientError};
use crate::{
    error::ErrorBody,
    models::{NewReminder, Reminder, ReminderChanges},
    routes::API_PREFIX,
};

/// The CRUD surface the coordinator talks to.
#[async_trait]
pub trait ReminderApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Reminder>, ClientError>;
    async fn create(&self, input: &NewReminder) -> Result<Reminder, ClientError>;
    async fn update(&self, id: Uuid, changes: &ReminderChanges) -> Result<Reminder, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpReminderApi {
    http: Client,
    base: String,
}

impl HttpReminderApi {
    pub fn new(cfg: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(cfg.request_timeout()).build()?;
        Ok(Self::with_client(http, &cfg.base_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base: format!("{}{API_PREFIX}/reminders", base_url.trim_end_matches('/')),
        }
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/{id}", self.base)
    }
}

#[async_trait]
impl ReminderApi for HttpReminderApi {
    async fn list(&self) -> Result<Vec<Reminder>, ClientError> {
        let resp = self.http.get(&self.base).send().await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    async fn create(&self, input: &NewReminder) -> Result<Reminder, ClientError> {
        let resp = self.http.post(&self.base).json(input).send().await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    async fn update(&self, id: Uuid, changes: &ReminderChanges) -> Result<Reminder, ClientError> {
        let resp = self.http.put(self.item_url(id)).json(changes).send().await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }
}

async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if !text.trim().is_empty() => text.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    Err(ClientError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::HttpReminderApi;
    use crate::client::ClientConfig;

    #[test]
    fn urls_live_under_the_api_prefix() {
        let cfg = ClientConfig {
            base_url: "http://example.test:8080/".to_string(),
            ..Default::default()
        };
        let api = HttpReminderApi::new(&cfg).expect("client should build");
        assert_eq!(api.base, "http://example.test:8080/api/reminders");

        let id = Uuid::nil();
        assert_eq!(
            api.item_url(id),
            format!("http://example.test:8080/api/reminders/{id}")
        );
    }
}
