use reqwest::Client as HttpClient;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use chirkut_types::api::{
    Ack, Action, DeleteMessageRequest, Envelope, LoginRequest, LoginResponse, RegisterRequest,
    SendMessageRequest, UpdateProfileRequest,
};
use chirkut_types::models::{InboxMessage, PublicUser};

use crate::error::ClientError;
use crate::util::epoch_millis;

/// An inbox entry with its timestamp already converted to epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub timestamp: i64,
    pub is_read: bool,
}

impl From<InboxMessage> for Message {
    fn from(m: InboxMessage) -> Self {
        let timestamp = epoch_millis(&m.timestamp).unwrap_or_else(|| {
            warn!("Unparseable timestamp '{}' on message {}", m.timestamp, m.id);
            0
        });
        Self {
            id: m.id,
            content: m.content,
            timestamp,
            is_read: m.is_read,
        }
    }
}

/// One method per server action. Each is a single round trip: no retries,
/// no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    endpoint: String,
}

impl ApiClient {
    /// `endpoint` is the full action URL, e.g. `https://host/api`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn register(
        &self,
        username: &str,
        full_name: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let body = RegisterRequest {
            username: Some(username.to_string()),
            full_name: Some(full_name.to_string()),
            password: Some(password.to_string()),
        };
        self.post::<_, Ack>(Action::Register, &body).await?;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<PublicUser, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let res: LoginResponse = self.post(Action::Login, &body).await?;
        Ok(res.user)
    }

    pub async fn send_message(&self, to: &str, content: &str) -> Result<(), ClientError> {
        let body = SendMessageRequest {
            to: to.to_string(),
            content: content.to_string(),
        };
        self.post::<_, Ack>(Action::SendMessage, &body).await?;
        Ok(())
    }

    pub async fn get_messages(&self, username: &str) -> Result<Vec<Message>, ClientError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("action", Action::GetMessages.as_str()),
                ("username", username),
            ])
            .send()
            .await?;
        let envelope: Envelope<Vec<InboxMessage>> = res.json().await?;
        let messages = envelope.into_result().map_err(ClientError::Server)?;
        Ok(messages.into_iter().map(Message::from).collect())
    }

    pub async fn delete_message(&self, id: i64) -> Result<(), ClientError> {
        let body = DeleteMessageRequest { id: Some(id) };
        self.post::<_, Ack>(Action::DeleteMessage, &body).await?;
        Ok(())
    }

    /// An empty `password` keeps the current one.
    pub async fn update_profile(
        &self,
        username: &str,
        full_name: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let body = UpdateProfileRequest {
            username: username.to_string(),
            full_name: Some(full_name.to_string()),
            password: Some(password.to_string()),
        };
        self.post::<_, Ack>(Action::UpdateProfile, &body).await?;
        Ok(())
    }

    async fn post<B, T>(&self, action: Action, body: &B) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let res = self
            .http
            .post(&self.endpoint)
            .query(&[("action", action.as_str())])
            .json(body)
            .send()
            .await?;
        let envelope: Envelope<T> = res.json().await?;
        envelope.into_result().map_err(ClientError::Server)
    }
}
