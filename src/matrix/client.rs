//! Matrix client-server API client
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial release covering rooms, messages, receipts, account data and sync

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::error::MatrixError;
use super::events::{SyncBatch, SyncResponse, MSGTYPE_NOTICE, MSGTYPE_TEXT};

/// Server-side long-poll timeout for `/sync`
const SYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// Only message events are needed from the timeline
const SYNC_FILTER: &str = r#"{"room":{"timeline":{"types":["m.room.message"]}},"presence":{"types":[]},"account_data":{"types":[]}}"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub displayname: Option<String>,
}

/// Operations the bot needs from its chat service
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Resolve a room alias (or pass through a room id)
    async fn resolve_room(&self, alias: &str) -> Result<String, MatrixError>;

    async fn joined_rooms(&self) -> Result<Vec<String>, MatrixError>;

    /// Join by id or alias, returning the room id
    async fn join_room(&self, room: &str) -> Result<String, MatrixError>;

    async fn user_id(&self) -> Result<String, MatrixError>;

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, MatrixError>;

    async fn send_text(&self, room_id: &str, text: &str) -> Result<String, MatrixError>;

    async fn send_notice(&self, room_id: &str, text: &str) -> Result<String, MatrixError>;

    async fn send_read_receipt(&self, room_id: &str, event_id: &str) -> Result<(), MatrixError>;

    /// Read a global account-data entry; `Ok(None)` when the server has none
    async fn get_account_data(&self, key: &str) -> Result<Option<Value>, MatrixError>;

    async fn set_account_data(&self, key: &str, value: &Value) -> Result<(), MatrixError>;
}

/// Source of inbound room events
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Long-poll once, starting after `since` when given
    async fn sync(&self, since: Option<&str>) -> Result<SyncBatch, MatrixError>;
}

#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errcode: String,
    #[serde(default)]
    error: String,
}

pub struct MatrixClient {
    http: reqwest::Client,
    homeserver: Url,
    access_token: String,
    own_user_id: OnceCell<String>,
}

impl MatrixClient {
    pub fn new(homeserver_url: &str, access_token: &str) -> Result<Self, MatrixError> {
        let homeserver =
            Url::parse(homeserver_url).map_err(|e| MatrixError::InvalidUrl(format!("{homeserver_url}: {e}")))?;
        if homeserver.cannot_be_a_base() {
            return Err(MatrixError::InvalidUrl(homeserver_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            homeserver,
            access_token: access_token.to_string(),
            own_user_id: OnceCell::new(),
        })
    }

    /// Build `<homeserver>/_matrix/client/v3/<segments...>` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MatrixError> {
        let mut url = self.homeserver.clone();
        url.path_segments_mut()
            .map_err(|_| MatrixError::InvalidUrl(self.homeserver.to_string()))?
            .pop_if_empty()
            .extend(["_matrix", "client", "v3"])
            .extend(segments);
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, MatrixError> {
        let url = self.endpoint(segments)?;
        debug!("{method} {}", url.path());

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.access_token)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            return Err(MatrixError::Api {
                status: status.as_u16(),
                errcode: body.errcode,
                error: body.error,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn send_message(&self, room_id: &str, msgtype: &str, text: &str) -> Result<String, MatrixError> {
        #[derive(Deserialize)]
        struct SendResponse {
            event_id: String,
        }

        let txn_id = Uuid::new_v4().to_string();
        let content = json!({ "msgtype": msgtype, "body": text });
        let sent: SendResponse = self
            .request(
                Method::PUT,
                &["rooms", room_id, "send", "m.room.message", txn_id.as_str()],
                &[],
                Some(&content),
            )
            .await?;
        Ok(sent.event_id)
    }

}

#[async_trait]
impl EventSource for MatrixClient {
    async fn sync(&self, since: Option<&str>) -> Result<SyncBatch, MatrixError> {
        let timeout = SYNC_TIMEOUT.as_millis().to_string();
        let mut query = vec![("timeout", timeout.as_str()), ("filter", SYNC_FILTER)];
        if let Some(since) = since {
            query.push(("since", since));
        }

        let response: SyncResponse = self.request(Method::GET, &["sync"], &query, None).await?;
        Ok(response.into_batch())
    }
}

#[async_trait]
impl ChatClient for MatrixClient {
    async fn resolve_room(&self, alias: &str) -> Result<String, MatrixError> {
        if alias.starts_with('!') {
            return Ok(alias.to_string());
        }

        #[derive(Deserialize)]
        struct Resolved {
            room_id: String,
        }

        let resolved: Resolved = self
            .request(Method::GET, &["directory", "room", alias], &[], None)
            .await?;
        Ok(resolved.room_id)
    }

    async fn joined_rooms(&self) -> Result<Vec<String>, MatrixError> {
        #[derive(Deserialize)]
        struct Joined {
            joined_rooms: Vec<String>,
        }

        let joined: Joined = self.request(Method::GET, &["joined_rooms"], &[], None).await?;
        Ok(joined.joined_rooms)
    }

    async fn join_room(&self, room: &str) -> Result<String, MatrixError> {
        #[derive(Deserialize)]
        struct Joined {
            room_id: String,
        }

        let joined: Joined = self
            .request(Method::POST, &["join", room], &[], Some(&json!({})))
            .await?;
        Ok(joined.room_id)
    }

    async fn user_id(&self) -> Result<String, MatrixError> {
        #[derive(Deserialize)]
        struct WhoAmI {
            user_id: String,
        }

        let user_id = self
            .own_user_id
            .get_or_try_init(|| async {
                let whoami: WhoAmI = self
                    .request(Method::GET, &["account", "whoami"], &[], None)
                    .await?;
                Ok::<_, MatrixError>(whoami.user_id)
            })
            .await?;
        Ok(user_id.clone())
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, MatrixError> {
        self.request(Method::GET, &["profile", user_id], &[], None).await
    }

    async fn send_text(&self, room_id: &str, text: &str) -> Result<String, MatrixError> {
        self.send_message(room_id, MSGTYPE_TEXT, text).await
    }

    async fn send_notice(&self, room_id: &str, text: &str) -> Result<String, MatrixError> {
        self.send_message(room_id, MSGTYPE_NOTICE, text).await
    }

    async fn send_read_receipt(&self, room_id: &str, event_id: &str) -> Result<(), MatrixError> {
        let _: Value = self
            .request(
                Method::POST,
                &["rooms", room_id, "receipt", "m.read", event_id],
                &[],
                Some(&json!({})),
            )
            .await?;
        Ok(())
    }

    async fn get_account_data(&self, key: &str) -> Result<Option<Value>, MatrixError> {
        let user_id = self.user_id().await?;
        match self
            .request::<Value>(Method::GET, &["user", user_id.as_str(), "account_data", key], &[], None)
            .await
        {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_account_data(&self, key: &str, value: &Value) -> Result<(), MatrixError> {
        let user_id = self.user_id().await?;
        let _: Value = self
            .request(Method::PUT, &["user", user_id.as_str(), "account_data", key], &[], Some(value))
            .await?;
        Ok(())
    }
}
