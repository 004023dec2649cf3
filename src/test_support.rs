//! In-memory stand-ins for the homeserver and GitHub used by unit tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::github::{BlameCommit, BlameRange, GitActor, GitUser, GithubError, SourceHost};
use crate::matrix::{ChatClient, MatrixError, UserProfile};

pub const BOT_USER: &str = "@featurebot:example.org";
pub const NOTICE_ROOM: &str = "!notices:example.org";
pub const ADMIN: &str = "@admin:example.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub room_id: String,
    pub msgtype: &'static str,
    pub body: String,
}

fn server_error() -> MatrixError {
    MatrixError::Api {
        status: 500,
        errcode: "M_UNKNOWN".to_string(),
        error: "simulated failure".to_string(),
    }
}

pub struct FakeChat {
    pub user_id: String,
    pub display_name: Option<String>,
    pub aliases: HashMap<String, String>,
    pub joined: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<SentMessage>>,
    pub receipts: Mutex<Vec<(String, String)>>,
    pub account_data: Mutex<HashMap<String, Value>>,
    pub account_reads: AtomicUsize,
    pub account_writes: AtomicUsize,
    /// Sends whose body contains this text fail
    pub fail_sends_containing: Mutex<Option<String>>,
    pub fail_lookups: AtomicBool,
}

impl FakeChat {
    pub fn new() -> Self {
        Self {
            user_id: BOT_USER.to_string(),
            display_name: Some("Feature Bot".to_string()),
            aliases: HashMap::from([("#notices:example.org".to_string(), NOTICE_ROOM.to_string())]),
            joined: Mutex::new(vec![NOTICE_ROOM.to_string()]),
            sent: Mutex::new(Vec::new()),
            receipts: Mutex::new(Vec::new()),
            account_data: Mutex::new(HashMap::new()),
            account_reads: AtomicUsize::new(0),
            account_writes: AtomicUsize::new(0),
            fail_sends_containing: Mutex::new(None),
            fail_lookups: AtomicBool::new(false),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.body).collect()
    }

    pub fn put_override(&self, feature: &str, date: &str) {
        self.account_data
            .lock()
            .unwrap()
            .insert(format!("im.vector.ping.{feature}"), json!({ "date": date }));
    }

    pub fn override_date(&self, feature: &str) -> Option<DateTime<Utc>> {
        let data = self.account_data.lock().unwrap();
        let raw = data.get(&format!("im.vector.ping.{feature}"))?["date"].as_str()?.to_string();
        DateTime::parse_from_rfc3339(&raw).ok().map(|d| d.with_timezone(&Utc))
    }

    pub fn reads(&self) -> usize {
        self.account_reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.account_writes.load(Ordering::SeqCst)
    }

    fn record(&self, room_id: &str, msgtype: &'static str, text: &str) -> Result<String, MatrixError> {
        if let Some(needle) = self.fail_sends_containing.lock().unwrap().as_deref() {
            if text.contains(needle) {
                return Err(server_error());
            }
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            room_id: room_id.to_string(),
            msgtype,
            body: text.to_string(),
        });
        Ok(format!("$event{}", sent.len()))
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn resolve_room(&self, alias: &str) -> Result<String, MatrixError> {
        if alias.starts_with('!') {
            return Ok(alias.to_string());
        }
        self.aliases.get(alias).cloned().ok_or(MatrixError::Api {
            status: 404,
            errcode: "M_NOT_FOUND".to_string(),
            error: "Room alias not found".to_string(),
        })
    }

    async fn joined_rooms(&self) -> Result<Vec<String>, MatrixError> {
        Ok(self.joined.lock().unwrap().clone())
    }

    async fn join_room(&self, room: &str) -> Result<String, MatrixError> {
        let room_id = self.resolve_room(room).await?;
        self.joined.lock().unwrap().push(room_id.clone());
        Ok(room_id)
    }

    async fn user_id(&self) -> Result<String, MatrixError> {
        Ok(self.user_id.clone())
    }

    async fn user_profile(&self, _user_id: &str) -> Result<UserProfile, MatrixError> {
        Ok(UserProfile {
            displayname: self.display_name.clone(),
        })
    }

    async fn send_text(&self, room_id: &str, text: &str) -> Result<String, MatrixError> {
        self.record(room_id, "m.text", text)
    }

    async fn send_notice(&self, room_id: &str, text: &str) -> Result<String, MatrixError> {
        self.record(room_id, "m.notice", text)
    }

    async fn send_read_receipt(&self, room_id: &str, event_id: &str) -> Result<(), MatrixError> {
        self.receipts
            .lock()
            .unwrap()
            .push((room_id.to_string(), event_id.to_string()));
        Ok(())
    }

    async fn get_account_data(&self, key: &str) -> Result<Option<Value>, MatrixError> {
        self.account_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(self.account_data.lock().unwrap().get(key).cloned())
    }

    async fn set_account_data(&self, key: &str, value: &Value) -> Result<(), MatrixError> {
        self.account_writes.fetch_add(1, Ordering::SeqCst);
        self.account_data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}

pub struct FakeSource {
    pub text: Mutex<String>,
    pub ranges: Mutex<Vec<BlameRange>>,
    pub queries: AtomicUsize,
    pub fail: AtomicBool,
}

impl FakeSource {
    pub fn new(text: &str, ranges: Vec<BlameRange>) -> Self {
        Self {
            text: Mutex::new(text.to_string()),
            ranges: Mutex::new(ranges),
            queries: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// One blame range per line: `(text, author login, RFC 3339 date)`
    pub fn from_lines(lines: &[(&str, &str, &str)]) -> Self {
        let text = lines.iter().map(|(t, _, _)| *t).collect::<Vec<_>>().join("\n");
        let ranges = lines
            .iter()
            .enumerate()
            .map(|(i, (_, author, date))| range(i + 1, i + 1, author, date))
            .collect();
        Self::new(&text, ranges)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceHost for FakeSource {
    async fn file_text(&self) -> Result<String, GithubError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GithubError::Status(502));
        }
        Ok(self.text.lock().unwrap().clone())
    }

    async fn blame_ranges(&self) -> Result<Vec<BlameRange>, GithubError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GithubError::Status(502));
        }
        Ok(self.ranges.lock().unwrap().clone())
    }
}

pub fn date(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

pub fn range(start: usize, end: usize, login: &str, authored: &str) -> BlameRange {
    BlameRange {
        starting_line: start,
        ending_line: end,
        commit: BlameCommit {
            authored_date: date(authored),
            author: Some(GitActor {
                user: Some(GitUser {
                    login: login.to_string(),
                }),
                name: None,
            }),
        },
    }
}
