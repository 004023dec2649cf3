//! # Job Queue
//!
//! Two producers, one consumer. The ticker and the Matrix sync task push jobs into
//! a single bounded channel; [`Dispatcher::run`] handles them strictly one at a time,
//! so two reconciliation passes never overlap.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::commands::CommandInterpreter;
use crate::features::pings::PingNotifier;
use crate::matrix::{BotStorage, EventSource, RoomMessage};

pub const QUEUE_CAPACITY: usize = 64;
pub const SYNC_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Tick,
    Message(RoomMessage),
}

impl Job {
    fn label(&self) -> String {
        match self {
            Job::Tick => "tick".to_string(),
            Job::Message(message) => format!("message {}", message.event_id),
        }
    }
}

pub fn job_queue() -> (mpsc::Sender<Job>, mpsc::Receiver<Job>) {
    mpsc::channel(QUEUE_CAPACITY)
}

pub struct Dispatcher {
    notifier: PingNotifier,
    interpreter: CommandInterpreter,
}

impl Dispatcher {
    pub fn new(notifier: PingNotifier, interpreter: CommandInterpreter) -> Self {
        Self {
            notifier,
            interpreter,
        }
    }

    pub async fn process(&self, job: Job) -> Result<()> {
        let now = Utc::now();
        match job {
            Job::Tick => self.notifier.run_tick(now).await.map(|_| ()),
            Job::Message(message) => self.interpreter.handle_message(&message, now).await,
        }
    }

    /// Drain the queue until every producer has hung up. A failed job is logged
    /// and its effects are simply skipped until the next tick or command.
    pub async fn run(self, mut jobs: mpsc::Receiver<Job>) {
        while let Some(job) = jobs.recv().await {
            let label = job.label();
            debug!("Processing {label}");
            if let Err(e) = self.process(job).await {
                error!("Failed to process {label}: {e:#}");
            }
        }
        info!("Job queue closed, dispatcher stopping");
    }
}

/// Queue a tick immediately and then every `period`
pub fn spawn_ticker(jobs: mpsc::Sender<Job>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if jobs.send(Job::Tick).await.is_err() {
                break;
            }
        }
    })
}

/// Long-poll the homeserver and queue every room message.
///
/// Without a stored sync token the first batch is only used to learn the
/// current position; its messages are old history and are not replayed.
pub fn spawn_sync<E>(events: Arc<E>, mut storage: BotStorage, jobs: mpsc::Sender<Job>) -> JoinHandle<()>
where
    E: EventSource + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut skip_backlog = storage.sync_token().is_none();
        loop {
            let since = storage.sync_token().map(str::to_string);
            let batch = match events.sync(since.as_deref()).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!("Sync failed, retrying in {}s: {e}", SYNC_RETRY_DELAY.as_secs());
                    tokio::time::sleep(SYNC_RETRY_DELAY).await;
                    continue;
                }
            };

            if let Err(e) = storage.set_sync_token(&batch.next_batch).await {
                warn!("Failed to persist sync token: {e:#}");
            }

            if skip_backlog {
                info!("Initial sync done, skipped {} historical messages", batch.messages.len());
                skip_backlog = false;
                continue;
            }

            for message in batch.messages {
                if jobs.send(Job::Message(message)).await.is_err() {
                    return;
                }
            }
        }
    })
}
