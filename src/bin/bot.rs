use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use feature_ping_bot::commands::{CommandContext, CommandInterpreter};
use feature_ping_bot::core::Config;
use feature_ping_bot::dispatcher::{job_queue, spawn_sync, spawn_ticker, Dispatcher};
use feature_ping_bot::features::flags::FeatureTracker;
use feature_ping_bot::features::pings::{PingNotifier, PingScheduler};
use feature_ping_bot::github::GithubClient;
use feature_ping_bot::identity::BotIdentity;
use feature_ping_bot::matrix::{BotStorage, ChatClient, MatrixClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting feature ping bot...");

    let storage = BotStorage::load(&config.data_path).await?;
    let matrix = Arc::new(
        MatrixClient::new(&config.homeserver_url, &config.access_token)
            .context("Invalid MATRIX_HOMESERVER_URL")?,
    );
    let chat: Arc<dyn ChatClient> = matrix.clone();

    let identity = Arc::new(
        BotIdentity::initialize(chat.as_ref(), &config.notice_room, config.authorized_users.clone())
            .await
            .map_err(|e| {
                error!("Startup failed: {e:#}");
                e
            })?,
    );

    let github = Arc::new(GithubClient::new(&config.github_token, config.repo.clone()));
    info!(
        "Tracking {}/{} {} @ {}",
        config.repo.owner, config.repo.name, config.repo.path, config.repo.branch
    );

    let tracker = FeatureTracker::new(github, PingScheduler::new(chat.clone()));
    let notifier = PingNotifier::new(chat.clone(), tracker.clone(), identity.notice_room_id.clone());
    let interpreter = CommandInterpreter::new(CommandContext::new(chat, tracker, identity));
    let dispatcher = Dispatcher::new(notifier, interpreter);

    let (jobs_tx, jobs_rx) = job_queue();
    spawn_ticker(jobs_tx.clone(), config.tick_interval);
    spawn_sync(matrix, storage, jobs_tx);

    info!(
        "Bot started, ticking every {} minutes",
        config.tick_interval.as_secs() / 60
    );
    dispatcher.run(jobs_rx).await;

    Ok(())
}
