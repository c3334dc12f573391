use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::infra::db::DbTokenRepository;
use crate::usecase::purge::PurgeExpiredTokensUseCase;

/// Periodically delete tokens that expired more than `retention` ago.
pub fn spawn_token_reaper(
    tokens: DbTokenRepository,
    every: Duration,
    retention: chrono::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(every_secs = every.as_secs(), "token reaper started");
        let usecase = PurgeExpiredTokensUseCase { tokens, retention };
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = usecase.execute().await {
                error!(error = ?e, "token purge failed");
            }
        }
    })
}
