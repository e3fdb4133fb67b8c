use crate::Config;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::share_link::ShareLinkRepository;
use crate::db::init_pool;

#[derive(Debug, Clone, Copy)]
pub struct CleanupResult {
    pub sessions_removed: u64,
    pub share_links_removed: u64,
}

/// Reap expired sessions and expired share links. Expired rows are
/// already invisible to lookups; this keeps the tables from growing.
pub async fn cleanup_expired(config: &Config) -> Result<CleanupResult, String> {
    let pool = init_pool(&config.database)
        .await
        .map_err(|err| format!("Failed to initialize database pool: {err}"))?;

    let repo = PostgresRepository { pool: pool.clone() };
    let sessions_removed = repo
        .delete_all_expired_sessions()
        .await
        .map_err(|err| format!("Failed to delete expired sessions: {err:?}"))?;
    let share_links_removed = repo
        .delete_expired_share_links()
        .await
        .map_err(|err| format!("Failed to delete expired share links: {err:?}"))?;

    pool.close().await;

    Ok(CleanupResult {
        sessions_removed,
        share_links_removed,
    })
}
