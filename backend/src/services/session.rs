//! Per-admin dashboard sessions
//!
//! Each admin gets one `AdminBoard`. Actions on a board are serialized: a
//! request that arrives while another is still running for the same admin
//! is refused instead of queued, so a double-click cannot submit twice.

use std::collections::HashMap;
use std::sync::Arc;

use shared::{ActivityFeed, AdminBoard, SessionContext};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Registry of loaded admin boards keyed by admin user id
#[derive(Clone)]
pub struct SessionRegistry {
    boards: Arc<RwLock<HashMap<Uuid, Arc<Mutex<AdminBoard>>>>>,
    activity_limit: usize,
}

impl SessionRegistry {
    pub fn new(activity_limit: usize) -> Self {
        Self {
            boards: Arc::new(RwLock::new(HashMap::new())),
            activity_limit,
        }
    }

    /// Take exclusive use of the caller's board for one action
    pub async fn acquire(&self, ctx: &SessionContext) -> AppResult<OwnedMutexGuard<AdminBoard>> {
        let board = self.board(ctx.user_id).await;
        board.try_lock_owned().map_err(|_| {
            tracing::debug!(admin_id = %ctx.user_id, "Rejected overlapping dashboard action");
            AppError::OperationInProgress
        })
    }

    /// Forget a session's board, e.g. on logout
    pub async fn close(&self, user_id: Uuid) -> bool {
        self.boards.write().await.remove(&user_id).is_some()
    }

    async fn board(&self, user_id: Uuid) -> Arc<Mutex<AdminBoard>> {
        if let Some(board) = self.boards.read().await.get(&user_id) {
            return board.clone();
        }

        let mut boards = self.boards.write().await;
        boards
            .entry(user_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(AdminBoard::new(ActivityFeed::with_limit(
                    self.activity_limit,
                ))))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserRole;

    #[tokio::test]
    async fn test_overlapping_action_is_refused() {
        let registry = SessionRegistry::new(5);
        let ctx = SessionContext::new(Uuid::new_v4(), UserRole::Admin);

        let first = registry.acquire(&ctx).await.unwrap();
        let second = registry.acquire(&ctx).await;
        assert!(matches!(second, Err(AppError::OperationInProgress)));

        drop(first);
        assert!(registry.acquire(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = SessionRegistry::new(5);
        let a = SessionContext::new(Uuid::new_v4(), UserRole::Admin);
        let b = SessionContext::new(Uuid::new_v4(), UserRole::Admin);

        let _held = registry.acquire(&a).await.unwrap();
        assert!(registry.acquire(&b).await.is_ok());
        assert!(registry.close(a.user_id).await);
        assert!(!registry.close(a.user_id).await);
    }
}
