//! Provider moderation: approve, reject, reset and delete
//!
//! Every operation re-reads the target row, persists, and only then mirrors
//! the change into the session's `AdminBoard`. A failed write leaves the
//! board and its counters untouched and is reported as
//! `AppError::UpdateFailure`.

use std::sync::Arc;

use shared::{
    ActivityKind, AdminBoard, ProviderId, ProviderStatus, ServiceProvider, SessionContext,
    Transition, TransitionOutcome,
};

use super::dashboard::DashboardService;
use crate::error::{AppError, AppResult};
use crate::store::MarketplaceStore;

/// Moderation service for provider status transitions
#[derive(Clone)]
pub struct ModerationService {
    store: Arc<dyn MarketplaceStore>,
}

impl ModerationService {
    /// Create a new ModerationService instance
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Make a provider publicly visible and approved
    pub async fn approve(
        &self,
        ctx: &SessionContext,
        board: &mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<TransitionOutcome> {
        self.transition(ctx, board, id, Transition::Approve).await
    }

    /// Hide a provider and record the rejection
    pub async fn reject(
        &self,
        ctx: &SessionContext,
        board: &mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<TransitionOutcome> {
        self.transition(ctx, board, id, Transition::Reject).await
    }

    /// Send a provider back to awaiting a decision
    pub async fn reset(
        &self,
        ctx: &SessionContext,
        board: &mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<TransitionOutcome> {
        self.transition(ctx, board, id, Transition::Reset).await
    }

    /// Same as `reset`, offered on active providers
    pub async fn deactivate(
        &self,
        ctx: &SessionContext,
        board: &mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<TransitionOutcome> {
        self.reset(ctx, board, id).await
    }

    /// Persist a transition, then mirror it into the board.
    ///
    /// Any transition is accepted from any status; the pending counter delta
    /// is derived from the stored status read just before the write, so a
    /// change made by another admin is not counted twice.
    pub async fn transition(
        &self,
        ctx: &SessionContext,
        board: &mut AdminBoard,
        id: ProviderId,
        transition: Transition,
    ) -> AppResult<TransitionOutcome> {
        require_admin(ctx)?;

        let name = self.refreshed(board, id).await?.name.clone();

        if let Err(e) = self
            .store
            .update_provider_fields(id, transition.fields())
            .await
        {
            tracing::warn!(provider_id = id, ?transition, "Provider update failed: {}", e);
            board
                .activity
                .record_failure("Error updating service provider status");
            return Err(AppError::UpdateFailure(e));
        }

        let outcome = board
            .apply_transition(id, transition)
            .ok_or_else(|| AppError::NotFound(format!("Service provider {}", id)))?;

        tracing::info!(
            provider_id = id,
            admin_id = %ctx.user_id,
            from = %outcome.previous,
            to = %outcome.current,
            "Provider status changed"
        );

        let kind = if outcome.current == ProviderStatus::Active {
            ActivityKind::Success
        } else {
            ActivityKind::Warning
        };
        board.activity.record(
            kind,
            format!("{} service provider: {}", transition.action_text(), name),
        );

        Ok(outcome)
    }

    /// Delete a provider and drop it from the board
    pub async fn delete(
        &self,
        ctx: &SessionContext,
        board: &mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<ServiceProvider> {
        require_admin(ctx)?;

        self.refreshed(board, id).await?;

        if let Err(e) = self.store.delete_provider(id).await {
            tracing::warn!(provider_id = id, "Provider delete failed: {}", e);
            board.activity.record_failure("Error deleting service provider");
            return Err(AppError::UpdateFailure(e));
        }

        let removed = board
            .remove_provider(id)
            .ok_or_else(|| AppError::NotFound(format!("Service provider {}", id)))?;

        tracing::info!(
            provider_id = id,
            admin_id = %ctx.user_id,
            status = %removed.status(),
            "Provider deleted"
        );
        board.activity.record(
            ActivityKind::Warning,
            format!("Deleted service provider: {}", removed.name),
        );

        Ok(removed)
    }

    async fn refreshed<'b>(
        &self,
        board: &'b mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<&'b ServiceProvider> {
        DashboardService::new(self.store.clone())
            .sync_provider(board, id)
            .await
    }
}

/// Only admins may moderate
pub fn require_admin(ctx: &SessionContext) -> AppResult<()> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}
