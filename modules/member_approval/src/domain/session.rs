//! Per-administrator approval session.
//!
//! Holds the visible pending list and the current selection, and keeps them
//! consistent with the engine: decisions refresh the list, single decisions
//! drop the member from the selection, bulk decisions clear it. A rejected
//! or failed engine call leaves both untouched so the caller can retry or
//! adjust the selection. Once a decision has committed its outcome is always
//! returned; if the follow-up reload fails the list is kept and marked stale.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::contract::model::{BulkOperationResult, Member};
use crate::domain::error::DomainError;
use crate::domain::selection::{SelectionSet, SelectionState};
use crate::domain::service::Service;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Sign-in required")]
    NotSignedIn,

    #[error("No members selected to {action}")]
    NothingSelected { action: &'static str },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct ApprovalSession {
    service: Arc<Service>,
    actor_id: Option<String>,
    pending: Vec<Member>,
    selection: SelectionSet,
    stale: bool,
}

impl ApprovalSession {
    pub fn new(service: Arc<Service>, actor_id: Option<String>) -> Self {
        Self {
            service,
            actor_id,
            pending: Vec::new(),
            selection: SelectionSet::new(),
            stale: false,
        }
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn sign_in(&mut self, actor_id: impl Into<String>) {
        self.actor_id = Some(actor_id.into());
    }

    pub fn sign_out(&mut self) {
        self.actor_id = None;
    }

    pub fn pending(&self) -> &[Member] {
        &self.pending
    }

    /// True when the last reload after a decision failed; `pending` may
    /// still list members that were decided.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state(self.pending.len())
    }

    pub fn toggle(&mut self, member_id: &str) {
        self.selection.toggle(member_id);
    }

    pub fn select_all_visible(&mut self) {
        self.selection.select_all(self.pending.iter().map(|m| m.id.clone()));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Reload the pending list; selected ids that are no longer visible are dropped.
    #[instrument(name = "member_approval.session.refresh", skip(self))]
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let pending = self.service.list_pending().await?;

        {
            let visible: HashSet<&str> = pending.iter().map(|m| m.id.as_str()).collect();
            self.selection.retain(|id| visible.contains(id));
        }

        debug!(count = pending.len(), "Pending list refreshed");
        self.pending = pending;
        self.stale = false;
        Ok(())
    }

    async fn refresh_after_decision(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Decision applied but pending list reload failed");
            self.stale = true;
        }
    }

    pub async fn approve(
        &mut self,
        member_id: &str,
        note: Option<&str>,
    ) -> Result<(), SessionError> {
        let actor = self.require_actor()?;
        self.service.approve(member_id, &actor, note).await?;
        self.selection.remove(member_id);
        self.refresh_after_decision().await;
        Ok(())
    }

    pub async fn reject(
        &mut self,
        member_id: &str,
        note: Option<&str>,
    ) -> Result<(), SessionError> {
        let actor = self.require_actor()?;
        self.service.reject(member_id, &actor, note).await?;
        self.selection.remove(member_id);
        self.refresh_after_decision().await;
        Ok(())
    }

    pub async fn approve_selected(
        &mut self,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, SessionError> {
        let actor = self.require_actor()?;
        let ids = self.require_selection("approve")?;
        let result = self.service.bulk_approve(&ids, &actor, note).await?;
        self.selection.clear();
        self.refresh_after_decision().await;
        Ok(result)
    }

    pub async fn reject_selected(
        &mut self,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, SessionError> {
        let actor = self.require_actor()?;
        let ids = self.require_selection("reject")?;
        let result = self.service.bulk_reject(&ids, &actor, note).await?;
        self.selection.clear();
        self.refresh_after_decision().await;
        Ok(result)
    }

    fn require_actor(&self) -> Result<String, SessionError> {
        self.actor_id.clone().ok_or(SessionError::NotSignedIn)
    }

    fn require_selection(&self, action: &'static str) -> Result<Vec<String>, SessionError> {
        if self.selection.is_empty() {
            return Err(SessionError::NothingSelected { action });
        }
        Ok(self.selection.ids())
    }
}
