use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{BulkOperationResult, Member};
use crate::domain::decision::{DecisionFields, DecisionUpdate};
use crate::domain::error::DomainError;
use crate::domain::events::MemberDomainEvent;
use crate::domain::gateway::{MemberFilter, MemberOrder, MembersGateway};
use crate::domain::ports::EventPublisher;

/// Upper bound on ids accepted by a single bulk call.
pub const MAX_BULK_MEMBERS: usize = 50;

/// Approval engine: validates operands, builds guarded updates and
/// reports what the gateway actually changed.
/// Depends only on the gateway port, not on infra types.
#[derive(Clone)]
pub struct Service {
    gateway: Arc<dyn MembersGateway>,
    events: Arc<dyn EventPublisher<MemberDomainEvent>>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bulk size limit; kept within `1..=MAX_BULK_MEMBERS`.
    pub max_bulk_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_bulk_size: MAX_BULK_MEMBERS,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        gateway: Arc<dyn MembersGateway>,
        events: Arc<dyn EventPublisher<MemberDomainEvent>>,
        mut config: ServiceConfig,
    ) -> Self {
        if config.max_bulk_size > MAX_BULK_MEMBERS {
            warn!(
                requested = config.max_bulk_size,
                "max_bulk_size capped at {}", MAX_BULK_MEMBERS
            );
            config.max_bulk_size = MAX_BULK_MEMBERS;
        } else if config.max_bulk_size == 0 {
            warn!("max_bulk_size of 0 would refuse every bulk call, using 1");
            config.max_bulk_size = 1;
        }
        Self {
            gateway,
            events,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// All pending members, newest first.
    #[instrument(name = "member_approval.service.list_pending", skip(self))]
    pub async fn list_pending(&self) -> Result<Vec<Member>, DomainError> {
        debug!("Listing pending members");

        let members = self
            .gateway
            .select_members(&MemberFilter::pending(), MemberOrder::CreatedAtDesc)
            .await
            .map_err(|e| DomainError::fetch_failed(format!("{e:#}")))?;

        debug!("Found {} pending members", members.len());
        Ok(members)
    }

    #[instrument(
        name = "member_approval.service.approve",
        skip(self, note),
        fields(member_id = %member_id, actor_id = %actor_id)
    )]
    pub async fn approve(
        &self,
        member_id: &str,
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<(), DomainError> {
        info!("Approving member");
        self.decide_one(member_id, DecisionUpdate::approve(actor_id, note))
            .await
    }

    #[instrument(
        name = "member_approval.service.reject",
        skip(self, note),
        fields(member_id = %member_id, actor_id = %actor_id)
    )]
    pub async fn reject(
        &self,
        member_id: &str,
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<(), DomainError> {
        info!("Rejecting member");
        self.decide_one(member_id, DecisionUpdate::reject(actor_id, note))
            .await
    }

    #[instrument(
        name = "member_approval.service.bulk_approve",
        skip(self, member_ids, note),
        fields(requested = member_ids.len(), actor_id = %actor_id)
    )]
    pub async fn bulk_approve(
        &self,
        member_ids: &[String],
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, DomainError> {
        info!("Bulk approving members");
        self.decide_many(member_ids, DecisionUpdate::approve(actor_id, note))
            .await
    }

    #[instrument(
        name = "member_approval.service.bulk_reject",
        skip(self, member_ids, note),
        fields(requested = member_ids.len(), actor_id = %actor_id)
    )]
    pub async fn bulk_reject(
        &self,
        member_ids: &[String],
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, DomainError> {
        info!("Bulk rejecting members");
        self.decide_many(member_ids, DecisionUpdate::reject(actor_id, note))
            .await
    }

    // --- transitions ---

    async fn decide_one(&self, member_id: &str, update: DecisionUpdate) -> Result<(), DomainError> {
        validate_id("member_id", member_id)?;
        validate_id("actor_id", update.actor_id())?;

        let fields = update.into_fields(Utc::now());
        let updated = self
            .gateway
            .update_members(&MemberFilter::pending_with_id(member_id), &fields)
            .await
            .map_err(|e| {
                DomainError::persistence_failed(format!(
                    "{} member {}: {e:#}",
                    fields.decision, member_id
                ))
            })?;

        if updated.is_empty() {
            // unknown id or already decided; the pending list no longer shows it
            debug!("Member is not pending, nothing updated");
        } else {
            info!("Member {}", fields.decision);
        }

        self.publish(&fields, &updated);
        Ok(())
    }

    async fn decide_many(
        &self,
        member_ids: &[String],
        update: DecisionUpdate,
    ) -> Result<BulkOperationResult, DomainError> {
        self.validate_bulk_ids(member_ids)?;
        validate_id("actor_id", update.actor_id())?;

        let fields = update.into_fields(Utc::now());
        let updated = self
            .gateway
            .update_members(
                &MemberFilter::pending_with_ids(member_ids.to_vec()),
                &fields,
            )
            .await
            .map_err(|e| {
                DomainError::persistence_failed(format!(
                    "bulk {} of {} members: {e:#}",
                    fields.decision,
                    member_ids.len()
                ))
            })?;

        let requested: HashSet<&str> = member_ids.iter().map(String::as_str).collect();
        let applied: HashSet<&str> = updated
            .iter()
            .map(String::as_str)
            .filter(|id| requested.contains(id))
            .collect();

        let result = BulkOperationResult::from_counts(member_ids.len(), applied.len());
        if result.is_complete() {
            info!(success = result.success, "Bulk {} completed", fields.decision);
        } else {
            info!(
                success = result.success,
                failed = result.failed,
                "Bulk {} partially applied",
                fields.decision
            );
        }

        self.publish(&fields, &updated);
        Ok(result)
    }

    fn publish(&self, fields: &DecisionFields, updated: &[String]) {
        for id in updated {
            self.events.publish(&fields.event_for(id.as_str()));
        }
    }

    // --- validation helpers ---

    fn validate_bulk_ids(&self, member_ids: &[String]) -> Result<(), DomainError> {
        if member_ids.is_empty() {
            return Err(DomainError::invalid_argument(
                "member_ids",
                "must contain at least one id",
            ));
        }
        if member_ids.len() > self.config.max_bulk_size {
            return Err(DomainError::invalid_argument(
                "member_ids",
                format!(
                    "cannot process more than {} members at once, received {}",
                    self.config.max_bulk_size,
                    member_ids.len()
                ),
            ));
        }
        for (index, id) in member_ids.iter().enumerate() {
            if id.trim().is_empty() {
                return Err(DomainError::invalid_argument(
                    format!("member_ids[{index}]"),
                    "must be a non-empty string",
                ));
            }
        }
        Ok(())
    }
}

fn validate_id(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_argument(
            field,
            "must be a non-empty string",
        ));
    }
    Ok(())
}
