use async_trait::async_trait;

use crate::contract::{
    error::MemberApprovalError,
    model::{BulkOperationResult, Member},
};

/// Public API trait for the member_approval module that other modules can use
#[async_trait]
pub trait MemberApprovalApi: Send + Sync {
    /// Members awaiting a decision, newest first
    async fn list_pending(&self) -> Result<Vec<Member>, MemberApprovalError>;

    /// Approve one pending member; a member that is no longer pending is left untouched
    async fn approve(
        &self,
        member_id: &str,
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<(), MemberApprovalError>;

    /// Reject one pending member; a member that is no longer pending is left untouched
    async fn reject(
        &self,
        member_id: &str,
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<(), MemberApprovalError>;

    /// Approve up to 50 pending members at once
    async fn bulk_approve(
        &self,
        member_ids: &[String],
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, MemberApprovalError>;

    /// Reject up to 50 pending members at once
    async fn bulk_reject(
        &self,
        member_ids: &[String],
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, MemberApprovalError>;
}
