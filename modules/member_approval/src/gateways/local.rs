use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::MemberApprovalApi,
    error::MemberApprovalError,
    model::{BulkOperationResult, Member},
};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Local implementation of the MemberApprovalApi trait that delegates to the domain service
pub struct MemberApprovalLocalClient {
    service: Arc<Service>,
}

impl MemberApprovalLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

fn to_contract(e: DomainError) -> MemberApprovalError {
    if !e.is_invalid_argument() {
        // Details stay in the logs; callers get the sanitized contract error
        tracing::error!(error = %e, "member_approval call failed");
    }
    e.into()
}

#[async_trait]
impl MemberApprovalApi for MemberApprovalLocalClient {
    async fn list_pending(&self) -> Result<Vec<Member>, MemberApprovalError> {
        self.service.list_pending().await.map_err(to_contract)
    }

    async fn approve(
        &self,
        member_id: &str,
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<(), MemberApprovalError> {
        self.service
            .approve(member_id, actor_id, note)
            .await
            .map_err(to_contract)
    }

    async fn reject(
        &self,
        member_id: &str,
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<(), MemberApprovalError> {
        self.service
            .reject(member_id, actor_id, note)
            .await
            .map_err(to_contract)
    }

    async fn bulk_approve(
        &self,
        member_ids: &[String],
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, MemberApprovalError> {
        self.service
            .bulk_approve(member_ids, actor_id, note)
            .await
            .map_err(to_contract)
    }

    async fn bulk_reject(
        &self,
        member_ids: &[String],
        actor_id: &str,
        note: Option<&str>,
    ) -> Result<BulkOperationResult, MemberApprovalError> {
        self.service
            .bulk_reject(member_ids, actor_id, note)
            .await
            .map_err(to_contract)
    }
}
