use serde::{Deserialize, Serialize};

use crate::domain::service::{ServiceConfig, MAX_BULK_MEMBERS};

/// Configuration for the member_approval module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberApprovalConfig {
    /// Bulk operation limit; clamped to 1..=50.
    #[serde(default = "default_max_bulk_size")]
    pub max_bulk_size: usize,
}

impl Default for MemberApprovalConfig {
    fn default() -> Self {
        Self {
            max_bulk_size: default_max_bulk_size(),
        }
    }
}

fn default_max_bulk_size() -> usize {
    MAX_BULK_MEMBERS
}

impl From<&MemberApprovalConfig> for ServiceConfig {
    fn from(cfg: &MemberApprovalConfig) -> Self {
        Self {
            max_bulk_size: cfg.max_bulk_size.clamp(1, MAX_BULK_MEMBERS),
        }
    }
}
