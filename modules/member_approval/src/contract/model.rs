use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Lifecycle state of a member.
///
/// Only `Pending` members are visible to the approval workflow; the
/// workflow moves them to `Active` or `Rejected` exactly once.
/// `Inactive` and `Deleted` are owned by other parts of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberStatus {
    Pending,
    Active,
    Rejected,
    Inactive,
    Deleted,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Inactive => "inactive",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown member status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for MemberStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            "inactive" => Ok(Self::Inactive),
            "deleted" => Ok(Self::Deleted),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Outcome of a single approval transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Status a pending member ends up in after this decision.
    pub fn target_status(&self) -> MemberStatus {
        match self {
            Self::Approved => MemberStatus::Active,
            Self::Rejected => MemberStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of who decided on a member, when, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalDecision {
    pub member_id: String,
    pub decision: Decision,
    pub actor_id: String,
    pub note: Option<String>,
    pub decided_at: DateTime<Utc>,
}

/// Member as seen by the approval workflow (no serde, inter-module only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Membership intake generation (cohort number).
    pub generation: i32,
    pub occupation: String,
    pub phone: String,
    pub messenger_id: Option<String>,
    pub profile_image: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Set once the member has left `Pending` through this workflow.
    pub decision: Option<ApprovalDecision>,
}

impl Member {
    pub fn is_pending(&self) -> bool {
        self.status == MemberStatus::Pending
    }
}

/// Result of a bulk approve/reject call.
///
/// `failed` covers every requested id that was not in `pending` when the
/// update ran, so `success + failed` always equals the request length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkOperationResult {
    pub success: usize,
    pub failed: usize,
}

impl BulkOperationResult {
    pub fn from_counts(requested: usize, success: usize) -> Self {
        let success = success.min(requested);
        Self {
            success,
            failed: requested - success,
        }
    }

    pub fn requested(&self) -> usize {
        self.success + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}
