use chrono::{DateTime, Utc};

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDomainEvent {
    Approved {
        id: String,
        by: String,
        at: DateTime<Utc>,
    },
    Rejected {
        id: String,
        by: String,
        at: DateTime<Utc>,
    },
}

impl MemberDomainEvent {
    pub fn member_id(&self) -> &str {
        match self {
            Self::Approved { id, .. } | Self::Rejected { id, .. } => id,
        }
    }
}
