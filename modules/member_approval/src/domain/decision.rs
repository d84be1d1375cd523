//! Update payloads for approval transitions.
//!
//! Each intent is a closed variant; it is turned into a flat
//! [`DecisionFields`] value that the persistence gateway writes verbatim.

use chrono::{DateTime, Utc};

use crate::contract::model::{ApprovalDecision, Decision, MemberStatus};
use crate::domain::events::MemberDomainEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionUpdate {
    Approve {
        actor_id: String,
        note: Option<String>,
    },
    Reject {
        actor_id: String,
        note: Option<String>,
    },
}

/// Trim a free-text note; blank notes are dropped.
fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
}

impl DecisionUpdate {
    pub fn approve(actor_id: impl Into<String>, note: Option<&str>) -> Self {
        Self::Approve {
            actor_id: actor_id.into(),
            note: normalize_note(note),
        }
    }

    pub fn reject(actor_id: impl Into<String>, note: Option<&str>) -> Self {
        Self::Reject {
            actor_id: actor_id.into(),
            note: normalize_note(note),
        }
    }

    pub fn decision(&self) -> Decision {
        match self {
            Self::Approve { .. } => Decision::Approved,
            Self::Reject { .. } => Decision::Rejected,
        }
    }

    pub fn actor_id(&self) -> &str {
        match self {
            Self::Approve { actor_id, .. } | Self::Reject { actor_id, .. } => actor_id,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            Self::Approve { note, .. } | Self::Reject { note, .. } => note.as_deref(),
        }
    }

    /// Stamp the intent with its decision time.
    pub fn into_fields(self, decided_at: DateTime<Utc>) -> DecisionFields {
        let decision = self.decision();
        let (actor_id, note) = match self {
            Self::Approve { actor_id, note } | Self::Reject { actor_id, note } => (actor_id, note),
        };
        DecisionFields {
            decision,
            actor_id,
            note,
            decided_at,
        }
    }
}

/// Field set written on every member matched by a decision update.
///
/// Approvals land in `approved_at`/`approved_by`/`approval_note`,
/// rejections in `rejected_at`/`rejected_by`/`rejection_note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionFields {
    pub decision: Decision,
    pub actor_id: String,
    pub note: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl DecisionFields {
    pub fn target_status(&self) -> MemberStatus {
        self.decision.target_status()
    }

    pub fn record_for(&self, member_id: impl Into<String>) -> ApprovalDecision {
        ApprovalDecision {
            member_id: member_id.into(),
            decision: self.decision,
            actor_id: self.actor_id.clone(),
            note: self.note.clone(),
            decided_at: self.decided_at,
        }
    }

    pub fn event_for(&self, member_id: impl Into<String>) -> MemberDomainEvent {
        let id = member_id.into();
        let by = self.actor_id.clone();
        let at = self.decided_at;
        match self.decision {
            Decision::Approved => MemberDomainEvent::Approved { id, by, at },
            Decision::Rejected => MemberDomainEvent::Rejected { id, by, at },
        }
    }
}
