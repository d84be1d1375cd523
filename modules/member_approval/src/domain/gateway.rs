use async_trait::async_trait;

use crate::contract::model::{Member, MemberStatus};
use crate::domain::decision::DecisionFields;

/// Which member ids a filter targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFilter {
    Any,
    One(String),
    In(Vec<String>),
}

/// Row predicate understood by the gateway: id constraint AND optional status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFilter {
    pub ids: IdFilter,
    pub status: Option<MemberStatus>,
}

impl MemberFilter {
    pub fn pending() -> Self {
        Self {
            ids: IdFilter::Any,
            status: Some(MemberStatus::Pending),
        }
    }

    pub fn pending_with_id(id: impl Into<String>) -> Self {
        Self {
            ids: IdFilter::One(id.into()),
            status: Some(MemberStatus::Pending),
        }
    }

    pub fn pending_with_ids(ids: Vec<String>) -> Self {
        Self {
            ids: IdFilter::In(ids),
            status: Some(MemberStatus::Pending),
        }
    }

    /// Evaluate the predicate in memory.
    pub fn matches(&self, member: &Member) -> bool {
        let id_ok = match &self.ids {
            IdFilter::Any => true,
            IdFilter::One(id) => member.id == *id,
            IdFilter::In(ids) => ids.iter().any(|id| member.id == *id),
        };
        id_ok && self.status.map_or(true, |s| member.status == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberOrder {
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
}

/// Port for the domain layer: the row-oriented persistence service.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait MembersGateway: Send + Sync {
    /// Rows matching `filter`, in `order`.
    async fn select_members(
        &self,
        filter: &MemberFilter,
        order: MemberOrder,
    ) -> anyhow::Result<Vec<Member>>;

    /// Write `fields` to every row matching `filter` in one statement.
    ///
    /// Returns the ids of the rows actually modified; rows that stopped
    /// matching before the write (e.g. decided by someone else) are absent.
    async fn update_members(
        &self,
        filter: &MemberFilter,
        fields: &DecisionFields,
    ) -> anyhow::Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(id: &str, status: MemberStatus) -> Member {
        Member {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_uppercase(),
            generation: 1,
            occupation: "engineer".into(),
            phone: "010-0000-0000".into(),
            messenger_id: None,
            profile_image: None,
            status,
            created_at: Utc::now(),
            email_confirmed_at: None,
            decision: None,
        }
    }

    #[test]
    fn pending_filter_ignores_decided_members() {
        let filter = MemberFilter::pending();
        assert!(filter.matches(&member("a", MemberStatus::Pending)));
        assert!(!filter.matches(&member("b", MemberStatus::Active)));
        assert!(!filter.matches(&member("c", MemberStatus::Rejected)));
    }

    #[test]
    fn id_filters_combine_with_status() {
        let one = MemberFilter::pending_with_id("a");
        assert!(one.matches(&member("a", MemberStatus::Pending)));
        assert!(!one.matches(&member("b", MemberStatus::Pending)));
        assert!(!one.matches(&member("a", MemberStatus::Inactive)));

        let many = MemberFilter::pending_with_ids(vec!["a".into(), "c".into()]);
        assert!(many.matches(&member("c", MemberStatus::Pending)));
        assert!(!many.matches(&member("b", MemberStatus::Pending)));

        let none = MemberFilter::pending_with_ids(Vec::new());
        assert!(!none.matches(&member("a", MemberStatus::Pending)));
    }
}
