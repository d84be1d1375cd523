//! Shared test doubles for the member_approval test suites.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

use member_approval::contract::model::{Member, MemberStatus};
use member_approval::domain::decision::DecisionFields;
use member_approval::domain::events::MemberDomainEvent;
use member_approval::domain::gateway::{MemberFilter, MemberOrder, MembersGateway};
use member_approval::domain::ports::EventPublisher;
use member_approval::domain::service::{Service, ServiceConfig};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// Member created `minutes` after [`base_time`].
pub fn member(id: &str, status: MemberStatus, minutes: i64) -> Member {
    Member {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        name: format!("Member {id}"),
        generation: 7,
        occupation: "developer".to_string(),
        phone: "010-1234-5678".to_string(),
        messenger_id: None,
        profile_image: None,
        status,
        created_at: base_time() + Duration::minutes(minutes),
        email_confirmed_at: Some(base_time()),
        decision: None,
    }
}

pub fn pending(id: &str, minutes: i64) -> Member {
    member(id, MemberStatus::Pending, minutes)
}

/// In-memory gateway applying filters the way the SQL adapter does.
#[derive(Default)]
pub struct MockMembersGateway {
    members: Mutex<Vec<Member>>,
    selects: AtomicUsize,
    updates: AtomicUsize,
    fail_selects: AtomicBool,
    fail_updates: AtomicBool,
    fail_selects_after_update: AtomicBool,
}

impl MockMembersGateway {
    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            members: Mutex::new(members),
            ..Default::default()
        }
    }

    pub fn member(&self, id: &str) -> Option<Member> {
        self.members.lock().iter().find(|m| m.id == id).cloned()
    }

    pub fn select_calls(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn fail_selects(&self, fail: bool) {
        self.fail_selects.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Reads keep working until the next successful update, then start failing.
    pub fn fail_selects_after_update(&self) {
        self.fail_selects_after_update.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl MembersGateway for MockMembersGateway {
    async fn select_members(
        &self,
        filter: &MemberFilter,
        order: MemberOrder,
    ) -> anyhow::Result<Vec<Member>> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        if self.fail_selects.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset by peer");
        }
        let mut rows: Vec<Member> = self
            .members
            .lock()
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        match order {
            MemberOrder::CreatedAtDesc => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            MemberOrder::CreatedAtAsc => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        Ok(rows)
    }

    async fn update_members(
        &self,
        filter: &MemberFilter,
        fields: &DecisionFields,
    ) -> anyhow::Result<Vec<String>> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            anyhow::bail!("disk I/O error");
        }
        let mut updated = Vec::new();
        for m in self.members.lock().iter_mut() {
            if filter.matches(m) {
                m.status = fields.target_status();
                m.decision = Some(fields.record_for(m.id.clone()));
                updated.push(m.id.clone());
            }
        }
        if self.fail_selects_after_update.swap(false, Ordering::SeqCst) {
            self.fail_selects(true);
        }
        Ok(updated)
    }
}

/// Publisher that remembers every event it was handed.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<MemberDomainEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<MemberDomainEvent> {
        self.events.lock().clone()
    }
}

impl EventPublisher<MemberDomainEvent> for RecordingPublisher {
    fn publish(&self, event: &MemberDomainEvent) {
        self.events.lock().push(event.clone());
    }
}

pub struct Harness {
    pub gateway: Arc<MockMembersGateway>,
    pub events: Arc<RecordingPublisher>,
    pub service: Arc<Service>,
}

pub fn harness(members: Vec<Member>) -> Harness {
    harness_with_config(members, ServiceConfig::default())
}

pub fn harness_with_config(members: Vec<Member>, config: ServiceConfig) -> Harness {
    let gateway = Arc::new(MockMembersGateway::with_members(members));
    let events = Arc::new(RecordingPublisher::default());
    let service = Arc::new(Service::new(gateway.clone(), events.clone(), config));
    Harness {
        gateway,
        events,
        service,
    }
}

pub fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
