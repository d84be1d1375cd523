use tracing::info;

use crate::domain::events::MemberDomainEvent;
use crate::domain::ports::EventPublisher;

/// Publishes decision events to the structured log.
#[derive(Debug, Clone, Default)]
pub struct LogEventPublisher;

impl EventPublisher<MemberDomainEvent> for LogEventPublisher {
    fn publish(&self, event: &MemberDomainEvent) {
        match event {
            MemberDomainEvent::Approved { id, by, at } => {
                info!(member_id = %id, actor_id = %by, at = %at, "member approved");
            }
            MemberDomainEvent::Rejected { id, by, at } => {
                info!(member_id = %id, actor_id = %by, at = %at, "member rejected");
            }
        }
    }
}
