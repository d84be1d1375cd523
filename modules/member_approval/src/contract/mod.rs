pub mod client;
pub mod error;
pub mod model;

pub use client::MemberApprovalApi;
pub use error::MemberApprovalError;
pub use model::{ApprovalDecision, BulkOperationResult, Decision, Member, MemberStatus};
