use anyhow::Context;
use sea_orm::Set;

use crate::contract::model::{ApprovalDecision, Decision, Member, MemberStatus};
use crate::domain::decision::DecisionFields;
use crate::infra::storage::entity::{ActiveModel, Model};

/// Convert a database row to a contract model
pub fn entity_to_contract(m: Model) -> anyhow::Result<Member> {
    let status: MemberStatus = m
        .status
        .parse()
        .with_context(|| format!("member {} has an invalid status", m.id))?;

    let decision = match status {
        MemberStatus::Active => stamp(
            &m.id,
            Decision::Approved,
            m.approved_at,
            m.approved_by,
            m.approval_note,
        ),
        MemberStatus::Rejected => stamp(
            &m.id,
            Decision::Rejected,
            m.rejected_at,
            m.rejected_by,
            m.rejection_note,
        ),
        _ => None,
    };

    Ok(Member {
        id: m.id,
        email: m.email,
        name: m.name,
        generation: m.generation,
        occupation: m.occupation,
        phone: m.phone,
        messenger_id: m.messenger_id,
        profile_image: m.profile_image,
        status,
        created_at: m.created_at,
        email_confirmed_at: m.email_confirmed_at,
        decision,
    })
}

fn stamp(
    member_id: &str,
    decision: Decision,
    at: Option<chrono::DateTime<chrono::Utc>>,
    by: Option<String>,
    note: Option<String>,
) -> Option<ApprovalDecision> {
    // Members activated outside this workflow carry no stamp
    Some(ApprovalDecision {
        member_id: member_id.to_owned(),
        decision,
        actor_id: by?,
        note,
        decided_at: at?,
    })
}

/// Full row for inserting a member (decision columns follow `m.decision`).
pub fn contract_to_active_model(m: &Member) -> ActiveModel {
    let mut am = ActiveModel {
        id: Set(m.id.clone()),
        email: Set(m.email.clone()),
        name: Set(m.name.clone()),
        generation: Set(m.generation),
        occupation: Set(m.occupation.clone()),
        phone: Set(m.phone.clone()),
        messenger_id: Set(m.messenger_id.clone()),
        profile_image: Set(m.profile_image.clone()),
        status: Set(m.status.as_str().to_owned()),
        created_at: Set(m.created_at),
        email_confirmed_at: Set(m.email_confirmed_at),
        approved_at: Set(None),
        approved_by: Set(None),
        approval_note: Set(None),
        rejected_at: Set(None),
        rejected_by: Set(None),
        rejection_note: Set(None),
    };
    if let Some(d) = &m.decision {
        let fields = DecisionFields {
            decision: d.decision,
            actor_id: d.actor_id.clone(),
            note: d.note.clone(),
            decided_at: d.decided_at,
        };
        apply_decision_columns(&mut am, &fields);
    }
    am
}

/// Partial row written by a decision update; untouched columns stay `NotSet`.
pub fn decision_to_active_model(fields: &DecisionFields) -> ActiveModel {
    let mut am = ActiveModel {
        status: Set(fields.target_status().as_str().to_owned()),
        ..Default::default()
    };
    apply_decision_columns(&mut am, fields);
    am
}

fn apply_decision_columns(am: &mut ActiveModel, fields: &DecisionFields) {
    let at = Set(Some(fields.decided_at));
    let by = Set(Some(fields.actor_id.clone()));
    // note column is left untouched when no note was given
    let note = fields.note.clone().map(|n| Set(Some(n)));
    match fields.decision {
        Decision::Approved => {
            am.approved_at = at;
            am.approved_by = by;
            if let Some(note) = note {
                am.approval_note = note;
            }
        }
        Decision::Rejected => {
            am.rejected_at = at;
            am.rejected_by = by;
            if let Some(note) = note {
                am.rejection_note = note;
            }
        }
    }
}
