//! SeaORM-backed gateway for the members table.
//!
//! Generic over `C: ConnectionTrait`, so it can be built on a
//! `DatabaseConnection` or on a transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::contract::model::Member;
use crate::domain::decision::DecisionFields;
use crate::domain::gateway::{IdFilter, MemberFilter, MemberOrder, MembersGateway};
use crate::infra::storage::entity::{Column, Entity as MemberEntity};
use crate::infra::storage::mapper;

pub struct SeaOrmMembersGateway<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmMembersGateway<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Insert a full member row, e.g. when seeding a registration.
    pub async fn insert_member(&self, member: &Member) -> anyhow::Result<()> {
        let _ = mapper::contract_to_active_model(member)
            .insert(&self.conn)
            .await
            .with_context(|| format!("insert member {} failed", member.id))?;
        Ok(())
    }

    pub async fn find_member(&self, id: &str) -> anyhow::Result<Option<Member>> {
        let found = MemberEntity::find_by_id(id.to_owned())
            .one(&self.conn)
            .await
            .context("find_member failed")?;
        found.map(mapper::entity_to_contract).transpose()
    }
}

fn to_condition(filter: &MemberFilter) -> Condition {
    let mut cond = Condition::all();
    match &filter.ids {
        IdFilter::Any => {}
        IdFilter::One(id) => cond = cond.add(Column::Id.eq(id.as_str())),
        IdFilter::In(ids) => cond = cond.add(Column::Id.is_in(ids.iter().map(String::as_str))),
    }
    if let Some(status) = filter.status {
        cond = cond.add(Column::Status.eq(status.as_str()));
    }
    cond
}

#[async_trait::async_trait]
impl<C> MembersGateway for SeaOrmMembersGateway<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn select_members(
        &self,
        filter: &MemberFilter,
        order: MemberOrder,
    ) -> anyhow::Result<Vec<Member>> {
        let query = MemberEntity::find().filter(to_condition(filter));
        // id breaks ties between rows created in the same instant
        let query = match order {
            MemberOrder::CreatedAtDesc => query
                .order_by_desc(Column::CreatedAt)
                .order_by_desc(Column::Id),
            MemberOrder::CreatedAtAsc => query
                .order_by_asc(Column::CreatedAt)
                .order_by_asc(Column::Id),
        };

        let rows = query
            .all(&self.conn)
            .await
            .context("select_members failed")?;
        rows.into_iter().map(mapper::entity_to_contract).collect()
    }

    async fn update_members(
        &self,
        filter: &MemberFilter,
        fields: &DecisionFields,
    ) -> anyhow::Result<Vec<String>> {
        // Single guarded statement: rows that left the filter before the
        // write are not touched and not returned.
        let updated = MemberEntity::update_many()
            .set(mapper::decision_to_active_model(fields))
            .filter(to_condition(filter))
            .exec_with_returning(&self.conn)
            .await
            .context("update_members failed")?;
        Ok(updated.into_iter().map(|m| m.id).collect())
    }
}
