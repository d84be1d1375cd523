use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::MemberApprovalConfig;
use crate::contract::client::MemberApprovalApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::domain::session::ApprovalSession;
use crate::gateways::local::MemberApprovalLocalClient;
use crate::infra::events::LogEventPublisher;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_gateway::SeaOrmMembersGateway;

/// Wired member approval module: SeaORM gateway behind the domain service.
#[derive(Clone)]
pub struct MemberApproval {
    service: Arc<Service>,
}

impl MemberApproval {
    pub const NAME: &'static str = "member_approval";

    /// Run migrations and wire the service on top of `conn`.
    pub async fn init(conn: DatabaseConnection, cfg: MemberApprovalConfig) -> anyhow::Result<Self> {
        info!("Initializing {} module", Self::NAME);
        debug!(max_bulk_size = cfg.max_bulk_size, "Loaded member_approval config");

        Self::migrate(&conn).await?;

        let gateway = SeaOrmMembersGateway::new(conn);
        let service = Service::new(
            Arc::new(gateway),
            Arc::new(LogEventPublisher),
            ServiceConfig::from(&cfg),
        );

        info!("{} module ready", Self::NAME);
        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub async fn migrate(conn: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running member_approval database migrations");
        Migrator::up(conn, None).await?;
        info!("Member approval migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for consumers of the public contract.
    pub fn client(&self) -> Arc<dyn MemberApprovalApi> {
        Arc::new(MemberApprovalLocalClient::new(self.service.clone()))
    }

    pub fn session(&self, actor_id: Option<String>) -> ApprovalSession {
        ApprovalSession::new(self.service.clone(), actor_id)
    }
}
