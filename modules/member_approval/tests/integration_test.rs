//! Integration-style tests for the member_approval module.
//!
//! Key points:
//! - Each test runs on a fresh in-memory SQLite DB and applies migrations.
//! - Service is constructed with the SeaORM-backed gateway (Domain Port + Adapter).
//! - Local client and the wired module are tested against the same storage.

mod common;

use std::sync::Arc;

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use common::{ids, member, pending, RecordingPublisher};
use member_approval::config::MemberApprovalConfig;
use member_approval::contract::client::MemberApprovalApi;
use member_approval::contract::error::MemberApprovalError;
use member_approval::contract::model::{BulkOperationResult, Decision, MemberStatus};
use member_approval::domain::gateway::{MemberFilter, MemberOrder, MembersGateway};
use member_approval::domain::service::{Service, ServiceConfig};
use member_approval::gateways::local::MemberApprovalLocalClient;
use member_approval::infra::storage::sea_orm_gateway::SeaOrmMembersGateway;
use member_approval::MemberApproval;

/// Fresh in-memory database; a single connection keeps every query on the same DB.
async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    MemberApproval::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

struct Fixture {
    gateway: Arc<SeaOrmMembersGateway<DatabaseConnection>>,
    events: Arc<RecordingPublisher>,
    service: Arc<Service>,
}

async fn fixture(seed: Vec<member_approval::contract::model::Member>) -> Fixture {
    let gateway = Arc::new(SeaOrmMembersGateway::new(create_test_db().await));
    for m in &seed {
        gateway.insert_member(m).await.expect("seed member");
    }
    let events = Arc::new(RecordingPublisher::default());
    let service = Arc::new(Service::new(
        gateway.clone(),
        events.clone(),
        ServiceConfig::default(),
    ));
    Fixture {
        gateway,
        events,
        service,
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() -> Result<()> {
    let db = create_test_db().await;
    MemberApproval::migrate(&db).await?;
    let gateway = SeaOrmMembersGateway::new(db);
    assert!(gateway
        .select_members(&MemberFilter::pending(), MemberOrder::default())
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn test_insert_and_read_back_member() -> Result<()> {
    let f = fixture(vec![]).await;
    let mut m = pending(&Uuid::new_v4().to_string(), 0);
    m.messenger_id = Some("kakao-123".to_string());

    f.gateway.insert_member(&m).await?;
    let found = f.gateway.find_member(&m.id).await?.expect("member exists");
    assert_eq!(found, m);

    assert!(f.gateway.find_member("missing").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_pending_list_order_and_filter() -> Result<()> {
    let f = fixture(vec![
        pending("p-old", 0),
        member("act", MemberStatus::Active, 1),
        pending("p-new", 30),
        member("rej", MemberStatus::Rejected, 2),
        pending("p-mid", 15),
        member("del", MemberStatus::Deleted, 3),
    ])
    .await;

    let list = f.service.list_pending().await?;
    let got: Vec<&str> = list.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(got, vec!["p-new", "p-mid", "p-old"]);

    let asc = f
        .gateway
        .select_members(&MemberFilter::pending(), MemberOrder::CreatedAtAsc)
        .await?;
    assert_eq!(asc.first().map(|m| m.id.as_str()), Some("p-old"));
    Ok(())
}

#[tokio::test]
async fn test_approve_writes_decision_columns() -> Result<()> {
    let f = fixture(vec![pending("m1", 0), pending("m2", 1)]).await;

    f.service.approve("m1", "admin-1", Some("looks good")).await?;

    let m1 = f.gateway.find_member("m1").await?.expect("m1");
    assert_eq!(m1.status, MemberStatus::Active);
    let d = m1.decision.expect("approval stamp");
    assert_eq!(d.decision, Decision::Approved);
    assert_eq!(d.actor_id, "admin-1");
    assert_eq!(d.note.as_deref(), Some("looks good"));
    assert_eq!(d.member_id, "m1");

    let m2 = f.gateway.find_member("m2").await?.expect("m2");
    assert_eq!(m2.status, MemberStatus::Pending);
    assert!(m2.decision.is_none());

    let pending_ids: Vec<String> = f
        .service
        .list_pending()
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(pending_ids, vec!["m2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_reject_without_note_keeps_note_empty() -> Result<()> {
    let f = fixture(vec![pending("m1", 0)]).await;

    f.service.reject("m1", "admin-1", Some("   ")).await?;

    let m1 = f.gateway.find_member("m1").await?.expect("m1");
    assert_eq!(m1.status, MemberStatus::Rejected);
    let d = m1.decision.expect("rejection stamp");
    assert_eq!(d.decision, Decision::Rejected);
    assert_eq!(d.note, None);
    Ok(())
}

#[tokio::test]
async fn test_second_decision_does_not_overwrite_first() -> Result<()> {
    let f = fixture(vec![pending("m1", 0)]).await;

    f.service.reject("m1", "admin-1", Some("first")).await?;
    f.service.approve("m1", "admin-2", Some("second")).await?;

    let m1 = f.gateway.find_member("m1").await?.expect("m1");
    assert_eq!(m1.status, MemberStatus::Rejected);
    let d = m1.decision.expect("stamp");
    assert_eq!(d.actor_id, "admin-1");
    assert_eq!(d.note.as_deref(), Some("first"));
    assert_eq!(f.events.events().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_decisions_apply_exactly_once() -> Result<()> {
    let f = fixture(vec![pending("m1", 0)]).await;

    let (a, r) = tokio::join!(
        f.service.approve("m1", "admin-1", None),
        f.service.reject("m1", "admin-2", None),
    );
    a?;
    r?;

    let m1 = f.gateway.find_member("m1").await?.expect("m1");
    let d = m1.decision.expect("exactly one stamp");
    assert_eq!(m1.status, d.decision.target_status());
    let expected_actor = match d.decision {
        Decision::Approved => "admin-1",
        Decision::Rejected => "admin-2",
    };
    assert_eq!(d.actor_id, expected_actor);
    assert_eq!(f.events.events().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_bulk_approve_mixed_statuses() -> Result<()> {
    let f = fixture(vec![
        pending("a", 0),
        pending("b", 1),
        member("c", MemberStatus::Rejected, 2),
    ])
    .await;

    let result = f
        .service
        .bulk_approve(&ids(&["a", "b", "c"]), "admin-1", None)
        .await?;
    assert_eq!(result, BulkOperationResult { success: 2, failed: 1 });

    for id in ["a", "b"] {
        let m = f.gateway.find_member(id).await?.expect("member");
        assert_eq!(m.status, MemberStatus::Active);
        assert_eq!(m.decision.expect("stamp").actor_id, "admin-1");
    }
    let c = f.gateway.find_member("c").await?.expect("c");
    assert_eq!(c.status, MemberStatus::Rejected);
    Ok(())
}

#[tokio::test]
async fn test_bulk_reject_with_unknown_and_duplicate_ids() -> Result<()> {
    let f = fixture(vec![pending("a", 0), pending("b", 1)]).await;

    let request = ids(&["a", "ghost", "a"]);
    let result = f.service.bulk_reject(&request, "admin-1", Some("spam")).await?;

    assert_eq!(result.success, 1);
    assert_eq!(result.success + result.failed, request.len());
    let b = f.gateway.find_member("b").await?.expect("b");
    assert_eq!(b.status, MemberStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn test_local_client_maps_errors() -> Result<()> {
    let f = fixture(vec![pending("a", 0)]).await;
    let client: Arc<dyn MemberApprovalApi> =
        Arc::new(MemberApprovalLocalClient::new(f.service.clone()));

    assert_eq!(client.list_pending().await?.len(), 1);

    let err = client.approve("a", "", None).await.unwrap_err();
    assert!(matches!(err, MemberApprovalError::Validation { .. }));

    let err = client.bulk_reject(&[], "admin-1", None).await.unwrap_err();
    match err {
        MemberApprovalError::Validation { message } => assert!(message.starts_with("member_ids")),
        other => panic!("unexpected error: {other:?}"),
    }

    let result = client.bulk_approve(&ids(&["a"]), "admin-1", None).await?;
    assert!(result.is_complete());
    assert!(client.list_pending().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_module_wiring_end_to_end() -> Result<()> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;

    let module = MemberApproval::init(db.clone(), MemberApprovalConfig { max_bulk_size: 2 }).await?;
    assert_eq!(module.service().config().max_bulk_size, 2);

    let seeder = SeaOrmMembersGateway::new(db);
    for m in [pending("a", 0), pending("b", 1), pending("c", 2)] {
        seeder.insert_member(&m).await?;
    }

    let client = module.client();
    let err = client
        .bulk_approve(&ids(&["a", "b", "c"]), "admin-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, MemberApprovalError::Validation { .. }));

    let mut session = module.session(Some("admin-1".to_string()));
    session.refresh().await?;
    assert_eq!(session.pending().len(), 3);
    session.toggle("a");
    session.toggle("c");
    let result = session.reject_selected(None).await?;
    assert!(result.is_complete());
    assert_eq!(session.pending().len(), 1);
    Ok(())
}
