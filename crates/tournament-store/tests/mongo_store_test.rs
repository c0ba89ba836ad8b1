//! MongoDB 存储集成测试
//!
//! 需要启用副本集的 MongoDB（事务依赖副本集），运行方式：
//!
//! ```bash
//! TEST_MONGODB_URL=mongodb://localhost:27017/?replicaSet=rs0 \
//!     cargo test -p tournament-store --test mongo_store_test -- --ignored
//! ```
//!
//! 每个测试使用独立的数据库，结束时删除。

use std::time::Duration;

use tournament_shared::database::Database;
use tournament_shared::test_utils::test_database_config;
use tournament_store::{
    AccountRepository, CompetitionRepository, MongoTournamentStore, StoreError,
    TournamentRepository, Workflow,
};

const MISSING_ID: &str = "64b7f0c2a1b2c3d4e5f60718";

async fn setup() -> (Database, MongoTournamentStore) {
    let config = test_database_config();
    let database = Database::connect(&config)
        .await
        .expect("连接测试数据库失败");
    let store = MongoTournamentStore::new(
        &database,
        Duration::from_secs(config.operation_timeout_seconds),
    );
    (database, store)
}

async fn teardown(database: Database) {
    database.database().drop().await.expect("删除测试数据库失败");
    database.close().await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_account_round_trip_and_negative_balance() {
    let (database, store) = setup().await;

    let id = store.create_account("X").await.unwrap();
    let account = store.get_account(&id).await.unwrap();
    assert_eq!(account.name, "X");
    assert_eq!(account.balance, 0.0);

    store.debit_account(&id, 100.0).await.unwrap();
    store.credit_account(&id, 30.0).await.unwrap();
    store.credit_account(&id, 0.0).await.unwrap();
    assert_eq!(store.get_account(&id).await.unwrap().balance, -70.0);

    teardown(database).await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_delete_exactly_once() {
    let (database, store) = setup().await;

    let id = store.create_account("alice").await.unwrap();
    store.delete_account(&id).await.unwrap();
    let err = store.delete_account(&id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::DeleteCountMismatch { deleted: 0, .. }
    ));

    let competition = store.create_competition("weekly", 5.0).await.unwrap();
    store.delete_competition(&competition).await.unwrap();
    assert!(
        store
            .delete_competition(&competition)
            .await
            .unwrap_err()
            .is_count_mismatch()
    );

    teardown(database).await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_unknown_and_malformed_ids() {
    let (database, store) = setup().await;

    assert!(matches!(
        store.get_account(MISSING_ID).await.unwrap_err(),
        StoreError::NotFound { .. }
    ));
    assert!(matches!(
        store.credit_account(MISSING_ID, 5.0).await.unwrap_err(),
        StoreError::NotFound { .. }
    ));
    assert!(matches!(
        store.get_competition("not-an-id").await.unwrap_err(),
        StoreError::InvalidIdentifier { .. }
    ));

    teardown(database).await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_join_then_repeat_join() {
    let (database, store) = setup().await;

    let account = store.create_account("alice").await.unwrap();
    let competition = store.create_competition("weekly", 1000.0).await.unwrap();

    store.join_competition(&competition, &account).await.unwrap();
    let loaded = store.get_competition(&competition).await.unwrap();
    assert_eq!(loaded.users.len(), 1);
    assert_eq!(loaded.prize, 1000.0);

    let err = store
        .join_competition(&competition, &account)
        .await
        .unwrap_err();
    assert!(err.is_count_mismatch());
    assert_eq!(err.failed_step(), Some("roster_update"));

    let loaded = store.get_competition(&competition).await.unwrap();
    assert_eq!(loaded.users.len(), 1);
    assert_eq!(loaded.prize, 1000.0);

    teardown(database).await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_finish_pays_once() {
    let (database, store) = setup().await;

    let winner = store.create_account("alice").await.unwrap();
    let competition = store.create_competition("weekly", 1000.0).await.unwrap();
    store.join_competition(&competition, &winner).await.unwrap();

    store
        .finish_competition(&competition, &winner)
        .await
        .unwrap();
    let loaded = store.get_competition(&competition).await.unwrap();
    assert!(loaded.is_finished());
    assert_eq!(loaded.winner.map(|id| id.to_hex()), Some(winner.clone()));
    assert_eq!(store.get_account(&winner).await.unwrap().balance, 1000.0);

    let err = store
        .finish_competition(&competition, &winner)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::TransactionAborted {
            workflow: Workflow::Finish,
            step: "status_guard",
            ..
        }
    ));
    assert_eq!(store.get_account(&winner).await.unwrap().balance, 1000.0);

    teardown(database).await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_finish_rolls_back_on_payout_failure() {
    let (database, store) = setup().await;

    let competition = store.create_competition("weekly", 10.0).await.unwrap();
    let err = store
        .finish_competition(&competition, MISSING_ID)
        .await
        .unwrap_err();
    assert_eq!(err.failed_step(), Some("winner_payout"));

    let loaded = store.get_competition(&competition).await.unwrap();
    assert!(!loaded.is_finished());
    assert!(loaded.winner.is_none());

    teardown(database).await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_repository_single_field_updates() {
    let (database, _store) = setup().await;
    let accounts = AccountRepository::new(database.database());
    let competitions = CompetitionRepository::new(database.database());

    let account = accounts.create("bob").await.unwrap().to_hex();
    let competition = competitions.create("cup", 20.0).await.unwrap().to_hex();

    competitions.set_status(&competition, "started").await.unwrap();
    let err = competitions
        .set_status(&competition, "started")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::UpdateCountMismatch { field: "status", modified: 0, .. }
    ));

    competitions.set_winner(&competition, &account).await.unwrap();
    competitions.adjust_prize(&competition, 0.0).await.unwrap();
    competitions.adjust_prize(&competition, 15.0).await.unwrap();

    let loaded = competitions.get(&competition).await.unwrap();
    assert_eq!(loaded.status, "started");
    assert_eq!(loaded.prize, 15.0);
    assert_eq!(loaded.winner.map(|id| id.to_hex()), Some(account));

    teardown(database).await;
}

#[tokio::test]
#[ignore = "需要 MongoDB 副本集"]
async fn test_health_check_uses_database_handle() {
    let (database, store) = setup().await;

    store.health_check().await.unwrap();
    database.health_check().await.unwrap();

    let unbounded = MongoTournamentStore::new(&database, Duration::ZERO);
    unbounded.health_check().await.unwrap();

    teardown(database).await;
}
