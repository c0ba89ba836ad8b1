//! 内存存储行为测试
//!
//! 覆盖账户、比赛及两个工作流的完整业务流程（无需外部依赖）

use tournament_store::{InMemoryTournamentStore, StoreError, TournamentRepository, Workflow};

const MISSING_ID: &str = "64b7f0c2a1b2c3d4e5f60718";

async fn store_with_account(name: &str) -> (InMemoryTournamentStore, String) {
    let store = InMemoryTournamentStore::new();
    let id = store.create_account(name).await.unwrap();
    (store, id)
}

// ==================== 账户 ====================

#[tokio::test]
async fn test_create_and_get_account() {
    let (store, id) = store_with_account("X").await;

    let account = store.get_account(&id).await.unwrap();
    assert_eq!(tournament_store::format_id(&account.id), id);
    assert_eq!(account.name, "X");
    assert_eq!(account.balance, 0.0);
}

#[tokio::test]
async fn test_debit_allows_negative_balance() {
    let (store, id) = store_with_account("alice").await;

    store.debit_account(&id, 100.0).await.unwrap();

    assert_eq!(store.get_account(&id).await.unwrap().balance, -100.0);
}

#[tokio::test]
async fn test_balance_is_conserved_across_adjustments() {
    let (store, id) = store_with_account("alice").await;

    let operations = [(true, 50.0), (false, 20.0), (true, 7.5), (false, 100.0), (true, 0.0)];
    let mut expected = 0.0;
    for (credit, amount) in operations {
        if credit {
            store.credit_account(&id, amount).await.unwrap();
            expected += amount;
        } else {
            store.debit_account(&id, amount).await.unwrap();
            expected -= amount;
        }
    }

    assert_eq!(store.get_account(&id).await.unwrap().balance, expected);
}

#[tokio::test]
async fn test_non_finite_amount_is_rejected() {
    let (store, id) = store_with_account("alice").await;

    let err = store.credit_account(&id, f64::NAN).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidAmount { .. }));
    assert_eq!(store.get_account(&id).await.unwrap().balance, 0.0);
}

#[tokio::test]
async fn test_delete_account_exactly_once() {
    let (store, id) = store_with_account("alice").await;

    store.delete_account(&id).await.unwrap();
    let err = store.delete_account(&id).await.unwrap_err();

    assert!(matches!(
        err,
        StoreError::DeleteCountMismatch { deleted: 0, .. }
    ));
    assert!(err.is_count_mismatch());
    assert!(matches!(
        store.get_account(&id).await.unwrap_err(),
        StoreError::NotFound { entity: "account", .. }
    ));
}

#[tokio::test]
async fn test_adjust_unknown_account_is_not_found() {
    let store = InMemoryTournamentStore::new();

    let err = store.credit_account(MISSING_ID, 10.0).await.unwrap_err();

    assert!(matches!(err, StoreError::NotFound { entity: "account", .. }));
    assert_eq!(store.account_count(), 0);
}

#[tokio::test]
async fn test_malformed_id_never_touches_store() {
    let (store, _) = store_with_account("alice").await;

    for bad in ["", "abc", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
        assert!(matches!(
            store.get_account(bad).await.unwrap_err(),
            StoreError::InvalidIdentifier { .. }
        ));
        assert!(matches!(
            store.delete_account(bad).await.unwrap_err(),
            StoreError::InvalidIdentifier { .. }
        ));
        assert!(matches!(
            store.join_competition(bad, MISSING_ID).await.unwrap_err(),
            StoreError::InvalidIdentifier { .. }
        ));
    }
    assert_eq!(store.account_count(), 1);
}

// ==================== 比赛 ====================

#[tokio::test]
async fn test_create_competition_defaults() {
    let store = InMemoryTournamentStore::new();
    let id = store.create_competition("weekly", 1000.0).await.unwrap();

    let competition = store.get_competition(&id).await.unwrap();
    assert_eq!(competition.name, "weekly");
    assert_eq!(competition.deposit, 1000.0);
    assert_eq!(competition.prize, 0.0);
    assert_eq!(competition.status, "");
    assert!(competition.users.is_empty());
    assert!(competition.winner.is_none());
}

#[tokio::test]
async fn test_delete_competition_exactly_once() {
    let store = InMemoryTournamentStore::new();
    let id = store.create_competition("weekly", 10.0).await.unwrap();

    store.delete_competition(&id).await.unwrap();

    assert!(store.delete_competition(&id).await.unwrap_err().is_count_mismatch());
    assert_eq!(store.competition_count(), 0);
}

// ==================== 加入比赛 ====================

#[tokio::test]
async fn test_join_adds_member_and_deposit() {
    let (store, account) = store_with_account("alice").await;
    let competition = store.create_competition("weekly", 1000.0).await.unwrap();

    store.join_competition(&competition, &account).await.unwrap();

    let loaded = store.get_competition(&competition).await.unwrap();
    assert_eq!(loaded.users.len(), 1);
    assert_eq!(tournament_store::format_id(&loaded.users[0]), account);
    assert_eq!(loaded.prize, 1000.0);
}

#[tokio::test]
async fn test_repeat_join_fails_without_changes() {
    let (store, account) = store_with_account("alice").await;
    let competition = store.create_competition("weekly", 1000.0).await.unwrap();
    store.join_competition(&competition, &account).await.unwrap();

    let err = store
        .join_competition(&competition, &account)
        .await
        .unwrap_err();

    assert!(err.is_count_mismatch());
    assert!(matches!(
        err,
        StoreError::TransactionAborted {
            workflow: Workflow::Join,
            step: "roster_update",
            ..
        }
    ));
    let loaded = store.get_competition(&competition).await.unwrap();
    assert_eq!(loaded.users.len(), 1);
    assert_eq!(loaded.prize, 1000.0);
}

#[tokio::test]
async fn test_join_unknown_competition() {
    let (store, account) = store_with_account("alice").await;

    let err = store.join_competition(MISSING_ID, &account).await.unwrap_err();

    assert_eq!(err.failed_step(), Some("roster_update"));
    assert!(matches!(err.root(), StoreError::NotFound { entity: "competition", .. }));
}

#[tokio::test]
async fn test_multiple_members_accumulate_prize() {
    let store = InMemoryTournamentStore::new();
    let competition = store.create_competition("weekly", 250.0).await.unwrap();

    for name in ["a", "b", "c", "d"] {
        let account = store.create_account(name).await.unwrap();
        store.join_competition(&competition, &account).await.unwrap();
    }

    let loaded = store.get_competition(&competition).await.unwrap();
    assert_eq!(loaded.users.len(), 4);
    assert_eq!(loaded.prize, 1000.0);
}

// ==================== 结束比赛 ====================

#[tokio::test]
async fn test_finish_pays_exact_prize() {
    let (store, winner) = store_with_account("alice").await;
    let competition = store.create_competition("weekly", 1000.0).await.unwrap();
    store.join_competition(&competition, &winner).await.unwrap();
    let before = store.get_account(&winner).await.unwrap().balance;

    store
        .finish_competition(&competition, &winner)
        .await
        .unwrap();

    let loaded = store.get_competition(&competition).await.unwrap();
    assert!(loaded.is_finished());
    assert_eq!(loaded.winner.map(|id| id.to_hex()), Some(winner.clone()));
    let after = store.get_account(&winner).await.unwrap().balance;
    assert_eq!(after - before, 1000.0);
}

#[tokio::test]
async fn test_finish_twice_pays_once() {
    let (store, winner) = store_with_account("alice").await;
    let competition = store.create_competition("weekly", 1000.0).await.unwrap();
    store.join_competition(&competition, &winner).await.unwrap();
    store
        .finish_competition(&competition, &winner)
        .await
        .unwrap();

    let err = store
        .finish_competition(&competition, &winner)
        .await
        .unwrap_err();

    assert!(matches!(err.root(), StoreError::AlreadyFinished { .. }));
    assert_eq!(err.failed_step(), Some("status_guard"));
    assert_eq!(store.get_account(&winner).await.unwrap().balance, 1000.0);
}

#[tokio::test]
async fn test_finish_with_unknown_winner_rolls_back() {
    let store = InMemoryTournamentStore::new();
    let competition = store.create_competition("weekly", 10.0).await.unwrap();

    let err = store
        .finish_competition(&competition, MISSING_ID)
        .await
        .unwrap_err();

    assert_eq!(err.failed_step(), Some("winner_payout"));
    assert!(err.is_count_mismatch());
    let loaded = store.get_competition(&competition).await.unwrap();
    assert!(!loaded.is_finished());
    assert!(loaded.winner.is_none());
}

#[tokio::test]
async fn test_finish_unknown_competition() {
    let (store, winner) = store_with_account("alice").await;

    let err = store
        .finish_competition(MISSING_ID, &winner)
        .await
        .unwrap_err();

    assert_eq!(err.failed_step(), Some("load_competition"));
    assert_eq!(store.get_account(&winner).await.unwrap().balance, 0.0);
}

#[tokio::test]
async fn test_concurrent_joins_are_serialized() {
    let store = std::sync::Arc::new(InMemoryTournamentStore::new());
    let competition = store.create_competition("weekly", 1.0).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        let competition = competition.clone();
        handles.push(tokio::spawn(async move {
            let account = store.create_account(&format!("p{i}")).await.unwrap();
            store.join_competition(&competition, &account).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let loaded = store.get_competition(&competition).await.unwrap();
    assert_eq!(loaded.users.len(), 16);
    assert_eq!(loaded.prize, 16.0);
}
