//! Integration tests for moneykids-core
//!
//! These tests exercise whole household flows: chores pay into the balance,
//! the balance feeds wishlist progress, and the projection engine plans ahead.

use moneykids_core::{
    db::Database,
    models::{
        Difficulty, NewTask, NewWishlistItem, TaskFrequency, TaskStatus, TransactionType,
        UserRole,
    },
    project, CompoundPeriod, Error, ProjectionInput,
};

// =============================================================================
// Allowance workflow
// =============================================================================

#[test]
fn test_chores_fund_wishlist() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let kid = db
        .create_user("Hana", UserRole::Child)
        .expect("Failed to create user");

    db.deposit(kid.id, 1000.0, Some("Birthday money"))
        .expect("Failed to deposit");

    let chore = db
        .create_task(&NewTask::regular(kid.id, "Walk the dog", 200.0, TaskFrequency::Daily))
        .expect("Failed to create chore");
    let quest = db
        .create_task(&NewTask::quest(kid.id, "Plant tomatoes", 800.0, Difficulty::Medium))
        .expect("Failed to create quest");

    for _ in 0..5 {
        db.complete_task(chore.id).expect("Failed to complete chore");
    }
    db.accept_quest(quest.id).expect("Failed to accept quest");
    db.set_task_progress(quest.id, 50)
        .expect("Failed to set progress");
    db.complete_task(quest.id).expect("Failed to complete quest");

    // 1000 + 5 * 200 + 800
    let summary = db.balance_summary(kid.id).expect("Failed to get summary");
    assert_eq!(summary.current_balance, 2800.0);
    assert_eq!(summary.last_transaction_type, Some(TransactionType::Quest));

    let history = db
        .list_transactions(kid.id, 0, 100)
        .expect("Failed to list transactions");
    assert_eq!(history.len(), 7);
    let rewards = history
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Reward)
        .count();
    assert_eq!(rewards, 5);

    let chore = db.get_task(chore.id).unwrap().unwrap();
    assert_eq!(chore.status, TaskStatus::Pending);
    assert_eq!(chore.completion_count, 5);

    db.add_wishlist_item(kid.id, &NewWishlistItem::new("Bike", 12000.0))
        .expect("Failed to add item");
    db.add_wishlist_item(kid.id, &NewWishlistItem::new("Lego", 2800.0))
        .expect("Failed to add item");
    db.move_wishlist_item(kid.id, 2, 1)
        .expect("Failed to reorder");

    let progress = db
        .wishlist_progress(kid.id, 1000.0, 0.0)
        .expect("Failed to get progress");
    assert_eq!(progress[0].name, "Lego");
    assert_eq!(progress[0].progress_percent, 100.0);
    assert_eq!(progress[1].name, "Bike");
    // 2800 + 10 * 1000 >= 12000 first happens after month 10
    assert_eq!(progress[1].months_to_afford, Some(10));
}

#[test]
fn test_spending_more_than_saved_is_rejected() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let kid = db.create_user("Ken", UserRole::Child).unwrap();
    db.deposit(kid.id, 300.0, None).unwrap();

    let err = db.withdraw(kid.id, 301.0, Some("Game")).unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds { .. }));
    assert_eq!(db.get_balance(kid.id).unwrap().current_amount, 300.0);
}

// =============================================================================
// Projection
// =============================================================================

#[test]
fn test_projection_agrees_with_closed_form() {
    let input = ProjectionInput {
        principal: 5000.0,
        monthly_contribution: 500.0,
        annual_rate_percent: 2.0,
        horizon_years: 5,
    };
    input.validate().expect("input should be valid");

    let series = project(&input);
    let closed = moneykids_core::future_value(5000.0, 2.0, CompoundPeriod::years(5), 500.0)
        .expect("Failed to compute future value");

    assert_eq!(series.len(), 6);
    assert_eq!(series.final_balance(), closed.future_value.round());
}

#[test]
fn test_required_savings_reaches_target() {
    let monthly =
        moneykids_core::required_monthly_savings(20000.0, 3.0, CompoundPeriod::years(2), 2000.0)
            .expect("Failed to compute savings");

    let series = project(&ProjectionInput {
        principal: 2000.0,
        monthly_contribution: monthly,
        annual_rate_percent: 3.0,
        horizon_years: 2,
    });
    // Rounding the payment to cents can leave the total a cent either side
    assert!((series.final_balance() - 20000.0).abs() <= 1.0);
}
