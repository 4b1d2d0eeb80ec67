//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_child() -> (Database, User) {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Hana", UserRole::Child).unwrap();
        (db, user)
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
        db.health_check().unwrap();
    }

    #[test]
    fn test_schema_tables_exist() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('users', 'balances', 'transactions', 'tasks', 'task_completions', 'wishlist_items', 'audit_log')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 7);
    }

    #[test]
    fn test_foreign_keys_enabled_on_pooled_connections() {
        let db = Database::in_memory().unwrap();
        let conns: Vec<_> = (0..3).map(|_| db.conn().unwrap()).collect();
        for conn in &conns {
            let on: i64 = conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                .unwrap();
            assert_eq!(on, 1);
        }
    }

    // ========== Users ==========

    #[test]
    fn test_user_crud() {
        let db = Database::in_memory().unwrap();

        let parent = db.create_user("Mum", UserRole::Parent).unwrap();
        let child = db.create_user("  Ken ", UserRole::Child).unwrap();
        assert_eq!(child.name, "Ken");
        assert_eq!(parent.role, UserRole::Parent);

        let users = db.list_users().unwrap();
        assert_eq!(users.len(), 2);

        let fetched = db.get_user(child.id).unwrap().unwrap();
        assert_eq!(fetched.role, UserRole::Child);

        db.delete_user(parent.id).unwrap();
        assert!(db.get_user(parent.id).unwrap().is_none());
        assert!(matches!(
            db.delete_user(parent.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_create_user_rejects_blank_name() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.create_user("   ", UserRole::Child),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_new_user_has_zero_balance() {
        let (db, user) = db_with_child();
        let balance = db.get_balance(user.id).unwrap();
        assert_eq!(balance.current_amount, 0.0);
        assert!(balance.savings_goal.is_none());
    }

    #[test]
    fn test_delete_user_cascades() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 100.0, None).unwrap();
        db.create_task(&NewTask::regular(user.id, "Dishes", 10.0, TaskFrequency::Daily))
            .unwrap();
        db.add_wishlist_item(user.id, &NewWishlistItem::new("Kite", 30.0))
            .unwrap();

        db.delete_user(user.id).unwrap();

        let conn = db.conn().unwrap();
        for table in ["balances", "transactions", "tasks", "wishlist_items"] {
            let count: i64 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM {} WHERE user_id = ?", table),
                    [user.id],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 0, "{} should be empty after delete", table);
        }
    }

    // ========== Balance ==========

    #[test]
    fn test_deposit_and_withdraw() {
        let (db, user) = db_with_child();

        let tx = db.deposit(user.id, 500.0, Some("Pocket money")).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Deposit);
        assert_eq!(tx.description.as_deref(), Some("Pocket money"));

        let tx = db.withdraw(user.id, 120.0, Some("Comic")).unwrap();
        assert_eq!(tx.signed_amount(), -120.0);

        assert_eq!(db.get_balance(user.id).unwrap().current_amount, 380.0);
    }

    #[test]
    fn test_withdraw_insufficient_funds_leaves_state_unchanged() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 50.0, None).unwrap();

        let err = db.withdraw(user.id, 80.0, None).unwrap_err();
        match err {
            Error::InsufficientFunds { balance, requested } => {
                assert_eq!(balance, 50.0);
                assert_eq!(requested, 80.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(db.get_balance(user.id).unwrap().current_amount, 50.0);
        assert_eq!(db.list_transactions(user.id, 0, 100).unwrap().len(), 1);
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 0.1, None).unwrap();
        db.deposit(user.id, 0.2, None).unwrap();
        db.withdraw(user.id, 0.3, None).unwrap();
        assert_eq!(db.get_balance(user.id).unwrap().current_amount, 0.0);
    }

    #[test]
    fn test_record_transaction_validates() {
        let (db, user) = db_with_child();
        assert!(matches!(
            db.deposit(user.id, 0.0, None),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.deposit(user.id, 10.0, Some(&"x".repeat(201))),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.deposit(9999, 10.0, None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_record_job_transaction() {
        let (db, user) = db_with_child();
        let tx = db
            .record_transaction(
                user.id,
                &NewTransaction {
                    amount: 300.0,
                    transaction_type: TransactionType::Job,
                    description: Some("Washed the car".to_string()),
                },
            )
            .unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Job);
        assert_eq!(db.get_balance(user.id).unwrap().current_amount, 300.0);
    }

    #[test]
    fn test_list_transactions_newest_first_with_paging() {
        let (db, user) = db_with_child();
        for amount in [10.0, 20.0, 30.0] {
            db.deposit(user.id, amount, None).unwrap();
        }

        let all = db.list_transactions(user.id, 0, 10).unwrap();
        let amounts: Vec<f64> = all.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![30.0, 20.0, 10.0]);

        let page = db.list_transactions(user.id, 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].amount, 20.0);
    }

    #[test]
    fn test_unknown_transaction_type_fails_the_read() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 10.0, None).unwrap();
        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO transactions (user_id, amount, transaction_type) VALUES (?, 5.0, 'bogus')",
                [user.id],
            )
            .unwrap();

        let err = db.list_transactions(user.id, 0, 10).unwrap_err();
        assert!(matches!(
            err,
            Error::Database(rusqlite::Error::FromSqlConversionFailure(3, _, _))
        ));
    }

    #[test]
    fn test_savings_goal_and_summary() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 250.0, None).unwrap();

        let summary = db.balance_summary(user.id).unwrap();
        assert!(summary.achievement_rate.is_none());
        assert_eq!(summary.last_transaction_amount, Some(250.0));
        assert_eq!(
            summary.last_transaction_type,
            Some(TransactionType::Deposit)
        );

        db.set_savings_goal(user.id, Some(1000.0)).unwrap();
        let summary = db.balance_summary(user.id).unwrap();
        assert_eq!(summary.savings_goal, Some(1000.0));
        assert_eq!(summary.achievement_rate, Some(25.0));

        db.set_savings_goal(user.id, None).unwrap();
        assert!(db.get_balance(user.id).unwrap().savings_goal.is_none());

        assert!(db.set_savings_goal(user.id, Some(-5.0)).is_err());
    }

    #[test]
    fn test_balance_forecast() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 600.0, None).unwrap();
        db.withdraw(user.id, 300.0, None).unwrap();

        let forecast = db.balance_forecast(user.id, 5, Utc::now()).unwrap();
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast[0].predicted_amount, 300.0);
        // (600 - 300) / 30 = 10 per day
        assert_eq!(forecast[4].predicted_amount, 340.0);

        assert!(db.balance_forecast(user.id, 10_000, Utc::now()).is_err());
    }

    // ========== Tasks ==========

    #[test]
    fn test_task_crud() {
        let (db, user) = db_with_child();

        let task = db
            .create_task(&NewTask::regular(user.id, "Feed the cat", 50.0, TaskFrequency::Daily))
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.frequency, Some(TaskFrequency::Daily));
        assert_eq!(task.completion_count, 0);

        let updated = db
            .update_task(
                task.id,
                &TaskUpdate {
                    reward: Some(80.0),
                    description: Some("Morning and evening".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.reward, 80.0);
        assert_eq!(updated.title, "Feed the cat");

        db.delete_task(task.id).unwrap();
        assert!(db.get_task(task.id).unwrap().is_none());
        assert!(matches!(db.delete_task(task.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_unknown_task_status_fails_the_read() {
        let (db, user) = db_with_child();
        let task = db
            .create_task(&NewTask::regular(user.id, "Water plants", 20.0, TaskFrequency::Weekly))
            .unwrap();
        db.conn()
            .unwrap()
            .execute("UPDATE tasks SET status = 'lost' WHERE id = ?", [task.id])
            .unwrap();

        assert!(matches!(db.get_task(task.id), Err(Error::Database(_))));
    }

    #[test]
    fn test_create_task_for_unknown_user() {
        let db = Database::in_memory().unwrap();
        let result = db.create_task(&NewTask::quest(42, "Read", 10.0, Difficulty::Easy));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_tasks_filters() {
        let (db, user) = db_with_child();
        let other = db.create_user("Sora", UserRole::Child).unwrap();

        let quest = db
            .create_task(&NewTask::quest(user.id, "Read a book", 500.0, Difficulty::Medium))
            .unwrap();
        db.create_task(&NewTask::regular(user.id, "Bins", 20.0, TaskFrequency::Weekly))
            .unwrap();
        db.create_task(&NewTask::regular(other.id, "Dishes", 20.0, TaskFrequency::Daily))
            .unwrap();
        db.accept_quest(quest.id).unwrap();

        assert_eq!(db.list_tasks(None, None).unwrap().len(), 3);
        assert_eq!(db.list_tasks(Some(user.id), None).unwrap().len(), 2);

        let in_progress = db
            .list_tasks(Some(user.id), Some(TaskStatus::InProgress))
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, quest.id);
    }

    #[test]
    fn test_complete_quest_pays_reward() {
        let (db, user) = db_with_child();
        let quest = db
            .create_task(&NewTask::quest(user.id, "Clean the garage", 800.0, Difficulty::Hard))
            .unwrap();

        db.accept_quest(quest.id).unwrap();
        let completion = db.complete_task(quest.id).unwrap();

        assert_eq!(completion.task.status, TaskStatus::Completed);
        assert_eq!(completion.task.progress, 100);
        assert_eq!(completion.task.completion_count, 1);
        assert_eq!(completion.balance, 800.0);

        let tx = completion.transaction.unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Quest);
        assert_eq!(tx.task_id, Some(quest.id));

        // Completed is terminal
        assert!(matches!(
            db.complete_task(quest.id),
            Err(Error::InvalidTransition(_))
        ));
        assert_eq!(db.get_balance(user.id).unwrap().current_amount, 800.0);
    }

    #[test]
    fn test_recurring_chore_returns_to_pending() {
        let (db, user) = db_with_child();
        let chore = db
            .create_task(&NewTask::regular(user.id, "Water plants", 30.0, TaskFrequency::Daily))
            .unwrap();

        db.complete_task(chore.id).unwrap();
        let completion = db.complete_task(chore.id).unwrap();

        assert_eq!(completion.task.status, TaskStatus::Pending);
        assert_eq!(completion.task.completion_count, 2);
        assert_eq!(completion.balance, 60.0);
        assert_eq!(
            completion.transaction.unwrap().transaction_type,
            TransactionType::Reward
        );
    }

    #[test]
    fn test_one_time_chore_completes() {
        let (db, user) = db_with_child();
        let chore = db
            .create_task(&NewTask::regular(user.id, "Tidy attic", 100.0, TaskFrequency::OneTime))
            .unwrap();

        let completion = db.complete_task(chore.id).unwrap();
        assert_eq!(completion.task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_zero_reward_task_completes_without_transaction() {
        let (db, user) = db_with_child();
        let chore = db
            .create_task(&NewTask::regular(user.id, "Make bed", 0.0, TaskFrequency::OneTime))
            .unwrap();

        let completion = db.complete_task(chore.id).unwrap();
        assert!(completion.transaction.is_none());
        assert_eq!(completion.balance, 0.0);
        assert!(db.list_transactions(user.id, 0, 10).unwrap().is_empty());
    }

    #[test]
    fn test_status_transitions_enforced() {
        let (db, user) = db_with_child();
        let quest = db
            .create_task(&NewTask::quest(user.id, "Learn to swim", 1000.0, Difficulty::Hard))
            .unwrap();

        let cancelled = db
            .update_task_status(quest.id, TaskStatus::Cancelled)
            .unwrap();
        assert_eq!(cancelled.status, TaskStatus::Cancelled);

        assert!(matches!(
            db.update_task_status(quest.id, TaskStatus::InProgress),
            Err(Error::InvalidTransition(_))
        ));
        assert!(matches!(
            db.update_task(quest.id, &TaskUpdate::default()),
            Err(Error::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_status_completed_goes_through_reward() {
        let (db, user) = db_with_child();
        let quest = db
            .create_task(&NewTask::quest(user.id, "Bake bread", 200.0, Difficulty::Medium))
            .unwrap();

        let task = db
            .update_task_status(quest.id, TaskStatus::Completed)
            .unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(db.get_balance(user.id).unwrap().current_amount, 200.0);
    }

    #[test]
    fn test_accept_quest_rules() {
        let (db, user) = db_with_child();
        let chore = db
            .create_task(&NewTask::regular(user.id, "Dishes", 10.0, TaskFrequency::Daily))
            .unwrap();
        assert!(matches!(
            db.accept_quest(chore.id),
            Err(Error::InvalidData(_))
        ));

        let quest = db
            .create_task(&NewTask::quest(user.id, "Kite", 50.0, Difficulty::Easy))
            .unwrap();
        db.accept_quest(quest.id).unwrap();
        assert!(matches!(
            db.accept_quest(quest.id),
            Err(Error::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_set_task_progress() {
        let (db, user) = db_with_child();
        let quest = db
            .create_task(&NewTask::quest(user.id, "Puzzle", 50.0, Difficulty::Easy))
            .unwrap();

        let task = db.set_task_progress(quest.id, 40).unwrap();
        assert_eq!(task.progress, 40);
        assert!(db.set_task_progress(quest.id, 101).is_err());

        let chore = db
            .create_task(&NewTask::regular(user.id, "Dishes", 10.0, TaskFrequency::Daily))
            .unwrap();
        assert!(db.set_task_progress(chore.id, 10).is_err());
    }

    #[test]
    fn test_deadline_round_trips() {
        let (db, user) = db_with_child();
        let deadline = chrono::NaiveDate::from_ymd_opt(2030, 8, 31)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
            .and_utc();
        let mut quest = NewTask::quest(user.id, "Summer reading", 500.0, Difficulty::Medium);
        quest.deadline = Some(deadline);

        let task = db.create_task(&quest).unwrap();
        assert_eq!(task.deadline, Some(deadline));
    }

    // ========== Wishlist ==========

    fn priorities(items: &[WishlistItem]) -> Vec<(String, i64)> {
        items
            .iter()
            .map(|i| (i.name.clone(), i.priority))
            .collect()
    }

    fn wishlist_with(db: &Database, user_id: i64, names: &[&str]) -> Vec<WishlistItem> {
        names
            .iter()
            .map(|name| {
                db.add_wishlist_item(user_id, &NewWishlistItem::new(name, 100.0))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_add_wishlist_items_appends() {
        let (db, user) = db_with_child();
        let items = wishlist_with(&db, user.id, &["Bike", "Game", "Book"]);
        assert_eq!(items[0].priority, 1);
        assert_eq!(items[2].priority, 3);

        // Priorities are per user
        let other = db.create_user("Sora", UserRole::Child).unwrap();
        let first = db
            .add_wishlist_item(other.id, &NewWishlistItem::new("Ball", 15.0))
            .unwrap();
        assert_eq!(first.priority, 1);
    }

    #[test]
    fn test_delete_wishlist_item_renumbers() {
        let (db, user) = db_with_child();
        let items = wishlist_with(&db, user.id, &["Bike", "Game", "Book"]);

        db.delete_wishlist_item(items[0].id).unwrap();

        let list = db.list_wishlist(user.id).unwrap();
        assert_eq!(
            priorities(&list),
            vec![("Game".to_string(), 1), ("Book".to_string(), 2)]
        );
    }

    #[test]
    fn test_move_wishlist_item() {
        let (db, user) = db_with_child();
        wishlist_with(&db, user.id, &["Bike", "Game", "Book", "Kite"]);

        let list = db.move_wishlist_item(user.id, 4, 2).unwrap();
        let names: Vec<&str> = list.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bike", "Kite", "Game", "Book"]);
        let prios: Vec<i64> = list.iter().map(|i| i.priority).collect();
        assert_eq!(prios, vec![1, 2, 3, 4]);

        assert!(matches!(
            db.move_wishlist_item(user.id, 1, 5),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_set_wishlist_order() {
        let (db, user) = db_with_child();
        let items = wishlist_with(&db, user.id, &["Bike", "Game", "Book"]);
        let ids = [items[2].id, items[0].id, items[1].id];

        let list = db.set_wishlist_order(user.id, &ids).unwrap();
        let names: Vec<&str> = list.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Book", "Bike", "Game"]);

        // Missing an id
        assert!(db
            .set_wishlist_order(user.id, &[items[0].id, items[1].id])
            .is_err());
        // Order unchanged after the failed attempt
        let names: Vec<String> = db
            .list_wishlist(user.id)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Book", "Bike", "Game"]);
    }

    #[test]
    fn test_update_wishlist_item() {
        let (db, user) = db_with_child();
        let item = db
            .add_wishlist_item(user.id, &NewWishlistItem::new("Bike", 12000.0))
            .unwrap();

        let target = chrono::NaiveDate::from_ymd_opt(2026, 12, 24).unwrap();
        let updated = db
            .update_wishlist_item(
                item.id,
                &WishlistItemUpdate {
                    price: Some(11000.0),
                    target_date: Some(target),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price, 11000.0);
        assert_eq!(updated.target_date, Some(target));
        assert_eq!(updated.name, "Bike");

        assert!(matches!(
            db.update_wishlist_item(9999, &WishlistItemUpdate::default()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_wishlist_progress() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 500.0, None).unwrap();
        db.add_wishlist_item(user.id, &NewWishlistItem::new("Book", 400.0))
            .unwrap();
        db.add_wishlist_item(user.id, &NewWishlistItem::new("Bike", 2000.0))
            .unwrap();

        let progress = db.wishlist_progress(user.id, 100.0, 0.0).unwrap();
        assert_eq!(progress.len(), 2);

        assert_eq!(progress[0].progress_percent, 100.0);
        assert_eq!(progress[0].remaining, 0.0);
        assert_eq!(progress[0].months_to_afford, Some(0));

        assert_eq!(progress[1].progress_percent, 25.0);
        assert_eq!(progress[1].remaining, 1500.0);
        assert_eq!(progress[1].months_to_afford, Some(15));
    }

    #[test]
    fn test_wishlist_progress_unreachable() {
        let (db, user) = db_with_child();
        db.add_wishlist_item(user.id, &NewWishlistItem::new("Car", 10000.0))
            .unwrap();

        let progress = db.wishlist_progress(user.id, 0.0, 0.0).unwrap();
        assert_eq!(progress[0].months_to_afford, None);

        assert!(db.wishlist_progress(user.id, -1.0, 0.0).is_err());
        assert!(db.wishlist_progress(user.id, 10.0, 150.0).is_err());
    }

    // ========== Audit and stats ==========

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        db.log_audit("api-key", "create", Some("task"), Some(1), None)
            .unwrap();
        db.log_audit("api-key", "deposit", Some("balance"), Some(2), Some("amount=10"))
            .unwrap();

        let all = db.list_audit_log(10, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].action, "deposit");

        let tasks = db.list_audit_log(10, Some("task")).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].entity_id, Some(1));
    }

    #[test]
    fn test_stats() {
        let (db, user) = db_with_child();
        db.deposit(user.id, 75.0, None).unwrap();
        db.create_task(&NewTask::regular(user.id, "Dishes", 5.0, TaskFrequency::Daily))
            .unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.users, 1);
        assert_eq!(stats.transactions, 1);
        assert_eq!(stats.open_tasks, 1);
        assert_eq!(stats.wishlist_items, 0);
        assert_eq!(stats.total_balance, 75.0);
    }

    #[test]
    fn test_encrypted_database_reopens_with_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("family.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new_with_key(path, Some("correct horse")).unwrap();
            db.create_user("Hana", UserRole::Child).unwrap();
        }

        let db = Database::new_with_key(path, Some("correct horse")).unwrap();
        assert_eq!(db.list_users().unwrap().len(), 1);
    }
}
