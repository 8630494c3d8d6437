use engine::{
    ChangeAction, ChangedEntity, EngineError, ErrorKind, MoneyCents, NewTransaction,
    TransactionFilter, TransactionKind, TransactionPatch, aggregation::summarize,
};

mod common;
use common::{USER, date, engine, expense, flaky_engine, income, salary_category};

#[tokio::test]
async fn january_example_balance() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    engine
        .create_transaction(USER, &income(1000, "2024-01-05", &c1))
        .await
        .unwrap();
    engine
        .create_transaction(USER, &expense(300, "2024-01-10", &c1))
        .await
        .unwrap();

    let transactions = engine.list_transactions(USER).await.unwrap();
    let summary = summarize(&transactions);
    assert_eq!(summary.balance, MoneyCents::from_units(700));
    assert_eq!(summary.income_total, MoneyCents::from_units(1000));
    assert_eq!(summary.expense_total, MoneyCents::from_units(300));
    assert_eq!(summary.transaction_count, 2);

    let february = engine
        .filter_transactions(USER, &TransactionFilter::default().start_date(date("2024-02-01")))
        .await
        .unwrap();
    assert!(february.is_empty());
}

#[tokio::test]
async fn list_is_newest_first() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    for day in ["2024-01-10", "2024-03-01", "2024-02-14"] {
        engine
            .create_transaction(USER, &expense(5, day, &c1))
            .await
            .unwrap();
    }

    let dates: Vec<_> = engine
        .list_transactions(USER)
        .await
        .unwrap()
        .iter()
        .map(|tx| tx.date)
        .collect();
    assert_eq!(
        dates,
        vec![date("2024-03-01"), date("2024-02-14"), date("2024-01-10")]
    );
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let engine = engine();
    let err = engine
        .create_transaction(USER, &income(10, "2024-01-05", "nope"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("category".to_string()));
}

#[tokio::test]
async fn other_users_category_is_not_found() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    let err = engine
        .create_transaction("bob", &income(10, "2024-01-05", &c1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn validation_happens_before_store_access() {
    let (engine, store) = flaky_engine();
    store.fail_reads(true);

    let future = income(10, "2024-03-16", "c1");
    let err = engine.create_transaction(USER, &future).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("date cannot be in the future".to_string())
    );

    let zero = NewTransaction::new(
        TransactionKind::Expense,
        MoneyCents::ZERO,
        "2024-03-01",
        "c1",
        "Nothing",
    );
    let err = engine.create_transaction(USER, &zero).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("amount must be greater than zero".to_string())
    );
}

#[tokio::test]
async fn filters_by_category_and_kind() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    let c2 = engine
        .create_category(
            USER,
            &engine::NewCategory::new("Mercado", "Supermarket", "#ff5722"),
        )
        .await
        .unwrap();
    engine
        .create_transaction(USER, &income(1000, "2024-01-05", &c1))
        .await
        .unwrap();
    engine
        .create_transaction(USER, &expense(80, "2024-01-07", &c2))
        .await
        .unwrap();
    engine
        .create_transaction(USER, &expense(20, "2024-02-07", &c2))
        .await
        .unwrap();

    let by_category = engine
        .list_transactions_by_category(USER, &c2)
        .await
        .unwrap();
    assert_eq!(by_category.len(), 2);

    let incomes = engine
        .list_transactions_by_kind(USER, TransactionKind::Income)
        .await
        .unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].category_id, c1);

    let january_expenses = engine
        .filter_transactions(
            USER,
            &TransactionFilter::default()
                .kind(TransactionKind::Expense)
                .start_date(date("2024-01-01"))
                .end_date(date("2024-01-31")),
        )
        .await
        .unwrap();
    assert_eq!(january_expenses.len(), 1);
    assert_eq!(january_expenses[0].amount, MoneyCents::from_units(80));
}

#[tokio::test]
async fn update_changes_only_patched_fields() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    let id = engine
        .create_transaction(
            USER,
            &expense(50, "2024-03-01", &c1).payment_method("pix"),
        )
        .await
        .unwrap();

    engine
        .update_transaction(
            USER,
            &id,
            &TransactionPatch::default()
                .amount(MoneyCents::from_units(65))
                .description("Weekly groceries"),
        )
        .await
        .unwrap();

    let tx = engine.transaction(USER, &id).await.unwrap();
    assert_eq!(tx.amount, MoneyCents::from_units(65));
    assert_eq!(tx.description, "Weekly groceries");
    assert_eq!(tx.payment_method, "pix");
    assert_eq!(tx.date, date("2024-03-01"));
    assert_eq!(tx.kind, TransactionKind::Expense);
}

#[tokio::test]
async fn update_validates_patch_and_category() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    let id = engine
        .create_transaction(USER, &expense(50, "2024-03-01", &c1))
        .await
        .unwrap();

    let err = engine
        .update_transaction(USER, &id, &TransactionPatch::default().description("ab"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = engine
        .update_transaction(USER, &id, &TransactionPatch::default().category_id("gone"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("category".to_string()));

    let err = engine
        .update_transaction(USER, "gone", &TransactionPatch::default().description("Valid"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction".to_string()));
}

#[tokio::test]
async fn turning_recurrence_off_clears_months() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    let id = engine
        .create_transaction(USER, &income(1000, "2024-01-05", &c1).recurring(Some(12)))
        .await
        .unwrap();
    let tx = engine.transaction(USER, &id).await.unwrap();
    assert!(tx.recurring);
    assert_eq!(tx.recurrence_months, Some(12));

    engine
        .update_transaction(USER, &id, &TransactionPatch::default().recurrence_months(6))
        .await
        .unwrap();
    assert_eq!(
        engine.transaction(USER, &id).await.unwrap().recurrence_months,
        Some(6)
    );

    engine
        .update_transaction(USER, &id, &TransactionPatch::default().recurring(false))
        .await
        .unwrap();
    let tx = engine.transaction(USER, &id).await.unwrap();
    assert!(!tx.recurring);
    assert_eq!(tx.recurrence_months, None);
}

#[tokio::test]
async fn recurrence_months_on_one_off_transaction_are_rejected() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    let id = engine
        .create_transaction(USER, &expense(40, "2024-03-10", &c1))
        .await
        .unwrap();
    let expected =
        EngineError::Validation("recurrence months require a recurring transaction".to_string());

    let err = engine
        .update_transaction(USER, &id, &TransactionPatch::default().recurrence_months(6))
        .await
        .unwrap_err();
    assert_eq!(err, expected);

    let err = engine
        .update_transaction(
            USER,
            &id,
            &TransactionPatch::default()
                .description("Market")
                .recurring(false)
                .recurrence_months(3),
        )
        .await
        .unwrap_err();
    assert_eq!(err, expected);
    // Nothing of the rejected patch was written.
    assert_eq!(
        engine.transaction(USER, &id).await.unwrap().description,
        "Groceries"
    );

    // Turning recurrence on in the same patch is fine.
    engine
        .update_transaction(
            USER,
            &id,
            &TransactionPatch::default()
                .recurring(true)
                .recurrence_months(3),
        )
        .await
        .unwrap();
    let tx = engine.transaction(USER, &id).await.unwrap();
    assert!(tx.recurring);
    assert_eq!(tx.recurrence_months, Some(3));
}

#[tokio::test]
async fn delete_removes_transaction_and_frees_category() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    let id = engine
        .create_transaction(USER, &expense(50, "2024-03-01", &c1))
        .await
        .unwrap();
    assert!(engine.has_transactions(USER, &c1).await.unwrap());

    let mut events = engine.subscribe();
    engine.delete_transaction(USER, &id).await.unwrap();
    let event = events.try_recv().unwrap();
    assert_eq!(event.entity, ChangedEntity::Transaction);
    assert_eq!(event.action, ChangeAction::Deleted);
    assert_eq!(event.id, id);

    assert!(engine.list_transactions(USER).await.unwrap().is_empty());
    assert!(!engine.has_transactions(USER, &c1).await.unwrap());
    engine.delete_category(USER, &c1).await.unwrap();

    let err = engine.delete_transaction(USER, &id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn recent_transactions_are_limited() {
    let engine = engine();
    let c1 = salary_category(&engine).await;
    for day in 1..=12 {
        engine
            .create_transaction(USER, &expense(day, &format!("2024-02-{day:02}"), &c1))
            .await
            .unwrap();
    }

    let recent = engine.recent_transactions(USER, 10).await.unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].date, date("2024-02-12"));
    assert_eq!(recent[9].date, date("2024-02-03"));
}
