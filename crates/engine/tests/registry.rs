use engine::{
    BootstrapOutcome, CategoryPatch, ChangeAction, ChangeEvent, ChangedEntity, DEFAULT_CATEGORIES,
    EngineError, ErrorKind, MoneyCents, NewCategory, STORE_FAILURE_MESSAGE,
};

mod common;
use common::{USER, engine, expense, flaky_engine, salary_category};

#[tokio::test]
async fn create_and_list_categories_sorted_by_name() {
    let engine = engine();
    engine
        .create_category(USER, &NewCategory::new("Transporte", "Bus and fuel", "#2196f3"))
        .await
        .unwrap();
    engine
        .create_category(USER, &NewCategory::new("  alimentação  ", "Food", "#ff9800"))
        .await
        .unwrap();

    let names: Vec<_> = engine
        .list_categories(USER)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["alimentação", "Transporte"]);
}

#[tokio::test]
async fn categories_are_scoped_per_user() {
    let engine = engine();
    salary_category(&engine).await;

    assert!(engine.list_categories("bob").await.unwrap().is_empty());
    // Same name for another user is fine.
    engine
        .create_category("bob", &NewCategory::new("Salário", "Monthly pay", "#4caf50"))
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_name_ignores_case() {
    let engine = engine();
    salary_category(&engine).await;

    let err = engine
        .create_category(USER, &NewCategory::new("SALÁRIO", "Again", "#4caf50"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::DuplicateName("SALÁRIO".to_string()));
}

#[tokio::test]
async fn invalid_category_is_rejected_before_any_write() {
    let (engine, store) = flaky_engine();
    // Validation runs first: a broken store is never reached.
    store.fail_reads(true);
    store.fail_writes(true);

    let err = engine
        .create_category(USER, &NewCategory::new("X", "Too short", "#fff"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("name must be between 2 and 30 characters".to_string())
    );

    let err = engine
        .create_category(USER, &NewCategory::new("Travel", "Trips", "blue"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn update_category_renames_and_sets_limit() {
    let engine = engine();
    let id = salary_category(&engine).await;
    let other = engine
        .create_category(USER, &NewCategory::new("Freelance", "Side jobs", "#8bc34a"))
        .await
        .unwrap();

    engine
        .update_category(
            USER,
            &id,
            &CategoryPatch::default()
                .name("Salary")
                .spending_limit(MoneyCents::from_units(500)),
        )
        .await
        .unwrap();
    let category = engine.category(USER, &id).await.unwrap();
    assert_eq!(category.name, "Salary");
    assert_eq!(category.description, "Monthly pay");
    assert_eq!(category.spending_limit, Some(MoneyCents::from_units(500)));

    // Renaming onto another category's name is rejected, onto itself is not.
    let err = engine
        .update_category(USER, &other, &CategoryPatch::default().name("salary"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateName);
    engine
        .update_category(USER, &id, &CategoryPatch::default().name("SALARY"))
        .await
        .unwrap();
}

#[tokio::test]
async fn spending_limit_can_be_removed() {
    let engine = engine();
    let id = engine
        .create_category(
            USER,
            &NewCategory::new("Lazer", "Going out", "#9c27b0")
                .spending_limit(MoneyCents::from_units(100)),
        )
        .await
        .unwrap();
    assert_eq!(
        engine.category(USER, &id).await.unwrap().spending_limit,
        Some(MoneyCents::from_units(100))
    );

    engine
        .update_category(USER, &id, &CategoryPatch::default().clear_spending_limit())
        .await
        .unwrap();
    let category = engine.category(USER, &id).await.unwrap();
    assert_eq!(category.spending_limit, None);
    assert_eq!(category.name, "Lazer");

    // A JSON `null` from a form means the same.
    engine
        .update_category(
            USER,
            &id,
            &CategoryPatch::default().spending_limit(MoneyCents::from_units(40)),
        )
        .await
        .unwrap();
    let patch: CategoryPatch =
        serde_json::from_value(serde_json::json!({ "spendingLimit": null })).unwrap();
    engine.update_category(USER, &id, &patch).await.unwrap();
    assert_eq!(engine.category(USER, &id).await.unwrap().spending_limit, None);
}

#[tokio::test]
async fn update_unknown_category_is_not_found() {
    let engine = engine();
    let err = engine
        .update_category(USER, "missing", &CategoryPatch::default().color("#000"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("category".to_string()));
}

#[tokio::test]
async fn delete_referenced_category_fails() {
    let engine = engine();
    let id = salary_category(&engine).await;
    engine
        .create_transaction(USER, &expense(10, "2024-03-01", &id))
        .await
        .unwrap();

    let err = engine.delete_category(USER, &id).await.unwrap_err();
    assert_eq!(err, EngineError::CategoryInUse("Salário".to_string()));
    assert_eq!(engine.list_categories(USER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_unreferenced_category_succeeds() {
    let engine = engine();
    let id = salary_category(&engine).await;

    engine.delete_category(USER, &id).await.unwrap();
    assert!(engine.list_categories(USER).await.unwrap().is_empty());

    let err = engine.delete_category(USER, &id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn bootstrap_creates_defaults_once() {
    let engine = engine();

    let outcome = engine.bootstrap_default_categories(USER).await.unwrap();
    assert_eq!(
        outcome,
        BootstrapOutcome::Created {
            created: 14,
            failed: 0
        }
    );
    assert_eq!(outcome.message(), "created 14 default categories");
    let categories = engine.list_categories(USER).await.unwrap();
    assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
    assert!(categories.iter().any(|c| c.name == "Outras Despesas"));

    let again = engine.bootstrap_default_categories(USER).await.unwrap();
    assert_eq!(again, BootstrapOutcome::AlreadyBootstrapped { existing: 14 });
    assert_eq!(again.message(), "user already has categories");
    assert_eq!(engine.list_categories(USER).await.unwrap().len(), 14);
}

#[tokio::test]
async fn bootstrap_counts_partial_failures() {
    let (engine, store) = flaky_engine();
    store.fail_every_nth_put(3);

    let outcome = engine.bootstrap_default_categories(USER).await.unwrap();
    assert_eq!(
        outcome,
        BootstrapOutcome::Created {
            created: 10,
            failed: 4
        }
    );
    assert_eq!(outcome.created(), 10);
    assert_eq!(
        outcome.message(),
        "created 10 default categories (4 failed)"
    );
    assert_eq!(engine.list_categories(USER).await.unwrap().len(), 10);

    // The user now owns categories, so a retry writes nothing.
    store.fail_every_nth_put(0);
    assert_eq!(
        engine.bootstrap_default_categories(USER).await.unwrap(),
        BootstrapOutcome::AlreadyBootstrapped { existing: 10 }
    );
}

#[tokio::test]
async fn bootstrap_fails_when_nothing_could_be_created() {
    let (engine, store) = flaky_engine();
    store.fail_writes(true);

    let err = engine.bootstrap_default_categories(USER).await.unwrap_err();
    assert_eq!(err, EngineError::Store(STORE_FAILURE_MESSAGE.to_string()));
}

#[tokio::test]
async fn store_failures_are_masked() {
    let (engine, store) = flaky_engine();
    store.fail_reads(true);

    let err = engine.list_categories(USER).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    assert!(!err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn empty_user_is_unauthenticated() {
    let engine = engine();
    assert_eq!(
        engine.list_categories("  ").await.unwrap_err(),
        EngineError::Unauthenticated
    );
}

#[tokio::test]
async fn writes_publish_change_events() {
    let engine = engine();
    let mut events = engine.subscribe();

    let id = salary_category(&engine).await;
    engine
        .update_category(USER, &id, &CategoryPatch::default().color("#111111"))
        .await
        .unwrap();
    engine.delete_category(USER, &id).await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    let expected = [
        ChangeAction::Created,
        ChangeAction::Updated,
        ChangeAction::Deleted,
    ]
    .map(|action| ChangeEvent {
        user_id: USER.to_string(),
        entity: ChangedEntity::Category,
        action,
        id: id.clone(),
    });
    assert_eq!(seen, expected);
}
