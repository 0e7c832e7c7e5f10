use crate::common::*;

use behavior_groups::{
    db,
    dtos::{NewBehaviorGroupDto, UpdateBehaviorGroupDto},
    error::BehaviorGroupError,
    models::EndpointType,
};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

#[tokio::test]
async fn test_create_update_and_delete_behavior_group() {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let bundle = create_bundle(&mut conn).await;
    let created = create_behavior_group(&mut conn, DEFAULT_ACCOUNT_ID, "displayName", bundle.id).await;
    assert_eq!(created.display_name, "displayName");
    assert_eq!(created.account_id, DEFAULT_ACCOUNT_ID);

    let groups = db::find_behavior_groups_by_bundle_id(&mut conn, DEFAULT_ACCOUNT_ID, bundle.id)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, created.id);
    assert_eq!(groups[0].display_name, "displayName");
    assert_eq!(groups[0].bundle_id, bundle.id);
    assert_eq!(groups[0].created_at, created.created_at);
    assert!(groups[0].actions.is_empty());

    // the bundle id of the payload must not be written
    let updated = db::update_behavior_group(
        &mut conn,
        DEFAULT_ACCOUNT_ID,
        UpdateBehaviorGroupDto {
            id: created.id,
            display_name: Some("newDisplayName".to_string()),
            bundle_id: Some(Uuid::new_v4()),
        },
    )
    .await
    .unwrap();
    assert!(updated);

    let groups = db::find_behavior_groups_by_bundle_id(&mut conn, DEFAULT_ACCOUNT_ID, bundle.id)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, created.id);
    assert_eq!(groups[0].display_name, "newDisplayName");
    assert_eq!(groups[0].bundle_id, bundle.id);

    let deleted = db::delete_behavior_group(&mut conn, DEFAULT_ACCOUNT_ID, created.id)
        .await
        .unwrap();
    assert!(deleted);

    let groups = db::find_behavior_groups_by_bundle_id(&mut conn, DEFAULT_ACCOUNT_ID, bundle.id)
        .await
        .unwrap();
    assert!(groups.is_empty());
}

async fn assert_illegal_display_name(display_name: Option<&str>) {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();
    let bundle = create_bundle(&mut conn).await;

    let err = db::create_behavior_group(
        &mut conn,
        DEFAULT_ACCOUNT_ID,
        NewBehaviorGroupDto {
            display_name: display_name.map(str::to_string),
            bundle_id: Some(bundle.id),
        },
    )
    .await
    .unwrap_err();
    assert!(
        err.violates("display_name"),
        "expected a display_name violation, got {}",
        err
    );

    let groups = db::find_behavior_groups_by_bundle_id(&mut conn, DEFAULT_ACCOUNT_ID, bundle.id)
        .await
        .unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn test_create_behavior_group_with_null_display_name() {
    assert_illegal_display_name(None).await;
}

#[tokio::test]
async fn test_create_behavior_group_with_empty_display_name() {
    assert_illegal_display_name(Some("")).await;
}

#[tokio::test]
async fn test_create_behavior_group_with_blank_display_name() {
    assert_illegal_display_name(Some(" ")).await;
}

#[tokio::test]
async fn test_create_behavior_group_with_too_long_display_name() {
    assert_illegal_display_name(Some(&"x".repeat(256))).await;
}

async fn assert_bundle_not_found(bundle_id: Option<Uuid>) {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let err = db::create_behavior_group(
        &mut conn,
        DEFAULT_ACCOUNT_ID,
        NewBehaviorGroupDto {
            display_name: Some("displayName".to_string()),
            bundle_id,
        },
    )
    .await
    .unwrap_err();
    match err {
        BehaviorGroupError::NotFound { message } => assert_eq!(message, "bundle_id not found"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_behavior_group_with_null_bundle_id() {
    assert_bundle_not_found(None).await;
}

#[tokio::test]
async fn test_create_behavior_group_with_unknown_bundle_id() {
    assert_bundle_not_found(Some(Uuid::new_v4())).await;
}

#[tokio::test]
async fn test_find_by_bundle_id_ordering() {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let bundle = create_bundle(&mut conn).await;
    let mut created = Vec::new();
    for _ in 0..3 {
        created.push(create_behavior_group(&mut conn, DEFAULT_ACCOUNT_ID, "displayName", bundle.id).await);
    }

    let groups = db::find_behavior_groups_by_bundle_id(&mut conn, DEFAULT_ACCOUNT_ID, bundle.id)
        .await
        .unwrap();
    let ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![created[2].id, created[1].id, created[0].id]);
}

#[tokio::test]
async fn test_find_by_bundle_id_is_tenant_scoped() {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let bundle = create_bundle(&mut conn).await;
    let mine = create_behavior_group(&mut conn, DEFAULT_ACCOUNT_ID, "mine", bundle.id).await;
    create_behavior_group(&mut conn, OTHER_ACCOUNT_ID, "theirs", bundle.id).await;

    let groups = db::find_behavior_groups_by_bundle_id(&mut conn, DEFAULT_ACCOUNT_ID, bundle.id)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, mine.id);

    let found = db::find_behavior_group_by_id(&mut conn, OTHER_ACCOUNT_ID, mine.id)
        .await
        .unwrap();
    assert!(found.is_none());
    let found = db::find_behavior_group_by_id(&mut conn, DEFAULT_ACCOUNT_ID, mine.id)
        .await
        .unwrap();
    assert_eq!(found.map(|g| g.display_name), Some("mine".to_string()));
}

#[tokio::test]
async fn test_update_and_delete_unknown_or_foreign_behavior_group() {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let bundle = create_bundle(&mut conn).await;
    let group = create_behavior_group(&mut conn, DEFAULT_ACCOUNT_ID, "displayName", bundle.id).await;

    let updated = db::update_behavior_group(
        &mut conn,
        OTHER_ACCOUNT_ID,
        UpdateBehaviorGroupDto {
            id: group.id,
            display_name: Some("hijacked".to_string()),
            bundle_id: None,
        },
    )
    .await
    .unwrap();
    assert!(!updated);

    assert!(
        !db::delete_behavior_group(&mut conn, DEFAULT_ACCOUNT_ID, Uuid::new_v4())
            .await
            .unwrap()
    );
    assert!(
        !db::delete_behavior_group(&mut conn, OTHER_ACCOUNT_ID, group.id)
            .await
            .unwrap()
    );

    let found = db::find_behavior_group_by_id(&mut conn, DEFAULT_ACCOUNT_ID, group.id)
        .await
        .unwrap()
        .expect("behavior group should still exist");
    assert_eq!(found.display_name, "displayName");
}

#[tokio::test]
async fn test_update_with_blank_display_name_is_rejected() {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let bundle = create_bundle(&mut conn).await;
    let group = create_behavior_group(&mut conn, DEFAULT_ACCOUNT_ID, "displayName", bundle.id).await;

    let err = db::update_behavior_group(
        &mut conn,
        DEFAULT_ACCOUNT_ID,
        UpdateBehaviorGroupDto {
            id: group.id,
            display_name: Some("   ".to_string()),
            bundle_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(err.violates("display_name"));
}

#[tokio::test]
async fn test_catalog_lookups() {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let (bundle, event_type) = create_event_type_chain(&mut conn).await;
    let endpoint = create_endpoint(&mut conn, DEFAULT_ACCOUNT_ID, EndpointType::EmailSubscription).await;

    let found = db::find_bundle_by_id(&mut conn, bundle.id).await.unwrap();
    assert_eq!(found, Some(bundle));
    assert!(db::find_bundle_by_id(&mut conn, Uuid::new_v4()).await.unwrap().is_none());

    let found = db::find_event_type_by_id(&mut conn, event_type.id).await.unwrap();
    assert_eq!(found, Some(event_type));

    let found = db::find_endpoint_by_id(&mut conn, DEFAULT_ACCOUNT_ID, endpoint.id)
        .await
        .unwrap()
        .expect("endpoint should be visible to its owner");
    assert_eq!(found.endpoint_type, EndpointType::EmailSubscription);
    assert!(found.enabled);
    assert!(
        db::find_endpoint_by_id(&mut conn, OTHER_ACCOUNT_ID, endpoint.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_groups_created_at_same_instant_have_stable_order() {
    let app = setup_test_db().await;
    let mut conn = app.pool.get().await.unwrap();

    let (bundle, event_type) = create_event_type_chain(&mut conn).await;
    let mut ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let rows: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                "('{}', '{}', '{}', 'same instant', '2024-05-02 10:00:00+00')",
                id, DEFAULT_ACCOUNT_ID, bundle.id
            )
        })
        .collect();
    diesel::sql_query(format!(
        "INSERT INTO behavior_group (id, account_id, bundle_id, display_name, created_at) VALUES {}",
        rows.join(", ")
    ))
    .execute(&mut conn)
    .await
    .unwrap();
    ids.sort();
    ids.reverse();

    for _ in 0..3 {
        let listed: Vec<Uuid> =
            db::find_behavior_groups_by_bundle_id(&mut conn, DEFAULT_ACCOUNT_ID, bundle.id)
                .await
                .unwrap()
                .iter()
                .map(|g| g.id)
                .collect();
        assert_eq!(listed, ids);
    }

    update_and_check_event_type_behaviors(&mut conn, DEFAULT_ACCOUNT_ID, event_type.id, true, &ids).await;
    let linked: Vec<Uuid> = db::find_behavior_groups_by_event_type_id(&mut conn, event_type.id)
        .await
        .unwrap()
        .iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(linked, ids);
}
