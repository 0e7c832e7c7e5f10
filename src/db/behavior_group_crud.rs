use crate::{
    Conn,
    dtos::{BehaviorGroupDto, NewBehaviorGroupDto, UpdateBehaviorGroupDto},
    models::{BehaviorGroup, BehaviorGroupAction, NewBehaviorGroup},
    validation::validate_display_name,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use super::{DbError, run_in_transaction};

const BUNDLE_NOT_FOUND: &str = "bundle_id not found";

/// Create a behavior group for `account` in the requested bundle.
///
/// The display name is validated first; then the bundle is resolved under a key
/// share lock so it cannot disappear before the insert commits. A missing and an
/// unknown bundle id both fail with `NotFound("bundle_id not found")`.
#[tracing::instrument(name = "create_behavior_group", level = "debug", skip(conn, dto))]
pub async fn create_behavior_group<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    dto: NewBehaviorGroupDto,
) -> Result<BehaviorGroup, DbError> {
    let name = validate_display_name(dto.display_name.as_deref())?.to_string();
    let Some(requested_bundle) = dto.bundle_id else {
        return Err(DbError::not_found(BUNDLE_NOT_FOUND));
    };
    let account = account.to_string();

    let created = run_in_transaction(conn, |conn| {
        async move {
            use crate::schema::{behavior_group, bundles};

            let bundle = bundles::table
                .filter(bundles::id.eq(requested_bundle))
                .select(bundles::id)
                .for_key_share()
                .first::<Uuid>(&mut *conn)
                .await
                .optional()?;
            if bundle.is_none() {
                return Err(DbError::not_found(BUNDLE_NOT_FOUND));
            }

            let group = diesel::insert_into(behavior_group::table)
                .values(NewBehaviorGroup {
                    account_id: &account,
                    bundle_id: requested_bundle,
                    display_name: &name,
                })
                .returning(BehaviorGroup::as_returning())
                .get_result(&mut *conn)
                .await?;
            Ok(group)
        }
        .scope_boxed()
    })
    .await?;

    log::debug!(
        "Created behavior group {} in bundle {}",
        created.id,
        created.bundle_id
    );
    Ok(created)
}

/// Rename a behavior group owned by `account`.
///
/// Only `display_name` is written; the bundle of a behavior group is fixed at
/// creation. Returns `false` when no such group exists for this account.
#[tracing::instrument(name = "update_behavior_group", level = "debug", skip(conn, dto))]
pub async fn update_behavior_group<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    dto: UpdateBehaviorGroupDto,
) -> Result<bool, DbError> {
    use crate::schema::behavior_group::dsl::*;

    let name = validate_display_name(dto.display_name.as_deref())?;
    if dto.bundle_id.is_some() {
        log::debug!("Ignoring bundle_id on update of behavior group {}", dto.id);
    }

    let updated = diesel::update(behavior_group.filter(id.eq(dto.id).and(account_id.eq(account))))
        .set(display_name.eq(name))
        .execute(conn)
        .await?;
    Ok(updated == 1)
}

/// Delete a behavior group owned by `account`.
///
/// Event type memberships and actions go with it (`ON DELETE CASCADE`).
#[tracing::instrument(name = "delete_behavior_group", level = "debug", skip(conn))]
pub async fn delete_behavior_group<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    group_id: Uuid,
) -> Result<bool, DbError> {
    use crate::schema::behavior_group::dsl::*;

    let deleted = diesel::delete(behavior_group.filter(id.eq(group_id).and(account_id.eq(account))))
        .execute(conn)
        .await?;
    if deleted == 1 {
        log::info!("Deleted behavior group {}", group_id);
    }
    Ok(deleted == 1)
}

/// Attach the actions of each group, sorted by position.
async fn with_actions<'a>(
    conn: &mut Conn<'a>,
    groups: Vec<BehaviorGroup>,
) -> Result<Vec<BehaviorGroupDto>, DbError> {
    use crate::schema::behavior_group_action;

    if groups.is_empty() {
        return Ok(vec![]);
    }
    let actions = BehaviorGroupAction::belonging_to(&groups)
        .select(BehaviorGroupAction::as_select())
        .order(behavior_group_action::position.asc())
        .load::<BehaviorGroupAction>(conn)
        .await?;
    let grouped = actions.grouped_by(&groups);

    Ok(groups
        .into_iter()
        .zip(grouped)
        .map(|(group, actions)| BehaviorGroupDto::new(group, actions))
        .collect())
}

/// List the behavior groups of `account` in a bundle, most recently created first.
pub async fn find_behavior_groups_by_bundle_id<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    bundle: Uuid,
) -> Result<Vec<BehaviorGroupDto>, DbError> {
    use crate::schema::behavior_group::dsl::*;

    let groups = behavior_group
        .filter(account_id.eq(account).and(bundle_id.eq(bundle)))
        .order(created_at.desc())
        .then_order_by(id.desc())
        .select(BehaviorGroup::as_select())
        .load::<BehaviorGroup>(&mut *conn)
        .await?;
    with_actions(conn, groups).await
}

pub async fn find_behavior_group_by_id<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    group_id: Uuid,
) -> Result<Option<BehaviorGroupDto>, DbError> {
    use crate::schema::behavior_group::dsl::*;

    let group = behavior_group
        .filter(id.eq(group_id).and(account_id.eq(account)))
        .select(BehaviorGroup::as_select())
        .first::<BehaviorGroup>(&mut *conn)
        .await
        .optional()?;

    match group {
        Some(g) => Ok(with_actions(conn, vec![g]).await?.pop()),
        None => Ok(None),
    }
}
