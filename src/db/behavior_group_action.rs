use crate::{
    Conn,
    models::BehaviorGroupAction,
    reconcile::{UnknownEndpoints, plan_actions},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use super::{
    DbError, UpdateStatus, find_owned_endpoints, lock_owned_behavior_group, run_in_transaction,
};

/// Replace the ordered actions of a behavior group with `endpoint_ids`.
///
/// The group row stays locked for the whole transaction, so two replacements of
/// the same group never interleave. Either every row is rewritten or nothing
/// changes: an unknown group or endpoint yields `UpdateStatus::NotFound` before
/// any write. Position `i` of the stored list is the `i`-th requested endpoint,
/// after duplicates of non email-subscription endpoints collapse to their last
/// occurrence.
#[tracing::instrument(name = "update_behavior_group_actions", level = "debug", skip(conn, endpoint_ids), fields(requested = endpoint_ids.len()))]
pub async fn update_behavior_group_actions<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    behavior_group_id: Uuid,
    endpoint_ids: &[Uuid],
) -> Result<UpdateStatus, DbError> {
    let account = account.to_string();
    let target = endpoint_ids.to_vec();

    run_in_transaction(conn, |conn| {
        async move {
            use crate::schema::behavior_group_action::dsl;

            let Some(group) = lock_owned_behavior_group(conn, &account, behavior_group_id).await?
            else {
                log::debug!("Behavior group {} not found", behavior_group_id);
                return Ok(UpdateStatus::NotFound);
            };

            let endpoint_types = find_owned_endpoints(conn, &account, &target).await?;

            let current = dsl::behavior_group_action
                .filter(dsl::behavior_group_id.eq(group.id))
                .select(BehaviorGroupAction::as_select())
                .load::<BehaviorGroupAction>(&mut *conn)
                .await?;

            let plan = match plan_actions(group.id, &current, &target, &endpoint_types) {
                Ok(plan) => plan,
                Err(UnknownEndpoints(missing)) => {
                    log::warn!(
                        "Rejected actions of behavior group {}: {} endpoints not found",
                        group.id,
                        missing.len()
                    );
                    return Ok(UpdateStatus::NotFound);
                }
            };
            if plan.is_empty() {
                return Ok(UpdateStatus::Ok);
            }

            if !plan.to_delete.is_empty() {
                diesel::delete(dsl::behavior_group_action.filter(dsl::id.eq_any(&plan.to_delete)))
                    .execute(&mut *conn)
                    .await?;
            }
            if !plan.to_insert.is_empty() {
                diesel::insert_into(dsl::behavior_group_action)
                    .values(&plan.to_insert)
                    .execute(&mut *conn)
                    .await?;
            }

            log::debug!(
                "Behavior group {}: replaced {} actions with {}",
                group.id,
                plan.to_delete.len(),
                plan.to_insert.len()
            );
            Ok(UpdateStatus::Ok)
        }
        .scope_boxed()
    })
    .await
}
