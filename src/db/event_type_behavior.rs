use crate::{Conn, models::NewEventTypeBehavior, reconcile::diff_memberships};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use std::collections::HashSet;
use uuid::Uuid;

use super::{DbError, find_owned_behavior_group_ids, run_in_transaction};

/// Make the behavior groups of `account` linked to an event type exactly
/// `behavior_group_ids`.
///
/// Returns `false` without writing anything when the event type is unknown or
/// when any requested group is unknown or owned by another account. Links that
/// other accounts hold on the same event type are left alone.
#[tracing::instrument(name = "update_event_type_behaviors", level = "debug", skip(conn, behavior_group_ids), fields(requested = behavior_group_ids.len()))]
pub async fn update_event_type_behaviors<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    event_type_id: Uuid,
    behavior_group_ids: &HashSet<Uuid>,
) -> Result<bool, DbError> {
    let account = account.to_string();
    let target = behavior_group_ids.clone();

    run_in_transaction(conn, |conn| {
        async move {
            use crate::schema::{behavior_group, event_type, event_type_behavior};

            // serializes reconciliations of the same event type
            let locked = event_type::table
                .filter(event_type::id.eq(event_type_id))
                .select(event_type::id)
                .for_update()
                .first::<Uuid>(&mut *conn)
                .await
                .optional()?;
            if locked.is_none() {
                log::debug!("Event type {} not found", event_type_id);
                return Ok(false);
            }

            let requested: Vec<Uuid> = target.iter().copied().collect();
            let owned = find_owned_behavior_group_ids(conn, &account, &requested).await?;
            if owned.len() != target.len() {
                log::warn!(
                    "Rejected event type {} behaviors: {} of {} behavior groups not found",
                    event_type_id,
                    target.len() - owned.len(),
                    target.len()
                );
                return Ok(false);
            }

            let current: HashSet<Uuid> = event_type_behavior::table
                .inner_join(behavior_group::table)
                .filter(event_type_behavior::event_type_id.eq(event_type_id))
                .filter(behavior_group::account_id.eq(account.as_str()))
                .select(event_type_behavior::behavior_group_id)
                .load::<Uuid>(&mut *conn)
                .await?
                .into_iter()
                .collect();

            let diff = diff_memberships(&current, &target);
            if diff.is_empty() {
                return Ok(true);
            }

            if !diff.to_delete.is_empty() {
                diesel::delete(
                    event_type_behavior::table
                        .filter(event_type_behavior::event_type_id.eq(event_type_id))
                        .filter(event_type_behavior::behavior_group_id.eq_any(&diff.to_delete)),
                )
                .execute(&mut *conn)
                .await?;
            }

            if !diff.to_insert.is_empty() {
                let rows: Vec<NewEventTypeBehavior> = diff
                    .to_insert
                    .iter()
                    .map(|group_id| NewEventTypeBehavior {
                        event_type_id,
                        behavior_group_id: *group_id,
                    })
                    .collect();
                diesel::insert_into(event_type_behavior::table)
                    .values(&rows)
                    .execute(&mut *conn)
                    .await?;
            }

            log::debug!(
                "Event type {}: {} behavior groups linked, {} unlinked",
                event_type_id,
                diff.to_insert.len(),
                diff.to_delete.len()
            );
            Ok(true)
        }
        .scope_boxed()
    })
    .await
}
