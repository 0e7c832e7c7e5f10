//! Tenant resolution for reconciliation.
//!
//! A row that does not exist and a row owned by another account look the same
//! from here: both are simply absent from the result.

use crate::{
    Conn,
    models::{BehaviorGroup, EndpointType},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::DbError;

/// Fetch a behavior group owned by `account` and lock its row until the
/// surrounding transaction ends.
///
/// Must be called inside `run_in_transaction`; concurrent callers targeting the
/// same group wait here.
pub async fn lock_owned_behavior_group<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    group_id: Uuid,
) -> Result<Option<BehaviorGroup>, DbError> {
    use crate::schema::behavior_group::dsl::*;

    let group = behavior_group
        .filter(id.eq(group_id).and(account_id.eq(account)))
        .select(BehaviorGroup::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    Ok(group)
}

/// Keep only the ids of behavior groups that exist and belong to `account`.
pub async fn find_owned_behavior_group_ids<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    group_ids: &[Uuid],
) -> Result<HashSet<Uuid>, DbError> {
    use crate::schema::behavior_group::dsl::*;

    if group_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let owned = behavior_group
        .filter(account_id.eq(account))
        .filter(id.eq_any(group_ids))
        .select(id)
        .load::<Uuid>(conn)
        .await?;
    Ok(owned.into_iter().collect())
}

/// Resolve the endpoints that exist and belong to `account`, with their type.
pub async fn find_owned_endpoints<'a>(
    conn: &mut Conn<'a>,
    account: &str,
    endpoint_ids: &[Uuid],
) -> Result<HashMap<Uuid, EndpointType>, DbError> {
    use crate::schema::endpoints::dsl::*;

    if endpoint_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let owned = endpoints
        .filter(account_id.eq(account))
        .filter(id.eq_any(endpoint_ids))
        .select((id, endpoint_type))
        .load::<(Uuid, EndpointType)>(conn)
        .await?;
    Ok(owned.into_iter().collect())
}
