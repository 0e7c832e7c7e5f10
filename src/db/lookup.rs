//! Reverse lookups across the link tables.
//!
//! Every call issues a fresh query, so results always reflect committed state.

use crate::{
    Conn,
    models::{BehaviorGroup, EventType, EventTypeBehavior},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::DbError;

/// Event types a behavior group is attached to.
pub async fn find_event_types_by_behavior_group_id<'a>(
    conn: &mut Conn<'a>,
    behavior_group_id: Uuid,
) -> Result<Vec<EventType>, DbError> {
    use crate::schema::{event_type, event_type_behavior};

    let found = event_type::table
        .inner_join(event_type_behavior::table)
        .filter(event_type_behavior::behavior_group_id.eq(behavior_group_id))
        .order(event_type::name.asc())
        .select(EventType::as_select())
        .load::<EventType>(conn)
        .await?;
    Ok(found)
}

/// Behavior groups attached to an event type, across all accounts.
pub async fn find_behavior_groups_by_event_type_id<'a>(
    conn: &mut Conn<'a>,
    event_type_id: Uuid,
) -> Result<Vec<BehaviorGroup>, DbError> {
    use crate::schema::{behavior_group, event_type_behavior};

    let found = behavior_group::table
        .inner_join(event_type_behavior::table)
        .filter(event_type_behavior::event_type_id.eq(event_type_id))
        .order(behavior_group::created_at.desc())
        .then_order_by(behavior_group::id.desc())
        .select(BehaviorGroup::as_select())
        .load::<BehaviorGroup>(conn)
        .await?;
    Ok(found)
}

/// Behavior groups with at least one action targeting the endpoint.
///
/// A group linking the same email subscription twice is listed once.
pub async fn find_behavior_groups_by_endpoint_id<'a>(
    conn: &mut Conn<'a>,
    endpoint_id: Uuid,
) -> Result<Vec<BehaviorGroup>, DbError> {
    use crate::schema::{behavior_group, behavior_group_action};

    let linked = behavior_group_action::table
        .filter(behavior_group_action::endpoint_id.eq(endpoint_id))
        .select(behavior_group_action::behavior_group_id);

    let found = behavior_group::table
        .filter(behavior_group::id.eq_any(linked))
        .order(behavior_group::created_at.desc())
        .then_order_by(behavior_group::id.desc())
        .select(BehaviorGroup::as_select())
        .load::<BehaviorGroup>(conn)
        .await?;
    Ok(found)
}

/// Raw membership rows of an event type.
pub async fn find_event_type_behaviors<'a>(
    conn: &mut Conn<'a>,
    event_type_id: Uuid,
) -> Result<Vec<EventTypeBehavior>, DbError> {
    use crate::schema::event_type_behavior::dsl;

    let rows = dsl::event_type_behavior
        .filter(dsl::event_type_id.eq(event_type_id))
        .select(EventTypeBehavior::as_select())
        .load::<EventTypeBehavior>(conn)
        .await?;
    Ok(rows)
}
