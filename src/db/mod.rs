mod behavior_group_action;
mod behavior_group_crud;
mod catalog;
mod event_type_behavior;
mod lookup;
mod ownership;

use crate::Conn;
use actix_web::http::StatusCode;
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedBoxFuture;

pub(crate) type DbError = crate::error::BehaviorGroupError;

// Re-exports from behavior_group_crud
pub use behavior_group_crud::{
    create_behavior_group, delete_behavior_group, find_behavior_group_by_id,
    find_behavior_groups_by_bundle_id, update_behavior_group,
};

// Re-exports from the reconcilers
pub use behavior_group_action::update_behavior_group_actions;
pub use event_type_behavior::update_event_type_behaviors;

// Re-exports from lookup
pub use lookup::{
    find_behavior_groups_by_endpoint_id, find_behavior_groups_by_event_type_id,
    find_event_type_behaviors, find_event_types_by_behavior_group_id,
};

// Re-exports from catalog
pub use catalog::{
    create_application, create_bundle, create_endpoint, create_event_type, find_bundle_by_id,
    find_endpoint_by_id, find_event_type_by_id,
};

// Re-exports from ownership
pub use ownership::{find_owned_behavior_group_ids, find_owned_endpoints, lock_owned_behavior_group};

/// Outcome of replacing the actions of a behavior group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The action list now matches the request.
    Ok,
    /// The behavior group or one of the endpoints is unknown to the caller.
    NotFound,
}

impl UpdateStatus {
    /// HTTP status the upstream layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpdateStatus::Ok => StatusCode::OK,
            UpdateStatus::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Execute a closure within a database transaction.
///
/// Rolls back on error, commits on success. The connection's transaction
/// manager tracks the open transaction, so a future dropped before COMMIT
/// leaves the connection marked broken and the pool discards it instead of
/// handing the open transaction to the next caller.
/// Callers wrap their async block with `async move { ... }.scope_boxed()`.
pub async fn run_in_transaction<'a, 'b, T, F>(conn: &mut Conn<'a>, f: F) -> Result<T, DbError>
where
    F: for<'r> FnOnce(&'r mut Conn<'a>) -> ScopedBoxFuture<'b, 'r, Result<T, DbError>> + Send + 'b,
    T: Send + 'b,
{
    conn.transaction::<T, DbError, F>(f).await
}
