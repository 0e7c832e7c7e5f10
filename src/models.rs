use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Identifiable, Queryable, Selectable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::bundles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Bundle {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::bundles)]
pub struct NewBundle<'a> {
    pub name: &'a str,
    pub display_name: &'a str,
}

#[derive(Identifiable, Queryable, Selectable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(
    table_name = crate::schema::applications,
    belongs_to(Bundle),
    check_for_backend(diesel::pg::Pg))
]
pub struct Application {
    pub id: Uuid,
    pub bundle_id: Uuid,
    pub name: String,
    pub display_name: String,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::applications)]
pub struct NewApplication<'a> {
    pub bundle_id: Uuid,
    pub name: &'a str,
    pub display_name: &'a str,
}

#[derive(Identifiable, Queryable, Selectable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(
    table_name = crate::schema::event_type,
    belongs_to(Application),
    check_for_backend(diesel::pg::Pg))
]
pub struct EventType {
    pub id: Uuid,
    pub application_id: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::event_type)]
pub struct NewEventType<'a> {
    pub application_id: Uuid,
    pub name: &'a str,
    pub display_name: &'a str,
    pub description: Option<&'a str>,
}

/// Delivery channel of an endpoint.
///
/// Email subscriptions are the only type that may be linked more than once
/// to the same behavior group.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[db_enum(existing_type_path = "crate::schema::sql_types::EndpointType")]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    Webhook,
    EmailSubscription,
    Camel,
}

impl EndpointType {
    /// Whether several actions of one behavior group may target the same endpoint.
    pub fn allows_repeated_actions(&self) -> bool {
        matches!(self, EndpointType::EmailSubscription)
    }
}

#[derive(Identifiable, Queryable, Selectable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::endpoints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Endpoint {
    pub id: Uuid,
    pub account_id: String,
    pub endpoint_type: EndpointType,
    pub name: String,
    pub enabled: bool,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::endpoints)]
pub struct NewEndpoint<'a> {
    pub account_id: &'a str,
    pub endpoint_type: EndpointType,
    pub name: &'a str,
    pub enabled: bool,
}

#[derive(Identifiable, Queryable, Selectable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(
    table_name = crate::schema::behavior_group,
    belongs_to(Bundle),
    check_for_backend(diesel::pg::Pg))
]
pub struct BehaviorGroup {
    pub id: Uuid,
    pub account_id: String,
    pub bundle_id: Uuid,
    pub display_name: String,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::behavior_group)]
pub struct NewBehaviorGroup<'a> {
    pub account_id: &'a str,
    pub bundle_id: Uuid,
    pub display_name: &'a str,
}

/// Membership of a behavior group in the set triggered by an event type.
#[derive(Identifiable, Queryable, Selectable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(
    table_name = crate::schema::event_type_behavior,
    primary_key(event_type_id, behavior_group_id),
    belongs_to(EventType),
    belongs_to(BehaviorGroup),
    check_for_backend(diesel::pg::Pg))
]
pub struct EventTypeBehavior {
    pub event_type_id: Uuid,
    pub behavior_group_id: Uuid,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::event_type_behavior)]
pub struct NewEventTypeBehavior {
    pub event_type_id: Uuid,
    pub behavior_group_id: Uuid,
}

/// One step of a behavior group: the endpoint to notify and its rank.
#[derive(Identifiable, Queryable, Selectable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(
    table_name = crate::schema::behavior_group_action,
    belongs_to(BehaviorGroup),
    belongs_to(Endpoint),
    check_for_backend(diesel::pg::Pg))
]
pub struct BehaviorGroupAction {
    pub id: Uuid,
    pub behavior_group_id: Uuid,
    pub endpoint_id: Uuid,
    pub endpoint_type: EndpointType,
    pub position: i32,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = crate::schema::behavior_group_action)]
pub struct NewBehaviorGroupAction {
    pub behavior_group_id: Uuid,
    pub endpoint_id: Uuid,
    pub endpoint_type: EndpointType,
    pub position: i32,
}
