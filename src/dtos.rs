use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BehaviorGroup, BehaviorGroupAction, EndpointType};

/// Request body for creating a behavior group.
///
/// Fields are optional because they come straight from the caller;
/// the repository rejects missing values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBehaviorGroupDto {
    pub display_name: Option<String>,
    pub bundle_id: Option<Uuid>,
}

/// Request body for updating a behavior group.
///
/// `bundle_id` is accepted for symmetry with the create payload but is never
/// written: a behavior group stays attached to the bundle it was created in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBehaviorGroupDto {
    pub id: Uuid,
    pub display_name: Option<String>,
    #[serde(default)]
    pub bundle_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorGroupActionDto {
    pub endpoint_id: Uuid,
    pub endpoint_type: EndpointType,
    pub position: i32,
    pub created_at: chrono::DateTime<Utc>,
}

/// A behavior group with its actions sorted by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorGroupDto {
    pub id: Uuid,
    pub account_id: String,
    pub bundle_id: Uuid,
    pub display_name: String,
    pub created_at: chrono::DateTime<Utc>,
    pub actions: Vec<BehaviorGroupActionDto>,
}

impl BehaviorGroupDto {
    pub fn new(group: BehaviorGroup, mut actions: Vec<BehaviorGroupAction>) -> Self {
        actions.sort_by_key(|a| a.position);
        Self {
            id: group.id,
            account_id: group.account_id,
            bundle_id: group.bundle_id,
            display_name: group.display_name,
            created_at: group.created_at,
            actions: actions
                .into_iter()
                .map(|a| BehaviorGroupActionDto {
                    endpoint_id: a.endpoint_id,
                    endpoint_type: a.endpoint_type,
                    position: a.position,
                    created_at: a.created_at,
                })
                .collect(),
        }
    }

    /// Endpoint ids in execution order.
    pub fn endpoint_ids(&self) -> Vec<Uuid> {
        self.actions.iter().map(|a| a.endpoint_id).collect()
    }
}
