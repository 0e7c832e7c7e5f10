//! Pure planning of link table changes.
//!
//! Nothing here touches the database: given what is stored and what the caller
//! asked for, these functions compute the rows to delete and insert. The `db`
//! module applies the plans inside a transaction.

use std::collections::{BTreeSet, HashMap, HashSet};

use uuid::Uuid;

use crate::models::{BehaviorGroupAction, EndpointType, NewBehaviorGroupAction};

/// Rows to remove and add so an unordered membership set matches its target.
#[derive(Debug, Default, PartialEq)]
pub struct MembershipDiff {
    pub to_insert: Vec<Uuid>,
    pub to_delete: Vec<Uuid>,
}

impl MembershipDiff {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

/// Computes `target - current` and `current - target`.
///
/// Both lists are sorted so the statements issued for a given input are stable.
pub fn diff_memberships(current: &HashSet<Uuid>, target: &HashSet<Uuid>) -> MembershipDiff {
    let to_insert: BTreeSet<Uuid> = target.difference(current).copied().collect();
    let to_delete: BTreeSet<Uuid> = current.difference(target).copied().collect();
    MembershipDiff {
        to_insert: to_insert.into_iter().collect(),
        to_delete: to_delete.into_iter().collect(),
    }
}

/// Full replacement of the ordered action list of one behavior group.
#[derive(Debug, Default, PartialEq)]
pub struct ActionPlan {
    /// Ids of the stored action rows to remove.
    pub to_delete: Vec<Uuid>,
    /// New rows, positions numbered from 0 in execution order.
    pub to_insert: Vec<NewBehaviorGroupAction>,
}

impl ActionPlan {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

/// Returned when the requested sequence references endpoints that could not
/// be resolved for the caller.
#[derive(Debug, PartialEq)]
pub struct UnknownEndpoints(pub Vec<Uuid>);

/// Collapses duplicate endpoint ids according to the cardinality rule.
///
/// An endpoint whose type does not allow repeated actions keeps only its last
/// occurrence; email subscriptions keep every occurrence. The relative order of
/// the surviving entries is the requested order.
pub fn normalize_action_targets(
    target: &[Uuid],
    endpoint_types: &HashMap<Uuid, EndpointType>,
) -> Result<Vec<(Uuid, EndpointType)>, UnknownEndpoints> {
    let mut unknown: Vec<Uuid> = target
        .iter()
        .filter(|id| !endpoint_types.contains_key(*id))
        .copied()
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        unknown.dedup();
        return Err(UnknownEndpoints(unknown));
    }

    let last_index: HashMap<Uuid, usize> = target
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    Ok(target
        .iter()
        .enumerate()
        .filter_map(|(i, id)| {
            let kind = endpoint_types[id];
            (kind.allows_repeated_actions() || last_index[id] == i).then_some((*id, kind))
        })
        .collect())
}

/// Plans the replacement of `current` by the requested endpoint sequence.
///
/// Every stored row is deleted and the normalized sequence re-inserted, unless
/// the stored list already matches it exactly, in which case the plan is empty.
pub fn plan_actions(
    behavior_group_id: Uuid,
    current: &[BehaviorGroupAction],
    target: &[Uuid],
    endpoint_types: &HashMap<Uuid, EndpointType>,
) -> Result<ActionPlan, UnknownEndpoints> {
    let normalized = normalize_action_targets(target, endpoint_types)?;

    let mut stored: Vec<&BehaviorGroupAction> = current.iter().collect();
    stored.sort_by_key(|a| a.position);
    let unchanged = stored.len() == normalized.len()
        && stored
            .iter()
            .zip(normalized.iter())
            .enumerate()
            .all(|(i, (a, (id, _)))| a.endpoint_id == *id && a.position as usize == i);
    if unchanged {
        return Ok(ActionPlan::default());
    }

    Ok(ActionPlan {
        to_delete: stored.iter().map(|a| a.id).collect(),
        to_insert: normalized
            .into_iter()
            .enumerate()
            .map(|(position, (endpoint_id, endpoint_type))| NewBehaviorGroupAction {
                behavior_group_id,
                endpoint_id,
                endpoint_type,
                position: position as i32,
            })
            .collect(),
    })
}
