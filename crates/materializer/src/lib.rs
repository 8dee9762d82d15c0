//! Replays policy deltas recorded in block bodies into an in-memory
//! materialized view (spec §4.3).
//!
//! The view is rebuildable from scratch by replaying every block in
//! order, so it carries no state that can't be recomputed from the
//! chain it was built from.

use ac_block::{Block, BlockBody};
use ac_policy::{action_requests_removal, IdentityPolicy, ResourcePolicy, StringOrList};
use indexmap::IndexMap;

/// The two statement shapes both expose an `action` field that, when it
/// requests `"remove"`, marks the statement for deletion during an
/// `update` delta rather than replacement.
trait HasAction {
    fn action(&self) -> &StringOrList;
}

impl HasAction for ac_policy::IdentityStatement {
    fn action(&self) -> &StringOrList {
        &self.action
    }
}

impl HasAction for ac_policy::ResourceStatement {
    fn action(&self) -> &StringOrList {
        &self.action
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterializedView {
    pub resource_policies: IndexMap<String, ResourcePolicy>,
    pub identity_policies: IndexMap<String, IndexMap<String, IdentityPolicy>>,
}

impl MaterializedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a view from scratch by replaying every block of `chain`
    /// in order.
    pub fn from_chain(chain: &[Block]) -> Self {
        let mut view = Self::new();
        for block in chain {
            view.apply_block(&block.body);
        }
        view
    }

    /// Apply a single block's policy deltas onto this view.
    pub fn apply_block(&mut self, body: &BlockBody) {
        for policy in body.resource_policies.values() {
            apply_resource_delta(&mut self.resource_policies, policy);
        }
        for (principal_id, policies) in &body.identity_policies {
            let principal_view = self.identity_policies.entry(principal_id.clone()).or_default();
            for policy in policies.values() {
                apply_identity_delta(principal_view, policy);
            }
        }
    }
}

fn apply_statement_update<T>(existing: &mut IndexMap<String, T>, incoming: &IndexMap<String, T>)
where
    T: Clone + HasAction,
{
    for (sid, stmt) in incoming {
        if !existing.contains_key(sid) {
            existing.insert(sid.clone(), stmt.clone());
        } else if action_requests_removal(stmt.action()) {
            existing.shift_remove(sid);
        } else {
            existing.insert(sid.clone(), stmt.clone());
        }
    }
}

fn apply_resource_delta(view: &mut IndexMap<String, ResourcePolicy>, policy: &ResourcePolicy) {
    use ac_policy::PolicyAction::*;
    match policy.action {
        Add => {
            view.insert(policy.id.clone(), policy.clone());
        }
        Remove => {
            if view.shift_remove(&policy.id).is_none() {
                tracing::warn!(policy_id = %policy.id, "remove of absent resource policy id");
            }
        }
        Update => {
            let entry = view.entry(policy.id.clone()).or_insert_with(|| policy.clone());
            apply_statement_update(&mut entry.statements, &policy.statements);
        }
    }
}

fn apply_identity_delta(view: &mut IndexMap<String, IdentityPolicy>, policy: &IdentityPolicy) {
    use ac_policy::PolicyAction::*;
    match policy.action {
        Add => {
            view.insert(policy.id.clone(), policy.clone());
        }
        Remove => {
            if view.shift_remove(&policy.id).is_none() {
                tracing::warn!(policy_id = %policy.id, "remove of absent identity policy id");
            }
        }
        Update => {
            let entry = view.entry(policy.id.clone()).or_insert_with(|| policy.clone());
            apply_statement_update(&mut entry.statements, &policy.statements);
        }
    }
}
