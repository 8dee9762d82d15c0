use ac_policy::{Effect, IdentityPolicy, ResourcePolicy, StringOrList};
use indexmap::IndexMap;

use crate::request::UserData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    ExplicitDeny,
    ImplicitDeny,
}

impl Decision {
    pub fn allows(self) -> bool {
        self == Decision::Allow
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::Allow => "Allow",
            Decision::ExplicitDeny => "Explicit Deny",
            Decision::ImplicitDeny => "Implicit Deny",
        }
    }
}

/// Every statement of every policy must match-and-allow; the first
/// mismatch is an implicit deny rather than "not applicable, check the
/// next statement" (spec §4.9, intentionally conservative).
pub fn evaluate_identity_policies(
    policies: &IndexMap<String, IdentityPolicy>,
    user_data: &UserData,
) -> Decision {
    let requested_action = StringOrList(user_data.action.clone());
    let requested_resources = StringOrList(user_data.resources.clone());
    for policy in policies.values() {
        for statement in policy.statements.values() {
            let action_match = statement.action.is_superset_of(&requested_action);
            let resource_match = statement.resource.is_superset_of(&requested_resources);
            if action_match && resource_match {
                if statement.effect == Effect::Deny {
                    return Decision::ExplicitDeny;
                }
            } else {
                return Decision::ImplicitDeny;
            }
        }
    }
    Decision::Allow
}

pub fn evaluate_resource_policies(
    policies: &IndexMap<String, ResourcePolicy>,
    user_data: &UserData,
) -> Decision {
    let requested_action = StringOrList(user_data.action.clone());
    let requested_bucket = StringOrList(vec![user_data.bucket.clone()]);
    let requesting_principal = StringOrList(vec![user_data.client_id.clone()]);
    for policy in policies.values() {
        for statement in policy.statements.values() {
            let action_match = statement.action.is_superset_of(&requested_action);
            let resource_match = statement.resource.is_superset_of(&requested_bucket);
            let principal_match = statement.principal.is_superset_of(&requesting_principal);
            if action_match && resource_match && principal_match {
                if statement.effect == Effect::Deny {
                    return Decision::ExplicitDeny;
                }
            } else {
                return Decision::ImplicitDeny;
            }
        }
    }
    Decision::Allow
}
