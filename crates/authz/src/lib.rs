//! Three-tier authorization evaluator: identity policies gate first,
//! then resource policies (spec §4.9).

mod errors;
mod evaluate;
mod request;

pub use errors::Error;
pub use evaluate::{evaluate_identity_policies, evaluate_resource_policies, Decision};
pub use request::{extract_user_data, AuthorizationRequest, UserData};

use ac_materializer::MaterializedView;

/// Evaluate an authorization request against the current materialized
/// view. `Ok(())` means the request is allowed.
pub fn authorize(view: &MaterializedView, req: &AuthorizationRequest) -> Result<(), Error> {
    let user_data = extract_user_data(req);

    let identity_policies = view
        .identity_policies
        .get(&user_data.client_id)
        .ok_or(Error::NoIdentityPolicies)?;
    let identity_decision = evaluate_identity_policies(identity_policies, &user_data);
    if !identity_decision.allows() {
        return Err(Error::IdentityDenied(identity_decision.label().to_string()));
    }

    let resource_policies = view
        .resource_policies
        .get(&user_data.bucket)
        .map(|p| {
            let mut m = indexmap::IndexMap::new();
            m.insert(user_data.bucket.clone(), p.clone());
            m
        })
        .ok_or(Error::NoResourcePolicy)?;
    let resource_decision = evaluate_resource_policies(&resource_policies, &user_data);
    if !resource_decision.allows() {
        return Err(Error::ResourceDenied(resource_decision.label().to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_policy::{
        Effect, IdentityPolicy, IdentityStatement, PolicyAction, ResourcePolicy, ResourceStatement,
        StringOrList,
    };
    use serde_json::json;

    fn sample_request(action: &str, bucket: &str, client_id: &str) -> AuthorizationRequest {
        let body = json!({
            "input": {
                "account": "acc",
                "groups": [],
                "action": [action],
                "bucket": bucket,
                "conditions": {"policy": {}},
                "owner": "acc",
                "claims": {"client_id": client_id, "resources": [bucket]}
            }
        });
        serde_json::from_value(body).unwrap()
    }

    fn view_with_allow(client_id: &str, bucket: &str, action: &str) -> MaterializedView {
        let mut view = MaterializedView::new();
        let mut id_stmts = indexmap::IndexMap::new();
        id_stmts.insert(
            "s1".to_string(),
            IdentityStatement {
                version: "v1".into(),
                sid: "s1".into(),
                effect: Effect::Allow,
                action: StringOrList(vec![action.to_string()]),
                resource: StringOrList(vec![bucket.to_string()]),
                condition: Default::default(),
            },
        );
        let mut id_policies = indexmap::IndexMap::new();
        id_policies.insert(
            "P1".to_string(),
            IdentityPolicy {
                id: "P1".into(),
                action: PolicyAction::Add,
                statements: id_stmts,
            },
        );
        view.identity_policies.insert(client_id.to_string(), id_policies);

        let mut r_stmts = indexmap::IndexMap::new();
        r_stmts.insert(
            "s1".to_string(),
            ResourceStatement {
                version: "v1".into(),
                sid: "s1".into(),
                effect: Effect::Allow,
                action: StringOrList(vec![action.to_string()]),
                resource: StringOrList(vec![bucket.to_string()]),
                principal: StringOrList(vec![client_id.to_string()]),
                condition: Default::default(),
            },
        );
        view.resource_policies.insert(
            bucket.to_string(),
            ResourcePolicy {
                id: bucket.to_string(),
                action: PolicyAction::Add,
                statements: r_stmts,
            },
        );
        view
    }

    #[test]
    fn allows_when_both_tiers_match() {
        let view = view_with_allow("u1", "bucket-a", "s3:GetObject");
        let req = sample_request("s3:GetObject", "bucket-a", "u1");
        assert!(authorize(&view, &req).is_ok());
    }

    #[test]
    fn rejects_with_no_identity_policies() {
        let view = MaterializedView::new();
        let req = sample_request("s3:GetObject", "bucket-a", "u1");
        assert!(matches!(authorize(&view, &req), Err(Error::NoIdentityPolicies)));
    }

    #[test]
    fn rejects_on_action_mismatch() {
        let view = view_with_allow("u1", "bucket-a", "s3:GetObject");
        let req = sample_request("s3:PutObject", "bucket-a", "u1");
        assert!(matches!(authorize(&view, &req), Err(Error::IdentityDenied(_))));
    }
}
