use std::collections::HashMap;

use ac_block::{Block, EventRow};
use ac_policy::{Policy, PolicyAction};
use chrono::Utc;
use once_cell::sync::Lazy;

use crate::errors::Error;

/// Everything a contract invocation needs besides the block it mutates:
/// the pending policy (the "transaction" of spec §4.2's calling
/// convention) and who submitted it, threaded through so `PAP_log` can
/// append an accurate event row.
pub struct ContractContext {
    pub policy: Policy,
    pub requester_id: String,
    pub requester_pk: String,
}

pub type ContractFn = fn(&ContractContext, &mut Block) -> Result<(), Error>;

/// The master access contract. For each pending policy, stages it into
/// the candidate block's resource/identity policy tables (keyed as
/// spec §3 describes) and records the event via `PAP_log`.
///
/// The source prototype's `MAC` was a literal no-op (flagged in spec
/// §9(a)); without staging the policy into the block body, mining could
/// never produce anything for the materializer to apply, so this is one
/// of the behaviors spec.md requires fixing rather than preserving.
fn mac(ctx: &ContractContext, block: &mut Block) -> Result<(), Error> {
    match &ctx.policy {
        Policy::Resource(policy) => {
            block
                .body
                .resource_policies
                .insert(policy.id.clone(), policy.clone());
        }
        Policy::Identity { principal_id, policy } => {
            block
                .body
                .identity_policies
                .entry(principal_id.clone())
                .or_default()
                .insert(policy.id.clone(), policy.clone());
        }
    }
    pap_log(ctx, block)
}

/// Records the transaction onto the events table (spec §3 EventRow).
fn pap_log(ctx: &ContractContext, block: &mut Block) -> Result<(), Error> {
    let transaction_type = match ctx.policy.action() {
        PolicyAction::Add => "add",
        PolicyAction::Remove => "remove",
        PolicyAction::Update => "update",
    };
    block.body.events.push(EventRow {
        timestamp: Utc::now(),
        requester_id: ctx.requester_id.clone(),
        requester_pk: ctx.requester_pk.clone(),
        transaction_type: transaction_type.to_string(),
    });
    Ok(())
}

/// Present in the source prototype as an empty stub with no defined
/// behavior; `MAC` already performs attachment via `principal_id`, so
/// this contract is not invoked by the current `MAC` and exists only so
/// genesis's contract table matches the source's (spec §4.2).
fn pap_attach_policy(_ctx: &ContractContext, _block: &mut Block) -> Result<(), Error> {
    Ok(())
}

fn pap_detach_policy(_ctx: &ContractContext, _block: &mut Block) -> Result<(), Error> {
    Ok(())
}

static REGISTRY: Lazy<HashMap<&'static str, ContractFn>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, ContractFn> = HashMap::new();
    m.insert("MAC", mac as ContractFn);
    m.insert("PAP_log", pap_log as ContractFn);
    m.insert("PAP_attach_policy", pap_attach_policy as ContractFn);
    m.insert("PAP_detach_policy", pap_detach_policy as ContractFn);
    m
});

pub fn registry() -> &'static HashMap<&'static str, ContractFn> {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use ac_block::{BlockBody, BlockHeader};
    use ac_policy::{Effect, IdentityPolicy, IdentityStatement, StringOrList};
    use indexmap::IndexMap;

    fn sample_identity_policy() -> Policy {
        let mut statements = IndexMap::new();
        statements.insert(
            "s1".to_string(),
            IdentityStatement {
                version: "v1".into(),
                sid: "s1".into(),
                effect: Effect::Allow,
                action: StringOrList(vec!["s3:GetObject".into()]),
                resource: StringOrList(vec!["b".into()]),
                condition: Default::default(),
            },
        );
        Policy::Identity {
            principal_id: "u1".into(),
            policy: IdentityPolicy {
                id: "P1".into(),
                action: PolicyAction::Add,
                statements,
            },
        }
    }

    #[test]
    fn mac_stages_identity_policy_and_logs_event() {
        let mut block = Block::new(BlockHeader::genesis(Utc::now()), BlockBody::default());
        let ctx = ContractContext {
            policy: sample_identity_policy(),
            requester_id: "u1".into(),
            requester_pk: "pk".into(),
        };
        mac(&ctx, &mut block).unwrap();
        assert!(block.body.identity_policies["u1"].contains_key("P1"));
        assert_eq!(block.body.events.len(), 1);
        assert_eq!(block.body.events[0].transaction_type, "add");
    }
}
