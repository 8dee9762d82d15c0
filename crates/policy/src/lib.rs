//! Access-control policy and statement types.
//!
//! Statements and policies are tagged sum types rather than a class
//! hierarchy: [`IdentityStatement`]/[`ResourceStatement`] and
//! [`IdentityPolicy`]/[`ResourcePolicy`] are distinct types discriminated
//! by which side of the ledger body they live on, not by a shared base
//! class with optional fields.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

mod error;
pub use error::Error;

/// A value that may appear on the wire as either a single string or a
/// list of strings, normalized internally to a `Vec<String>`.
///
/// Mirrors `list[str] | str` fields on the Python prototype's pydantic
/// models (`ACIdentityStatement.action`, `.resource`, `.principal`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StringOrList(pub Vec<String>);

impl StringOrList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    /// True if every element of `needles` is present in this list.
    pub fn is_superset_of(&self, needles: &StringOrList) -> bool {
        needles.0.iter().all(|n| self.contains(n))
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl From<Vec<String>> for StringOrList {
    fn from(v: Vec<String>) -> Self {
        StringOrList(v)
    }
}

impl<'de> Deserialize<'de> for StringOrList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrListVisitor;

        impl<'de> Visitor<'de> for StringOrListVisitor {
            type Value = StringOrList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or a list of strings")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(StringOrList(vec![v.to_owned()]))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut out = Vec::new();
                while let Some(elem) = seq.next_element::<String>()? {
                    out.push(elem);
                }
                Ok(StringOrList(out))
            }
        }

        deserializer.deserialize_any(StringOrListVisitor)
    }
}

/// Statement effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// The mutation verb carried by a policy delta. Not authorization
/// semantics — see spec §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Add,
    Remove,
    Update,
}

/// Opaque, unevaluated condition predicates keyed by name.
pub type Conditions = IndexMap<String, serde_json::Value>;

/// A statement attached directly to an identity (principal implicit
/// from attachment).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityStatement {
    pub version: String,
    pub sid: String,
    pub effect: Effect,
    #[serde(default)]
    pub action: StringOrList,
    pub resource: StringOrList,
    #[serde(default)]
    pub condition: Conditions,
}

/// A statement attached to a resource policy; adds an explicit
/// principal list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceStatement {
    pub version: String,
    pub sid: String,
    pub effect: Effect,
    #[serde(default)]
    pub action: StringOrList,
    pub resource: StringOrList,
    #[serde(default)]
    pub principal: StringOrList,
    #[serde(default)]
    pub condition: Conditions,
}

/// A delta-carrying bundle of identity statements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityPolicy {
    pub id: String,
    pub action: PolicyAction,
    #[serde(default)]
    pub statements: IndexMap<String, IdentityStatement>,
}

/// A delta-carrying bundle of resource (principal-bearing) statements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourcePolicy {
    pub id: String,
    pub action: PolicyAction,
    #[serde(default)]
    pub statements: IndexMap<String, ResourceStatement>,
}

/// A policy as it travels over the wire (mempool entries, `/add-policy`
/// bodies, gossip payloads): resource and identity policies are
/// distinguished by an explicit `kind` tag rather than inferred
/// structurally. The source prototype relied on pydantic's "smart
/// union" resolution to guess the variant from whether statements carry
/// a `principal` field; that heuristic has no deterministic serde
/// equivalent, so this implementation makes the discriminant explicit
/// (see DESIGN.md).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Policy {
    Resource(ResourcePolicy),
    /// `principal_id` names the identity this policy is attached to at
    /// submission time. The persisted [`IdentityPolicy`] record itself
    /// carries no principal field (per spec §3, "implicit from
    /// attachment") — the attachment is where that implicit context
    /// comes from.
    Identity {
        principal_id: String,
        #[serde(flatten)]
        policy: IdentityPolicy,
    },
}

impl Policy {
    pub fn id(&self) -> &str {
        match self {
            Policy::Resource(p) => &p.id,
            Policy::Identity { policy, .. } => &policy.id,
        }
    }

    pub fn action(&self) -> PolicyAction {
        match self {
            Policy::Resource(p) => p.action,
            Policy::Identity { policy, .. } => policy.action,
        }
    }
}

/// True if a statement-level `action` field has been repurposed as a
/// removal marker (its first element, or itself if scalar, equals
/// `"remove"`). This overload is flagged in spec §9(c) as a schema
/// wart this implementation honors rather than silently reinterprets.
pub fn action_requests_removal(action: &StringOrList) -> bool {
    action.first() == Some("remove")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_or_list_accepts_bare_string() {
        let v: StringOrList = serde_json::from_str(r#""s3:GetObject""#).unwrap();
        assert_eq!(v.0, vec!["s3:GetObject".to_string()]);
    }

    #[test]
    fn string_or_list_accepts_array() {
        let v: StringOrList = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(v.0, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = serde_json::from_str::<IdentityStatement>(
            r#"{"version":"v1","sid":"s1","effect":"Allow","resource":"b","bogus":1}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn removal_marker_on_scalar_and_list() {
        assert!(action_requests_removal(&StringOrList(vec!["remove".into()])));
        assert!(!action_requests_removal(&StringOrList(vec!["s3:GetObject".into()])));
        assert!(!action_requests_removal(&StringOrList(vec![])));
    }
}
