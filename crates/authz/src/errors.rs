use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("this user has no identity policies associated with it")]
    NoIdentityPolicies,
    #[error("no resource policies have been found for this bucket")]
    NoResourcePolicy,
    #[error("identity policies do not allow these actions: {0}")]
    IdentityDenied(String),
    #[error("resource policies do not allow these actions: {0}")]
    ResourceDenied(String),
}
