use cinetrack_models::fields;
use cinetrack_models::Predicate;

/// The signed-in user, handed to every component that reads or writes a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner_id: String,
}

impl Session {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub(crate) fn owner_predicate(&self) -> Predicate {
        owner_predicate(&self.owner_id)
    }
}

/// Matches the current owner field and the one older clients wrote
pub(crate) fn owner_predicate(owner_id: &str) -> Predicate {
    Predicate::eq(fields::OWNER_ID, owner_id).with_legacy(fields::LEGACY_OWNER_ID)
}
