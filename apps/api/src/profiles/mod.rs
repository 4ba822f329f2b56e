// Candidate profiles: the preferences the match scorer reads.

pub mod completeness;
pub mod handlers;
pub mod store;
pub mod validation;
