// Job applications tracked by a candidate, each stamped with the match score
// it had when created.

pub mod handlers;
pub mod status;
pub mod store;
