// Job postings: public listing and detail with per-caller match scores,
// plus personalized recommendations.

pub mod handlers;
pub mod store;
