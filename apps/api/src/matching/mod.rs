// Job / candidate matching.
// One scorer, one weights configuration, shared by the job listing, job detail
// and recommendation endpoints.

pub mod ranking;
pub mod scorer;
pub mod weights;
