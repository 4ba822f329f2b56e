use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where an application stands in the candidate's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Saved,
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "saved",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Every status except `saved` means the application was actually sent,
    /// so `applied_at` gets stamped the first time one of them is reached.
    pub fn marks_submission(&self) -> bool {
        !matches!(self, ApplicationStatus::Saved)
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_matches_as_str() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!("ghosted".parse::<ApplicationStatus>().is_err());
        assert!("Applied".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for status in ApplicationStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_only_saved_is_not_a_submission() {
        assert!(!ApplicationStatus::Saved.marks_submission());
        assert!(ApplicationStatus::Applied.marks_submission());
        assert!(ApplicationStatus::Offer.marks_submission());
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(serde_json::from_str::<ApplicationStatus>(r#""ghosted""#).is_err());
    }
}
