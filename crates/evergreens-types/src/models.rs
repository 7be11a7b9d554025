use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Account role. Stored as lowercase text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Influencer,
}

/// Review decision on a proposal. Transitions are not checked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProposalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Campaign execution progress, independent of [`ProposalStatus`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Progress {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeetingStatus {
    #[default]
    Pending,
    Confirmed,
}

/// Public view of an account. The password never leaves the DB layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    pub influencer_id: i64,
    /// Only populated in the admin listing.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub influencer_name: Option<String>,
    pub title: String,
    pub description: String,
    pub reels_count: Option<i64>,
    pub demographics: String,
    pub expected_reach: String,
    pub budget: String,
    pub status: ProposalStatus,
    pub progress: Progress,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub influencer_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub influencer_name: Option<String>,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_through_from_str() {
        assert_eq!("not_started".parse::<Progress>().unwrap(), Progress::NotStarted);
        assert_eq!("approved".parse::<ProposalStatus>().unwrap(), ProposalStatus::Approved);
        assert_eq!(Role::Admin.to_string(), "admin");
        let stored: &'static str = MeetingStatus::Confirmed.into();
        assert_eq!(stored, "confirmed");
    }

    #[test]
    fn unknown_text_is_rejected() {
        assert!("archived".parse::<ProposalStatus>().is_err());
        assert!("".parse::<Progress>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn serde_matches_stored_text() {
        assert_eq!(serde_json::to_string(&Progress::InProgress).unwrap(), "\"in_progress\"");
        let status: ProposalStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(status, ProposalStatus::Rejected);
    }

    #[test]
    fn influencer_name_is_omitted_when_absent() {
        let proposal = Proposal {
            id: 1,
            influencer_id: 2,
            influencer_name: None,
            title: "Summer Collection Reel".into(),
            description: String::new(),
            reels_count: Some(3),
            demographics: String::new(),
            expected_reach: String::new(),
            budget: "15,000".into(),
            status: ProposalStatus::Pending,
            progress: Progress::NotStarted,
            created_at: DateTime::default(),
        };
        let json = serde_json::to_value(&proposal).unwrap();
        assert!(json.get("influencer_name").is_none());
        assert_eq!(json["budget"], "15,000");
        assert_eq!(json["progress"], "not_started");
    }
}
