/// Database row types. These map directly to SQLite rows.
/// Distinct from evergreens-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub role: String,
    pub name: String,
}

pub struct ProposalRow {
    pub id: i64,
    pub influencer_id: i64,
    pub influencer_name: Option<String>,
    pub title: String,
    pub description: String,
    pub reels_count: Option<i64>,
    pub demographics: String,
    pub expected_reach: String,
    pub budget: String,
    pub status: String,
    pub progress: String,
    pub created_at: String,
}

pub struct MeetingRow {
    pub id: i64,
    pub influencer_id: i64,
    pub influencer_name: Option<String>,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub status: String,
    pub created_at: String,
}

/// Insert payload for a proposal; status and progress take the column defaults.
pub struct NewProposal<'a> {
    pub influencer_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub reels_count: Option<i64>,
    pub demographics: &'a str,
    pub expected_reach: &'a str,
    pub budget: &'a str,
}

pub struct NewMeeting<'a> {
    pub influencer_id: i64,
    pub date: &'a str,
    pub time: &'a str,
    pub mode: &'a str,
}
