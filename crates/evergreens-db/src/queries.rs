use crate::models::{MeetingRow, NewMeeting, NewProposal, ProposalRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, Row, params_from_iter};

const PROPOSAL_FIELDS: &str = "p.title, p.description, p.reels_count, p.demographics,
     p.expected_reach, p.budget, p.status, p.progress, p.created_at";

const MEETING_FIELDS: &str = "m.date, m.time, m.mode, m.status, m.created_at";

impl Database {
    // -- Users --

    /// Insert a user. Returns `None` when the email is already registered.
    pub fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (email, password, name, role) VALUES (?1, ?2, ?3, ?4)",
                (email, password, name, role),
            );

            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Exact-match lookup on both email and password.
    pub fn find_user_by_credentials(&self, email: &str, password: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password, role, name FROM users WHERE email = ?1 AND password = ?2",
            )?;

            let row = stmt
                .query_row([email, password], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password: row.get(2)?,
                        role: row.get(3)?,
                        name: row.get(4)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    // -- Proposals --

    pub fn insert_proposal(&self, proposal: &NewProposal<'_>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO proposals
                    (influencer_id, title, description, reels_count, demographics, expected_reach, budget)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    proposal.influencer_id,
                    proposal.title,
                    proposal.description,
                    proposal.reels_count,
                    proposal.demographics,
                    proposal.expected_reach,
                    proposal.budget,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_proposal(&self, id: i64) -> Result<Option<ProposalRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT p.id, p.influencer_id, u.name, {PROPOSAL_FIELDS}
                 FROM proposals p
                 LEFT JOIN users u ON p.influencer_id = u.id
                 WHERE p.id = ?1"
            );
            let row = conn.query_row(&sql, [id], proposal_from_row).optional()?;
            Ok(row)
        })
    }

    /// Every proposal with its owner's name, newest first.
    pub fn list_all_proposals(&self) -> Result<Vec<ProposalRow>> {
        self.with_conn(|conn| query_proposals(conn, None))
    }

    /// One influencer's proposals, newest first. Owner names are not joined.
    pub fn list_proposals_for(&self, influencer_id: i64) -> Result<Vec<ProposalRow>> {
        self.with_conn(|conn| query_proposals(conn, Some(influencer_id)))
    }

    /// Write each provided field with its own statement. Returns the number of
    /// rows touched; an unknown id touches nothing.
    pub fn update_proposal(
        &self,
        id: i64,
        status: Option<&str>,
        progress: Option<&str>,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let mut touched = 0;
            if let Some(status) = status {
                touched += conn.execute(
                    "UPDATE proposals SET status = ?1 WHERE id = ?2",
                    rusqlite::params![status, id],
                )?;
            }
            if let Some(progress) = progress {
                touched += conn.execute(
                    "UPDATE proposals SET progress = ?1 WHERE id = ?2",
                    rusqlite::params![progress, id],
                )?;
            }
            Ok(touched)
        })
    }

    // -- Meetings --

    pub fn insert_meeting(&self, meeting: &NewMeeting<'_>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO meetings (influencer_id, date, time, mode) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![meeting.influencer_id, meeting.date, meeting.time, meeting.mode],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_all_meetings(&self) -> Result<Vec<MeetingRow>> {
        self.with_conn(|conn| query_meetings(conn, None))
    }

    pub fn list_meetings_for(&self, influencer_id: i64) -> Result<Vec<MeetingRow>> {
        self.with_conn(|conn| query_meetings(conn, Some(influencer_id)))
    }
}

fn query_proposals(conn: &Connection, influencer_id: Option<i64>) -> Result<Vec<ProposalRow>> {
    // Owner names are only joined for the unscoped listing.
    let (name, join, filter) = scoped_parts("p", influencer_id);
    // Ties on the second-resolution timestamp put the newer id first.
    let sql = format!(
        "SELECT p.id, p.influencer_id, {name}, {PROPOSAL_FIELDS}
         FROM proposals p {join} {filter}
         ORDER BY p.created_at DESC, p.id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(influencer_id), proposal_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_meetings(conn: &Connection, influencer_id: Option<i64>) -> Result<Vec<MeetingRow>> {
    let (name, join, filter) = scoped_parts("m", influencer_id);
    let sql = format!(
        "SELECT m.id, m.influencer_id, {name}, {MEETING_FIELDS}
         FROM meetings m {join} {filter}
         ORDER BY m.created_at DESC, m.id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(influencer_id), meeting_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Name column, join and filter for a listing over `alias`.
fn scoped_parts(alias: &str, influencer_id: Option<i64>) -> (&'static str, String, String) {
    match influencer_id {
        None => (
            "u.name",
            format!("LEFT JOIN users u ON {alias}.influencer_id = u.id"),
            String::new(),
        ),
        Some(_) => ("NULL", String::new(), format!("WHERE {alias}.influencer_id = ?1")),
    }
}

fn proposal_from_row(row: &Row<'_>) -> rusqlite::Result<ProposalRow> {
    Ok(ProposalRow {
        id: row.get(0)?,
        influencer_id: row.get(1)?,
        influencer_name: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        reels_count: row.get(5)?,
        demographics: row.get(6)?,
        expected_reach: row.get(7)?,
        budget: row.get(8)?,
        status: row.get(9)?,
        progress: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn meeting_from_row(row: &Row<'_>) -> rusqlite::Result<MeetingRow> {
    Ok(MeetingRow {
        id: row.get(0)?,
        influencer_id: row.get(1)?,
        influencer_name: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        mode: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
