use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::{info, warn};

use evergreens_db::Database;
use evergreens_db::models::{MeetingRow, NewMeeting};
use evergreens_types::access::{Capability, ListScope};
use evergreens_types::api::{CreateMeetingRequest, CreateMeetingResponse, ListQuery};
use evergreens_types::models::{Meeting, MeetingStatus};

use crate::error::PortalError;
use crate::{AppState, blocking, parse_timestamp};

/// Store a meeting request as pending. Date and time are free text.
pub fn create_meeting(db: &Database, req: &CreateMeetingRequest) -> Result<i64, PortalError> {
    let id = db.insert_meeting(&NewMeeting {
        influencer_id: req.influencer_id,
        date: &req.date,
        time: &req.time,
        mode: &req.mode,
    })?;
    Ok(id)
}

pub fn list_meetings(db: &Database, scope: ListScope) -> Result<Vec<Meeting>, PortalError> {
    let rows = match scope {
        ListScope::All => db.list_all_meetings()?,
        ListScope::Owner(influencer_id) => db.list_meetings_for(influencer_id)?,
        ListScope::Nobody => Vec::new(),
    };
    Ok(rows.into_iter().map(meeting_from_row).collect())
}

fn meeting_from_row(row: MeetingRow) -> Meeting {
    let record = format!("meeting {}", row.id);
    Meeting {
        id: row.id,
        influencer_id: row.influencer_id,
        influencer_name: row.influencer_name,
        date: row.date,
        time: row.time,
        mode: row.mode,
        status: row.status.parse().unwrap_or_else(|e| {
            warn!("Corrupt status '{}' on {}: {}", row.status, record, e);
            MeetingStatus::default()
        }),
        created_at: parse_timestamp(&row.created_at, &record),
    }
}

/// POST /api/meetings
pub async fn request_meeting(
    State(state): State<AppState>,
    Json(req): Json<CreateMeetingRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let influencer_id = req.influencer_id;
    let meeting_id = blocking(&state, move |db| create_meeting(db, &req)).await?;
    info!("Influencer {} requested meeting {}", influencer_id, meeting_id);

    Ok(Json(CreateMeetingResponse {
        success: true,
        meeting_id,
    }))
}

/// GET /api/meetings?role=&userId=
pub async fn get_meetings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, PortalError> {
    let scope = ListScope::resolve(
        query.role.unwrap_or_default(),
        query.user_id,
        Capability::ViewAllMeetings,
    );
    let meetings = blocking(&state, move |db| list_meetings(db, scope)).await?;
    Ok(Json(meetings))
}
