use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::{info, warn};

use evergreens_db::Database;
use evergreens_db::models::{NewProposal, ProposalRow};
use evergreens_types::access::{Capability, ListScope};
use evergreens_types::api::{
    Ack, CreateProposalRequest, CreateProposalResponse, ListQuery, ProposalStats,
    UpdateProposalRequest,
};
use evergreens_types::models::{Progress, Proposal, ProposalStatus};

use crate::error::PortalError;
use crate::{AppState, blocking, parse_timestamp};

/// Store a new proposal. Status and progress always start at their defaults.
pub fn create_proposal(db: &Database, req: &CreateProposalRequest) -> Result<i64, PortalError> {
    let id = db.insert_proposal(&NewProposal {
        influencer_id: req.influencer_id,
        title: &req.title,
        description: &req.description,
        reels_count: req.reels_count,
        demographics: &req.demographics,
        expected_reach: &req.expected_reach,
        budget: &req.budget,
    })?;
    Ok(id)
}

pub fn list_proposals(db: &Database, scope: ListScope) -> Result<Vec<Proposal>, PortalError> {
    let rows = match scope {
        ListScope::All => db.list_all_proposals()?,
        ListScope::Owner(influencer_id) => db.list_proposals_for(influencer_id)?,
        ListScope::Nobody => Vec::new(),
    };
    Ok(rows.into_iter().map(proposal_from_row).collect())
}

/// Write each provided field independently. Transitions are not checked and an
/// unknown id is a successful no-op.
pub fn update_proposal(
    db: &Database,
    id: i64,
    req: &UpdateProposalRequest,
) -> Result<(), PortalError> {
    let touched = db.update_proposal(
        id,
        req.status.map(<&'static str>::from),
        req.progress.map(<&'static str>::from),
    )?;

    if touched == 0 && (req.status.is_some() || req.progress.is_some()) {
        warn!("Update for proposal {} matched no rows", id);
    }
    Ok(())
}

pub fn proposal_stats(db: &Database, scope: ListScope) -> Result<ProposalStats, PortalError> {
    let proposals = list_proposals(db, scope)?;
    Ok(summarize(&proposals))
}

fn summarize(proposals: &[Proposal]) -> ProposalStats {
    let mut stats = ProposalStats {
        total: proposals.len(),
        ..ProposalStats::default()
    };
    for p in proposals {
        match p.status {
            ProposalStatus::Pending => stats.pending += 1,
            ProposalStatus::Approved => {
                stats.approved += 1;
                if p.progress != Progress::Completed {
                    stats.active += 1;
                }
                if p.progress == Progress::NotStarted {
                    stats.not_started += 1;
                }
            }
            ProposalStatus::Rejected => {}
        }
        match p.progress {
            Progress::InProgress => stats.in_progress += 1,
            Progress::Completed => stats.completed += 1,
            Progress::NotStarted => {}
        }
    }
    stats
}

fn proposal_from_row(row: ProposalRow) -> Proposal {
    let record = format!("proposal {}", row.id);
    Proposal {
        id: row.id,
        influencer_id: row.influencer_id,
        influencer_name: row.influencer_name,
        title: row.title,
        description: row.description,
        reels_count: row.reels_count,
        demographics: row.demographics,
        expected_reach: row.expected_reach,
        budget: row.budget,
        status: row.status.parse().unwrap_or_else(|e| {
            warn!("Corrupt status '{}' on {}: {}", row.status, record, e);
            ProposalStatus::default()
        }),
        progress: row.progress.parse().unwrap_or_else(|e| {
            warn!("Corrupt progress '{}' on {}: {}", row.progress, record, e);
            Progress::default()
        }),
        created_at: parse_timestamp(&row.created_at, &record),
    }
}

fn scope(query: &ListQuery) -> ListScope {
    ListScope::resolve(
        query.role.unwrap_or_default(),
        query.user_id,
        Capability::ViewAllProposals,
    )
}

// ── Handlers ────────────────────────────────────────────────────────────

/// POST /api/proposals
pub async fn submit_proposal(
    State(state): State<AppState>,
    Json(req): Json<CreateProposalRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let influencer_id = req.influencer_id;
    let proposal_id = blocking(&state, move |db| create_proposal(db, &req)).await?;
    info!("Influencer {} submitted proposal {}", influencer_id, proposal_id);

    Ok(Json(CreateProposalResponse {
        success: true,
        proposal_id,
    }))
}

/// GET /api/proposals?role=&userId=
pub async fn get_proposals(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, PortalError> {
    let scope = scope(&query);
    let proposals = blocking(&state, move |db| list_proposals(db, scope)).await?;
    Ok(Json(proposals))
}

/// GET /api/proposals/stats?role=&userId=
pub async fn get_proposal_stats(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, PortalError> {
    let scope = scope(&query);
    let stats = blocking(&state, move |db| proposal_stats(db, scope)).await?;
    Ok(Json(stats))
}

/// PATCH /api/proposals/{id}
pub async fn patch_proposal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProposalRequest>,
) -> Result<impl IntoResponse, PortalError> {
    if let Some(status) = req.status {
        info!("Proposal {} status -> {}", id, status);
    }
    if let Some(progress) = req.progress {
        info!("Proposal {} progress -> {}", id, progress);
    }
    blocking(&state, move |db| update_proposal(db, id, &req)).await?;
    Ok(Json(Ack::ok()))
}
