//! The aggregation core: walks departments → teams → users → objectives →
//! key results through the repository, classifies objectives with the pure
//! predicates in [`status`], and assembles the two endpoint payloads.

pub mod status;
pub mod trend;
pub mod types;

pub use types::*;

use chrono::{Local, NaiveDate};
use rusqlite::Connection;

use crate::date_util::{self, cutoff_date, Filter, WindowUnit};
use crate::error::{Error, Result};
use crate::storage::models::Department;
use crate::storage::{repository, Database};

/// Build the departments-overview payload.
///
/// The on-track window defaults to 1 week. The recently-updated window
/// defaults to "2 weeks", resolved as a full cutoff 2 weeks back and a mid
/// cutoff 1 week back; a caller-supplied `"N unit"` filter is halved twice
/// instead, putting the full cutoff at N/2 units and the mid cutoff at N/4
/// units. That split mirrors the default and is preserved exactly, including
/// integer-day truncation of the fractional offsets.
pub async fn departments_overview(
    db: &Database,
    on_track_filter: Option<&str>,
    recently_upd_filter: Option<&str>,
) -> Result<DepartmentsOverview> {
    let today = Local::now().date_naive();

    let on_track_cutoff = match on_track_filter {
        Some(raw) => Filter::parse(raw)?.cutoff_from(today),
        None => cutoff_date(1.0, WindowUnit::Weeks, today),
    };

    let (recent_label, full_cutoff, mid_cutoff) = match recently_upd_filter {
        Some(raw) => {
            let filter = Filter::parse(raw)?;
            let half = filter.count as f64 / 2.0;
            (
                filter.label().to_string(),
                cutoff_date(half, filter.unit, today),
                cutoff_date(half / 2.0, filter.unit, today),
            )
        }
        None => (
            "2 weeks".to_string(),
            cutoff_date(2.0, WindowUnit::Weeks, today),
            cutoff_date(1.0, WindowUnit::Weeks, today),
        ),
    };

    log::info!(
        "departments overview: on-track since {on_track_cutoff}, updates since {full_cutoff} (mid {mid_cutoff})"
    );

    db.reader()
        .call(move |conn| {
            let on_track = on_track_summary(conn, on_track_cutoff)?;
            let updated = updated_summary(conn, full_cutoff)?;
            let prior = updated_between_summary(conn, full_cutoff, mid_cutoff)?;
            let current = updated_summary(conn, mid_cutoff)?;
            let departments = department_rollups(conn)?;

            let trend = trend::compare(prior, current);
            Ok::<_, rusqlite::Error>(DepartmentsOverview {
                objectives_on_track: OnTrackSummary {
                    date_since: date_util::format_date_since(on_track_cutoff),
                    on_track: on_track.matched,
                    total: on_track.total,
                    on_track_ratio: Ratio::percent(on_track.matched, on_track.total),
                },
                objectives_updated_recently: RecentUpdateSummary {
                    date_since: recent_label,
                    update_ratio: Ratio::percent(updated.matched, updated.total),
                    change: trend.change,
                    percentage_change: trend.percentage_change,
                    direction: trend.direction,
                },
                departments,
            })
        })
        .await
        .map_err(|e| Error::Database(e.to_string()))
}

/// Build the teams payload for one department. The lookup is a
/// case-insensitive exact match; an unknown name yields an empty team list,
/// not an error. The lead is excluded from the member list by user id, so a
/// member who merely shares the lead's full name stays listed.
pub async fn teams_for_department(
    db: &Database,
    department_name: &str,
) -> Result<DepartmentTeams> {
    let name = department_name.to_string();
    db.reader()
        .call(move |conn| {
            let mut teams = Vec::new();
            if let Some(dept) = repository::find_department_by_name(conn, &name)? {
                for team in repository::list_department_teams(conn, &dept.department_id)? {
                    let lead = match &team.team_lead_id {
                        Some(id) => repository::get_user(conn, id)?,
                        None => None,
                    };
                    let members = repository::list_team_users(conn, &team.team_id)?
                        .into_iter()
                        .filter(|u| lead.as_ref().is_none_or(|l| l.user_id != u.user_id))
                        .map(|u| u.full_name())
                        .collect();
                    teams.push(TeamRoster {
                        team_leader: lead.map(|l| l.full_name()).unwrap_or_default(),
                        members,
                    });
                }
            } else {
                log::debug!("no department matches {name:?}");
            }
            Ok::<_, rusqlite::Error>(DepartmentTeams {
                department: name,
                teams,
            })
        })
        .await
        .map_err(|e| Error::Database(e.to_string()))
}

// ── Aggregators ────────────────────────────────────────────────────

/// Windowed on-track counts over every objective in the store. Objectives
/// without key results count toward the total only.
pub fn on_track_summary(
    conn: &Connection,
    cutoff: NaiveDate,
) -> rusqlite::Result<WindowCounts> {
    let mut counts = WindowCounts::default();
    for objective in repository::list_all_objectives(conn)? {
        counts.total += 1;
        let krs = repository::list_objective_key_results(conn, &objective.objective_id)?;
        if status::is_on_track(&krs, cutoff) {
            counts.matched += 1;
        }
    }
    Ok(counts)
}

/// Counts of objectives with any key result updated since `cutoff`.
pub fn updated_summary(
    conn: &Connection,
    cutoff: NaiveDate,
) -> rusqlite::Result<WindowCounts> {
    let mut counts = WindowCounts::default();
    for objective in repository::list_all_objectives(conn)? {
        counts.total += 1;
        let krs = repository::list_objective_key_results(conn, &objective.objective_id)?;
        if status::is_recently_updated(&krs, cutoff) {
            counts.matched += 1;
        }
    }
    Ok(counts)
}

/// Counts of objectives with any key result updated in `[start, end]`.
pub fn updated_between_summary(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<WindowCounts> {
    let mut counts = WindowCounts::default();
    for objective in repository::list_all_objectives(conn)? {
        counts.total += 1;
        let krs = repository::list_objective_key_results(conn, &objective.objective_id)?;
        if status::is_updated_between(&krs, start, end) {
            counts.matched += 1;
        }
    }
    Ok(counts)
}

fn department_rollups(conn: &Connection) -> rusqlite::Result<Vec<DepartmentRollup>> {
    repository::list_departments(conn)?
        .iter()
        .map(|dept| department_rollup(conn, dept))
        .collect()
}

/// Roll one department up: team/user/objective counts plus the unwindowed
/// on-track ratio (an objective is on track here iff it has key results and
/// none is pending, regardless of update dates).
pub fn department_rollup(
    conn: &Connection,
    dept: &Department,
) -> rusqlite::Result<DepartmentRollup> {
    let mut teams_count = 0u64;
    let mut users_count = 0u64;
    let mut objectives_count = 0u64;
    let mut on_track = 0u64;

    for team in repository::list_department_teams(conn, &dept.department_id)? {
        teams_count += 1;
        for user in repository::list_team_users(conn, &team.team_id)? {
            users_count += 1;
            for objective in repository::list_user_objectives(conn, &user.user_id)? {
                objectives_count += 1;
                let krs =
                    repository::list_objective_key_results(conn, &objective.objective_id)?;
                if status::has_no_pending(&krs) {
                    on_track += 1;
                }
            }
        }
    }

    Ok(DepartmentRollup {
        name: dept.name.clone(),
        teams_count,
        users_count,
        objectives_count,
        objectives_on_track_ratio: Ratio::percent(on_track, objectives_count),
    })
}
