use serde::{Serialize, Serializer};

/// An integer percentage (0–100), or the `"--"` sentinel when the
/// denominator was zero and the ratio is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ratio {
    Percent(i64),
    NotApplicable,
}

impl Ratio {
    /// `count / total` as a whole percentage, rounded half-away-from-zero
    /// (`f64::round`). A zero total yields `NotApplicable`, never a panic.
    pub fn percent(count: u64, total: u64) -> Ratio {
        if total == 0 {
            Ratio::NotApplicable
        } else {
            Ratio::Percent((count as f64 / total as f64 * 100.0).round() as i64)
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Percent(v) => serializer.serialize_i64(*v),
            Ratio::NotApplicable => serializer.serialize_str("--"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Matched / total objective counts for one time window. Named fields,
/// never a positional pair: the two values are too easy to swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCounts {
    pub matched: u64,
    pub total: u64,
}

/// Output of comparing two windows of update counts.
#[derive(Debug, Clone, Serialize)]
pub struct Trend {
    pub change: u64,
    pub percentage_change: Ratio,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnTrackSummary {
    pub date_since: String,
    pub on_track: u64,
    pub total: u64,
    pub on_track_ratio: Ratio,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentUpdateSummary {
    pub date_since: String,
    pub update_ratio: Ratio,
    pub change: u64,
    pub percentage_change: Ratio,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentRollup {
    pub name: String,
    pub teams_count: u64,
    pub users_count: u64,
    pub objectives_count: u64,
    pub objectives_on_track_ratio: Ratio,
}

/// Payload of `GET /departments`.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentsOverview {
    pub objectives_on_track: OnTrackSummary,
    pub objectives_updated_recently: RecentUpdateSummary,
    pub departments: Vec<DepartmentRollup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamRoster {
    pub team_leader: String,
    pub members: Vec<String>,
}

/// Payload of `GET /teams`.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentTeams {
    pub department: String,
    pub teams: Vec<TeamRoster>,
}
