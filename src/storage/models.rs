use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// A department. Owns zero or more teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub department_id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub founded_on: Option<NaiveDate>,
}

/// A team. The lead is a regular user and may also appear as a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    #[serde(default)]
    pub team_lead_id: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub average_pay: Option<String>,
}

/// A user. `team_id = None` means unassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub team_id: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An objective, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub objective_id: String,
    pub user_id: String,
    #[serde(default)]
    pub objective_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyResultStatus {
    Pending,
    Complete,
}

impl KeyResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyResultStatus::Pending => "Pending",
            KeyResultStatus::Complete => "Complete",
        }
    }
}

impl ToSql for KeyResultStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for KeyResultStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Pending" => Ok(KeyResultStatus::Pending),
            "Complete" => Ok(KeyResultStatus::Complete),
            other => Err(FromSqlError::Other(
                format!("unknown key result status: {other}").into(),
            )),
        }
    }
}

/// A key result. `objective_id` is nullable in the schema but a detached key
/// result is invisible to every aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResult {
    pub keyresult_id: String,
    #[serde(default)]
    pub objective_id: Option<String>,
    #[serde(default)]
    pub keyresult_text: Option<String>,
    pub status: KeyResultStatus,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
    #[serde(default)]
    pub updated_on: Option<NaiveDate>,
}

/// JSON fixture shape consumed by `okrdash seed` and the tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
}
