use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::models::{Department, KeyResult, Objective, SeedData, Team, User};

fn date_param(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.format("%Y-%m-%d").to_string())
}

fn date_column(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

// ── Departments ────────────────────────────────────────────────────

fn map_department(row: &Row<'_>) -> Result<Department, rusqlite::Error> {
    Ok(Department {
        department_id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        founded_on: date_column(row.get(3)?),
    })
}

pub fn upsert_department(
    conn: &Connection,
    dept: &Department,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO departments (department_id, name, location, founded_on)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            dept.department_id,
            dept.name,
            dept.location,
            date_param(dept.founded_on)
        ],
    )?;
    Ok(())
}

pub fn list_departments(conn: &Connection) -> Result<Vec<Department>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT department_id, name, location, founded_on
         FROM departments ORDER BY department_id",
    )?;
    let rows = stmt.query_map([], |row| map_department(row))?;
    rows.collect()
}

/// Case-insensitive exact match on department name.
pub fn find_department_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Department>, rusqlite::Error> {
    conn.query_row(
        "SELECT department_id, name, location, founded_on
         FROM departments WHERE LOWER(name) = LOWER(?1)
         ORDER BY department_id LIMIT 1",
        params![name],
        |row| map_department(row),
    )
    .optional()
}

// ── Teams ──────────────────────────────────────────────────────────

fn map_team(row: &Row<'_>) -> Result<Team, rusqlite::Error> {
    Ok(Team {
        team_id: row.get(0)?,
        team_lead_id: row.get(1)?,
        department_id: row.get(2)?,
        average_pay: row.get(3)?,
    })
}

pub fn upsert_team(conn: &Connection, team: &Team) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO teams (team_id, team_lead_id, department_id, average_pay)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            team.team_id,
            team.team_lead_id,
            team.department_id,
            team.average_pay
        ],
    )?;
    Ok(())
}

pub fn list_department_teams(
    conn: &Connection,
    department_id: &str,
) -> Result<Vec<Team>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT team_id, team_lead_id, department_id, average_pay
         FROM teams WHERE department_id = ?1 ORDER BY team_id",
    )?;
    let rows = stmt.query_map(params![department_id], |row| map_team(row))?;
    rows.collect()
}

// ── Users ──────────────────────────────────────────────────────────

fn map_user(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        user_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        team_id: row.get(3)?,
    })
}

pub fn upsert_user(conn: &Connection, user: &User) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO users (user_id, first_name, last_name, team_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![user.user_id, user.first_name, user.last_name, user.team_id],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, user_id: &str) -> Result<Option<User>, rusqlite::Error> {
    conn.query_row(
        "SELECT user_id, first_name, last_name, team_id FROM users WHERE user_id = ?1",
        params![user_id],
        |row| map_user(row),
    )
    .optional()
}

pub fn list_team_users(
    conn: &Connection,
    team_id: &str,
) -> Result<Vec<User>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT user_id, first_name, last_name, team_id
         FROM users WHERE team_id = ?1 ORDER BY user_id",
    )?;
    let rows = stmt.query_map(params![team_id], |row| map_user(row))?;
    rows.collect()
}

// ── Objectives ─────────────────────────────────────────────────────

fn map_objective(row: &Row<'_>) -> Result<Objective, rusqlite::Error> {
    Ok(Objective {
        objective_id: row.get(0)?,
        user_id: row.get(1)?,
        objective_text: row.get(2)?,
    })
}

pub fn upsert_objective(
    conn: &Connection,
    objective: &Objective,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO objectives (objective_id, user_id, objective_text)
         VALUES (?1, ?2, ?3)",
        params![
            objective.objective_id,
            objective.user_id,
            objective.objective_text
        ],
    )?;
    Ok(())
}

pub fn list_user_objectives(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<Objective>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT objective_id, user_id, objective_text
         FROM objectives WHERE user_id = ?1 ORDER BY objective_id",
    )?;
    let rows = stmt.query_map(params![user_id], |row| map_objective(row))?;
    rows.collect()
}

/// Every objective in the store, regardless of owner. The global summaries
/// iterate this explicitly rather than any implicit default scope.
pub fn list_all_objectives(conn: &Connection) -> Result<Vec<Objective>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT objective_id, user_id, objective_text FROM objectives ORDER BY objective_id",
    )?;
    let rows = stmt.query_map([], |row| map_objective(row))?;
    rows.collect()
}

// ── Key results ────────────────────────────────────────────────────

fn map_key_result(row: &Row<'_>) -> Result<KeyResult, rusqlite::Error> {
    Ok(KeyResult {
        keyresult_id: row.get(0)?,
        objective_id: row.get(1)?,
        keyresult_text: row.get(2)?,
        status: row.get(3)?,
        due_on: date_column(row.get(4)?),
        updated_on: date_column(row.get(5)?),
    })
}

pub fn upsert_key_result(
    conn: &Connection,
    kr: &KeyResult,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO key_results
         (keyresult_id, objective_id, keyresult_text, status, due_on, updated_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            kr.keyresult_id,
            kr.objective_id,
            kr.keyresult_text,
            kr.status,
            date_param(kr.due_on),
            date_param(kr.updated_on)
        ],
    )?;
    Ok(())
}

pub fn list_objective_key_results(
    conn: &Connection,
    objective_id: &str,
) -> Result<Vec<KeyResult>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT keyresult_id, objective_id, keyresult_text, status, due_on, updated_on
         FROM key_results WHERE objective_id = ?1 ORDER BY keyresult_id",
    )?;
    let rows = stmt.query_map(params![objective_id], |row| map_key_result(row))?;
    rows.collect()
}

// ── Seeding / status ───────────────────────────────────────────────

/// Load a fixture into the store inside one transaction. Rows are upserted
/// parent-first so FK checks pass. Returns the number of rows written.
pub fn seed(conn: &mut Connection, data: &SeedData) -> Result<usize, rusqlite::Error> {
    let tx = conn.transaction()?;
    for dept in &data.departments {
        upsert_department(&tx, dept)?;
    }
    for team in &data.teams {
        upsert_team(&tx, team)?;
    }
    for user in &data.users {
        upsert_user(&tx, user)?;
    }
    for objective in &data.objectives {
        upsert_objective(&tx, objective)?;
    }
    for kr in &data.key_results {
        upsert_key_result(&tx, kr)?;
    }
    tx.commit()?;
    Ok(data.departments.len()
        + data.teams.len()
        + data.users.len()
        + data.objectives.len()
        + data.key_results.len())
}

/// Per-table row counts for the `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetCounts {
    pub departments: i64,
    pub teams: i64,
    pub users: i64,
    pub objectives: i64,
    pub key_results: i64,
}

pub fn dataset_counts(conn: &Connection) -> Result<DatasetCounts, rusqlite::Error> {
    let count = |table: &str| -> Result<i64, rusqlite::Error> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
    };
    Ok(DatasetCounts {
        departments: count("departments")?,
        teams: count("teams")?,
        users: count("users")?,
        objectives: count("objectives")?,
        key_results: count("key_results")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::KeyResultStatus;
    use crate::storage::Database;

    fn fixture() -> SeedData {
        serde_json::from_str(
            r#"{
                "departments": [
                    {"department_id": "d1", "name": "Product", "location": "Berlin"},
                    {"department_id": "d2", "name": "Engineering"}
                ],
                "teams": [
                    {"team_id": "t1", "department_id": "d1", "team_lead_id": "u1"},
                    {"team_id": "t2", "department_id": "d2"}
                ],
                "users": [
                    {"user_id": "u1", "first_name": "Kai", "last_name": "Larsen", "team_id": "t1"},
                    {"user_id": "u2", "first_name": "Noor", "last_name": "Haddad", "team_id": "t1"}
                ],
                "objectives": [
                    {"objective_id": "o1", "user_id": "u1", "objective_text": "Ship onboarding"}
                ],
                "key_results": [
                    {"keyresult_id": "k1", "objective_id": "o1", "status": "Pending",
                     "due_on": "2025-09-30", "updated_on": "2025-08-10"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_seed_and_read_back() {
        let db = Database::open_memory().await.unwrap();
        let data = fixture();
        let written = db
            .writer()
            .call(move |conn| seed(conn, &data))
            .await
            .unwrap();
        assert_eq!(written, 8);

        let (depts, teams, users, objectives, krs) = db
            .reader()
            .call(|conn| {
                let depts = list_departments(conn)?;
                let teams = list_department_teams(conn, "d1")?;
                let users = list_team_users(conn, "t1")?;
                let objectives = list_user_objectives(conn, "u1")?;
                let krs = list_objective_key_results(conn, "o1")?;
                Ok::<_, rusqlite::Error>((depts, teams, users, objectives, krs))
            })
            .await
            .unwrap();

        assert_eq!(depts.len(), 2);
        assert_eq!(depts[0].name, "Product");
        assert_eq!(teams.len(), 1);
        assert_eq!(users.len(), 2);
        assert_eq!(objectives.len(), 1);
        assert_eq!(krs.len(), 1);
        assert_eq!(krs[0].status, KeyResultStatus::Pending);
        assert_eq!(
            krs[0].updated_on,
            NaiveDate::from_ymd_opt(2025, 8, 10)
        );
    }

    #[tokio::test]
    async fn test_department_lookup_ignores_case() {
        let db = Database::open_memory().await.unwrap();
        let data = fixture();
        db.writer()
            .call(move |conn| seed(conn, &data))
            .await
            .unwrap();

        let (lower, exact, missing) = db
            .reader()
            .call(|conn| {
                let lower = find_department_by_name(conn, "product")?;
                let exact = find_department_by_name(conn, "Product")?;
                let missing = find_department_by_name(conn, "Finance")?;
                Ok::<_, rusqlite::Error>((lower, exact, missing))
            })
            .await
            .unwrap();

        assert_eq!(lower.unwrap().department_id, "d1");
        assert_eq!(exact.unwrap().department_id, "d1");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_counts_reflect_seeded_rows() {
        let db = Database::open_memory().await.unwrap();
        let data = fixture();
        db.writer()
            .call(move |conn| seed(conn, &data))
            .await
            .unwrap();

        let counts = db
            .reader()
            .call(|conn| dataset_counts(conn))
            .await
            .unwrap();
        assert_eq!(counts.departments, 2);
        assert_eq!(counts.teams, 2);
        assert_eq!(counts.users, 2);
        assert_eq!(counts.objectives, 1);
        assert_eq!(counts.key_results, 1);
    }
}
