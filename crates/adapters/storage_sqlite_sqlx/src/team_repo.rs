//! `SQLite` implementation of [`TeamRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sanitrack_app::ports::TeamRepository;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{TeamId, UserId};
use sanitrack_domain::team::Team;

use crate::error::{StorageError, map_unique};

/// Wrapper for converting database rows into domain [`Team`].
struct Wrapper(Team);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Team> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let leader_id: String = row.try_get("leader_id")?;
        let member_count: i64 = row.try_get("member_count")?;

        let id = TeamId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let leader_id =
            UserId::from_str(&leader_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Team {
            id,
            code: row.try_get("code")?,
            leader_id,
            member_count: u16::try_from(member_count).unwrap_or(0),
            members: row.try_get("members")?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO teams (id, code, leader_id, member_count, members) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM teams WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM teams ORDER BY code";
const UPDATE: &str =
    "UPDATE teams SET code = ?, leader_id = ?, member_count = ?, members = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM teams WHERE id = ?";

/// `SQLite`-backed team repository.
pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TeamRepository for SqliteTeamRepository {
    async fn create(&self, team: Team) -> Result<Team, SanitrackError> {
        sqlx::query(INSERT)
            .bind(team.id.to_string())
            .bind(&team.code)
            .bind(team.leader_id.to_string())
            .bind(i64::from(team.member_count))
            .bind(&team.members)
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Team", team.code.clone()))?;

        Ok(team)
    }

    async fn get_by_id(&self, id: TeamId) -> Result<Option<Team>, SanitrackError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Team>, SanitrackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, team: Team) -> Result<Team, SanitrackError> {
        sqlx::query(UPDATE)
            .bind(&team.code)
            .bind(team.leader_id.to_string())
            .bind(i64::from(team.member_count))
            .bind(&team.members)
            .bind(team.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|err| map_unique(err, "Team", team.code.clone()))?;

        Ok(team)
    }

    async fn delete(&self, id: TeamId) -> Result<(), SanitrackError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
