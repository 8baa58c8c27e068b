//! Group repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `study_groups` table.
//! - Own the cascade that removes membership rows of a deleted group.
//!
//! # Invariants
//! - Group ids are generated by SQLite and never reused (`AUTOINCREMENT`).
//! - `study_groups.name` uniqueness violations surface as `GroupNameTaken`.

use super::{ensure_schema_ready, unique_violation_target, ListQuery, RepoError, RepoResult};
use crate::model::group::{Group, GroupId, NewGroup};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const GROUP_SELECT_SQL: &str = "SELECT
    id,
    name,
    description
FROM study_groups";

/// Repository interface for group CRUD operations.
pub trait GroupRepository {
    /// Inserts a group and returns it with its generated id.
    fn create_group(&self, group: &NewGroup) -> RepoResult<Group>;
    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>>;
    fn list_groups(&self, query: &ListQuery) -> RepoResult<Vec<Group>>;
    /// Deletes one group with all of its memberships and returns it.
    fn delete_group(&self, id: GroupId) -> RepoResult<Group>;
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "study_groups", &["id", "name", "description"])?;
        Ok(Self { conn })
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn create_group(&self, group: &NewGroup) -> RepoResult<Group> {
        group.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT INTO study_groups (name, description) VALUES (?1, ?2);",
            params![group.name.as_str(), group.description.as_deref()],
        );
        if let Err(err) = inserted {
            return Err(match unique_violation_target(&err) {
                Some("study_groups.name") => RepoError::GroupNameTaken(group.name.clone()),
                _ => err.into(),
            });
        }

        let id = tx.last_insert_rowid();
        let created = load_group(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("group {id} missing right after insert"))
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>> {
        load_group(self.conn, id)
    }

    fn list_groups(&self, query: &ListQuery) -> RepoResult<Vec<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GROUP_SELECT_SQL}
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![query.limit, query.skip])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(parse_group_row(row)?);
        }
        Ok(groups)
    }

    fn delete_group(&self, id: GroupId) -> RepoResult<Group> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let group = load_group(&tx, id)?.ok_or(RepoError::GroupNotFound(id))?;

        tx.execute("DELETE FROM group_members WHERE group_id = ?1;", [id])?;
        tx.execute("DELETE FROM study_groups WHERE id = ?1;", [id])?;

        tx.commit()?;
        Ok(group)
    }
}

pub(crate) fn load_group(conn: &Connection, id: GroupId) -> RepoResult<Option<Group>> {
    let mut stmt = conn.prepare(&format!("{GROUP_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_group_row(row)?));
    }
    Ok(None)
}

pub(crate) fn parse_group_row(row: &Row<'_>) -> RepoResult<Group> {
    let id: GroupId = row.get("id")?;
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in study_groups row {id}"
        )));
    }
    Ok(Group {
        id,
        name,
        description: row.get("description")?,
    })
}
