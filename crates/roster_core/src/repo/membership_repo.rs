//! Student/group membership repository and SQLite implementation.
//!
//! # Responsibility
//! - Own every mutation of the `group_members` relation.
//! - Serve the two derived views: members of a group, groups of a student.
//!
//! # Invariants
//! - A (student, group) pair is stored at most once; the composite primary
//!   key rejects duplicates even when two writers race past the check.
//! - Lookups, checks and mutations of one operation share one IMMEDIATE
//!   transaction; a failed precondition rolls everything back.
//! - `transfer_member` removes and inserts inside the same transaction.

use super::group_repo::{load_group, parse_group_row};
use super::student_repo::{load_student, parse_student_row};
use super::{ensure_schema_ready, unique_violation_target, RepoError, RepoResult};
use crate::model::group::{Group, GroupId};
use crate::model::student::Student;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// Repository interface for membership operations.
pub trait MembershipRepository {
    /// Inserts the pair; fails when either side is missing or the pair exists.
    fn add_member(&self, student_id: &str, group_id: GroupId) -> RepoResult<()>;
    /// Deletes the pair; fails when either side is missing or the pair is absent.
    fn remove_member(&self, student_id: &str, group_id: GroupId) -> RepoResult<()>;
    /// Lists students of one group in membership insertion order.
    fn list_members(&self, group_id: GroupId) -> RepoResult<Vec<Student>>;
    /// Lists groups of one student in membership insertion order.
    fn list_student_groups(&self, student_id: &str) -> RepoResult<Vec<Group>>;
    /// Moves the student from one group to another, all-or-nothing.
    fn transfer_member(
        &self,
        student_id: &str,
        from_group_id: GroupId,
        to_group_id: GroupId,
    ) -> RepoResult<()>;
}

/// SQLite-backed membership repository.
pub struct SqliteMembershipRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMembershipRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "group_members", &["student_id", "group_id"])?;
        Ok(Self { conn })
    }
}

impl MembershipRepository for SqliteMembershipRepository<'_> {
    fn add_member(&self, student_id: &str, group_id: GroupId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_student_exists(&tx, student_id)?;
        ensure_group_exists(&tx, group_id)?;

        if membership_exists(&tx, student_id, group_id)? {
            return Err(RepoError::MembershipExists {
                student_id: student_id.to_string(),
                group_id,
            });
        }
        insert_membership(&tx, student_id, group_id)?;

        tx.commit()?;
        Ok(())
    }

    fn remove_member(&self, student_id: &str, group_id: GroupId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_student_exists(&tx, student_id)?;
        ensure_group_exists(&tx, group_id)?;

        delete_membership(&tx, student_id, group_id)?;

        tx.commit()?;
        Ok(())
    }

    fn list_members(&self, group_id: GroupId) -> RepoResult<Vec<Student>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        ensure_group_exists(&tx, group_id)?;

        let mut students = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT
                    s.id AS id,
                    s.name AS name,
                    s.email AS email,
                    s.information AS information
                 FROM group_members gm
                 INNER JOIN students s ON s.id = gm.student_id
                 WHERE gm.group_id = ?1
                 ORDER BY gm.rowid ASC;",
            )?;
            let mut rows = stmt.query([group_id])?;
            while let Some(row) = rows.next()? {
                students.push(parse_student_row(row)?);
            }
        }

        tx.commit()?;
        Ok(students)
    }

    fn list_student_groups(&self, student_id: &str) -> RepoResult<Vec<Group>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        ensure_student_exists(&tx, student_id)?;

        let mut groups = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT
                    g.id AS id,
                    g.name AS name,
                    g.description AS description
                 FROM group_members gm
                 INNER JOIN study_groups g ON g.id = gm.group_id
                 WHERE gm.student_id = ?1
                 ORDER BY gm.rowid ASC;",
            )?;
            let mut rows = stmt.query([student_id])?;
            while let Some(row) = rows.next()? {
                groups.push(parse_group_row(row)?);
            }
        }

        tx.commit()?;
        Ok(groups)
    }

    fn transfer_member(
        &self,
        student_id: &str,
        from_group_id: GroupId,
        to_group_id: GroupId,
    ) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_student_exists(&tx, student_id)?;
        ensure_group_exists(&tx, from_group_id)?;
        ensure_group_exists(&tx, to_group_id)?;

        if !membership_exists(&tx, student_id, from_group_id)? {
            return Err(RepoError::MembershipMissing {
                student_id: student_id.to_string(),
                group_id: from_group_id,
            });
        }
        if membership_exists(&tx, student_id, to_group_id)? {
            return Err(RepoError::MembershipExists {
                student_id: student_id.to_string(),
                group_id: to_group_id,
            });
        }

        delete_membership(&tx, student_id, from_group_id)?;
        insert_membership(&tx, student_id, to_group_id)?;

        tx.commit()?;
        Ok(())
    }
}

fn ensure_student_exists(conn: &Connection, student_id: &str) -> RepoResult<()> {
    match load_student(conn, student_id)? {
        Some(_) => Ok(()),
        None => Err(RepoError::StudentNotFound(student_id.to_string())),
    }
}

fn ensure_group_exists(conn: &Connection, group_id: GroupId) -> RepoResult<()> {
    match load_group(conn, group_id)? {
        Some(_) => Ok(()),
        None => Err(RepoError::GroupNotFound(group_id)),
    }
}

fn membership_exists(conn: &Connection, student_id: &str, group_id: GroupId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM group_members
            WHERE student_id = ?1
              AND group_id = ?2
        );",
        params![student_id, group_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn insert_membership(conn: &Connection, student_id: &str, group_id: GroupId) -> RepoResult<()> {
    let inserted = conn.execute(
        "INSERT INTO group_members (student_id, group_id) VALUES (?1, ?2);",
        params![student_id, group_id],
    );
    match inserted {
        Ok(_) => Ok(()),
        Err(err) if unique_violation_target(&err).is_some() => Err(RepoError::MembershipExists {
            student_id: student_id.to_string(),
            group_id,
        }),
        Err(err) => Err(err.into()),
    }
}

fn delete_membership(conn: &Connection, student_id: &str, group_id: GroupId) -> RepoResult<()> {
    let changed = conn.execute(
        "DELETE FROM group_members
         WHERE student_id = ?1
           AND group_id = ?2;",
        params![student_id, group_id],
    )?;
    if changed == 0 {
        return Err(RepoError::MembershipMissing {
            student_id: student_id.to_string(),
            group_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{insert_membership, membership_exists};
    use crate::db::open_db_in_memory;
    use crate::repo::RepoError;

    #[test]
    fn insert_maps_primary_key_violation_to_membership_exists() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "INSERT INTO students (id, name, email) VALUES ('s1', 'Ann', 'a@x.com');
             INSERT INTO study_groups (name) VALUES ('Math');",
        )
        .unwrap();

        insert_membership(&conn, "s1", 1).unwrap();
        assert!(membership_exists(&conn, "s1", 1).unwrap());

        let err = insert_membership(&conn, "s1", 1).unwrap_err();
        assert!(matches!(
            err,
            RepoError::MembershipExists { ref student_id, group_id: 1 } if student_id == "s1"
        ));
    }
}
