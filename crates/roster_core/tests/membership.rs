use roster_core::db::open_db_in_memory;
use roster_core::{ErrorKind, NewGroup, Roster, RosterError, Student};
use rusqlite::Connection;

fn member_ids(roster: &Roster<'_>, group_id: i64) -> Vec<String> {
    roster
        .membership()
        .list_members(group_id)
        .unwrap()
        .into_iter()
        .map(|student| student.id)
        .collect()
}

fn seed_student(roster: &Roster<'_>, id: &str) {
    roster
        .students()
        .create_student(Student::new(id, id.to_uppercase(), format!("{id}@x.com")))
        .unwrap();
}

fn seed_group(roster: &Roster<'_>, name: &str) -> i64 {
    roster.groups().create_group(NewGroup::new(name)).unwrap().id
}

fn membership_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM group_members;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_list_duplicate_remove_walkthrough() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    roster
        .students()
        .create_student(Student::new("s1", "Ann", "a@x.com"))
        .unwrap();
    let math = seed_group(&roster, "Math");
    assert_eq!(math, 1);

    roster.membership().add_student("s1", math).unwrap();
    assert_eq!(member_ids(&roster, math), ["s1"]);

    let err = roster.membership().add_student("s1", math).unwrap_err();
    assert!(matches!(err, RosterError::AlreadyMember { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    roster.membership().remove_student("s1", math).unwrap();
    assert!(member_ids(&roster, math).is_empty());
}

#[test]
fn add_reports_which_side_is_missing() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    let math = seed_group(&roster, "Math");

    let err = roster.membership().add_student("ghost", math).unwrap_err();
    assert!(matches!(err, RosterError::StudentNotFound(ref id) if id == "ghost"));

    let err = roster.membership().add_student("s1", 99).unwrap_err();
    assert!(matches!(err, RosterError::GroupNotFound(99)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(membership_rows(&conn), 0);
}

#[test]
fn remove_absent_pair_is_not_member() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    let math = seed_group(&roster, "Math");

    let err = roster.membership().remove_student("s1", math).unwrap_err();
    assert!(matches!(err, RosterError::NotMember { .. }));

    let err = roster.membership().remove_student("s1", 7).unwrap_err();
    assert!(matches!(err, RosterError::GroupNotFound(7)));
}

#[test]
fn add_then_remove_restores_previous_membership() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    for id in ["s1", "s2", "s3"] {
        seed_student(&roster, id);
    }
    let math = seed_group(&roster, "Math");
    roster.membership().add_student("s1", math).unwrap();
    roster.membership().add_student("s3", math).unwrap();
    let before = member_ids(&roster, math);

    roster.membership().add_student("s2", math).unwrap();
    roster.membership().remove_student("s2", math).unwrap();

    assert_eq!(member_ids(&roster, math), before);
}

#[test]
fn list_members_of_missing_group_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();

    let err = roster.membership().list_members(5).unwrap_err();
    assert!(matches!(err, RosterError::GroupNotFound(5)));
}

#[test]
fn members_reflect_latest_add_or_remove_per_student() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    for id in ["a", "b", "c", "d"] {
        seed_student(&roster, id);
    }
    let g = seed_group(&roster, "G");
    let membership = roster.membership();

    membership.add_student("a", g).unwrap();
    membership.add_student("b", g).unwrap();
    membership.add_student("c", g).unwrap();
    membership.remove_student("b", g).unwrap();
    membership.add_student("d", g).unwrap();
    membership.remove_student("a", g).unwrap();
    membership.add_student("b", g).unwrap();

    assert_eq!(member_ids(&roster, g), ["c", "d", "b"]);
}

#[test]
fn transfer_moves_student_between_groups() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    let from = seed_group(&roster, "A");
    let to = seed_group(&roster, "B");
    roster.membership().add_student("s1", from).unwrap();

    roster.membership().transfer_student("s1", from, to).unwrap();

    assert!(member_ids(&roster, from).is_empty());
    assert_eq!(member_ids(&roster, to), ["s1"]);
    let groups = roster.membership().groups_of_student("s1").unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, to);
}

#[test]
fn transfer_when_not_in_source_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    seed_student(&roster, "s2");
    let from = seed_group(&roster, "A");
    let to = seed_group(&roster, "B");
    roster.membership().add_student("s2", to).unwrap();

    let err = roster
        .membership()
        .transfer_student("s1", from, to)
        .unwrap_err();
    assert!(matches!(
        err,
        RosterError::NotInSourceGroup { ref student_id, group_id }
            if student_id == "s1" && group_id == from
    ));

    assert!(member_ids(&roster, from).is_empty());
    assert_eq!(member_ids(&roster, to), ["s2"]);
}

#[test]
fn transfer_when_already_in_target_keeps_both_memberships() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    let from = seed_group(&roster, "A");
    let to = seed_group(&roster, "B");
    roster.membership().add_student("s1", from).unwrap();
    roster.membership().add_student("s1", to).unwrap();

    let err = roster
        .membership()
        .transfer_student("s1", from, to)
        .unwrap_err();
    assert!(matches!(err, RosterError::AlreadyInTargetGroup { group_id, .. } if group_id == to));

    assert_eq!(member_ids(&roster, from), ["s1"]);
    assert_eq!(member_ids(&roster, to), ["s1"]);
}

#[test]
fn transfer_into_same_group_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    let g = seed_group(&roster, "A");
    roster.membership().add_student("s1", g).unwrap();

    let err = roster.membership().transfer_student("s1", g, g).unwrap_err();
    assert!(matches!(err, RosterError::AlreadyInTargetGroup { .. }));
    assert_eq!(member_ids(&roster, g), ["s1"]);
}

#[test]
fn transfer_with_missing_entity_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    let from = seed_group(&roster, "A");
    roster.membership().add_student("s1", from).unwrap();

    let err = roster
        .membership()
        .transfer_student("ghost", from, from)
        .unwrap_err();
    assert!(matches!(err, RosterError::StudentNotFound(_)));

    let err = roster
        .membership()
        .transfer_student("s1", from, 404)
        .unwrap_err();
    assert!(matches!(err, RosterError::GroupNotFound(404)));

    let err = roster
        .membership()
        .transfer_student("s1", 404, from)
        .unwrap_err();
    assert!(matches!(err, RosterError::GroupNotFound(404)));

    assert_eq!(member_ids(&roster, from), ["s1"]);
}

#[test]
fn deleting_student_removes_it_from_every_group() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    seed_student(&roster, "s2");
    let a = seed_group(&roster, "A");
    let b = seed_group(&roster, "B");
    for g in [a, b] {
        roster.membership().add_student("s1", g).unwrap();
        roster.membership().add_student("s2", g).unwrap();
    }

    roster.students().delete_student("s1").unwrap();

    assert_eq!(member_ids(&roster, a), ["s2"]);
    assert_eq!(member_ids(&roster, b), ["s2"]);
    assert_eq!(membership_rows(&conn), 2);
}

#[test]
fn deleting_group_removes_it_from_every_student() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    seed_student(&roster, "s2");
    let a = seed_group(&roster, "A");
    let b = seed_group(&roster, "B");
    for id in ["s1", "s2"] {
        roster.membership().add_student(id, a).unwrap();
        roster.membership().add_student(id, b).unwrap();
    }

    roster.groups().delete_group(a).unwrap();

    for id in ["s1", "s2"] {
        let groups = roster.membership().groups_of_student(id).unwrap();
        let ids: Vec<_> = groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, [b]);
    }
}

#[test]
fn groups_of_missing_student_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();

    let err = roster.membership().groups_of_student("nobody").unwrap_err();
    assert!(matches!(err, RosterError::StudentNotFound(_)));
}

#[test]
fn second_connection_rejects_existing_membership() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let first = roster_core::db::open_db(&path).unwrap();
    let second = roster_core::db::open_db(&path).unwrap();

    let roster_a = Roster::try_new(&first).unwrap();
    seed_student(&roster_a, "s1");
    let g = seed_group(&roster_a, "G");

    let roster_b = Roster::try_new(&second).unwrap();
    roster_a.membership().add_student("s1", g).unwrap();
    let err = roster_b.membership().add_student("s1", g).unwrap_err();
    assert!(matches!(err, RosterError::AlreadyMember { .. }));
    assert_eq!(membership_rows(&first), 1);
}

#[test]
fn storage_rejects_duplicate_membership_row() {
    let conn = open_db_in_memory().unwrap();
    let roster = Roster::try_new(&conn).unwrap();
    seed_student(&roster, "s1");
    let g = seed_group(&roster, "G");
    roster.membership().add_student("s1", g).unwrap();

    let err = conn
        .execute(
            "INSERT INTO group_members (student_id, group_id) VALUES ('s1', ?1);",
            [g],
        )
        .unwrap_err();
    assert_eq!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    );
    assert_eq!(membership_rows(&conn), 1);
}
