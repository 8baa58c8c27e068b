//! Student use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/delete entry points for students.
//!
//! # Invariants
//! - Create rejects a taken id before touching storage; storage also rejects
//!   it atomically, so a concurrent duplicate still fails with
//!   `StudentIdTaken` and the existing record stays unmodified.

use crate::model::student::Student;
use crate::repo::student_repo::StudentRepository;
use crate::repo::ListQuery;
use crate::service::{log_outcome, RosterError, RosterResult};

/// Use-case service wrapper for student operations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new student under its caller-supplied id.
    pub fn create_student(&self, student: Student) -> RosterResult<Student> {
        let context = format!("student_id={}", student.id);
        let result = self.try_create(student);
        log_outcome("student_create", &context, result)
    }

    fn try_create(&self, student: Student) -> RosterResult<Student> {
        student.validate()?;
        if self.repo.get_student(&student.id)?.is_some() {
            return Err(RosterError::StudentIdTaken(student.id));
        }
        self.repo.create_student(&student)?;
        Ok(student)
    }

    /// Loads one student. Absence is `Ok(None)`, not an error.
    pub fn get_student(&self, id: &str) -> RosterResult<Option<Student>> {
        Ok(self.repo.get_student(id)?)
    }

    /// Lists students in insertion order.
    pub fn list_students(&self, query: &ListQuery) -> RosterResult<Vec<Student>> {
        Ok(self.repo.list_students(query)?)
    }

    /// Deletes one student and every membership that references it.
    pub fn delete_student(&self, id: &str) -> RosterResult<Student> {
        let result = self.repo.delete_student(id).map_err(RosterError::from);
        log_outcome("student_delete", &format!("student_id={id}"), result)
    }
}
