use super::{MessageBody, Pagination};
use crate::error::{ApiError, Operation};
use crate::state::AppState;
use crate::extract::{JsonBody, PathParams, QueryParams};
use axum::extract::State;
use axum::Json;
use roster_core::{Group, GroupId, ListQuery, RosterError, Student};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TransferParams {
    pub from_group_id: GroupId,
    pub to_group_id: GroupId,
}

pub async fn create_student(
    State(state): State<AppState>,
    JsonBody(student): JsonBody<Student>,
) -> Result<Json<Student>, ApiError> {
    state
        .run(Operation::CreateStudent, move |roster| {
            roster.students().create_student(student)
        })
        .await
        .map(Json)
}

pub async fn list_students(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let query = ListQuery::from(page);
    state
        .run(Operation::ListStudents, move |roster| {
            roster.students().list_students(&query)
        })
        .await
        .map(Json)
}

pub async fn get_student(
    State(state): State<AppState>,
    PathParams(student_id): PathParams<String>,
) -> Result<Json<Student>, ApiError> {
    state
        .run(Operation::GetStudent, move |roster| {
            roster
                .students()
                .get_student(&student_id)?
                .ok_or(RosterError::StudentNotFound(student_id))
        })
        .await
        .map(Json)
}

pub async fn delete_student(
    State(state): State<AppState>,
    PathParams(student_id): PathParams<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .run(Operation::DeleteStudent, move |roster| {
            roster.students().delete_student(&student_id)
        })
        .await?;
    Ok(Json(MessageBody::new("Student deleted")))
}

pub async fn student_groups(
    State(state): State<AppState>,
    PathParams(student_id): PathParams<String>,
) -> Result<Json<Vec<Group>>, ApiError> {
    state
        .run(Operation::StudentGroups, move |roster| {
            roster.membership().groups_of_student(&student_id)
        })
        .await
        .map(Json)
}

pub async fn transfer_student(
    State(state): State<AppState>,
    PathParams(student_id): PathParams<String>,
    QueryParams(params): QueryParams<TransferParams>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .run(Operation::Transfer, move |roster| {
            roster.membership().transfer_student(
                &student_id,
                params.from_group_id,
                params.to_group_id,
            )
        })
        .await?;
    Ok(Json(MessageBody::new("Student transferred successfully")))
}
