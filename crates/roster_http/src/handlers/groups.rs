use super::{MessageBody, Pagination};
use crate::error::{ApiError, Operation};
use crate::state::AppState;
use crate::extract::{JsonBody, PathParams, QueryParams};
use axum::extract::State;
use axum::Json;
use roster_core::{Group, GroupId, ListQuery, NewGroup, RosterError, Student};

pub async fn create_group(
    State(state): State<AppState>,
    JsonBody(group): JsonBody<NewGroup>,
) -> Result<Json<Group>, ApiError> {
    state
        .run(Operation::CreateGroup, move |roster| {
            roster.groups().create_group(group)
        })
        .await
        .map(Json)
}

pub async fn list_groups(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let query = ListQuery::from(page);
    state
        .run(Operation::ListGroups, move |roster| {
            roster.groups().list_groups(&query)
        })
        .await
        .map(Json)
}

pub async fn get_group(
    State(state): State<AppState>,
    PathParams(group_id): PathParams<GroupId>,
) -> Result<Json<Group>, ApiError> {
    state
        .run(Operation::GetGroup, move |roster| {
            roster
                .groups()
                .get_group(group_id)?
                .ok_or(RosterError::GroupNotFound(group_id))
        })
        .await
        .map(Json)
}

pub async fn delete_group(
    State(state): State<AppState>,
    PathParams(group_id): PathParams<GroupId>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .run(Operation::DeleteGroup, move |roster| {
            roster.groups().delete_group(group_id)
        })
        .await?;
    Ok(Json(MessageBody::new("Group deleted")))
}

pub async fn list_members(
    State(state): State<AppState>,
    PathParams(group_id): PathParams<GroupId>,
) -> Result<Json<Vec<Student>>, ApiError> {
    state
        .run(Operation::ListMembers, move |roster| {
            roster.membership().list_members(group_id)
        })
        .await
        .map(Json)
}

pub async fn add_student(
    State(state): State<AppState>,
    PathParams((group_id, student_id)): PathParams<(GroupId, String)>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .run(Operation::AddMember, move |roster| {
            roster.membership().add_student(&student_id, group_id)
        })
        .await?;
    Ok(Json(MessageBody::new("Student added to group")))
}

pub async fn remove_student(
    State(state): State<AppState>,
    PathParams((group_id, student_id)): PathParams<(GroupId, String)>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .run(Operation::RemoveMember, move |roster| {
            roster.membership().remove_student(&student_id, group_id)
        })
        .await?;
    Ok(Json(MessageBody::new("Student removed from group")))
}
