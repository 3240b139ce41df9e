use axum::Json;
use axum::extract::{Path, Query, State};
use mochila_core::member::SortMode;
use serde::Deserialize;
use serde_json::json;

use super::{ApiJson, ApiResult};
use crate::app::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    sort: Option<String>,
    exclude_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQuery {
    viewer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[serde(default)]
    from_user_id: String,
    #[serde(default)]
    to_user_id: String,
}

/// `GET /api/members?sort=&excludeEmail=`
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult {
    let sort = SortMode::parse_or_default(query.sort.as_deref());
    let members = state
        .member_service
        .list_members(sort, query.exclude_email.as_deref())
        .await?;

    Ok(Json(json!({ "success": true, "members": members })))
}

/// `GET /api/members/{id}?viewerId=`
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> ApiResult {
    let member = state
        .member_service
        .get_member_detail(&id, query.viewer_id.as_deref())
        .await?;

    Ok(Json(json!({ "success": true, "member": member })))
}

/// `POST /api/members/likes`
pub async fn add_like(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LikeRequest>,
) -> ApiResult {
    let like = state
        .interaction_ledger
        .add_like(&body.from_user_id, &body.to_user_id)
        .await?;

    Ok(Json(json!({ "success": true, "like": like })))
}

/// `GET /api/members/likes/received/{user_id}`
pub async fn likes_received(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult {
    let likes = state.interaction_ledger.likes_received(&user_id).await?;
    Ok(Json(json!({ "success": true, "likes": likes })))
}

/// `GET /api/members/footprints/{user_id}`
pub async fn footprints(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult {
    let footprints = state.interaction_ledger.footprints(&user_id).await?;
    Ok(Json(json!({ "success": true, "footprints": footprints })))
}
