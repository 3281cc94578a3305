// ABOUTME: HTTP request handlers for tag and ingredient operations
// ABOUTME: One generic set of handlers serves both label kinds, always scoped to the caller

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use larder_core::parse_flag;
use larder_tags::{
    Ingredient, LabelCreateInput, LabelFilter, LabelRecord, LabelStorage, LabelUpdateInput, Tag,
};

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

/// A label kind exposed over HTTP
pub trait LabelResource: LabelRecord + Serialize + Sized {
    fn storage(db: &DbState) -> &LabelStorage<Self>;
}

impl LabelResource for Tag {
    fn storage(db: &DbState) -> &LabelStorage<Self> {
        &db.tag_storage
    }
}

impl LabelResource for Ingredient {
    fn storage(db: &DbState) -> &LabelStorage<Self> {
        &db.ingredient_storage
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListLabelsQuery {
    pub assigned_only: Option<String>,
}

impl ListLabelsQuery {
    fn filter(&self) -> ApiResult<LabelFilter> {
        let assigned_only = match self.assigned_only.as_deref() {
            Some(value) => parse_flag("assigned_only", value)?,
            None => false,
        };
        Ok(LabelFilter { assigned_only })
    }
}

/// List the caller's labels, optionally only those used by a recipe
pub async fn list_labels<L: LabelResource>(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiQuery(params): ApiQuery<ListLabelsQuery>,
) -> ApiResult<Json<Vec<L>>> {
    let filter = params.filter()?;
    info!(
        "Listing {}s for user {} (assigned_only: {})",
        L::KIND.label(),
        user.id,
        filter.assigned_only
    );

    let labels = L::storage(&db).list(user.id, filter).await?;
    Ok(Json(labels))
}

pub async fn create_label<L: LabelResource>(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiJson(input): ApiJson<LabelCreateInput>,
) -> ApiResult<(StatusCode, Json<L>)> {
    info!("Creating {} '{}'", L::KIND.label(), input.name);

    let label = L::storage(&db).create(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(label)))
}

pub async fn get_label<L: LabelResource>(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<L>> {
    info!("Getting {}: {}", L::KIND.label(), id);

    let label = L::storage(&db).get(user.id, id).await?;
    Ok(Json(label))
}

/// Partially update a label; fields left out of the body are unchanged
pub async fn update_label<L: LabelResource>(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<LabelUpdateInput>,
) -> ApiResult<Json<L>> {
    info!("Updating {}: {}", L::KIND.label(), id);

    let label = L::storage(&db).update(user.id, id, input).await?;
    Ok(Json(label))
}

pub async fn delete_label<L: LabelResource>(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    info!("Deleting {}: {}", L::KIND.label(), id);

    L::storage(&db).delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(value: Option<&str>) -> ListLabelsQuery {
        ListLabelsQuery {
            assigned_only: value.map(str::to_string),
        }
    }

    #[test]
    fn test_assigned_only_flag_parsing() {
        assert!(!query(None).filter().unwrap().assigned_only);
        assert!(!query(Some("0")).filter().unwrap().assigned_only);
        assert!(query(Some("1")).filter().unwrap().assigned_only);
        assert!(query(Some("true")).filter().unwrap().assigned_only);
        assert!(query(Some("maybe")).filter().is_err());
    }
}
