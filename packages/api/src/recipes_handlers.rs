// ABOUTME: HTTP request handlers for recipe operations
// ABOUTME: CRUD on the caller's recipes plus tag and ingredient id filters

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use larder_core::parse_id_list;
use larder_recipes::{Recipe, RecipeCreateInput, RecipeFilter, RecipeUpdateInput};

use crate::auth::CurrentUser;
use crate::db::DbState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

/// Comma-separated id lists, e.g. `?tags=1,2&ingredients=3`
#[derive(Debug, Default, Deserialize)]
pub struct ListRecipesQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

impl ListRecipesQuery {
    fn filter(&self) -> ApiResult<RecipeFilter> {
        let ids = |field, value: &Option<String>| match value.as_deref() {
            Some(value) => parse_id_list(field, value),
            None => Ok(Vec::new()),
        };

        Ok(RecipeFilter {
            tag_ids: ids("tags", &self.tags)?,
            ingredient_ids: ids("ingredients", &self.ingredients)?,
        })
    }
}

pub async fn list_recipes(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiQuery(params): ApiQuery<ListRecipesQuery>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let filter = params.filter()?;
    info!("Listing recipes for user {} ({:?})", user.id, filter);

    let recipes = db.recipe_storage.list(user.id, &filter).await?;
    Ok(Json(recipes))
}

pub async fn create_recipe(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiJson(input): ApiJson<RecipeCreateInput>,
) -> ApiResult<(StatusCode, Json<Recipe>)> {
    info!("Creating recipe '{}' for user {}", input.title, user.id);

    let recipe = db.recipe_storage.create(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipe(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiPath(recipe_id): ApiPath<i64>,
) -> ApiResult<Json<Recipe>> {
    info!("Getting recipe: {}", recipe_id);

    let recipe = db.recipe_storage.get(user.id, recipe_id).await?;
    Ok(Json(recipe))
}

/// Partially update a recipe; `tags`/`ingredients`, when sent, replace the current set
pub async fn update_recipe(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiPath(recipe_id): ApiPath<i64>,
    ApiJson(input): ApiJson<RecipeUpdateInput>,
) -> ApiResult<Json<Recipe>> {
    info!("Updating recipe: {}", recipe_id);

    let recipe = db.recipe_storage.update(user.id, recipe_id, input).await?;
    Ok(Json(recipe))
}

pub async fn delete_recipe(
    State(db): State<DbState>,
    user: CurrentUser,
    ApiPath(recipe_id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    info!("Deleting recipe: {}", recipe_id);

    db.recipe_storage.delete(user.id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parses_id_lists() {
        let query = ListRecipesQuery {
            tags: Some("1, 2".to_string()),
            ingredients: None,
        };
        let filter = query.filter().unwrap();

        assert_eq!(filter.tag_ids, vec![1, 2]);
        assert!(filter.ingredient_ids.is_empty());
    }

    #[test]
    fn test_filter_rejects_bad_ids() {
        let query = ListRecipesQuery {
            tags: None,
            ingredients: Some("3,x".to_string()),
        };
        assert!(query.filter().is_err());
    }
}
