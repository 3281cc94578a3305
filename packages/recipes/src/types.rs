// ABOUTME: Recipe type definitions
// ABOUTME: Recipes with their linked tags and ingredients, plus create/update inputs

use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use larder_tags::{Ingredient, LabelCreateInput, Tag};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub cost: Cost,
    pub time_minutes: i64,
    pub description: String,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    #[serde(skip)]
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreateInput {
    pub title: String,
    pub cost: Cost,
    pub time_minutes: i64,
    #[serde(default)]
    pub description: String,
    /// Tags by name; missing ones are created for the owner
    #[serde(default)]
    pub tags: Vec<LabelCreateInput>,
    #[serde(default)]
    pub ingredients: Vec<LabelCreateInput>,
}

/// Partial update; `tags`/`ingredients`, when present, replace the whole set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdateInput {
    pub title: Option<String>,
    pub cost: Option<Cost>,
    pub time_minutes: Option<i64>,
    pub description: Option<String>,
    pub tags: Option<Vec<LabelCreateInput>>,
    pub ingredients: Option<Vec<LabelCreateInput>>,
}

/// Restricts a recipe listing to recipes linked to any of the given ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tag_ids: Vec<i64>,
    pub ingredient_ids: Vec<i64>,
}
