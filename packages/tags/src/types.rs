// ABOUTME: Tag and ingredient type definitions
// ABOUTME: Both are user-owned names attachable to recipes, so they share one shape

use serde::{Deserialize, Serialize};

/// Which label table a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Tag,
    Ingredient,
}

impl LabelKind {
    pub fn table(self) -> &'static str {
        match self {
            LabelKind::Tag => "tags",
            LabelKind::Ingredient => "ingredients",
        }
    }

    /// Join table linking recipes to this kind
    pub fn link_table(self) -> &'static str {
        match self {
            LabelKind::Tag => "recipe_tags",
            LabelKind::Ingredient => "recipe_ingredients",
        }
    }

    /// Column of the join table that references this kind
    pub fn link_column(self) -> &'static str {
        match self {
            LabelKind::Tag => "tag_id",
            LabelKind::Ingredient => "ingredient_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LabelKind::Tag => "tag",
            LabelKind::Ingredient => "ingredient",
        }
    }
}

/// A row of a label table
pub trait LabelRecord: Send + Sync + Unpin + 'static {
    const KIND: LabelKind;

    fn from_parts(id: i64, user_id: i64, name: String) -> Self;
    fn id(&self) -> i64;
    fn user_id(&self) -> i64;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub user_id: i64,
}

macro_rules! impl_label_record {
    ($ty:ty, $kind:expr) => {
        impl LabelRecord for $ty {
            const KIND: LabelKind = $kind;

            fn from_parts(id: i64, user_id: i64, name: String) -> Self {
                Self { id, name, user_id }
            }

            fn id(&self) -> i64 {
                self.id
            }

            fn user_id(&self) -> i64 {
                self.user_id
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

impl_label_record!(Tag, LabelKind::Tag);
impl_label_record!(Ingredient, LabelKind::Ingredient);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelCreateInput {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelUpdateInput {
    pub name: Option<String>,
}

pub type TagCreateInput = LabelCreateInput;
pub type TagUpdateInput = LabelUpdateInput;
pub type IngredientCreateInput = LabelCreateInput;
pub type IngredientUpdateInput = LabelUpdateInput;

/// Options for listing labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelFilter {
    /// Only labels attached to at least one of the owner's recipes
    pub assigned_only: bool,
}

impl LabelFilter {
    pub fn assigned_only() -> Self {
        Self {
            assigned_only: true,
        }
    }
}
