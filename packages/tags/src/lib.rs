// ABOUTME: Tag and ingredient management for organizing recipes
// ABOUTME: Provides types and a user-scoped storage layer shared by both label kinds

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::{IngredientStorage, LabelStorage, TagStorage};
pub use types::{
    Ingredient, IngredientCreateInput, IngredientUpdateInput, LabelCreateInput, LabelFilter,
    LabelKind, LabelRecord, LabelUpdateInput, Tag, TagCreateInput, TagUpdateInput,
};
