// ABOUTME: Recipe management for Larder
// ABOUTME: Recipe types, the decimal cost type and storage with tag/ingredient links

pub mod cost;
pub mod storage;
pub mod types;

// Re-export main types
pub use cost::Cost;
pub use storage::RecipeStorage;
pub use types::{Recipe, RecipeCreateInput, RecipeFilter, RecipeUpdateInput};
