// ABOUTME: Core constants and validation helpers for Larder
// ABOUTME: Foundational package shared by the storage, api and cli packages

pub mod constants;
pub mod utils;
pub mod validation;

// Re-export constants
pub use constants::{database_file, larder_dir, DATABASE_FILE_NAME};

// Re-export utilities
pub use utils::{parse_flag, parse_id_list};

// Re-export validation
pub use validation::{
    normalize_email, validate_email, validate_name, validate_password, ValidationError,
    MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};
