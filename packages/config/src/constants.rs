// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Larder

// Server Configuration
pub const LARDER_API_PORT: &str = "LARDER_API_PORT";
pub const LARDER_API_HOST: &str = "LARDER_API_HOST";
pub const PORT: &str = "PORT"; // Legacy

// Database
pub const LARDER_DATABASE_PATH: &str = "LARDER_DATABASE_PATH";

// CORS Configuration
pub const LARDER_CORS_ORIGIN: &str = "LARDER_CORS_ORIGIN";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

// Defaults
pub const DEFAULT_API_PORT: u16 = 8000;
pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_LOG_FILTER: &str = "info";
