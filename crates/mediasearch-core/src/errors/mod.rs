//! Error handling for the media search compiler.
//! One error enum per subsystem, `thiserror` only.

pub mod cache_error;
pub mod compile_error;
pub mod config_error;
pub mod resolver_error;

pub use cache_error::CacheError;
pub use compile_error::CompileError;
pub use config_error::ConfigError;
pub use resolver_error::ResolverError;

/// Top-level error for the workspace.
#[derive(Debug, thiserror::Error)]
pub enum MediaSearchError {
    #[error("resolver error: {0}")]
    ResolverError(#[from] ResolverError),

    #[error("cache error: {0}")]
    CacheError(#[from] CacheError),

    #[error("compile error: {0}")]
    CompileError(#[from] CompileError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type MediaSearchResult<T> = Result<T, MediaSearchError>;
