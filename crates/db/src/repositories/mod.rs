//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod rate_limit_repo;
pub mod readme_repo;

pub use rate_limit_repo::RateLimitRepo;
pub use readme_repo::ReadmeRepo;
