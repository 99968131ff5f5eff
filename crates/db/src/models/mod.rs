//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the DTOs used for inserts and patches.

pub mod generated_readme;
pub mod generation_limit;

pub use generated_readme::{CreateGeneratedReadme, GeneratedReadme, UpdateGeneratedReadme};
pub use generation_limit::GenerationLimit;
