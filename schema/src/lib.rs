// Pokedex Arena Schema - Shared type definitions
// This crate holds the category chart and the record shapes shared between
// the main pokedex-arena crate and its build script, so the compiled enemy
// pool can be encoded with postcard at build time and decoded at runtime.

// Re-export the main types
pub use category::*;
pub use records::*;

pub mod category;
pub mod records;
