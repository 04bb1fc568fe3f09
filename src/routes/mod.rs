//! Routes Module
//!
//! HTTP route configuration and router assembly.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Router assembly, layers, health endpoint
//! └── api_routes.rs - REST endpoint wiring
//! ```

/// Router assembly
pub mod router;

/// REST endpoint wiring
pub mod api_routes;

pub use router::create_router;
