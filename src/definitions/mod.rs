//! Static language definitions: value types, license tiers, location tags
//! and the function catalog with its registry.
mod catalog;
mod function;
mod license;
mod registry;
mod types;

pub use function::*;
pub use license::*;
pub use registry::*;
pub use types::*;
