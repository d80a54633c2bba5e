//! Graph query to SQL compilation.
//!
//! Each graph pattern becomes a [`JoinUnit`]: triple patterns are placed on
//! their predicate tables and inner-joined on shared variables.
//! [`GraphQueryCompiler`] then stitches the units of a query together, inner
//! joins for required elements and left outer joins for optional ones.
pub mod binder;
pub mod compiler;
pub mod errors;
pub mod filter_placement;
pub mod join_sequence;

#[cfg(test)]
mod tests;

pub use binder::{bind_pattern, BoundPattern, VariableBindings};
pub use compiler::GraphQueryCompiler;
pub use errors::QueryCompileError;
pub use filter_placement::{DeferredPredicates, FilterPool};
pub use join_sequence::{compile_graph_pattern, JoinUnit, UnitParts};
