pub mod ast;
pub mod errors;
pub mod query_file;

pub use ast::{
    ElementRole, GraphPattern, GraphQuery, Node, NodeFilter, QueryElement, TriplePattern,
};
pub use errors::QueryModelError;
pub use query_file::{OrderSpec, QueryFile};
