//! triplegraph - SQL translation layer for predicate-partitioned triple stores
//!
//! This crate compiles graph queries over an RDF-style model into ANSI SQL:
//! - Triple pattern / filter query model
//! - Predicate to table catalog (YAML backed)
//! - Join ordering, variable binding and filter placement
//! - Structured SQL plan and text rendering

pub mod config;
pub mod query_compiler;
pub mod query_model;
pub mod render_plan;
pub mod sql_generator;
pub mod table_catalog;
