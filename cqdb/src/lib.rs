//! An evaluator and minimizer for conjunctive queries over small on-disk
//! relational databases.
//!
//! The crate has two independent entry points sharing one data model:
//! [minimization](crate::minimization) computes the core of a conjunctive
//! query by homomorphism search, and [execution](crate::execution) translates
//! a query into a left-deep tree of pipelined operators evaluated over
//! csv-backed relations. See [api](crate::api) for the file-based interface
//! the command line uses.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(missing_docs, unused_import_braces, unused_qualifications)]

pub mod api;
pub mod error;
pub mod execution;
pub mod io;
pub mod minimization;
pub mod model;
