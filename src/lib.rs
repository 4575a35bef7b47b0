//! Stepwire core library.
//!
//! Builds the Steps to Actions structure model from reflected constructor
//! signatures, validates that every Actions type is implemented on every
//! platform (stubbing what can be stubbed), and generates the DI wiring
//! that connects Steps to the per-platform Actions.
//!
//! The library is driven through [`pipeline::run_round`]. The host supplies
//! constructor signatures and type queries through the traits in [`host`];
//! [`registry::TypeRegistry`] implements both from a Wirefile for the
//! standalone CLI.

pub mod artifact;
pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod emit;
pub mod generator;
pub mod hasher;
pub mod host;
pub mod java_gen;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod registry;
pub mod runner;
pub mod structure;
pub mod type_ref;
pub mod validator;
