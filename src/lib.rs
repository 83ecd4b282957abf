//! Client engine for the theatre venue schedule backend.
//!
//! [`api`] talks to the REST backend, [`coordinator`] turns its loose
//! JSON into the snapshots calendar views render from, and [`commands`]
//! plus [`render`] are the CLI consumer of both. Pure normalization
//! lives in the `callboard-core` crate.

pub mod api;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod render;
