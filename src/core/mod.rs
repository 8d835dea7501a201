//! Glue between the frontend and the workspace crates: unified errors and
//! filesystem locations.

pub mod errors;
pub mod paths;
