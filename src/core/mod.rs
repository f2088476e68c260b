// src/core/mod.rs

//! Profiles, detection, staging and dispatch.

pub mod config;
pub mod detection;
pub mod devfile;
pub mod dispatcher;
pub mod profile;
pub mod staging;
