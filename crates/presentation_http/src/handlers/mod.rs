//! HTTP request handlers

pub mod demo;
pub mod failpoints;
