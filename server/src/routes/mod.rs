//! HTTP route handlers

pub mod classify;
pub mod detect;
pub mod health;
pub mod root;
