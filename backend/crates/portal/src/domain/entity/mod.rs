//! Entity Module

pub mod app_access;
pub mod identity;
pub mod profile;
pub mod session;
