//! Value Object Module

pub mod app_id;
pub mod app_role;
pub mod email;
pub mod environment;
pub mod full_name;
pub mod global_role;
pub mod password;
pub mod token;
