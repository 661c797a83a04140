//! Presentation Layer
//!
//! HTTP handlers, DTOs, the guard middleware and the router.

pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
