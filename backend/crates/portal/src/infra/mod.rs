//! Infrastructure Layer
//!
//! Provider implementations.

pub mod memory;
pub mod supabase;
