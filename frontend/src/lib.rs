//! Data-orchestration layer of the invoice dashboard: the service gateway
//! in front of the CRUD and AI backends, and one controller per page.

pub mod context;
pub mod controllers;
pub mod services;

pub use context::AppContext;
