//! Dashboard server session for native filters.
//!
//! This crate provides:
//! - The authentication handshake and session credentials
//! - Descriptor fetch and filter state upload
//! - `DashboardFilterSession`, which runs the whole sequence

pub mod client;
pub mod cookie;
pub mod orchestrator;
pub mod session;

pub use client::DashboardClient;
pub use cookie::session_cookie_from;
pub use orchestrator::DashboardFilterSession;
pub use session::SessionContext;
