//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign and echo X-Request-ID)
//!     → forward::ProxyForward (trigger header present?)
//!         yes → upstream named by the trigger header
//!         no  → passthrough.rs (configured downstream, or 404)
//! ```

pub mod passthrough;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
