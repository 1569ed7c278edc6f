//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / http / config produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (match outcomes, latency, reloads, route count)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never preformatted strings
//! - Request ID flows into every dispatch log line
//! - Metrics are cheap (atomic increments), safe on the hot path

pub mod logging;
pub mod metrics;
