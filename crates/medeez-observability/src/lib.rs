//! # Medeez Observability
//!
//! - [`logging`]: tracing subscriber setup and the request logging middleware
//! - [`audit`]: security audit events and the [`AuditSink`] seam
//! - [`metrics`]: Prometheus recorder and security counters
//!
//! # Example
//!
//! ```ignore
//! use medeez_observability::{init_logging, init_metrics};
//!
//! let _guard = init_logging(&LoggingConfig::from_env())?;
//! let handle = init_metrics(&logging_config)?;
//! ```

pub mod audit;
pub mod logging;
pub mod metrics;

pub use self::audit::{AuditEvent, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use self::logging::{init_logging, logging_middleware};
pub use self::metrics::{PrometheusHandle, init_metrics, metrics_app, track_audit_event};
