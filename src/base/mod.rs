//! Base types and error handling.
//!
//! - [`AuditError`](auditerror::AuditError): error taxonomy for store and classification failures
//! - [`ReadState`](readstate::ReadState): cookie store read states
//! - [`IoResultExt`](context::IoResultExt): path context for IO errors

pub mod auditerror;
pub mod context;
pub mod readstate;
