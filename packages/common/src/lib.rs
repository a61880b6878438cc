//! # Formcraft Common
//!
//! Collaborator interfaces shared by the designer and the submission side,
//! with in-memory and file-backed implementations.

pub mod error;
pub mod notify;
pub mod persistence;
pub mod result;
pub mod sink;

pub use error::*;
pub use notify::*;
pub use persistence::*;
pub use result::*;
pub use sink::*;
