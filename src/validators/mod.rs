//! Request validators: field-level rules used by `validator` derives, and
//! cross-field checks used by services.

pub mod common;
pub mod user;

pub use common::*;
pub use user::*;
