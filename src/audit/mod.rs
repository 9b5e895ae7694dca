//! Run auditing.

pub mod logger;
