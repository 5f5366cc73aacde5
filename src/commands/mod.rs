//! Command implementations for meshctl

pub mod completions;
pub mod context;
pub mod deploy;
pub mod logs;
pub mod plan;
pub mod status;
pub mod stop;
pub mod version;
