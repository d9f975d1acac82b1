//! CLI module graph.

pub mod action;
pub mod command;
#[cfg(feature = "ic")]
pub mod dispatch;
pub mod invest;
pub mod output;
pub mod paths;
pub mod pools;
pub mod portfolio;
pub mod proposals;
pub mod session;
pub mod wallet;
pub mod yields;
