//! weave - aspect interception for plain Rust values
//!
//! The library side of the `weave` binary: a demo `Ledger` target and the
//! plan runner that replays operations through a proxy.

pub mod ledger;
pub mod plan;

pub use ledger::Ledger;
pub use plan::{run_plan, OpReport, Operation, Plan, PlanReport};
