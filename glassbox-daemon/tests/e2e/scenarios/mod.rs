//! E2E test scenarios.

mod empty_world;
mod fault_isolation;
mod kubernetes_flow;
mod restart;
