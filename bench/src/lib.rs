//! Benchmark utilities for Rusty ECS.
//!
//! This crate provides benchmarking infrastructure for the ECS runtime core:
//!
//! - **Microbenchmarks**: Individual coordinator operations (create/destroy, add/remove,
//!   lookup, dense and working-set iteration)
//! - **Scenario benchmarks**: A particle workload driven through a [`Schedule`] with per-frame
//!   entity churn
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_ecs_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_ecs_bench -- create_destroy
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.
//!
//! [`Schedule`]: rusty_ecs::ecs::Schedule

pub mod components;
pub mod scenarios;
