//! `ds-sim`: time-stepped dispatch simulation for one dark store.
//!
//! One tick is one minute.  A run serves a single facility with a fixed
//! number of agents and a steady stream of orders.
//!
//! # Tick loop
//!
//! ```text
//! until quota delivered, cancelled, or tick == max_sim_time:
//!   ① Generate:   while accumulator ≥ interval and quota not met, place
//!                 an order uniformly in the order disk; accumulator += 1.
//!   ② Dispatch:   snapshot pending orders and available agents; each order
//!                 (ascending id) claims the unclaimed agent with least ETA:
//!                   ETA = to_store + handling + store_to_customer
//!                 then apply all decisions.
//!   ③ Move:       every busy agent takes one state-machine step:
//!                   ToStore → AtStore → ToCustomer → Available (delivery)
//! ```
//!
//! # Determinism
//!
//! A run draws every random number (agent placement, speeds, order
//! locations) from the single [`SimRng`][ds_core::SimRng] handed to the
//! builder, so `(config, facility, polygon, agent count, rng seed)` fully
//! determines the [`RunStatistics`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ds_core::SimRng;
//! use ds_sim::{DispatchConfig, DispatchSimBuilder, NoopObserver};
//!
//! let mut sim = DispatchSimBuilder::new(DispatchConfig::default(), facility, polygon, 10, SimRng::new(7))
//!     .build()?;
//! let end = sim.run(&mut NoopObserver);
//! println!("{end:?}: {} delivered", sim.stats.orders_delivered);
//! ```

pub mod agent;
pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod order;
pub mod sim;
pub mod stats;


pub use agent::{Agent, AgentStatus, StepEvent};
pub use builder::DispatchSimBuilder;
pub use config::{AgentPlacement, DispatchConfig, PLACEMENT_ATTEMPTS};
pub use error::{SimError, SimResult};
pub use observer::{
    AgentSnapshotRow, NoopObserver, OrderSnapshotRow, SimObserver, Snapshot, SnapshotRecorder, TickSummary,
};
pub use order::{Order, OrderStatus};
pub use sim::DispatchSim;
pub use stats::{AgentOutcome, RunEnd, RunStatistics};
