//! `ds-optimize`: how many agents does a dark store need?
//!
//! Sweeps an agent-count range, runs each count several times with
//! independent RNG streams, pools the runs into an [`AggregatedResult`], and
//! recommends the count with the lowest cost per delivered order.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`cost`]        | `CostRates`, `CostBreakdown`                              |
//! | [`aggregate`]   | `aggregate`, `AggregatedResult`, `DeliveryTimeStats`      |
//! | [`optimizer`]   | `WorkforceOptimizer`, `OptimizerConfig`, `Recommendation` |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs sweep jobs on Rayon's thread pool.                |
//! | `serde`    | Adds `Serialize`/`Deserialize` to configs and results. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ds_optimize::{OptimizerConfig, WorkforceOptimizer};
//!
//! let sweep = WorkforceOptimizer::new(OptimizerConfig::default())
//!     .optimize(&outcome.facilities, FacilityId(0), &polygon)?;
//! match sweep.recommendation {
//!     Recommendation::Feasible { agent_count, .. } => println!("staff {agent_count} agents"),
//!     Recommendation::NoFeasibleConfiguration => println!("no feasible configuration"),
//! }
//! ```

pub mod aggregate;
pub mod cost;
pub mod error;
pub mod optimizer;


pub use aggregate::{AggregatedResult, DeliveryTimeStats, aggregate};
pub use cost::{CostBreakdown, CostRates};
pub use error::{OptimizeError, OptimizeResult};
pub use optimizer::{OptimizerConfig, Recommendation, Sweep, WorkforceOptimizer};
