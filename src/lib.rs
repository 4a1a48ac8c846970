//! # Transient Follow-up Decision Engine
//!
//! Decision engine for ground-based follow-up of astronomical transient
//! alerts.
//!
//! Given a transient alert (a sky position with an event time), a site and
//! a set of science follow-up programs, the crate decides per program
//! whether the alert should trigger an observation: it searches for the
//! earliest acceptable observation window, evaluates the program's cut
//! registry against the alert, and builds the pointing pattern for
//! accepted follow-ups.
//!
//! ## Architecture
//!
//! - [`models`]: Alerts, sky coordinates, sites, observability thresholds
//! - [`ephemeris`]: Sun/moon/target position provider trait and the
//!   built-in analytic implementation
//! - [`window`]: Observation window search over a sampled time grid
//! - [`cuts`]: Cut value coercion, evaluation and collection handling
//! - [`plugins`]: Custom cut plugin boundary and built-in plugin modules
//! - [`config`]: JSON science-program and site configuration
//! - [`pipeline`]: Per-alert orchestration across programs
//! - [`pointing`]: Wobble pointing pattern construction

pub mod config;
pub mod cuts;
pub mod ephemeris;
pub mod models;
pub mod pipeline;
pub mod plugins;
pub mod pointing;
pub mod window;
