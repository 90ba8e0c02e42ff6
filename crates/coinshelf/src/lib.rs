//! `coinshelf` - A local catalog for coin collections
//!
//! This library provides the core functionality for building coin collections
//! from a static series catalog, tracking which coins have been found, and
//! keeping older databases current as new production years ship.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod coin;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod params;
pub mod series;
pub mod storage;
pub mod upgrade;
pub mod worker;

pub use coin::CoinSlot;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use params::{CreationParameters, GenerationPlan};
pub use series::{CoinSeries, CURRENT_CATALOG_VERSION};
pub use storage::{CollectionSummary, Storage, StorageStats};
pub use upgrade::UpgradeReport;
pub use worker::StorageWorker;
