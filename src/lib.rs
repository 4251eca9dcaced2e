//! Launch Ledger: aggregate queries over a space-launch mission dataset.
//!
//! The dataset is loaded once into an immutable [`dataset::Dataset`], shared
//! through a [`dataset::DatasetHandle`], and queried with a
//! [`query::QueryEngine`]. The [`api`] module serves those queries as JSON.

pub mod api;
pub mod config;
pub mod dataset;
pub mod models;
pub mod query;
