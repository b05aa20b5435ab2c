//! # questline
//!
//! Client-side progression layer for a gamified productivity app.
//!
//! The backend owns all persistent state and every business rule. This
//! crate mirrors that state in observable per-domain caches, sequences the
//! reloads that follow a cross-entity change (habit streaks, experience,
//! level-ups, quest and achievement updates), derives display views, and
//! queues transient level-up notifications.
//!
//! Start from [`ProgressionClient`], constructed over any [`remote::Transport`].

pub mod cache;
pub mod cascade;
pub mod client;
pub mod config;
pub mod dates;
pub mod error;
pub mod event;
pub mod model;
pub mod notify;
pub mod progression;
pub mod remote;
pub mod telemetry;
pub mod views;

pub use client::ProgressionClient;
pub use error::{Error, Result};
