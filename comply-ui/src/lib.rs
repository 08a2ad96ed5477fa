//! comply-ui: egui front end for the model compliance checker.
//!
//! The interesting part lives in [`controller`]: an explicit two-state
//! submit machine that the widgets merely reflect, so every observable
//! behavior is testable without a window.

pub mod app;
pub mod controller;
pub mod render;

pub use app::ComplianceApp;
pub use controller::{Controller, FormFields, Stage, SubmitOutcome, SubmitState};
