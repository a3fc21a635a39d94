//! Dashboard aggregation for a madrasah administration backend.
//!
//! The [`dashboard`] module fetches students, teachers, classes, fees, exams,
//! announcements and attendance from the school API and derives the view models
//! shown on the dashboard. The [`server`] module exposes them over HTTP.

pub mod dashboard;
pub mod server;
pub mod types;
