/// Dashboard aggregation module
pub mod aggregator;
pub mod announcements;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod processor;
pub mod records;
pub mod schedule;
pub mod session;
pub mod stats;
pub mod time;
mod types;

pub use aggregator::Dashboard;
pub use client::{HttpSchoolApi, ListQuery, SchoolApi, Source};
pub use config::DashboardConfig;
pub use error::{DashboardError, DerivationError};
pub use processor::{DashboardProcessor, FetchBatch};
pub use session::{Role, SessionContext};
pub use types::*;
