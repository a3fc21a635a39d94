//! Batch fetching and state publication.
//!
//! One refresh issues every list query concurrently and waits for all of them:
//! 1. students, teachers, classes, fees and exams are critical; any failure
//!    aborts the refresh and discards the batch
//! 2. announcements and attendance degrade to empty on failure
//! 3. attendance is only requested for a student with a known identifier,
//!    limited to the current calendar month
//!
//! State is published per viewer. Each `SessionContext` has its own
//! `DashboardState`, replaced in a single write, so a reader never sees view
//! models from two batches or from another viewer.

use super::client::{ListQuery, SchoolApi, Source};
use super::config::FetchLimits;
use super::error::DashboardError;
use super::normalize::decode_records;
use super::processor::{DashboardProcessor, FetchBatch};
use super::session::SessionContext;
use super::time::month_bounds;
use super::types::{DashboardState, DashboardView};
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Fetches one batch of records for `context`.
pub async fn fetch_batch(
    api: &dyn SchoolApi,
    context: &SessionContext,
    limits: FetchLimits,
    now: NaiveDateTime,
    correlation_id: &str,
) -> Result<FetchBatch, DashboardError> {
    let students_q = ListQuery::new(Source::Students, limits.records);
    let teachers_q = ListQuery::new(Source::Teachers, limits.records);
    let classes_q = ListQuery::new(Source::Classes, limits.records);
    let fees_q = ListQuery::new(Source::Fees, limits.records);
    let exams_q = ListQuery::new(Source::Exams, limits.records);
    let announcements_q =
        ListQuery::new(Source::Announcements, limits.announcements).with_status("published");
    let attendance_q = context.attendance_student_id().map(|student_id| {
        let (start, end) = month_bounds(now.date());
        ListQuery::new(Source::Attendance, limits.records).for_student(student_id, start, end)
    });

    let attendance = async {
        match &attendance_q {
            Some(query) => fetch_source(api, query, correlation_id).await,
            None => Ok(Value::Null),
        }
    };

    let (students, teachers, classes, fees, exams, announcements, attendance) = futures::join!(
        fetch_source(api, &students_q, correlation_id),
        fetch_source(api, &teachers_q, correlation_id),
        fetch_source(api, &classes_q, correlation_id),
        fetch_source(api, &fees_q, correlation_id),
        fetch_source(api, &exams_q, correlation_id),
        fetch_source(api, &announcements_q, correlation_id),
        attendance,
    );

    Ok(FetchBatch {
        students: decode_records(Source::Students.name(), students?),
        teachers: decode_records(Source::Teachers.name(), teachers?),
        classes: decode_records(Source::Classes.name(), classes?),
        fees: decode_records(Source::Fees.name(), fees?),
        exams: decode_records(Source::Exams.name(), exams?),
        announcements: decode_records(Source::Announcements.name(), announcements?),
        attendance: decode_records(Source::Attendance.name(), attendance?),
    })
}

/// Runs one query. A failed critical source is an error; any other failed
/// source yields `Value::Null`, which normalizes to no records.
async fn fetch_source(
    api: &dyn SchoolApi,
    query: &ListQuery,
    correlation_id: &str,
) -> Result<Value, DashboardError> {
    match api.list(query).await {
        Ok(value) => Ok(value),
        Err(e) if query.source.is_critical() => {
            error!(
                correlation_id = %correlation_id,
                source = %query.source,
                error = %e,
                "Critical source failed"
            );
            Err(DashboardError::SourceFailed {
                source_name: query.source.name().to_string(),
                message: e.to_string(),
            })
        }
        Err(e) => {
            warn!(
                correlation_id = %correlation_id,
                source = %query.source,
                error = %e,
                "Source failed, continuing without it"
            );
            Ok(Value::Null)
        }
    }
}

/// Owns the published dashboard states and the refresh operation.
pub struct Dashboard {
    api: Arc<dyn SchoolApi>,
    limits: FetchLimits,
    states: RwLock<HashMap<SessionContext, DashboardState>>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn SchoolApi>, limits: FetchLimits) -> Self {
        Self {
            api,
            limits,
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Refreshes the dashboard for `context` using the local wall clock.
    pub async fn refresh(
        &self,
        context: &SessionContext,
    ) -> Result<DashboardState, DashboardError> {
        self.refresh_at(context, Local::now().naive_local()).await
    }

    /// Refreshes the dashboard for `context` as of `now`.
    ///
    /// While the batch is in flight the viewer's previous view stays visible
    /// with `loading` set. On a critical failure the view is dropped, the
    /// localized message is published, and the cause is returned.
    pub async fn refresh_at(
        &self,
        context: &SessionContext,
        now: NaiveDateTime,
    ) -> Result<DashboardState, DashboardError> {
        self.states.write().await.entry(context.clone()).or_default().loading = true;

        let result = self.aggregate(context, now).await;
        let next = match &result {
            Ok(view) => DashboardState {
                loading: false,
                error: None,
                view: Some(view.clone()),
            },
            Err(e) => DashboardState {
                loading: false,
                error: Some(e.user_message().to_string()),
                view: None,
            },
        };

        self.states.write().await.insert(context.clone(), next.clone());
        result.map(|_| next)
    }

    /// Fetches and derives a view without touching the published state.
    pub async fn aggregate(
        &self,
        context: &SessionContext,
        now: NaiveDateTime,
    ) -> Result<DashboardView, DashboardError> {
        let correlation_id = generate_correlation_id();
        let start = Instant::now();

        info!(
            correlation_id = %correlation_id,
            role = ?context.role,
            "Starting dashboard refresh"
        );

        let batch = fetch_batch(self.api.as_ref(), context, self.limits, now, &correlation_id)
            .await
            .inspect_err(|e| {
                error!(
                    correlation_id = %correlation_id,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Dashboard refresh aborted"
                );
            })?;

        let view = DashboardProcessor::new(context.clone()).build_view(&batch, now);

        info!(
            correlation_id = %correlation_id,
            students = batch.students.len(),
            classes = batch.classes.len(),
            announcements = view.announcements.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Dashboard refresh completed"
        );

        Ok(view)
    }

    /// The last state published for `context`, or the initial state if it
    /// has never refreshed.
    pub async fn state(&self, context: &SessionContext) -> DashboardState {
        self.states
            .read()
            .await
            .get(context)
            .cloned()
            .unwrap_or_default()
    }
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
