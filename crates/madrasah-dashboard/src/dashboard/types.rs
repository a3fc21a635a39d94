/// View models derived from one fetch batch
use super::records::{Announcement, AttendanceRecord};
use super::session::Role;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One of the summary cards at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
}

/// A single class meeting in today's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub time: String,
    pub class_name: String,
    pub teacher_name: String,
    pub student_count: usize,
    pub is_upcoming: bool,
}

/// Monthly attendance counts for a student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub total: usize,
    pub hadir: usize,
    pub tidak_hadir: usize,
    pub lewat: usize,
    pub sakit: usize,
    pub cuti: usize,
    /// Percentage of present or late records, one decimal place
    pub rate: f64,
}

/// Synthesized notice shown in the activity panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub message: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounters {
    pub outstanding_fees: usize,
    pub upcoming_exams: usize,
    pub new_students: usize,
}

/// Unpaid fee totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutstandingFees {
    pub count: usize,
    pub amount: f64,
}

/// Everything the rendering layer needs, computed from one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub role: Role,
    /// Empty for the student role
    pub main_stats: Vec<StatCard>,
    pub today_schedule: Vec<ScheduleEntry>,
    /// Present only for the student role
    pub attendance_stats: Option<AttendanceStats>,
    pub monthly_attendance: Vec<AttendanceRecord>,
    pub announcements: Vec<Announcement>,
    pub activities: Vec<ActivityItem>,
    pub alerts: AlertCounters,
    pub generated_at: NaiveDateTime,
}

/// Published dashboard state read by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub loading: bool,
    pub error: Option<String>,
    pub view: Option<DashboardView>,
}
