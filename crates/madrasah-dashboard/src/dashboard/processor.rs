/// Dashboard view derivation
use super::announcements::rank_announcements;
use super::records::{Announcement, AttendanceRecord, Class, Exam, Fee, Student, Teacher};
use super::schedule::today_schedule;
use super::session::{Role, SessionContext};
use super::stats::{alert_counters, attendance_stats, main_stats, sort_attendance};
use super::types::*;
use chrono::NaiveDateTime;

/// Decoded records from one fetch batch.
#[derive(Debug, Clone, Default)]
pub struct FetchBatch {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<Class>,
    pub fees: Vec<Fee>,
    pub exams: Vec<Exam>,
    pub announcements: Vec<Announcement>,
    pub attendance: Vec<AttendanceRecord>,
}

/// Turns a fetch batch into the view models for one viewer
pub struct DashboardProcessor {
    context: SessionContext,
}

impl DashboardProcessor {
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }

    /// Computes every view model from `batch` as of `now`.
    ///
    /// Students get attendance statistics; every other role gets the summary
    /// cards. Never both.
    pub fn build_view(&self, batch: &FetchBatch, now: NaiveDateTime) -> DashboardView {
        let role = self.context.role;

        let (main_stats, attendance_stats, monthly_attendance) = if role == Role::Student {
            (
                Vec::new(),
                Some(attendance_stats(&batch.attendance)),
                sort_attendance(&batch.attendance),
            )
        } else {
            (
                main_stats(&batch.students, &batch.teachers, &batch.classes, &batch.fees, now),
                None,
                Vec::new(),
            )
        };

        let activities = synthesize_activities(&main_stats, now);

        DashboardView {
            role,
            today_schedule: today_schedule(&batch.classes, &batch.teachers, &batch.students, now),
            announcements: rank_announcements(&batch.announcements, role, now),
            alerts: alert_counters(&batch.students, &batch.fees, &batch.exams, now),
            main_stats,
            attendance_stats,
            monthly_attendance,
            activities,
            generated_at: now,
        }
    }
}

/// Placeholder activity feed: a single notice built from the first card.
pub fn synthesize_activities(main_stats: &[StatCard], now: NaiveDateTime) -> Vec<ActivityItem> {
    main_stats
        .first()
        .map(|card| ActivityItem {
            message: format!("{}: {}", card.title, card.value),
            timestamp: now,
        })
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn batch() -> FetchBatch {
        FetchBatch {
            students: serde_json::from_value(json!([
                {"id": 1, "status": "aktif", "kelas_id": 10, "tarikh_daftar": "2026-10-02"},
                {"id": 2, "status": "aktif", "kelas_id": 10}
            ]))
            .unwrap(),
            teachers: serde_json::from_value(json!([
                {"id": 5, "status": "aktif", "nama": "Ustaz Ali"}
            ]))
            .unwrap(),
            classes: serde_json::from_value(json!([{
                "id": 10, "nama_kelas": "Tahfiz", "status": "aktif", "guru_id": 5,
                "sessions": [{"days": ["Jumaat"], "times": ["10:00"]}]
            }]))
            .unwrap(),
            fees: serde_json::from_value(json!([{"jumlah": 80, "status": "tunggak"}])).unwrap(),
            exams: serde_json::from_value(json!([{"tarikh_exam": "2026-11-20"}])).unwrap(),
            announcements: serde_json::from_value(json!([{
                "title": "Cuti", "status": "published",
                "priority": "normal", "target_audience": "all"
            }]))
            .unwrap(),
            attendance: serde_json::from_value(json!([
                {"tarikh": "2026-10-01", "status": "hadir"},
                {"tarikh": "2026-10-02", "status": "sakit"}
            ]))
            .unwrap(),
        }
    }

    #[test]
    fn test_admin_view() {
        let processor = DashboardProcessor::new(SessionContext::new(Role::Admin, None));
        let view = processor.build_view(&batch(), now());

        assert_eq!(view.main_stats.len(), 4);
        assert!(view.attendance_stats.is_none());
        assert!(view.monthly_attendance.is_empty());
        assert_eq!(view.activities.len(), 1);
        assert_eq!(view.activities[0].message, "Jumlah Pelajar: 2");
        assert_eq!(view.today_schedule.len(), 1);
        assert_eq!(view.today_schedule[0].teacher_name, "Ustaz Ali");
        assert_eq!(view.today_schedule[0].student_count, 2);
        assert_eq!(view.announcements.len(), 1);
        assert_eq!(
            view.alerts,
            AlertCounters {
                outstanding_fees: 1,
                upcoming_exams: 1,
                new_students: 1,
            }
        );
    }

    #[test]
    fn test_student_view() {
        let context = SessionContext::new(Role::Student, Some("1".to_string()));
        let processor = DashboardProcessor::new(context);
        let view = processor.build_view(&batch(), now());

        assert!(view.main_stats.is_empty());
        assert!(view.activities.is_empty());
        let stats = view.attendance_stats.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.rate, 50.0);
        assert_eq!(view.monthly_attendance[0].tarikh.as_deref(), Some("2026-10-02"));
        // Alerts are computed independent of role.
        assert_eq!(view.alerts.new_students, 1);
    }
}
