//! Today's class schedule.

use super::records::{Class, Session, Student, Teacher};
use super::time::{parse_time_of_day, weekday_matches};
use super::types::ScheduleEntry;
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

/// Placeholder used when a class has no resolvable teacher.
pub const UNKNOWN_TEACHER: &str = "N/A";

/// Builds the ordered list of class meetings for the weekday of `now`.
pub fn today_schedule(
    classes: &[Class],
    teachers: &[Teacher],
    students: &[Student],
    now: NaiveDateTime,
) -> Vec<ScheduleEntry> {
    let today = now.weekday();

    let mut entries: Vec<(NaiveTime, ScheduleEntry)> = classes
        .iter()
        .filter_map(|class| {
            class
                .sessions
                .iter()
                .find(|s| s.days.iter().any(|d| weekday_matches(d, today)))
                .map(|session| (class, session))
        })
        .flat_map(|(class, session)| entries_for_session(class, session, teachers, students, now))
        .collect();

    // Stable, so equal times keep class order.
    entries.sort_by_key(|(start, _)| (start.hour(), start.minute()));
    entries.into_iter().map(|(_, entry)| entry).collect()
}

fn entries_for_session(
    class: &Class,
    session: &Session,
    teachers: &[Teacher],
    students: &[Student],
    now: NaiveDateTime,
) -> Vec<(NaiveTime, ScheduleEntry)> {
    let teacher_name = resolve_teacher_name(class, teachers);
    let student_count = enrolled_students(class, students);

    let mut times = session.times.clone();
    times.sort();

    times
        .into_iter()
        .map(|time| {
            let start = parse_time_of_day(&time).unwrap_or_else(|e| {
                debug!(
                    class = class.display_name(),
                    error = %e,
                    "Defaulting session time to midnight"
                );
                NaiveTime::MIN
            });

            let entry = ScheduleEntry {
                time,
                class_name: class.display_name().to_string(),
                teacher_name: teacher_name.clone(),
                student_count,
                is_upcoming: start > now.time(),
            };
            (start, entry)
        })
        .collect()
}

fn resolve_teacher_name(class: &Class, teachers: &[Teacher]) -> String {
    class
        .guru_id
        .as_deref()
        .and_then(|guru_id| teachers.iter().find(|t| t.id.as_deref() == Some(guru_id)))
        .and_then(|t| t.nama.clone())
        .unwrap_or_else(|| UNKNOWN_TEACHER.to_string())
}

fn enrolled_students(class: &Class, students: &[Student]) -> usize {
    let Some(class_id) = class.id.as_deref() else {
        return 0;
    };
    students
        .iter()
        .filter(|s| s.kelas_id.as_deref() == Some(class_id))
        .count()
}
