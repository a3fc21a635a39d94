//! Summary counters, attendance statistics and alert counters.

use super::records::{AttendanceRecord, Class, Exam, Fee, Student, Teacher};
use super::time::{parse_optional, same_month, weekday_matches};
use super::types::{AlertCounters, AttendanceStats, OutstandingFees, StatCard};
use chrono::{Datelike, NaiveDateTime, Weekday};
use std::cmp::Reverse;

/// True when the student registered in the calendar month of `now`.
///
/// Missing or invalid registration dates are never new.
pub fn is_new_this_month(student: &Student, now: NaiveDateTime) -> bool {
    parse_optional(student.tarikh_daftar.as_deref())
        .map(|registered| same_month(registered, now))
        .unwrap_or(false)
}

pub fn count_new_students(students: &[Student], now: NaiveDateTime) -> usize {
    students
        .iter()
        .filter(|s| is_new_this_month(s, now))
        .count()
}

/// Counts and sums every unpaid fee.
pub fn outstanding_fees(fees: &[Fee]) -> OutstandingFees {
    fees.iter()
        .filter(|fee| fee.is_outstanding())
        .fold(OutstandingFees::default(), |acc, fee| OutstandingFees {
            count: acc.count + 1,
            amount: acc.amount + fee.jumlah,
        })
}

/// True when any session of the class lists `day` among its weekdays.
pub fn runs_on(class: &Class, day: Weekday) -> bool {
    class
        .sessions
        .iter()
        .any(|session| session.days.iter().any(|name| weekday_matches(name, day)))
}

pub fn classes_running_on(classes: &[Class], day: Weekday) -> usize {
    classes.iter().filter(|c| runs_on(c, day)).count()
}

/// Builds the four summary cards shown to non-student roles.
pub fn main_stats(
    students: &[Student],
    teachers: &[Teacher],
    classes: &[Class],
    fees: &[Fee],
    now: NaiveDateTime,
) -> Vec<StatCard> {
    let active_students = students.iter().filter(|s| s.is_active()).count();
    let active_teachers = teachers.iter().filter(|t| t.is_active()).count();
    let active_classes = classes.iter().filter(|c| c.is_active()).count();
    let new_students = count_new_students(students, now);
    let running_today = classes_running_on(classes, now.weekday());
    let outstanding = outstanding_fees(fees);

    vec![
        StatCard {
            title: "Jumlah Pelajar".to_string(),
            value: active_students.to_string(),
            subtitle: Some(format!("{} baharu bulan ini", new_students)),
        },
        StatCard {
            title: "Jumlah Guru".to_string(),
            value: active_teachers.to_string(),
            subtitle: Some("Guru aktif".to_string()),
        },
        StatCard {
            title: "Kelas Aktif".to_string(),
            value: active_classes.to_string(),
            subtitle: Some(format!("{} kelas berjalan hari ini", running_today)),
        },
        StatCard {
            title: "Yuran Tertunggak".to_string(),
            value: format_ringgit(outstanding.amount),
            subtitle: Some(format!("{} bayaran belum dijelaskan", outstanding.count)),
        },
    ]
}

/// Counts a student's attendance records by status.
pub fn attendance_stats(records: &[AttendanceRecord]) -> AttendanceStats {
    let mut stats = AttendanceStats {
        total: records.len(),
        ..AttendanceStats::default()
    };

    for record in records {
        let status = record
            .status
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();

        match status.as_str() {
            "hadir" => stats.hadir += 1,
            "tidak hadir" => stats.tidak_hadir += 1,
            "lewat" => stats.lewat += 1,
            "sakit" => stats.sakit += 1,
            "cuti" => stats.cuti += 1,
            _ => {}
        }
    }

    stats.rate = attendance_rate(stats.hadir + stats.lewat, stats.total);
    stats
}

/// Percentage with one decimal place, 0.0 when there is nothing to count.
pub fn attendance_rate(present: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = present as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

/// Newest first; records without a usable date go last.
pub fn sort_attendance(records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| Reverse(parse_optional(r.tarikh.as_deref()).ok()));
    sorted
}

pub fn upcoming_exams(exams: &[Exam], now: NaiveDateTime) -> usize {
    exams
        .iter()
        .filter(|exam| {
            parse_optional(exam.tarikh_exam.as_deref())
                .map(|date| date > now)
                .unwrap_or(false)
        })
        .count()
}

pub fn alert_counters(
    students: &[Student],
    fees: &[Fee],
    exams: &[Exam],
    now: NaiveDateTime,
) -> AlertCounters {
    AlertCounters {
        outstanding_fees: outstanding_fees(fees).count,
        upcoming_exams: upcoming_exams(exams, now),
        new_students: count_new_students(students, now),
    }
}

/// Formats an amount as `RM 1,234.50`.
pub fn format_ringgit(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}RM {}.{}", sign, grouped, cents)
}
