//! Announcement eligibility and ranking.

use super::records::Announcement;
use super::session::Role;
use super::time::{is_date_only, parse_datetime};
use chrono::NaiveDateTime;
use std::cmp::Reverse;

/// Maximum number of announcements shown on the dashboard.
pub const MAX_ANNOUNCEMENTS: usize = 5;

/// Numeric rank of a priority value; unknown priorities rank lowest.
pub fn priority_rank(priority: Option<&str>) -> u8 {
    match priority {
        Some("urgent") => 4,
        Some("high") => 3,
        Some("normal") => 2,
        Some("low") => 1,
        _ => 0,
    }
}

/// Checks the optional visibility window against `now`.
///
/// A bound that is present but unparsable makes the announcement invisible.
/// A date-only `end_date` covers the whole of that day.
fn within_window(announcement: &Announcement, now: NaiveDateTime) -> bool {
    if let Some(start) = announcement.start_date.as_deref() {
        match parse_datetime(start) {
            Ok(start) if start <= now => {}
            _ => return false,
        }
    }

    if let Some(raw_end) = announcement.end_date.as_deref() {
        let parsed = parse_datetime(raw_end).map(|end| {
            if is_date_only(raw_end) {
                end.date().and_hms_opt(23, 59, 59).unwrap_or(end)
            } else {
                end
            }
        });
        match parsed {
            Ok(end) if end >= now => {}
            _ => return false,
        }
    }

    true
}

fn audience_matches(announcement: &Announcement, role: Role) -> bool {
    match announcement.target_audience.as_deref() {
        Some("all") => true,
        Some(audience) => role.audience() == Some(audience),
        None => false,
    }
}

/// True when the announcement should be shown to a viewer with `role`.
///
/// Urgent and high priority announcements are shown even when the audience
/// does not match.
pub fn is_eligible(announcement: &Announcement, role: Role, now: NaiveDateTime) -> bool {
    if announcement.status.as_deref() != Some("published") {
        return false;
    }
    if !within_window(announcement, now) {
        return false;
    }

    audience_matches(announcement, role) || priority_rank(announcement.priority.as_deref()) >= 3
}

/// Filters, ranks and truncates the announcement feed.
pub fn rank_announcements(
    announcements: &[Announcement],
    role: Role,
    now: NaiveDateTime,
) -> Vec<Announcement> {
    let mut eligible: Vec<&Announcement> = announcements
        .iter()
        .filter(|a| is_eligible(a, role, now))
        .collect();

    eligible.sort_by_key(|a| {
        (
            Reverse(priority_rank(a.priority.as_deref())),
            Reverse(a.created_at.as_deref().and_then(|c| parse_datetime(c).ok())),
        )
    });

    eligible
        .into_iter()
        .take(MAX_ANNOUNCEMENTS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn announcement(
        title: &str,
        priority: &str,
        created: &str,
        audience: Option<&str>,
    ) -> Announcement {
        Announcement {
            title: Some(title.to_string()),
            status: Some("published".to_string()),
            priority: Some(priority.to_string()),
            created_at: Some(created.to_string()),
            target_audience: audience.map(str::to_string),
            ..Announcement::default()
        }
    }

    fn titles(items: &[Announcement]) -> Vec<&str> {
        items.iter().filter_map(|a| a.title.as_deref()).collect()
    }

    #[test]
    fn test_priority_beats_recency() {
        let items = vec![
            announcement("low", "low", "2026-10-15 09:00:00", Some("all")),
            announcement("urgent", "urgent", "2026-01-01 09:00:00", None),
        ];

        let ranked = rank_announcements(&items, Role::Admin, now());
        assert_eq!(titles(&ranked), vec!["urgent", "low"]);
    }

    #[test]
    fn test_ties_broken_by_newest_first() {
        let items = vec![
            announcement("older", "normal", "2026-10-01 08:00:00", Some("all")),
            announcement("undated", "normal", "", Some("all")),
            announcement("newer", "normal", "2026-10-10 08:00:00", Some("all")),
        ];

        let ranked = rank_announcements(&items, Role::Teacher, now());
        assert_eq!(titles(&ranked), vec!["newer", "older", "undated"]);
    }

    #[test]
    fn test_audience_and_fallback() {
        let items = vec![
            announcement("for students", "normal", "2026-10-01", Some("students")),
            announcement("for teachers", "normal", "2026-10-01", Some("teachers")),
            announcement("high for admin", "high", "2026-10-01", Some("admin")),
            announcement("mystery", "whatever", "2026-10-01", Some("parents")),
        ];

        let ranked = rank_announcements(&items, Role::Student, now());
        assert_eq!(titles(&ranked), vec!["high for admin", "for students"]);

        let ranked = rank_announcements(&items, Role::Unknown, now());
        assert_eq!(titles(&ranked), vec!["high for admin"]);
    }

    #[test]
    fn test_only_published_within_window() {
        let mut draft = announcement("draft", "urgent", "2026-10-01", Some("all"));
        draft.status = Some("draft".to_string());

        let mut future = announcement("future", "normal", "2026-10-01", Some("all"));
        future.start_date = Some("2026-10-17".to_string());

        let mut expired = announcement("expired", "normal", "2026-10-01", Some("all"));
        expired.end_date = Some("2026-10-15 23:00:00".to_string());

        let mut last_day = announcement("last day", "normal", "2026-10-01", Some("all"));
        last_day.start_date = Some("2026-10-16".to_string());
        last_day.end_date = Some("2026-10-16".to_string());

        let mut broken = announcement("broken", "normal", "2026-10-01", Some("all"));
        broken.end_date = Some("esok".to_string());

        let items = vec![draft, future, expired, last_day, broken];
        let ranked = rank_announcements(&items, Role::Admin, now());
        assert_eq!(titles(&ranked), vec!["last day"]);
    }

    #[test]
    fn test_truncated_to_five() {
        let items: Vec<_> = (1..=8)
            .map(|d| {
                let created = format!("2026-10-{:02}", d);
                announcement(&format!("a{}", d), "normal", &created, Some("all"))
            })
            .collect();

        let ranked = rank_announcements(&items, Role::Admin, now());
        assert_eq!(ranked.len(), MAX_ANNOUNCEMENTS);
        assert_eq!(titles(&ranked), vec!["a8", "a7", "a6", "a5", "a4"]);
    }
}
