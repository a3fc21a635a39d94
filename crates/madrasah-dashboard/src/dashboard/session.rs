//! Resolves who is looking at the dashboard.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Role of the viewing user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    #[default]
    Unknown,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "teacher" | "guru" => Role::Teacher,
            "student" | "pelajar" => Role::Student,
            _ => Role::Unknown,
        }
    }

    /// Announcement audience value addressed to this role.
    pub fn audience(&self) -> Option<&'static str> {
        match self {
            Role::Admin => Some("admin"),
            Role::Teacher => Some("teachers"),
            Role::Student => Some("students"),
            Role::Unknown => None,
        }
    }
}

/// The viewer's role and identifier, passed explicitly into the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionContext {
    pub role: Role,
    pub user_id: Option<String>,
}

impl SessionContext {
    pub fn new(role: Role, user_id: Option<String>) -> Self {
        Self { role, user_id }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builds a context from the raw session-store blob.
    ///
    /// Absent or unparsable input yields an anonymous context; this never fails.
    pub fn from_store(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::anonymous();
        };

        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Could not parse session, continuing as unknown role");
                return Self::anonymous();
            }
        };

        let Value::Object(map) = value else {
            warn!("Session is not an object, continuing as unknown role");
            return Self::anonymous();
        };

        let role = map
            .get("role")
            .and_then(Value::as_str)
            .map(Role::parse)
            .unwrap_or_default();

        let user_id = ["id", "user_id", "student_id"]
            .iter()
            .find_map(|key| match map.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            });

        Self { role, user_id }
    }

    /// Attendance is only fetched for a student with a known identifier.
    pub fn attendance_student_id(&self) -> Option<&str> {
        match self.role {
            Role::Student => self.user_id.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_session() {
        let ctx = SessionContext::from_store(Some(r#"{"role":"pelajar","id":42}"#));
        assert_eq!(ctx.role, Role::Student);
        assert_eq!(ctx.user_id.as_deref(), Some("42"));
        assert_eq!(ctx.attendance_student_id(), Some("42"));
    }

    #[test]
    fn test_teacher_has_no_attendance_id() {
        let ctx = SessionContext::from_store(Some(r#"{"role":"guru","user_id":"g-1"}"#));
        assert_eq!(ctx.role, Role::Teacher);
        assert_eq!(ctx.attendance_student_id(), None);
    }

    #[test]
    fn test_garbage_is_anonymous() {
        assert_eq!(SessionContext::from_store(None), SessionContext::anonymous());
        assert_eq!(SessionContext::from_store(Some("{oops")), SessionContext::anonymous());
        assert_eq!(SessionContext::from_store(Some("[1,2]")), SessionContext::anonymous());

        let ctx = SessionContext::from_store(Some(r#"{"role":"janitor"}"#));
        assert_eq!(ctx.role, Role::Unknown);
        assert_eq!(ctx.user_id, None);
    }
}
