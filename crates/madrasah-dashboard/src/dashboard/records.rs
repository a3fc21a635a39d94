//! Records returned by the school backend.
//!
//! The backend is loose about types: identifiers arrive as numbers or strings,
//! amounts as numbers or numeric strings, and a class's `sessions` either as an
//! array or as a JSON-encoded string. Everything is coerced here, once, so the
//! derivations never re-parse.

use super::error::DerivationError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Status value marking an active student, teacher or class.
pub const ACTIVE_STATUS: &str = "aktif";

/// A backend row before its fields are resolved.
type RawRecord = Map<String, Value>;

// Keys in lookup order. Rows may carry several at once; the first usable value wins.
const STUDENT_REGISTERED: &[&str] = &["tarikh_daftar", "registration_date", "created_at"];
const STUDENT_CLASS: &[&str] = &["kelas_id", "class_id"];
const TEACHER_NAME: &[&str] = &["nama", "name"];
const CLASS_NAME: &[&str] = &["nama_kelas", "nama", "name"];
const CLASS_TEACHER: &[&str] = &["guru_id", "teacher_id"];
const FEE_AMOUNT: &[&str] = &["jumlah", "amount"];
const EXAM_DATE: &[&str] = &["tarikh_exam", "tarikh", "exam_date", "date"];
const ATTENDANCE_DATE: &[&str] = &["tarikh", "date"];
const ATTENDANCE_CLASS: &[&str] = &["kelas", "class_name"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Student {
    pub id: Option<String>,
    pub status: Option<String>,
    pub tarikh_daftar: Option<String>,
    pub kelas_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Teacher {
    pub id: Option<String>,
    pub status: Option<String>,
    pub nama: Option<String>,
}

/// A recurring weekly time block of a class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub times: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Class {
    pub id: Option<String>,
    pub nama_kelas: Option<String>,
    pub status: Option<String>,
    pub guru_id: Option<String>,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Fee {
    pub jumlah: f64,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct Exam {
    pub tarikh_exam: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_audience: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct AttendanceRecord {
    pub tarikh: Option<String>,
    pub status: Option<String>,
    pub kelas: Option<String>,
}

impl From<RawRecord> for Student {
    fn from(raw: RawRecord) -> Self {
        Self {
            id: field(&raw, &["id"]),
            status: field(&raw, &["status"]),
            tarikh_daftar: field(&raw, STUDENT_REGISTERED),
            kelas_id: field(&raw, STUDENT_CLASS),
        }
    }
}

impl From<RawRecord> for Teacher {
    fn from(raw: RawRecord) -> Self {
        Self {
            id: field(&raw, &["id"]),
            status: field(&raw, &["status"]),
            nama: field(&raw, TEACHER_NAME),
        }
    }
}

impl From<RawRecord> for Class {
    fn from(raw: RawRecord) -> Self {
        let sessions = match parse_sessions(raw.get("sessions").unwrap_or(&Value::Null)) {
            Ok(sessions) => sessions,
            Err(e) => {
                debug!(error = %e, "Ignoring malformed class sessions");
                Vec::new()
            }
        };

        Self {
            id: field(&raw, &["id"]),
            nama_kelas: field(&raw, CLASS_NAME),
            status: field(&raw, &["status"]),
            guru_id: field(&raw, CLASS_TEACHER),
            sessions,
        }
    }
}

impl From<RawRecord> for Fee {
    fn from(raw: RawRecord) -> Self {
        let jumlah = FEE_AMOUNT
            .iter()
            .find_map(|key| raw.get(*key).filter(|v| !v.is_null()))
            .map(amount)
            .unwrap_or(0.0);

        Self {
            jumlah,
            status: field(&raw, &["status"]),
        }
    }
}

impl From<RawRecord> for Exam {
    fn from(raw: RawRecord) -> Self {
        Self {
            tarikh_exam: field(&raw, EXAM_DATE),
        }
    }
}

impl From<RawRecord> for AttendanceRecord {
    fn from(raw: RawRecord) -> Self {
        Self {
            tarikh: field(&raw, ATTENDANCE_DATE),
            status: field(&raw, &["status"]),
            kelas: field(&raw, ATTENDANCE_CLASS),
        }
    }
}

impl Student {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }
}

impl Teacher {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }
}

impl Class {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }

    pub fn display_name(&self) -> &str {
        self.nama_kelas.as_deref().unwrap_or_default()
    }
}

impl Fee {
    /// Unpaid fees: no status, "tunggak" or "Belum Bayar".
    pub fn is_outstanding(&self) -> bool {
        matches!(self.status.as_deref(), None | Some("tunggak") | Some("Belum Bayar"))
    }
}

/// Parses a `sessions` value that is either an array or a JSON-encoded string.
pub fn parse_sessions(value: &Value) -> Result<Vec<Session>, DerivationError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => {
            let inner: Value = serde_json::from_str(s)
                .map_err(|e| DerivationError::InvalidSessions(e.to_string()))?;
            match inner {
                Value::String(_) => Err(DerivationError::InvalidSessions(
                    "doubly encoded string".to_string(),
                )),
                other => parse_sessions(&other),
            }
        }
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(|item| serde_json::from_value::<Session>(item.clone()).ok())
            .collect()),
        other => Err(DerivationError::InvalidSessions(format!(
            "expected array or string, got {}",
            other
        ))),
    }
}

/// First of `keys` holding a usable scalar, as a string.
fn field(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| raw.get(*key).and_then(scalar_string))
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_string(&value))
}

/// Numbers and numeric strings; anything else is 0.
fn amount(value: &Value) -> f64 {
    let amount = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}
