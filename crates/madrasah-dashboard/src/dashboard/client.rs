//! HTTP client for the school backend.
//!
//! Every source is a read-only list endpoint under the configured base URL:
//! `GET {base}/{source}?limit=..` plus optional `status`, `student_id`,
//! `start_date` and `end_date` filters. Responses are returned as raw JSON and
//! normalized by the caller.

use super::config::ApiConfig;
use super::error::DashboardError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// The backend collections the dashboard reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Students,
    Teachers,
    Classes,
    Fees,
    Exams,
    Announcements,
    Attendance,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Students => "students",
            Source::Teachers => "teachers",
            Source::Classes => "classes",
            Source::Fees => "fees",
            Source::Exams => "exams",
            Source::Announcements => "announcements",
            Source::Attendance => "attendance",
        }
    }

    /// Whether a failure of this source aborts the dashboard.
    pub fn is_critical(&self) -> bool {
        !matches!(self, Source::Announcements | Source::Attendance)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A list request against one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub source: Source,
    pub limit: u32,
    pub status: Option<String>,
    pub student_id: Option<String>,
    /// Inclusive date range
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl ListQuery {
    pub fn new(source: Source, limit: u32) -> Self {
        Self {
            source,
            limit,
            status: None,
            student_id: None,
            date_range: None,
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn for_student(mut self, student_id: &str, start: NaiveDate, end: NaiveDate) -> Self {
        self.student_id = Some(student_id.to_string());
        self.date_range = Some((start, end));
        self
    }

    /// Query-string pairs for this request.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(student_id) = &self.student_id {
            pairs.push(("student_id", student_id.clone()));
        }
        if let Some((start, end)) = self.date_range {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

/// Read access to the school backend.
#[async_trait]
pub trait SchoolApi: Send + Sync {
    /// Runs one list query and returns the raw response body.
    async fn list(&self, query: &ListQuery) -> Result<Value, DashboardError>;
}

/// `SchoolApi` backed by the backend's REST endpoints.
pub struct HttpSchoolApi {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpSchoolApi {
    pub fn new(config: &ApiConfig) -> Result<Self, DashboardError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DashboardError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        // A trailing slash keeps the last path segment when joining.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            api_token: config.api_token.clone(),
        })
    }

    /// Full URL, including query string, for `query`.
    pub fn endpoint(&self, query: &ListQuery) -> Result<Url, DashboardError> {
        let mut url = self.base_url.join(query.source.name())?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        Ok(url)
    }
}

#[async_trait]
impl SchoolApi for HttpSchoolApi {
    async fn list(&self, query: &ListQuery) -> Result<Value, DashboardError> {
        let url = self.endpoint(query)?;
        debug!(source = %query.source, url = %url, "Fetching source");

        let mut request = self.client.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(DashboardError::UnexpectedResponse {
                source_name: query.source.name().to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str) -> HttpSchoolApi {
        HttpSchoolApi::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = api("https://sekolah.example/api/v1");
        let url = api.endpoint(&ListQuery::new(Source::Students, 1000)).unwrap();
        assert_eq!(url.as_str(), "https://sekolah.example/api/v1/students?limit=1000");
    }

    #[test]
    fn test_endpoint_with_filters() {
        let api = api("http://localhost:8000/api/");
        let query = ListQuery::new(Source::Attendance, 1000).for_student(
            "42",
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        );
        let url = api.endpoint(&query).unwrap();
        assert_eq!(url.path(), "/api/attendance");
        assert_eq!(
            url.query(),
            Some("limit=1000&student_id=42&start_date=2026-10-01&end_date=2026-10-31")
        );

        let url = api
            .endpoint(&ListQuery::new(Source::Announcements, 10).with_status("published"))
            .unwrap();
        assert_eq!(url.query(), Some("limit=10&status=published"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpSchoolApi::new(&ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        });
        assert!(matches!(result, Err(DashboardError::UrlError { .. })));
    }

    #[test]
    fn test_source_criticality() {
        assert!(Source::Students.is_critical());
        assert!(Source::Exams.is_critical());
        assert!(!Source::Announcements.is_critical());
        assert!(!Source::Attendance.is_critical());
    }
}
