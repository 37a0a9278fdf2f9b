//! Blocking HTTP client for the admission services.
//!
//! Both backends take multipart form posts. Search responses are JSON; the
//! two record shapes are normalized into one table model here so the rest of
//! the application never sees service-specific fields.

use reqwest::blocking::multipart::Form;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::cli::ServiceKind;
use crate::export::ExportFormat;
use crate::form::SearchForm;
use crate::table::Column;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Normalized search result: column specs, display rows, and an optional
/// one-line summary for the header
#[derive(Debug)]
pub struct TableData {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub summary: Option<String>,
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> color_eyre::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn post_form(&self, path: &str, form: &SearchForm, service: ServiceKind) -> Result<reqwest::blocking::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut multipart = Form::new();
        for (name, value) in form.fields(service) {
            multipart = multipart.text(name, value);
        }
        let response = self
            .client
            .post(&url)
            .multipart(multipart)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }

    /// Submit the search form and normalize the response into table data
    pub fn search(&self, service: ServiceKind, form: &SearchForm) -> Result<TableData, ApiError> {
        let response = self.post_form(service.search_path(), form, service)?;
        let body = response.text().map_err(|e| ApiError::Network(e.to_string()))?;
        decode_search(service, &body)
    }

    /// Request a server-side export carrying the given form fields, returning
    /// the binary payload as received
    pub fn export(
        &self,
        service: ServiceKind,
        format: ExportFormat,
        form: &SearchForm,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self.post_form(format.endpoint(), form, service)?;
        let bytes = response
            .bytes()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct JosaaPreference {
    #[serde(rename = "Preference")]
    preference: u32,
    #[serde(rename = "Institute")]
    institute: String,
    #[serde(rename = "College Type")]
    college_type: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Branch")]
    branch: String,
    #[serde(rename = "Opening Rank")]
    opening_rank: f64,
    #[serde(rename = "Closing Rank")]
    closing_rank: f64,
    #[serde(rename = "Admission Probability (%)")]
    probability: f64,
    #[serde(rename = "Admission Chances")]
    chances: String,
}

#[derive(Debug, Deserialize)]
struct PredictionOutput {
    preferences: Vec<JosaaPreference>,
}

#[derive(Debug, Deserialize)]
struct MhtcetRecord {
    college_name: String,
    branch_name: String,
    category: String,
    quota_type: String,
    rank: f64,
    #[serde(default)]
    percentile: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    results: Vec<MhtcetRecord>,
    total_matches: usize,
    rank_min: f64,
    rank_max: f64,
    unique_colleges: usize,
}

/// Ranks arrive as JSON numbers; render whole values without a decimal tail
fn format_rank(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn decode_search(service: ServiceKind, body: &str) -> Result<TableData, ApiError> {
    match service {
        ServiceKind::Josaa => {
            let output: PredictionOutput =
                serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
            let rows: Vec<Vec<String>> = output
                .preferences
                .iter()
                .map(|p| {
                    vec![
                        p.preference.to_string(),
                        p.institute.clone(),
                        p.college_type.clone(),
                        p.location.clone(),
                        p.branch.clone(),
                        format_rank(p.opening_rank),
                        format_rank(p.closing_rank),
                        format!("{:.1}", p.probability),
                        p.chances.clone(),
                    ]
                })
                .collect();
            let summary = Some(format!("{} preferences generated", rows.len()));
            Ok(TableData {
                columns: vec![
                    Column::integer("Pref"),
                    Column::text("Institute"),
                    Column::text("Type"),
                    Column::text("Location"),
                    Column::text("Branch"),
                    Column::integer("Opening Rank"),
                    Column::integer("Closing Rank"),
                    Column::percentage("Probability %"),
                    Column::text("Chances"),
                ],
                rows,
                summary,
            })
        }
        ServiceKind::Mhtcet => {
            let envelope: SearchEnvelope =
                serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
            let rows: Vec<Vec<String>> = envelope
                .results
                .iter()
                .map(|r| {
                    vec![
                        r.college_name.clone(),
                        r.branch_name.clone(),
                        r.category.clone(),
                        r.quota_type.clone(),
                        format_rank(r.rank),
                        r.percentile.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                    ]
                })
                .collect();
            let summary = Some(format!(
                "{} matches | rank {} - {} | {} colleges",
                envelope.total_matches,
                format_rank(envelope.rank_min),
                format_rank(envelope.rank_max),
                envelope.unique_colleges
            ));
            Ok(TableData {
                columns: vec![
                    Column::text("College"),
                    Column::text("Branch"),
                    Column::text("Category"),
                    Column::text("Quota"),
                    Column::integer("Rank"),
                    Column::percentage("Percentile"),
                ],
                rows,
                summary,
            })
        }
    }
}
