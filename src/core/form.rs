use once_cell::sync::Lazy;
use regex::Regex;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::core::error::TrackError;
use crate::core::job::JobRecord;
use crate::core::stage::StageId;

static RE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+(?:[/?#]\S*)?$").unwrap());

/// Capture/edit form: every record field except the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobForm {
    pub company: String,
    pub role: String,
    pub location: String,
    pub salary: String,
    pub status: StageId,
    pub applied_date: String,
    pub url: String,
    pub notes: String,
}

impl Default for JobForm {
    fn default() -> Self {
        Self::for_stage(StageId::Wishlist)
    }
}

impl JobForm {
    /// Blank form preset to a board column, dated today.
    pub fn for_stage(status: StageId) -> Self {
        Self {
            company: String::new(),
            role: String::new(),
            location: String::new(),
            salary: String::new(),
            status,
            applied_date: today(),
            url: String::new(),
            notes: String::new(),
        }
    }

    pub fn from_record(record: &JobRecord) -> Self {
        Self {
            company: record.company.clone(),
            role: record.role.clone(),
            location: record.location.clone(),
            salary: record.salary.clone(),
            status: record.status,
            applied_date: record.applied_date.clone(),
            url: record.url.clone(),
            notes: record.notes.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        if self.company.trim().is_empty() {
            return Err(TrackError::validation("company", "company is required"));
        }
        if self.role.trim().is_empty() {
            return Err(TrackError::validation("role", "role is required"));
        }
        validate_date(&self.applied_date)?;
        let url = self.url.trim();
        if !url.is_empty() && !RE_URL.is_match(url) {
            return Err(TrackError::validation(
                "url",
                format!("'{url}' is not an http(s) URL"),
            ));
        }
        Ok(())
    }

    pub fn into_record(self, id: String) -> JobRecord {
        JobRecord {
            id,
            company: self.company,
            role: self.role,
            location: self.location,
            salary: self.salary,
            status: self.status,
            applied_date: self.applied_date,
            url: self.url,
            notes: self.notes,
        }
    }
}

fn validate_date(value: &str) -> Result<(), TrackError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TrackError::validation("appliedDate", "applied date is required"));
    }
    if !RE_DATE.is_match(value) {
        return Err(TrackError::validation(
            "appliedDate",
            format!("'{value}' is not a yyyy-mm-dd date"),
        ));
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(|_| ())
        .map_err(|_| TrackError::validation("appliedDate", format!("'{value}' is not a calendar date")))
}

/// Today's UTC date as yyyy-mm-dd.
pub fn today() -> String {
    let date = OffsetDateTime::now_utc().date();
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}
