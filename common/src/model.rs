use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Job board a posting was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    #[serde(rename = "linkedin")]
    LinkedIn,
    Indeed,
    ZipRecruiter,
}

impl Site {
    /// Every search covers these boards, in this order.
    pub const ALL: [Site; 3] = [Site::LinkedIn, Site::Indeed, Site::ZipRecruiter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Site::LinkedIn => "linkedin",
            Site::Indeed => "indeed",
            Site::ZipRecruiter => "zip_recruiter",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Ok(Site::LinkedIn),
            "indeed" => Ok(Site::Indeed),
            "zip_recruiter" | "ziprecruiter" => Ok(Site::ZipRecruiter),
            other => Err(format!("unknown job board: {other}")),
        }
    }
}

/// One (location, role) pair searched independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub role: String,
    pub location: String,
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' in '{}'", self.role, self.location)
    }
}

/// Parameters of a single call to a job source.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeQuery {
    pub sites: Vec<Site>,
    pub search_term: String,
    pub location: String,
    pub results_wanted: usize,
    pub hours_old: u32,
    pub fetch_description: bool,
    pub country: String,
}

/// A scraped job posting.
///
/// Column order here is the column order of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub site: Site,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub date_posted: Option<String>,
    pub interval: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub currency: Option<String>,
    pub job_url: String,
    #[serde(default)]
    pub mentions_visa: bool,
    pub description: Option<String>,
}

impl JobPosting {
    pub fn new(site: Site, title: impl Into<String>, job_url: impl Into<String>) -> Self {
        Self {
            site,
            title: title.into().trim().to_string(),
            company: None,
            location: None,
            date_posted: None,
            interval: None,
            min_amount: None,
            max_amount: None,
            currency: None,
            job_url: job_url.into(),
            mentions_visa: false,
            description: None,
        }
    }

    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = non_blank(company);
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = non_blank(location);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_blank(description);
        self
    }

    pub fn with_date_posted(mut self, date_posted: Option<String>) -> Self {
        self.date_posted = non_blank(date_posted);
        self
    }

    /// Sets the pay range. Blank currency and interval are dropped.
    pub fn with_compensation(
        mut self,
        min_amount: Option<f64>,
        max_amount: Option<f64>,
        currency: Option<String>,
        interval: Option<String>,
    ) -> Self {
        self.min_amount = min_amount;
        self.max_amount = max_amount;
        self.currency = non_blank(currency);
        self.interval = non_blank(interval);
        self
    }
}

/// Trims a value and treats an empty result as missing.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
