//! Search aggregation over every (location, role) pair.
//!
//! A run issues one scrape per pair, in order, and keeps going when a pair
//! fails. The collected postings are then flagged with the keyword matcher
//! and filtered down to the ones mentioning sponsorship.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::keywords::{matched_keywords, mentions_sponsorship};
use crate::model::{JobPosting, ScrapeQuery, SearchRequest, Site};

/// Most roles or locations a single run accepts.
pub const MAX_TERMS: usize = 3;
pub const MIN_RESULTS_WANTED: usize = 5;
pub const MAX_RESULTS_WANTED: usize = 50;
pub const DEFAULT_RESULTS_WANTED: usize = 15;
pub const DEFAULT_HOURS_OLD: u32 = 72;
pub const DEFAULT_COUNTRY: &str = "USA";

/// Rejected user input. Raised before any scrape is issued.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please provide at least one search term and one location.")]
    MissingInput,
    #[error("at most {max} {what} can be searched at once, got {got}")]
    TooMany {
        what: &'static str,
        max: usize,
        got: usize,
    },
    #[error("results per search must be between {min} and {max}, got {got}")]
    ResultsWantedOutOfRange { min: usize, max: usize, got: usize },
}

/// Failure of a single call to a job source.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScrapeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{site} responded with HTTP {status}")]
    Status { site: Site, status: u16 },
    #[error("could not read {site} response: {message}")]
    Parse { site: Site, message: String },
    #[error("every job board failed: {}", .0.join("; "))]
    AllSitesFailed(Vec<String>),
}

/// Something that can turn a query into postings.
pub trait JobSource {
    fn scrape(&self, query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError>;
}

impl<T: JobSource + ?Sized> JobSource for &T {
    fn scrape(&self, query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError> {
        (**self).scrape(query)
    }
}

/// Receives progress while a run is going. All methods default to no-ops.
pub trait Progress {
    fn searching(&mut self, _request: &SearchRequest, _current: usize, _total: usize) {}

    fn found(&mut self, _request: &SearchRequest, _count: usize) {}

    fn failed(&mut self, _request: &SearchRequest, _error: &ScrapeError) {}

    fn processing(&mut self) {}
}

/// Progress sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Validated roles, locations and per-search result bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    roles: Vec<String>,
    locations: Vec<String>,
    results_wanted: usize,
}

impl SearchCriteria {
    /// Trims every entry and drops blank ones before validating.
    pub fn new<R, L>(roles: R, locations: L, results_wanted: usize) -> Result<Self, SearchError>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        let roles = clean_terms(roles);
        let locations = clean_terms(locations);

        if roles.is_empty() || locations.is_empty() {
            return Err(SearchError::MissingInput);
        }
        if roles.len() > MAX_TERMS {
            return Err(SearchError::TooMany {
                what: "roles",
                max: MAX_TERMS,
                got: roles.len(),
            });
        }
        if locations.len() > MAX_TERMS {
            return Err(SearchError::TooMany {
                what: "locations",
                max: MAX_TERMS,
                got: locations.len(),
            });
        }
        if !(MIN_RESULTS_WANTED..=MAX_RESULTS_WANTED).contains(&results_wanted) {
            return Err(SearchError::ResultsWantedOutOfRange {
                min: MIN_RESULTS_WANTED,
                max: MAX_RESULTS_WANTED,
                got: results_wanted,
            });
        }

        Ok(Self {
            roles,
            locations,
            results_wanted,
        })
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn results_wanted(&self) -> usize {
        self.results_wanted
    }

    pub fn pair_count(&self) -> usize {
        self.roles.len() * self.locations.len()
    }

    /// Every pair, location outer and role inner.
    pub fn requests(&self) -> impl Iterator<Item = SearchRequest> + '_ {
        self.locations.iter().flat_map(move |location| {
            self.roles.iter().map(move |role| SearchRequest {
                role: role.clone(),
                location: location.clone(),
            })
        })
    }
}

fn clean_terms<I>(terms: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Fixed parameters shared by every call of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub sites: Vec<Site>,
    pub hours_old: u32,
    pub fetch_description: bool,
    pub country: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            sites: Site::ALL.to_vec(),
            hours_old: DEFAULT_HOURS_OLD,
            fetch_description: true,
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl SearchSettings {
    pub fn query_for(&self, request: &SearchRequest, results_wanted: usize) -> ScrapeQuery {
        ScrapeQuery {
            sites: self.sites.clone(),
            search_term: request.role.clone(),
            location: request.location.clone(),
            results_wanted,
            hours_old: self.hours_old,
            fetch_description: self.fetch_description,
            country: self.country.clone(),
        }
    }
}

/// A pair whose scrape failed and was left out of the results.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFailure {
    pub request: SearchRequest,
    pub error: ScrapeError,
}

/// Raw postings of every successful pair, in pair order.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub postings: Vec<JobPosting>,
    pub failures: Vec<PairFailure>,
    pub calls: usize,
}

/// Issues one scrape per pair and concatenates the non-empty results.
pub fn collect<S, P>(
    source: &S,
    criteria: &SearchCriteria,
    settings: &SearchSettings,
    progress: &mut P,
) -> Collected
where
    S: JobSource + ?Sized,
    P: Progress + ?Sized,
{
    let total = criteria.pair_count();
    let mut collected = Collected::default();

    for (index, request) in criteria.requests().enumerate() {
        progress.searching(&request, index + 1, total);
        info!(
            "Searching for {} ({}/{})",
            request,
            index + 1,
            total
        );

        let query = settings.query_for(&request, criteria.results_wanted());
        collected.calls += 1;

        match source.scrape(&query) {
            Ok(jobs) if jobs.is_empty() => {
                debug!("No postings for {}", request);
                progress.found(&request, 0);
            }
            Ok(jobs) => {
                info!("Found {} postings for {}", jobs.len(), request);
                progress.found(&request, jobs.len());
                collected.postings.extend(jobs);
            }
            Err(error) => {
                warn!("Error searching for {}: {}", request, error);
                progress.failed(&request, &error);
                collected.failures.push(PairFailure { request, error });
            }
        }
    }

    collected
}

/// Sets `mentions_visa` on every posting from its description.
pub fn flag_sponsorship(postings: &mut [JobPosting]) {
    for job in postings.iter_mut() {
        job.mentions_visa = mentions_sponsorship(job.description.as_deref());
        if job.mentions_visa {
            if let Some(description) = job.description.as_deref() {
                debug!(
                    "{} at {} mentions {:?}",
                    job.title,
                    job.company.as_deref().unwrap_or("unknown company"),
                    matched_keywords(description)
                );
            }
        }
    }
}

/// How a completed run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Postings that mention sponsorship, in pair order.
    Matches(Vec<JobPosting>),
    /// Postings were found but none mention sponsorship.
    NoMatches,
    /// No pair produced any posting.
    NoJobsFound,
}

impl Outcome {
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Matches(_) => "matches",
            Outcome::NoMatches => "no_matches",
            Outcome::NoJobsFound => "no_jobs_found",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::Matches(jobs) => {
                format!("Found {} jobs mentioning sponsorship/visa!", jobs.len())
            }
            Outcome::NoMatches => "No jobs found mentioning the visa keywords.".to_string(),
            Outcome::NoJobsFound => "No jobs found for the given criteria.".to_string(),
        }
    }

    pub fn matches(&self) -> &[JobPosting] {
        match self {
            Outcome::Matches(jobs) => jobs,
            _ => &[],
        }
    }
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub total_scraped: usize,
    pub calls: usize,
    pub failures: Vec<PairFailure>,
}

/// Runs every pair, then flags and filters the combined postings.
pub fn run<S, P>(
    source: &S,
    criteria: &SearchCriteria,
    settings: &SearchSettings,
    progress: &mut P,
) -> SearchReport
where
    S: JobSource + ?Sized,
    P: Progress + ?Sized,
{
    let Collected {
        mut postings,
        failures,
        calls,
    } = collect(source, criteria, settings, progress);

    progress.processing();
    let total_scraped = postings.len();

    let outcome = if postings.is_empty() {
        Outcome::NoJobsFound
    } else {
        flag_sponsorship(&mut postings);
        let matches: Vec<JobPosting> = postings.into_iter().filter(|j| j.mentions_visa).collect();
        if matches.is_empty() {
            Outcome::NoMatches
        } else {
            Outcome::Matches(matches)
        }
    };

    info!(
        "Search finished: {} ({} scraped, {} failed pairs)",
        outcome.status(),
        total_scraped,
        failures.len()
    );

    SearchReport {
        outcome,
        total_scraped,
        calls,
        failures,
    }
}
