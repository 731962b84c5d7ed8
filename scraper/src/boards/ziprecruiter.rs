//! ZipRecruiter jobs API.

use common::{JobPosting, ScrapeError, ScrapeQuery, Site};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{build_url, days_covering, Board, Fetch};
use crate::html::fragment_text;

const API_URL: &str = "https://api.ziprecruiter.com/jobs-app/jobs";
const SEARCH_RADIUS_MILES: u32 = 10;
/// Hard stop on pagination in case the API keeps handing out cursors.
const MAX_PAGES: usize = 20;

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub jobs: Vec<ApiJob>,
    #[serde(rename = "continue")]
    pub continue_from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiJob {
    pub name: Option<String>,
    pub job_url: Option<String>,
    pub listing_key: Option<String>,
    pub hiring_company: Option<HiringCompany>,
    pub job_description: Option<String>,
    pub job_city: Option<String>,
    pub job_state: Option<String>,
    pub posted_time: Option<String>,
    pub compensation_interval: Option<String>,
    pub compensation_min: Option<f64>,
    pub compensation_max: Option<f64>,
    pub compensation_currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HiringCompany {
    pub name: Option<String>,
}

pub struct ZipRecruiter<F = Client> {
    fetch: F,
}

impl<F: Fetch> ZipRecruiter<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    fn page(&self, query: &ScrapeQuery, continue_from: Option<&str>) -> Result<ApiResponse, ScrapeError> {
        let mut params = vec![
            ("search", query.search_term.clone()),
            ("location", query.location.clone()),
            ("days", days_covering(query.hours_old).to_string()),
            ("radius", SEARCH_RADIUS_MILES.to_string()),
        ];
        if let Some(cursor) = continue_from {
            params.push(("continue_from", cursor.to_string()));
        }
        let url = build_url(Site::ZipRecruiter, API_URL, &params)?;

        let body = self.fetch.get(Site::ZipRecruiter, url.as_str())?;
        parse_response(&body)
    }
}

impl<F: Fetch> Board for ZipRecruiter<F> {
    fn site(&self) -> Site {
        Site::ZipRecruiter
    }

    fn search(&self, query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError> {
        let mut jobs: Vec<JobPosting> = Vec::new();
        let mut continue_from: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let response = match self.page(query, continue_from.as_deref()) {
                Ok(response) => response,
                Err(e) if !jobs.is_empty() => {
                    warn!("ZipRecruiter paging stopped at page {}: {}", page, e);
                    break;
                }
                Err(e) => return Err(e),
            };
            let found = response.jobs.len();

            for job in response.jobs.into_iter().filter_map(into_posting) {
                if jobs.len() >= query.results_wanted {
                    break;
                }
                jobs.push(job);
            }

            continue_from = response.continue_from;
            if found == 0 || continue_from.is_none() || jobs.len() >= query.results_wanted {
                debug!("ZipRecruiter pagination stopped after page {}", page);
                break;
            }
        }

        Ok(jobs)
    }
}

pub fn parse_response(body: &str) -> Result<ApiResponse, ScrapeError> {
    serde_json::from_str(body).map_err(|e| ScrapeError::Parse {
        site: Site::ZipRecruiter,
        message: e.to_string(),
    })
}

/// Converts an API job; jobs without a title or link are dropped.
pub fn into_posting(job: ApiJob) -> Option<JobPosting> {
    let title = job.name.filter(|n| !n.trim().is_empty())?;
    let job_url = job
        .job_url
        .filter(|u| !u.trim().is_empty())
        .or_else(|| {
            job.listing_key
                .map(|key| format!("https://www.ziprecruiter.com/jobs//j?lvk={key}"))
        })?;

    let location = match (job.job_city, job.job_state) {
        (Some(city), Some(state)) => Some(format!("{city}, {state}")),
        (city, state) => city.or(state),
    };

    let posting = JobPosting::new(Site::ZipRecruiter, title, job_url)
        .with_company(job.hiring_company.and_then(|c| c.name))
        .with_location(location)
        .with_date_posted(job.posted_time.map(|t| date_part(&t)))
        .with_description(job.job_description.map(|d| fragment_text(&d)))
        .with_compensation(
            job.compensation_min,
            job.compensation_max,
            job.compensation_currency,
            job.compensation_interval.map(|i| interval_name(&i)),
        );
    Some(posting)
}

fn date_part(timestamp: &str) -> String {
    timestamp.split('T').next().unwrap_or(timestamp).to_string()
}

fn interval_name(interval: &str) -> String {
    match interval.to_ascii_lowercase().as_str() {
        "annual" | "annually" | "yearly" => "yearly".to_string(),
        "hour" | "hourly" => "hourly".to_string(),
        "month" | "monthly" => "monthly".to_string(),
        "week" | "weekly" => "weekly".to_string(),
        "day" | "daily" => "daily".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "jobs": [
            {
                "name": "Data Analyst",
                "job_url": "https://www.ziprecruiter.com/c/Hooli/Job/Data-Analyst/-in-Chicago,IL?jid=1",
                "hiring_company": {"name": "Hooli"},
                "job_description": "<p>H1B <b>visa</b> transfer welcome.</p>",
                "job_city": "Chicago",
                "job_state": "IL",
                "posted_time": "2026-10-17T14:03:11Z",
                "compensation_interval": "annual",
                "compensation_min": 80000,
                "compensation_max": 95000.5,
                "compensation_currency": "USD"
            },
            {
                "name": "Junior Analyst",
                "listing_key": "abc123",
                "job_state": "IL"
            },
            {
                "job_url": "https://www.ziprecruiter.com/untitled"
            }
        ],
        "continue": "cursor-2"
    }"#;

    #[test]
    fn test_parse_response() {
        let response = parse_response(RESPONSE).unwrap();
        assert_eq!(response.continue_from.as_deref(), Some("cursor-2"));

        let jobs: Vec<JobPosting> = response.jobs.into_iter().filter_map(into_posting).collect();
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        assert_eq!(first.site, Site::ZipRecruiter);
        assert_eq!(first.company.as_deref(), Some("Hooli"));
        assert_eq!(first.location.as_deref(), Some("Chicago, IL"));
        assert_eq!(first.date_posted.as_deref(), Some("2026-10-17"));
        assert_eq!(first.interval.as_deref(), Some("yearly"));
        assert_eq!(first.min_amount, Some(80000.0));
        assert_eq!(first.max_amount, Some(95000.5));
        assert_eq!(first.description.as_deref(), Some("H1B visa transfer welcome."));

        let second = &jobs[1];
        assert_eq!(second.job_url, "https://www.ziprecruiter.com/jobs//j?lvk=abc123");
        assert_eq!(second.location.as_deref(), Some("IL"));
        assert_eq!(second.company, None);
    }

    #[test]
    fn test_parse_response_without_jobs() {
        let response = parse_response("{}").unwrap();
        assert!(response.jobs.is_empty());
        assert!(response.continue_from.is_none());
    }

    #[test]
    fn test_malformed_response_is_parse_error() {
        assert!(matches!(
            parse_response("<html>blocked</html>"),
            Err(ScrapeError::Parse { site: Site::ZipRecruiter, .. })
        ));
    }

    mod paging {
        use super::super::*;
        use crate::boards::stub::{param, query, too_many_requests, StubFetch};

        /// An API page of `count` jobs numbered from `first`, with an optional cursor.
        fn page(first: usize, count: usize, cursor: Option<&str>) -> String {
            let jobs: Vec<serde_json::Value> = (first..first + count)
                .map(|id| {
                    serde_json::json!({
                        "name": format!("Analyst {id}"),
                        "job_url": format!("https://www.ziprecruiter.com/k/{id}"),
                    })
                })
                .collect();
            serde_json::json!({ "jobs": jobs, "continue": cursor }).to_string()
        }

        /// Serves page n (1-based) for cursor `pN`, handing out the next cursor.
        fn cursor_pages(per_page: usize) -> impl Fn(&str) -> Result<String, ScrapeError> {
            move |url: &str| {
                let n: usize = param(url, "continue_from")
                    .and_then(|c| c.trim_start_matches('p').parse().ok())
                    .unwrap_or(1);
                let next = format!("p{}", n + 1);
                Ok(page((n - 1) * per_page, per_page, Some(&next)))
            }
        }

        #[test]
        fn test_cursor_is_passed_to_the_next_page() {
            let fetch = StubFetch::new(cursor_pages(10));
            let jobs = ZipRecruiter::new(&fetch).search(&query(25, false)).unwrap();

            assert_eq!(jobs.len(), 25);
            assert_eq!(jobs[24].title, "Analyst 24");
            let cursors: Vec<Option<String>> =
                fetch.urls().iter().map(|u| param(u, "continue_from")).collect();
            assert_eq!(
                cursors,
                vec![None, Some("p2".to_string()), Some("p3".to_string())]
            );
            let first = &fetch.urls()[0];
            assert_eq!(param(first, "days").as_deref(), Some("3"));
            assert_eq!(param(first, "radius").as_deref(), Some("10"));
        }

        #[test]
        fn test_missing_cursor_stops_paging() {
            let fetch = StubFetch::new(|_url: &str| Ok(page(0, 4, None)));
            let jobs = ZipRecruiter::new(&fetch).search(&query(50, false)).unwrap();

            assert_eq!(jobs.len(), 4);
            assert_eq!(fetch.urls().len(), 1);
        }

        #[test]
        fn test_empty_page_stops_paging() {
            let fetch = StubFetch::new(|_url: &str| Ok(page(0, 0, Some("p2"))));
            let jobs = ZipRecruiter::new(&fetch).search(&query(50, false)).unwrap();

            assert!(jobs.is_empty());
            assert_eq!(fetch.urls().len(), 1);
        }

        #[test]
        fn test_page_cap_ends_paging() {
            let fetch = StubFetch::new(cursor_pages(1));
            let jobs = ZipRecruiter::new(&fetch).search(&query(50, false)).unwrap();

            assert_eq!(jobs.len(), 20);
            assert_eq!(fetch.urls().len(), 20);
        }

        #[test]
        fn test_later_page_failure_keeps_earlier_postings() {
            let fetch = StubFetch::new(|url: &str| match param(url, "continue_from") {
                None => Ok(page(0, 10, Some("p2"))),
                Some(_) => Ok("<html>blocked</html>".to_string()),
            });
            let jobs = ZipRecruiter::new(&fetch).search(&query(50, false)).unwrap();

            assert_eq!(jobs.len(), 10);
        }

        #[test]
        fn test_first_page_failure_fails_the_board() {
            let fetch = StubFetch::new(|_url: &str| Err(too_many_requests(Site::ZipRecruiter)));
            assert_eq!(
                ZipRecruiter::new(&fetch).search(&query(15, false)).unwrap_err(),
                too_many_requests(Site::ZipRecruiter)
            );
        }
    }
}
