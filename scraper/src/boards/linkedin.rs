//! LinkedIn guest job search.

use common::{JobPosting, ScrapeError, ScrapeQuery, Site};
use reqwest::blocking::Client;
use scraper::Html;
use tracing::{debug, warn};

use super::{build_url, Board, Fetch};
use crate::html::{document_text, first_attr, first_text, selector};
use crate::salary::parse_salary;

const SEARCH_URL: &str = "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
const PAGE_SIZE: usize = 25;
/// LinkedIn stops serving guest results past this offset.
const MAX_START: usize = 1000;

pub struct LinkedIn<F = Client> {
    fetch: F,
}

impl<F: Fetch> LinkedIn<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    fn description(&self, job_url: &str) -> Result<Option<String>, ScrapeError> {
        let html = self.fetch.get(Site::LinkedIn, job_url)?;
        parse_description(&html)
    }

    fn page(&self, query: &ScrapeQuery, start: usize) -> Result<Vec<JobPosting>, ScrapeError> {
        let url = build_url(
            Site::LinkedIn,
            SEARCH_URL,
            &[
                ("keywords", query.search_term.clone()),
                ("location", query.location.clone()),
                ("f_TPR", format!("r{}", u64::from(query.hours_old) * 3600)),
                ("pageNum", "0".to_string()),
                ("start", start.to_string()),
            ],
        )?;
        let html = self.fetch.get(Site::LinkedIn, url.as_str())?;
        parse_search_page(&html)
    }
}

impl<F: Fetch> Board for LinkedIn<F> {
    fn site(&self) -> Site {
        Site::LinkedIn
    }

    /// Pages until enough postings, an empty page or the offset cap.
    /// A failing page after the first ends paging but keeps what was found.
    fn search(&self, query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError> {
        let mut jobs: Vec<JobPosting> = Vec::new();
        let mut start = 0;

        while jobs.len() < query.results_wanted && start < MAX_START {
            let page = match self.page(query, start) {
                Ok(page) => page,
                Err(e) if !jobs.is_empty() => {
                    warn!("LinkedIn paging stopped at offset {}: {}", start, e);
                    break;
                }
                Err(e) => return Err(e),
            };
            if page.is_empty() {
                debug!("LinkedIn has no more results at offset {}", start);
                break;
            }

            for mut job in page {
                if jobs.len() >= query.results_wanted {
                    break;
                }
                if query.fetch_description {
                    match self.description(&job.job_url) {
                        Ok(description) => job = job.with_description(description),
                        Err(e) => warn!("Could not fetch description of {}: {}", job.job_url, e),
                    }
                }
                jobs.push(job);
            }

            start += PAGE_SIZE;
        }

        Ok(jobs)
    }
}

/// Parses one page of guest search result cards.
pub fn parse_search_page(html: &str) -> Result<Vec<JobPosting>, ScrapeError> {
    let site = Site::LinkedIn;
    let card_selector = selector(site, "div.base-search-card")?;
    let title_selector = selector(site, "h3.base-search-card__title")?;
    let company_selector = selector(site, "h4.base-search-card__subtitle")?;
    let location_selector = selector(site, "span.job-search-card__location")?;
    let link_selector = selector(site, "a.base-card__full-link")?;
    let salary_selector = selector(site, "span.job-search-card__salary-info")?;
    let date_selector = selector(site, "time")?;

    let document = Html::parse_fragment(html);
    let mut jobs = Vec::new();

    for card in document.select(&card_selector) {
        let Some(title) = first_text(&card, &title_selector) else {
            continue;
        };
        let Some(href) = first_attr(&card, &link_selector, "href") else {
            continue;
        };
        // drop tracking parameters
        let job_url = href.split('?').next().unwrap_or(&href).to_string();

        let mut job = JobPosting::new(site, title, job_url)
            .with_company(first_text(&card, &company_selector))
            .with_location(first_text(&card, &location_selector))
            .with_date_posted(first_attr(&card, &date_selector, "datetime"));

        if let Some(pay) = first_text(&card, &salary_selector).and_then(|raw| parse_salary(&raw)) {
            job = job.with_compensation(pay.min_amount, pay.max_amount, pay.currency, pay.interval);
        }

        jobs.push(job);
    }

    Ok(jobs)
}

/// Description text of a job view page.
pub fn parse_description(html: &str) -> Result<Option<String>, ScrapeError> {
    let markup = selector(Site::LinkedIn, "div.show-more-less-html__markup")?;
    Ok(document_text(html, &markup))
}
