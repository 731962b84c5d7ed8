//! Indeed search result pages.

use common::{JobPosting, ScrapeError, ScrapeQuery, Site};
use reqwest::blocking::Client;
use scraper::Html;
use tracing::{debug, warn};

use super::{build_url, days_covering, Board, Fetch};
use crate::html::{document_text, first_attr, first_text, selector};
use crate::salary::parse_salary;

const PAGE_SIZE: usize = 10;
const MAX_START: usize = 1000;

pub struct Indeed<F = Client> {
    fetch: F,
}

impl<F: Fetch> Indeed<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }

    fn page(&self, query: &ScrapeQuery, domain: &str, start: usize) -> Result<Vec<JobPosting>, ScrapeError> {
        let url = build_url(
            Site::Indeed,
            &format!("https://{domain}/jobs"),
            &[
                ("q", query.search_term.clone()),
                ("l", query.location.clone()),
                ("fromage", days_covering(query.hours_old).to_string()),
                ("start", start.to_string()),
            ],
        )?;
        let html = self.fetch.get(Site::Indeed, url.as_str())?;
        parse_search_page(&html, domain)
    }
}

/// Indeed host serving the given country. Unknown countries use the US site.
pub fn domain_for(country: &str) -> &'static str {
    match country.trim().to_ascii_lowercase().as_str() {
        "uk" | "united kingdom" | "gb" => "uk.indeed.com",
        "canada" | "ca" => "ca.indeed.com",
        "australia" | "au" => "au.indeed.com",
        "india" | "in" => "in.indeed.com",
        "germany" | "de" => "de.indeed.com",
        "ireland" | "ie" => "ie.indeed.com",
        _ => "www.indeed.com",
    }
}

impl<F: Fetch> Board for Indeed<F> {
    fn site(&self) -> Site {
        Site::Indeed
    }

    fn search(&self, query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError> {
        let domain = domain_for(&query.country);
        let mut jobs: Vec<JobPosting> = Vec::new();
        let mut start = 0;

        while jobs.len() < query.results_wanted && start < MAX_START {
            let page = match self.page(query, domain, start) {
                Ok(page) => page,
                Err(e) if !jobs.is_empty() => {
                    warn!("Indeed paging stopped at offset {}: {}", start, e);
                    break;
                }
                Err(e) => return Err(e),
            };
            if page.is_empty() {
                debug!("Indeed has no more results at offset {}", start);
                break;
            }

            for mut job in page {
                if jobs.len() >= query.results_wanted {
                    break;
                }
                if query.fetch_description {
                    match self
                        .fetch
                        .get(Site::Indeed, &job.job_url)
                        .and_then(|html| parse_description(&html))
                    {
                        // keep the card snippet when the full page has nothing
                        Ok(Some(description)) => job.description = Some(description),
                        Ok(None) => {}
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

/// Parses the job cards of one search page. Card links point at `domain`.
pub fn parse_search_page(html: &str, domain: &str) -> Result<Vec<JobPosting>, ScrapeError> {
    let site = Site::Indeed;
    let card_selector = selector(site, "div.job_seen_beacon")?;
    let title_selector = selector(site, "h2.jobTitle")?;
    let link_selector = selector(site, "h2.jobTitle a")?;
    let company_selector = selector(site, "[data-testid='company-name']")?;
    let location_selector = selector(site, "[data-testid='text-location']")?;
    let salary_selector = selector(
        site,
        "div.salary-snippet-container, [data-testid='attribute_snippet_testid']",
    )?;
    let snippet_selector = selector(site, "div.job-snippet, [data-testid='jobsnippet_footer']")?;

    let document = Html::parse_document(html);
    let mut jobs = Vec::new();

    for card in document.select(&card_selector) {
        let Some(title) = first_text(&card, &title_selector) else {
            continue;
        };
        let Some(job_key) = first_attr(&card, &link_selector, "data-jk") else {
            continue;
        };
        let job_url = format!("https://{domain}/viewjob?jk={job_key}");

        let mut job = JobPosting::new(site, title, job_url)
            .with_company(first_text(&card, &company_selector))
            .with_location(first_text(&card, &location_selector))
            .with_description(first_text(&card, &snippet_selector));

        if let Some(pay) = first_text(&card, &salary_selector).and_then(|raw| parse_salary(&raw)) {
            job = job.with_compensation(pay.min_amount, pay.max_amount, pay.currency, pay.interval);
        }

        jobs.push(job);
    }

    Ok(jobs)
}

/// Full description of a job view page.
pub fn parse_description(html: &str) -> Result<Option<String>, ScrapeError> {
    let description = selector(Site::Indeed, "#jobDescriptionText")?;
    Ok(document_text(html, &description))
}
