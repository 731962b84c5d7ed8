//! Job board clients and the multi-board job source.

pub mod indeed;
pub mod linkedin;
pub mod ziprecruiter;

use common::{JobPosting, JobSource, ScrapeError, ScrapeQuery, Site};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::HttpOpts;

pub use indeed::Indeed;
pub use linkedin::LinkedIn;
pub use ziprecruiter::ZipRecruiter;

/// Fetches page bodies for the boards.
pub trait Fetch {
    fn get(&self, site: Site, url: &str) -> Result<String, ScrapeError>;
}

impl Fetch for Client {
    fn get(&self, site: Site, url: &str) -> Result<String, ScrapeError> {
        fetch_text(self, site, url)
    }
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, site: Site, url: &str) -> Result<String, ScrapeError> {
        (**self).get(site, url)
    }
}

/// A single job board.
pub trait Board {
    fn site(&self) -> Site;

    /// Returns at most `query.results_wanted` postings.
    fn search(&self, query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError>;
}

/// Searches every requested board in turn.
///
/// A query fails only when every requested board failed; otherwise the
/// boards that answered contribute their postings in site order.
pub struct Boards {
    boards: Vec<Box<dyn Board + Send + Sync>>,
}

impl Boards {
    pub fn new(boards: Vec<Box<dyn Board + Send + Sync>>) -> Self {
        Self { boards }
    }

    /// LinkedIn, Indeed and ZipRecruiter sharing one HTTP client.
    pub fn from_opts(opts: &HttpOpts) -> Result<Self, ScrapeError> {
        let client = opts.build_client()?;
        Ok(Self::new(vec![
            Box::new(LinkedIn::new(client.clone())),
            Box::new(Indeed::new(client.clone())),
            Box::new(ZipRecruiter::new(client)),
        ]))
    }

    fn board(&self, site: Site) -> Option<&(dyn Board + Send + Sync)> {
        self.boards
            .iter()
            .find(|board| board.site() == site)
            .map(|board| board.as_ref())
    }
}

impl JobSource for Boards {
    fn scrape(&self, query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError> {
        let mut jobs = Vec::new();
        let mut errors = Vec::new();

        for site in &query.sites {
            let Some(board) = self.board(*site) else {
                warn!("No client configured for {}", site);
                errors.push(format!("{site}: no client configured"));
                continue;
            };

            match board.search(query) {
                Ok(found) => {
                    info!(
                        "{} returned {} postings for '{}' in '{}'",
                        site,
                        found.len(),
                        query.search_term,
                        query.location
                    );
                    jobs.extend(found);
                }
                Err(e) => {
                    warn!("{} failed for '{}' in '{}': {}", site, query.search_term, query.location, e);
                    errors.push(format!("{site}: {e}"));
                }
            }
        }

        if !query.sites.is_empty() && errors.len() == query.sites.len() {
            return Err(ScrapeError::AllSitesFailed(errors));
        }
        Ok(jobs)
    }
}

pub(crate) fn build_url(site: Site, base: &str, params: &[(&str, String)]) -> Result<Url, ScrapeError> {
    Url::parse_with_params(base, params).map_err(|e| ScrapeError::Parse {
        site,
        message: format!("bad url {base}: {e}"),
    })
}

/// GETs a page and returns its body, failing on non-success statuses.
pub(crate) fn fetch_text(client: &Client, site: Site, url: &str) -> Result<String, ScrapeError> {
    debug!("Fetching {}", url);

    let response = client
        .get(url)
        .send()
        .map_err(|e| ScrapeError::Network(format!("failed to fetch {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            site,
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .map_err(|e| ScrapeError::Network(format!("failed to read response body: {e}")))?;
    debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}

/// Whole days covering `hours`, at least one.
pub(crate) fn days_covering(hours: u32) -> u32 {
    hours.div_ceil(24).max(1)
}

/// Canned pages for driving the boards' paging loops in tests.
#[cfg(test)]
pub(crate) mod stub {
    use std::cell::RefCell;

    use common::{ScrapeError, ScrapeQuery, Site};
    use url::Url;

    use super::Fetch;

    pub(crate) fn query(results_wanted: usize, fetch_description: bool) -> ScrapeQuery {
        ScrapeQuery {
            sites: Site::ALL.to_vec(),
            search_term: "Data Analyst".to_string(),
            location: "Chicago, IL".to_string(),
            results_wanted,
            hours_old: 72,
            fetch_description,
            country: "USA".to_string(),
        }
    }

    pub(crate) struct StubFetch<R> {
        respond: R,
        urls: RefCell<Vec<String>>,
    }

    impl<R: Fn(&str) -> Result<String, ScrapeError>> StubFetch<R> {
        pub(crate) fn new(respond: R) -> Self {
            Self {
                respond,
                urls: RefCell::new(Vec::new()),
            }
        }

        /// Every url requested so far, in order.
        pub(crate) fn urls(&self) -> Vec<String> {
            self.urls.borrow().clone()
        }
    }

    impl<R: Fn(&str) -> Result<String, ScrapeError>> Fetch for StubFetch<R> {
        fn get(&self, _site: Site, url: &str) -> Result<String, ScrapeError> {
            self.urls.borrow_mut().push(url.to_string());
            (self.respond)(url)
        }
    }

    /// Value of a query parameter of `url`.
    pub(crate) fn param(url: &str, name: &str) -> Option<String> {
        Url::parse(url)
            .ok()?
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub(crate) fn too_many_requests(site: Site) -> ScrapeError {
        ScrapeError::Status { site, status: 429 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubBoard {
        site: Site,
        result: Result<Vec<JobPosting>, ScrapeError>,
        seen: Mutex<usize>,
    }

    impl StubBoard {
        fn ok(site: Site, titles: &[&str]) -> Self {
            let jobs = titles
                .iter()
                .map(|t| JobPosting::new(site, *t, format!("https://{site}.test/{t}")))
                .collect();
            Self {
                site,
                result: Ok(jobs),
                seen: Mutex::new(0),
            }
        }

        fn failing(site: Site) -> Self {
            Self {
                site,
                result: Err(ScrapeError::Status { site, status: 429 }),
                seen: Mutex::new(0),
            }
        }
    }

    impl Board for StubBoard {
        fn site(&self) -> Site {
            self.site
        }

        fn search(&self, _query: &ScrapeQuery) -> Result<Vec<JobPosting>, ScrapeError> {
            *self.seen.lock().unwrap() += 1;
            self.result.clone()
        }
    }

    fn query(sites: &[Site]) -> ScrapeQuery {
        ScrapeQuery {
            sites: sites.to_vec(),
            search_term: "Data Analyst".to_string(),
            location: "Chicago, IL".to_string(),
            results_wanted: 15,
            hours_old: 72,
            fetch_description: false,
            country: "USA".to_string(),
        }
    }

    #[test]
    fn test_boards_concatenate_in_site_order() {
        let boards = Boards::new(vec![
            Box::new(StubBoard::ok(Site::ZipRecruiter, &["z1"])),
            Box::new(StubBoard::ok(Site::LinkedIn, &["l1", "l2"])),
            Box::new(StubBoard::ok(Site::Indeed, &["i1"])),
        ]);

        let jobs = boards.scrape(&query(&Site::ALL)).unwrap();
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();

        assert_eq!(titles, vec!["l1", "l2", "i1", "z1"]);
    }

    #[test]
    fn test_one_failing_board_does_not_fail_the_query() {
        let boards = Boards::new(vec![
            Box::new(StubBoard::failing(Site::LinkedIn)),
            Box::new(StubBoard::ok(Site::Indeed, &["i1"])),
        ]);

        let jobs = boards.scrape(&query(&[Site::LinkedIn, Site::Indeed])).unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_all_boards_failing_fails_the_query() {
        let boards = Boards::new(vec![
            Box::new(StubBoard::failing(Site::LinkedIn)),
            Box::new(StubBoard::failing(Site::Indeed)),
        ]);

        let err = boards
            .scrape(&query(&[Site::LinkedIn, Site::Indeed, Site::ZipRecruiter]))
            .unwrap_err();

        match err {
            ScrapeError::AllSitesFailed(messages) => {
                assert_eq!(messages.len(), 3);
                assert!(messages[0].starts_with("linkedin: "));
                assert_eq!(messages[2], "zip_recruiter: no client configured");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_only_requested_sites_are_searched() {
        let boards = Boards::new(vec![
            Box::new(StubBoard::ok(Site::LinkedIn, &["l1"])),
            Box::new(StubBoard::ok(Site::Indeed, &["i1"])),
        ]);

        let jobs = boards.scrape(&query(&[Site::Indeed])).unwrap();
        assert_eq!(jobs[0].site, Site::Indeed);
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_days_covering() {
        assert_eq!(days_covering(72), 3);
        assert_eq!(days_covering(73), 4);
        assert_eq!(days_covering(0), 1);
    }
}
