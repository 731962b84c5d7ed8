//! Shared core of the visa job search: the posting model, the sponsorship
//! keyword matcher, the search aggregator and CSV export.

pub mod export;
pub mod keywords;
pub mod model;
pub mod search;

pub use export::{EXPORT_FILE_NAME, ExportError};
pub use keywords::{SPONSORSHIP_KEYWORDS, mentions_sponsorship};
pub use model::{JobPosting, ScrapeQuery, SearchRequest, Site};
pub use search::{
    Collected, JobSource, NoProgress, Outcome, PairFailure, Progress, ScrapeError,
    SearchCriteria, SearchError, SearchReport, SearchSettings,
};
