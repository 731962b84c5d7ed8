//! Visa Job Search
//!
//! Searches LinkedIn, Indeed and ZipRecruiter for every location/role pair,
//! keeps the postings that mention visa sponsorship and saves them to CSV.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use common::search::{self, DEFAULT_RESULTS_WANTED};
use common::{
    export, JobPosting, Outcome, Progress, ScrapeError, SearchCriteria, SearchRequest,
    SearchSettings, EXPORT_FILE_NAME,
};
use job_scraper::{logging, Boards, HttpOpts, SearchOpts};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Find recent job postings that mention visa sponsorship", long_about = None)]
struct Opts {
    /// Role to search for (up to 3)
    #[arg(short, long = "role", default_value = "Data Analysis")]
    roles: Vec<String>,

    /// Location to search in (up to 3)
    #[arg(short = 'L', long = "location", default_value = "Chicago, IL")]
    locations: Vec<String>,

    /// Results requested per search from each job board (5-50)
    #[arg(short = 'n', long, env, default_value_t = DEFAULT_RESULTS_WANTED)]
    results: usize,

    /// Where to write the matching postings
    #[arg(short, long, default_value = EXPORT_FILE_NAME)]
    output: PathBuf,

    /// Log level of application
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log: LevelFilter,

    #[command(flatten)]
    search: SearchOpts,

    #[command(flatten)]
    http: HttpOpts,
}

/// Prints a status line per pair, like a progress bar would.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn searching(&mut self, request: &SearchRequest, current: usize, total: usize) {
        let percent = current * 100 / total.max(1);
        eprintln!(
            "📡 [{percent:>3}%] Searching for '{}' in '{}' ({current}/{total})...",
            request.role, request.location
        );
    }

    fn found(&mut self, _request: &SearchRequest, count: usize) {
        eprintln!("✅ {count} postings");
    }

    fn failed(&mut self, request: &SearchRequest, error: &ScrapeError) {
        eprintln!(
            "⚠️  Error searching for {} in {}: {}",
            request.role, request.location, error
        );
    }

    fn processing(&mut self) {
        eprintln!("📊 Processing results...");
    }
}

const DISPLAY_COLUMNS: [&str; 9] = [
    "site",
    "title",
    "company",
    "location",
    "min_amount",
    "max_amount",
    "currency",
    "mentions_visa",
    "job_url",
];
const MAX_CELL_WIDTH: usize = 40;

fn display_row(job: &JobPosting) -> [String; 9] {
    let amount = |a: Option<f64>| a.map(|v| v.to_string()).unwrap_or_default();
    [
        job.site.to_string(),
        job.title.clone(),
        job.company.clone().unwrap_or_default(),
        job.location.clone().unwrap_or_default(),
        amount(job.min_amount),
        amount(job.max_amount),
        job.currency.clone().unwrap_or_default(),
        job.mentions_visa.to_string(),
        job.job_url.clone(),
    ]
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        cell.to_string()
    } else {
        let mut short: String = cell.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Renders the display columns as an aligned text table.
fn render_table(jobs: &[JobPosting]) -> String {
    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|job| {
            display_row(job)
                .iter()
                .enumerate()
                // the url is left whole so it stays clickable
                .map(|(i, cell)| if i == 8 { cell.clone() } else { truncate(cell, MAX_CELL_WIDTH) })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = DISPLAY_COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(DISPLAY_COLUMNS.to_vec())];
    for row in &rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

fn main() -> anyhow::Result<ExitCode> {
    let opts = Opts::parse();
    logging::init(opts.log);

    let criteria = match SearchCriteria::new(&opts.roles, &opts.locations, opts.results) {
        Ok(criteria) => criteria,
        Err(e) => {
            eprintln!("❌ {e}");
            return Ok(ExitCode::from(2));
        }
    };
    let settings = SearchSettings::from(&opts.search);

    println!("🔍 Job Search & Visa Filter");
    let boards = Boards::from_opts(&opts.http)?;
    let report = search::run(&boards, &criteria, &settings, &mut ConsoleProgress);

    match &report.outcome {
        Outcome::Matches(jobs) => {
            println!("✨ {}", report.outcome.message());
            println!("{}", render_table(jobs));

            let file = File::create(&opts.output)
                .with_context(|| format!("failed to create {}", opts.output.display()))?;
            export::write_csv(file, jobs)
                .with_context(|| format!("failed to write {}", opts.output.display()))?;
            println!("💾 Saved {} jobs to {:?}", jobs.len(), opts.output);
        }
        Outcome::NoMatches => println!("ℹ️  {}", report.outcome.message()),
        Outcome::NoJobsFound => println!("❌ {}", report.outcome.message()),
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Site;

    #[test]
    fn test_defaults_match_the_form() {
        let opts = Opts::try_parse_from(["job-scraper"]).unwrap();
        assert_eq!(opts.roles, vec!["Data Analysis"]);
        assert_eq!(opts.locations, vec!["Chicago, IL"]);
        assert_eq!(opts.results, 15);
        assert_eq!(opts.output, PathBuf::from("job_search_results.csv"));
    }

    #[test]
    fn test_repeated_flags_collect() {
        let opts = Opts::try_parse_from([
            "job-scraper",
            "-r",
            "Data Analyst",
            "--role",
            "BI Developer",
            "-L",
            "Austin, TX",
            "-n",
            "30",
        ])
        .unwrap();

        assert_eq!(opts.roles, vec!["Data Analyst", "BI Developer"]);
        assert_eq!(opts.locations, vec!["Austin, TX"]);
        let criteria = SearchCriteria::new(&opts.roles, &opts.locations, opts.results).unwrap();
        assert_eq!(criteria.pair_count(), 2);
    }

    #[test]
    fn test_out_of_range_results_fail_validation() {
        let opts = Opts::try_parse_from(["job-scraper", "-n", "60"]).unwrap();
        assert!(SearchCriteria::new(&opts.roles, &opts.locations, opts.results).is_err());
    }

    #[test]
    fn test_render_table() {
        let mut job = JobPosting::new(Site::Indeed, "Data Analyst", "https://www.indeed.com/viewjob?jk=1")
            .with_company(Some("Initech".to_string()))
            .with_compensation(Some(45.0), Some(55.0), Some("USD".to_string()), None);
        job.mentions_visa = true;

        let table = render_table(&[job]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("site    title"));
        assert!(lines[1].starts_with("indeed  Data Analyst"));
        assert!(lines[1].contains("45  "));
        assert!(lines[1].ends_with("true           https://www.indeed.com/viewjob?jk=1"));
    }

    #[test]
    fn test_truncate_long_cells() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
