//! Visa Job Search Server
//!
//! Serves the search page and runs searches against the job boards
//! through a small JSON API using Axum.

mod app;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use common::{JobSource, ScrapeError, SearchSettings};
use job_scraper::{Boards, HttpOpts, SearchOpts, logging};
use tokio::net::TcpListener;
use tracing::info;
use tracing::level_filters::LevelFilter;

use crate::app::{AppState, SourceFactory};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Web front end of the visa job search", long_about = None)]
struct Opts {
    /// Address the server listens on
    #[arg(short, long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Log level of application
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log: LevelFilter,

    #[command(flatten)]
    search: SearchOpts,

    #[command(flatten)]
    http: HttpOpts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    logging::init(opts.log);

    info!("Starting Visa Job Search Server...");

    let http = opts.http.clone();
    let make_source: SourceFactory =
        Arc::new(move || -> Result<Box<dyn JobSource + Send>, ScrapeError> {
            Ok(Box::new(Boards::from_opts(&http)?))
        });

    let state = Arc::new(AppState {
        settings: SearchSettings::from(&opts.search),
        make_source,
    });
    let app = app::router(state);

    let listener = TcpListener::bind(opts.bind).await?;
    info!("Server running at http://{}", opts.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
