use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt::layer, layer::SubscriberExt, registry, util::SubscriberInitExt, EnvFilter,
};

/// Dependency crates that are far too chatty below `info`.
pub const DEFAULT_LOG_FILTERS: &[&str] = &[
    "hyper=info",
    "reqwest=info",
    "html5ever=info",
    "selectors=info",
];

/// Installs the global subscriber. `LOG` overrides `level` when set.
pub fn init(level: LevelFilter) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("LOG")
        .from_env_lossy();

    for rule in DEFAULT_LOG_FILTERS {
        match rule.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("ignoring log filter {rule}: {e}"),
        }
    }
    registry().with(filter).with(layer().with_writer(std::io::stderr)).init();
}
