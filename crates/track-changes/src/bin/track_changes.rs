//! `track-changes` - replay mutations over a document and query the change log.
//!
//! Usage:
//!   track-changes '<steps-array-json>' '<query>'
//!
//! The document is read from stdin. Steps look like
//! `{"op": "set", "path": "/a", "value": 1}` with `op` one of `set`,
//! `assign`, `push`, `unset`. The query is `changed:<pointer>`,
//! `previous:<pointer>` or `log`.
//!
//! `TRACK_CHANGES_CONFIG` may name a TOML config file. Logging goes to
//! stderr and is filtered by `RUST_LOG`.

use std::io::{self, Read, Write};
use std::path::Path;

use track_changes::cli::run_with_config;
use track_changes::TrackerConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (steps, query) = match (args.get(1), args.get(2)) {
        (Some(steps), Some(query)) => (steps.clone(), query.clone()),
        _ => {
            eprintln!("Usage: track-changes '<steps-array-json>' '<query>'");
            std::process::exit(1);
        }
    };

    let config = match std::env::var_os("TRACK_CHANGES_CONFIG") {
        Some(path) => match TrackerConfig::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        None => TrackerConfig::default(),
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match run_with_config(buf.trim(), &steps, &query, config) {
        Ok(result) => {
            let mut stdout = io::stdout();
            if let Err(e) = stdout
                .write_all(result.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
            {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
