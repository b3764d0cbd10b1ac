//! Algoscope
//!
//! Serve the visualizer, or print the steps of one sort as JSON.
//!
//! ```text
//! algoscope [serve [port]]
//! algoscope steps <algorithm> <values...>
//! algoscope complexity
//! ```

use std::env;

use algoscope_core::{complexity_table, parse_number_list, SortAlgorithm};
use algoscope_engine::{fetch_steps_or_local, LocalStepSource, StepRecord};
use algoscope_vis::{HttpStepSource, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn usage() {
    eprintln!("Usage:");
    eprintln!("  algoscope [serve [port]]");
    eprintln!("  algoscope steps <bubble|quick|merge|heap> <values...>");
    eprintln!("  algoscope complexity");
}

async fn steps(config: &VisConfig, args: &[String]) -> Result<Vec<StepRecord>, Box<dyn std::error::Error>> {
    let Some(algorithm) = args.first() else {
        usage();
        return Err("missing algorithm".into());
    };
    let algorithm: SortAlgorithm = algorithm.parse()?;
    let values = parse_number_list(&args[1..].join(" "), 1)?;

    let steps = match &config.step_source {
        Some(url) => fetch_steps_or_local(&HttpStepSource::new(url.clone()), &values, algorithm).await?,
        None => fetch_steps_or_local(&LocalStepSource, &values, algorithm).await?,
    };
    Ok(steps)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algoscope=info,algoscope_vis=info,algoscope_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = VisConfig::from_env()?;

    match args.first().map(String::as_str) {
        None | Some("serve") => {
            let config = match args.get(1) {
                Some(port) => config.with_port(port.parse()?),
                None => config,
            };
            println!("Algoscope");
            println!("=========");
            println!();
            println!("Serving on http://localhost:{}", config.addr.port());
            println!("Assets from {}", config.assets.display());
            println!();
            VisServer::new(config).serve().await?;
        }
        Some("steps") => {
            let steps = steps(&config, &args[1..]).await?;
            println!("{}", serde_json::to_string_pretty(&steps)?);
        }
        Some("complexity") => {
            println!("{}", serde_json::to_string_pretty(&complexity_table())?);
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            usage();
            std::process::exit(2);
        }
    }

    Ok(())
}
