mod cli;
mod config;
mod signal_handlers;

use std::env;
use std::path::Path;

use color_eyre::eyre;
use dotenvy::dotenv;
use scan_proto::devcaps::DeviceCapabilities;
use scan_proto::proto::{HttpResponse, ProtoContext, negotiate_capabilities};
use scan_proto::transport::HttpTransport;
use tracing::{Level, event};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::cli::parse_cli;
use crate::config::{Config, Input};

fn main() -> Result<(), color_eyre::Report> {
    // set up .env, if it fails, user didn't provide any
    let _r = dotenv();

    color_eyre::config::HookBuilder::default()
        .capture_span_trace_by_default(false)
        .install()?;

    let config = parse_cli().inspect_err(|error| {
        // this prints the error in color and exits
        if let Some(clap_error) = error.downcast_ref::<clap::error::Error>() {
            clap_error.exit();
        }
    })?;

    let rust_log_value = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| {
        format!(
            "{},scan_proto={},{}={}",
            Level::WARN,
            config.verbosity,
            env!("CARGO_PKG_NAME").replace('-', "_"),
            config.verbosity
        )
    });

    // set up logger
    tracing_subscriber::registry()
        .with(EnvFilter::builder().parse(rust_log_value)?)
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_error::ErrorLayer::default())
        .init();

    // initialize the runtime
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<(), color_eyre::Report> {
    config.log();

    let capabilities = match config.input {
        Input::File(ref path) => decode_file(&config, path)?,
        Input::Url(ref base_uri) => {
            if config.print_request {
                return print_request(&config, base_uri);
            }

            let transport = HttpTransport::new(config.timeout)?;

            tokio::select! {
                result = negotiate_capabilities(&transport, config.protocol, base_uri) => result?,
                _ = signal_handlers::wait_for_sigint() => {
                    event!(Level::WARN, message = "CTRL+C detected, aborting");

                    return Ok(());
                },
                _ = signal_handlers::wait_for_sigterm() => {
                    event!(Level::WARN, message = "Sigterm detected, aborting");

                    return Ok(());
                },
            }
        },
    };

    capabilities.log();

    print!("{}", capabilities);

    Ok(())
}

/// Decodes a capabilities response saved to disk, as if the device had just sent it.
fn decode_file(config: &Config, path: &Path) -> Result<DeviceCapabilities, eyre::Report> {
    let body = std::fs::read(path)?;

    let base_uri = std::path::absolute(path)
        .ok()
        .and_then(|path| Url::from_file_path(path).ok())
        .ok_or_else(|| eyre::eyre!("cannot express {} as an URL", path.display()))?;

    let response = HttpResponse {
        status: 200,
        content_type: None,
        body: body.into_boxed_slice(),
    };

    let capabilities = config
        .protocol
        .handler()
        .devcaps_decode(&ProtoContext::new(&base_uri).with_response(&response))?;

    Ok(capabilities)
}

fn print_request(config: &Config, base_uri: &Url) -> Result<(), color_eyre::Report> {
    let query = config
        .protocol
        .handler()
        .devcaps_query(&ProtoContext::new(base_uri))?;

    println!("{:?} {}", query.method, query.uri);

    if let Some(content_type) = query.content_type {
        println!("Content-Type: {}", content_type);
    }

    if let Some(body) = query.body {
        println!();
        println!("{}", String::from_utf8_lossy(&body));
    }

    Ok(())
}
