use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use logsink_core::config::SinkProperties;
use logsink_core::emitter::SINK_TARGET;

#[derive(Parser)]
#[command(name = "logsink", about = "Log sink: logs every message it receives")]
struct Cli {
    /// TOML file layered over the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logger name.
    #[arg(long)]
    name: Option<String>,

    /// Level to log at: trace, debug, info, warn, error, fatal.
    #[arg(long)]
    level: Option<String>,

    /// Selector for the logged value, e.g. `#this` or `payload.toUpperCase()`.
    #[arg(long)]
    expression: Option<String>,

    /// What to do with invalid UTF-8 in text payloads: lossy or preserve.
    #[arg(long)]
    decode: Option<String>,

    /// Read messages from this file instead of stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Line framing.
    #[arg(long, value_parser = ["raw", "envelope"])]
    format: Option<String>,

    /// Content type assumed for messages without a contentType header.
    #[arg(long = "content-type")]
    content_type: Option<String>,

    /// Where log lines go.
    #[arg(long, value_parser = ["tracing", "stdout", "stderr"])]
    output: Option<String>,

    /// Verbose diagnostics on stderr.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn properties(self) -> anyhow::Result<SinkProperties> {
        let mut loader = SinkProperties::loader()
            .set_opt("log.name", self.name)
            .set_opt("log.level", self.level)
            .set_opt("log.expression", self.expression)
            .set_opt("log.decode", self.decode)
            .set_opt("input.format", self.format)
            .set_opt("input.default_content_type", self.content_type)
            .set_opt("output.backend", self.output);
        if let Some(path) = self.config {
            loader = loader.file(path);
        }
        if let Some(path) = self.input {
            loader = loader
                .set("input.source", "file")
                .set("input.path", path.display().to_string());
        }
        loader.load().context("invalid configuration")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("{base},{SINK_TARGET}=trace"))
            }),
        )
        .init();

    let properties = cli.properties()?;

    tokio::select! {
        summary = logsink::run(properties) => {
            summary?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
    }
    Ok(())
}
