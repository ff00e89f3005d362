//! Reads rendered page HTML from stdin and prints the harvest as JSON.
//!
//! Usage: `harvest_stdin <base-url> [--options <file.json>] [--content-type <value>]`
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `warn`).

use std::fs;
use std::io::{self, Read};
use std::process;

use thread_harvest::{harvest_bytes, Options};
use tracing_subscriber::EnvFilter;

struct Args {
    base_url: String,
    options_path: Option<String>,
    content_type: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut base_url = None;
    let mut options_path = None;
    let mut content_type = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => options_path = Some(args.next().ok_or("--options needs a file")?),
            "--content-type" => content_type = Some(args.next().ok_or("--content-type needs a value")?),
            positional if base_url.is_none() => base_url = Some(positional.to_string()),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    Ok(Args {
        base_url: base_url.ok_or("missing <base-url>")?,
        options_path,
        content_type,
    })
}

fn load_options(path: Option<&str>) -> Result<Options, String> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let raw = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("{path}: {e}"))
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let options = load_options(args.options_path.as_deref())?;

    let mut html = Vec::new();
    io::stdin()
        .read_to_end(&mut html)
        .map_err(|e| format!("failed to read stdin: {e}"))?;

    let harvest = harvest_bytes(&html, args.content_type.as_deref(), &args.base_url, &options)
        .map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&harvest).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(message) = run() {
        eprintln!("harvest_stdin: {message}");
        eprintln!("usage: harvest_stdin <base-url> [--options <file.json>] [--content-type <value>]");
        process::exit(1);
    }
}
