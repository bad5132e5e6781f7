use anyhow::{bail, Context, Result};
use rentscraper::{
    encoding,
    extract::{self, structural},
    fetch,
    group::GenreGroups,
    report, ScrapeError,
};
use reqwest::blocking::Client;
use scraper::Html;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const FONT_ENV_VAR: &str = "RENTSCRAPER_FONT";
const DEBUG_DUMP_FILE: &str = "debug_output.html";

struct Args {
    url: String,
    structural: bool,
    pdf_dir: Option<PathBuf>,
    font: Option<PathBuf>,
    stats: bool,
}

fn parse_args() -> Result<Args> {
    let mut url = None;
    let mut structural = false;
    let mut pdf_dir = None;
    let mut font = None;
    let mut stats = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--structural" => structural = true,
            "--stats" => stats = true,
            "--pdf" => match args.next() {
                Some(dir) => pdf_dir = Some(PathBuf::from(dir)),
                None => bail!("--pdf requires an output directory"),
            },
            "--font" => match args.next() {
                Some(path) => font = Some(PathBuf::from(path)),
                None => bail!("--font requires a file path"),
            },
            other if other.starts_with('-') => {
                bail!("unknown option `{other}`\n{USAGE}")
            }
            other => {
                if url.replace(other.to_string()).is_some() {
                    bail!("only one URL may be given\n{USAGE}");
                }
            }
        }
    }

    match url {
        Some(url) => Ok(Args {
            url,
            structural,
            pdf_dir,
            font,
            stats,
        }),
        None => bail!("missing URL\n{USAGE}"),
    }
}

const USAGE: &str = "usage: rentscraper <url> [--structural] [--pdf <dir>] [--font <ttf>] [--stats]";

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    if let Err(err) = run() {
        // "table absent" is an expected outcome, not a crash
        if matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::TableNotFound)
        ) {
            error!("no inventory table found in the document; nothing to report");
        } else {
            error!(error = ?err, "run failed");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args()?;

    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("building http client")?;

    let raw = fetch::fetch_document(&client, &args.url)?;
    let text = encoding::decode(&raw);
    info!(chars = text.chars().count(), "decoded document");

    let groups = if args.structural {
        let doc = Html::parse_document(&text);
        structural::log_page_structure(&doc);
        let (records, diagnostics) = structural::extract_items(&doc);
        info!(
            items = diagnostics.items_extracted,
            dropped = diagnostics.incomplete_items.len(),
            missing_containers = diagnostics.missing_containers.len(),
            "structural extraction finished"
        );
        if args.stats {
            println!(
                "{}",
                serde_json::to_string_pretty(&diagnostics)
                    .context("serializing extraction stats")?
            );
        }
        if records.is_empty() {
            // keep the page around so the selector mismatch can be inspected
            fs::write(DEBUG_DUMP_FILE, &text)
                .with_context(|| format!("writing {DEBUG_DUMP_FILE}"))?;
            info!(file = DEBUG_DUMP_FILE, "no items found, dumped page for inspection");
        }
        GenreGroups::from_records(records)
    } else {
        let block = extract::embedded::extract_table(&text)?;
        let records = block.records()?;
        info!(rows = records.len(), "parsed embedded table");
        GenreGroups::from_records(records)
    };

    match &args.pdf_dir {
        Some(dir) => {
            let font = args
                .font
                .clone()
                .or_else(|| std::env::var_os(FONT_ENV_VAR).map(PathBuf::from));
            let written = report::pdf::write_documents(&groups, dir, font.as_deref())?;
            info!(documents = written.len(), "wrote genre documents");
        }
        None => report::console::print_summary(&groups).context("writing summary")?,
    }

    Ok(())
}
