mod display;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use lawdigest_core::ProcessingPeriod;
use lawdigest_core::schema::{documents_batch, rank_slots_batch};
use lawdigest_pipeline::http::DEFAULT_BASE_URL;
use lawdigest_pipeline::source::{json_files, read_json};
use lawdigest_pipeline::{
    DirSource, HttpSource, LawSource, PipelineConfig, PipelinePayload, PipelineRun,
    normalize_contents,
};
use lawdigest_rank::{DEFAULT_TOP_K, category_counts, rank_and_select, score_all, to_rank_slots};
use lawdigest_store::{DuckStore, MemoryStore, PersistenceGateway};
use tracing::info;

#[derive(Parser)]
#[command(name = "lawdigest", version, about = "Monthly digest of newly effective laws")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full monthly pipeline: list, fetch, normalize, rank, persist.
    Run(RunArgs),
    /// Normalize, classify and rank a directory of content files without persisting.
    Score {
        dir: PathBuf,
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        /// Print rank slots as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print a stored period's ranking.
    Show {
        #[arg(long, env = "LAWDIGEST_DB")]
        db: PathBuf,
        #[arg(long)]
        period: ProcessingPeriod,
        /// Show one document as a card instead of the ranking table.
        #[arg(long)]
        law: Option<String>,
    },
    /// Dump the classifier and scoring tables as JSON.
    Tables,
}

#[derive(Args)]
struct PeriodArgs {
    /// Processing month as YYYY-MM; defaults to the current month.
    #[arg(long, conflicts_with_all = ["year", "month"])]
    period: Option<ProcessingPeriod>,
    #[arg(long, requires = "month")]
    year: Option<i32>,
    #[arg(long, requires = "year")]
    month: Option<u32>,
}

impl PeriodArgs {
    fn payload(&self) -> anyhow::Result<PipelinePayload> {
        match self.period {
            Some(period) => Ok(PipelinePayload::from_period(period)),
            None => PipelinePayload::prepare(self.year, self.month).context("invalid --year/--month"),
        }
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    period: PeriodArgs,
    /// Directory of `<YYYY-MM>/*.json` content files. Takes precedence over the API.
    #[arg(long, env = "LAWDIGEST_SOURCE_DIR")]
    source_dir: Option<PathBuf>,
    #[arg(long, env = "LAW_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "LAW_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// DuckDB file. Runs against an in-memory store when absent.
    #[arg(long, env = "LAWDIGEST_DB")]
    db: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
    /// Concurrent content requests.
    #[arg(long, default_value_t = 3)]
    workers: usize,
    /// Pause between listing pages, in milliseconds.
    #[arg(long, default_value_t = 100)]
    request_delay_ms: u64,
    /// Keep the period's stored documents; only the written categories' slots are replaced.
    #[arg(long)]
    keep_existing: bool,
    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    info!("lawdigest v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Score {
            dir,
            period,
            top_k,
            json,
        } => score(&dir, &period, top_k, json).await,
        Command::Show { db, period, law } => show(&db, period, law.as_deref()),
        Command::Tables => {
            println!("{}", serde_json::to_string_pretty(&lawdigest_rank::snapshot())?);
            Ok(())
        }
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let payload = args.period.payload()?;
    let config = PipelineConfig {
        top_k: args.top_k,
        workers: args.workers,
        replace_existing: !args.keep_existing,
        request_delay: Duration::from_millis(args.request_delay_ms),
    };

    let source: Box<dyn LawSource> = match (args.source_dir, args.api_key) {
        (Some(dir), _) => Box::new(DirSource::new(dir)),
        (None, Some(key)) => Box::new(
            HttpSource::new(args.base_url, key)
                .context("building HTTP client")?
                .with_request_delay(config.request_delay),
        ),
        (None, None) => bail!("no source configured: pass --source-dir or set LAW_API_KEY"),
    };

    let mut store: Box<dyn PersistenceGateway> = match &args.db {
        Some(path) => Box::new(
            DuckStore::open_persistent(path)
                .with_context(|| format!("opening database {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };

    info!(period = %payload.period(), "starting run");
    let report = PipelineRun::new(payload, config, source.as_ref(), &mut *store)
        .run()
        .await
        .context("pipeline run failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display::print_report(&report);
    }
    Ok(())
}

async fn score(dir: &Path, period: &PeriodArgs, top_k: usize, json: bool) -> anyhow::Result<()> {
    let period = period.payload()?.period();
    let files = json_files(dir)
        .await
        .with_context(|| format!("listing {}", dir.display()))?;

    let mut contents = Vec::with_capacity(files.len());
    for path in &files {
        let value = read_json(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        contents.push(value);
    }

    let (documents, summary) = normalize_contents(&contents, period);
    info!(
        files = summary.total_files,
        documents = summary.total_records,
        failures = summary.failure_count,
        duplicates = summary.duplicate_count,
        "normalized"
    );

    let scored = score_all(&documents);
    let ranking = rank_and_select(&scored, top_k);
    if json {
        let slots = to_rank_slots(&ranking, period);
        println!("{}", serde_json::to_string_pretty(&slots)?);
    } else {
        display::print_ranking(period, &ranking, &category_counts(&scored));
    }
    Ok(())
}

fn show(db: &Path, period: ProcessingPeriod, law: Option<&str>) -> anyhow::Result<()> {
    let store = DuckStore::open_persistent(db)
        .with_context(|| format!("opening database {}", db.display()))?;

    let Some(law_key) = law else {
        let batches = store.period_ranking(period)?;
        if batches.iter().all(|b| b.num_rows() == 0) {
            println!("no ranking stored for {period}");
            return Ok(());
        }
        arrow::util::pretty::print_batches(&batches)?;
        return Ok(());
    };

    let documents = store.documents(period)?;
    let Some(document) = documents.iter().find(|d| d.law_key == law_key) else {
        bail!("{law_key} not stored for {period}");
    };
    let slot = store
        .rank_slots(period)?
        .into_iter()
        .find(|s| s.law_key == law_key);

    let document_batch = documents_batch(std::slice::from_ref(document))?;
    let slot_batch = slot
        .as_ref()
        .map(|s| rank_slots_batch(std::slice::from_ref(s)))
        .transpose()?;
    display::print_document_card(&document_batch, slot_batch.as_ref());
    Ok(())
}
