use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ontofacet::{
    Config, EngineOptions, FacetCategory, Operation, Page, RecordProjection, SearchEngine,
    SearchRequest, StoreClient,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ontofacet", about = "Faceted ontology search over experiment records")]
struct Cli {
    /// Config file to use instead of ~/.config/ontofacet/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Graph snapshot (file path or http(s) URL); overrides `store.snapshot`.
    #[arg(long, global = true)]
    snapshot: Option<String>,

    /// Write debug logs to /tmp/ontofacet-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find records matching facet and free-text filters.
    Search(SearchArgs),
    /// List the terms below a term in the hierarchy.
    Descendants { id: String },
    /// List the terms above a term in the hierarchy.
    Ancestors { id: String },
    /// Check whether two terms lie on one hierarchy path.
    Related { a: String, b: String },
    /// Count linked records per term of a category, or print catalog
    /// totals when no category is given.
    Metrics { category: Option<FacetCategory> },
    /// Look up terms of a category by name fragment.
    Terms {
        category: FacetCategory,
        fragment: String,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = Page::DEFAULT_LIMIT)]
        limit: usize,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Read the request from a JSON file instead of flags.
    #[arg(long, conflicts_with_all = ["celltype", "disease", "tissue", "organism", "query"])]
    request: Option<PathBuf>,

    #[arg(long)]
    celltype: Vec<String>,
    #[arg(long)]
    celltype_op: Option<String>,
    #[arg(long)]
    disease: Vec<String>,
    #[arg(long)]
    disease_op: Option<String>,
    #[arg(long)]
    tissue: Vec<String>,
    #[arg(long)]
    tissue_op: Option<String>,
    #[arg(long)]
    organism: Vec<String>,
    #[arg(long)]
    organism_op: Option<String>,

    /// Free-text term; wrap in quotes to match a whole word.
    #[arg(long)]
    query: Vec<String>,
    #[arg(long)]
    query_op: Option<String>,

    /// Print matching ids only.
    #[arg(long)]
    ids_only: bool,

    /// Omit keywords, technology and term links from records.
    #[arg(long)]
    summary: bool,
}

impl SearchArgs {
    fn to_request(&self, default_op: Operation) -> anyhow::Result<SearchRequest> {
        if let Some(path) = &self.request {
            let raw = std::fs::read(path)
                .with_context(|| format!("reading request {}", path.display()))?;
            return SearchRequest::from_json(&raw, default_op)
                .with_context(|| format!("parsing request {}", path.display()));
        }

        let op = |group: &str, token: &Option<String>| -> anyhow::Result<Operation> {
            match token {
                Some(t) => Ok(Operation::parse(group, t)?),
                None => Ok(default_op),
            }
        };

        let groups = [
            (FacetCategory::CellTypes, &self.celltype, &self.celltype_op),
            (FacetCategory::Diseases, &self.disease, &self.disease_op),
            (FacetCategory::Tissues, &self.tissue, &self.tissue_op),
            (FacetCategory::Organism, &self.organism, &self.organism_op),
        ];
        let mut request = SearchRequest::new();
        for (category, inputs, token) in groups {
            request = request.facet(category, inputs.iter().cloned(), op(category.as_str(), token)?);
        }
        Ok(request.text(self.query.iter().cloned(), op("query", &self.query_op)?))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load().context("loading ~/.config/ontofacet/config.toml")?,
    };
    if let Some(snapshot) = cli.snapshot {
        config.store.snapshot = Some(snapshot);
    }

    let client = StoreClient::new(&config.store)?;
    let graph = match client.configured_source() {
        Some(source) => client
            .load(source)
            .await
            .with_context(|| format!("loading snapshot {source}"))?,
        None => anyhow::bail!("no graph snapshot configured; pass --snapshot or set store.snapshot"),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Search(args) => {
            let request = args.to_request(config.search.default_operation)?;
            let engine = SearchEngine::from_graph(Arc::new(graph), EngineOptions::from(&config));
            let ids = engine.match_ids(&request).await?;
            if args.ids_only {
                for id in ids.iter() {
                    writeln!(out, "{id}")?;
                }
            } else {
                let projection =
                    if args.summary { RecordProjection::Summary } else { RecordProjection::Full };
                let records = engine.hydrate(&ids, projection).await?;
                serde_json::to_writer_pretty(&mut out, &records)?;
                writeln!(out)?;
            }
        }
        Command::Descendants { id } => {
            let terms = graph.descendants(&id)?;
            serde_json::to_writer_pretty(&mut out, &terms)?;
            writeln!(out)?;
        }
        Command::Ancestors { id } => {
            let terms = graph.ancestors(&id)?;
            serde_json::to_writer_pretty(&mut out, &terms)?;
            writeln!(out)?;
        }
        Command::Related { a, b } => {
            writeln!(out, "{}", graph.has_relation(&a, &b)?)?;
        }
        Command::Metrics { category: Some(category) } => {
            serde_json::to_writer_pretty(&mut out, &graph.facet_metrics(category))?;
            writeln!(out)?;
        }
        Command::Metrics { category: None } => {
            serde_json::to_writer_pretty(&mut out, &graph.totals())?;
            writeln!(out)?;
        }
        Command::Terms { category, fragment, offset, limit } => {
            let vocabularies = config.vocabularies.for_category(category);
            let terms = graph.term_lookup(vocabularies, &fragment, Page::new(offset, limit));
            serde_json::to_writer_pretty(&mut out, &terms)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    let filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
    };

    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/ontofacet-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter("debug"))
            .init();
        tracing::info!("ontofacet debug log started, tail -f /tmp/ontofacet-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("warn"))
            .init();
    }
    Ok(())
}

