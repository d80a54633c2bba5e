use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use triplegraph::config::{self, OutputFormat, TranslatorConfig};
use triplegraph::query_compiler::GraphQueryCompiler;
use triplegraph::query_model::QueryFile;
use triplegraph::sql_generator::{generate_sql, teardown_statements, AnsiDdlGenerator};
use triplegraph::table_catalog::{CatalogConfig, PredicateTableMap, PredicateTableResolver};

/// triplegraph - compile graph queries to SQL over predicate-partitioned tables
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Translator configuration file (YAML); environment variables are used otherwise
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CommonArgs {
    /// Predicate table catalog (YAML)
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Terminate printed statements with `;`
    #[arg(long, global = true)]
    terminate: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a query file to a SELECT statement
    Compile {
        /// Query file (YAML, or JSON with a .json extension)
        #[arg(long)]
        query: String,

        /// Result variable; overrides the targets of the query file
        #[arg(long = "target")]
        targets: Vec<String>,

        /// Order results by this target
        #[arg(long)]
        order_by: Option<String>,

        /// Sort descending (with --order-by)
        #[arg(long, requires = "order_by")]
        desc: bool,
    },
    /// Print DROP statements for every table of the catalog
    Teardown,
}

impl From<CommonArgs> for config::CliConfig {
    fn from(args: CommonArgs) -> Self {
        config::CliConfig {
            catalog_path: args.catalog,
            format: args.format,
            terminate_statements: args.terminate,
        }
    }
}

fn main() {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => TranslatorConfig::from_yaml_file(path)?,
        None => {
            dotenv().ok();
            TranslatorConfig::from_env()?
        }
    };
    config.merge(cli.common.into());
    validator::Validate::validate(&config).context("Configuration error")?;

    let catalog = load_catalog(&config)?;
    match cli.command {
        Command::Compile {
            query,
            targets,
            order_by,
            desc,
        } => compile(&config, &catalog, &query, targets, order_by, desc),
        Command::Teardown => {
            for statement in teardown_statements(&AnsiDdlGenerator, &catalog) {
                println!("{}", config.finish_statement(&statement));
            }
            Ok(())
        }
    }
}

fn load_catalog(config: &TranslatorConfig) -> anyhow::Result<PredicateTableMap> {
    let catalog = CatalogConfig::from_yaml_file(&config.catalog_path)
        .and_then(|c| c.to_table_map())
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path))?;
    log::info!(
        "Loaded catalog {} with {} predicate table(s)",
        catalog.name.as_deref().unwrap_or(&config.catalog_path),
        catalog.len()
    );
    Ok(catalog)
}

fn compile(
    config: &TranslatorConfig,
    catalog: &PredicateTableMap,
    query_path: &str,
    targets: Vec<String>,
    order_by: Option<String>,
    desc: bool,
) -> anyhow::Result<()> {
    let query_file = QueryFile::from_file(query_path)
        .with_context(|| format!("Failed to load query {}", query_path))?;

    let mut compiler =
        GraphQueryCompiler::new(&query_file.query, PredicateTableResolver::new(catalog));
    let targets = if targets.is_empty() {
        query_file.targets.clone()
    } else {
        targets
    };
    if targets.is_empty() {
        bail!("No target variables: pass --target or list `targets` in {}", query_path);
    }
    compiler.set_targets(targets);

    let ordering = match order_by {
        Some(variable) => Some((variable, desc)),
        None => query_file
            .order_by
            .as_ref()
            .map(|o| (o.variable.clone(), o.descending)),
    };
    if let Some((variable, descending)) = ordering {
        compiler.order_by(&variable, descending)?;
    }

    let statement = compiler.build_statement()?;
    match config.format {
        OutputFormat::Sql => println!("{}", config.finish_statement(&generate_sql(&statement))),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&statement)?),
    }
    Ok(())
}
