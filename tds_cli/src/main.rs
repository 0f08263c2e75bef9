use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tdsgenerator::{
    DatasetOptions, JsonRepository, MetadataRepository, SourceKind, create_tds, create_tdsx,
};

/// Generate a Tableau data source document from a dataset manifest.
#[derive(Parser)]
#[command(name = "tdscli", version, about)]
struct Cli {
    /// Path to the dataset manifest JSON
    #[arg(long)]
    manifest: PathBuf,

    /// Path to the data file (.csv, .xlsx or .hyper)
    #[arg(long)]
    data: PathBuf,

    /// Output path; the .tds or .tdsx extension is added automatically
    #[arg(long)]
    output: PathBuf,

    /// Kind of data source
    #[arg(long, value_enum, default_value_t = Source::Csv)]
    source: Source,

    /// Optional metadata repository JSON
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Sheet name for spreadsheets, table name for columnar files
    #[arg(long, default_value = "Orders")]
    table: String,

    /// Schema name for columnar files
    #[arg(long, default_value = "public")]
    schema: String,

    /// Bundle the data file with the document into a .tdsx
    #[arg(long)]
    package: bool,

    /// Keep fields the manifest does not mention visible
    #[arg(long)]
    keep_unused: bool,

    /// Use the manifest's explicit groups instead of repository memberships
    #[arg(long)]
    manifest_groups: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Csv,
    Excel,
    Hyper,
}

impl From<Source> for SourceKind {
    fn from(source: Source) -> Self {
        match source {
            Source::Csv => SourceKind::Csv,
            Source::Excel => SourceKind::Excel,
            Source::Hyper => SourceKind::Hyper,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tracing::info!("building data source from {}", cli.data.display());

    let mut options = DatasetOptions::new(&cli.manifest, &cli.data);
    options.table_name = cli.table.clone();
    options.schema_name = cli.schema.clone();
    options.source = cli.source.into();
    options.hide_unused = !cli.keep_unused;
    options.use_metadata_groups = !cli.manifest_groups;

    let repository = match &cli.metadata {
        Some(path) => Some(
            JsonRepository::from_file(path)
                .with_context(|| format!("loading metadata repository {}", path.display()))?,
        ),
        None => None,
    };
    let repository = repository
        .as_ref()
        .map(|repository| repository as &dyn MetadataRepository);

    if cli.package {
        create_tdsx(&options, repository, &cli.output)
            .context("creating packaged data source")?;
    } else {
        let mut output = cli.output.into_os_string();
        output.push(".tds");
        let output = PathBuf::from(output);
        create_tds(&options, repository, &output, false)
            .context("creating data source document")?;
    }

    Ok(())
}
