mod commands;

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use design::EditorError;
use studio::{StoreConfig, StudioError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing API token; pass --token or set INVITELY_API_TOKEN")]
    MissingToken,
    #[error("{path} already exists; pass --force to overwrite")]
    FileExists { path: String },
    #[error("cannot read or write {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("no page matches `{0}`")]
    UnknownPage(String),
    #[error("no object matches `{0}`")]
    UnknownObject(String),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Studio(#[from] StudioError),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "invitely", about = "Headless invitation design editor")]
pub struct Cli {
    /// Design document to operate on.
    #[arg(long, short, env = "INVITELY_FILE", default_value = "design.json")]
    pub file: PathBuf,

    /// Bearer token for push/pull; overrides `INVITELY_API_TOKEN`.
    #[arg(long)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a document holding the starter page.
    New {
        #[arg(long)]
        force: bool,
    },
    /// Print pages and layers.
    Show,
    Page(PageCommand),
    Object(ObjectCommand),
    /// Set one property on an object of the current page.
    Set {
        object: String,
        field: String,
        /// JSON value (`24`, `null`, `true`) or bare text.
        value: String,
    },
    /// Set the background of the current page.
    Background(BackgroundArgs),
    /// Save the document to the design API and print its id.
    Push {
        /// Existing design to overwrite.
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Load a design from the API into the document file.
    Pull {
        id: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct PageCommand {
    #[command(subcommand)]
    pub command: PageSubcommand,
}

/// Pages are addressed by 1-based position or by id.
#[derive(Subcommand, Debug)]
pub enum PageSubcommand {
    Add,
    Duplicate { page: String },
    Delete { page: String },
    Select { page: String },
    Rename { page: String, name: String },
}

#[derive(Args, Debug)]
pub struct ObjectCommand {
    #[command(subcommand)]
    pub command: ObjectSubcommand,
}

/// Objects are addressed on the current page by 0-based layer index or by id.
#[derive(Subcommand, Debug)]
pub enum ObjectSubcommand {
    AddText {
        content: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long, default_value_t = design::consts::DEFAULT_FONT_SIZE)]
        font_size: f64,
    },
    AddShape {
        /// rectangle, circle, triangle, ellipse, line, or a polygon preset id.
        shape: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long, default_value_t = 100.0)]
        width: f64,
        #[arg(long, default_value_t = 100.0)]
        height: f64,
        #[arg(long, default_value = design::consts::DEFAULT_COLOR)]
        fill: String,
    },
    AddImage {
        src: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
        #[arg(long, default_value_t = 200.0)]
        width: f64,
        #[arg(long, default_value_t = 200.0)]
        height: f64,
    },
    Duplicate { object: String },
    Delete { object: String },
    /// Swap with the layer below (toward index 0).
    Up { object: String },
    /// Swap with the layer above.
    Down { object: String },
    Reorder { from: usize, to: usize },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("fill").required(true)))]
pub struct BackgroundArgs {
    #[arg(long, group = "fill")]
    pub color: Option<String>,
    /// Pattern preset id.
    #[arg(long, group = "fill")]
    pub pattern: Option<String>,
    /// Comma-separated gradient colors, evenly spaced.
    #[arg(long, group = "fill", value_delimiter = ',')]
    pub gradient: Option<Vec<String>>,
    #[arg(long, requires = "gradient")]
    pub radial: bool,
    /// Direction of a linear gradient in degrees.
    #[arg(long, requires = "gradient")]
    pub angle: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(err) = dotenv {
        if !err.not_found() {
            tracing::warn!(error = %err, "ignoring unreadable .env");
        }
    }

    let cli = Cli::parse();
    let config = StoreConfig::from_env();
    let output = commands::run(cli, &config).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
