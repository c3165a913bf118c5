use std::path::PathBuf;

/// New Zealand district atlas (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "nzatlas", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON configuration file; defaults apply to anything it leaves out
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render the map, legend, bar chart and pyramid to an SVG file
    Render(RenderArgs),

    /// Print the computed views as JSON (forbids file output)
    Inspect(ViewArgs),

    /// List the selectable attributes
    Attributes,
}

/// Input sources and the view to show.
#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// District boundaries (GeoJSON or TopoJSON)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub geometry: PathBuf,

    /// District attribute table (CSV)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub attributes: PathBuf,

    /// Population by district, age band and sex (CSV)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub population: PathBuf,

    /// Attribute to display, e.g. PctMaori or Total_Pop
    #[arg(short, long)]
    pub attribute: Option<String>,

    /// District key for the population pyramid; "all" for every district
    #[arg(short, long)]
    pub district: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output SVG file, defaults to "./atlas.svg"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}
