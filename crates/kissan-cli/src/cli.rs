use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// KissanSat - vegetation index maps and farm records for farm plots
#[derive(Parser, Debug)]
#[command(name = "kissan")]
#[command(about = "Sentinel-2 vegetation index maps and a farm database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file
    #[arg(long, global = true, default_value = "kissan.toml")]
    pub config: PathBuf,

    /// Earth Engine service-account key file
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Cloud project billed for Earth Engine calls
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Image collection to query
    #[arg(long, global = true)]
    pub dataset: Option<String>,

    /// PostgreSQL URL of the farm database (in-memory when unset)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Deadline for one imagery request, in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Imagery provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    /// Google Earth Engine (needs a service-account key)
    EarthEngine,
    /// Synthetic monthly scenes, no network access
    Stub,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a vegetation index map for a plot
    Image(ImageArgs),

    /// Invoke an agent tool with JSON arguments
    Tool(ToolArgs),

    /// List the agent tools and their arguments
    Tools,

    /// Manage farm database records
    Farm(FarmArgs),

    /// Show the effective configuration and where each value came from
    Config,

    /// Run health checks and diagnostics
    Doctor(DoctorArgs),
}

#[derive(Parser, Debug)]
pub struct ImageArgs {
    /// Plot boundary as WKT Polygon or MultiPolygon (lon lat)
    #[arg(long, conflicts_with_all = ["plot", "email"], required_unless_present = "plot")]
    pub wkt: Option<String>,

    /// Name of a plot stored in the farm database
    #[arg(long, requires = "email")]
    pub plot: Option<String>,

    /// Email of the plot owner
    #[arg(long)]
    pub email: Option<String>,

    /// Vegetation index (NDVI or NDWI)
    #[arg(long, default_value = "NDVI")]
    pub index: String,

    /// First day of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Last day of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Position among images ranked most to least cloudy; -1 is the least cloudy
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    pub image_index: i64,

    /// Imagery provider
    #[arg(long, value_enum, default_value = "earth-engine")]
    pub provider: ProviderKind,

    /// Write the full map (grid included) as JSON to this file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ToolArgs {
    /// Tool name (see `kissan tools`)
    pub name: String,

    /// Tool arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,

    /// Imagery provider used by the image tools
    #[arg(long, value_enum, default_value = "earth-engine")]
    pub provider: ProviderKind,
}

#[derive(Parser, Debug)]
pub struct FarmArgs {
    #[command(subcommand)]
    pub command: FarmCommand,
}

#[derive(Subcommand, Debug)]
pub enum FarmCommand {
    /// Register a farmer
    AddUser {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
    },

    /// Register a plot
    AddPlot {
        #[arg(long)]
        name: String,
        /// Boundary as WKT Polygon or MultiPolygon
        #[arg(long)]
        wkt: String,
        #[arg(long)]
        email: String,
    },

    /// Register a vegetation bed
    AddVegBed {
        #[arg(long)]
        name: String,
        #[arg(long)]
        wkt: String,
        #[arg(long)]
        email: String,
    },

    /// Register a species
    AddSpecies {
        #[arg(long)]
        name: String,
    },

    /// Register a variety of an existing species
    AddVariety {
        #[arg(long)]
        name: String,
        #[arg(long)]
        species: String,
    },

    /// Record a growing season on a plot
    AddPlotSeason {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        variety: String,
        #[arg(long)]
        plot: String,
        #[arg(long)]
        email: String,
    },

    /// Record a season of plants in a vegetation bed
    AddPlantSeason {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Plant position(s) as WKT
        #[arg(long)]
        position: String,
        #[arg(long)]
        variety: String,
        #[arg(long)]
        veg_bed: String,
        #[arg(long)]
        email: String,
    },

    /// Print the boundary of a plot as WKT
    PlotWkt {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },

    /// List a user's plots
    ListPlots {
        #[arg(long)]
        email: String,
    },
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Also request an Earth Engine access token
    #[arg(long)]
    pub online: bool,

    /// Show detailed diagnostic information
    #[arg(long)]
    pub verbose: bool,
}
