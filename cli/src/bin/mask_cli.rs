use clap::{Parser, Subcommand};
use cli::ConversionJob;
use color_eyre::eyre::Result;
use mask_polygons::{
    CommandOutcome, ContourApproximation, ConversionCommand, GeometryTable, LoadParams,
    OutputPathPolicy, PixelAnchor, VectorizeParams,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a mask raster into a polygon annotation document
    Vectorize {
        /// Mask raster or image; nonzero pixels are foreground
        #[arg(short, long)]
        mask: PathBuf,
        /// Reference image the mask belongs to
        #[arg(short, long)]
        image: PathBuf,
        /// Label applied to every polygon
        #[arg(short, long)]
        label: String,
        /// Write world coordinates using the GeoTIFF transform
        #[arg(long)]
        geo: bool,
        /// Pixel anchor for world coordinates (center, upper-left)
        #[arg(long, default_value = "center")]
        anchor: PixelAnchor,
        /// Contour point reduction (simple, none)
        #[arg(long, default_value = "simple")]
        approximation: ContourApproximation,
        /// Derive the output path by replacing the first ".tif" substring
        #[arg(long)]
        legacy_output_path: bool,
        /// Explicit output path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Embed the base64-encoded reference image in the document
        #[arg(long)]
        embed_image_data: bool,
    },
    /// Load an annotation document and summarize its polygons
    Load {
        /// Annotation document
        #[arg(short, long)]
        json: PathBuf,
        /// Also export the rows as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Run the command described by a TOML or JSON job file
    Process {
        /// Path to the job file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the JSON schema of job commands
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Vectorize {
            mask,
            image,
            label,
            geo,
            anchor,
            approximation,
            legacy_output_path,
            output,
            embed_image_data,
        } => {
            let output_policy = if legacy_output_path {
                OutputPathPolicy::LegacyTifSubstring
            } else {
                OutputPathPolicy::ReplaceExtension
            };
            run(ConversionCommand::Vectorize(VectorizeParams {
                mask_path: mask,
                image_path: image,
                label,
                geo,
                anchor,
                approximation,
                output_policy,
                output_path: output,
                embed_image_data,
            }))?;
        }
        Commands::Load { json, geojson } => {
            run(ConversionCommand::Load(LoadParams {
                json_path: json,
                geojson_output: geojson,
            }))?;
        }
        Commands::Process { config } => {
            process_job(&config)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&ConversionCommand::schema())?);
        }
    }

    Ok(())
}

fn process_job(config_path: &Path) -> Result<()> {
    let job = ConversionJob::from_file(config_path)?;
    if let Some(description) = &job.description {
        info!("Job: {}", description);
    }
    run(job.command)
}

fn run(command: ConversionCommand) -> Result<()> {
    info!("Running {}: {}", command, command.description());
    match command.execute()? {
        CommandOutcome::Written(path) => {
            info!("Annotation written to {}", path.display());
        }
        CommandOutcome::Loaded(table) => summarize(&table),
    }
    Ok(())
}

fn summarize(table: &GeometryTable) {
    info!("Loaded {} polygons", table.len());
    for (i, row) in table.iter().enumerate() {
        println!(
            "{:>4}  {:<20} {:>6} points  area {:.3}",
            i,
            row.label,
            row.geometry.exterior().0.len().saturating_sub(1),
            row.area()
        );
    }
}
