//! Watergen CLI - biome-blended terrain generator.
//!
//! Generates a heightmap and biome map on a rectangular grid and exports
//! them for engine import or inspection.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use watergen::export::{
    expected_file_size, export_biome_map_png, export_field_png, export_field_raw, BiomeMapOptions,
    PngExportOptions, RawFormat,
};
use watergen::mesh::{fits_u32_indices, index_count, Vertex};
use watergen::pipeline::{Pipeline, StageConfig};
use watergen::terrain::{ShapingConfig, TerrainField, TerrainSettings};
use watergen::{BiomeClass, GradientNoise};

/// Biome-blended procedural terrain generator.
#[derive(Parser)]
#[command(name = "watergen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain field and export it.
    Generate {
        /// Settings JSON file. Flags given on the command line override it.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cells along X.
        #[arg(long)]
        width: Option<u32>,

        /// Cells along Z.
        #[arg(long)]
        length: Option<u32>,

        /// Horizontal noise scale; larger values give broader features.
        #[arg(long)]
        scale: Option<f32>,

        /// Noise seed.
        #[arg(short, long)]
        seed: Option<f32>,

        /// Number of fBm octaves.
        #[arg(long)]
        octaves: Option<u32>,

        /// Falloff baseline at the border; also the water level for clamping and biome maps.
        #[arg(long)]
        sea_level: Option<f32>,

        /// Edge distance (in cells) over which heights ramp up from the baseline.
        #[arg(long)]
        border: Option<u32>,

        /// Number of neighbor-averaging passes.
        #[arg(long)]
        smoothing_passes: Option<u32>,

        /// Label the highest band Mountains instead of Desert.
        #[arg(long)]
        mountain_label: bool,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Heightmap export format.
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,

        /// Also export an RGB biome preview map.
        #[arg(long)]
        biome_map: bool,
    },

    /// Display mesh and memory figures for a grid size.
    Info {
        /// Cells along X.
        #[arg(long, default_value = "256")]
        width: u32,

        /// Cells along Z.
        #[arg(long, default_value = "256")]
        length: u32,

        /// Border falloff threshold in cells.
        #[arg(long, default_value = "50")]
        border: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// 16-bit PNG (universal compatibility).
    Png,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 32-bit float RAW (high precision).
    RawFloat,
}

struct Overrides {
    width: Option<u32>,
    length: Option<u32>,
    scale: Option<f32>,
    seed: Option<f32>,
    octaves: Option<u32>,
    sea_level: Option<f32>,
    border: Option<u32>,
    smoothing_passes: Option<u32>,
    mountain_label: bool,
}

impl Overrides {
    fn apply(&self, settings: &mut TerrainSettings) {
        let generation = &mut settings.generation;
        if let Some(v) = self.width {
            generation.width = v;
        }
        if let Some(v) = self.length {
            generation.length = v;
        }
        if let Some(v) = self.scale {
            generation.scale = v;
        }
        if let Some(v) = self.seed {
            generation.seed = v;
        }
        if let Some(v) = self.octaves {
            generation.octaves = v;
        }
        if let Some(v) = self.sea_level {
            generation.sea_level = v;
        }
        if let Some(v) = self.border {
            settings.shaping.border_threshold = v;
        }
        if let Some(v) = self.smoothing_passes {
            settings.shaping.smoothing_passes = v;
        }
        if self.mountain_label {
            settings.biomes.mountain_label = true;
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer().with_target(true).with_thread_names(true);

    // A subscriber may already be installed when embedded; that is fine.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            width,
            length,
            scale,
            seed,
            octaves,
            sea_level,
            border,
            smoothing_passes,
            mountain_label,
            output,
            name,
            format,
            biome_map,
        } => {
            let overrides = Overrides {
                width,
                length,
                scale,
                seed,
                octaves,
                sea_level,
                border,
                smoothing_passes,
                mountain_label,
            };
            run_generate(config, overrides, output, name, format, biome_map)
        }
        Commands::Info { width, length, border } => {
            run_info(width, length, border);
            ExitCode::SUCCESS
        }
    }
}

fn run_generate(
    config: Option<PathBuf>,
    overrides: Overrides,
    output: PathBuf,
    name: String,
    format: ExportFormat,
    biome_map: bool,
) -> ExitCode {
    let mut settings = match &config {
        Some(path) => match TerrainSettings::from_json_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => TerrainSettings::default(),
    };
    overrides.apply(&mut settings);

    if let Err(e) = settings.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let generation = &settings.generation;
    println!("Watergen - Biome Terrain Generator");
    println!("==================================");
    println!("Grid: {}x{} cells", generation.width, generation.length);
    println!("Scale: {}  Octaves: {}  Seed: {}", generation.scale, generation.octaves, generation.seed);
    println!(
        "Border: {} cells  Smoothing passes: {}",
        settings.shaping.border_threshold, settings.shaping.smoothing_passes
    );
    println!("Output: {}", output.display());

    if settings.shaping.attenuates_everywhere(generation.width, generation.length) {
        println!("Warning: grid is too small for the border threshold; no cell reaches full height");
    }

    let start = Instant::now();

    println!("\nRunning generation pipeline...");
    let noise = GradientNoise::default();
    let mut field = TerrainField::new(generation.width, generation.length);
    let result = Pipeline::standard().run_with_callbacks(
        &mut field,
        &StageConfig::new(&settings, &noise),
        |name, i, total| println!("  [{}/{}] Starting: {}", i + 1, total, name),
        |name, i, total| println!("  [{}/{}] Completed: {}", i + 1, total, name),
    );
    if let Err(e) = result {
        eprintln!("Error during generation: {}", e);
        return ExitCode::FAILURE;
    }

    let gen_time = start.elapsed();
    println!("Generation completed in {:.2?}", gen_time);

    let (min_h, max_h) = field.height_range();
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);
    if field.anomalies > 0 {
        println!("Non-finite heights clamped: {}", field.anomalies);
    }
    let histogram = field.biome_histogram();
    for (id, count) in histogram.iter().enumerate() {
        if let Some(biome) = BiomeClass::from_u8(id as u8) {
            if *count > 0 {
                println!("  {:<10} {:>10} cells", biome.name(), count);
            }
        }
    }

    println!("\nExporting...");
    let export_start = Instant::now();

    if let Err(e) = std::fs::create_dir_all(&output) {
        eprintln!("Error creating output directory: {}", e);
        return ExitCode::FAILURE;
    }

    let png_options = PngExportOptions::auto_range(&field);
    match format {
        ExportFormat::Png => {
            let path = output.join(format!("{}.png", name));
            if let Err(e) = export_field_png(&field, &path, &png_options) {
                eprintln!("Error exporting PNG: {}", e);
                return ExitCode::FAILURE;
            }
            println!("  Exported {}", path.display());
        }
        ExportFormat::Raw | ExportFormat::RawFloat => {
            let raw_format = match format {
                ExportFormat::RawFloat => RawFormat::R32Float,
                _ => RawFormat::R16LittleEndian,
            };
            let path = output.join(format!("{}.raw", name));
            let result = export_field_raw(
                &field,
                &path,
                raw_format,
                png_options.min_height,
                png_options.max_height,
            );
            if let Err(e) = result {
                eprintln!("Error exporting RAW: {}", e);
                return ExitCode::FAILURE;
            }
            println!("  Exported {} ({:?})", path.display(), raw_format);
        }
    }

    if biome_map {
        let path = output.join(format!("{}_biomes.png", name));
        let options = BiomeMapOptions {
            sea_level: Some(settings.generation.sea_level),
            ..Default::default()
        };
        if let Err(e) = export_biome_map_png(&field, &path, &options) {
            eprintln!("Error exporting biome map: {}", e);
            return ExitCode::FAILURE;
        }
        println!("  Exported {}", path.display());
    }

    let export_time = export_start.elapsed();
    println!("Export completed in {:.2?}", export_time);
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
    ExitCode::SUCCESS
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

fn run_info(width: u32, length: u32, border: u32) {
    let cells = width as u64 * length as u64;
    let indices = index_count(width, length);
    let triangles = indices / 3;

    let bytes_heights = cells * 4; // f32
    let bytes_biomes = cells; // u8
    let bytes_biome_noise = cells * 4; // f32
    let bytes_vertices = cells * std::mem::size_of::<Vertex>() as u64;
    let bytes_indices = indices * 4; // u32

    println!("Watergen - Grid Configuration Info");
    println!("==================================");
    println!();
    println!("Grid: {}x{} cells", width, length);
    println!();
    println!("Mesh:");
    println!("  Vertices:  {:>12}", cells);
    println!("  Indices:   {:>12}", indices);
    println!("  Triangles: {:>12}", triangles);
    if !fits_u32_indices(width, length) {
        println!("  Warning: too many vertices for a u32 index buffer");
    }
    println!();
    println!("Memory usage (in-memory):");
    println!("  Heights:     {:>12} bytes ({:.2} MB)", bytes_heights, megabytes(bytes_heights));
    println!("  Biome noise: {:>12} bytes ({:.2} MB)", bytes_biome_noise, megabytes(bytes_biome_noise));
    println!("  Biome IDs:   {:>12} bytes ({:.2} MB)", bytes_biomes, megabytes(bytes_biomes));
    println!("  Vertices:    {:>12} bytes ({:.2} MB)", bytes_vertices, megabytes(bytes_vertices));
    println!("  Indices:     {:>12} bytes ({:.2} MB)", bytes_indices, megabytes(bytes_indices));
    let total = bytes_heights + bytes_biome_noise + bytes_biomes + bytes_vertices + bytes_indices;
    println!("  Total:       {:>12} bytes ({:.2} MB)", total, megabytes(total));
    println!();
    println!("Export file sizes:");
    for (label, format) in [("RAW (R16)", RawFormat::R16LittleEndian), ("RAW (R32)", RawFormat::R32Float)] {
        let size = expected_file_size(width, length, format);
        println!("  {:<10} {:>12} bytes ({:.2} MB)", label, size, megabytes(size));
    }
    println!();

    let shaping = ShapingConfig { border_threshold: border, ..Default::default() };
    if shaping.attenuates_everywhere(width, length) {
        println!("Warning: border threshold {} leaves no cell at full height on this grid", border);
    } else {
        println!("Border falloff: {} cells", border);
    }
}
