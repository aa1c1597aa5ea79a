use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use atlas_gen_core::{
    Atlas, AtlasConfig, AtlasGenError, ExportFormat, InputImage, pack_images, pack_layout, render,
};
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, ImageReader};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "atlas-gen",
    about = "Pack a folder of images into one atlas image plus position metadata",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack images into an atlas and write metadata
    Pack(PackArgs),
    /// Layout-only export (no atlas image): compute placements and write metadata
    Layout(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = ".", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name; also the CSS class prefix (files will be name.png/.css)
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// Atlas image format: png | jpg
    #[arg(long, value_parser = ["png", "jpg", "jpeg"], default_value = "png", help_heading = "Input/Output")]
    format: String,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Margin on both axes (overridden by --margin-x/--margin-y)
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    margin: u32,
    /// Horizontal margin
    #[arg(long, help_heading = "Layout")]
    margin_x: Option<u32>,
    /// Vertical margin
    #[arg(long, help_heading = "Layout")]
    margin_y: Option<u32>,
    /// Center every image in an equal square cell (conflicts with --resize)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    normalize: bool,
    /// Resize every image to SIZE x SIZE before packing
    #[arg(long, help_heading = "Layout")]
    resize: Option<u32>,
    /// Packing attempts before giving up; each failure doubles one canvas side
    #[arg(long, default_value_t = 6, help_heading = "Layout")]
    max_attempts: usize,
    /// Draw red outlines around each image (debug)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    outlines: bool,

    // Export
    /// Metadata format(s): css | json | xml | csv (repeatable)
    #[arg(long, default_value = "css", help_heading = "Export")]
    metadata: Vec<String>,
    /// Directory for the CSS file (defaults to the output directory)
    #[arg(long, help_heading = "Export")]
    css_dir: Option<PathBuf>,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet, false),
        Commands::Layout(args) => run_pack(args, false, true),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool, layout_only: bool) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    // conflicting options are reported before any image is read
    cfg.validate()?;
    let formats = parse_metadata(&cli.metadata)?;

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    info!(count = paths.len(), "found input images");

    let ext = match cli.format.as_str() {
        "jpeg" => "jpg",
        other => other,
    };
    let image_name = format!("{}.{}", cli.name, ext);

    let atlas = if layout_only {
        let sizes = read_sizes(&paths, cfg.resize);
        check_packed(pack_layout(sizes, cfg.clone()))?
    } else {
        let inputs = load_images_with_progress(&paths, show_progress)?;
        info!(count = inputs.len(), "loaded input images");
        let out = check_packed(pack_images(inputs, cfg.clone()))?;
        if !cli.dry_run {
            fs::create_dir_all(&cli.out_dir)
                .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
            let image_path = cli.out_dir.join(&image_name);
            if ext == "jpg" {
                // JPEG has no alpha channel
                DynamicImage::ImageRgba8(out.rgba)
                    .to_rgb8()
                    .save(&image_path)
                    .with_context(|| format!("write {}", image_path.display()))?;
            } else {
                out.rgba
                    .save(&image_path)
                    .with_context(|| format!("write {}", image_path.display()))?;
            }
            info!(?image_path, "atlas image written");
        }
        out.atlas
    };

    let stats = atlas.stats();
    info!(
        images = stats.num_placements,
        width = atlas.width,
        height = atlas.height,
        attempts = stats.attempts,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    if !cli.dry_run {
        write_metadata(cli, &atlas, &formats, &image_name)?;
    }

    if let Some(stats_path) = &cli.export_stats {
        let value = serde_json::json!({
            "images": stats.num_placements,
            "width": atlas.width,
            "height": atlas.height,
            "attempts": stats.attempts,
            "used_area": stats.used_area,
            "canvas_area": stats.canvas_area,
            "occupancy": stats.occupancy,
        });
        if !cli.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }
    Ok(())
}

fn check_packed<T>(result: atlas_gen_core::Result<T>) -> anyhow::Result<T> {
    match result {
        Err(AtlasGenError::PackingExhausted {
            unplaced,
            attempts,
            width,
            height,
        }) => {
            error!(unplaced, attempts, width, height, "failed packing");
            anyhow::bail!(
                "failed packing: {} images did not fit after {} attempts (last canvas {}x{})",
                unplaced,
                attempts,
                width,
                height
            )
        }
        other => Ok(other?),
    }
}

fn write_metadata(
    cli: &PackArgs,
    atlas: &Atlas,
    formats: &[ExportFormat],
    image_name: &str,
) -> anyhow::Result<()> {
    for format in formats {
        let dir = match (format, &cli.css_dir) {
            (ExportFormat::Css, Some(css_dir)) => css_dir.as_path(),
            _ => cli.out_dir.as_path(),
        };
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(format!("{}.{}", cli.name, format.extension()));
        let text = render(*format, atlas, &cli.name, image_name);
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        info!(?path, ?format, "metadata written");
    }
    Ok(())
}

fn build_config(cli: &PackArgs) -> anyhow::Result<AtlasConfig> {
    let cfg = AtlasConfig {
        margin_x: cli.margin_x.unwrap_or(cli.margin),
        margin_y: cli.margin_y.unwrap_or(cli.margin),
        normalize: cli.normalize,
        resize: cli.resize,
        max_attempts: cli.max_attempts,
        outlines: cli.outlines,
        background: None,
    };
    // Config file overrides CLI layout options field by field
    match &cli.config {
        Some(path) => {
            let file = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            let y: YamlConfig = serde_yaml::from_str(&file)?;
            Ok(y.into_atlas_config(cfg))
        }
        None => Ok(cfg),
    }
}

fn parse_metadata(values: &[String]) -> anyhow::Result<Vec<ExportFormat>> {
    let mut formats = Vec::new();
    for v in values {
        for part in v.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let format: ExportFormat = part
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown metadata format: {}", part))?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
    }
    Ok(formats)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = path_key(p);
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

fn path_key(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

fn load_images_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<InputImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_image(p) {
            Ok(img) => list.push(InputImage {
                key: path_key(p),
                image: img,
            }),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_image(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

/// Image sizes from headers only; `resize` replaces every size.
fn read_sizes(paths: &[PathBuf], resize: Option<u32>) -> Vec<(String, u32, u32)> {
    let mut sizes = Vec::with_capacity(paths.len());
    for p in paths {
        match image::image_dimensions(p) {
            Ok((w, h)) => {
                let (w, h) = resize.map_or((w, h), |s| (s, s));
                sizes.push((path_key(p), w, h));
            }
            Err(e) => warn!(?p, error = %e, "skip image"),
        }
    }
    sizes
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    margin: Option<u32>,
    margin_x: Option<u32>,
    margin_y: Option<u32>,
    normalize: Option<bool>,
    resize: Option<u32>,
    max_attempts: Option<usize>,
    outlines: Option<bool>,
    background: Option<[u8; 4]>,
}

impl YamlConfig {
    fn into_atlas_config(self, mut cfg: AtlasConfig) -> AtlasConfig {
        if let Some(v) = self.margin {
            cfg.margin_x = v;
            cfg.margin_y = v;
        }
        if let Some(v) = self.margin_x {
            cfg.margin_x = v;
        }
        if let Some(v) = self.margin_y {
            cfg.margin_y = v;
        }
        if let Some(v) = self.normalize {
            cfg.normalize = v;
        }
        if let Some(v) = self.resize {
            cfg.resize = Some(v);
        }
        if let Some(v) = self.max_attempts {
            cfg.max_attempts = v;
        }
        if let Some(v) = self.outlines {
            cfg.outlines = v;
        }
        if let Some(v) = self.background {
            cfg.background = Some(v);
        }
        cfg
    }
}
