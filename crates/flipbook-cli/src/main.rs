use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use flipbook_core::{
    FlipbookConfig, FrameFormat, GridSpec, InputFrame, pack_sequence, to_json, unpack_sheet,
};
use image::{ColorType, DynamicImage, ImageReader};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const USAGE: &str = "Usage: \n flipbook <folder_of_my_frames> to pack a flipbook OR\n flipbook <spritesheet_image> <rows:cols> to unpack a spritesheet";

const INVALID_ARGUMENTS: &str = "Invalid arguments. Please provide a valid directory for packing or a valid spritesheet image with dimensions for unpacking.";

#[derive(Parser, Debug)]
#[command(
    name = "flipbook",
    about = "Pack a folder of frames into a grid spritesheet, or unpack a spritesheet into frames",
    version,
    author
)]
struct Cli {
    /// Folder of frames to pack, or spritesheet image to unpack
    #[arg(help_heading = "Input/Output")]
    input: Option<PathBuf>,
    /// Spritesheet grid as <rows:cols> (unpack only; ignored when packing)
    #[arg(value_name = "ROWS:COLS", num_args = 0.., help_heading = "Input/Output")]
    rest: Vec<String>,
    /// Parent directory for the unpacked frame folder (default: current directory)
    #[arg(short, long, help_heading = "Input/Output")]
    out_dir: Option<PathBuf>,
    /// JSON config file (naming and formats); omitted fields keep their defaults
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    /// Spritesheet format written when packing: tga | png | bmp | gif | jpeg (overrides config)
    #[arg(long, help_heading = "Formats")]
    sheet_format: Option<String>,
    /// Frame format written when unpacking: png | tga | bmp | gif | jpeg (overrides config)
    #[arg(long, help_heading = "Formats")]
    frame_format: Option<String>,

    /// Print the sheet layout (JSON) after packing
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_layout: bool,
    /// Print the merged configuration (after config file and flags) as JSON and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,

    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action=ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

/// What a command line asks for, decided once from the filesystem.
#[derive(Debug, PartialEq)]
enum InvocationMode {
    Pack(PathBuf),
    Unpack(PathBuf, GridSpec),
}

#[derive(Debug, PartialEq)]
enum UsageError {
    NoInput,
    InvalidArguments,
    Dimensions(String),
}

impl UsageError {
    fn print(&self) {
        match self {
            UsageError::NoInput => println!("{USAGE}"),
            UsageError::InvalidArguments => println!("{INVALID_ARGUMENTS}\n{USAGE}"),
            UsageError::Dimensions(msg) => println!("{msg}\n{USAGE}"),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            println!("{}", e.render());
            println!("{USAGE}");
            return Ok(ExitCode::FAILURE);
        }
    };
    init_tracing_with_level(cli.quiet, cli.verbose);

    let cfg = build_config(&cli)?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(ExitCode::SUCCESS);
    }

    let mode = match resolve_mode(cli.input.as_deref(), &cli.rest) {
        Ok(mode) => mode,
        Err(usage) => {
            usage.print();
            return Ok(ExitCode::FAILURE);
        }
    };
    debug!(?mode, ?cfg, "resolved invocation");

    match mode {
        InvocationMode::Pack(dir) => {
            if !cli.rest.is_empty() {
                warn!(ignored = ?cli.rest, "extra arguments are ignored when packing a folder");
            }
            run_pack(&dir, &cfg, cli.print_layout, cli.progress && !cli.quiet)?
        }
        InvocationMode::Unpack(sheet, grid) => {
            run_unpack(&sheet, grid, &cfg, cli.out_dir.as_deref())?
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// A directory packs whatever follows it; an existing file plus exactly one
/// `rows:cols` unpacks.
fn resolve_mode(input: Option<&Path>, rest: &[String]) -> Result<InvocationMode, UsageError> {
    let input = input.ok_or(UsageError::NoInput)?;
    if input.is_dir() {
        return Ok(InvocationMode::Pack(input.to_path_buf()));
    }
    match rest {
        [dims] if input.is_file() => {
            let grid: GridSpec = dims
                .parse()
                .map_err(|e: flipbook_core::FlipbookError| UsageError::Dimensions(e.to_string()))?;
            Ok(InvocationMode::Unpack(input.to_path_buf(), grid))
        }
        _ => Err(UsageError::InvalidArguments),
    }
}

/// Config file first (if any), then the format flags on top.
fn build_config(cli: &Cli) -> anyhow::Result<FlipbookConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str::<FlipbookConfig>(&text)
                .with_context(|| format!("parse {}", path.display()))?
        }
        None => FlipbookConfig::default(),
    };
    if let Some(f) = &cli.sheet_format {
        cfg.sheet_format = parse_format(f)?;
    }
    if let Some(f) = &cli.frame_format {
        cfg.frame_format = parse_format(f)?;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn parse_format(s: &str) -> anyhow::Result<FrameFormat> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown image format: {}", s))
}

fn run_pack(
    dir: &Path,
    cfg: &FlipbookConfig,
    print_layout: bool,
    show_progress: bool,
) -> anyhow::Result<()> {
    let paths = gather_frame_paths(dir)?;
    if paths.is_empty() {
        println!("No images found in the specified folder.");
        return Ok(());
    }
    let inputs = load_frames_with_progress(&paths, show_progress)?;
    info!(count = inputs.len(), "loaded frames");

    let out = pack_sequence(inputs)?;
    let mismatched = out.layout.mismatched();
    if mismatched > 0 {
        warn!(
            mismatched,
            "frames differ in size from the first frame; they may be cropped or misaligned"
        );
    }

    let sheet_path = dir.join(cfg.sheet_file_name(&out.layout.grid));
    save_image(&DynamicImage::ImageRgba8(out.rgba), &sheet_path, cfg.sheet_format)?;
    info!(?sheet_path, grid = %out.layout.grid, "wrote spritesheet");
    println!("Spritesheet created at: {}", sheet_path.display());

    if print_layout {
        println!("{}", serde_json::to_string_pretty(&to_json(&out.layout))?);
    }
    Ok(())
}

fn run_unpack(
    sheet_path: &Path,
    grid: GridSpec,
    cfg: &FlipbookConfig,
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let stem = sheet_path
        .file_stem()
        .with_context(|| format!("no file name in {}", sheet_path.display()))?;
    let folder = match out_dir {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    };
    let sheet = load_image(sheet_path).with_context(|| format!("load {}", sheet_path.display()))?;
    let frames = unpack_sheet(&sheet, grid)?;

    fs::create_dir_all(&folder).with_context(|| format!("create {}", folder.display()))?;
    for (index, frame) in (0u32..).zip(&frames) {
        let path = folder.join(cfg.frame_file_name(index));
        save_image(frame, &path, cfg.frame_format)?;
        debug!(?path, index, "wrote frame");
    }
    println!(
        "Unpacked {} frames into folder: {}",
        frames.len(),
        folder.display()
    );
    Ok(())
}

/// Image files directly inside `dir`, sorted by file name. Subdirectories are skipped.
fn gather_frame_paths(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("list {}", dir.display()))?;
        let p = entry.path();
        if p.is_file() && is_frame_image(p) {
            list.push(p.to_path_buf());
        }
    }
    Ok(list)
}

fn is_frame_image(p: &Path) -> bool {
    p.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(FrameFormat::is_input_file_name)
}

fn load_frames_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<InputFrame>> {
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
        let key = p
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(b) = &bar {
            b.set_message(key.clone());
        }
        let image = load_image(p).with_context(|| format!("load {}", p.display()))?;
        list.push(InputFrame { key, image });
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

/// Writes `img` in its own color type when `format` can store it, otherwise
/// as RGBA8 (RGB8 for JPEG, which has no alpha channel).
fn save_image(img: &DynamicImage, path: &Path, format: FrameFormat) -> anyhow::Result<()> {
    let img = if format_keeps(format, img.color()) {
        Cow::Borrowed(img)
    } else if format == FrameFormat::Jpeg {
        Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8()))
    } else {
        Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8()))
    };
    img.save_with_format(path, format.image_format())
        .with_context(|| format!("write {}", path.display()))
}

fn format_keeps(format: FrameFormat, color: ColorType) -> bool {
    use ColorType::*;
    match format {
        FrameFormat::Png => matches!(
            color,
            L8 | La8 | Rgb8 | Rgba8 | L16 | La16 | Rgb16 | Rgba16
        ),
        FrameFormat::Tga | FrameFormat::Bmp => matches!(color, L8 | La8 | Rgb8 | Rgba8),
        FrameFormat::Gif => matches!(color, Rgb8 | Rgba8),
        FrameFormat::Jpeg => matches!(color, L8 | Rgb8),
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "warn".into(),
            1 => "info".into(),
            2 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
