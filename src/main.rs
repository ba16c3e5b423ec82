//! comicpub - Build fixed-layout EPUBs from images

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use comicpub::archive::{ZipConfig, ZipSink};
use comicpub::{BookBuilder, CoverOptions, Metadata, ReadingDirection};

const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];
const DEFAULT_CREATOR: &str = "comicpub";

#[derive(Parser)]
#[command(name = "comicpub")]
#[command(version, about = "Make fixed layout EPUBs from images", long_about = None)]
#[command(after_help = "EXAMPLES:
    comicpub -o book.epub -d scans/                  Every image under scans/, in name order
    comicpub -o book.epub -c cover.jpg -i 1.png -i 2.png
    comicpub -o manga.epub --rtl --first-image-as-cover -d volume1/")]
struct Cli {
    /// Output file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Image to use as cover
    #[arg(short, long, value_name = "FILE")]
    cover: Option<PathBuf>,

    /// Use the first image found as cover. Overrides --cover
    #[arg(long)]
    first_image_as_cover: bool,

    /// Image to include, repeat in reading order
    #[arg(short, long = "image", value_name = "FILE")]
    images: Vec<PathBuf>,

    /// Folder of images to include, searched recursively in name order
    #[arg(short, long = "directory", value_name = "DIR")]
    directories: Vec<PathBuf>,

    /// JSON file with book metadata; flags take precedence
    #[arg(long, value_name = "FILE")]
    metadata: Option<PathBuf>,

    /// Book title [default: output file name]
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    publisher: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Comma separated list of subjects
    #[arg(long)]
    tags: Option<String>,

    /// Language code, e.g. "ja"
    #[arg(long)]
    language: Option<String>,

    /// Read right to left (manga)
    #[arg(long)]
    rtl: bool,

    /// Accept covers wider than 3:4
    #[arg(long)]
    no_aspect_check: bool,

    /// Deflate level for text entries (0-9)
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=9))]
    compression_level: Option<i64>,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,

    /// More output, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Metadata read from `--metadata`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MetadataFile {
    identifier: Option<String>,
    title: Option<String>,
    author: Option<String>,
    publisher: Option<String>,
    /// `YYYY-MM-DD`
    date: Option<String>,
    language: Option<String>,
    description: Option<String>,
    source: Option<String>,
    relation: Option<String>,
    copyright: Option<String>,
    tags: Vec<String>,
    properties: BTreeMap<String, String>,
    right_to_left: Option<bool>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let metadata = build_metadata(cli)?;
    let (cover, pages) = collect_inputs(cli)?;
    if cover.is_none() && pages.is_empty() {
        return Err("no input images, use --image or --directory".to_string());
    }

    let file = File::create(&cli.output)
        .map_err(|e| format!("unable to create {}: {e}", cli.output.display()))?;
    let sink = ZipSink::new(file).with_config(ZipConfig {
        compression_level: cli.compression_level,
    });
    let mut builder = BookBuilder::new(sink).with_metadata(metadata);

    if let Some(cover) = cover {
        info!("Adding {} as cover", cover.display());
        let options = CoverOptions::default()
            .insert_as_first_page(true)
            .check_aspect_ratio(!cli.no_aspect_check);
        let result = open(&cover).and_then(|reader| {
            builder
                .set_cover(reader, options)
                .map_err(|e| e.to_string())
        });
        if let Err(e) = result {
            warn!("Unable to add {} as cover: {e}", cover.display());
        }
    }

    for page in &pages {
        info!("Adding {} as page", page.display());
        let result = open(page)
            .and_then(|reader| builder.add_page(reader, None).map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!("Unable to add {}: {e}", page.display());
        }
    }

    builder
        .finalize()
        .map_err(|e| format!("unable to generate {}: {e}", cli.output.display()))?;
    let pages = builder.page_count();
    builder
        .into_sink()
        .finish()
        .map_err(|e| format!("unable to write {}: {e}", cli.output.display()))?;

    info!("Wrote {} ({pages} pages)", cli.output.display());
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>, String> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| format!("{}: {e}", path.display()))
}

/// Layer defaults, the metadata file and command line flags, in that order.
fn build_metadata(cli: &Cli) -> Result<Metadata, String> {
    let mut meta = Metadata::default();

    if let Some(ref path) = cli.metadata {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("unable to read {}: {e}", path.display()))?;
        let file: MetadataFile = serde_json::from_str(&text)
            .map_err(|e| format!("invalid metadata file {}: {e}", path.display()))?;
        apply_metadata_file(&mut meta, file)?;
    }

    if let Some(ref title) = cli.title {
        meta.title = title.clone();
    }
    if let Some(ref author) = cli.author {
        meta.author = author.clone();
    }
    if let Some(ref publisher) = cli.publisher {
        meta.publisher = publisher.clone();
    }
    if let Some(ref language) = cli.language {
        meta.language = language.clone();
    }
    if cli.description.is_some() {
        meta.description = cli.description.clone();
    }
    if let Some(ref tags) = cli.tags {
        meta.tags.extend(
            tags.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        );
    }
    if cli.rtl {
        meta.direction = ReadingDirection::RightToLeft;
    }

    if meta.title.trim().is_empty() {
        meta.title = cli
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    if meta.author.trim().is_empty() {
        meta.author = DEFAULT_CREATOR.to_string();
    }
    if meta.publisher.trim().is_empty() {
        meta.publisher = DEFAULT_CREATOR.to_string();
    }

    Ok(meta)
}

fn apply_metadata_file(meta: &mut Metadata, file: MetadataFile) -> Result<(), String> {
    if let Some(identifier) = file.identifier {
        meta.identifier = identifier;
    }
    if let Some(title) = file.title {
        meta.title = title;
    }
    if let Some(author) = file.author {
        meta.author = author;
    }
    if let Some(publisher) = file.publisher {
        meta.publisher = publisher;
    }
    if let Some(date) = file.date {
        meta.publishing_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| format!("invalid date {date:?}: {e}"))?;
    }
    if let Some(language) = file.language {
        meta.language = language;
    }
    meta.description = file.description;
    meta.source = file.source;
    meta.relation = file.relation;
    meta.copyright = file.copyright;
    meta.tags.extend(file.tags);
    meta.properties.extend(file.properties);
    if file.right_to_left == Some(true) {
        meta.direction = ReadingDirection::RightToLeft;
    }
    Ok(())
}

/// Resolve the cover and the ordered page list. The cover never appears as a
/// page as well.
fn collect_inputs(cli: &Cli) -> Result<(Option<PathBuf>, Vec<PathBuf>), String> {
    let mut pages = cli.images.clone();
    for dir in &cli.directories {
        if !dir.is_dir() {
            return Err(format!("{} is not a directory", dir.display()));
        }
        collect_images(dir, &mut pages)
            .map_err(|e| format!("unable to read {}: {e}", dir.display()))?;
    }

    let cover = if cli.first_image_as_cover {
        pages.first().cloned()
    } else {
        cli.cover.clone()
    };

    if let Some(ref cover) = cover {
        let cover_key = canonical(cover);
        pages.retain(|page| canonical(page) != cover_key);
    }

    Ok((cover, pages))
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Files of supported types first, then subdirectories, each sorted by name.
fn collect_images(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        } else if is_supported(&path) {
            files.push(path);
        }
    }
    files.sort();
    dirs.sort();

    out.extend(files);
    for dir in dirs {
        collect_images(&dir, out)?;
    }
    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}
