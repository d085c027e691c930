//! CLI entry point for scaffold

use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use scaffold::export::render_simple;
use scaffold::parse::parse_indented;
use scaffold::scan::{GitHubSource, ListingFile, TreeSource, is_github_url, parse_repo_url};
use scaffold::{
    CommandGeneralizer, ExportConfig, ExportFormat, Format, LocalScanner, Node, ParseOptions,
    PlatformProfile, ScanConfig, ScanResult, TreeFormatter, forest_from_listing, generalize_or_raw,
    generate, parse, render, validate,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(about = "Build directory skeletons from tree, YAML or JSON layouts")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the directories and files described by a layout
    Build {
        /// Layout file (.txt, .tree, .yaml, .yml, .json) or - for stdin
        layout: String,

        /// Directory to build into
        #[arg(default_value = ".")]
        target: PathBuf,

        /// Indentation width of the plain-text form (auto-detected when omitted)
        #[arg(long = "indent", value_name = "N")]
        indent: Option<usize>,

        /// Path rules to validate against: native, unix, windows
        #[arg(long = "platform", default_value = "native", value_parser = parse_platform)]
        platform: PlatformProfile,
    },

    /// Extract a layout from an existing directory or repository listing
    Analyze {
        /// Directory to scan or GitHub repository URL (names the root when --listing is used)
        source: String,

        /// Output format: tree, simple, yaml, json
        #[arg(long = "format", default_value = "simple")]
        format: ExportFormat,

        /// Descend at most N levels
        #[arg(long = "max-depth", value_name = "N", default_value_t = scaffold::scan::DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Ignore entries matching pattern (can be used multiple times)
        #[arg(short = 'I', long = "ignore")]
        ignore: Vec<String>,

        /// Read a saved remote tree listing (JSON) instead of scanning or fetching
        #[arg(long = "listing", value_name = "FILE")]
        listing: Option<PathBuf>,

        /// Command that generalizes the layout into a template (reads stdin, writes stdout)
        #[arg(long = "generalize-cmd", value_name = "CMD")]
        generalize_cmd: Option<String>,
    },

    /// Re-export a layout in another format
    Convert {
        /// Layout file or - for stdin
        layout: String,

        /// Output format: tree, simple, yaml, json
        #[arg(long = "to")]
        to: ExportFormat,

        /// Indentation width of the plain-text form (auto-detected when omitted)
        #[arg(long = "indent", value_name = "N")]
        indent: Option<usize>,

        /// Path rules to validate against: native, unix, windows
        #[arg(long = "platform", default_value = "native", value_parser = parse_platform)]
        platform: PlatformProfile,
    },
}

fn parse_platform(name: &str) -> Result<PlatformProfile, String> {
    PlatformProfile::from_name(name)
        .ok_or_else(|| format!("unknown platform '{}' (expected native, unix or windows)", name))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    let use_color = should_use_color(args.color);

    let result = match args.command {
        Commands::Build {
            layout,
            target,
            indent,
            platform,
        } => run_build(&layout, &target, indent, &platform, use_color),
        Commands::Analyze {
            source,
            format,
            max_depth,
            ignore,
            listing,
            generalize_cmd,
        } => {
            let config = ScanConfig {
                max_depth,
                ignore_patterns: ignore,
            };
            run_analyze(&source, listing.as_deref(), &config, format, generalize_cmd.as_deref(), use_color)
        }
        Commands::Convert {
            layout,
            to,
            indent,
            platform,
        } => run_convert(&layout, to, indent, &platform, use_color),
    };

    if let Err(e) = result {
        eprintln!("scaffold: {:#}", e);
        process::exit(1);
    }
}

/// Read and parse a layout file, or stdin for `-`.
fn read_layout(layout: &str, indent: Option<usize>) -> Result<Vec<Node>> {
    let format = Format::detect(Path::new(layout))?;
    let options = ParseOptions {
        indent_width: indent,
    };

    let forest = if layout == "-" {
        debug!("reading layout from stdin");
        parse(io::stdin().lock(), format, &options)
    } else {
        let file = File::open(layout)
            .with_context(|| format!("failed to open layout file {}", layout))?;
        debug!("reading {} layout from {}", format, layout);
        parse(file, format, &options)
    };
    forest.context("parse error")
}

fn run_build(
    layout: &str,
    target: &Path,
    indent: Option<usize>,
    platform: &PlatformProfile,
    use_color: bool,
) -> Result<()> {
    let mut forest = read_layout(layout, indent)?;
    validate(&mut forest, platform).context("validation failed")?;
    debug!("validation passed");

    match generate(&forest, target) {
        Ok(report) => {
            report.print_summary(use_color)?;
            if report.created() == 0 {
                println!("\nNo changes made (all paths already exist)");
            } else {
                println!("\nStructure built in {}", target.display());
            }
            Ok(())
        }
        Err(e) => {
            if let Some(report) = e.report() {
                report.print_summary(use_color)?;
            }
            Err(e.into())
        }
    }
}

fn run_analyze(
    source: &str,
    listing: Option<&Path>,
    config: &ScanConfig,
    format: ExportFormat,
    generalize_cmd: Option<&str>,
    use_color: bool,
) -> Result<()> {
    if config.max_depth < 1 {
        bail!("max-depth must be at least 1");
    }

    let result = if let Some(path) = listing {
        let listing = ListingFile::new(path)
            .fetch()
            .context("failed to fetch repository listing")?;
        forest_from_listing(&repo_root_name(source), &listing, config)
    } else if is_github_url(source) {
        let Some(github) = GitHubSource::from_url(source) else {
            bail!("invalid GitHub repository URL: {}", source);
        };
        info!("detected GitHub repository {}", source);
        let listing = github
            .fetch()
            .context("failed to fetch repository listing")?;
        forest_from_listing(github.repo(), &listing, config)
    } else {
        LocalScanner::new(config.clone())
            .scan(Path::new(source))
            .context("analysis failed")?
    };
    log_scan_stats(&result);

    let mut forest = result.nodes;
    if let Some(line) = generalize_cmd {
        let Some(generalizer) = CommandGeneralizer::from_command_line(line) else {
            bail!("empty --generalize-cmd");
        };
        let raw = render_simple(&forest);
        let template = generalize_or_raw(&generalizer, &raw);
        if format == ExportFormat::Simple {
            print!("{}", template);
            return Ok(());
        }
        match parse_indented(&template, &ParseOptions::default()) {
            Ok(generalized) => forest = generalized,
            Err(e) => warn!("generalized template is not a valid layout, exporting raw structure: {}", e),
        }
    }

    print_forest(&forest, format, true, use_color)
}

fn run_convert(
    layout: &str,
    to: ExportFormat,
    indent: Option<usize>,
    platform: &PlatformProfile,
    use_color: bool,
) -> Result<()> {
    let mut forest = read_layout(layout, indent)?;
    validate(&mut forest, platform).context("validation failed")?;
    print_forest(&forest, to, false, use_color)
}

fn print_forest(forest: &[Node], format: ExportFormat, show_summary: bool, use_color: bool) -> Result<()> {
    if format == ExportFormat::Tree {
        let config = ExportConfig {
            use_color,
            show_summary,
        };
        TreeFormatter::new(config).print(forest)?;
        return Ok(());
    }
    let text = render(forest, format, &ExportConfig::plain()).context("export failed")?;
    print!("{}", text);
    Ok(())
}

fn log_scan_stats(result: &ScanResult) {
    info!(
        "found {} directories, {} files",
        result.dir_count, result.file_count
    );
    if result.filtered_count > 0 {
        info!(
            "filtered {} items (build artifacts, dependencies, etc.)",
            result.filtered_count
        );
    }
}

/// Root name for a remote listing: the repository part of a URL, or the
/// last path segment of whatever was given.
fn repo_root_name(source: &str) -> String {
    if let Some((_, repo)) = parse_repo_url(source) {
        return repo;
    }
    Path::new(source)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| source.to_string())
}
