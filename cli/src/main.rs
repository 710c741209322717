//! docform CLI - render JSON document descriptions to several formats

mod input;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use docform::transform::{EmojiTransformer, NormalizeTransformer, StripColorsTransformer};
use docform::{JsonFormat, NormalizePreset, Output, RenderOptions, TransformPipeline};

#[derive(Parser)]
#[command(name = "docform")]
#[command(version)]
#[command(about = "Render structured documents to Markdown, text, JSON, and CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON document description
    Render {
        /// Input document description (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output formats, comma separated
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "markdown",
            env = "DOCFORM_FORMATS"
        )]
        formats: Vec<String>,

        /// Output file (single format) or directory (stdout if not specified)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Replace status words with emoji markers
        #[arg(long)]
        emoji: bool,

        /// Remove ANSI color sequences
        #[arg(long)]
        strip_colors: bool,

        /// Normalize output text
        #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "standard")]
        normalize: Option<NormalizeLevel>,

        /// Include YAML frontmatter (Markdown)
        #[arg(long)]
        frontmatter: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        /// CSV field delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,
    },

    /// List available output formats
    Formats,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum NormalizeLevel {
    /// Unicode NFC only
    Minimal,
    /// Also ligatures, trailing whitespace and blank-line capping (default)
    Standard,
}

impl From<NormalizeLevel> for NormalizePreset {
    fn from(level: NormalizeLevel) -> Self {
        match level {
            NormalizeLevel::Minimal => NormalizePreset::Minimal,
            NormalizeLevel::Standard => NormalizePreset::Standard,
        }
    }
}

struct RenderArgs {
    formats: Vec<String>,
    output: Option<PathBuf>,
    emoji: bool,
    strip_colors: bool,
    normalize: Option<NormalizeLevel>,
    options: RenderOptions,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            formats,
            output,
            emoji,
            strip_colors,
            normalize,
            frontmatter,
            compact,
            max_heading,
            delimiter,
        } => {
            let options = RenderOptions::new()
                .with_frontmatter(frontmatter)
                .with_max_heading(max_heading)
                .with_csv_delimiter(delimiter)
                .with_json_format(if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                });
            cmd_render(
                &input,
                RenderArgs {
                    formats,
                    output,
                    emoji,
                    strip_colors,
                    normalize,
                    options,
                },
            )
        }
        Commands::Formats => {
            cmd_formats();
            Ok(())
        }
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_pipeline(args: &RenderArgs) -> Option<Arc<TransformPipeline>> {
    let pipeline = TransformPipeline::new();
    if args.emoji {
        pipeline.add(EmojiTransformer::new());
    }
    if args.strip_colors {
        pipeline.add(StripColorsTransformer::new());
    }
    if let Some(level) = args.normalize {
        pipeline.add(NormalizeTransformer::from_preset(level.into()));
    }
    if pipeline.is_empty() {
        None
    } else {
        log::debug!("pipeline: {:?}", pipeline.names());
        Some(Arc::new(pipeline))
    }
}

fn cmd_render(input: &Path, args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = input::load(input)?;
    let pipeline = build_pipeline(&args);

    let outputs = Output::with_defaults(args.options.clone(), pipeline)
        .formats(args.formats.iter().map(|f| f.trim()))
        .render(&doc)?;

    match args.output.as_deref() {
        None => {
            for output in &outputs {
                print!("{}", String::from_utf8_lossy(&output.bytes));
            }
        }
        Some(path) if outputs.len() == 1 && path.extension().is_some() => {
            fs::write(path, &outputs[0].bytes)?;
            println!("{} {}", "Saved to".green(), path.display());
        }
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());

            println!("{}", "Output files:".green().bold());
            for (i, output) in outputs.iter().enumerate() {
                let path = output.file_path(dir, &stem);
                fs::write(&path, &output.bytes)?;
                let branch = if i + 1 == outputs.len() { "└─" } else { "├─" };
                println!(
                    "  {} {}",
                    branch.dimmed(),
                    path.file_name().unwrap_or_default().to_string_lossy()
                );
            }
        }
    }

    Ok(())
}

fn cmd_formats() {
    let output = Output::with_defaults(RenderOptions::default(), None);
    println!("{}", "Available formats".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for format in output.registry().formats() {
        let extensions = output
            .registry()
            .get(format)
            .map(|r| r.file_extensions().join(", "))
            .unwrap_or_default();
        println!("{:<10} {}", format.bold(), extensions.dimmed());
    }
}

fn cmd_version() {
    println!("{} {}", "docform".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Structured document rendering tool");
    println!();
    println!("License: MIT");
}
