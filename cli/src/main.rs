//! doclens CLI - OCR document text tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use doclens::text::split_sentences;
use doclens::{
    load_blocks, AnalyzerOptions, BlockGraph, BlockType, ChunkOptions, LayoutReconstructor,
    SizeUnit, TextChunker, TextNormalizer,
};

#[derive(Parser)]
#[command(name = "doclens")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild, normalize and chunk OCR document text", long_about = None)]
struct Cli {
    /// OCR response JSON (reconstructs to stdout)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Options file (JSON); missing fields use defaults
    #[arg(long, global = true, env = "DOCLENS_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild reading-order text from an OCR response
    Reconstruct {
        /// OCR response JSON
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep line breaks, skip normalization
        #[arg(long)]
        raw: bool,
    },

    /// Normalize a text file
    Normalize {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Split a text file into translation-sized chunks
    Chunk {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum chunk size (overrides the options file)
        #[arg(long, value_name = "N")]
        max_size: Option<usize>,

        /// How chunk size is measured
        #[arg(long, value_enum)]
        unit: Option<Unit>,

        /// Print chunks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show OCR response statistics
    Info {
        /// OCR response JSON
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the effective options as JSON
    Config {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Unit {
    /// Unicode characters
    Chars,
    /// UTF-8 bytes
    Bytes,
}

impl From<Unit> for SizeUnit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Chars => SizeUnit::Chars,
            Unit::Bytes => SizeUnit::Bytes,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = load_options(cli.config.as_deref()).and_then(|options| match cli.command {
        Some(Commands::Reconstruct { input, output, raw }) => {
            cmd_reconstruct(&options, &input, output.as_deref(), raw)
        }
        Some(Commands::Normalize { input, output }) => {
            cmd_normalize(&options, &input, output.as_deref())
        }
        Some(Commands::Chunk {
            input,
            max_size,
            unit,
            json,
        }) => cmd_chunk(&options, &input, max_size, unit, json),
        Some(Commands::Info { input }) => cmd_info(&options, &input),
        Some(Commands::Config { output }) => cmd_config(&options, output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: reconstruct if input is provided
            if let Some(input) = cli.input {
                cmd_reconstruct(&options, &input, None, false)
            } else {
                println!("{}", "Usage: doclens <OCR_JSON>".yellow());
                println!("       doclens --help for more information");
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(path: Option<&Path>) -> CliResult<AnalyzerOptions> {
    let options = match path {
        Some(path) => {
            log::debug!("Loading options from {}", path.display());
            AnalyzerOptions::from_json_file(path)?
        }
        None => AnalyzerOptions::default(),
    };
    options.validate()?;
    Ok(options)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn reconstructor(options: &AnalyzerOptions) -> LayoutReconstructor {
    LayoutReconstructor::new(options.layout.clone())
        .with_normalizer(TextNormalizer::new(options.normalize.clone()))
}

fn reconstruct_text(options: &AnalyzerOptions, input: &Path, raw: bool) -> CliResult<String> {
    let graph = BlockGraph::new(load_blocks(input)?);
    let reconstructor = reconstructor(options);
    Ok(if raw {
        reconstructor.reconstruct_raw(&graph)
    } else {
        reconstructor.reconstruct_graph(&graph)
    })
}

fn cmd_reconstruct(
    options: &AnalyzerOptions,
    input: &Path,
    output: Option<&Path>,
    raw: bool,
) -> CliResult<()> {
    let text = reconstruct_text(options, input, raw)?;
    write_output(output, &text)
}

fn cmd_normalize(options: &AnalyzerOptions, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let bytes = fs::read(input)?;
    let text = TextNormalizer::new(options.normalize.clone()).normalize(&String::from_utf8_lossy(&bytes));
    write_output(output, &text)
}

fn chunk_options(options: &AnalyzerOptions, max_size: Option<usize>, unit: Option<Unit>) -> ChunkOptions {
    let mut chunk = options.chunk.clone();
    if let Some(max) = max_size {
        chunk = chunk.with_max_chunk_size(max);
    }
    if let Some(unit) = unit {
        chunk = chunk.with_size_unit(unit.into());
    }
    chunk
}

fn cmd_chunk(
    options: &AnalyzerOptions,
    input: &Path,
    max_size: Option<usize>,
    unit: Option<Unit>,
    json: bool,
) -> CliResult<()> {
    let text = fs::read_to_string(input)?;
    let chunk_options = chunk_options(options, max_size, unit);
    options.clone().with_chunk(chunk_options.clone()).validate()?;
    let unit = chunk_options.size_unit;
    let chunks = TextChunker::new(chunk_options).chunk(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    for chunk in &chunks {
        println!(
            "{} {}",
            format!("[{}]", chunk.index).cyan().bold(),
            format!("({})", unit.measure(&chunk.text)).dimmed()
        );
        println!("{}", chunk.text);
        println!();
    }
    println!("{} {} chunks", "Done!".green().bold(), chunks.len());

    Ok(())
}

/// Block counts of an OCR response.
#[derive(Debug, Default, PartialEq)]
struct BlockStats {
    pages: usize,
    lines: usize,
    words: usize,
    tables: usize,
    cells: usize,
    form_fields: usize,
}

fn block_stats(graph: &BlockGraph) -> BlockStats {
    let mut stats = BlockStats::default();
    for block in graph.blocks() {
        match block.block_type {
            BlockType::Page => stats.pages += 1,
            BlockType::Line => stats.lines += 1,
            BlockType::Word => stats.words += 1,
            BlockType::Table => stats.tables += 1,
            BlockType::Cell => stats.cells += 1,
            BlockType::KeyValueSet if block.is_key() => stats.form_fields += 1,
            _ => {}
        }
    }
    stats
}

fn cmd_info(options: &AnalyzerOptions, input: &Path) -> CliResult<()> {
    let graph = BlockGraph::new(load_blocks(input)?);
    let stats = block_stats(&graph);

    println!("{}", "OCR Response".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Blocks".bold(), graph.len());
    println!("{}: {}", "Pages".bold(), stats.pages);
    println!("{}: {}", "Lines".bold(), stats.lines);
    println!("{}: {}", "Words".bold(), stats.words);
    println!("{}: {} ({} cells)", "Tables".bold(), stats.tables, stats.cells);
    println!("{}: {}", "Form fields".bold(), stats.form_fields);

    println!();
    println!("{}", "Reconstructed Text".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = reconstructor(options).reconstruct_graph(&graph);
    let chunks = TextChunker::new(options.chunk.clone()).chunk(&text);

    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Sentences".bold(), split_sentences(&text).len());
    println!(
        "{}: {} (max {})",
        "Chunks".bold(),
        chunks.len(),
        options.chunk.max_chunk_size
    );

    Ok(())
}

fn cmd_config(options: &AnalyzerOptions, output: Option<&Path>) -> CliResult<()> {
    let json = options.to_json_string()?;
    write_output(output, &json)
}

fn cmd_version() {
    println!("{} {}", "doclens".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OCR document text tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/doclens".dimmed());
    println!("License: MIT");
}
