//! pagelayout CLI - layout analysis of decoded document pages

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;

use pagelayout::{
    render, AnalysisOptions, Analyzer, Document, JsonFormat, OrderingMode, PageSelection,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "pagelayout")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Reconstruct lines, paragraphs and regions from decoded page content",
    long_about = None
)]
struct Cli {
    /// Decoder output (JSON)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Reading order of content blocks
    #[arg(long, value_enum, default_value = "page-column-aware-mixed")]
    ordering: Ordering,

    /// Analyse pages on a single thread
    #[arg(long)]
    sequential: bool,

    /// Skip malformed input items instead of failing
    #[arg(long)]
    lenient: bool,

    /// Keep page numbers in the output
    #[arg(long)]
    keep_page_numbers: bool,

    /// Do not tag numbered section headings
    #[arg(long)]
    no_divisions: bool,

    /// Do not split regions into columns
    #[arg(long)]
    no_columns: bool,

    /// Fixed median line spacing instead of the per-page estimate
    #[arg(long, value_name = "POINTS")]
    median_spacing: Option<f32>,

    /// Page range for text output (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Prefix tagged paragraphs with their role in text output
    #[arg(long)]
    roles: bool,

    /// Print a header line before every page in text output
    #[arg(long)]
    page_headers: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Full analysed tree as JSON
    Json,
    /// Paragraph text in reading order
    Text,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Ordering {
    /// Decoder order
    Original,
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
    /// Top to bottom, then left to right
    Mixed,
    /// Top edge, then bottom edge
    MixedAbsolute,
    /// Full-width blocks, then left column, then right column
    ColumnAwareMixed,
    /// Column-aware within each page
    PageColumnAwareMixed,
}

impl From<Ordering> for OrderingMode {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Original => OrderingMode::Original,
            Ordering::Horizontal => OrderingMode::Horizontal,
            Ordering::Vertical => OrderingMode::Vertical,
            Ordering::Mixed => OrderingMode::Mixed,
            Ordering::MixedAbsolute => OrderingMode::MixedAbsolute,
            Ordering::ColumnAwareMixed => OrderingMode::ColumnAwareMixed,
            Ordering::PageColumnAwareMixed => OrderingMode::PageColumnAwareMixed,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = analysis_options(cli);
    log::debug!("Analysis options: {:?}", options);
    let doc = analyze_file(&cli.input, options)?;

    let output = match cli.format {
        Format::Json => {
            let format = if cli.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&doc, format)?
        }
        Format::Text => {
            let page_selection = match cli.pages.as_deref() {
                Some(p) => {
                    PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
                }
                None => PageSelection::All,
            };
            let options = RenderOptions::new()
                .with_pages(page_selection)
                .with_roles(cli.roles)
                .with_page_headers(cli.page_headers);
            render::to_text(&doc, &options)?
        }
    };

    if let Some(path) = &cli.output {
        fs::write(path, &output)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", output);
    }

    print_summary(&doc);
    Ok(())
}

fn analysis_options(cli: &Cli) -> AnalysisOptions {
    let mut options = AnalysisOptions::new()
        .with_ordering(cli.ordering.into())
        .with_columns(!cli.no_columns)
        .with_divisions(!cli.no_divisions);

    if cli.sequential {
        options = options.sequential();
    }
    if cli.lenient {
        options = options.lenient();
    }
    if cli.keep_page_numbers {
        options = options.keep_page_numbers();
    }
    if let Some(spacing) = cli.median_spacing {
        options = options.with_median_spacing(spacing);
    }
    options
}

fn analyze_file(path: &Path, options: AnalysisOptions) -> pagelayout::Result<Document> {
    let file = fs::File::open(path)?;
    let raw = pagelayout::input::parse_reader(std::io::BufReader::new(file))?;
    Analyzer::with_options(options).analyze_raw(raw)
}

fn print_summary(doc: &Document) {
    let paragraphs: usize = doc.pages.iter().map(|p| p.paragraph_count()).sum();
    let regions: usize = doc.pages.iter().map(|p| p.regions.len()).sum();
    let graphics: usize = doc.pages.iter().map(|p| p.graphics.len()).sum();

    eprintln!(
        "{} {} pages, {} regions, {} paragraphs, {} graphics, {} styles",
        "Analysed".green().bold(),
        doc.page_count(),
        regions,
        paragraphs,
        graphics,
        doc.styles.len()
    );
}
