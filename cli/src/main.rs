//! hocrkit CLI - hOCR text, confidence, and line image extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use hocrkit::confidence::summarize;
use hocrkit::source::is_hocr_path;
use hocrkit::{
    dehyphenate, document_confidence, extract_files, page_confidence, parse_file, ExtractOptions,
    ImageSource, JsonFormat,
};

/// Files handed to one parallel batch; bounds the number of decoded pages in memory.
const BATCH_SIZE: usize = 16;

#[derive(Parser)]
#[command(name = "hocrkit")]
#[command(version)]
#[command(about = "Extract text, confidence, and line images from hOCR files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the text of an hOCR file, one line per row
    #[command(alias = "txt")]
    Text {
        /// Input hOCR file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the average word confidence of an hOCR file
    Conf {
        /// Input hOCR file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Also print the confidence of every page
        #[arg(long)]
        pages: bool,
    },

    /// Write an image and a text file for every line
    Lines {
        /// Input hOCR files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Use the image next to each hOCR file (0001.hocr -> 0001.png)
        #[arg(short = 'b', long)]
        sibling: bool,

        /// Use this image for every page instead
        #[arg(long, value_name = "IMAGE", conflicts_with = "sibling")]
        image: Option<PathBuf>,

        /// Directory to save files into
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Confidence (0.0-1.0) for lines without usable word confidences
        #[arg(long, value_name = "CONF", value_parser = parse_confidence)]
        default_conf: Option<f64>,

        /// Fail a file on its first bad line
        #[arg(long)]
        strict: bool,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Join words hyphenated across line breaks and print the text
    Dehyphenate {
        /// Input hOCR file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert an hOCR file to JSON
    Json {
        /// Input hOCR file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output line details instead of the document tree
        #[arg(long)]
        lines: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input hOCR file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Text { input, output } => cmd_text(&input, output.as_deref()),
        Commands::Conf { input, pages } => cmd_conf(&input, pages),
        Commands::Lines {
            inputs,
            sibling,
            image,
            dir,
            default_conf,
            strict,
            sequential,
        } => {
            let mut options = ExtractOptions::new();
            if sibling {
                options = options.with_sibling_image();
            }
            if let Some(image) = image {
                options = options.with_image(image);
            }
            if let Some(conf) = default_conf {
                options = options.with_default_confidence(conf);
            }
            if strict {
                options = options.strict();
            }
            if sequential {
                options = options.sequential();
            }
            cmd_lines(&inputs, &dir, &options)
        }
        Commands::Dehyphenate { input, output } => cmd_dehyphenate(&input, output.as_deref()),
        Commands::Json {
            input,
            output,
            lines,
            compact,
        } => cmd_json(&input, output.as_deref(), lines, compact),
        Commands::Info { input } => cmd_info(&input),
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

fn parse_confidence(value: &str) -> Result<f64, String> {
    let conf: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if (0.0..=1.0).contains(&conf) {
        Ok(conf)
    } else {
        Err(format!("{} is outside 0.0-1.0", conf))
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = hocrkit::extract_text(input)?;
    write_output(output, &text)
}

fn cmd_conf(input: &Path, pages: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;

    if pages {
        for page in &doc.pages {
            match page_confidence(page) {
                Ok(conf) => println!("{}\t{:.0}", page.id, conf),
                Err(e) => eprintln!("{} {}: {}", "Warning".yellow(), page.id, e),
            }
        }
    }

    println!("{:.0}", document_confidence(&doc)?);
    Ok(())
}

fn cmd_lines(
    inputs: &[PathBuf],
    dir: &Path,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    if options.image_source == ImageSource::Sibling {
        for path in inputs.iter().filter(|p| !is_hocr_path(p)) {
            eprintln!(
                "{} {}: not an .hocr/.html file, looking for {}",
                "Warning".yellow(),
                path.display(),
                hocrkit::source::sibling_image_path(path).display()
            );
        }
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = 0;
    let mut failed = 0;
    for batch in inputs.chunks(BATCH_SIZE) {
        for (path, result) in extract_files(batch, options) {
            pb.set_message(path.display().to_string());
            match result {
                Ok(extraction) => {
                    for warning in &extraction.warnings {
                        pb.println(format!(
                            "{} {}: {}",
                            "Warning".yellow(),
                            path.display(),
                            warning
                        ));
                    }
                    match extraction.save_all(dir) {
                        Ok(count) => written += count,
                        Err(e) => {
                            failed += 1;
                            pb.println(format!("{} {}: {}", "Error".red(), path.display(), e));
                        }
                    }
                }
                Err(e) => {
                    failed += 1;
                    pb.println(format!("{} {}: {}", "Error".red(), path.display(), e));
                }
            }
            pb.inc(1);
        }
    }
    pb.finish_and_clear();

    println!(
        "{} {} lines written to {}",
        "Done!".green().bold(),
        written,
        dir.display()
    );

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_dehyphenate(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = parse_file(input)?;
    let report = dehyphenate(&mut doc);

    if report.skipped_char_level > 0 {
        eprintln!(
            "{} {} character-level hyphenations left unjoined",
            "Warning".yellow(),
            report.skipped_char_level
        );
    }
    log::info!("Joined {} words", report.joined);

    write_output(output, &doc.plain_text())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    lines: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = if lines {
        let extraction =
            hocrkit::extract_line_details(input, &ExtractOptions::new().text_only())?;
        hocrkit::render::to_json(&extraction, format)?
    } else {
        hocrkit::render::to_json(&parse_file(input)?, format)?
    };

    write_output(output, &json)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Lines".bold(), doc.line_count());
    println!("{}: {}", "Words".bold(), doc.word_count());

    for page in &doc.pages {
        if let Some(image) = page.image_ref() {
            println!("{}: {} ({})", "Image".bold(), image, page.id);
        }
    }

    println!();
    println!("{}", "Confidence".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    match summarize(doc.words()) {
        Ok(stats) => {
            println!("{}: {:.1}", "Mean".bold(), stats.mean);
            println!("{}: {:.0}", "Min".bold(), stats.min);
            println!("{}: {:.0}", "Max".bold(), stats.max);
        }
        Err(e) => println!("{}", e.to_string().dimmed()),
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "hocrkit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("hOCR text, confidence, and line image extraction tool");
    println!();
    println!("License: MIT");
}
