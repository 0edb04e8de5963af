use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oremark::{Config, Dialect};

#[derive(Parser)]
#[command(name = "oremark")]
#[command(about = "Sanitize, parse and render bracket-tag post markup")]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = "oremark.toml")]
    config: PathBuf,

    /// Recognise [source="URL" text:LABEL] links regardless of config
    #[arg(long, global = true)]
    linked: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed block sequence
    Parse {
        /// Input markup file, or - for stdin
        input: PathBuf,

        /// Print JSON instead of debug output
        #[arg(long)]
        json: bool,
    },
    /// Print the markup with malformed tag spans removed
    Sanitize {
        /// Input markup file, or - for stdin
        input: PathBuf,
    },
    /// Print the feed excerpt
    Excerpt {
        /// Input markup file, or - for stdin
        input: PathBuf,

        /// Maximum characters before the ellipsis
        #[arg(long)]
        max: Option<usize>,
    },
    /// Print the generated Typst markup
    Typst {
        /// Input markup file, or - for stdin
        input: PathBuf,
    },
    /// Render to PDF, or to SVG pages with --svg
    Render {
        /// Input markup file
        input: PathBuf,

        /// Output file (defaults to input name with .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write one SVG file per page instead of a PDF
        #[arg(long)]
        svg: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = Config::load_or_default(&cli.config)?;
    if cli.linked {
        config.dialect = Dialect::Linked;
    }

    match cli.command {
        Command::Parse { input, json } => {
            let blocks = oremark::parse_with_dialect(&read_input(&input)?, config.dialect);
            if json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
            } else {
                for block in &blocks {
                    println!("{:?}", block);
                }
            }
        }
        Command::Sanitize { input } => {
            print!("{}", oremark::sanitize(&read_input(&input)?));
        }
        Command::Excerpt { input, max } => {
            if let Some(max) = max {
                config.excerpt.max_chars = max;
            }
            let markup = read_input(&input)?;
            println!(
                "{}",
                oremark::excerpt(&markup, config.dialect, &config.excerpt)
            );
        }
        Command::Typst { input } => {
            print!("{}", oremark::markup_to_typst(&read_input(&input)?, &config));
        }
        Command::Render { input, output, svg } => {
            let markup = read_input(&input)?;
            if svg {
                render_svg(&markup, &input, output, &config)?;
            } else {
                let pdf_bytes = oremark::markup_to_pdf(&markup, &config)?;
                let output = output.unwrap_or_else(|| input.with_extension("pdf"));
                fs::write(&output, pdf_bytes)
                    .with_context(|| format!("Error writing {}", output.display()))?;
                println!("Created {}", output.display());
            }
        }
    }

    Ok(())
}

fn render_svg(markup: &str, input: &Path, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let doc = oremark::markup_to_svg(markup, config)?;
    let base = output.unwrap_or_else(|| input.with_extension("svg"));
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());

    for (i, page) in doc.pages.iter().enumerate() {
        let path = if doc.pages.len() == 1 {
            base.clone()
        } else {
            base.with_file_name(format!("{}-{}.svg", stem, i + 1))
        };
        fs::write(&path, page).with_context(|| format!("Error writing {}", path.display()))?;
        println!("Created {}", path.display());
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut markup = String::new();
        io::stdin()
            .read_to_string(&mut markup)
            .context("Error reading stdin")?;
        return Ok(markup);
    }
    fs::read_to_string(input).with_context(|| format!("Error reading {}", input.display()))
}
