use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use textcard::session::Session;
use textcard::{Color, Margins, RenderConfig, TextImager};

/// Render console text into word-wrapped image files.
///
/// Settings come from built-in defaults, then `TEXTCARD_*` environment
/// variables, then these flags.
#[derive(Parser, Debug)]
#[command(name = "textcard", version, about)]
struct Cli {
    /// Font file (.ttf/.otf)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Font size in pixels
    #[arg(long, value_name = "PX")]
    font_size: Option<u32>,

    /// Canvas width in pixels
    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    /// Minimum canvas height in pixels
    #[arg(long, value_name = "PX")]
    min_height: Option<u32>,

    /// Margin on all four sides in pixels
    #[arg(long, value_name = "PX")]
    margin: Option<u32>,

    /// Extra space between lines in pixels
    #[arg(long, value_name = "PX")]
    line_spacing: Option<u32>,

    /// Background color (#rrggbb, white, black)
    #[arg(long, value_name = "COLOR")]
    background: Option<String>,

    /// Text color (#rrggbb, white, black)
    #[arg(long, value_name = "COLOR")]
    foreground: Option<String>,

    /// Output name prefix; images are written as <OUTPUT>_<n>.<FORMAT>
    #[arg(short, long, value_name = "BASE")]
    output: Option<String>,

    /// Output file extension (png, jpg, bmp)
    #[arg(long, value_name = "EXT")]
    format: Option<String>,

    /// Read JSON jobs from stdin instead of prompting
    #[arg(long)]
    json: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, mut config: RenderConfig) -> anyhow::Result<RenderConfig> {
        if let Some(font) = &self.font {
            config.font_path = font.clone();
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(width) = self.width {
            config.canvas_width = width;
        }
        if let Some(h) = self.min_height {
            config.min_height = h;
        }
        if let Some(m) = self.margin {
            config.margins = Margins::uniform(m);
        }
        if let Some(s) = self.line_spacing {
            config.line_spacing = s;
        }
        if let Some(bg) = &self.background {
            config.background = bg.parse::<Color>().context("--background")?;
        }
        if let Some(fg) = &self.foreground {
            config.foreground = fg.parse::<Color>().context("--foreground")?;
        }
        if let Some(out) = &self.output {
            config.output_base = out.clone();
        }
        if let Some(fmt) = &self.format {
            config.output_extension = fmt.trim_start_matches('.').to_string();
        }
        Ok(config)
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = RenderConfig::from_env().context("reading TEXTCARD_* environment")?;
    let config = cli.apply(config)?;
    config.validate()?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let imager = TextImager::new(config).context("startup failed")?;
    log::info!(
        "using font {} at {}px, canvas width {}",
        imager.config().font_path.display(),
        imager.config().font_size,
        imager.config().canvas_width
    );

    let mut session = Session::new(&imager);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = if cli.json {
        session.run_json(stdin.lock(), stdout.lock())
    } else {
        session.run(stdin.lock(), stdout.lock())
    };
    let stats = result.context("console I/O failed")?;

    log::info!(
        "session finished: {} saved, {} failed, {} skipped",
        stats.saved,
        stats.failed,
        stats.skipped
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("textcard: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
