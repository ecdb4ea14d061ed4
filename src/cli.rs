use crate::config::{Config, load_config};
use crate::draw_dump::write_draw_dump;
use crate::geometry::Insets;
use crate::render::{render_tag, write_output_svg};
use crate::tag::Tag;
use crate::text_metrics::{CalibratedMeasurer, FontMeasurer, TextMeasure};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tagview", version, about = "Render a leveled, upside-down tag label")]
pub struct Args {
    /// Tag text
    #[arg(short = 't', long = "text")]
    pub text: String,

    /// Tag level, selects the background appearance
    #[arg(short = 'l', long = "level", default_value_t = 0)]
    pub level: u32,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Fixed width; measured from the text when omitted
    #[arg(short = 'w', long = "width")]
    pub width: Option<i32>,

    /// Fixed height; measured from the font when omitted
    #[arg(short = 'H', long = "height")]
    pub height: Option<i32>,

    /// Uniform padding around the view
    #[arg(short = 'p', long = "padding")]
    pub padding: Option<i32>,

    /// Write the draw pass geometry as JSON
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,

    /// Skip system font lookup and use calibrated character widths
    #[arg(long = "fastText")]
    pub fast_text: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = build_config(&args)?;

    let measurer: Box<dyn TextMeasure> = if args.fast_text {
        Box::new(CalibratedMeasurer)
    } else {
        let fonts = FontMeasurer::new(config.tag.font_family.clone());
        if !fonts.is_resolved() {
            tracing::warn!(
                family = fonts.family(),
                "no system font matched, using calibrated widths"
            );
        }
        Box::new(fonts)
    };

    let tag = Tag::new(args.text.clone(), args.level);
    let rendered = render_tag(&tag, &config, measurer)?;
    tracing::debug!(
        width = rendered.size.width,
        height = rendered.size.height,
        text = %rendered.pass.text.text,
        "rendered tag"
    );

    if let Some(path) = args.dump.as_deref() {
        write_draw_dump(path, &tag, rendered.size, &rendered.pass)?;
    }

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&rendered.svg, args.output.as_deref()),
        OutputFormat::Png => write_png(&rendered.svg, ensure_output(&args.output, "png")?),
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: PathBuf) -> Result<()> {
    crate::render::write_output_png(svg, &output)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: PathBuf) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if args.width.is_some() {
        config.render.width = args.width;
    }
    if args.height.is_some() {
        config.render.height = args.height;
    }
    if let Some(padding) = args.padding {
        config.render.padding = Insets::uniform(padding);
    }
    Ok(config)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
