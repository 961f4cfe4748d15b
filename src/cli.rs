use crate::config::{Config, load_config};
use crate::ir::{TreeNode, parse_tree};
use crate::layout::layout_tree;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "capgrid", version, about = "Nested grid layout for capability maps")]
pub struct Args {
    /// Input tree (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Settings file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Deepest level to keep (root is 0)
    #[arg(short = 'l', long = "maxLevel")]
    pub max_level: Option<usize>,

    /// Target width / height ratio for every grid
    #[arg(short = 'a', long = "aspectRatio")]
    pub aspect_ratio: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The input tree annotated with positions
    Json,
    /// Flat node list
    Dump,
    Svg,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load settings from {:?}", args.config))?;
    apply_overrides(&mut config, &args);

    let input = read_input(args.input.as_deref())?;
    let mut tree = parse_tree(&input).context("input is not a valid node tree")?;
    let tree = prepare_and_layout(&mut tree, &config)?;

    match args.output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(tree)?;
            write_text(&json, args.output.as_deref())?;
        }
        OutputFormat::Dump => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, tree, &config.layout)?,
            None => {
                let dump = LayoutDump::from_tree(tree, &config.layout);
                println!("{}", serde_json::to_string_pretty(&dump)?);
            }
        },
        OutputFormat::Svg => {
            let svg = render_svg(tree, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CAPGRID_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(level) = args.max_level {
        config.max_level = Some(level);
    }
    if let Some(ratio) = args.aspect_ratio {
        config.layout.target_aspect_ratio = ratio;
    }
}

/// Applies level truncation and runs the layout.
pub fn prepare_and_layout<'t>(tree: &'t mut TreeNode, config: &Config) -> Result<&'t mut TreeNode> {
    if let Some(max_level) = config.max_level {
        tree.truncate_to_level(max_level);
    }
    tracing::info!(
        root = %tree.id,
        nodes = tree.node_count(),
        max_level = ?config.max_level,
        "laying out tree"
    );
    Ok(layout_tree(tree, &config.layout)?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}
