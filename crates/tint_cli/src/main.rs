//! Tint CLI
//!
//! Converts DTCG design token documents into theming declarations.
//!
//! ```text
//! tint convert tokens.json -o theme.json --strategy fail
//! ```

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tint_theming::{parse_design_tokens, ParseOptions, UnsupportedTokenStrategy};
use tint_tokens::ColorHexFormat;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::TintConfig;

#[derive(Parser, Debug)]
#[command(name = "tint")]
#[command(about = "Convert design tokens into theming declarations")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a token document to a declaration JSON
    Convert {
        /// Token document (DTCG JSON)
        input: PathBuf,

        /// Write the declaration here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to tint.toml next to the input)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory file tokens are resolved against (defaults to the input's directory)
        #[arg(long)]
        base_path: Option<PathBuf>,

        /// What to do with tokens that cannot be converted
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Hex layout for translucent colors
        #[arg(long, value_enum)]
        color_format: Option<ColorFormatArg>,

        /// Top-level token set to drop before processing (repeatable)
        #[arg(long = "skip-set", value_name = "NAME")]
        skip_sets: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Skip,
    Fail,
}

impl From<StrategyArg> for UnsupportedTokenStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Skip => UnsupportedTokenStrategy::Skip,
            StrategyArg::Fail => UnsupportedTokenStrategy::Fail,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorFormatArg {
    Argb,
    Rgba,
}

impl From<ColorFormatArg> for ColorHexFormat {
    fn from(arg: ColorFormatArg) -> Self {
        match arg {
            ColorFormatArg::Argb => ColorHexFormat::Argb,
            ColorFormatArg::Rgba => ColorHexFormat::Rgba,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the declaration
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            base_path,
            strategy,
            color_format,
            skip_sets,
        } => {
            let options = resolve_options(
                &input,
                config,
                base_path,
                strategy,
                color_format,
                skip_sets,
            )?;
            convert(&input, output.as_deref(), &options).await
        }
    }
}

/// Load the configuration file and apply command line overrides on top
fn resolve_options(
    input: &Path,
    config: Option<PathBuf>,
    base_path: Option<PathBuf>,
    strategy: Option<StrategyArg>,
    color_format: Option<ColorFormatArg>,
    skip_sets: Vec<String>,
) -> Result<ParseOptions> {
    let input_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut tint_config = match config {
        Some(path) => TintConfig::load(&path)?,
        None => TintConfig::discover(&input_dir)?,
    };
    if let Some(strategy) = strategy {
        tint_config.converter.unsupported_token_handling_strategy = strategy.into();
    }
    if let Some(format) = color_format {
        tint_config.converter.color_hex_format = format.into();
    }
    tint_config.processing.skip_token_sets.extend(skip_sets);

    Ok(tint_config.into_parse_options(Some(base_path.unwrap_or(input_dir))))
}

async fn convert(
    input: &Path,
    output: Option<&Path>,
    options: &ParseOptions,
) -> Result<()> {
    let document = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let declaration = parse_design_tokens(&document, options)
        .await
        .with_context(|| format!("Failed to convert {}", input.display()))?;
    let json = declaration
        .to_json_pretty()
        .context("Failed to encode declaration")?;

    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENS: &str = r##"{
        "draft": {"wip": {"$type": "color", "$value": "#123456"}},
        "scrim": {"$type": "color", "$value": "#00000080"},
        "opacity": {"$type": "number", "$value": 0.5}
    }"##;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tokens.json"), TOKENS).unwrap();
        fs::write(
            dir.path().join(config::CONFIG_FILE),
            "[converter]\ncolor_hex_format = \"rgba\"\nunsupported_token_handling_strategy = \"fail\"\n",
        )
        .unwrap();
        dir
    }

    async fn run(args: &[&str]) -> Result<()> {
        let cli = Cli::try_parse_from(args)?;
        let Commands::Convert {
            input,
            output,
            config,
            base_path,
            strategy,
            color_format,
            skip_sets,
        } = cli.command;
        let options = resolve_options(&input, config, base_path, strategy, color_format, skip_sets)?;
        convert(&input, output.as_deref(), &options).await
    }

    #[tokio::test]
    async fn test_config_file_is_discovered_next_to_input() {
        let dir = fixture();
        let input = dir.path().join("tokens.json");

        // tint.toml asks to fail on the number token
        let error = run(&["tint", "convert", input.to_str().unwrap()])
            .await
            .unwrap_err();
        assert!(format!("{error:#}").contains("`opacity`"));
    }

    #[tokio::test]
    async fn test_flags_override_config_file() {
        let dir = fixture();
        let input = dir.path().join("tokens.json");
        let output = dir.path().join("theme.json");

        run(&[
            "tint",
            "convert",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--strategy",
            "skip",
            "--color-format",
            "argb",
            "--skip-set",
            "draft",
        ])
        .await
        .unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.ends_with('\n'));
        assert_eq!(
            written.trim_end(),
            "{\n  \"colors\": {\n    \"scrim\": \"#80000000\"\n  }\n}"
        );
    }

    #[tokio::test]
    async fn test_explicit_config_path() {
        let dir = fixture();
        let input = dir.path().join("tokens.json");
        let other = dir.path().join("other.toml");
        fs::write(&other, "[processing]\nskip_token_sets = [\"draft\"]\n").unwrap();

        let options = resolve_options(&input, Some(other), None, None, None, Vec::new()).unwrap();
        assert_eq!(
            options.converter.unsupported_token_handling_strategy,
            UnsupportedTokenStrategy::Skip
        );
        assert_eq!(options.converter.color_hex_format, ColorHexFormat::Argb);
        assert_eq!(options.processing.skip_token_sets, vec!["draft"]);
        assert_eq!(options.decoding.base_path.as_deref(), Some(dir.path()));
    }
}
