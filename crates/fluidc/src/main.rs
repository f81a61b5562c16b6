// # fluidc - Fluid Stylesheet Renderer
//
// Thin integration layer over fluid-core:
// - Reads configuration from environment variables
// - Loads the persisted preset file
// - Writes the rendered `:root {}` block
//
// No value parsing or formula logic lives here. Everything below the
// configuration layer is fluid-core.
//
// ## Configuration
//
// ### Presets
// - `FLUID_PRESETS_PATH`: JSON preset file (required)
//
// ### Breakpoints
// - `FLUID_MIN_SCREEN`: Global minimum screen width in px (default 360)
// - `FLUID_MAX_SCREEN`: Global maximum screen width in px (default 1920)
//
// ### Output
// - `FLUID_VARIABLE_PREFIX`: CSS variable prefix (default `--fluid-`)
// - `FLUID_OUTPUT`: File to write; stdout when unset
// - `FLUID_LOG_LEVEL`: trace, debug, info, warn or error (default info)
//
// ## Example
//
// ```bash
// export FLUID_PRESETS_PATH=./presets.json
// export FLUID_MIN_SCREEN=400
// export FLUID_MAX_SCREEN=1600
// export FLUID_OUTPUT=./fluid.css
//
// fluidc
// ```

use anyhow::{Context, Result};
use fluid_core::{FilePresetStore, FluidConfig, PresetStore, render_root_block};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Stylesheet written
/// - 1: Configuration or startup error
/// - 2: Runtime error (unreadable presets, failed write)
#[derive(Debug, Clone, Copy)]
enum FluidExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<FluidExitCode> for ExitCode {
    fn from(code: FluidExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    presets_path: PathBuf,
    min_screen: Option<u32>,
    max_screen: Option<u32>,
    variable_prefix: Option<String>,
    output: Option<PathBuf>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            presets_path: env::var("FLUID_PRESETS_PATH")
                .context("FLUID_PRESETS_PATH is required")?
                .into(),
            min_screen: parse_screen("FLUID_MIN_SCREEN")?,
            max_screen: parse_screen("FLUID_MAX_SCREEN")?,
            variable_prefix: env::var("FLUID_VARIABLE_PREFIX").ok(),
            output: env::var("FLUID_OUTPUT").ok().map(PathBuf::from),
            log_level: env::var("FLUID_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the environment and build the library configuration
    fn validate(&self) -> Result<FluidConfig> {
        if self.presets_path.as_os_str().is_empty() {
            anyhow::bail!("FLUID_PRESETS_PATH cannot be empty");
        }

        if !self.presets_path.is_file() {
            anyhow::bail!(
                "FLUID_PRESETS_PATH does not point to a file: {}",
                self.presets_path.display()
            );
        }

        if let Some(output) = &self.output
            && let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "FLUID_OUTPUT parent directory does not exist: {}",
                parent.display()
            );
        }

        if log_level(&self.log_level).is_none() {
            anyhow::bail!(
                "FLUID_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        let defaults = FluidConfig::default();
        let mut config = FluidConfig::new().with_breakpoints(
            self.min_screen.unwrap_or(defaults.breakpoints.min_screen_width),
            self.max_screen.unwrap_or(defaults.breakpoints.max_screen_width),
        );
        if let Some(prefix) = &self.variable_prefix {
            config = config.with_variable_prefix(prefix.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_screen(var: &str) -> Result<Option<u32>> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a whole number of pixels. Got: {}", var, raw)),
        Err(_) => Ok(None),
    }
}

fn log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return FluidExitCode::ConfigError.into();
        }
    };

    let fluid_config = match config.validate() {
        Ok(fluid_config) => fluid_config,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return FluidExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr so stdout stays a clean stylesheet
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&config.log_level).unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return FluidExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return FluidExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match render(&config, &fluid_config).await {
            Ok(()) => FluidExitCode::Success,
            Err(e) => {
                error!("Render failed: {:#}", e);
                FluidExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Load presets, render, and write the stylesheet
async fn render(config: &Config, fluid_config: &FluidConfig) -> Result<()> {
    info!("Loading presets from {}", config.presets_path.display());
    let store = FilePresetStore::open(&config.presets_path).await?;
    let groups = store.list_groups().await?;

    let css = render_root_block(&groups, fluid_config)?;

    match &config.output {
        Some(path) => {
            tokio::fs::write(path, format!("{}\n", css))
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", css).context("Failed to write stylesheet to stdout")?;
        }
    }

    Ok(())
}
