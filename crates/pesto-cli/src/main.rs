use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use winit::dpi::LogicalSize;

use pesto_engine::device::GpuInit;
use pesto_engine::logging::{LoggingConfig, init_logging};
use pesto_engine::window::{Runtime, RuntimeConfig};

mod runner;

use runner::{RunnerConfig, ScriptApp};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a pesto Lua script", long_about = None)]
struct Cli {
    /// The Lua script to run
    script: PathBuf,

    /// Window title (defaults to the script's file name)
    #[arg(long)]
    title: Option<String>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// TrueType/OpenType font used by `graphics.text`
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, default_value_t = 20.0)]
    font_size: f32,

    /// Log filter, e.g. "debug" or "pesto_lua=debug"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let title = cli.title.unwrap_or_else(|| {
        cli.script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pesto".to_string())
    });
    let runtime = RuntimeConfig {
        title,
        initial_size: LogicalSize::new(cli.width as f64, cli.height as f64),
        ..Default::default()
    };

    let app = ScriptApp::new(RunnerConfig {
        script: cli.script,
        font: cli.font,
        font_size: cli.font_size,
    })?;
    let failed = app.failure_flag();

    Runtime::run(runtime, GpuInit::default(), app)?;

    Ok(if failed.get() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
