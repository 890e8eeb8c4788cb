//! conlang-honing CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use honing_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use honing_cli::commands::{
    run_batch, run_change, run_config, run_convert, run_history, run_inventory, run_prune,
    run_repronounce, run_respell, run_revert, run_rules, run_suggest, run_transcribe, run_voices,
};
use honing_cli::logging::{LogConfig, LogFormat, init_logging};
use honing_cli::settings::load_settings;
use honing_core::HoningError;
use honing_model::ModelError;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = load_settings(cli.config.as_deref());

    let result = match &cli.command {
        Command::Change(args) => run_change(args, &settings).map(drop),
        Command::Batch(args) => run_batch(args, &settings).map(drop),
        Command::Respell(args) => run_respell(args, &settings).map(drop),
        Command::Repronounce(args) => run_repronounce(args, &settings).map(drop),
        Command::Revert(args) => run_revert(args, &settings).map(drop),
        Command::History(args) => run_history(args).map(drop),
        Command::Prune(args) => run_prune(args, &settings).map(drop),
        Command::Inventory(args) => run_inventory(args, &settings).map(drop),
        Command::Rules(args) => run_rules(args).map(drop),
        Command::Suggest(args) => {
            run_suggest(args);
            Ok(())
        }
        Command::Transcribe(args) => run_transcribe(args, &settings).map(drop),
        Command::Voices => {
            run_voices(&settings);
            Ok(())
        }
        Command::Convert(args) => run_convert(args).map(drop),
        Command::Config(args) => run_config(args, cli.config.as_deref(), &settings),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "Command failed");
            eprintln!("error: {}", describe_error(&error));
            1
        }
    };
    std::process::exit(exit_code);
}

/// Prefer the engine's own wording over the raw error chain.
fn describe_error(error: &anyhow::Error) -> String {
    for cause in error.chain() {
        if let Some(err) = cause.downcast_ref::<HoningError>() {
            return err.user_message();
        }
        if let Some(err) = cause.downcast_ref::<ModelError>() {
            return err.user_message();
        }
    }
    format!("{error:#}")
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
