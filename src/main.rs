//! Page Video Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use page_video_downloader::{
    api::SiteClient,
    catalog::{probe_catalog, save_catalog},
    cli::{Args, Command},
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_error, print_info, print_run_summary,
        print_success, print_warning, Progress,
    },
    pipeline::Pipeline,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Download(_)
                | Error::Timeout(_)
                | Error::HttpStatus { .. }
                | Error::Http(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    let command = args.command();
    if let Command::Init { force } = command {
        return init_config(&args.config, force);
    }

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    let progress = Progress::new(config.options.show_downloads);
    if progress.is_visible() {
        print_banner();
    }

    match command {
        Command::Probe {
            base_url,
            start,
            end,
        } => probe(&config, &base_url, start, end, &progress).await,
        _ => download(config, progress).await,
    }
}

/// Run the pipeline, stopping cleanly on Ctrl-C.
async fn download(config: Config, progress: Progress) -> Result<i32> {
    print_config_summary(
        &config.paths.catalog,
        &config.paths.state,
        &config.paths.output_directory,
        config.options.max_concurrency,
    );

    let pipeline = Pipeline::new(config, progress)?;

    let summary = tokio::select! {
        summary = pipeline.run() => summary?,
        _ = tokio::signal::ctrl_c() => {
            print_warning(&format!(
                "Interrupted. Completed downloads are saved in {}",
                pipeline.config().paths.state.display()
            ));
            return Ok(exit_codes::ABORT);
        }
    };

    print_run_summary(&summary);

    if summary.has_failures() {
        print_warning("Some items failed; run again to retry them");
        return Ok(exit_codes::SOME_ITEMS_FAILED);
    }

    print_success("All done");
    Ok(exit_codes::SUCCESS)
}

async fn probe(
    config: &Config,
    base_url: &str,
    start: u64,
    end: u64,
    progress: &Progress,
) -> Result<i32> {
    if end < start {
        return Err(Error::ConfigValidation {
            field: "end".into(),
            message: format!("must not be less than start ({})", start),
        });
    }

    let client = SiteClient::from_config(config)?;
    print_info(&format!("Probing {}{}..={}", base_url, start, end));

    let bar = progress.item_bar(end - start + 1, "Probing");
    let catalog = probe_catalog(&client, base_url, start..=end, &bar).await;
    save_catalog(&config.paths.catalog, &catalog)?;

    print_success(&format!(
        "Wrote {} page(s) to {}",
        catalog.len(),
        config.paths.catalog.display()
    ));
    Ok(exit_codes::SUCCESS)
}

fn init_config(path: &std::path::Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        )));
    }

    Config::default().save(path)?;
    print_success(&format!("Wrote default configuration to {}", path.display()));
    Ok(exit_codes::SUCCESS)
}
