//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Page video downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "page-video-downloader",
    version,
    about = "Extract videos from a catalog of web pages and download them",
    long_about = "Fetches every page listed in a JSON catalog, finds its video, and downloads \
                  the files with bounded concurrency.\n\n\
                  Completed downloads are recorded after each file, so an interrupted run \
                  resumes where it stopped."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml", env = "PVD_CONFIG", global = true)]
    pub config: PathBuf,

    /// Source catalog JSON file.
    #[arg(long, env = "PVD_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Extraction cache JSON file.
    #[arg(long, env = "PVD_CACHE", global = true)]
    pub cache: Option<PathBuf>,

    /// Download state JSON file.
    #[arg(long, env = "PVD_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// Directory downloaded videos are written to.
    #[arg(short = 'd', long = "output-dir", env = "PVD_OUTPUT_DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of simultaneous downloads.
    #[arg(short = 'j', long, env = "PVD_CONCURRENCY", global = true)]
    pub concurrency: Option<usize>,

    /// Maximum number of simultaneous page fetches.
    #[arg(long, env = "PVD_EXTRACT_CONCURRENCY", global = true)]
    pub extract_concurrency: Option<usize>,

    /// Timeout for page fetches and probes, in seconds.
    #[arg(long, env = "PVD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Maximum wait for download data, in seconds.
    #[arg(long, env = "PVD_READ_TIMEOUT", global = true)]
    pub read_timeout: Option<u64>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "PVD_USER_AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Ignore the extraction cache and fetch every page again.
    #[arg(long, env = "PVD_REFRESH_CACHE", global = true)]
    pub refresh_cache: bool,

    /// Hide progress and skipped-download information.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Subcommands. Without one the downloader runs.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract and download everything in the catalog.
    Run,

    /// Build the catalog by requesting `{base_url}{id}` for a range of ids.
    Probe {
        /// URL prefix the numeric id is appended to.
        #[arg(long)]
        base_url: String,

        /// First id to probe.
        #[arg(long, default_value_t = 1)]
        start: u64,

        /// Last id to probe (inclusive).
        #[arg(long)]
        end: u64,
    },

    /// Write a configuration file with default values.
    Init {
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Args {
    /// The subcommand to execute, `run` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(catalog) = &self.catalog {
            config.paths.catalog = catalog.clone();
        }

        if let Some(cache) = &self.cache {
            config.paths.extracted_cache = cache.clone();
        }

        if let Some(state) = &self.state {
            config.paths.state = state.clone();
        }

        if let Some(dir) = &self.output_dir {
            config.paths.output_directory = dir.clone();
        }

        if let Some(concurrency) = self.concurrency {
            config.options.max_concurrency = concurrency;
        }

        if let Some(concurrency) = self.extract_concurrency {
            config.options.extract_concurrency = concurrency;
        }

        if let Some(timeout) = self.timeout {
            config.network.request_timeout_seconds = timeout;
        }

        if let Some(timeout) = self.read_timeout {
            config.network.read_timeout_seconds = timeout;
        }

        if let Some(user_agent) = &self.user_agent {
            config.network.user_agent = user_agent.clone();
        }

        // Boolean flags (only override if set to non-default)
        if self.refresh_cache {
            config.options.refresh_cache = true;
        }

        if self.quiet {
            config.options.show_downloads = false;
            config.options.show_skipped_downloads = false;
        }
    }
}
