//! Shared components for CLI commands
//!
//! Logging setup, input discovery and the format dispatch used by both
//! subcommands.

use crate::app::models::Warning;
use crate::app::models::site::Site;
use crate::app::services::sinex_parser::decode_sinex_sites;
use crate::app::services::sitelog_parser::SitelogParser;
use crate::cli::args::{InputFormat, LogArgs};
use crate::config::Config;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Statistics reported by every command
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub sites_processed: usize,
    pub intervals_reported: usize,
    pub warnings: usize,
    pub processing_time: std::time::Duration,
}

impl CommandStats {
    /// Whether every input was processed without a fatal error
    pub fn success(&self) -> bool {
        self.files_failed == 0
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the `-v`/`-q` switches.
pub fn setup_logging(args: &LogArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitelog_processor={}", log_level)));

    // A subscriber may already be installed when commands run in-process
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    if installed.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Sites and file-level warnings decoded from one input
#[derive(Debug)]
pub struct LoadedFile {
    pub format: InputFormat,
    pub sites: Vec<Site>,
    pub warnings: Vec<Warning>,
}

/// Decode a site log or SINEX file
pub fn load_file(path: &Path, format: InputFormat, config: &Config) -> Result<LoadedFile> {
    let format = format.resolve(path)?;
    debug!("Decoding {} as {:?}", path.display(), format);

    match format {
        InputFormat::Sitelog => {
            let parser = SitelogParser::new(config.sitelog.clone())?;
            let site = parser
                .parse_file(path)
                .with_context(|| format!("Failed to decode site log {}", path.display()))?;
            Ok(LoadedFile {
                format,
                sites: vec![site],
                warnings: Vec::new(),
            })
        }
        InputFormat::Sinex => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let decoded = decode_sinex_sites(BufReader::new(file))
                .with_context(|| format!("Failed to decode SINEX file {}", path.display()))?;
            Ok(LoadedFile {
                format,
                sites: decoded.sites,
                warnings: decoded.warnings,
            })
        }
        InputFormat::Auto => bail!("Could not determine the format of {}", path.display()),
    }
}

/// Expand directories into the decodable files they contain
///
/// Explicit file arguments are kept as given, even when their extension is
/// not recognized.
pub fn collect_inputs(paths: &[PathBuf], format: InputFormat) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk directory {}", path.display()))?;
            if entry.file_type().is_file() && format.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    debug!("Collected {} input files", files.len());
    Ok(files)
}

/// Render an optional instant, `open` when unset
pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "open".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE_LOG: &str = include_str!("../../../tests/fixtures/abmf00glp_20200101.log");
    const SAMPLE_SINEX: &str = include_str!("../../../tests/fixtures/ign20p21177.snx");

    #[test]
    fn test_collect_inputs_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2020");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("abmf00glp_20200101.log"), "").unwrap();
        std::fs::write(nested.join("ign20p21177.snx"), "").unwrap();
        std::fs::write(nested.join("notes.txt"), "").unwrap();
        let explicit = dir.path().join("notes.txt");

        let files = collect_inputs(&[dir.path().to_path_buf(), explicit.clone()], InputFormat::Auto)
            .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().any(|f| f.ends_with("2020/ign20p21177.snx")));
        assert_eq!(files.last(), Some(&explicit));

        let logs = collect_inputs(&[dir.path().to_path_buf()], InputFormat::Sitelog).unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn test_load_file_dispatches_on_format() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("abmf00glp_20200101.log");
        std::fs::write(&log, SAMPLE_LOG).unwrap();
        let snx = dir.path().join("ign20p21177.snx");
        std::fs::write(&snx, SAMPLE_SINEX).unwrap();
        let config = Config::default();

        let loaded = load_file(&log, InputFormat::Auto, &config).unwrap();
        assert_eq!(loaded.format, InputFormat::Sitelog);
        assert_eq!(loaded.sites.len(), 1);

        let loaded = load_file(&snx, InputFormat::Auto, &config).unwrap();
        assert_eq!(loaded.format, InputFormat::Sinex);
        assert_eq!(loaded.sites.len(), 2);

        assert!(load_file(&log, InputFormat::Sinex, &config).is_err());
    }

    #[test]
    fn test_format_time() {
        let time = Utc.with_ymd_and_hms(2019, 4, 10, 12, 0, 0).unwrap();
        assert_eq!(format_time(Some(time)), "2019-04-10 12:00:00");
        assert_eq!(format_time(None), "open");
    }
}
