use crate::domain::ScanConfig;
use crate::ports::EnumeratorPort;
use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use log::debug;
use std::path::PathBuf;

/// Lazy directory walker over the configured roots. Unreadable entries are
/// skipped so one inaccessible directory never aborts the walk.
pub struct WalkEnumerator;

impl WalkEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WalkEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EnumeratorPort for WalkEnumerator {
    fn enumerate(&self, config: &ScanConfig) -> Result<Box<dyn Iterator<Item = PathBuf>>> {
        let mut roots = config.paths.iter();
        let first = roots.next().context("no scan paths configured")?;
        for root in config.paths.iter() {
            if !root.exists() {
                bail!("scan path does not exist: {}", root.display());
            }
        }

        let mut builder = WalkBuilder::new(first);
        for root in roots {
            builder.add(root);
        }
        // The scan is content-driven: gitignore rules and hidden-file
        // filtering do not apply.
        builder.standard_filters(false);
        builder.follow_links(config.follow_symlinks);
        builder.max_depth(if config.recursive {
            config.max_depth
        } else {
            Some(1)
        });
        // Deterministic discovery order; the first file seen with a given
        // content becomes its group's first location.
        builder.sort_by_file_name(|a, b| a.cmp(b));

        if let Some(pattern) = &config.filter {
            let mut overrides = OverrideBuilder::new(first);
            overrides
                .add(pattern)
                .with_context(|| format!("invalid filter pattern: {pattern}"))?;
            builder.overrides(overrides.build()?);
        }

        let min_size = config.min_size;
        let entries = builder.build().filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry: {err}");
                    return None;
                }
            };
            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                return None;
            }
            if min_size > 0 && entry.metadata().ok()?.len() < min_size {
                return None;
            }
            Some(entry.into_path())
        });

        Ok(Box::new(entries))
    }
}
