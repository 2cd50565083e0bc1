// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Hot reload for settings files.
//!
//! Playable note ranges depend on the ledger settings, so a front end that
//! keeps a [`SettingsWatcher`] around can rebuild them as soon as the file
//! on disk changes. Bursts of writes from an editor are collapsed into one
//! reload once the file has been quiet for the debounce period.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::event::EventKind;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::Settings;

const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that happened to a watched settings file
#[derive(Debug, Clone)]
pub enum SettingsEvent {
    /// The file changed and parsed cleanly
    Reloaded(Box<Settings>),
    /// The file changed but could not be loaded; the old settings still apply
    Error(String),
    FileCreated(PathBuf),
    FileDeleted(PathBuf),
}

/// Edits seen but not yet reloaded
struct PendingReloads {
    paths: BTreeSet<PathBuf>,
    last_change: Option<Instant>,
    quiet: Duration,
}

impl PendingReloads {
    fn new(quiet: Duration) -> Self {
        Self {
            paths: BTreeSet::new(),
            last_change: None,
            quiet,
        }
    }

    fn touch(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.paths.extend(paths);
        self.last_change = Some(Instant::now());
    }

    /// Paths whose edits have settled, or nothing if writes are still arriving
    fn take_settled(&mut self) -> Vec<PathBuf> {
        match self.last_change {
            Some(at) if at.elapsed() >= self.quiet => {
                self.last_change = None;
                std::mem::take(&mut self.paths).into_iter().collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Whether a changed path is worth reloading
fn is_settings_file(path: &Path, target: &Path) -> bool {
    path == target
        || matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml" | "toml")
        )
}

fn reload(path: &Path) -> SettingsEvent {
    match Settings::load(path) {
        Ok(settings) => {
            debug!("Reloaded settings from {:?}", path);
            SettingsEvent::Reloaded(Box::new(settings))
        }
        Err(e) => {
            warn!("Keeping previous settings, {:?} failed to load: {:#}", path, e);
            SettingsEvent::Error(format!("{:?}: {:#}", path, e))
        }
    }
}

fn run_debounce_loop(
    target: PathBuf,
    raw: Receiver<notify::Event>,
    out: Sender<SettingsEvent>,
    quiet: Duration,
) {
    let mut pending = PendingReloads::new(quiet);

    loop {
        match raw.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                let paths = event.paths.into_iter();
                let sent = match event.kind {
                    EventKind::Create(_) => paths
                        .map(|p| out.send(SettingsEvent::FileCreated(p)))
                        .all(|r| r.is_ok()),
                    EventKind::Remove(_) => paths
                        .map(|p| out.send(SettingsEvent::FileDeleted(p)))
                        .all(|r| r.is_ok()),
                    EventKind::Modify(_) => {
                        pending.touch(paths.filter(|p| is_settings_file(p, &target)));
                        true
                    }
                    _ => true,
                };
                if !sent {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                for path in pending.take_settled() {
                    if out.send(reload(&path)).is_err() {
                        return;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("Stopped watching {:?}", target);
}

/// Watches a settings file, or a directory of them, on a background thread
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<SettingsEvent>,
    path: PathBuf,
}

impl SettingsWatcher {
    /// Start watching `path`
    ///
    /// `quiet` is how long the file must go unmodified before it is reloaded;
    /// `None` uses half a second.
    pub fn new<P: AsRef<Path>>(path: P, quiet: Option<Duration>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (raw_tx, raw_rx) = mpsc::channel();
        let (out_tx, out_rx) = mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    let _ = raw_tx.send(event);
                }
                Err(e) => warn!("File watch error: {}", e),
            }
        })
        .context("Failed to create file watcher")?;

        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&path, mode)
            .with_context(|| format!("Failed to watch {:?}", path))?;

        let target = path.clone();
        let quiet = quiet.unwrap_or(DEFAULT_QUIET_PERIOD);
        thread::spawn(move || run_debounce_loop(target, raw_rx, out_tx, quiet));

        Ok(Self {
            _watcher: watcher,
            events: out_rx,
            path,
        })
    }

    /// Next event if one is waiting
    pub fn try_recv(&self) -> Option<SettingsEvent> {
        self.events.try_recv().ok()
    }

    /// Drain every waiting event
    pub fn recv_all(&self) -> Vec<SettingsEvent> {
        self.events.try_iter().collect()
    }

    /// Wait for the next event; `None` once the watcher thread has stopped
    pub fn recv(&self) -> Option<SettingsEvent> {
        self.events.recv().ok()
    }

    pub fn watched_path(&self) -> &Path {
        &self.path
    }
}

/// Check that a settings file loads, without applying it anywhere
pub fn validate_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    Settings::load(path)
}
