//! Persistent product settings kept by the external configuration command.
//!
//! The settings map is rebuilt from scratch for every install: nothing is
//! carried across lifecycle phases. Writes are minimised by comparing each
//! computed value with what is already stored.
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use rand::Rng as _;

use crate::config::{Answers, Manifest};
use crate::exec::{CommandOpts, Executor, invoke};
use crate::logging::Log;

/// Range of the random stamp written next to a changed opt-in flag.
pub const EPOCH_RANGE: std::ops::RangeInclusive<u64> = 1_000_000_000..=9_999_999_999;

/// Every key this component writes to the settings store.
///
/// Declaration order is the order keys are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    /// `product.buildNumber`
    BuildNumber,
    /// `player.product.version`; used by VIX to locate its provider.
    ProductVersion,
    /// `vix.config.version`
    VixConfigVersion,
    /// `installerDefaults.autoSoftwareUpdateEnabled`
    AutoSoftwareUpdateEnabled,
    /// `installerDefaults.autoSoftwareUpdateEnabled.epoch`
    AutoSoftwareUpdateEpoch,
    /// `installerDefaults.dataCollectionEnabled`
    DataCollectionEnabled,
    /// `installerDefaults.dataCollectionEnabled.epoch`
    DataCollectionEpoch,
    /// `installerDefaults.simplifiedUI`
    SimplifiedUi,
    /// `installerDefaults.supportURL`
    SupportUrl,
    /// `componentDownload.server`
    ComponentDownloadServer,
    /// `installerDefaults.componentDownloadEnabled`
    ComponentDownloadEnabled,
    /// `installerDefaults.transferVersion`
    TransferVersion,
}

impl SettingKey {
    /// Keys that identify the installed product. Removed on uninstall.
    pub const BASE: [Self; 3] = [
        Self::BuildNumber,
        Self::ProductVersion,
        Self::VixConfigVersion,
    ];

    /// Dotted key name as understood by the configuration command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuildNumber => "product.buildNumber",
            Self::ProductVersion => "player.product.version",
            Self::VixConfigVersion => "vix.config.version",
            Self::AutoSoftwareUpdateEnabled => "installerDefaults.autoSoftwareUpdateEnabled",
            Self::AutoSoftwareUpdateEpoch => "installerDefaults.autoSoftwareUpdateEnabled.epoch",
            Self::DataCollectionEnabled => "installerDefaults.dataCollectionEnabled",
            Self::DataCollectionEpoch => "installerDefaults.dataCollectionEnabled.epoch",
            Self::SimplifiedUi => "installerDefaults.simplifiedUI",
            Self::SupportUrl => "installerDefaults.supportURL",
            Self::ComponentDownloadServer => "componentDownload.server",
            Self::ComponentDownloadEnabled => "installerDefaults.componentDownloadEnabled",
            Self::TransferVersion => "installerDefaults.transferVersion",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value to store. Absence is modelled by `None` in [`SettingsMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// Free-form text.
    Text(String),
    /// Integer.
    Int(u64),
}

impl SettingValue {
    /// An empty string means "delete", the same as no value at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Settings computed for one install. Each key appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsMap(BTreeMap<SettingKey, Option<SettingValue>>);

impl SettingsMap {
    /// Record `value` for `key`, replacing any earlier value.
    pub fn insert(&mut self, key: SettingKey, value: Option<SettingValue>) {
        self.0.insert(key, value);
    }

    /// Value computed for `key`, if the key is present.
    #[must_use]
    pub fn get(&self, key: SettingKey) -> Option<&Option<SettingValue>> {
        self.0.get(&key)
    }

    /// Whether `key` is part of the map.
    #[must_use]
    pub fn contains(&self, key: SettingKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Entries in write order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, Option<&SettingValue>)> {
        self.0.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Get/set/delete access to the settings store.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait SettingsBackend {
    /// Stored value for `key`, trimmed. `None` when unset or unreadable.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`. Returns whether the command succeeded.
    fn set(&self, key: &str, value: &str) -> bool;
    /// Remove `key`. Returns whether the command succeeded.
    fn delete(&self, key: &str) -> bool;
}

/// Settings store backed by the product's configuration tool, driven with
/// `-g`, `-s` and `-d`.
pub struct ConfigStore<'a> {
    tool: PathBuf,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
}

impl fmt::Debug for ConfigStore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("tool", &self.tool)
            .field("executor", &self.executor)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl<'a> ConfigStore<'a> {
    /// Create a store backed by the configuration command at `tool`.
    #[must_use]
    pub const fn new(tool: PathBuf, executor: &'a dyn Executor, log: &'a dyn Log) -> Self {
        Self {
            tool,
            executor,
            log,
        }
    }

    fn tool(&self) -> String {
        self.tool.display().to_string()
    }
}

impl SettingsBackend for ConfigStore<'_> {
    fn get(&self, key: &str) -> Option<String> {
        let result = invoke(
            self.executor,
            self.log,
            &self.tool(),
            &["-g", key],
            CommandOpts::TOLERANT,
        )?;
        let value = result.stdout.trim();
        (result.success && !value.is_empty()).then(|| value.to_string())
    }

    fn set(&self, key: &str, value: &str) -> bool {
        invoke(
            self.executor,
            self.log,
            &self.tool(),
            &["-s", key, value],
            CommandOpts::LOGGED,
        )
        .is_some_and(|r| r.success)
    }

    fn delete(&self, key: &str) -> bool {
        invoke(
            self.executor,
            self.log,
            &self.tool(),
            &["-d", key],
            CommandOpts::LOGGED,
        )
        .is_some_and(|r| r.success)
    }
}

/// Draw a fresh epoch stamp.
#[must_use]
pub fn random_epoch() -> u64 {
    rand::thread_rng().gen_range(EPOCH_RANGE)
}

/// Compute the settings map for an install of `new_version`.
///
/// Each opt-in flag (and a fresh epoch stamp next to it) is only included
/// when the stored value is missing or differs from the recorded answer.
pub(crate) fn build_settings(
    answers: &Answers,
    manifest: &Manifest,
    new_version: Option<&str>,
    store: &dyn SettingsBackend,
    epoch: &mut dyn FnMut() -> u64,
) -> SettingsMap {
    let text = |s: &str| Some(SettingValue::from(s));
    let mut map = SettingsMap::default();

    map.insert(SettingKey::ProductVersion, new_version.and_then(text));
    map.insert(SettingKey::VixConfigVersion, Some(SettingValue::Int(1)));
    map.insert(SettingKey::BuildNumber, text(&manifest.build_number));

    let flags = [
        (
            SettingKey::AutoSoftwareUpdateEnabled,
            SettingKey::AutoSoftwareUpdateEpoch,
            answers.software_update_enabled,
        ),
        (
            SettingKey::DataCollectionEnabled,
            SettingKey::DataCollectionEpoch,
            answers.data_collection_enabled,
        ),
    ];
    for (key, epoch_key, answer) in flags {
        let stored = store.get(key.as_str());
        let wanted = answer.map(|a| a.as_str());
        if stored.is_none() || stored.as_deref() != wanted {
            map.insert(key, wanted.and_then(text));
            map.insert(epoch_key, Some(SettingValue::Int(epoch())));
        }
    }

    map.insert(SettingKey::SimplifiedUi, answers.simplified_ui.as_deref().and_then(text));
    map.insert(SettingKey::SupportUrl, answers.support_url.as_deref().and_then(text));
    map.insert(
        SettingKey::ComponentDownloadServer,
        answers.software_update_url.as_deref().and_then(text),
    );
    map.insert(SettingKey::ComponentDownloadEnabled, text("yes"));
    map.insert(SettingKey::TransferVersion, Some(SettingValue::Int(1)));
    map
}

/// Outcome counters of [`write_settings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Keys written with a new value.
    pub set: usize,
    /// Keys removed because their value was empty.
    pub deleted: usize,
    /// Keys whose stored value already matched.
    pub unchanged: usize,
    /// Commands that reported failure.
    pub failed: usize,
}

impl WriteStats {
    /// One-line summary for the log.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut s = format!(
            "{} set, {} deleted, {} unchanged",
            self.set, self.deleted, self.unchanged
        );
        if self.failed > 0 {
            s.push_str(&format!(", {} failed", self.failed));
        }
        s
    }
}

/// Write `map` to `store` key by key.
///
/// Empty or absent values delete the key. Other values are only set when
/// the stored value differs.
pub(crate) fn write_settings(
    map: &SettingsMap,
    store: &dyn SettingsBackend,
    log: &dyn Log,
) -> WriteStats {
    let mut stats = WriteStats::default();
    for (key, value) in map.iter() {
        match value.filter(|v| !v.is_empty()) {
            None => {
                log.debug(&format!("delete {key}"));
                if store.delete(key.as_str()) {
                    stats.deleted += 1;
                } else {
                    stats.failed += 1;
                }
            }
            Some(value) => {
                let wanted = value.to_string();
                if store.get(key.as_str()).as_deref() == Some(wanted.as_str()) {
                    log.debug(&format!("ok: {key} = {wanted} (already set)"));
                    stats.unchanged += 1;
                } else if store.set(key.as_str(), &wanted) {
                    log.debug(&format!("set {key} = {wanted}"));
                    stats.set += 1;
                } else {
                    stats.failed += 1;
                }
            }
        }
    }
    stats
}

/// Delete the keys that identify the installed product.
///
/// Returns the number of keys whose deletion failed.
pub(crate) fn remove_base_settings(store: &dyn SettingsBackend, log: &dyn Log) -> usize {
    let mut failed = 0;
    for key in SettingKey::BASE {
        log.debug(&format!("delete {key}"));
        if !store.delete(key.as_str()) {
            failed += 1;
        }
    }
    failed
}
