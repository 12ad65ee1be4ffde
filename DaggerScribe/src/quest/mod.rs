//! Quest catalog
//!
//! Lists the `*.QBN` files of a game data folder, decodes them in parallel
//! and pairs each with its `.QRC` text database on demand. Once a quest's
//! text is loaded a display name is derived for it.

pub mod filename;
pub mod title;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

pub use filename::QuestFilename;
pub use title::{DisplayName, derive_display_name};

use crate::catalog::VarHashCatalog;
use crate::error::{Error, Result};
use crate::formats::common::{find_child, find_sibling_with_extension};
use crate::formats::qbn::{QuestBytecodeFile, read_qbn};
use crate::formats::text::{ARENA2_DIR_NAME, TextDatabase};

/// Progress of a catalog load, reported once per decoded quest.
#[derive(Debug, Clone)]
pub struct LoadProgress<'a> {
    pub current: usize,
    pub total: usize,
    pub name: &'a str,
}

/// One quest: its files, filename metadata and decoded contents.
#[derive(Debug, Serialize)]
pub struct QuestEntry {
    /// Upper-cased file stem, e.g. `A0B00Y00`.
    pub base_name: String,
    pub qbn_path: PathBuf,
    pub qrc_path: PathBuf,
    pub filename: QuestFilename,
    /// `None` when the QBN failed to decode; see `qbn_error`.
    #[serde(skip)]
    pub qbn: Option<QuestBytecodeFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qbn_error: Option<String>,
    #[serde(skip)]
    pub text: Option<TextDatabase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<DisplayName>,
}

impl QuestEntry {
    fn load(qbn_path: PathBuf, hashes: Option<&VarHashCatalog>) -> Self {
        let base_name = upper_stem(&qbn_path);
        let qrc_path = paired_text_path(&qbn_path);
        let (qbn, qbn_error) = match read_qbn(&qbn_path, hashes) {
            Ok(qbn) => (Some(qbn), None),
            Err(e) => {
                tracing::warn!("Failed to decode {}: {e}", qbn_path.display());
                (None, Some(e.to_string()))
            }
        };
        Self {
            filename: QuestFilename::parse(&base_name),
            base_name,
            qbn_path,
            qrc_path,
            qbn,
            qbn_error,
            text: None,
            display_name: None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        self.qbn.is_some()
    }

    /// Title if derived, else the base name.
    pub fn title(&self) -> &str {
        self.display_name
            .as_ref()
            .map_or(self.base_name.as_str(), |d| d.title.as_str())
    }
}

/// All quests found in one data folder.
#[derive(Debug, Default)]
pub struct QuestCatalog {
    /// Folder that was scanned (the `ARENA2` subfolder when present).
    pub root: PathBuf,
    pub quests: Vec<QuestEntry>,
}

impl QuestCatalog {
    /// Scan `folder` for quests and decode them
    ///
    /// # Errors
    /// Returns [`Error::NoQuestFiles`] if the folder holds no `.QBN` file.
    pub fn load<P: AsRef<Path>>(folder: P, hashes: Option<&VarHashCatalog>) -> Result<Self> {
        Self::load_with_progress(folder, hashes, |_| {})
    }

    /// Like [`QuestCatalog::load`], reporting progress per decoded quest.
    ///
    /// # Errors
    /// Returns [`Error::NoQuestFiles`] if the folder holds no `.QBN` file.
    pub fn load_with_progress<P, F>(folder: P, hashes: Option<&VarHashCatalog>, progress: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&LoadProgress<'_>) + Send + Sync,
    {
        let root = data_root(folder.as_ref());
        let paths = find_quest_files(&root);
        if paths.is_empty() {
            return Err(Error::NoQuestFiles { path: root });
        }

        let total = paths.len();
        let processed = AtomicUsize::new(0);
        let quests: Vec<QuestEntry> = paths
            .into_par_iter()
            .map(|path| {
                let entry = QuestEntry::load(path, hashes);
                let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(&LoadProgress {
                    current,
                    total,
                    name: &entry.base_name,
                });
                entry
            })
            .collect();

        let failed = quests.iter().filter(|q| !q.is_decoded()).count();
        tracing::info!(
            "Loaded {} quests from {} ({failed} failed to decode)",
            quests.len(),
            root.display()
        );
        Ok(Self { root, quests })
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestEntry> {
        self.quests.get(index)
    }

    /// Position of a quest by base name (case-insensitive).
    pub fn position(&self, base_name: &str) -> Option<usize> {
        self.quests
            .iter()
            .position(|q| q.base_name.eq_ignore_ascii_case(base_name))
    }

    /// Load the quest's `.QRC` text database if needed and derive its
    /// display name.
    ///
    /// # Errors
    /// Returns an error if the index is out of range, the `.QRC` file is
    /// missing, or it fails to parse.
    pub fn ensure_text_loaded(&mut self, index: usize) -> Result<&QuestEntry> {
        let len = self.quests.len();
        let quest = self
            .quests
            .get_mut(index)
            .ok_or(Error::QuestIndexOutOfRange { index, len })?;

        if quest.text.is_none() {
            if !quest.qrc_path.is_file() {
                return Err(Error::MissingQuestText {
                    path: quest.qrc_path.clone(),
                });
            }
            let text = TextDatabase::read(&quest.qrc_path)?;
            quest.display_name = derive_display_name(quest.qbn.as_ref(), &text);
            tracing::debug!(
                "{}: {} text records, title {:?}",
                quest.base_name,
                text.len(),
                quest.display_name.as_ref().map(|d| &d.title)
            );
            quest.text = Some(text);
        }
        Ok(quest)
    }
}

/// `folder/ARENA2` (any case) if it exists, else `folder`.
fn data_root(folder: &Path) -> PathBuf {
    find_child(folder, ARENA2_DIR_NAME)
        .filter(|p| p.is_dir())
        .unwrap_or_else(|| folder.to_path_buf())
}

/// `*.QBN` files directly inside `root`, sorted by upper-cased stem.
pub fn find_quest_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("qbn"))
        })
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort_by_cached_key(|p| upper_stem(p));
    files
}

fn upper_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_uppercase()
}

/// The `.QRC` next to a `.QBN`, matching stem and extension ignoring case.
///
/// When none exists this is the upper-case path the file would have.
pub(crate) fn paired_text_path(qbn_path: &Path) -> PathBuf {
    find_sibling_with_extension(qbn_path, "QRC").unwrap_or_else(|| qbn_path.with_extension("QRC"))
}
