// SPDX-License-Identifier: MPL-2.0
//! Application root state shared by every screen.
//!
//! [`AppContext`] replaces ambient process state: it owns the loaded
//! preferences, the save-folder store, localization and the notice queue,
//! and is handed to each front-end operation explicitly. Persistence goes
//! through injected stores that are read at startup and written on explicit
//! save actions only.

pub mod paths;
pub mod persisted_state;

use crate::auth::UserProfile;
use crate::config::{self, Config, SortOrder};
use crate::converter::{self, Conversion, LengthUnit};
use crate::gallery::{DeleteOutcome, FolderHandle, FolderStore, ImageItem};
use crate::i18n::I18n;
use crate::notice::{Notice, NoticeQueue};
use crate::theme::{self, ActiveTheme, ConfigThemeStore, ThemeMode};
use std::fmt;
use std::path::{Path, PathBuf};

/// Startup options, usually parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional data directory override (for `state.cbor`).
    /// Takes precedence over `POCKET_SUITE_DATA_DIR`.
    pub data_dir: Option<String>,
    /// Optional config directory override (for `settings.toml`).
    /// Takes precedence over `POCKET_SUITE_CONFIG_DIR`.
    pub config_dir: Option<String>,
}

pub struct AppContext {
    pub config: Config,
    pub i18n: I18n,
    pub notices: NoticeQueue,
    folders: FolderStore,
    theme_store: ConfigThemeStore,
    theme_mode: ThemeMode,
    data_dir: Option<PathBuf>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("locale", self.i18n.current_locale())
            .field("save_folder", &self.folders.folder())
            .field("theme_mode", &self.theme_mode)
            .field("pending_notices", &self.notices.len())
            .finish()
    }
}

impl AppContext {
    /// Builds the context from command line flags.
    ///
    /// Directory flags are registered globally, so this is meant to be
    /// called once per process.
    pub fn new(flags: Flags) -> Self {
        paths::init_cli_overrides(flags.data_dir, flags.config_dir);
        Self::build(flags.lang, None, None)
    }

    /// Builds a context rooted at explicit directories.
    pub fn with_dirs(lang: Option<String>, config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self::build(lang, Some(config_dir), Some(data_dir))
    }

    fn build(lang: Option<String>, config_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        let mut notices = NoticeQueue::new();

        let (config, config_warning) = config::load_with_override(config_dir.clone());
        if let Some(key) = config_warning {
            notices.push(Notice::warning(key));
        }

        let i18n = I18n::new(lang, &config);

        let (folders, state_warning) = FolderStore::load(data_dir.clone());
        if let Some(key) = state_warning {
            notices.push(Notice::warning(key));
        }
        let folders = folders.with_copy_buffer(config.copy_buffer_bytes());

        let theme_store = config_dir
            .map_or_else(ConfigThemeStore::new, ConfigThemeStore::with_config_dir);
        let theme_mode = theme::apply_saved(&theme_store, &ActiveTheme);

        Self {
            config,
            i18n,
            notices,
            folders,
            theme_store,
            theme_mode,
            data_dir,
        }
    }

    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode
    }

    pub fn sort_order(&self) -> SortOrder {
        self.config.sort_order()
    }

    /// Converts raw input; failures become notices.
    pub fn convert(&mut self, input: &str, from: LengthUnit, to: LengthUnit) -> Option<Conversion> {
        match converter::convert_input(input, from, to) {
            Ok(conversion) => Some(conversion),
            Err(err) => {
                self.notices.push(Notice::from_error(&err));
                None
            }
        }
    }

    /// Saves the theme flag, then applies it.
    pub fn save_theme(&mut self, dark: bool) -> ThemeMode {
        let mode = ThemeMode::from_dark_flag(dark);
        match theme::save_and_apply(&mut self.theme_store, &ActiveTheme, dark) {
            Ok(_) => {
                let label = self.i18n.tr(mode.i18n_key());
                self.notices
                    .push(Notice::success("theme-saved").with_arg("mode", label));
            }
            Err(err) => self.notices.push(Notice::from_error(&err)),
        }
        self.config.general.dark_mode = dark;
        self.theme_mode = mode;
        mode
    }

    /// Records a new save folder; returns whether it was accepted.
    pub fn set_folder(&mut self, path: impl Into<PathBuf>) -> bool {
        match self.folders.set_folder(FolderHandle::new(path)) {
            Ok(warning) => {
                if let Some(key) = warning {
                    self.notices.push(Notice::warning(key));
                }
                let name = self
                    .folders
                    .folder()
                    .map(FolderHandle::display_name)
                    .unwrap_or_default();
                self.notices
                    .push(Notice::success("folder-saved").with_arg("folder", name));
                true
            }
            Err(err) => {
                self.notices.push(Notice::from_error(&err));
                false
            }
        }
    }

    pub fn location_label(&self) -> String {
        location_label(&self.i18n, self.folders.folder())
    }

    /// Directory where new captures are written before being saved.
    pub fn capture_staging_dir(&self) -> Option<PathBuf> {
        paths::capture_staging_dir_with_override(self.data_dir.clone())
    }

    /// Moves a capture into the save folder.
    pub fn save_capture(&mut self, source: &Path) -> Option<ImageItem> {
        match self.folders.save_captured_file(source) {
            Ok(item) => {
                self.notices
                    .push(Notice::success("capture-saved").with_arg("name", item.name()));
                Some(item)
            }
            Err(err) => {
                self.notices.push(Notice::from_error(&err));
                None
            }
        }
    }

    /// Deletes an image, reporting the outcome as a notice.
    pub fn delete_image(&mut self, image: &Path) -> DeleteOutcome {
        let outcome = match self.folders.remove_image(image) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.notices.push(Notice::from_error(&err));
                return DeleteOutcome::Failed(err.to_string());
            }
        };
        self.notices.push(outcome.to_notice());
        outcome
    }

    /// Drains pending notices as localized text, oldest first.
    pub fn take_notice_texts(&mut self) -> Vec<String> {
        self.notices
            .drain()
            .iter()
            .map(|notice| self.i18n.render(notice))
            .collect()
    }
}

/// `Location: <folder>` or `Location: Not set`.
pub fn location_label(i18n: &I18n, folder: Option<&FolderHandle>) -> String {
    match folder {
        Some(folder) => i18n.tr_with_args("location-label", &[("folder", folder.display_name().as_str())]),
        None => i18n.tr("location-not-set"),
    }
}

/// Greeting and email lines of the home screen.
pub fn welcome_lines(i18n: &I18n, user: &UserProfile) -> (String, String) {
    let greeting = match user.display_name() {
        Some(name) => i18n.tr_with_args("home-welcome", &[("name", name)]),
        None => i18n.tr("home-welcome-anonymous"),
    };
    let email = match user.email() {
        Some(email) => email.to_string(),
        None => i18n.tr("home-no-email"),
    };
    (greeting, email)
}
