use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chatroom_conversation::TextPolicy;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use gpui::*;
use gpui_component::{Theme, ThemeMode, ThemeRegistry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ResultExt, Snafu, ensure};

pub const DEFAULT_TITLE: &str = "Chat Room";
pub const DEFAULT_PLACEHOLDER: &str = "Type a message...";
pub const DEFAULT_SEND_LABEL: &str = "Send";
pub const DEFAULT_WINDOW_WIDTH: f32 = 420.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 720.0;
pub const SETTINGS_DIRECTORY_NAME: &str = "chatroom";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
/// Environment variables with this prefix override the settings file.
pub const SETTINGS_ENV_PREFIX: &str = "CHATROOM_";

/// Appearance and composer settings for the chat window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_send_label")]
    pub send_label: String,
    #[serde(default)]
    pub text_policy: TextPolicy,
    #[serde(
        default = "default_theme_mode",
        serialize_with = "serialize_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
    #[serde(default)]
    pub theme_name: String,
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            placeholder: default_placeholder(),
            send_label: default_send_label(),
            text_policy: TextPolicy::default(),
            theme_mode: default_theme_mode(),
            theme_name: String::new(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl ChatSettings {
    /// Trims labels and restores defaults for the blank ones.
    pub fn normalized(mut self) -> Self {
        self.title = non_blank_or(self.title, default_title);
        self.placeholder = non_blank_or(self.placeholder, default_placeholder);
        self.send_label = non_blank_or(self.send_label, default_send_label);
        self.theme_name = self.theme_name.trim().to_string();
        self
    }

    fn validated(self) -> Result<Self, SettingsError> {
        ensure!(
            self.window_width.is_finite() && self.window_width > 0.0,
            InvalidValueSnafu {
                stage: "validate-settings",
                field: "window_width",
                details: format!("expected a positive width, got {}", self.window_width),
            }
        );
        ensure!(
            self.window_height.is_finite() && self.window_height > 0.0,
            InvalidValueSnafu {
                stage: "validate-settings",
                field: "window_height",
                details: format!("expected a positive height, got {}", self.window_height),
            }
        );
        Ok(self)
    }

    pub fn window_size(&self) -> Size<Pixels> {
        size(px(self.window_width), px(self.window_height))
    }

    pub fn apply_theme(&self, window: Option<&mut Window>, cx: &mut App) {
        if let Some(theme_config) = ThemeRegistry::global(cx)
            .themes()
            .get(&SharedString::from(self.theme_name.clone()))
            .cloned()
        {
            let mode = theme_config.mode;
            let theme = Theme::global_mut(cx);
            if mode.is_dark() {
                theme.dark_theme = theme_config;
            } else {
                theme.light_theme = theme_config;
            }
            Theme::change(mode, window, cx);
            return;
        }

        Theme::change(self.theme_mode, window, cx);
    }
}

/// Layered settings: built-in defaults, then the JSON file, then the environment.
pub struct SettingsStore {
    settings: ArcSwap<ChatSettings>,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".chatroom"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_or_default(&config_path);
        Self {
            settings: ArcSwap::from_pointee(settings),
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> Arc<ChatSettings> {
        self.settings.load_full()
    }

    /// Re-reads every layer and swaps the result in.
    pub fn reload(&self) -> Arc<ChatSettings> {
        let settings = Arc::new(Self::load_or_default(&self.config_path));
        self.settings.store(settings.clone());
        settings
    }

    pub fn try_load(path: &Path) -> Result<ChatSettings, SettingsError> {
        let mut figment = Figment::from(Serialized::defaults(ChatSettings::default()));
        if path.exists() {
            figment = figment.merge(Json::file(path));
        } else {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }
        figment = figment.merge(Env::prefixed(SETTINGS_ENV_PREFIX));

        let settings = figment
            .extract::<ChatSettings>()
            .context(ExtractSnafu {
                stage: "extract-settings",
                path: path.to_path_buf(),
            })?;

        settings.normalized().validated()
    }

    fn load_or_default(path: &Path) -> ChatSettings {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!("{error}. using default settings");
                ChatSettings::default()
            }
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to read settings from {path:?} on `{stage}`: {source}"))]
    Extract {
        stage: &'static str,
        path: PathBuf,
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },
    #[snafu(display("invalid settings value for `{field}` on `{stage}`: {details}"))]
    InvalidValue {
        stage: &'static str,
        field: &'static str,
        details: String,
    },
}

fn non_blank_or(value: String, fallback: fn() -> String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        trimmed.to_string()
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_send_label() -> String {
    DEFAULT_SEND_LABEL.to_string()
}

fn default_window_width() -> f32 {
    DEFAULT_WINDOW_WIDTH
}

fn default_window_height() -> f32 {
    DEFAULT_WINDOW_HEIGHT
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::Light
}

fn serialize_theme_mode<S>(value: &ThemeMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.name())
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> Result<ThemeMode, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_theme_mode(&value))
}

fn parse_theme_mode(value: &str) -> ThemeMode {
    if value.trim().eq_ignore_ascii_case("dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}
