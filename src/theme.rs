use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub type Color = [f32; 4];

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to access theme file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("theme file {} is not valid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text_main: Color,
    pub text_secondary: Color,
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub highlight: Color,
}

const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

const DARK: Palette = Palette {
    background: rgb(0x12141a),
    text_main: rgb(0xe6e6e6),
    text_secondary: rgb(0x9aa0ac),
    accent_primary: rgb(0x6ea8fe),
    accent_secondary: rgb(0xc58af9),
    highlight: rgb(0xffd166),
};

const LIGHT: Palette = Palette {
    background: rgb(0xfafafa),
    text_main: rgb(0x1d1f24),
    text_secondary: rgb(0x5c6370),
    accent_primary: rgb(0x1f6feb),
    accent_secondary: rgb(0x8250df),
    highlight: rgb(0xd97706),
};

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }
}

impl Palette {
    /// Generation colors for rockets, indexed by `generation % len`.
    pub fn rocket_colors(&self) -> [Color; 5] {
        [
            self.accent_primary,
            self.accent_secondary,
            self.text_main,
            self.text_secondary,
            self.highlight,
        ]
    }

    pub fn moon(&self) -> Color {
        self.text_secondary
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTheme {
    theme: Theme,
}

/// The one flag that outlives a run.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ThemeStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Theme>, ThemeError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ThemeError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let stored: StoredTheme =
            serde_json::from_str(&raw).map_err(|source| ThemeError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(stored.theme))
    }

    /// Like [`ThemeStore::load`], but anything unreadable means the dark default.
    pub fn load_or_default(&self) -> Theme {
        match self.load() {
            Ok(theme) => theme.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "ignoring stored theme");
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<(), ThemeError> {
        let body = serde_json::to_string(&StoredTheme { theme }).map_err(|source| {
            ThemeError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, body).map_err(|source| ThemeError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
