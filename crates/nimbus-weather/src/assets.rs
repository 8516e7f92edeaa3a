//! Condition-to-asset mapping.
//!
//! Current conditions are free text ("Clouds", "light rain"), so the mapping
//! is a keyword search over a fixed, ordered rule table.

use std::path::{Path, PathBuf};

/// Visual theme for a weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Cloudy,
    Rainy,
    Snowy,
    Sunny,
}

impl AssetKind {
    /// File stem shared by the icon and the background
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Sunny => "sunny",
        }
    }

    pub fn icon_file(&self) -> String {
        format!("{}.gif", self.file_stem())
    }

    pub fn background_file(&self) -> String {
        format!("{}.png", self.file_stem())
    }
}

/// Keyword rule; the first rule with a matching keyword wins
#[derive(Debug)]
pub struct AssetRule {
    pub keywords: &'static [&'static str],
    pub kind: AssetKind,
}

pub static ASSET_RULES: &[AssetRule] = &[
    AssetRule {
        keywords: &["cloud"],
        kind: AssetKind::Cloudy,
    },
    AssetRule {
        keywords: &["rain"],
        kind: AssetKind::Rainy,
    },
    AssetRule {
        keywords: &["snow"],
        kind: AssetKind::Snowy,
    },
    AssetRule {
        keywords: &["sun", "clear"],
        kind: AssetKind::Sunny,
    },
];

/// Used when no rule matches
pub const FALLBACK_KIND: AssetKind = AssetKind::Sunny;

/// Pick the asset kind for a condition string, case-insensitively.
pub fn kind_for(condition: &str) -> AssetKind {
    let condition = condition.to_lowercase();
    ASSET_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| condition.contains(k)))
        .map(|rule| rule.kind)
        .unwrap_or(FALLBACK_KIND)
}

/// Resolved file paths for one condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionAssets {
    pub kind: AssetKind,
    pub icon: PathBuf,
    pub background: PathBuf,
}

/// Asset locations on disk
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    icons_dir: PathBuf,
    backgrounds_dir: PathBuf,
    default_background: PathBuf,
}

impl AssetCatalog {
    pub fn new(
        icons_dir: impl Into<PathBuf>,
        backgrounds_dir: impl Into<PathBuf>,
        default_background: impl Into<PathBuf>,
    ) -> Self {
        Self {
            icons_dir: icons_dir.into(),
            backgrounds_dir: backgrounds_dir.into(),
            default_background: default_background.into(),
        }
    }

    /// Icon and background for `condition`.
    ///
    /// Icons are returned as-is. A background that does not exist on disk is
    /// replaced by the default background.
    pub fn select(&self, condition: &str) -> ConditionAssets {
        let kind = kind_for(condition);
        let icon = self.icons_dir.join(kind.icon_file());
        let candidate = self.backgrounds_dir.join(kind.background_file());

        let background = if candidate.exists() {
            candidate
        } else {
            tracing::debug!(
                "Background {} not found, using {}",
                candidate.display(),
                self.default_background.display()
            );
            self.default_background.clone()
        };

        ConditionAssets {
            kind,
            icon,
            background,
        }
    }

    /// Icon shown before the first successful refresh
    pub fn default_icon(&self) -> PathBuf {
        self.icons_dir.join(FALLBACK_KIND.icon_file())
    }

    pub fn default_background(&self) -> &Path {
        &self.default_background
    }
}
