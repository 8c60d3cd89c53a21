//! Provider tags.
//!
//! A [`Provider`] names one game-client distribution. Each tag maps to a stable
//! key (used by the hash store and the CLI), to the local launch endpoint path,
//! and to the query parameter that carries its installed identifier.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which game an official client belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    /// RuneScape 3.
    Rs3,
    /// Old School RuneScape.
    Osrs,
}

impl Game {
    /// Short slug used in launch paths (`rs3`, `osrs`).
    pub fn slug(self) -> &'static str {
        match self {
            Self::Rs3 => "rs3",
            Self::Osrs => "osrs",
        }
    }
}

/// Desktop platform an official client is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows `.exe` builds.
    Windows,
    /// macOS `.app` bundles.
    Mac,
}

impl Platform {
    /// Suffix used in Direct6 metadata paths (`win`, `mac`).
    pub fn meta_suffix(self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::Mac => "mac",
        }
    }

    /// Packaging kind used in launch paths (`exe`, `app`).
    pub fn package_kind(self) -> &'static str {
        match self {
            Self::Windows => "exe",
            Self::Mac => "app",
        }
    }

    /// Returns `true` if `name` (a path from a metafile file list) is the main
    /// executable for this platform.
    pub fn is_target_executable(self, name: &str) -> bool {
        match self {
            Self::Windows => name.ends_with(".exe"),
            Self::Mac => name.contains(".app/Contents/MacOS/"),
        }
    }
}

/// One supported game-client distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// The official RS3 client packaged as a Debian archive.
    Rs3Deb,
    /// The RuneLite launcher jar, published as a GitHub release asset.
    RuneLite,
    /// The HDOS launcher jar, published on the HDOS CDN.
    Hdos,
    /// An official client distributed over Direct6.
    Official {
        /// Game the client is for.
        game: Game,
        /// Platform the client is built for.
        platform: Platform,
    },
}

impl Provider {
    /// Every provider, in display order.
    pub const ALL: [Self; 7] = [
        Self::Rs3Deb,
        Self::RuneLite,
        Self::Hdos,
        Self::Official {
            game: Game::Rs3,
            platform: Platform::Windows,
        },
        Self::Official {
            game: Game::Rs3,
            platform: Platform::Mac,
        },
        Self::Official {
            game: Game::Osrs,
            platform: Platform::Windows,
        },
        Self::Official {
            game: Game::Osrs,
            platform: Platform::Mac,
        },
    ];

    /// Stable key identifying this provider in the hash store and on the
    /// command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Rs3Deb => "rs3-deb",
            Self::RuneLite => "runelite",
            Self::Hdos => "hdos",
            Self::Official {
                game: Game::Rs3,
                platform: Platform::Windows,
            } => "rs3-exe",
            Self::Official {
                game: Game::Rs3,
                platform: Platform::Mac,
            } => "rs3-app",
            Self::Official {
                game: Game::Osrs,
                platform: Platform::Windows,
            } => "osrs-exe",
            Self::Official {
                game: Game::Osrs,
                platform: Platform::Mac,
            } => "osrs-app",
        }
    }

    /// Local launch endpoint path for this provider.
    ///
    /// `configure` only affects RuneLite, which has a separate endpoint that
    /// starts the launcher in its configuration mode.
    pub fn launch_path(self, configure: bool) -> String {
        match self {
            Self::Rs3Deb => "/launch-rs3-deb".to_string(),
            Self::RuneLite if configure => "/launch-runelite-jar-configure".to_string(),
            Self::RuneLite => "/launch-runelite-jar".to_string(),
            Self::Hdos => "/launch-hdos-jar".to_string(),
            Self::Official { game, platform } => {
                format!("/launch-{}-{}", game.slug(), platform.package_kind())
            }
        }
    }

    /// Query parameter that carries the installed identifier to the launch
    /// endpoint.
    pub fn id_param(self) -> &'static str {
        match self {
            Self::Rs3Deb | Self::Official { .. } => "hash",
            Self::RuneLite => "id",
            Self::Hdos => "version",
        }
    }

    /// Human readable name used in progress messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Rs3Deb => "RS3 client",
            Self::RuneLite => "RuneLite",
            Self::Hdos => "HDOS",
            Self::Official {
                game: Game::Rs3, ..
            } => "RS3 client",
            Self::Official {
                game: Game::Osrs, ..
            } => "OSRS client",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string does not name a known provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown provider '{0}' (expected one of: rs3-deb, runelite, hdos, rs3-exe, rs3-app, osrs-exe, osrs-app)")]
pub struct ParseProviderError(pub String);

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == wanted)
            .ok_or_else(|| ParseProviderError(s.to_string()))
    }
}
