pub mod config;
pub mod context;
pub mod direct6;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod launcher;
pub mod providers;
pub mod store;

pub mod reporter;

pub use config::{ClientOptions, LauncherConfig};
pub use context::Context;
pub use error::{ErrorKind, LaunchError};
pub use launcher::{LaunchReport, Launcher};
pub use providers::{ClientProvider, FetchPlan, Resolution};
pub use reporter::{LogReporter, NullReporter, Reporter};
pub use store::{HashStore, MemoryHashStore};

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("bolt-core/", env!("CARGO_PKG_VERSION"));
