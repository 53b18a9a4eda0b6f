//! Package model, feeds and installation
//!
//! - [`version`] / [`framework`]: the two value types every query is keyed on
//! - [`info`]: references, search results and dependency edges
//! - [`source`] / [`feed`]: repository sources and the directory feeds behind them
//! - [`provider`]: the installation provider the REPL host talks to
//! - [`assemblies`]: installed-package assemblies for a workspace

pub mod assemblies;
pub mod feed;
pub mod framework;
pub mod info;
pub mod provider;
pub mod source;
pub mod version;

pub use assemblies::{ManifestAssemblyResolver, PackageAssemblyResolver};
pub use feed::{FeedPackage, LocalFeed};
pub use framework::{DEFAULT_FRAMEWORK, FrameworkName};
pub use info::{LibFile, PackageDependency, PackageInfo, PackageReference};
pub use provider::{FeedInstallationProvider, InstallationProvider};
pub use source::RepositorySource;
pub use version::PackageVersion;
