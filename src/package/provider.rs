//! Installation provider
//!
//! The single integration point between the script host and the package feeds.
//! `search_packages` may touch the network (git feeds); `is_installed` never
//! does and reads only the manifest and the payload directories.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, info, warn};

use crate::cache::FeedCache;
use crate::config::{InstalledPackage, WorkspaceConfig};
use crate::error::{Result, ShellError, config, fs as fs_error, install};
use crate::filesystem::FileSystem;
use crate::hash;
use crate::transaction::Transaction;
use crate::workspace::{PACKAGES_DIR, Workspace};

use super::feed::is_safe_package_id;
use super::{
    FeedPackage, FrameworkName, LocalFeed, PackageDependency, PackageInfo, PackageReference,
    PackageVersion, RepositorySource,
};

const COMPONENT: &str = "Package provider";

/// Contract between the script host and a package ecosystem
pub trait InstallationProvider: Send + Sync {
    /// Load workspace state for the file system's current directory
    ///
    /// Idempotent; must run before any other operation except
    /// [`get_repository_sources`](Self::get_repository_sources).
    fn initialize(&self) -> Result<()>;

    /// Configured feeds for the workspace at `path`, in search precedence order
    fn get_repository_sources(&self, path: &Path) -> Result<Vec<String>>;

    /// Zero-based paged search over every configured feed
    fn search_packages(&self, filter: &str, page: usize, page_size: usize)
    -> Result<Vec<PackageInfo>>;

    /// Install `reference` and its dependencies into the workspace
    fn install_package(&self, reference: &PackageReference, allow_prerelease: bool) -> Result<()>;

    /// Local-only installed check
    fn is_installed(&self, reference: &PackageReference, allow_prerelease: bool) -> Result<bool>;

    /// Dependencies of a search result, fetched on demand
    fn fetch_dependencies(&self, info: &PackageInfo) -> Result<Vec<PackageDependency>>;
}

/// Provider backed by directory and git feeds
pub struct FeedInstallationProvider {
    file_system: Arc<dyn FileSystem>,
    cache: Option<FeedCache>,
    workspace: RwLock<Option<Workspace>>,
    /// Checked-out trees of git feeds, keyed by configured source
    git_trees: Mutex<HashMap<String, PathBuf>>,
}

impl std::fmt::Debug for FeedInstallationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedInstallationProvider")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Newest stable version, or the newest prerelease when nothing stable exists
fn representative(mut versions: Vec<FeedPackage>) -> Option<FeedPackage> {
    versions.sort_by(|a, b| a.info.version.cmp(&b.info.version));
    let newest_stable = versions
        .iter()
        .rposition(|p| !p.info.version.is_prerelease());
    match newest_stable {
        Some(index) => Some(versions.swap_remove(index)),
        None => versions.pop(),
    }
}

fn matches_filter(info: &PackageInfo, filter: &str) -> bool {
    let needle = filter.trim().to_lowercase();
    needle.is_empty()
        || info.id.to_lowercase().contains(&needle)
        || info.title.to_lowercase().contains(&needle)
        || info.description.to_lowercase().contains(&needle)
}

/// `packages/<id>.<version>`, refusing anything that would land elsewhere
fn contained_package_dir(
    workspace: &Workspace,
    id: &str,
    version: &PackageVersion,
) -> Result<PathBuf> {
    let target = workspace.package_dir(id, version);
    let single_entry = target
        .strip_prefix(workspace.packages_dir())
        .is_ok_and(|rest| {
            let mut components = rest.components();
            matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
        });
    if !is_safe_package_id(id) || !single_entry {
        return Err(install::failed(
            format!("{id}.{version}"),
            "package directory would fall outside packages/",
        ));
    }
    Ok(target)
}

fn write_failed(path: &Path, e: impl std::fmt::Display) -> ShellError {
    fs_error::write_failed(path.display().to_string(), e.to_string())
}

impl FeedInstallationProvider {
    /// Provider whose git feeds are cached under `SCRIPTSHELL_CACHE_DIR`
    pub fn new(file_system: Arc<dyn FileSystem>) -> Self {
        Self {
            file_system,
            cache: None,
            workspace: RwLock::new(None),
            git_trees: Mutex::new(HashMap::new()),
        }
    }

    /// Provider whose git feeds are cached in `cache`
    pub fn with_cache(file_system: Arc<dyn FileSystem>, cache: FeedCache) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(file_system)
        }
    }

    fn workspace(&self) -> Result<Workspace> {
        let guard = match self.workspace.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .clone()
            .ok_or_else(|| crate::error::state::not_initialized(COMPONENT))
    }

    fn store_workspace(&self, workspace: Workspace) {
        let mut guard = match self.workspace.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(workspace);
    }

    fn git_tree(&self, source: &str, url: &str, git_ref: Option<&str>) -> Result<PathBuf> {
        let mut trees = match self.git_trees.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(tree) = trees.get(source) {
            return Ok(tree.clone());
        }

        let cache = match &self.cache {
            Some(cache) => cache.clone(),
            None => FeedCache::from_env()?,
        };
        let tree = cache.fetch(url, git_ref)?;
        trees.insert(source.to_string(), tree.clone());
        Ok(tree)
    }

    fn open_feed(&self, source: &str, workspace_root: &Path) -> Result<LocalFeed> {
        match RepositorySource::parse(source, workspace_root)? {
            RepositorySource::Local(path) => LocalFeed::open(&path, source),
            RepositorySource::Git { url, git_ref } => {
                let tree = self.git_tree(source, &url, git_ref.as_deref())?;
                LocalFeed::open(&tree, source)
            }
        }
    }

    /// Open every configured feed, skipping the ones that fail
    ///
    /// Fails only when sources are configured and none of them opened.
    fn open_feeds(&self, workspace: &Workspace) -> Result<Vec<LocalFeed>> {
        let mut feeds = Vec::new();
        let mut first_error = None;

        for source in &workspace.config.sources {
            match self.open_feed(source, &workspace.root) {
                Ok(feed) => feeds.push(feed),
                Err(e) => {
                    warn!(source = %source, error = %e, "skipping unavailable source");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if feeds.is_empty() => Err(e),
            _ => Ok(feeds),
        }
    }

    /// Newest version of `id` accepted by `accepts`, from the first feed that has one
    fn resolve(
        &self,
        feeds: &[LocalFeed],
        id: &str,
        accepts: impl Fn(&PackageVersion) -> bool,
    ) -> Result<FeedPackage> {
        feeds
            .iter()
            .find_map(|feed| {
                feed.versions_of(id)
                    .into_iter()
                    .filter(|p| accepts(&p.info.version))
                    .max_by(|a, b| a.info.version.cmp(&b.info.version))
            })
            .ok_or_else(|| install::not_found(id))
    }

    fn payload_exists(workspace: &Workspace, package: &InstalledPackage) -> bool {
        workspace
            .root
            .join(PACKAGES_DIR)
            .join(package.directory_name())
            .is_dir()
    }

    #[allow(clippy::too_many_arguments)]
    fn install_recursive(
        &self,
        workspace: &mut Workspace,
        feeds: &[LocalFeed],
        transaction: &mut Transaction,
        framework: &FrameworkName,
        package: FeedPackage,
        allow_prerelease: bool,
        chain: &mut Vec<String>,
    ) -> Result<()> {
        chain.push(package.info.id.clone());

        for dependency in &package.dependencies {
            if chain.iter().any(|id| id.eq_ignore_ascii_case(&dependency.id)) {
                let mut cycle = chain.clone();
                cycle.push(dependency.id.clone());
                return Err(install::circular(cycle.join(" -> ")));
            }

            let already_installed = workspace.manifest.packages.iter().any(|installed| {
                installed.id.eq_ignore_ascii_case(&dependency.id)
                    && dependency.accepts(&installed.version)
                    && Self::payload_exists(workspace, installed)
            });
            if already_installed {
                debug!(dependency = %dependency.id, "dependency already installed");
                continue;
            }

            let resolved = self.resolve(feeds, &dependency.id, |version| {
                dependency.accepts(version) && (allow_prerelease || !version.is_prerelease())
            })?;
            self.install_recursive(
                workspace,
                feeds,
                transaction,
                framework,
                resolved,
                allow_prerelease,
                chain,
            )?;
        }

        self.materialize(workspace, transaction, framework, &package)?;
        chain.pop();
        Ok(())
    }

    /// Copy a package's compatible payload into the workspace and record it
    fn materialize(
        &self,
        workspace: &mut Workspace,
        transaction: &mut Transaction,
        framework: &FrameworkName,
        package: &FeedPackage,
    ) -> Result<()> {
        let info = &package.info;
        let target = contained_package_dir(workspace, &info.id, &info.version)?;

        if target.exists() {
            fs::remove_dir_all(&target).map_err(|e| write_failed(&target, e))?;
        }
        fs::create_dir_all(&target).map_err(|e| write_failed(&target, e))?;
        transaction.track_package_dir(&target);

        let payload = info
            .compatible_dlls(framework)
            .into_iter()
            .chain(info.content_files().iter().cloned());

        let mut files = Vec::new();
        for relative in payload {
            let destination = target.join(&relative);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
            }
            fs::copy(package.root.join(&relative), &destination)
                .map_err(|e| write_failed(&destination, e))?;
            files.push(format!(
                "{PACKAGES_DIR}/{}.{}/{relative}",
                info.id, info.version
            ));
        }

        let installed = InstalledPackage {
            id: info.id.clone(),
            version: info.version.clone(),
            framework: Some(framework.clone()),
            source: info.source.clone(),
            hash: hash::hash_directory(&target)?,
            files,
        };
        info!(package = %info.full_name(), source = %info.source, "installed package");
        workspace.manifest.upsert(installed);
        Ok(())
    }
}

impl InstallationProvider for FeedInstallationProvider {
    fn initialize(&self) -> Result<()> {
        let root = self.file_system.current_directory();
        let workspace = Workspace::open(&root)?;
        debug!(
            root = %root.display(),
            sources = workspace.config.sources.len(),
            installed = workspace.manifest.packages.len(),
            "package provider initialized"
        );
        self.store_workspace(workspace);
        Ok(())
    }

    fn get_repository_sources(&self, path: &Path) -> Result<Vec<String>> {
        Ok(WorkspaceConfig::load(path)?.sources)
    }

    fn search_packages(
        &self,
        filter: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<PackageInfo>> {
        let workspace = self.workspace()?;
        let feeds = self.open_feeds(&workspace)?;

        let mut results: Vec<PackageInfo> = Vec::new();
        for feed in &feeds {
            let mut by_id: HashMap<String, Vec<FeedPackage>> = HashMap::new();
            for package in feed.packages() {
                by_id
                    .entry(package.info.id.to_lowercase())
                    .or_default()
                    .push(package);
            }

            for (id, versions) in by_id {
                if results.iter().any(|r| r.id.to_lowercase() == id) {
                    continue;
                }
                if let Some(package) = representative(versions) {
                    results.push(package.info);
                }
            }
        }

        results.retain(|info| matches_filter(info, filter));
        results.sort_by(|a, b| {
            b.download_count
                .cmp(&a.download_count)
                .then_with(|| a.id.to_lowercase().cmp(&b.id.to_lowercase()))
        });

        Ok(results
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect())
    }

    fn install_package(&self, reference: &PackageReference, allow_prerelease: bool) -> Result<()> {
        let mut workspace = self.workspace()?;

        if self.is_installed(reference, allow_prerelease)? {
            debug!(package = %reference, "already installed");
            return Ok(());
        }

        if workspace.config.sources.is_empty() {
            return Err(config::no_sources(workspace.root.display().to_string()));
        }

        let framework = match reference.framework() {
            Some(framework) => framework.clone(),
            None => workspace.target_framework()?,
        };

        let feeds = self.open_feeds(&workspace)?;
        let package = self.resolve(&feeds, reference.id(), |version| match reference.version() {
            Some(wanted) => version == wanted,
            None => allow_prerelease || !version.is_prerelease(),
        })?;

        let mut transaction = Transaction::new(&workspace.root);
        transaction.backup_manifest()?;

        let mut chain = Vec::new();
        self.install_recursive(
            &mut workspace,
            &feeds,
            &mut transaction,
            &framework,
            package,
            allow_prerelease,
            &mut chain,
        )?;
        workspace.save_manifest()?;
        transaction.commit();

        self.store_workspace(workspace);
        Ok(())
    }

    fn is_installed(&self, reference: &PackageReference, allow_prerelease: bool) -> Result<bool> {
        let workspace = self.workspace()?;
        Ok(workspace.manifest.packages.iter().any(|package| {
            package.satisfies(reference, allow_prerelease)
                && Self::payload_exists(&workspace, package)
        }))
    }

    fn fetch_dependencies(&self, info: &PackageInfo) -> Result<Vec<PackageDependency>> {
        let workspace = self.workspace()?;
        let feed = self.open_feed(&info.source, &workspace.root)?;
        feed.versions_of(&info.id)
            .into_iter()
            .find(|p| p.info.version == info.version)
            .map(|p| p.dependencies)
            .ok_or_else(|| install::not_found(info.full_name()))
    }
}
