//! Package identity and search-result metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FrameworkName, PackageVersion};

/// Identity of a package to install or query
///
/// Ids compare case-insensitively, the way package feeds treat them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageReference {
    id: String,
    framework: Option<FrameworkName>,
    version: Option<PackageVersion>,
}

impl PackageReference {
    pub fn new(
        id: impl Into<String>,
        framework: Option<FrameworkName>,
        version: Option<PackageVersion>,
    ) -> Self {
        Self {
            id: id.into(),
            framework,
            version,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn framework(&self) -> Option<&FrameworkName> {
        self.framework.as_ref()
    }

    /// `None` means "newest available"
    pub fn version(&self) -> Option<&PackageVersion> {
        self.version.as_ref()
    }

    pub fn matches_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }
}

impl PartialEq for PackageReference {
    fn eq(&self, other: &Self) -> bool {
        self.matches_id(&other.id)
            && self.framework == other.framework
            && self.version == other.version
    }
}

impl Eq for PackageReference {}

impl std::fmt::Display for PackageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.id, version),
            None => write!(f, "{}", self.id),
        }
    }
}

/// An assembly shipped inside a package, tagged with the framework folder it lives in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibFile {
    /// `None` for assemblies placed directly under `lib/`
    pub framework: Option<FrameworkName>,
    /// Path relative to the package root, forward slashes
    pub path: String,
}

/// Dependency edge declared by a package; `version` is the minimum accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<PackageVersion>,
}

impl PackageDependency {
    /// Whether an available version satisfies this dependency
    pub fn accepts(&self, version: &PackageVersion) -> bool {
        self.version.as_ref().is_none_or(|minimum| version >= minimum)
    }
}

/// Metadata for one package version, as returned by a search
///
/// Dependencies are deliberately absent; fetch them with
/// [`InstallationProvider::fetch_dependencies`](super::InstallationProvider::fetch_dependencies).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub id: String,
    pub version: PackageVersion,
    pub title: String,
    pub description: String,
    pub download_count: u64,
    pub authors: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub icon_url: Option<String>,
    /// Framework assemblies the package expects the host to provide
    pub framework_assemblies: Vec<String>,
    pub lib_files: Vec<LibFile>,
    pub content_files: Vec<String>,
    /// Source the package was found in
    pub source: String,
}

impl PackageInfo {
    /// Version display string
    pub fn text_version(&self) -> &str {
        self.version.as_text()
    }

    /// `id version`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.id, self.version)
    }

    /// Comma separated author list
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    /// Publish date formatted for listings
    pub fn published_date(&self) -> Option<String> {
        self.published.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Assemblies usable by a `target` session
    ///
    /// Picks the single most specific compatible framework folder, falling back to
    /// assemblies placed directly under `lib/`.
    pub fn compatible_dlls(&self, target: &FrameworkName) -> Vec<String> {
        let best = self
            .lib_files
            .iter()
            .filter_map(|lib| lib.framework.as_ref())
            .filter(|fw| fw.is_compatible_with(target))
            .max_by(|a, b| {
                let same_family = |fw: &FrameworkName| fw.identifier() == target.identifier();
                same_family(a)
                    .cmp(&same_family(b))
                    .then_with(|| a.version().cmp(&b.version()))
            })
            .cloned();

        self.lib_files
            .iter()
            .filter(|lib| lib.framework == best)
            .map(|lib| lib.path.clone())
            .collect()
    }

    pub fn content_files(&self) -> &[String] {
        &self.content_files
    }

    /// Reference pinned to this exact version
    pub fn to_reference(&self, framework: Option<FrameworkName>) -> PackageReference {
        PackageReference::new(self.id.clone(), framework, Some(self.version.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_with_libs(libs: &[(Option<&str>, &str)]) -> PackageInfo {
        PackageInfo {
            id: "Acme.Json".to_string(),
            version: PackageVersion::parse("1.2.0").unwrap(),
            title: "Acme Json".to_string(),
            description: String::new(),
            download_count: 0,
            authors: vec!["acme".to_string(), "ops".to_string()],
            published: None,
            icon_url: None,
            framework_assemblies: Vec::new(),
            lib_files: libs
                .iter()
                .map(|(fw, path)| LibFile {
                    framework: fw.map(|f| FrameworkName::parse(f).unwrap()),
                    path: (*path).to_string(),
                })
                .collect(),
            content_files: Vec::new(),
            source: "./feed".to_string(),
        }
    }

    #[test]
    fn test_reference_ids_are_case_insensitive() {
        let a = PackageReference::new("Acme.Json", None, None);
        let b = PackageReference::new("acme.json", None, None);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Acme.Json");
    }

    #[test]
    fn test_compatible_dlls_picks_most_specific_folder() {
        let info = info_with_libs(&[
            (Some("net40"), "lib/net40/Acme.Json.dll"),
            (Some("net45"), "lib/net45/Acme.Json.dll"),
            (Some("net46"), "lib/net46/Acme.Json.dll"),
            (Some("netstandard2.0"), "lib/netstandard2.0/Acme.Json.dll"),
        ]);
        let target = FrameworkName::parse("net45").unwrap();
        assert_eq!(info.compatible_dlls(&target), vec!["lib/net45/Acme.Json.dll"]);

        let target = FrameworkName::parse("net472").unwrap();
        assert_eq!(info.compatible_dlls(&target), vec!["lib/net46/Acme.Json.dll"]);

        let target = FrameworkName::parse("net6.0").unwrap();
        assert_eq!(
            info.compatible_dlls(&target),
            vec!["lib/netstandard2.0/Acme.Json.dll"]
        );
    }

    #[test]
    fn test_compatible_dlls_falls_back_to_lib_root() {
        let info = info_with_libs(&[(None, "lib/Acme.Json.dll"), (Some("net46"), "lib/net46/x.dll")]);
        let target = FrameworkName::parse("net45").unwrap();
        assert_eq!(info.compatible_dlls(&target), vec!["lib/Acme.Json.dll"]);
    }

    #[test]
    fn test_to_reference_pins_version() {
        let info = info_with_libs(&[]);
        let reference = info.to_reference(None);
        assert_eq!(reference.version().map(|v| v.as_text()), Some("1.2.0"));
        assert_eq!(info.full_name(), "Acme.Json 1.2.0");
        assert_eq!(info.authors_display(), "acme, ops");
    }

    #[test]
    fn test_dependency_minimum_version() {
        let dep = PackageDependency {
            id: "Acme.Core".to_string(),
            version: Some(PackageVersion::parse("1.1").unwrap()),
        };
        assert!(dep.accepts(&PackageVersion::parse("1.1.0").unwrap()));
        assert!(dep.accepts(&PackageVersion::parse("2.0").unwrap()));
        assert!(!dep.accepts(&PackageVersion::parse("1.0.9").unwrap()));
    }
}
