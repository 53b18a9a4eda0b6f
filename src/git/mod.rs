//! Git operations backing git-hosted package feeds
//!
//! This module handles:
//! - Cloning feed repositories (HTTPS, SSH and file://)
//! - Resolving refs (branches, tags, SHAs) to exact commits
//! - Checking out a resolved commit
//!
//! Authentication is delegated entirely to git's native system: the SSH agent,
//! keys under ~/.ssh/ and configured credential helpers.

use std::borrow::Cow;
use std::path::Path;

use git2::{
    Cred, CredentialType, ErrorClass, FetchOptions, Oid, RemoteCallbacks, Repository,
    build::{CheckoutBuilder, RepoBuilder},
};

use crate::error::{Result, git};

fn auth_error(message: &str) -> git2::Error {
    git2::Error::new(git2::ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_credentials(username: &str) -> std::result::Result<Cred, git2::Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    for key_name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
        let private_key = ssh_dir.join(key_name);
        if !private_key.exists() {
            continue;
        }
        let public_key = ssh_dir.join(format!("{key_name}.pub"));
        let public_key = public_key.exists().then_some(public_key.as_path());
        if let Ok(cred) = Cred::ssh_key(username, public_key, &private_key, None) {
            return Ok(cred);
        }
    }

    Err(auth_error("SSH key not found"))
}

fn helper_credentials(
    url: &str,
    username_from_url: Option<&str>,
) -> std::result::Result<Cred, git2::Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;
    Cred::credential_helper(&config, url, username_from_url)
        .or_else(|_| Cred::userpass_plaintext(username_from_url.unwrap_or("git"), ""))
}

fn auth_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        if allowed_types.contains(CredentialType::SSH_KEY) {
            let username = username_from_url.unwrap_or("git");
            return Cred::ssh_key_from_agent(username).or_else(|_| ssh_key_credentials(username));
        }
        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return helper_credentials(url, username_from_url);
        }
        Err(auth_error("authentication failed"))
    });
    callbacks
}

/// Turn SCP-style `git@host:path` into `ssh://git@host/path` for libgit2
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    if let Some(rest) = url.strip_prefix("git@") {
        if let Some((host, path)) = rest.split_once(':') {
            let path = path.trim_start_matches('/');
            return Cow::Owned(format!("ssh://git@{host}/{path}"));
        }
    }
    Cow::Borrowed(url)
}

fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).is_absolute()
}

/// Map libgit2 failures onto short messages a user can act on
fn describe_git_error(err: &git2::Error) -> String {
    let message = err.message().to_lowercase();
    if message.contains("not found") || message.contains("404") {
        "Repository not found".to_string()
    } else if message.contains("authentication") || message.contains("credentials") {
        "Authentication failed".to_string()
    } else if message.contains("timed out")
        || message.contains("timeout")
        || message.contains("network")
        || message.contains("connection")
    {
        "Network error".to_string()
    } else {
        err.message().to_string()
    }
}

/// Clone a repository into `target`
///
/// Remote clones are shallow unless a specific ref must be resolved.
pub fn clone(url: &str, target: &Path, shallow: bool) -> Result<Repository> {
    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(auth_callbacks());
    if shallow && !is_local_url(url) {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);
    builder
        .clone(normalize_url(url).as_ref(), target)
        .map_err(|e| git::clone_failed(url, describe_git_error(&e)))
}

fn find_commit<'a>(repo: &'a Repository, refname: &str) -> Option<git2::Commit<'a>> {
    let candidates = [
        refname.to_string(),
        format!("refs/heads/{refname}"),
        format!("refs/tags/{refname}"),
        format!("refs/remotes/origin/{refname}"),
    ];
    for candidate in &candidates {
        if let Ok(commit) = repo
            .find_reference(candidate)
            .and_then(|r| r.peel_to_commit())
        {
            return Some(commit);
        }
    }

    if let Ok(commit) = Oid::from_str(refname).and_then(|oid| repo.find_commit(oid)) {
        return Some(commit);
    }

    repo.revparse_single(refname)
        .and_then(|obj| obj.peel_to_commit())
        .ok()
}

/// Resolve a ref (or HEAD when `None`) to a full commit SHA
pub fn resolve_ref(repo: &Repository, git_ref: Option<&str>) -> Result<String> {
    let commit = match git_ref {
        Some(refname) => find_commit(repo, refname)
            .ok_or_else(|| git::ref_resolve_failed(refname, "Could not resolve reference"))?,
        None => repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| git::ref_resolve_failed("HEAD", e.message()))?,
    };
    Ok(commit.id().to_string())
}

/// Detach HEAD at `sha` and force the working tree to match
pub fn checkout_commit(repo: &Repository, sha: &str) -> Result<()> {
    let checkout_failed = |e: git2::Error| git::checkout_failed(sha, e.message());

    let oid = Oid::from_str(sha).map_err(checkout_failed)?;
    let commit = repo.find_commit(oid).map_err(checkout_failed)?;
    repo.set_head_detached(commit.id()).map_err(checkout_failed)?;

    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout))
        .map_err(checkout_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use crate::test_fixtures::create_git_repo_with_commit;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_scp_url() {
        assert_eq!(
            normalize_url("git@github.com:acme/feed.git"),
            "ssh://git@github.com/acme/feed.git"
        );
        assert_eq!(
            normalize_url("https://github.com/acme/feed.git"),
            "https://github.com/acme/feed.git"
        );
    }

    #[test]
    fn test_clone_resolve_and_checkout_local_repo() {
        let source = TempDir::new().unwrap();
        let sha = create_git_repo_with_commit(
            source.path(),
            "Acme.Json/1.0.0/package.yaml",
            "id: Acme.Json\nversion: \"1.0.0\"\n",
        );

        let target = TempDir::new().unwrap();
        let url = format!("file://{}", source.path().display());
        let repo = clone(&url, &target.path().join("clone"), true).unwrap();

        assert_eq!(resolve_ref(&repo, None).unwrap(), sha);
        checkout_commit(&repo, &sha).unwrap();
        assert!(
            target
                .path()
                .join("clone/Acme.Json/1.0.0/package.yaml")
                .is_file()
        );
    }

    #[test]
    fn test_resolve_unknown_ref_fails() {
        let source = TempDir::new().unwrap();
        create_git_repo_with_commit(source.path(), "README.md", "feed\n");
        let repo = Repository::open(source.path()).unwrap();
        let err = resolve_ref(&repo, Some("no-such-branch")).unwrap_err();
        assert!(matches!(err, ShellError::GitRefResolveFailed { .. }));
    }

    #[test]
    fn test_clone_missing_repository_fails() {
        let target = TempDir::new().unwrap();
        let missing = target.path().join("missing-repo");
        let Err(err) = clone(
            &format!("file://{}", missing.display()),
            &target.path().join("clone"),
            true,
        ) else {
            panic!("cloning a missing repository must fail");
        };
        assert!(matches!(err, ShellError::GitCloneFailed { .. }));
    }
}
