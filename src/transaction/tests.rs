//! Tests for transaction support

use super::*;
use tempfile::TempDir;

fn create_test_workspace() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    fs::write(root.join(MANIFEST_FILE), r#"{"packages":[]}"#).unwrap();
    (temp, root)
}

#[test]
fn test_commit_keeps_changes() {
    let (_temp, root) = create_test_workspace();

    let mut transaction = Transaction::new(&root);
    transaction.backup_manifest().unwrap();

    let package_dir = root.join("packages/Acme.Json.1.0.0");
    fs::create_dir_all(&package_dir).unwrap();
    transaction.track_package_dir(&package_dir);
    fs::write(root.join(MANIFEST_FILE), "changed").unwrap();

    transaction.commit();

    assert!(package_dir.exists());
    assert_eq!(fs::read_to_string(root.join(MANIFEST_FILE)).unwrap(), "changed");
}

#[test]
fn test_drop_removes_package_dirs_recursively() {
    let (_temp, root) = create_test_workspace();
    let package_dir = root.join("packages/Acme.Json.1.0.0");

    {
        let mut transaction = Transaction::new(&root);
        fs::create_dir_all(package_dir.join("lib/net45")).unwrap();
        fs::write(package_dir.join("lib/net45/Acme.Json.dll"), b"MZ").unwrap();
        transaction.track_package_dir(&package_dir);
    }

    assert!(!package_dir.exists());
}

#[test]
fn test_drop_restores_manifest() {
    let (_temp, root) = create_test_workspace();
    let original = fs::read_to_string(root.join(MANIFEST_FILE)).unwrap();

    {
        let mut transaction = Transaction::new(&root);
        transaction.backup_manifest().unwrap();
        fs::write(root.join(MANIFEST_FILE), "half-written").unwrap();
    }

    assert_eq!(fs::read_to_string(root.join(MANIFEST_FILE)).unwrap(), original);
}

#[test]
fn test_drop_removes_manifest_that_did_not_exist() {
    let temp = TempDir::new().unwrap();

    {
        let mut transaction = Transaction::new(temp.path());
        transaction.backup_manifest().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), "{}").unwrap();
    }

    assert!(!temp.path().join(MANIFEST_FILE).exists());
}
