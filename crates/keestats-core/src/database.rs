//! KeePass database loading.

use crate::models::{Entry, GroupId};
use crate::vault::Vault;
use anyhow::{Context, Result};
use keepass::db::{Node, Value};
use keepass::{Database, DatabaseKey};
use std::path::Path;

/// Wrapper around an unlocked KeePass database.
pub struct KeepassDatabase {
    db: Database,
    path: std::path::PathBuf,
}

impl KeepassDatabase {
    /// Open and unlock a KeePass database.
    pub fn unlock(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let path = path.as_ref();

        let key = DatabaseKey::new().with_password(password);

        let mut file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open database file: {}", path.display()))?;
        let db = Database::open(&mut file, key)
            .with_context(|| format!("Failed to unlock database: {}", path.display()))?;

        tracing::info!("Unlocked database {}", path.display());
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Path the database was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert the database tree into a [`Vault`], keeping document order.
    pub fn vault(&self) -> Vault {
        let mut vault = Vault::new(self.db.root.name.clone());
        let root = vault.root_id();
        let recycle_bin = self.db.meta.recyclebin_uuid.map(|uuid| uuid.to_string());

        vault.set_group_uuid(root, self.db.root.uuid.to_string());
        self.convert_children(&mut vault, root, &self.db.root, recycle_bin.as_deref());

        tracing::info!(
            entries = vault.entry_len(),
            groups = vault.root().group_count(true),
            "Loaded vault from {}",
            self.path.display()
        );
        vault
    }

    fn convert_children(
        &self,
        vault: &mut Vault,
        parent: GroupId,
        kg: &keepass::db::Group,
        recycle_bin: Option<&str>,
    ) {
        // Entries before subgroups, so iteration order matches KeePass.
        for node in &kg.children {
            if let Node::Entry(e) = node {
                vault.add_entry(parent, convert_entry(e));
            }
        }
        for node in &kg.children {
            if let Node::Group(g) = node {
                let id = vault.add_group(parent, g.name.clone());
                let uuid = g.uuid.to_string();
                vault.set_recycle_bin(id, recycle_bin == Some(uuid.as_str()));
                vault.set_group_uuid(id, uuid);
                self.convert_children(vault, id, g, recycle_bin);
            }
        }
    }
}

/// Convert a keepass::Entry to our Entry model.
fn convert_entry(ke: &keepass::db::Entry) -> Entry {
    let mut entry = Entry::new().with_uuid(ke.uuid.to_string());

    for (key, val) in &ke.fields {
        match val {
            Value::Unprotected(_) | Value::Protected(_) => {
                if let Some(s) = ke.get(key) {
                    entry.fields.insert(key.clone(), s.to_string());
                }
            }
            _ => {
                tracing::debug!("Skipping binary field {} on entry {}", key, ke.uuid);
            }
        }
    }

    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{compute_stats, StatKind};
    use keepass::config::DatabaseConfig;

    fn entry(title: &str, password: &str) -> keepass::db::Entry {
        let mut e = keepass::db::Entry::new();
        e.fields
            .insert("Title".to_string(), Value::Unprotected(title.to_string()));
        e.fields
            .insert("Password".to_string(), Value::Unprotected(password.to_string()));
        e
    }

    fn write_db(path: &Path) {
        let mut db = Database::new(DatabaseConfig::default());
        db.root.name = "Root".to_string();

        let mut web = keepass::db::Group::new("Web");
        web.children.push(Node::Entry(entry("Mail", "hunter2")));
        web.children.push(Node::Entry(entry("Forum", "hunter2")));
        db.root.children.push(Node::Group(web));
        db.root.children.push(Node::Entry(entry("Router", "")));

        let bin = keepass::db::Group::new("Recycle Bin");
        db.meta.recyclebin_uuid = Some(bin.uuid);
        db.root.children.push(Node::Group(bin));

        let mut file = std::fs::File::create(path).unwrap();
        db.save(&mut file, DatabaseKey::new().with_password("secret"))
            .unwrap();
    }

    #[test]
    fn test_unlock_and_convert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.kdbx");
        write_db(&path);

        let db = KeepassDatabase::unlock(&path, "secret").unwrap();
        let vault = db.vault();
        let root = vault.root();

        assert_eq!(root.name(), "Root");
        assert_eq!(root.entry_count(true), 3);
        assert_eq!(root.group_count(false), 2);

        // Entries of a group come before its subgroups.
        let titles: Vec<_> = root.entries(true).map(|(_, e)| e.title()).collect();
        assert_eq!(titles, vec!["Router", "Mail", "Forum"]);

        let bin = vault.find_group_by_path("Recycle Bin").unwrap();
        assert!(vault.group(bin).unwrap().is_recycle_bin());

        let stats = compute_stats(root, true).unwrap();
        assert_eq!(stats.value(StatKind::EmptyPasswords), Some(1.0));
        assert_eq!(stats.value(StatKind::UniquePasswords), Some(1.0));
    }

    #[test]
    fn test_wrong_password_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.kdbx");
        write_db(&path);

        assert!(KeepassDatabase::unlock(&path, "wrong").is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeepassDatabase::unlock(dir.path().join("nope.kdbx"), "x")
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to open database file"));
    }
}
