//! Shared data types for the vault document.

use std::collections::HashMap;

/// Standard KeePass field names.
pub mod fields {
    pub const TITLE: &str = "Title";
    pub const USERNAME: &str = "UserName";
    pub const PASSWORD: &str = "Password";
    pub const URL: &str = "URL";
    pub const NOTES: &str = "Notes";
}

/// Opaque handle to a group inside a [`Vault`](crate::Vault).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

/// Opaque handle to an entry inside a [`Vault`](crate::Vault).
///
/// Holding an `EntryId` does not keep the entry alive; resolve it with
/// [`Vault::entry`](crate::Vault::entry) when it needs to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) usize);

/// Represents a group (folder) in the database tree.
///
/// The links to parent, subgroups and entries are only changed by the owning
/// [`Vault`](crate::Vault), which keeps them acyclic and in range.
#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) uuid: String,
    pub(crate) name: String,
    pub(crate) parent: Option<GroupId>,
    pub(crate) groups: Vec<GroupId>,
    pub(crate) entries: Vec<EntryId>,
    pub(crate) is_recycle_bin: bool,
}

impl Group {
    pub(crate) fn new(name: impl Into<String>, parent: Option<GroupId>) -> Self {
        Self {
            uuid: String::new(),
            name: name.into(),
            parent,
            groups: Vec::new(),
            entries: Vec::new(),
            is_recycle_bin: false,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Direct subgroups, in document order.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    /// Direct entries, in document order.
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    pub fn is_recycle_bin(&self) -> bool {
        self.is_recycle_bin
    }
}

/// Represents a password entry as a named set of string fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub uuid: String,
    pub fields: HashMap<String, String>,
}

impl Entry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field(fields::TITLE, title)
    }

    pub fn with_username(self, username: impl Into<String>) -> Self {
        self.with_field(fields::USERNAME, username)
    }

    pub fn with_password(self, password: impl Into<String>) -> Self {
        self.with_field(fields::PASSWORD, password)
    }

    pub fn with_url(self, url: impl Into<String>) -> Self {
        self.with_field(fields::URL, url)
    }

    /// Read a field, returning `None` when it is absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Read a field, treating an absent field as an empty string.
    pub fn field_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.field_or_empty(fields::TITLE)
    }

    pub fn username(&self) -> &str {
        self.field_or_empty(fields::USERNAME)
    }

    pub fn password(&self) -> &str {
        self.field_or_empty(fields::PASSWORD)
    }

    pub fn url(&self) -> &str {
        self.field_or_empty(fields::URL)
    }

    pub fn notes(&self) -> &str {
        self.field_or_empty(fields::NOTES)
    }
}
