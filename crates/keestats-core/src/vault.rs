//! Arena-backed group/entry tree.
//!
//! Groups and entries live in flat vectors owned by the [`Vault`] and refer to
//! each other through [`GroupId`] / [`EntryId`] handles. Consumers borrow the
//! vault through a [`GroupRef`], which exposes the counts and scoped entry
//! iteration the statistics engine needs.

use crate::models::{Entry, EntryId, Group, GroupId};

/// An in-memory password document.
#[derive(Debug, Clone)]
pub struct Vault {
    groups: Vec<Group>,
    entries: Vec<Entry>,
}

impl Vault {
    /// Create a vault containing only a root group.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            groups: vec![Group::new(root_name, None)],
            entries: Vec::new(),
        }
    }

    /// Id of the root group.
    pub fn root_id(&self) -> GroupId {
        GroupId(0)
    }

    /// Borrow the root group.
    pub fn root(&self) -> GroupRef<'_> {
        GroupRef {
            vault: self,
            id: self.root_id(),
        }
    }

    /// Borrow a group by id.
    pub fn group(&self, id: GroupId) -> Option<GroupRef<'_>> {
        self.groups.get(id.0).map(|_| GroupRef { vault: self, id })
    }

    /// Look up an entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    /// Set a group's UUID. Returns `false` if the group does not exist.
    pub fn set_group_uuid(&mut self, id: GroupId, uuid: impl Into<String>) -> bool {
        match self.groups.get_mut(id.0) {
            Some(group) => {
                group.uuid = uuid.into();
                true
            }
            None => false,
        }
    }

    /// Mark a group as the recycle bin. Returns `false` if the group does not exist.
    pub fn set_recycle_bin(&mut self, id: GroupId, is_recycle_bin: bool) -> bool {
        match self.groups.get_mut(id.0) {
            Some(group) => {
                group.is_recycle_bin = is_recycle_bin;
                true
            }
            None => false,
        }
    }

    /// Append a subgroup under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not minted by this vault.
    pub fn add_group(&mut self, parent: GroupId, name: impl Into<String>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group::new(name, Some(parent)));
        self.node_mut(parent).groups.push(id);
        id
    }

    /// Append an entry under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not minted by this vault.
    pub fn add_entry(&mut self, parent: GroupId, entry: Entry) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(entry);
        self.node_mut(parent).entries.push(id);
        id
    }

    /// Total number of entries in the document.
    pub fn entry_len(&self) -> usize {
        self.entries.len()
    }

    /// Find an entry by UUID.
    pub fn find_entry(&self, uuid: &str) -> Option<EntryId> {
        self.entries
            .iter()
            .position(|e| e.uuid == uuid)
            .map(EntryId)
    }

    /// Find the group holding an entry.
    pub fn parent_of(&self, entry: EntryId) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.entries.contains(&entry))
            .map(GroupId)
    }

    /// Resolve a `/`-separated path of group names relative to the root.
    ///
    /// An empty path resolves to the root itself.
    pub fn find_group_by_path(&self, path: &str) -> Option<GroupId> {
        let mut current = self.root_id();
        for segment in path.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            current = *self
                .node(current)
                .groups
                .iter()
                .find(|&&child| self.node(child).name == segment)?;
        }
        Some(current)
    }

    pub(crate) fn node(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    fn node_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }
}

/// Borrowed view of one group in a [`Vault`].
#[derive(Debug, Clone, Copy)]
pub struct GroupRef<'a> {
    vault: &'a Vault,
    id: GroupId,
}

impl<'a> GroupRef<'a> {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn uuid(&self) -> &'a str {
        &self.group().uuid
    }

    pub fn is_recycle_bin(&self) -> bool {
        self.group().is_recycle_bin
    }

    pub fn vault(&self) -> &'a Vault {
        self.vault
    }

    pub fn group(&self) -> &'a Group {
        self.vault.node(self.id)
    }

    pub fn name(&self) -> &'a str {
        &self.group().name
    }

    pub fn parent(&self) -> Option<GroupRef<'a>> {
        self.group().parent.map(|id| GroupRef {
            vault: self.vault,
            id,
        })
    }

    /// Direct subgroups, in document order.
    pub fn groups(&self) -> impl Iterator<Item = GroupRef<'a>> + 'a {
        let vault = self.vault;
        self.group()
            .groups
            .iter()
            .map(move |&id| GroupRef { vault, id })
    }

    /// Number of entries directly in this group, or in the whole subtree.
    pub fn entry_count(&self, recursive: bool) -> usize {
        let direct = self.group().entries.len();
        if recursive {
            direct + self.groups().map(|g| g.entry_count(true)).sum::<usize>()
        } else {
            direct
        }
    }

    /// Number of direct subgroups, or of all descendant groups.
    pub fn group_count(&self, recursive: bool) -> usize {
        let direct = self.group().groups.len();
        if recursive {
            direct + self.groups().map(|g| g.group_count(true)).sum::<usize>()
        } else {
            direct
        }
    }

    /// Iterate entries in scope.
    ///
    /// Recursive order: own entries first, then each subgroup depth first.
    pub fn entries(&self, recursive: bool) -> Entries<'a> {
        let group = self.group();
        let pending = if recursive {
            group.groups.iter().rev().copied().collect()
        } else {
            Vec::new()
        };
        Entries {
            vault: self.vault,
            current: group.entries.iter(),
            pending,
        }
    }

    /// Display path from the root, e.g. `Root / Email / Work`.
    pub fn path(&self) -> String {
        let mut names = vec![self.name()];
        let mut cursor = self.parent();
        while let Some(group) = cursor {
            names.push(group.name());
            cursor = group.parent();
        }
        names.reverse();
        names.join(" / ")
    }
}

/// Iterator over the entries of a group, see [`GroupRef::entries`].
pub struct Entries<'a> {
    vault: &'a Vault,
    current: std::slice::Iter<'a, EntryId>,
    pending: Vec<GroupId>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (EntryId, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&id) = self.current.next() {
                return Some((id, &self.vault.entries[id.0]));
            }
            let next = self.pending.pop()?;
            let group = self.vault.node(next);
            self.current = group.entries.iter();
            self.pending.extend(group.groups.iter().rev().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root(e0) -> [A(e1, e2) -> [A1(e3)], B(e4)]
    fn sample() -> Vault {
        let mut vault = Vault::new("Root");
        let root = vault.root_id();
        vault.add_entry(root, Entry::new().with_title("e0"));
        let a = vault.add_group(root, "A");
        vault.add_entry(a, Entry::new().with_title("e1"));
        vault.add_entry(a, Entry::new().with_title("e2"));
        let a1 = vault.add_group(a, "A1");
        vault.add_entry(a1, Entry::new().with_title("e3"));
        let b = vault.add_group(root, "B");
        vault.add_entry(b, Entry::new().with_title("e4"));
        vault
    }

    fn titles(vault: &Vault, recursive: bool) -> Vec<&str> {
        vault
            .root()
            .entries(recursive)
            .map(|(_, e)| e.title())
            .collect()
    }

    #[test]
    fn test_counts() {
        let vault = sample();
        let root = vault.root();
        assert_eq!(root.entry_count(false), 1);
        assert_eq!(root.entry_count(true), 5);
        assert_eq!(root.group_count(false), 2);
        assert_eq!(root.group_count(true), 3);
    }

    #[test]
    fn test_recursive_order_is_depth_first() {
        let vault = sample();
        assert_eq!(titles(&vault, true), vec!["e0", "e1", "e2", "e3", "e4"]);
        assert_eq!(titles(&vault, false), vec!["e0"]);
    }

    #[test]
    fn test_iterator_matches_count() {
        let vault = sample();
        let a = vault.group(vault.find_group_by_path("A").unwrap()).unwrap();
        assert_eq!(a.entries(true).count(), a.entry_count(true));
        assert_eq!(a.entries(false).count(), a.entry_count(false));
    }

    #[test]
    fn test_find_group_by_path() {
        let vault = sample();
        assert_eq!(vault.find_group_by_path(""), Some(vault.root_id()));
        let a1 = vault.find_group_by_path("A / A1").unwrap();
        assert_eq!(vault.group(a1).unwrap().path(), "Root / A / A1");
        assert_eq!(vault.find_group_by_path("A/missing"), None);
    }

    #[test]
    fn test_ids_from_another_vault_are_rejected() {
        let mut small = Vault::new("Small");
        let big = sample();
        let foreign = big.find_group_by_path("A / A1").unwrap();

        assert!(small.group(foreign).is_none());

        assert!(!small.set_recycle_bin(foreign, true));
        assert!(!small.set_group_uuid(foreign, "x"));
        // The tree is untouched and still traverses.
        assert_eq!(small.root().entry_count(true), 0);
        assert_eq!(small.root().group_count(true), 0);
    }

    #[test]
    fn test_group_metadata_setters() {
        let mut vault = sample();
        let b = vault.find_group_by_path("B").unwrap();
        assert!(vault.set_recycle_bin(b, true));
        assert!(vault.set_group_uuid(b, "uuid-b"));

        let group = vault.group(b).unwrap();
        assert!(group.is_recycle_bin());
        assert_eq!(group.uuid(), "uuid-b");
        assert_eq!(group.group().entries().len(), 1);
        assert_eq!(group.group().parent(), Some(vault.root_id()));
    }

    #[test]
    fn test_entry_lookup() {
        let mut vault = Vault::new("Root");
        let root = vault.root_id();
        let id = vault.add_entry(root, Entry::new().with_uuid("abc").with_title("Mail"));
        assert_eq!(vault.find_entry("abc"), Some(id));
        assert_eq!(vault.entry(id).map(Entry::title), Some("Mail"));
        assert_eq!(vault.parent_of(id), Some(root));
        assert_eq!(vault.find_entry("zzz"), None);
    }
}
