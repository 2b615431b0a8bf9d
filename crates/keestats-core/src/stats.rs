//! Password statistics for a group.
//!
//! [`StatComputer::compute`] walks the entries of a group once and produces
//! two ordered lists: simple counts/ratios, and extended statistics that point
//! at the entry responsible for an extreme value.

use crate::models::{Entry, EntryId};
use crate::vault::GroupRef;
use std::collections::hash_map::{Entry as MapEntry, HashMap};
use std::fmt;

/// Starting length of the shortest-password tracker. Every real password is shorter.
pub const SHORTEST_SEED: usize = usize::MAX;

/// Which statistic a record holds. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    DirectEntries,
    RecursiveEntries,
    DirectGroups,
    RecursiveGroups,
    EmptyPasswords,
    UniquePasswords,
    UniquePasswordsPercent,
    DuplicatePasswords,
    ShortestPassword,
    LongestPassword,
}

impl StatKind {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            StatKind::DirectEntries => "Entries in group",
            StatKind::RecursiveEntries => "Entries in group and subgroups",
            StatKind::DirectGroups => "Subgroups",
            StatKind::RecursiveGroups => "Subgroups (all levels)",
            StatKind::EmptyPasswords => "Empty passwords",
            StatKind::UniquePasswords => "Unique passwords",
            StatKind::UniquePasswordsPercent => "Unique passwords (%)",
            StatKind::DuplicatePasswords => "Duplicate passwords",
            StatKind::ShortestPassword => "Shortest password",
            StatKind::LongestPassword => "Longest password",
        }
    }

    /// Whether the value is a percentage rather than a count.
    pub fn is_percent(self) -> bool {
        matches!(self, StatKind::UniquePasswordsPercent)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A label/value summary record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatItem {
    pub kind: StatKind,
    pub value: f64,
}

impl StatItem {
    fn new(kind: StatKind, value: f64) -> Self {
        Self { kind, value }
    }

    /// Display label of the statistic.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// A statistic tied to the entry that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedStatItem {
    pub kind: StatKind,
    pub value: f64,
    /// `None` when no entry qualified; `value` is then the tracker seed.
    pub entry: Option<EntryId>,
}

impl ExtendedStatItem {
    /// Display label of the statistic.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Whether an entry qualified for this statistic.
    pub fn is_measured(&self) -> bool {
        self.entry.is_some()
    }
}

/// Result of one computation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStats {
    pub simple: Vec<StatItem>,
    pub extended: Vec<ExtendedStatItem>,
}

impl GroupStats {
    /// Value of a simple statistic.
    pub fn value(&self, kind: StatKind) -> Option<f64> {
        self.simple
            .iter()
            .find(|item| item.kind == kind)
            .map(|item| item.value)
    }

    /// An extended statistic by kind.
    pub fn extended(&self, kind: StatKind) -> Option<&ExtendedStatItem> {
        self.extended.iter().find(|item| item.kind == kind)
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// The group has no entries in scope. Informational, not a failure.
    #[error("No passwords in this group")]
    NoData,
}

#[derive(Debug, Clone, Copy)]
struct Extreme {
    len: usize,
    entry: Option<EntryId>,
}

/// Single-pass accumulator over the entries of a group.
#[derive(Debug)]
pub struct StatComputer<'a> {
    unique: HashMap<&'a str, EntryId>,
    empty: usize,
    duplicates: usize,
    shortest: Extreme,
    longest: Extreme,
}

impl<'a> StatComputer<'a> {
    fn new() -> Self {
        Self {
            unique: HashMap::new(),
            empty: 0,
            duplicates: 0,
            shortest: Extreme {
                len: SHORTEST_SEED,
                entry: None,
            },
            longest: Extreme {
                len: 0,
                entry: None,
            },
        }
    }

    /// Compute the statistics of `group`, over its whole subtree when
    /// `recursive` is set, otherwise over its direct entries only.
    pub fn compute(group: GroupRef<'a>, recursive: bool) -> Result<GroupStats, StatsError> {
        let direct_entries = group.entry_count(false);
        let recursive_entries = group.entry_count(true);
        let total = if recursive {
            recursive_entries
        } else {
            direct_entries
        };

        let mut stats = GroupStats::default();
        stats.simple.extend([
            StatItem::new(StatKind::DirectEntries, direct_entries as f64),
            StatItem::new(StatKind::RecursiveEntries, recursive_entries as f64),
            StatItem::new(StatKind::DirectGroups, group.group_count(false) as f64),
            StatItem::new(StatKind::RecursiveGroups, group.group_count(true) as f64),
        ]);

        if total == 0 {
            tracing::debug!(group = group.name(), recursive, "no entries in scope");
            return Err(StatsError::NoData);
        }

        let mut computer = StatComputer::new();
        for (id, entry) in group.entries(recursive) {
            computer.observe(id, entry);
        }

        let unique = computer.unique.len();
        tracing::debug!(
            group = group.name(),
            recursive,
            total,
            unique,
            empty = computer.empty,
            duplicates = computer.duplicates,
            "computed password statistics"
        );

        stats.simple.extend([
            StatItem::new(StatKind::EmptyPasswords, computer.empty as f64),
            StatItem::new(StatKind::UniquePasswords, unique as f64),
            StatItem::new(
                StatKind::UniquePasswordsPercent,
                unique as f64 / total as f64 * 100.0,
            ),
            StatItem::new(StatKind::DuplicatePasswords, computer.duplicates as f64),
        ]);
        stats.extended.extend([
            computer.shortest.into_item(StatKind::ShortestPassword),
            computer.longest.into_item(StatKind::LongestPassword),
        ]);

        Ok(stats)
    }

    fn observe(&mut self, id: EntryId, entry: &'a Entry) {
        let password = entry.password();
        if password.is_empty() {
            self.empty += 1;
            return;
        }

        match self.unique.entry(password) {
            MapEntry::Occupied(_) => {
                self.duplicates += 1;
                return;
            }
            MapEntry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let len = password.chars().count();
        if len < self.shortest.len {
            self.shortest = Extreme {
                len,
                entry: Some(id),
            };
        }
        if len > self.longest.len {
            self.longest = Extreme {
                len,
                entry: Some(id),
            };
        }
    }
}

impl Extreme {
    fn into_item(self, kind: StatKind) -> ExtendedStatItem {
        ExtendedStatItem {
            kind,
            value: self.len as f64,
            entry: self.entry,
        }
    }
}

/// Shorthand for [`StatComputer::compute`].
pub fn compute_stats(group: GroupRef<'_>, recursive: bool) -> Result<GroupStats, StatsError> {
    StatComputer::compute(group, recursive)
}
