//! Application state management.

use crate::config::Config;
use keestats_core::{
    compute_stats, Entry, EntryId, GroupId, GroupStats, KeepassDatabase, StatsError, Vault,
};
use std::collections::HashSet;
use std::path::PathBuf;

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Waiting for password entry.
    Locked,
    /// Database is unlocked.
    Unlocked,
    /// Application should quit.
    Quit,
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Password entry mode.
    PasswordEntry,
    /// An entry referenced by a statistic is shown in a popup.
    EntryPopup,
}

/// Focus area within the unlocked view.
#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    /// Group tree is focused.
    Sidebar,
    /// Extended statistics list is focused.
    Stats,
}

/// A flattened group tree item for rendering.
#[derive(Debug, Clone)]
pub struct TreeItem {
    /// Depth level for indentation (root is 0).
    pub depth: usize,
    pub id: GroupId,
    pub name: String,
    /// Whether group is expanded.
    pub is_expanded: bool,
    /// Whether group has subgroups.
    pub has_children: bool,
    pub is_recycle_bin: bool,
}

/// Main application model.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Current focus area.
    pub focus: Focus,
    /// Path to the database file.
    pub database_path: PathBuf,
    /// The loaded vault (if unlocked).
    pub vault: Option<Vault>,
    /// Whether statistics include subgroups.
    pub recursive: bool,
    /// Sidebar width in percent.
    pub sidebar_width: u16,

    // Sidebar state
    /// Expanded groups.
    pub expanded_groups: HashSet<GroupId>,
    /// Index of the selected item in the flattened tree.
    pub sidebar_selected_index: usize,
    /// Cached flattened tree items for rendering.
    pub tree_items: Vec<TreeItem>,

    // Statistics state
    /// Statistics for the selected group.
    pub stats: Option<Result<GroupStats, StatsError>>,
    /// Selected extended statistic.
    pub stats_selected_index: usize,
    /// Entry shown in the popup.
    pub popup_entry: Option<EntryId>,

    // Password entry state
    /// Password being entered.
    pub password_input: String,
    /// Error message to display.
    pub error_message: Option<String>,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: &Config) -> Self {
        Self {
            state: AppState::Locked,
            input_mode: InputMode::PasswordEntry,
            focus: Focus::Sidebar,
            database_path: config.database_path.clone(),
            vault: None,
            recursive: config.recursive,
            sidebar_width: config.sidebar_width.clamp(10, 90),
            expanded_groups: HashSet::new(),
            sidebar_selected_index: 0,
            tree_items: Vec::new(),
            stats: None,
            stats_selected_index: 0,
            popup_entry: None,
            password_input: String::new(),
            error_message: None,
        }
    }

    /// Attempt to unlock the database with the current password.
    pub fn try_unlock(&mut self) -> bool {
        match KeepassDatabase::unlock(&self.database_path, &self.password_input) {
            Ok(db) => {
                self.password_input.clear();
                self.load_vault(db.vault());
                true
            }
            Err(e) => {
                tracing::warn!("Unlock failed: {:#}", e);
                self.error_message = Some(format!("Failed to unlock: {}", e));
                self.password_input.clear();
                false
            }
        }
    }

    /// Switch to the unlocked view for `vault`, selecting its root.
    pub fn load_vault(&mut self, vault: Vault) {
        // Expand root by default
        self.expanded_groups.clear();
        self.expanded_groups.insert(vault.root_id());
        self.vault = Some(vault);
        self.state = AppState::Unlocked;
        self.input_mode = InputMode::Normal;
        self.focus = Focus::Sidebar;
        self.error_message = None;
        self.sidebar_selected_index = 0;
        self.rebuild_tree();
        self.refresh_stats();
    }

    /// Rebuild the flattened tree items from the current group hierarchy.
    pub fn rebuild_tree(&mut self) {
        self.tree_items.clear();
        let Some(vault) = self.vault.as_ref() else {
            return;
        };

        let mut items = Vec::new();
        let mut stack = vec![(vault.root_id(), 0)];
        while let Some((id, depth)) = stack.pop() {
            let Some(group) = vault.group(id) else {
                continue;
            };
            let is_expanded = self.expanded_groups.contains(&id);
            let subgroups = group.group().groups();
            items.push(TreeItem {
                depth,
                id,
                name: group.name().to_string(),
                is_expanded,
                has_children: !subgroups.is_empty(),
                is_recycle_bin: group.is_recycle_bin(),
            });
            if is_expanded {
                stack.extend(subgroups.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
        self.tree_items = items;

        if self.sidebar_selected_index >= self.tree_items.len() {
            self.sidebar_selected_index = self.tree_items.len().saturating_sub(1);
        }
    }

    /// The group under the sidebar cursor.
    pub fn selected_group(&self) -> Option<GroupId> {
        self.tree_items
            .get(self.sidebar_selected_index)
            .map(|item| item.id)
    }

    /// Recompute statistics for the selected group.
    pub fn refresh_stats(&mut self) {
        self.stats_selected_index = 0;
        self.stats = match (self.vault.as_ref(), self.selected_group()) {
            (Some(vault), Some(id)) => vault.group(id).map(|group| {
                tracing::debug!(group = %group.path(), recursive = self.recursive, "refreshing stats");
                compute_stats(group, self.recursive)
            }),
            _ => None,
        };
    }

    /// Toggle between direct and recursive scope.
    pub fn toggle_recursive(&mut self) {
        self.recursive = !self.recursive;
        self.refresh_stats();
    }

    /// Move selection up in the sidebar.
    pub fn move_up(&mut self) {
        if self.sidebar_selected_index > 0 {
            self.sidebar_selected_index -= 1;
            self.refresh_stats();
        }
    }

    /// Move selection down in the sidebar.
    pub fn move_down(&mut self) {
        if self.sidebar_selected_index + 1 < self.tree_items.len() {
            self.sidebar_selected_index += 1;
            self.refresh_stats();
        }
    }

    /// Expand the current group.
    pub fn expand_current(&mut self) {
        let Some(item) = self.tree_items.get(self.sidebar_selected_index).cloned() else {
            return;
        };
        if item.has_children && self.expanded_groups.insert(item.id) {
            self.rebuild_tree();
        }
    }

    /// Collapse the current group, or jump to its parent when already collapsed.
    pub fn collapse_current(&mut self) {
        let Some(item) = self.tree_items.get(self.sidebar_selected_index).cloned() else {
            return;
        };
        if self.expanded_groups.remove(&item.id) {
            self.rebuild_tree();
            return;
        }

        let parent = self
            .vault
            .as_ref()
            .and_then(|vault| vault.group(item.id))
            .and_then(|group| group.parent())
            .map(|parent| parent.id());
        if let Some(index) = parent.and_then(|p| self.tree_items.iter().position(|i| i.id == p)) {
            self.sidebar_selected_index = index;
            self.refresh_stats();
        }
    }

    /// Number of extended statistics currently shown.
    fn extended_len(&self) -> usize {
        match &self.stats {
            Some(Ok(stats)) => stats.extended.len(),
            _ => 0,
        }
    }

    /// Move focus to the statistics list, if there is anything to select.
    pub fn focus_stats(&mut self) {
        if self.extended_len() > 0 {
            self.focus = Focus::Stats;
        }
    }

    /// Move selection up in the statistics list.
    pub fn move_stat_up(&mut self) {
        self.stats_selected_index = self.stats_selected_index.saturating_sub(1);
    }

    /// Move selection down in the statistics list.
    pub fn move_stat_down(&mut self) {
        if self.stats_selected_index + 1 < self.extended_len() {
            self.stats_selected_index += 1;
        }
    }

    /// Show the entry behind the selected extended statistic.
    pub fn open_selected_entry(&mut self) {
        let entry = match &self.stats {
            Some(Ok(stats)) => stats
                .extended
                .get(self.stats_selected_index)
                .and_then(|item| item.entry),
            _ => None,
        };
        if let Some(id) = entry {
            self.popup_entry = Some(id);
            self.input_mode = InputMode::EntryPopup;
        }
    }

    /// Close the entry popup.
    pub fn close_popup(&mut self) {
        self.popup_entry = None;
        self.input_mode = InputMode::Normal;
    }

    /// Resolve the popup entry against the loaded vault.
    pub fn popup_details(&self) -> Option<(&Entry, String)> {
        let vault = self.vault.as_ref()?;
        let id = self.popup_entry?;
        let entry = vault.entry(id)?;
        let path = vault
            .parent_of(id)
            .and_then(|group| vault.group(group))
            .map(|group| group.path())
            .unwrap_or_default();
        Some((entry, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keestats_core::StatKind;

    /// Root(r1) -> [Web(w1, w2) -> [Deep(d1)], Empty]
    fn vault() -> Vault {
        let mut vault = Vault::new("Root");
        let root = vault.root_id();
        vault.add_entry(root, Entry::new().with_title("r1").with_password("rootpw"));
        let web = vault.add_group(root, "Web");
        vault.add_entry(web, Entry::new().with_title("w1").with_password("abc"));
        vault.add_entry(web, Entry::new().with_title("w2").with_password("abc"));
        let deep = vault.add_group(web, "Deep");
        vault.add_entry(deep, Entry::new().with_title("d1").with_password("x"));
        vault.add_group(root, "Empty");
        vault
    }

    fn app() -> App {
        let mut app = App::new(&Config::default());
        app.load_vault(vault());
        app
    }

    fn names(app: &App) -> Vec<&str> {
        app.tree_items.iter().map(|i| i.name.as_str()).collect()
    }

    fn stats(app: &App) -> &GroupStats {
        app.stats.as_ref().unwrap().as_ref().unwrap()
    }

    #[test]
    fn test_load_shows_root_stats() {
        let app = app();
        assert_eq!(app.state, AppState::Unlocked);
        assert_eq!(names(&app), vec!["Root", "Web", "Empty"]);
        assert_eq!(stats(&app).value(StatKind::RecursiveEntries), Some(4.0));
        assert_eq!(stats(&app).value(StatKind::UniquePasswords), Some(3.0));
    }

    #[test]
    fn test_expand_and_collapse() {
        let mut app = app();
        app.move_down();
        app.expand_current();
        assert_eq!(names(&app), vec!["Root", "Web", "Deep", "Empty"]);

        app.move_down();
        assert_eq!(app.tree_items[app.sidebar_selected_index].name, "Deep");
        // Collapsed leaf jumps to parent.
        app.collapse_current();
        assert_eq!(app.tree_items[app.sidebar_selected_index].name, "Web");
        app.collapse_current();
        assert_eq!(names(&app), vec!["Root", "Web", "Empty"]);
    }

    #[test]
    fn test_toggle_recursive_changes_scope() {
        let mut app = app();
        app.move_down();
        assert_eq!(stats(&app).value(StatKind::UniquePasswords), Some(2.0));
        app.toggle_recursive();
        assert!(!app.recursive);
        assert_eq!(stats(&app).value(StatKind::UniquePasswords), Some(1.0));
        assert_eq!(stats(&app).value(StatKind::DuplicatePasswords), Some(1.0));
    }

    #[test]
    fn test_empty_group_reports_no_data() {
        let mut app = app();
        app.move_down();
        app.move_down();
        assert_eq!(app.tree_items[app.sidebar_selected_index].name, "Empty");
        assert_eq!(app.stats, Some(Err(StatsError::NoData)));

        app.focus_stats();
        assert_eq!(app.focus, Focus::Sidebar);
    }

    #[test]
    fn test_open_entry_from_extended_stat() {
        let mut app = app();
        app.focus_stats();
        assert_eq!(app.focus, Focus::Stats);

        // Longest password is the first one seen: "rootpw".
        app.move_stat_down();
        app.open_selected_entry();
        assert_eq!(app.input_mode, InputMode::EntryPopup);
        let (entry, path) = app.popup_details().unwrap();
        assert_eq!(entry.title(), "r1");
        assert_eq!(path, "Root");

        app.close_popup();
        app.move_stat_up();
        app.open_selected_entry();
        let (entry, _) = app.popup_details().unwrap();
        assert_eq!(entry.title(), "d1");
    }

    #[test]
    fn test_unlock_failure_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("missing.kdbx"),
            ..Config::default()
        };
        let mut app = App::new(&config);
        app.password_input = "secret".to_string();
        assert!(!app.try_unlock());
        assert_eq!(app.state, AppState::Locked);
        assert!(app.password_input.is_empty());
        assert!(app.error_message.is_some());
    }
}
