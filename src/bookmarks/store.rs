//! Ordered entry list with group runs, boundary cursors and a path index.
//!
//! The store is the only place that mutates the list. Every structural
//! operation recomputes the boundary cursors and the path index before it
//! announces the change, so cursors and rows are never observed out of sync.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use super::events::{ModelBroadcaster, ModelEvent};
use super::types::{BookmarkEntry, BookmarkGroup, GroupOrder, Role, RoleData};

/// Positions of the group runs inside the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    /// First row of the external device run (insertion point when empty).
    pub first_external: usize,
    /// First row of the user-defined run (insertion point when empty).
    pub first_user_defined: usize,
    /// Last row of the user-defined run, `None` when the run is empty.
    pub last_user_defined: Option<usize>,
}

pub struct EntryStore {
    entries: Vec<BookmarkEntry>,
    order: GroupOrder,
    external: Range<usize>,
    user: Range<usize>,
    /// Path of every user-defined entry mapped to its row.
    lookup: HashMap<String, usize>,
    events: ModelBroadcaster,
}

impl EntryStore {
    pub fn new(order: GroupOrder, events: ModelBroadcaster) -> Self {
        Self {
            entries: Vec::new(),
            order,
            external: 0..0,
            user: 0..0,
            lookup: HashMap::new(),
            events,
        }
    }

    /// Replace the whole list in one step.
    ///
    /// Locations and user entries are laid out following the group order,
    /// the external run starts empty. Announced as a single reset.
    pub fn reset(&mut self, locations: Vec<BookmarkEntry>, user_entries: Vec<BookmarkEntry>) {
        let mut locations = Some(locations);
        let mut user_entries = Some(user_entries);
        let mut entries = Vec::new();

        for group in self.order.runs() {
            match group {
                BookmarkGroup::Location => entries.extend(locations.take().unwrap_or_default()),
                BookmarkGroup::Bookmark => {
                    entries.extend(user_entries.take().unwrap_or_default())
                }
                BookmarkGroup::External | BookmarkGroup::Temporary => {}
            }
        }

        self.entries = entries;
        self.recompute();
        self.events.send(ModelEvent::Reset);
    }

    pub fn order(&self) -> &GroupOrder {
        &self.order
    }

    /// Replace the group order. Takes effect on the next [`reset`](Self::reset).
    pub fn set_order(&mut self, order: GroupOrder) {
        self.order = order;
    }

    pub fn events(&self) -> &ModelBroadcaster {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&BookmarkEntry> {
        self.entries.get(row)
    }

    pub fn entries(&self) -> &[BookmarkEntry] {
        &self.entries
    }

    /// Field access for list views.
    pub fn data(&self, row: usize, role: Role) -> Option<RoleData> {
        self.entries.get(row).map(|entry| RoleData::of(entry, role))
    }

    pub fn boundaries(&self) -> Boundaries {
        Boundaries {
            first_external: self.external.start,
            first_user_defined: self.user.start,
            last_user_defined: (!self.user.is_empty()).then(|| self.user.end - 1),
        }
    }

    pub fn user_rows(&self) -> Range<usize> {
        self.user.clone()
    }

    pub fn external_rows(&self) -> Range<usize> {
        self.external.clone()
    }

    pub fn contains_user_path(&self, path: &str) -> bool {
        self.lookup.contains_key(path)
    }

    pub fn user_row(&self, path: &str) -> Option<usize> {
        self.lookup.get(path).copied()
    }

    pub fn user_entry(&self, path: &str) -> Option<&BookmarkEntry> {
        self.user_row(path).and_then(|row| self.entries.get(row))
    }

    /// Permanent user entries in list order.
    pub fn permanent_entries(&self) -> impl Iterator<Item = &BookmarkEntry> {
        self.entries[self.user.clone()]
            .iter()
            .filter(|e| e.group == BookmarkGroup::Bookmark && !e.path.is_empty())
    }

    /// Temporary user entries in list order.
    pub fn temporary_entries(&self) -> impl Iterator<Item = &BookmarkEntry> {
        self.entries[self.user.clone()]
            .iter()
            .filter(|e| e.group == BookmarkGroup::Temporary)
    }

    /// Insert a user entry. Permanent entries go to the end of the user run,
    /// temporary ones to its start. Returns the new row, or `None` if the
    /// path is empty or already present.
    pub fn insert_user(&mut self, entry: BookmarkEntry) -> Option<usize> {
        if entry.path.is_empty() || self.lookup.contains_key(&entry.path) {
            return None;
        }

        let temporary = entry.group == BookmarkGroup::Temporary;
        let row = if temporary {
            self.user.start
        } else {
            self.user.end
        };

        self.entries.insert(row, entry);
        self.recompute();
        self.events.send(ModelEvent::RowsInserted {
            first: row,
            last: row,
        });
        if temporary {
            self.events.send(ModelEvent::TemporaryAdded { row });
        }

        Some(row)
    }

    /// Remove the user entry with this path.
    pub fn remove_user(&mut self, path: &str) -> Option<BookmarkEntry> {
        let row = self.user_row(path)?;
        let removed = self.entries.remove(row);
        self.recompute();
        self.events.send(ModelEvent::RowsRemoved {
            first: row,
            last: row,
        });
        Some(removed)
    }

    /// Rename the user entry with this path. Empty names are rejected.
    pub fn rename_user(&mut self, path: &str, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let Some(row) = self.user_row(path) else {
            return false;
        };

        self.entries[row].name = name.to_string();
        self.events.send(ModelEvent::DataChanged {
            row,
            roles: vec![Role::Name],
        });
        true
    }

    /// Move a row within the user run.
    pub fn move_user(&mut self, from: usize, to: usize) -> bool {
        if from == to || !self.user.contains(&from) || !self.user.contains(&to) {
            return false;
        }

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.recompute();
        self.events.send(ModelEvent::RowMoved { from, to });
        true
    }

    /// Remove every temporary entry. Returns how many were removed.
    pub fn clear_temporary(&mut self) -> usize {
        let rows: Vec<usize> = self
            .user
            .clone()
            .filter(|row| self.entries[*row].group == BookmarkGroup::Temporary)
            .collect();

        if rows.is_empty() {
            return 0;
        }

        let mut row_index = 0;
        self.entries.retain(|_| {
            let keep = !rows.contains(&row_index);
            row_index += 1;
            keep
        });
        self.recompute();

        // Highest rows first so each announced index is still valid
        for row in rows.iter().rev() {
            self.events.send(ModelEvent::RowsRemoved {
                first: *row,
                last: *row,
            });
        }

        rows.len()
    }

    /// Paths of all external entries.
    pub fn external_paths(&self) -> HashSet<String> {
        self.entries[self.external.clone()]
            .iter()
            .map(|e| e.path.clone())
            .collect()
    }

    /// Append an external device entry to the end of the external run.
    ///
    /// Returns `None` when the group order hides external devices.
    pub fn insert_external(&mut self, entry: BookmarkEntry) -> Option<usize> {
        if !self.order.contains(BookmarkGroup::External) || entry.group != BookmarkGroup::External
        {
            return None;
        }

        let row = self.external.end;
        self.entries.insert(row, entry);
        self.recompute();
        self.events.send(ModelEvent::RowsInserted {
            first: row,
            last: row,
        });
        Some(row)
    }

    /// Remove the external entry with this path.
    pub fn remove_external(&mut self, path: &str) -> Option<BookmarkEntry> {
        let row = self
            .external
            .clone()
            .find(|row| self.entries[*row].path == path)?;

        let removed = self.entries.remove(row);
        self.recompute();
        self.events.send(ModelEvent::RowsRemoved {
            first: row,
            last: row,
        });
        Some(removed)
    }

    /// Apply a field update to a non user-defined row.
    ///
    /// The closure returns the roles it changed; nothing is announced when it
    /// returns none. User-defined rows are keyed by path and cannot be
    /// updated this way.
    pub fn update_row<F>(&mut self, row: usize, update: F) -> bool
    where
        F: FnOnce(&mut BookmarkEntry) -> Vec<Role>,
    {
        let Some(entry) = self.entries.get_mut(row) else {
            return false;
        };
        if entry.user_defined {
            return false;
        }

        let roles = update(entry);
        if roles.is_empty() {
            return false;
        }

        self.events.send(ModelEvent::DataChanged { row, roles });
        true
    }

    /// Rows of the location run.
    pub fn location_rows(&self) -> Vec<usize> {
        (0..self.entries.len())
            .filter(|row| self.entries[*row].group == BookmarkGroup::Location)
            .collect()
    }

    /// Recompute run boundaries and the path index from the rows.
    fn recompute(&mut self) {
        let mut pos = 0;
        let mut external = None;
        let mut user = None;

        for group in self.order.runs() {
            let start = pos;
            while pos < self.entries.len() && run_accepts(group, self.entries[pos].group) {
                pos += 1;
            }

            match group {
                BookmarkGroup::External => external = Some(start..pos),
                BookmarkGroup::Bookmark => user = Some(start..pos),
                _ => {}
            }
        }

        let user = user.unwrap_or(pos..pos);
        self.external = external.unwrap_or(user.start..user.start);
        self.user = user;

        self.lookup = self.entries[self.user.clone()]
            .iter()
            .enumerate()
            .map(|(offset, entry)| (entry.path.clone(), self.user.start + offset))
            .collect();
    }

    /// Every row sits inside the run of its group and the index matches.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let runs_ok = self.entries.iter().enumerate().all(|(row, entry)| match entry.group {
            BookmarkGroup::External => self.external.contains(&row),
            BookmarkGroup::Bookmark | BookmarkGroup::Temporary => self.user.contains(&row),
            BookmarkGroup::Location => !self.external.contains(&row) && !self.user.contains(&row),
        });
        let index_ok = self.lookup.len() == self.user.len()
            && self
                .lookup
                .iter()
                .all(|(path, row)| self.entries[*row].path == *path);
        runs_ok && index_ok
    }
}

fn run_accepts(run: BookmarkGroup, group: BookmarkGroup) -> bool {
    match run {
        BookmarkGroup::Bookmark => group.is_user_defined(),
        other => other == group,
    }
}
