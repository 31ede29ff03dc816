//! Plain open/closed records for dropdowns, drawers and disclosure panels.

#[cfg(test)]
#[path = "toggle_test.rs"]
mod toggle_test;

/// Generic open/closed flag (dropdowns, popovers).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub open: bool,
}

impl ToggleState {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Search filter dropdown that also tracks whether the query box has text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilterState {
    pub open: bool,
    pub has_query: bool,
}

impl SearchFilterState {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn open_dropdown(&mut self) {
        self.open = true;
    }

    pub fn close_dropdown(&mut self) {
        self.open = false;
    }

    pub fn update_has_query(&mut self, value: &str) {
        self.has_query = !value.is_empty();
    }
}

/// Mobile sidebar drawer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarState {
    pub sidebar_open: bool,
}

impl SidebarState {
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandableState {
    pub expanded: bool,
}

impl ExpandableState {
    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShowState {
    pub show: bool,
}

impl ShowState {
    pub fn toggle_show(&mut self) {
        self.show = !self.show;
    }

    pub fn close_show(&mut self) {
        self.show = false;
    }
}
