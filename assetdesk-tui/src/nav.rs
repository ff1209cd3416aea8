//! Pages and page switching.

use assetdesk_core::BranchId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Dashboard,
    Assets,
    Branches,
    /// Drill-down from the branches page.
    BranchAssets(BranchId),
    Transfers,
    /// Only listed for roles that manage users.
    Users,
}

const TABS: [Page; 5] = [
    Page::Dashboard,
    Page::Assets,
    Page::Branches,
    Page::Transfers,
    Page::Users,
];

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Assets => "Assets",
            Page::Branches => "Branches",
            Page::BranchAssets(_) => "Branch Assets",
            Page::Transfers => "Transfers",
            Page::Users => "Users",
        }
    }

    /// Tab bar contents for the signed-in role.
    pub fn tabs(can_manage_users: bool) -> &'static [Page] {
        if can_manage_users {
            &TABS
        } else {
            &TABS[..TABS.len() - 1]
        }
    }

    pub fn is_allowed(&self, can_manage_users: bool) -> bool {
        !matches!(self, Page::Users) || can_manage_users
    }

    /// Position in the tab bar. A drill-down counts as its parent tab.
    pub fn index(&self) -> usize {
        let tab = match self {
            Page::BranchAssets(_) => Page::Branches,
            other => *other,
        };
        TABS.iter().position(|p| *p == tab).unwrap_or(0)
    }

    pub fn from_index(index: usize, can_manage_users: bool) -> Option<Page> {
        Self::tabs(can_manage_users).get(index).copied()
    }

    pub fn next(&self, can_manage_users: bool) -> Page {
        let tabs = Self::tabs(can_manage_users);
        let idx = self.index().min(tabs.len() - 1);
        tabs[(idx + 1) % tabs.len()]
    }

    pub fn previous(&self, can_manage_users: bool) -> Page {
        let tabs = Self::tabs(can_manage_users);
        let idx = self.index().min(tabs.len() - 1);
        let prev = if idx == 0 { tabs.len() - 1 } else { idx - 1 };
        tabs[prev]
    }

    /// Falls back to the dashboard when the role may not see this page.
    pub fn for_role(self, can_manage_users: bool) -> Page {
        if self.is_allowed(can_manage_users) {
            self
        } else {
            Page::Dashboard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetdesk_core::EntityIdType;

    #[test]
    fn users_tab_is_role_gated() {
        assert_eq!(Page::tabs(true).len(), 5);
        assert!(!Page::tabs(false).contains(&Page::Users));
        assert_eq!(Page::Transfers.next(false), Page::Dashboard);
        assert_eq!(Page::Transfers.next(true), Page::Users);
        assert_eq!(Page::Users.for_role(false), Page::Dashboard);
        assert_eq!(Page::from_index(4, false), None);
    }

    #[test]
    fn drill_down_cycles_like_its_parent() {
        let page = Page::BranchAssets(BranchId::new(3));
        assert_eq!(page.index(), Page::Branches.index());
        assert_eq!(page.next(false), Page::Transfers);
        assert_eq!(page.previous(false), Page::Assets);
    }
}
