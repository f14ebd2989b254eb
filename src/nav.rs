// src/nav.rs
use std::fmt;

use crate::session::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Drivers,
    Trucks,
    Assignments,
    Login,
    Register,
    Logout,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Drivers => "/drivers",
            Page::Trucks => "/trucks",
            Page::Assignments => "/assignments",
            Page::Login => "/login",
            Page::Register => "/register",
            Page::Logout => "/logout",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Drivers => "Drivers",
            Page::Trucks => "Trucks",
            Page::Assignments => "Assignments",
            Page::Login => "Login",
            Page::Register => "Register",
            Page::Logout => "Logout",
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Page::Drivers | Page::Trucks)
    }

    pub fn allowed_for(&self, role: Option<&Role>) -> bool {
        !self.requires_admin() || role.is_some_and(Role::is_admin)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Menu entries in display order for the given role.
pub fn menu(role: Option<&Role>) -> Vec<Page> {
    let mut items = vec![Page::Home];
    if role.is_some_and(Role::is_admin) {
        items.extend([Page::Drivers, Page::Trucks]);
    }
    items.push(Page::Assignments);
    items.push(Page::Register);
    items.push(if role.is_some() { Page::Logout } else { Page::Login });
    items
}

/// Maps a path to the page that renders for it. Unknown paths and pages the
/// role may not see land on Home.
pub fn resolve(path: &str, role: Option<&Role>) -> Page {
    let path = path.trim().trim_end_matches('/');
    let page = match path {
        "" => Page::Home,
        "/drivers" => Page::Drivers,
        "/trucks" => Page::Trucks,
        "/assignments" => Page::Assignments,
        "/login" => Page::Login,
        "/register" => Page::Register,
        _ => Page::Home,
    };
    if page.allowed_for(role) {
        page
    } else {
        Page::Home
    }
}
