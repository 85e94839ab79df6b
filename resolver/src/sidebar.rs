use common::{WorkspaceDescriptor, WorkspaceId};
use tracing::{debug, info};
use uuid::Uuid;

/// Drop target id of the trash entry.
pub const DROPPABLE_SIDEBAR_TRASH: &str = "trash-folder";

/// Route builders for the per-workspace sub-pages.
pub struct SidebarPaths;

impl SidebarPaths {
    pub fn all(id: &WorkspaceId) -> String {
        format!("/workspace/{id}/all")
    }

    pub fn trash(id: &WorkspaceId) -> String {
        format!("/workspace/{id}/trash")
    }

    pub fn shared(id: &WorkspaceId) -> String {
        format!("/workspace/{id}/shared")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLink {
    pub label: &'static str,
    pub path: String,
    pub active: bool,
}

impl RouteLink {
    /// A link is highlighted when it is the current route, or while a page is
    /// being dragged over it.
    pub fn new(label: &'static str, path: String, current_path: &str, dragged_over: bool) -> Self {
        let active = dragged_over || current_path == path;
        Self { label, path, active }
    }
}

#[derive(Debug, Clone)]
pub struct Sidebar {
    open: bool,
    enable_new_setting_modal: bool,
    back: Vec<String>,
    forward: Vec<String>,
    current_path: String,
}

impl Sidebar {
    pub fn new(current_path: impl Into<String>, enable_new_setting_modal: bool) -> Self {
        Self {
            open: true,
            enable_new_setting_modal,
            back: Vec::new(),
            forward: Vec::new(),
            current_path: current_path.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Cmd+/ or Ctrl+/ toggles the sidebar. Returns whether the key was consumed.
    pub fn handle_shortcut(&mut self, key: char, meta: bool, ctrl: bool) -> bool {
        if key == '/' && (meta || ctrl) {
            self.open = !self.open;
            debug!(open = self.open, "toggled sidebar");
            true
        } else {
            false
        }
    }

    pub fn show_settings_entry(&self) -> bool {
        self.enable_new_setting_modal
    }

    pub fn links(&self, workspace: &WorkspaceDescriptor, trash_dragged_over: bool) -> Vec<RouteLink> {
        vec![
            RouteLink::new("All pages", SidebarPaths::all(&workspace.id), &self.current_path, false),
            RouteLink::new(
                "Trash",
                SidebarPaths::trash(&workspace.id),
                &self.current_path,
                trash_dragged_over,
            ),
        ]
    }

    /// Creates a page in the workspace and returns its id for opening.
    pub fn new_page(&self, workspace: &WorkspaceDescriptor) -> Uuid {
        let page = workspace.document.create_page("");
        info!(workspace = %workspace.id, page = %page.id, "created page from sidebar");
        page.id
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        let path = path.into();
        if path == self.current_path {
            return;
        }
        let previous = std::mem::replace(&mut self.current_path, path);
        self.back.push(previous);
        self.forward.clear();
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    pub fn back(&mut self) -> Option<&str> {
        let previous = self.back.pop()?;
        let current = std::mem::replace(&mut self.current_path, previous);
        self.forward.push(current);
        Some(&self.current_path)
    }

    pub fn forward(&mut self) -> Option<&str> {
        let next = self.forward.pop()?;
        let current = std::mem::replace(&mut self.current_path, next);
        self.back.push(current);
        Some(&self.current_path)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use common::{DocumentWorkspace, WorkspaceFlavour};

    use super::*;

    fn descriptor(flavour: WorkspaceFlavour) -> WorkspaceDescriptor {
        let id = WorkspaceId::new("w1");
        WorkspaceDescriptor {
            document: Arc::new(DocumentWorkspace::new(id.clone())),
            id,
            flavour,
        }
    }

    #[test]
    fn shortcut_toggles_with_modifier_only() {
        let mut sidebar = Sidebar::new("/", true);

        assert!(!sidebar.handle_shortcut('/', false, false));
        assert!(sidebar.is_open());

        assert!(sidebar.handle_shortcut('/', true, false));
        assert!(!sidebar.is_open());

        assert!(sidebar.handle_shortcut('/', false, true));
        assert!(sidebar.is_open());

        assert!(!sidebar.handle_shortcut('k', true, false));
    }

    #[test]
    fn links_mark_current_route_and_drag_target() {
        let ws = descriptor(WorkspaceFlavour::Local);
        let sidebar = Sidebar::new("/workspace/w1/all", true);

        let links = sidebar.links(&ws, false);
        assert!(links[0].active);
        assert!(!links[1].active);
        assert_eq!(links[1].path, "/workspace/w1/trash");

        let dragging = sidebar.links(&ws, true);
        assert!(dragging[1].active);
    }

    #[test]
    fn new_page_lands_in_document_handle() {
        let ws = descriptor(WorkspaceFlavour::Cloud);
        let sidebar = Sidebar::new("/", true);

        let page_id = sidebar.new_page(&ws);
        assert!(ws.document.page(page_id).is_some());
    }

    #[test]
    fn every_flavour_can_create_pages() {
        let sidebar = Sidebar::new("/", true);

        for flavour in [WorkspaceFlavour::Local, WorkspaceFlavour::Cloud, WorkspaceFlavour::Public] {
            let ws = descriptor(flavour);
            let page_id = sidebar.new_page(&ws);
            assert_eq!(ws.document.pages().len(), 1);
            assert!(ws.document.page(page_id).is_some());
        }
    }

    #[test]
    fn history_back_and_forward() {
        let mut sidebar = Sidebar::new("/a", true);
        sidebar.navigate("/b");
        sidebar.navigate("/c");

        assert_eq!(sidebar.back(), Some("/b"));
        assert_eq!(sidebar.back(), Some("/a"));
        assert_eq!(sidebar.back(), None);
        assert_eq!(sidebar.forward(), Some("/b"));

        sidebar.navigate("/d");
        assert!(!sidebar.can_go_forward());
        assert!(sidebar.can_go_back());
    }

    #[test]
    fn shared_path() {
        assert_eq!(SidebarPaths::shared(&WorkspaceId::new("w9")), "/workspace/w9/shared");
    }
}
