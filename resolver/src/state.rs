// Application-session state. Built once at startup and passed to whatever
// needs a workspace descriptor; nothing here is process-global.

use std::sync::Arc;

use common::error::ResolveError;
use common::{WorkspaceDescriptor, WorkspaceId};
use tracing::info;

use crate::config::ResolverConfig;
use crate::members::MembersPanel;
use crate::metadata::{InMemoryMetadataStore, JsonFileMetadataStore, MetadataStore};
use crate::provider::{DocumentProvider, DocumentRegistry};
use crate::resolver::WorkspaceResolver;
use crate::sidebar::{Sidebar, SidebarPaths};
use crate::subscriber::Subscription;

pub struct AppContext {
    config: ResolverConfig,
    documents: Arc<dyn DocumentProvider>,
    resolver: WorkspaceResolver,
}

impl AppContext {
    pub fn new(
        config: ResolverConfig,
        metadata: Arc<dyn MetadataStore>,
        documents: Arc<dyn DocumentProvider>,
    ) -> Self {
        let resolver = WorkspaceResolver::new(metadata, Arc::clone(&documents));
        Self {
            config,
            documents,
            resolver,
        }
    }

    /// Wires the stores named by `config`: the JSON workspace list when a
    /// path is configured, an empty in-memory list otherwise.
    pub fn from_config(config: ResolverConfig) -> Self {
        let metadata: Arc<dyn MetadataStore> = match &config.metadata_path {
            Some(path) => {
                info!(path = %path.display(), "using workspace metadata file");
                Arc::new(JsonFileMetadataStore::new(path))
            }
            None => {
                info!("no metadata file configured, starting with an empty workspace list");
                Arc::new(InMemoryMetadataStore::default())
            }
        };

        Self::new(config, metadata, Arc::new(DocumentRegistry::new()))
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolver(&self) -> &WorkspaceResolver {
        &self.resolver
    }

    pub fn documents(&self) -> &Arc<dyn DocumentProvider> {
        &self.documents
    }

    pub async fn workspace(&self, id: &WorkspaceId) -> Result<Arc<WorkspaceDescriptor>, ResolveError> {
        self.resolver.resolve(id).await
    }

    pub fn close_workspace(&self, id: &WorkspaceId) -> bool {
        self.resolver.close_workspace(id)
    }

    /// Subscribes with the configured channel bound.
    pub fn subscribe(&self) -> Subscription {
        self.resolver.subscribe(self.config.subscriber_capacity)
    }

    pub fn members_panel(&self, workspace: &WorkspaceDescriptor, is_owner: bool) -> MembersPanel {
        MembersPanel::with_page_size(workspace, is_owner, self.config.members.page_size)
    }

    /// Sidebar opened on the "all pages" route of `workspace`.
    pub fn sidebar(&self, workspace: &WorkspaceDescriptor) -> Sidebar {
        Sidebar::new(
            SidebarPaths::all(&workspace.id),
            self.config.sidebar.enable_new_setting_modal,
        )
    }
}
