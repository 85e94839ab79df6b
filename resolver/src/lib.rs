pub mod broadcaster;
pub mod config;
pub mod logging;
pub mod members;
pub mod metadata;
pub mod provider;
pub mod resolver;
pub mod sidebar;
pub mod state;
pub mod subscriber;

pub use config::ResolverConfig;
pub use metadata::{InMemoryMetadataStore, JsonFileMetadataStore, MetadataStore};
pub use provider::{DocumentProvider, DocumentRegistry};
pub use resolver::{ResolveState, WorkspaceResolver};
pub use state::AppContext;
pub use subscriber::{ResolveEvent, Subscription};
