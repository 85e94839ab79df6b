pub mod document;
pub use document::{DocumentWorkspace, Page};

pub mod error;

pub mod member;
pub use member::{Member, Permission};

pub mod workspace;
pub use workspace::{WorkspaceDescriptor, WorkspaceFlavour, WorkspaceId, WorkspaceMetadata};
