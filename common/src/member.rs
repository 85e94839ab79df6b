use serde::{Deserialize, Serialize};

/// Permission level of a workspace member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Read,
    Write,
    Admin,
    Owner,
}

/// A member (or pending invitee) of a cloud workspace, as returned by the
/// member service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// False while the invitation has not been accepted.
    pub accepted: bool,
    pub permission: Permission,
}
