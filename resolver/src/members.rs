//! Member management panel for workspace settings.
//!
//! Local workspaces have no members and get a disabled placeholder; every
//! other flavour gets the cloud panel, which pages through members and drives
//! invite/revoke through a [`MemberService`].

use async_trait::async_trait;
use common::error::MemberError;
use common::{Member, Permission, WorkspaceDescriptor, WorkspaceId};
use tracing::{info, warn};

pub const COUNT_PER_PAGE: usize = 8;

const MEMBER_ROW_HEIGHT: usize = 58;
const MEMBER_ROW_GAP: usize = 6;

/// Remote member operations of a cloud workspace.
#[async_trait]
pub trait MemberService: Send + Sync {
    async fn member_count(&self, workspace_id: &WorkspaceId) -> Result<usize, MemberError>;

    async fn members(
        &self,
        workspace_id: &WorkspaceId,
        skip: usize,
        take: usize,
    ) -> Result<Vec<Member>, MemberError>;

    /// Returns whether the invitation was accepted by the service.
    async fn invite(
        &self,
        workspace_id: &WorkspaceId,
        email: &str,
        permission: Permission,
        send_invite_email: bool,
    ) -> Result<bool, MemberError>;

    /// Returns whether the member's permission was revoked.
    async fn revoke(&self, workspace_id: &WorkspaceId, member_id: &str) -> Result<bool, MemberError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: Option<String>,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Owner,
    Member,
    Pending,
}

impl MemberStatus {
    pub fn of(member: &Member) -> Self {
        if !member.accepted {
            MemberStatus::Pending
        } else if member.permission == Permission::Owner {
            MemberStatus::Owner
        } else {
            MemberStatus::Member
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemberStatus::Owner => "Workspace Owner",
            MemberStatus::Member => "Member",
            MemberStatus::Pending => "Pending",
        }
    }
}

/// One rendered line of the member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub member_id: String,
    /// Name once the email is verified, the email address before that.
    pub display_name: String,
    /// Shown under the name; only present for verified members.
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub status: MemberStatus,
    /// Owners may remove anyone but themselves.
    pub can_revoke: bool,
}

impl MemberRow {
    pub fn new(member: &Member, is_owner: bool, current_user_id: &str) -> Self {
        let (display_name, email) = if member.email_verified {
            (member.name.clone(), Some(member.email.clone()))
        } else {
            (member.email.clone(), None)
        };

        Self {
            member_id: member.id.clone(),
            display_name,
            email,
            avatar_url: member.avatar_url.clone(),
            status: MemberStatus::of(member),
            can_revoke: is_owner && current_user_id != member.id,
        }
    }
}

/// One loaded page of the cloud panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersPage {
    pub member_count: usize,
    pub heading: String,
    pub page_count: usize,
    pub fallback_height: Option<usize>,
    pub rows: Vec<MemberRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembersPanel {
    Local(LocalMembersPanel),
    Cloud(CloudMembersPanel),
}

impl MembersPanel {
    pub fn for_workspace(workspace: &WorkspaceDescriptor, is_owner: bool) -> Self {
        Self::with_page_size(workspace, is_owner, COUNT_PER_PAGE)
    }

    pub fn with_page_size(workspace: &WorkspaceDescriptor, is_owner: bool, page_size: usize) -> Self {
        if workspace.is_local() {
            MembersPanel::Local(LocalMembersPanel)
        } else {
            MembersPanel::Cloud(CloudMembersPanel::new(
                workspace.id.clone(),
                is_owner,
                page_size,
            ))
        }
    }

    pub fn variant(&self) -> &'static str {
        match self {
            MembersPanel::Local(_) => "local",
            MembersPanel::Cloud(_) => "cloud",
        }
    }
}

/// Placeholder shown for local workspaces: zero members, invite disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMembersPanel;

impl LocalMembersPanel {
    pub fn heading(&self) -> String {
        "Members (0)".to_string()
    }

    pub fn tooltip(&self) -> &'static str {
        "Enable cloud sync for this workspace to invite members"
    }

    pub fn can_invite(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudMembersPanel {
    workspace_id: WorkspaceId,
    is_owner: bool,
    page_size: usize,
    skip: usize,
    invite_open: bool,
}

impl CloudMembersPanel {
    pub fn new(workspace_id: WorkspaceId, is_owner: bool, page_size: usize) -> Self {
        Self {
            workspace_id,
            is_owner,
            page_size: page_size.max(1),
            skip: 0,
            invite_open: false,
        }
    }

    pub fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    pub fn heading(&self, member_count: usize) -> String {
        format!("Members ({member_count})")
    }

    pub fn can_invite(&self) -> bool {
        self.is_owner
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn is_invite_open(&self) -> bool {
        self.invite_open
    }

    /// Opens the invite dialog. Non-owners cannot invite, so this is a no-op for them.
    pub fn open_invite(&mut self) {
        if self.is_owner {
            self.invite_open = true;
        }
    }

    pub fn close_invite(&mut self) {
        self.invite_open = false;
    }

    pub fn on_page_change(&mut self, offset: usize) {
        self.skip = offset;
    }

    /// Height reserved while the member list loads, so the page does not jump.
    /// `None` means size to content.
    pub fn fallback_height(&self, member_count: usize) -> Option<usize> {
        if member_count > self.page_size {
            Some(self.page_size * MEMBER_ROW_HEIGHT + (self.page_size - 1) * MEMBER_ROW_GAP)
        } else {
            None
        }
    }

    pub fn page_count(&self, member_count: usize) -> usize {
        member_count.div_ceil(self.page_size)
    }

    /// Asks the service how many members the workspace has.
    pub async fn member_count<S>(&self, service: &S) -> Result<usize, MemberError>
    where
        S: MemberService + ?Sized,
    {
        service.member_count(&self.workspace_id).await
    }

    /// Loads everything the panel shows for the current page: the count that
    /// drives heading, pagination and loading fallback, plus the page's rows.
    pub async fn load<S>(&self, service: &S, current_user_id: &str) -> Result<MembersPage, MemberError>
    where
        S: MemberService + ?Sized,
    {
        let member_count = self.member_count(service).await?;
        let rows = self.member_rows(service, current_user_id).await?;

        Ok(MembersPage {
            heading: self.heading(member_count),
            page_count: self.page_count(member_count),
            fallback_height: self.fallback_height(member_count),
            member_count,
            rows,
        })
    }

    pub async fn member_rows<S>(&self, service: &S, current_user_id: &str) -> Result<Vec<MemberRow>, MemberError>
    where
        S: MemberService + ?Sized,
    {
        let members = service
            .members(&self.workspace_id, self.skip, self.page_size)
            .await?;

        Ok(members
            .iter()
            .map(|member| MemberRow::new(member, self.is_owner, current_user_id))
            .collect())
    }

    /// Sends an invitation with the invite email enabled. On success the
    /// dialog closes and a notification is returned.
    pub async fn confirm_invite<S>(
        &mut self,
        service: &S,
        email: &str,
        permission: Permission,
    ) -> Result<Option<Notification>, MemberError>
    where
        S: MemberService + ?Sized,
    {
        if !service
            .invite(&self.workspace_id, email, permission, true)
            .await?
        {
            warn!(workspace = %self.workspace_id, "invitation was not accepted by the member service");
            return Ok(None);
        }

        info!(workspace = %self.workspace_id, ?permission, "invitation sent");
        self.invite_open = false;

        Ok(Some(Notification {
            title: "Invitation sent".to_string(),
            message: Some("Invited members will collaborate with you in current workspace".to_string()),
            kind: NotificationKind::Success,
        }))
    }

    pub async fn revoke<S>(&self, service: &S, member_id: &str) -> Result<Option<Notification>, MemberError>
    where
        S: MemberService + ?Sized,
    {
        if !service.revoke(&self.workspace_id, member_id).await? {
            return Ok(None);
        }

        info!(workspace = %self.workspace_id, member = member_id, "member removed");
        Ok(Some(Notification {
            title: "Removed successfully".to_string(),
            message: None,
            kind: NotificationKind::Success,
        }))
    }
}
