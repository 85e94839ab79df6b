use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::error::MemberError;
use common::{Member, Permission, WorkspaceFlavour, WorkspaceId, WorkspaceMetadata};
use resolver::members::{MemberService, MemberStatus, MembersPanel, NotificationKind};
use resolver::{AppContext, DocumentRegistry, InMemoryMetadataStore, ResolverConfig};

#[derive(Default)]
struct FakeMembers {
    members: Mutex<Vec<Member>>,
    invites: Mutex<Vec<(String, Permission, bool)>>,
    reject_invites: bool,
}

impl FakeMembers {
    fn with_members(count: usize) -> Self {
        let members = (0..count)
            .map(|i| Member {
                id: format!("u{i}"),
                name: format!("User {i}"),
                email: format!("u{i}@example.com"),
                email_verified: i % 2 == 0,
                avatar_url: None,
                accepted: i != 3,
                permission: if i == 0 { Permission::Owner } else { Permission::Write },
            })
            .collect();
        Self {
            members: Mutex::new(members),
            ..Self::default()
        }
    }
}

#[async_trait]
impl MemberService for FakeMembers {
    async fn member_count(&self, _: &WorkspaceId) -> Result<usize, MemberError> {
        Ok(self.members.lock().unwrap().len())
    }

    async fn members(&self, _: &WorkspaceId, skip: usize, take: usize) -> Result<Vec<Member>, MemberError> {
        Ok(self.members.lock().unwrap().iter().skip(skip).take(take).cloned().collect())
    }

    async fn invite(
        &self,
        _: &WorkspaceId,
        email: &str,
        permission: Permission,
        send_invite_email: bool,
    ) -> Result<bool, MemberError> {
        if self.reject_invites {
            return Ok(false);
        }
        self.invites
            .lock()
            .unwrap()
            .push((email.to_string(), permission, send_invite_email));
        Ok(true)
    }

    async fn revoke(&self, _: &WorkspaceId, member_id: &str) -> Result<bool, MemberError> {
        let mut members = self.members.lock().unwrap();
        let before = members.len();
        members.retain(|m| m.id != member_id);
        if members.len() == before {
            return Err(MemberError::NotFound(member_id.to_string()));
        }
        Ok(true)
    }
}

fn context() -> AppContext {
    let metadata = Arc::new(InMemoryMetadataStore::new(vec![
        WorkspaceMetadata::new("local-ws", WorkspaceFlavour::Local),
        WorkspaceMetadata::new("cloud-ws", WorkspaceFlavour::Cloud),
    ]));
    AppContext::new(ResolverConfig::default(), metadata, Arc::new(DocumentRegistry::new()))
}

async fn cloud_panel(ctx: &AppContext, is_owner: bool) -> resolver::members::CloudMembersPanel {
    let ws = ctx.workspace(&WorkspaceId::new("cloud-ws")).await.unwrap();
    match ctx.members_panel(&ws, is_owner) {
        MembersPanel::Cloud(panel) => panel,
        MembersPanel::Local(_) => panic!("expected the cloud panel"),
    }
}

#[tokio::test]
async fn local_workspace_gets_placeholder() {
    let ctx = context();
    let ws = ctx.workspace(&WorkspaceId::new("local-ws")).await.unwrap();

    match ctx.members_panel(&ws, true) {
        MembersPanel::Local(panel) => {
            assert_eq!(panel.heading(), "Members (0)");
            assert!(!panel.can_invite());
        }
        MembersPanel::Cloud(_) => panic!("local workspace got the cloud panel"),
    }
}

#[tokio::test]
async fn rows_page_through_members() {
    let ctx = context();
    let service = FakeMembers::with_members(10);
    let mut panel = cloud_panel(&ctx, true).await;

    let page = panel.load(&service, "u0").await.unwrap();
    assert_eq!(page.member_count, 10);
    assert_eq!(page.heading, "Members (10)");
    assert_eq!(page.page_count, 2);
    assert_eq!(page.fallback_height, Some(506));

    let first_page = page.rows;
    assert_eq!(first_page.len(), 8);
    assert_eq!(first_page[0].status, MemberStatus::Owner);
    assert!(!first_page[0].can_revoke);
    assert_eq!(first_page[1].display_name, "u1@example.com");
    assert_eq!(first_page[2].display_name, "User 2");
    assert_eq!(first_page[2].email.as_deref(), Some("u2@example.com"));
    assert_eq!(first_page[3].status.label(), "Pending");
    assert!(first_page[3].can_revoke);

    panel.on_page_change(8);
    let second_page = panel.load(&service, "u0").await.unwrap();
    assert_eq!(second_page.heading, "Members (10)");
    assert_eq!(second_page.rows.len(), 2);
    assert_eq!(second_page.rows[0].member_id, "u8");
}

#[tokio::test]
async fn small_workspace_sizes_to_content() {
    let ctx = context();
    let service = FakeMembers::with_members(3);
    let panel = cloud_panel(&ctx, false).await;

    assert_eq!(panel.member_count(&service).await.unwrap(), 3);

    let page = panel.load(&service, "u1").await.unwrap();
    assert_eq!(page.heading, "Members (3)");
    assert_eq!(page.page_count, 1);
    assert_eq!(page.fallback_height, None);
    assert!(page.rows.iter().all(|row| !row.can_revoke));
}

#[tokio::test]
async fn owner_invites_with_email() {
    let ctx = context();
    let service = FakeMembers::default();
    let mut panel = cloud_panel(&ctx, true).await;
    panel.open_invite();

    let notification = panel
        .confirm_invite(&service, "new@example.com", Permission::Write)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(notification.title, "Invitation sent");
    assert_eq!(notification.kind, NotificationKind::Success);
    assert!(!panel.is_invite_open());
    assert_eq!(
        service.invites.lock().unwrap().as_slice(),
        &[("new@example.com".to_string(), Permission::Write, true)]
    );
}

#[tokio::test]
async fn rejected_invite_keeps_dialog_open() {
    let ctx = context();
    let service = FakeMembers {
        reject_invites: true,
        ..FakeMembers::default()
    };
    let mut panel = cloud_panel(&ctx, true).await;
    panel.open_invite();

    let outcome = panel
        .confirm_invite(&service, "new@example.com", Permission::Read)
        .await
        .unwrap();

    assert!(outcome.is_none());
    assert!(panel.is_invite_open());
}

#[tokio::test]
async fn revoke_notifies_and_propagates_errors() {
    let ctx = context();
    let service = FakeMembers::with_members(3);
    let panel = cloud_panel(&ctx, true).await;

    let notification = panel.revoke(&service, "u2").await.unwrap().unwrap();
    assert_eq!(notification.title, "Removed successfully");
    assert_eq!(panel.member_count(&service).await.unwrap(), 2);

    let err = panel.revoke(&service, "u2").await.unwrap_err();
    assert!(matches!(err, MemberError::NotFound(id) if id == "u2"));
}
