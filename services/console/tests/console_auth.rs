mod common;

use console_lib::adapters::MemorySessionSlot;
use console_lib::config::Config;
use console_lib::error::ConsoleError;
use recordkeep_core::domain::{NewUser, Role, SessionUser, UserPatch};
use recordkeep_core::ports::SessionSlot;
use std::sync::Arc;

#[tokio::test]
async fn login_yields_session_without_password() {
    let slot = Arc::new(MemorySessionSlot::new());
    let mut ctx = common::context_with(common::seed(), slot.clone()).await;

    let user = ctx.login("moderator", "mod123").await.unwrap();
    assert_eq!(user.role, Role::Moderator);
    assert_eq!(ctx.current_user(), Some(&user));

    let key = Config::default().session_key;
    let blob = slot.read(&key).await.unwrap().expect("session should be persisted");
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert!(json.get("password").is_none());
    assert_eq!(json["username"], "moderator");
    assert_eq!(json["role"], "moderator");
}

#[tokio::test]
async fn wrong_credentials_leave_state_unchanged() {
    let mut ctx = common::context().await;
    assert!(matches!(
        ctx.login("admin", "nope").await,
        Err(ConsoleError::AuthenticationFailure)
    ));
    assert!(ctx.current_user().is_none());

    ctx.login("viewer", "user123").await.unwrap();
    assert!(matches!(
        ctx.login("ghost", "user123").await,
        Err(ConsoleError::AuthenticationFailure)
    ));
    assert_eq!(ctx.current_user().unwrap().username, "viewer");
}

#[tokio::test]
async fn logout_clears_session_and_slot() {
    let slot = Arc::new(MemorySessionSlot::new());
    let mut ctx = common::context_with(common::seed(), slot.clone()).await;
    ctx.login("admin", "admin123").await.unwrap();

    ctx.logout().await.unwrap();
    assert!(ctx.current_user().is_none());
    assert!(slot
        .read(&Config::default().session_key)
        .await
        .unwrap()
        .is_none());

    // Logging out twice is harmless.
    ctx.logout().await.unwrap();
}

#[tokio::test]
async fn session_survives_a_new_context_over_the_same_slot() {
    let slot = Arc::new(MemorySessionSlot::new());
    {
        let mut first = common::context_with(common::seed(), slot.clone()).await;
        first.login("viewer", "user123").await.unwrap();
    }

    let restored = common::context_with(common::seed(), slot.clone()).await;
    let user = restored.current_user().expect("session should be restored");
    assert_eq!(
        user,
        &SessionUser {
            id: 3,
            username: "viewer".into(),
            name: "viewer account".into(),
            role: Role::User,
        }
    );
}

#[tokio::test]
async fn unreadable_session_blob_is_discarded() {
    let slot = Arc::new(MemorySessionSlot::new());
    let key = Config::default().session_key;
    slot.write(&key, "{not json").await.unwrap();

    let ctx = common::context_with(common::seed(), slot.clone()).await;
    assert!(ctx.current_user().is_none());
    assert!(slot.read(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn accounts_created_through_the_console_use_hashed_passwords() {
    let mut ctx = common::logged_in_as("admin", "admin123").await;
    let created = ctx
        .add_user(NewUser {
            username: "auditor".into(),
            password: "audit-pass".into(),
            name: "Auditor".into(),
            role: Role::User,
        })
        .unwrap();
    assert_eq!(created.id, 4);

    let stored = ctx.store().users().get(4).unwrap();
    assert!(stored.password.starts_with("$argon2"));

    let session = ctx.login("auditor", "audit-pass").await.unwrap();
    assert_eq!(session.role, Role::User);
}

#[tokio::test]
async fn blank_password_in_user_update_keeps_the_old_one() {
    let mut ctx = common::logged_in_as("admin", "admin123").await;
    ctx.update_user(
        3,
        UserPatch {
            name: Some("Renamed".into()),
            password: Some(String::new()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(ctx.store().users().get(3).unwrap().password, "user123");
    let session = ctx.login("viewer", "user123").await.unwrap();
    assert_eq!(session.name, "Renamed");
}
