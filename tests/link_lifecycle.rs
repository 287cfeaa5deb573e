mod common;

use chrono::Duration;
use common::RecordingInvalidator;
use link_management_service::application::services::{CreateLink, LinkService};
use link_management_service::domain::entities::{AliasKind, Identity, Owner};
use link_management_service::domain::policy::LinkPolicy;
use link_management_service::domain::repositories::LinkRepository;
use link_management_service::error::AppError;
use link_management_service::infrastructure::cache::{DispatchMode, InvalidationDispatcher};
use link_management_service::infrastructure::persistence::MemoryLinkRepository;
use std::collections::HashSet;
use std::sync::Arc;

fn service(
    repo: &MemoryLinkRepository,
    invalidator: Arc<RecordingInvalidator>,
    mode: DispatchMode,
) -> Arc<LinkService<MemoryLinkRepository>> {
    let dispatcher =
        InvalidationDispatcher::new(invalidator, std::time::Duration::from_secs(1)).with_mode(mode);
    Arc::new(LinkService::new(
        Arc::new(repo.clone()),
        dispatcher,
        LinkPolicy::default(),
    ))
}

fn request(alias: Option<&str>) -> CreateLink {
    CreateLink {
        original_url: "https://example.com".to_string(),
        custom_alias: alias.map(str::to_string),
    }
}

#[tokio::test]
async fn test_generated_codes_are_unique() {
    let repo = MemoryLinkRepository::new();
    let svc = service(
        &repo,
        Arc::new(RecordingInvalidator::healthy()),
        DispatchMode::Inline,
    );

    let mut codes = HashSet::new();
    for _ in 0..200 {
        let link = svc
            .create_link(request(None), &Identity::guest())
            .await
            .unwrap();
        assert!(codes.insert(link.short_code));
    }

    assert_eq!(repo.len().await, 200);
}

#[tokio::test]
async fn test_concurrent_alias_claims_have_one_winner() {
    let repo = MemoryLinkRepository::new();
    let svc = service(
        &repo,
        Arc::new(RecordingInvalidator::healthy()),
        DispatchMode::Inline,
    );

    let handles: Vec<_> = (1..=8)
        .map(|user_id| {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.create_link(request(Some("contested")), &Identity::user(user_id))
                    .await
            })
        })
        .collect();

    let mut won = 0;
    let mut taken = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(AppError::AliasTaken { .. }) => taken += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(won, 1);
    assert_eq!(taken, 7);
}

#[tokio::test]
async fn test_guest_expiry_is_24_hours_after_creation() {
    let repo = MemoryLinkRepository::new();
    let svc = service(
        &repo,
        Arc::new(RecordingInvalidator::healthy()),
        DispatchMode::Inline,
    );

    let guest = svc
        .create_link(request(None), &Identity::guest())
        .await
        .unwrap();
    assert_eq!(guest.owner, Owner::Anonymous);
    assert_eq!(guest.expires_at, Some(guest.created_at + Duration::hours(24)));

    let user = svc
        .create_link(request(None), &Identity::user(7))
        .await
        .unwrap();
    assert_eq!(user.expires_at, None);
}

#[tokio::test]
async fn test_full_lifecycle_for_custom_link() {
    let repo = MemoryLinkRepository::new();
    let invalidator = Arc::new(RecordingInvalidator::healthy());
    let svc = service(&repo, invalidator.clone(), DispatchMode::Inline);
    let owner = Identity::user(7);

    let link = svc
        .create_link(request(Some("mybrand")), &owner)
        .await
        .unwrap();
    assert_eq!(link.custom_alias.as_deref(), Some("mybrand"));
    assert_eq!(link.alias_kind(), AliasKind::Custom);

    let usage = svc.count_links_by_owner(7).await.unwrap();
    assert_eq!((usage.custom, usage.standard), (1, 0));

    svc.update_link("mybrand", "https://new.example.com".to_string(), &owner)
        .await
        .unwrap();
    let stored = svc.get_link_by_code("mybrand").await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://new.example.com");

    svc.delete_link("mybrand", &owner).await.unwrap();
    assert!(repo.find_by_code("mybrand").await.unwrap().is_none());

    assert_eq!(
        invalidator.codes(),
        vec!["mybrand".to_string(), "mybrand".to_string()]
    );

    let usage = svc.count_links_by_owner(7).await.unwrap();
    assert_eq!((usage.custom, usage.standard), (0, 0));
}

#[tokio::test]
async fn test_deleting_frees_quota() {
    let repo = MemoryLinkRepository::new();
    let svc = service(
        &repo,
        Arc::new(RecordingInvalidator::healthy()),
        DispatchMode::Inline,
    );
    let owner = Identity::user(7);

    svc.create_link(request(Some("first")), &owner).await.unwrap();
    svc.create_link(request(Some("second")), &owner).await.unwrap();
    assert!(matches!(
        svc.create_link(request(Some("third")), &owner).await,
        Err(AppError::QuotaExceeded { .. })
    ));

    svc.delete_link("first", &owner).await.unwrap();
    svc.create_link(request(Some("third")), &owner).await.unwrap();
}

#[tokio::test]
async fn test_background_invalidation_does_not_block_and_still_runs() {
    let repo = MemoryLinkRepository::new();
    let invalidator = Arc::new(RecordingInvalidator::failing());
    let svc = service(&repo, invalidator.clone(), DispatchMode::Background);
    let owner = Identity::user(7);

    svc.create_link(request(Some("mybrand")), &owner).await.unwrap();
    svc.delete_link("mybrand", &owner).await.unwrap();

    for _ in 0..50 {
        if !invalidator.codes().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    assert_eq!(invalidator.codes(), vec!["mybrand".to_string()]);
}
