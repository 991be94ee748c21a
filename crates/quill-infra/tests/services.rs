//! Post and category services running against the in-memory store.

use std::sync::Arc;

use bytes::Bytes;
use quill_core::DomainError;
use quill_core::media::{Attachment, ImageInput};
use quill_core::ports::{BaseRepository, PostRepository};
use quill_core::services::{CategoryService, DUPLICATE_CATEGORY_MESSAGE, PostService};
use quill_core::validation::{CategoryFields, PostFields};
use quill_infra::{
    DisconnectedStore, InMemoryCategoryRepository, InMemoryPostRepository, LocalMediaStore,
};
use tempfile::TempDir;

struct Harness {
    posts: PostService,
    categories: CategoryService,
    post_repo: Arc<InMemoryPostRepository>,
    uploads: TempDir,
}

fn harness() -> Harness {
    let uploads = tempfile::tempdir().unwrap();
    let post_repo = Arc::new(InMemoryPostRepository::new());
    let category_repo = Arc::new(InMemoryCategoryRepository::new());
    let media = Arc::new(LocalMediaStore::new(uploads.path(), "/uploads").unwrap());

    Harness {
        posts: PostService::new(post_repo.clone(), category_repo.clone(), media),
        categories: CategoryService::new(category_repo),
        post_repo,
        uploads,
    }
}

fn fields(title: &str, content: &str, category: &str) -> PostFields {
    PostFields {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        category: Some(category.to_string()),
    }
}

fn png() -> Attachment {
    Attachment::new(
        Some("cover.png".to_string()),
        Some(mime::IMAGE_PNG),
        Bytes::from_static(b"\x89PNG\r\n"),
    )
}

async fn category(h: &Harness, name: &str) -> String {
    h.categories
        .create(CategoryFields {
            name: Some(name.to_string()),
        })
        .await
        .unwrap()
        .id
        .to_string()
}

async fn stored_count(h: &Harness) -> usize {
    h.post_repo.search(&Default::default()).await.unwrap().len()
}

#[tokio::test]
async fn create_returns_enriched_post() {
    let h = harness();
    let tech = category(&h, "Tech").await;

    let created = h
        .posts
        .create(fields("Hi", "World", &tech), ImageInput::Absent)
        .await
        .unwrap();

    let summary = created.category.expect("category is embedded");
    assert_eq!(summary.name, "Tech");
    assert_eq!(summary.slug, "tech");
    assert_eq!(created.post.featured_image, "");
    assert_eq!(created.post.created_at, created.post.updated_at);
}

#[tokio::test]
async fn create_with_unknown_category_persists_nothing() {
    let h = harness();

    for raw in [uuid::Uuid::new_v4().to_string(), "not-an-id".to_string()] {
        let err = h
            .posts
            .create(fields("Hi", "World", &raw), ImageInput::Absent)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Category" }));
    }

    assert_eq!(stored_count(&h).await, 0);
}

#[tokio::test]
async fn create_with_missing_fields_persists_nothing() {
    let h = harness();
    let tech = category(&h, "Tech").await;

    let cases = [
        PostFields {
            title: None,
            ..fields("", "World", &tech)
        },
        PostFields {
            content: None,
            ..fields("Hi", "", &tech)
        },
        PostFields {
            category: None,
            ..fields("Hi", "World", "")
        },
    ];

    for case in cases {
        let err = h.posts.create(case, ImageInput::Absent).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
    assert_eq!(stored_count(&h).await, 0);
}

#[tokio::test]
async fn uploaded_file_wins_over_url() {
    let h = harness();
    let tech = category(&h, "Tech").await;

    let image = ImageInput::from_parts(Some("https://example.com/x.jpg".into()), Some(png()));
    let created = h
        .posts
        .create(fields("Hi", "World", &tech), image)
        .await
        .unwrap();

    let path = &created.post.featured_image;
    assert!(path.starts_with("/uploads/"), "got {path}");
    let file_name = path.trim_start_matches("/uploads/");
    assert!(h.uploads.path().join(file_name).exists());
}

#[tokio::test]
async fn rejected_upload_persists_nothing() {
    let h = harness();
    let tech = category(&h, "Tech").await;
    let text = Attachment::new(
        Some("notes.txt".into()),
        Some(mime::TEXT_PLAIN),
        Bytes::from_static(b"hello"),
    );

    let err = h
        .posts
        .create(fields("Hi", "World", &tech), ImageInput::Upload(text))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(stored_count(&h).await, 0);
}

#[tokio::test]
async fn update_keeps_or_clears_image() {
    let h = harness();
    let tech = category(&h, "Tech").await;
    let created = h
        .posts
        .create(
            fields("Hi", "World", &tech),
            ImageInput::Url(" https://img.example/a.png ".into()),
        )
        .await
        .unwrap();
    let id = created.post.id.to_string();
    assert_eq!(created.post.featured_image, "https://img.example/a.png");

    let kept = h
        .posts
        .update(
            &id,
            PostFields {
                title: Some("Renamed".into()),
                ..Default::default()
            },
            ImageInput::Absent,
        )
        .await
        .unwrap();
    assert_eq!(kept.post.title, "Renamed");
    assert_eq!(kept.post.featured_image, "https://img.example/a.png");
    assert_eq!(kept.category.unwrap().name, "Tech");

    let cleared = h
        .posts
        .update(&id, PostFields::default(), ImageInput::Url(String::new()))
        .await
        .unwrap();
    assert_eq!(cleared.post.featured_image, "");
}

#[tokio::test]
async fn update_upload_wins_over_url() {
    let h = harness();
    let tech = category(&h, "Tech").await;
    let id = h
        .posts
        .create(
            fields("Hi", "World", &tech),
            ImageInput::Url("https://img.example/a.png".into()),
        )
        .await
        .unwrap()
        .post
        .id
        .to_string();

    let image = ImageInput::from_parts(Some("https://img.example/b.png".into()), Some(png()));
    let updated = h
        .posts
        .update(&id, PostFields::default(), image)
        .await
        .unwrap();

    let path = &updated.post.featured_image;
    assert!(path.starts_with("/uploads/"), "got {path}");
    assert!(path.ends_with(".png"));
    assert!(h.uploads.path().join(path.trim_start_matches("/uploads/")).exists());
    assert_eq!(updated.post.title, "Hi");
}

#[tokio::test]
async fn update_checks_category_only_when_supplied() {
    let h = harness();
    let tech = category(&h, "Tech").await;
    let life = category(&h, "Life").await;
    let id = h
        .posts
        .create(fields("Hi", "World", &tech), ImageInput::Absent)
        .await
        .unwrap()
        .post
        .id
        .to_string();

    let missing = PostFields {
        category: Some(uuid::Uuid::new_v4().to_string()),
        ..Default::default()
    };
    let err = h
        .posts
        .update(&id, missing, ImageInput::Absent)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Category" }));

    let moved = h
        .posts
        .update(
            &id,
            PostFields {
                category: Some(life.clone()),
                ..Default::default()
            },
            ImageInput::Absent,
        )
        .await
        .unwrap();
    assert_eq!(moved.post.category_id.to_string(), life);
    assert_eq!(moved.category.unwrap().slug, "life");
}

#[tokio::test]
async fn update_unknown_post_is_not_found() {
    let h = harness();

    let err = h
        .posts
        .update(
            &uuid::Uuid::new_v4().to_string(),
            PostFields::default(),
            ImageInput::Absent,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Post" }));

    let err = h.posts.get("42").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidId { .. }));
}

#[tokio::test]
async fn list_filters_compose() {
    let h = harness();
    let tech = category(&h, "Tech").await;
    let life = category(&h, "Life").await;

    for (title, content, cat) in [
        ("Rust in production", "systems", &tech),
        ("Morning routine", "coffee and RUST removal", &life),
        ("Go notes", "channels", &tech),
    ] {
        h.posts
            .create(fields(title, content, cat), ImageInput::Absent)
            .await
            .unwrap();
    }

    let by_search = h.posts.list(Some("rust"), None).await.unwrap();
    assert_eq!(by_search.len(), 2);

    let by_category = h.posts.list(None, Some(&tech)).await.unwrap();
    assert_eq!(by_category.len(), 2);

    let both = h.posts.list(Some("rust"), Some(&tech)).await.unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].post.title, "Rust in production");

    let all = h.posts.list(Some(""), Some("")).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].post.title, "Go notes");

    let bogus = h.posts.list(None, Some("garbage")).await.unwrap();
    assert!(bogus.is_empty());
}

#[tokio::test]
async fn delete_removes_post_from_listing() {
    let h = harness();
    let tech = category(&h, "Tech").await;
    let id = h
        .posts
        .create(fields("Hi", "World", &tech), ImageInput::Absent)
        .await
        .unwrap()
        .post
        .id;

    h.posts.delete(&id.to_string()).await.unwrap();
    assert!(h.posts.list(None, None).await.unwrap().is_empty());
    assert!(h.post_repo.find_by_id(id).await.unwrap().is_none());

    let err = h.posts.delete(&id.to_string()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Post" }));
}

#[tokio::test]
async fn duplicate_category_is_rejected() {
    let h = harness();
    category(&h, "Tech").await;

    let err = h
        .categories
        .create(CategoryFields {
            name: Some("Tech".into()),
        })
        .await
        .unwrap_err();

    match err {
        DomainError::Duplicate(msg) => assert_eq!(msg, DUPLICATE_CATEGORY_MESSAGE),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.categories.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn disconnected_store_reports_unavailable() {
    let store = Arc::new(DisconnectedStore::new("refused"));
    let dir = tempfile::tempdir().unwrap();
    let media = Arc::new(LocalMediaStore::new(dir.path(), "/uploads").unwrap());
    let posts = PostService::new(store.clone(), store.clone(), media);
    let categories = CategoryService::new(store);

    assert!(matches!(
        posts.list(None, None).await,
        Err(DomainError::Unavailable(_))
    ));
    assert!(matches!(
        categories.list().await,
        Err(DomainError::Unavailable(_))
    ));
}
