use blog_core::db::open_db_in_memory;
use blog_core::{
    NewPost, PostCategory, PostListQuery, PostPatch, PostRepository, PostService, RepoError,
    SqlitePostRepository,
};
use rusqlite::Connection;
use std::thread;
use std::time::Duration;

fn long_content() -> String {
    "Once upon a time. ".repeat(20)
}

fn post(title: &str, category: PostCategory) -> NewPost {
    NewPost::new(title, long_content(), category, "A short summary.").unwrap()
}

fn post_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM posts;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let created = repo
        .create_post(&post("Top 10 Secrets", PostCategory::NonFiction))
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.title, "Top 10 Secrets");
    assert_eq!(created.category, PostCategory::NonFiction);
    assert_eq!(created.content, long_content());

    let loaded = repo.get_post(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn invalid_fields_block_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let mut draft = post("Guess what", PostCategory::Fiction);
    draft.title = "Breaking News".to_string();
    assert!(matches!(
        repo.create_post(&draft),
        Err(RepoError::Validation(ref e)) if e.field() == "title"
    ));

    let mut draft = post("Guess what", PostCategory::Fiction);
    draft.content = "too short".to_string();
    assert!(matches!(
        repo.create_post(&draft),
        Err(RepoError::Validation(ref e)) if e.field() == "content"
    ));

    let mut draft = post("Guess what", PostCategory::Fiction);
    draft.summary = "s".repeat(251);
    assert!(matches!(
        repo.create_post(&draft),
        Err(RepoError::Validation(ref e)) if e.field() == "summary"
    ));

    assert_eq!(post_count(&conn), 0);
}

#[test]
fn update_revalidates_changed_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();
    let created = repo
        .create_post(&post("Secret garden", PostCategory::Fiction))
        .unwrap();

    thread::sleep(Duration::from_millis(20));
    let patch = PostPatch {
        category: Some(PostCategory::NonFiction),
        summary: Some("Updated summary.".to_string()),
        ..PostPatch::default()
    };
    let updated = repo.update_post(created.id, &patch).unwrap();
    assert_eq!(updated.title, "Secret garden");
    assert_eq!(updated.content, created.content);
    assert_eq!(updated.category, PostCategory::NonFiction);
    assert_eq!(updated.summary, "Updated summary.");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[test]
fn failed_update_leaves_row_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();
    let created = repo
        .create_post(&post("Secret garden", PostCategory::Fiction))
        .unwrap();

    let patch = PostPatch {
        title: Some("Top stories".to_string()),
        content: Some("short".to_string()),
        ..PostPatch::default()
    };
    assert!(matches!(
        repo.update_post(created.id, &patch),
        Err(RepoError::Validation(ref e)) if e.field() == "content"
    ));
    assert_eq!(repo.get_post(created.id).unwrap().unwrap(), created);
}

#[test]
fn update_and_delete_missing_post_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    let patch = PostPatch {
        summary: Some("x".to_string()),
        ..PostPatch::default()
    };
    assert!(matches!(
        repo.update_post(5, &patch),
        Err(RepoError::NotFound {
            entity: "post",
            id: 5
        })
    ));
    assert!(matches!(
        repo.delete_post(5),
        Err(RepoError::NotFound { id: 5, .. })
    ));
}

#[test]
fn delete_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();
    let created = repo
        .create_post(&post("Guess who", PostCategory::Fiction))
        .unwrap();

    repo.delete_post(created.id).unwrap();
    assert!(repo.get_post(created.id).unwrap().is_none());
    assert_eq!(post_count(&conn), 0);
}

#[test]
fn list_filters_by_category_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();
    let fiction_a = repo
        .create_post(&post("Secret one", PostCategory::Fiction))
        .unwrap();
    let essay = repo
        .create_post(&post("Top essay", PostCategory::NonFiction))
        .unwrap();
    let fiction_b = repo
        .create_post(&post("Secret two", PostCategory::Fiction))
        .unwrap();

    let fiction = repo
        .list_posts(&PostListQuery {
            category: Some(PostCategory::Fiction),
            ..PostListQuery::default()
        })
        .unwrap();
    assert_eq!(
        fiction.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![fiction_a.id, fiction_b.id]
    );

    let page = repo
        .list_posts(&PostListQuery {
            limit: Some(1),
            offset: 1,
            ..PostListQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, essay.id);
}

#[test]
fn read_rejects_invalid_persisted_title() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO posts (title, content, category, summary)
         VALUES ('Breaking News', ?1, 'fiction', 'short');",
        [long_content()],
    )
    .unwrap();
    let repo = SqlitePostRepository::try_new(&conn).unwrap();

    match repo.list_posts(&PostListQuery::default()).unwrap_err() {
        RepoError::InvalidData(message) => assert!(message.contains("title")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(matches!(
        SqlitePostRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        })
    ));
}

#[test]
fn service_accepts_category_text() {
    let conn = open_db_in_memory().unwrap();
    let service = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());

    let created = service
        .create_post("Top picks", long_content(), "non-fiction", "Summary.")
        .unwrap();
    assert_eq!(created.category, PostCategory::NonFiction);

    assert!(matches!(
        service.create_post("Top picks", long_content(), "poetry", "Summary."),
        Err(RepoError::Validation(ref e)) if e.field() == "category"
    ));
    assert!(matches!(
        service.create_post("Breaking News", long_content(), "fiction", "Summary."),
        Err(RepoError::Validation(ref e)) if e.field() == "title"
    ));

    let patch = PostPatch {
        title: Some("You Won't believe this".to_string()),
        ..PostPatch::default()
    };
    let updated = service.update_post(created.id, &patch).unwrap();
    assert_eq!(updated.title, "You Won't believe this");
    assert_eq!(service.get_post(created.id).unwrap().unwrap(), updated);
    assert_eq!(
        service.list_posts(&PostListQuery::default()).unwrap().len(),
        1
    );

    service.delete_post(created.id).unwrap();
    assert!(service.get_post(created.id).unwrap().is_none());
}
