//! Core services wired over the in-memory store, Argon2, JWT and the local image store.

use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use inkwell_core::domain::{
    DEFAULT_POST_IMAGE, DEFAULT_PROFILE_IMAGE, NewPost, NewUser, Role, User,
};
use inkwell_core::policy::Principal;
use inkwell_core::ports::{BaseRepository, UserRepository};
use inkwell_core::DomainError;
use inkwell_core::error::RepoError;
use inkwell_core::services::{
    AccountUpdate, ContentStore, CredentialStore, PAGE_SIZE, SessionConfig, SessionManager,
    UserAdmin, UserChanges,
};
use inkwell_infra::{
    Argon2PasswordService, FsImageStore, InMemoryCache, InMemoryCommentRepository,
    InMemoryPostRepository, InMemoryUserRepository, JwtConfig, JwtTokenService, MediaConfig,
};

struct Site {
    users: Arc<InMemoryUserRepository>,
    posts: Arc<InMemoryPostRepository>,
    credentials: Arc<CredentialStore>,
    content: ContentStore,
    sessions: SessionManager,
    admin: UserAdmin,
    _media: tempfile::TempDir,
}

fn site() -> Site {
    let media = tempfile::tempdir().unwrap();
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let comments = Arc::new(InMemoryCommentRepository::new());
    // Cheap parameters keep debug-build tests fast.
    let passwords = Arc::new(Argon2PasswordService::with_params(
        Params::new(1024, 1, 1, None).unwrap(),
    ));
    let images = Arc::new(FsImageStore::new(MediaConfig {
        root: media.path().to_path_buf(),
    }));
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "inkwell-test".to_string(),
    }));

    let credentials = Arc::new(CredentialStore::new(
        users.clone(),
        passwords,
        images.clone(),
    ));
    let content = ContentStore::new(posts.clone(), comments, images);
    let sessions = SessionManager::new(
        credentials.clone(),
        users.clone(),
        tokens,
        Arc::new(InMemoryCache::new()),
        SessionConfig::default(),
    );
    let admin = UserAdmin::new(users.clone(), credentials.clone());

    Site {
        users,
        posts,
        credentials,
        content,
        sessions,
        admin,
        _media: media,
    }
}

impl Site {
    async fn user_with_role(&self, name: &str, role: Role) -> User {
        let mut user = self
            .credentials
            .register(name, &format!("{name}@example.com"), "password")
            .await
            .unwrap();
        if role != Role::User {
            user.role = role;
            user = self.users.update(user).await.unwrap();
        }
        user
    }
}

#[tokio::test]
async fn test_register_then_verify() {
    let site = site();

    let user = site
        .credentials
        .register("alice", "alice@example.com", "s3cret")
        .await
        .unwrap();
    assert_eq!(user.role, Role::User);
    assert_eq!(user.image_file, DEFAULT_PROFILE_IMAGE);

    let verified = site
        .credentials
        .verify("alice@example.com", "s3cret")
        .await
        .unwrap();
    assert_eq!(verified.id, user.id);
}

#[tokio::test]
async fn test_duplicate_username_and_email() {
    let site = site();
    site.credentials
        .register("alice", "alice@example.com", "pw")
        .await
        .unwrap();

    let same_name = site
        .credentials
        .register("alice", "other@example.com", "pw")
        .await;
    assert!(matches!(same_name, Err(DomainError::DuplicateUsername)));

    let same_email = site
        .credentials
        .register("alicia", "alice@example.com", "pw")
        .await;
    assert!(matches!(same_email, Err(DomainError::DuplicateEmail)));

    assert_eq!(site.users.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_registration_validates_before_touching_the_store() {
    let site = site();

    for (username, email) in [("a", "a@example.com"), ("alice", "not-an-email")] {
        let result = site.credentials.register(username, email, "pw").await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
    assert!(site.users.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let site = site();
    site.credentials
        .register("alice", "alice@example.com", "right")
        .await
        .unwrap();

    let wrong_password = site
        .credentials
        .verify("alice@example.com", "wrong")
        .await
        .unwrap_err();
    let unknown_email = site
        .credentials
        .verify("nobody@example.com", "right")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, DomainError::InvalidCredentials));
    assert!(matches!(unknown_email, DomainError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_change_password() {
    let site = site();
    let user = site.user_with_role("alice", Role::User).await;

    let unchanged = site
        .credentials
        .change_password(&user, None, "ignored")
        .await
        .unwrap();
    assert_eq!(unchanged.password_hash, user.password_hash);

    let wrong = site
        .credentials
        .change_password(&user, Some("nope"), "new-password")
        .await;
    assert!(matches!(wrong, Err(DomainError::WrongOldPassword)));
    let stored = site.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, user.password_hash);

    site.credentials
        .change_password(&user, Some("password"), "new-password")
        .await
        .unwrap();
    assert!(site
        .credentials
        .verify("alice@example.com", "new-password")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_wrong_old_password_still_commits_profile_fields() {
    let site = site();
    let user = site.user_with_role("alice", Role::User).await;
    let principal = Principal::from_user(&user);

    let outcome = site
        .credentials
        .update_account(
            &principal,
            &user,
            AccountUpdate {
                username: "alice2".to_string(),
                email: "alice2@example.com".to_string(),
                about_me: Some("Writes about trains".to_string()),
                picture: None,
                old_password: Some("wrong".to_string()),
                new_password: Some("new-password".to_string()),
            },
        )
        .await
        .unwrap();

    assert!(outcome.password_rejected);
    assert!(!outcome.password_changed);

    let stored = site.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "alice2");
    assert_eq!(stored.email, "alice2@example.com");
    assert_eq!(stored.about_me.as_deref(), Some("Writes about trains"));
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_account_update_rejects_taken_username_but_allows_keeping_own() {
    let site = site();
    let alice = site.user_with_role("alice", Role::User).await;
    site.user_with_role("bob", Role::User).await;
    let principal = Principal::from_user(&alice);

    let taken = site
        .credentials
        .update_account(
            &principal,
            &alice,
            AccountUpdate {
                username: "bob".to_string(),
                email: alice.email.clone(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(DomainError::DuplicateUsername)));

    let kept = site
        .credentials
        .update_account(
            &principal,
            &alice,
            AccountUpdate {
                username: alice.username.clone(),
                email: alice.email.clone(),
                ..Default::default()
            },
        )
        .await;
    assert!(kept.is_ok());
}

#[tokio::test]
async fn test_account_update_rejects_malformed_email() {
    let site = site();
    let alice = site.user_with_role("alice", Role::User).await;

    for email in ["a@b..c", "a@-.com", "alice"] {
        let result = site
            .credentials
            .update_account(
                &Principal::from_user(&alice),
                &alice,
                AccountUpdate {
                    username: alice.username.clone(),
                    email: email.to_string(),
                    ..Default::default()
                },
            )
            .await;
        assert!(
            matches!(result, Err(DomainError::Validation(_))),
            "{email} was accepted"
        );
    }

    let stored = site.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "alice@example.com");
}

#[tokio::test]
async fn test_cannot_update_someone_elses_account() {
    let site = site();
    let alice = site.user_with_role("alice", Role::User).await;
    let bob = site.user_with_role("bob", Role::User).await;

    let result = site
        .credentials
        .update_account(
            &Principal::from_user(&bob),
            &alice,
            AccountUpdate {
                username: "hijacked".to_string(),
                email: alice.email.clone(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::Forbidden)));
}

#[tokio::test]
async fn test_list_posts_pages_newest_first() {
    let site = site();
    let base = chrono::Utc::now();
    for i in 0..7 {
        let mut post = NewPost::new(1, format!("post {i}"), "body".to_string());
        post.date_posted = base + TimeDelta::minutes(i);
        site.posts.insert(post).await.unwrap();
    }

    let first = site.content.list_posts(1, PAGE_SIZE).await.unwrap();
    assert_eq!(first.len(), 5);
    assert!(
        first
            .windows(2)
            .all(|pair| pair[0].date_posted >= pair[1].date_posted)
    );
    assert_eq!(first[0].title, "post 6");

    let second = site.content.list_posts(2, PAGE_SIZE).await.unwrap();
    assert_eq!(
        second.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
        vec!["post 1", "post 0"]
    );

    assert!(site.content.list_posts(3, PAGE_SIZE).await.unwrap().is_empty());
    assert_eq!(site.content.list_posts(0, PAGE_SIZE).await.unwrap(), first);
}

#[tokio::test]
async fn test_only_elevated_roles_delete_posts() {
    let site = site();
    let author = site.user_with_role("author", Role::User).await;
    let moderator = site.user_with_role("moderator", Role::Moderator).await;
    let author_principal = Principal::from_user(&author);

    let post = site
        .content
        .create_post(&author_principal, "Title", "Content", None)
        .await
        .unwrap();
    assert_eq!(post.author_id, author.id);
    assert_eq!(post.image_file, DEFAULT_POST_IMAGE);

    let denied = site.content.delete_post(&author_principal, post.id).await;
    assert!(matches!(denied, Err(DomainError::Forbidden)));
    assert!(site.content.get_post(post.id).await.is_ok());

    site.content
        .delete_post(&Principal::from_user(&moderator), post.id)
        .await
        .unwrap();
    assert!(matches!(
        site.content.get_post(post.id).await,
        Err(DomainError::NotFound { entity_type: "Post", .. })
    ));
}

#[tokio::test]
async fn test_update_post_keeps_image_and_author() {
    let site = site();
    let author = site.user_with_role("author", Role::User).await;
    let admin = site.user_with_role("admin", Role::Admin).await;

    let post = site
        .content
        .create_post(&Principal::from_user(&author), "Before", "Old", None)
        .await
        .unwrap();

    let denied = site
        .content
        .update_post(&Principal::from_user(&author), post.id, "Mine", "Edit", None)
        .await;
    assert!(matches!(denied, Err(DomainError::Forbidden)));

    let updated = site
        .content
        .update_post(&Principal::from_user(&admin), post.id, "After", "New", None)
        .await
        .unwrap();
    assert_eq!(updated.title, "After");
    assert_eq!(updated.content, "New");
    assert_eq!(updated.image_file, post.image_file);
    assert_eq!(updated.author_id, author.id);
    assert_eq!(updated.date_posted, post.date_posted);

    let missing = site
        .content
        .update_post(&Principal::from_user(&admin), 9999, "x", "y", None)
        .await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_anonymous_cannot_create() {
    let site = site();

    let result = site
        .content
        .create_post(&Principal::Anonymous, "Title", "Content", None)
        .await;
    assert!(matches!(result, Err(DomainError::Unauthenticated)));
}

#[tokio::test]
async fn test_comments_lifecycle() {
    let site = site();
    let author = site.user_with_role("author", Role::User).await;
    let reader = site.user_with_role("reader", Role::User).await;
    let moderator = site.user_with_role("moderator", Role::Moderator).await;
    let reader_principal = Principal::from_user(&reader);

    let post = site
        .content
        .create_post(&Principal::from_user(&author), "Title", "Content", None)
        .await
        .unwrap();

    let first = site
        .content
        .add_comment(&reader_principal, post.id, "First!")
        .await
        .unwrap();
    site.content
        .add_comment(&Principal::from_user(&author), post.id, "Thanks")
        .await
        .unwrap();

    let too_long = site
        .content
        .add_comment(&reader_principal, post.id, &"x".repeat(101))
        .await;
    assert!(matches!(too_long, Err(DomainError::Validation(_))));

    let orphan = site.content.add_comment(&reader_principal, 9999, "Hi").await;
    assert!(matches!(orphan, Err(DomainError::NotFound { .. })));

    let bodies: Vec<String> = site
        .content
        .list_comments(post.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.body)
        .collect();
    assert_eq!(bodies, vec!["First!", "Thanks"]);

    let not_theirs = site
        .content
        .delete_comment(&Principal::from_user(&author), first.id)
        .await;
    assert!(matches!(not_theirs, Err(DomainError::Forbidden)));
    site.content
        .delete_comment(&reader_principal, first.id)
        .await
        .unwrap();

    site.content
        .delete_post(&Principal::from_user(&moderator), post.id)
        .await
        .unwrap();
    assert!(site.content.list_comments(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_resolve_logout() {
    let site = site();
    let user = site.user_with_role("alice", Role::User).await;
    let seen_before = user.last_seen;

    let failed = site
        .sessions
        .login("alice@example.com", "wrong", false)
        .await;
    assert!(matches!(failed, Err(DomainError::InvalidCredentials)));

    let session = site
        .sessions
        .login("alice@example.com", "password", true)
        .await
        .unwrap();
    assert_eq!(
        session.expires_in,
        SessionConfig::default().remember_ttl.as_secs() as i64
    );

    tokio::time::sleep(Duration::from_millis(5)).await;
    let resolved = site.sessions.resolve(&session.token).await.unwrap().unwrap();
    assert_eq!(resolved.id, user.id);
    assert!(resolved.last_seen > seen_before);
    let stored = site.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.last_seen, resolved.last_seen);

    site.sessions.logout(&session.token).await;
    assert!(site.sessions.resolve(&session.token).await.unwrap().is_none());

    // Idempotent, and tolerant of garbage.
    site.sessions.logout(&session.token).await;
    site.sessions.logout("not-a-token").await;
    assert!(site.sessions.resolve("not-a-token").await.unwrap().is_none());
}

/// User store whose `last_seen` writes always fail.
struct StaleUsers(InMemoryUserRepository);

#[async_trait]
impl BaseRepository<User, NewUser, i32> for StaleUsers {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        self.0.insert(new).await
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        self.0.update(entity).await
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl UserRepository for StaleUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.0.find_by_email(email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        self.0.find_by_username(username).await
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        self.0.list_all().await
    }

    async fn touch_last_seen(&self, _id: i32, _at: DateTime<Utc>) -> Result<(), RepoError> {
        Err(RepoError::Connection("database is gone".to_string()))
    }
}

#[tokio::test]
async fn test_resolve_survives_failed_last_seen_write() {
    let media = tempfile::tempdir().unwrap();
    let users = Arc::new(StaleUsers(InMemoryUserRepository::new()));
    let credentials = Arc::new(CredentialStore::new(
        users.clone(),
        Arc::new(Argon2PasswordService::with_params(
            Params::new(1024, 1, 1, None).unwrap(),
        )),
        Arc::new(FsImageStore::new(MediaConfig {
            root: media.path().to_path_buf(),
        })),
    ));
    let sessions = SessionManager::new(
        credentials.clone(),
        users.clone(),
        Arc::new(JwtTokenService::new(JwtConfig::default())),
        Arc::new(InMemoryCache::new()),
        SessionConfig::default(),
    );

    let user = credentials
        .register("alice", "alice@example.com", "password")
        .await
        .unwrap();
    let session = sessions
        .login("alice@example.com", "password", false)
        .await
        .unwrap();

    let resolved = sessions.resolve(&session.token).await.unwrap().unwrap();
    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.last_seen, user.last_seen);
}

#[tokio::test]
async fn test_admin_manages_users() {
    let site = site();
    let admin = site.user_with_role("admin", Role::Admin).await;
    let moderator = site.user_with_role("moderator", Role::Moderator).await;
    let admin_principal = Principal::from_user(&admin);

    let denied = site
        .admin
        .list_users(&Principal::from_user(&moderator))
        .await;
    assert!(matches!(denied, Err(DomainError::Forbidden)));

    let created = site
        .admin
        .create_user(
            &admin_principal,
            "editor",
            "editor@example.com",
            "pw",
            Role::Moderator,
        )
        .await
        .unwrap();
    assert_eq!(created.role, Role::Moderator);

    let duplicate = site
        .admin
        .create_user(&admin_principal, "editor", "x@example.com", "pw", Role::User)
        .await;
    assert!(matches!(duplicate, Err(DomainError::DuplicateUsername)));

    let promoted = site
        .admin
        .update_user(
            &admin_principal,
            created.id,
            UserChanges {
                role: Some(Role::Admin),
                about_me: Some("Now in charge".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Admin);
    assert_eq!(promoted.username, "editor");

    assert_eq!(site.admin.list_users(&admin_principal).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_deleting_a_user_leaves_their_posts() {
    let site = site();
    let admin = site.user_with_role("admin", Role::Admin).await;
    let author = site.user_with_role("author", Role::User).await;
    let post = site
        .content
        .create_post(&Principal::from_user(&author), "Title", "Content", None)
        .await
        .unwrap();

    site.admin
        .delete_user(&Principal::from_user(&admin), author.id)
        .await
        .unwrap();

    assert!(site.users.find_by_id(author.id).await.unwrap().is_none());
    assert_eq!(site.content.get_post(post.id).await.unwrap().author_id, author.id);
    let remaining = site.content.list_all_posts().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].author_id, author.id);

    let again = site
        .admin
        .delete_user(&Principal::from_user(&admin), author.id)
        .await;
    assert!(matches!(again, Err(DomainError::NotFound { .. })));
}
