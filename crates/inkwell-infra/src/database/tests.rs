#[cfg(test)]
mod tests {
    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use inkwell_core::domain::{NewPost, Post, Role, User};
    use inkwell_core::error::RepoError;
    use inkwell_core::ports::{BaseRepository, PostRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: i32, title: &str, now: chrono::DateTime<chrono::Utc>) -> post::Model {
        post::Model {
            id,
            title: title.to_owned(),
            date_posted: now.into(),
            content: "Content".to_owned(),
            user_id: 1,
            image_file: "news_default.png".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let now = chrono::Utc::now();

        // Mock the query expectation
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(7, "Test Post", now)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, NewPost, i32>::find_by_id(&repo, 7)
            .await
            .unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, 7);
        assert_eq!(post.author_id, 1);
    }

    #[tokio::test]
    async fn test_list_recent_maps_every_row() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                post_model(2, "Second", now),
                post_model(1, "First", now),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let posts = repo.list_recent(0, 5).await.unwrap();

        assert_eq!(
            posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let result = BaseRepository::<Post, NewPost, i32>::delete(&repo, 9999).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_user_by_email_parses_role() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: 3,
                username: "mod".to_owned(),
                email: "mod@example.com".to_owned(),
                password_hash: "$argon2id$stub".to_owned(),
                image_file: "default.png".to_owned(),
                about_me: None,
                last_seen: now.into(),
                role: "moderator".to_owned(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let user: User = repo
            .find_by_email("mod@example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(user.role, Role::Moderator);
        assert_eq!(user.password_hash.encoded(), "$argon2id$stub");
    }
}
