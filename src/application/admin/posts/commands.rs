use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::auth::Identity;
use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::domain::entities::PostDetail;
use crate::domain::inputs::{NewPost, PostPatch};

use super::service::AdminPostService;
use super::types::{AdminPostError, map_write_error, publish_timestamp};

impl AdminPostService {
    pub async fn create(
        &self,
        author: Identity,
        input: NewPost,
    ) -> Result<PostDetail, AdminPostError> {
        input.validate()?;

        if self.reader.find_by_slug(&input.slug).await?.is_some() {
            return Err(AdminPostError::Duplicate);
        }

        let now = OffsetDateTime::now_utc();
        let params = CreatePostParams {
            title: input.title,
            slug: input.slug,
            content: input.content,
            excerpt: input.excerpt,
            published: input.published,
            published_at: publish_timestamp(None, input.published, now),
            author_id: author.id,
            category_ids: input.category_ids,
            tag_ids: input.tag_ids,
        };

        let post = self
            .writer
            .create_post(params)
            .await
            .map_err(map_write_error)?;

        info!(
            target = "quill::admin::posts",
            post_id = %post.id,
            slug = %post.slug,
            published = post.published,
            "post created"
        );
        self.reload(post.id).await
    }

    /// Partial update. A patch that only carries `published` skips content
    /// validation and writes that flag alone.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<PostDetail, AdminPostError> {
        let existing = self
            .reader
            .find_detail(id)
            .await?
            .ok_or(AdminPostError::NotFound)?;
        let now = OffsetDateTime::now_utc();

        let params = if let Some(published) = patch.publish_toggle() {
            UpdatePostParams {
                id,
                published: Some(published),
                published_at: publish_timestamp(existing.post.published_at, published, now),
                ..Default::default()
            }
        } else {
            patch.validate()?;

            if let Some(slug) = patch
                .slug
                .as_deref()
                .filter(|slug| *slug != existing.post.slug)
            {
                let taken = self
                    .reader
                    .find_by_slug(slug)
                    .await?
                    .is_some_and(|other| other.id != id);
                if taken {
                    return Err(AdminPostError::Duplicate);
                }
            }

            let published_at = patch
                .published
                .and_then(|published| {
                    publish_timestamp(existing.post.published_at, published, now)
                });

            UpdatePostParams {
                id,
                title: patch.title,
                slug: patch.slug,
                content: patch.content,
                excerpt: patch.excerpt,
                published: patch.published,
                published_at,
                category_ids: patch.category_ids,
                tag_ids: patch.tag_ids,
            }
        };

        let post = self
            .writer
            .update_post(params)
            .await
            .map_err(map_write_error)?;

        info!(
            target = "quill::admin::posts",
            post_id = %post.id,
            published = post.published,
            "post updated"
        );
        self.reload(post.id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AdminPostError> {
        self.writer.delete_post(id).await.map_err(map_write_error)?;
        info!(target = "quill::admin::posts", post_id = %id, "post deleted");
        Ok(())
    }

    async fn reload(&self, id: Uuid) -> Result<PostDetail, AdminPostError> {
        self.reader
            .find_detail(id)
            .await?
            .ok_or(AdminPostError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::application::repos::{PostsRepo, PostsWriteRepo, RepoError, SearchPage};
    use crate::application::search::SearchFilter;
    use crate::domain::entities::{
        AuthorSummary, CategoryRef, PostRecord, PostSummary, TagRef,
    };
    use crate::domain::types::Role;

    #[derive(Default)]
    struct MemoryPosts {
        posts: Mutex<Vec<PostRecord>>,
        categories: Mutex<Vec<(Uuid, Uuid)>>,
        tags: Mutex<Vec<(Uuid, Uuid)>>,
    }

    impl MemoryPosts {
        fn detail(&self, post: &PostRecord) -> PostDetail {
            let categories = self
                .categories
                .lock()
                .expect("categories lock")
                .iter()
                .filter(|(post_id, _)| *post_id == post.id)
                .map(|(_, id)| CategoryRef {
                    id: *id,
                    name: id.to_string(),
                    slug: id.to_string(),
                })
                .collect();
            let tags = self
                .tags
                .lock()
                .expect("tags lock")
                .iter()
                .filter(|(post_id, _)| *post_id == post.id)
                .map(|(_, id)| TagRef {
                    id: *id,
                    name: id.to_string(),
                    slug: id.to_string(),
                })
                .collect();
            PostDetail {
                post: post.clone(),
                author: AuthorSummary {
                    name: Some("Author".into()),
                    email: "author@example.com".into(),
                    image: None,
                },
                categories,
                tags,
            }
        }

        fn replace(links: &Mutex<Vec<(Uuid, Uuid)>>, post_id: Uuid, ids: Vec<Uuid>) {
            let mut links = links.lock().expect("links lock");
            links.retain(|(owner, _)| *owner != post_id);
            links.extend(ids.into_iter().map(|id| (post_id, id)));
        }
    }

    #[async_trait]
    impl PostsRepo for MemoryPosts {
        async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
            let posts = self.posts.lock().expect("posts lock").clone();
            Ok(posts.iter().find(|post| post.id == id).map(|post| self.detail(post)))
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
            let posts = self.posts.lock().expect("posts lock");
            Ok(posts.iter().find(|post| post.slug == slug).cloned())
        }

        async fn list_published(&self) -> Result<Vec<PostDetail>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_published_by_slug(
            &self,
            _slug: &str,
        ) -> Result<Option<PostDetail>, RepoError> {
            Ok(None)
        }

        async fn list_published_in_category(
            &self,
            _category_id: Uuid,
        ) -> Result<Vec<PostDetail>, RepoError> {
            Ok(Vec::new())
        }

        async fn search_published(
            &self,
            _filter: &SearchFilter,
            _limit: u32,
            _offset: u64,
        ) -> Result<SearchPage, RepoError> {
            Ok(SearchPage::default())
        }
    }

    #[async_trait]
    impl PostsWriteRepo for MemoryPosts {
        async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
            let now = OffsetDateTime::now_utc();
            let post = PostRecord {
                id: Uuid::new_v4(),
                title: params.title,
                slug: params.slug,
                content: params.content,
                excerpt: params.excerpt,
                published: params.published,
                published_at: params.published_at,
                created_at: now,
                updated_at: now,
                author_id: params.author_id,
            };
            Self::replace(&self.categories, post.id, params.category_ids);
            Self::replace(&self.tags, post.id, params.tag_ids);
            self.posts.lock().expect("posts lock").push(post.clone());
            Ok(post)
        }

        async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
            let mut posts = self.posts.lock().expect("posts lock");
            let post = posts
                .iter_mut()
                .find(|post| post.id == params.id)
                .ok_or(RepoError::NotFound)?;
            if let Some(title) = params.title {
                post.title = title;
            }
            if let Some(slug) = params.slug {
                post.slug = slug;
            }
            if let Some(content) = params.content {
                post.content = content;
            }
            if let Some(excerpt) = params.excerpt {
                post.excerpt = Some(excerpt);
            }
            if let Some(published) = params.published {
                post.published = published;
            }
            if let Some(published_at) = params.published_at {
                post.published_at = Some(published_at);
            }
            if let Some(ids) = params.category_ids {
                Self::replace(&self.categories, post.id, ids);
            }
            if let Some(ids) = params.tag_ids {
                Self::replace(&self.tags, post.id, ids);
            }
            Ok(post.clone())
        }

        async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
            let mut posts = self.posts.lock().expect("posts lock");
            let before = posts.len();
            posts.retain(|post| post.id != id);
            if posts.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }
    }

    fn admin() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn new_post(slug: &str, categories: Vec<Uuid>) -> NewPost {
        NewPost {
            title: "Hello".into(),
            content: "Body".into(),
            excerpt: None,
            slug: slug.into(),
            published: false,
            category_ids: categories,
            tag_ids: Vec::new(),
        }
    }

    fn service() -> AdminPostService {
        let repo = Arc::new(MemoryPosts::default());
        AdminPostService::new(repo.clone(), repo)
    }

    #[tokio::test]
    async fn create_rejects_duplicate_slug() {
        let posts = service();
        posts
            .create(admin(), new_post("hello", Vec::new()))
            .await
            .expect("first");
        let err = posts
            .create(admin(), new_post("hello", Vec::new()))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, AdminPostError::Duplicate));
    }

    #[tokio::test]
    async fn create_records_author_and_stamps_published_posts() {
        let posts = service();
        let author = admin();
        let mut input = new_post("live", Vec::new());
        input.published = true;

        let created = posts.create(author, input).await.expect("create");
        assert_eq!(created.post.author_id, author.id);
        assert!(created.post.published_at.is_some());
    }

    #[tokio::test]
    async fn publish_toggle_changes_only_the_flag() {
        let posts = service();
        let category = Uuid::new_v4();
        let created = posts
            .create(admin(), new_post("toggle", vec![category]))
            .await
            .expect("create");

        let updated = posts
            .update(
                created.post.id,
                PostPatch {
                    published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("toggle");

        assert!(updated.post.published);
        assert!(updated.post.published_at.is_some());
        assert_eq!(updated.post.title, created.post.title);
        assert_eq!(updated.post.content, created.post.content);
        assert_eq!(updated.post.slug, created.post.slug);
        assert_eq!(updated.categories, created.categories);
    }

    #[tokio::test]
    async fn category_ids_replace_the_whole_set() {
        let posts = service();
        let (a, b, x, y) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let created = posts
            .create(admin(), new_post("sets", vec![a, b]))
            .await
            .expect("create");

        let updated = posts
            .update(
                created.post.id,
                PostPatch {
                    category_ids: Some(vec![x, y]),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        let ids: Vec<Uuid> = updated.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![x, y]);
    }

    #[tokio::test]
    async fn update_rejects_slug_taken_by_another_post() {
        let posts = service();
        posts
            .create(admin(), new_post("taken", Vec::new()))
            .await
            .expect("first");
        let second = posts
            .create(admin(), new_post("free", Vec::new()))
            .await
            .expect("second");

        let err = posts
            .update(
                second.post.id,
                PostPatch {
                    slug: Some("taken".into()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("duplicate");
        assert!(matches!(err, AdminPostError::Duplicate));
    }

    #[tokio::test]
    async fn full_patch_is_validated() {
        let posts = service();
        let created = posts
            .create(admin(), new_post("valid", Vec::new()))
            .await
            .expect("create");

        let err = posts
            .update(
                created.post.id,
                PostPatch {
                    title: Some(String::new()),
                    published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect_err("invalid");
        assert!(matches!(err, AdminPostError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let posts = service();
        let missing = Uuid::new_v4();
        assert!(matches!(
            posts.update(missing, PostPatch::default()).await,
            Err(AdminPostError::NotFound)
        ));
        assert!(matches!(
            posts.delete(missing).await,
            Err(AdminPostError::NotFound)
        ));
    }
}
