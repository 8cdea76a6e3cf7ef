//! services/companion/src/repositories/community.rs
//!
//! The community board. Posts are stored oldest first under `communityPosts`;
//! use `mindcare_core::stats::most_recent_first` for the feed order.

use chrono::Utc;
use mindcare_core::domain::{author_name, Comment, CommunityPost, NewPost};
use mindcare_core::ids::{self, EntryId};
use mindcare_core::validation::{require, ValidationError};
use tracing::info;

use super::{RepoResult, Repository};
use crate::records::PostRecord;
use crate::store::{keys, RecordStore};

#[derive(Clone)]
pub struct CommunityRepository {
    inner: Repository<PostRecord>,
}

impl CommunityRepository {
    pub fn new(store: RecordStore, write_retries: u32) -> Self {
        Self {
            inner: Repository::new(store, keys::COMMUNITY_POSTS, "post", write_retries),
        }
    }

    pub fn posts(&self) -> Vec<CommunityPost> {
        self.inner.load_all()
    }

    /// Publishes `form` as the user with `author_email`, or anonymously.
    pub fn publish(
        &self,
        form: NewPost,
        author_email: Option<&str>,
    ) -> RepoResult<Vec<CommunityPost>> {
        let post = CommunityPost {
            id: EntryId::UNASSIGNED,
            title: form.title,
            content: form.content,
            category: form.category,
            author: author_name(author_email),
            author_email: author_email.unwrap_or_default().to_string(),
            likes: 0,
            comments: Vec::new(),
            created_at: Utc::now(),
        };
        let posts = self.inner.append(post)?;
        info!(category = %form.category, author = ?author_email, "Post published");
        Ok(posts)
    }

    /// Adds one like. Concurrent likes are all counted: the increment is
    /// re-applied to whatever count is current when the write lands. A post
    /// already at the counter's limit refuses further likes.
    pub fn like(&self, id: EntryId) -> RepoResult<Vec<CommunityPost>> {
        self.inner.try_replace(id, |post| {
            post.likes = post
                .likes
                .checked_add(1)
                .ok_or(ValidationError::OutOfRange {
                    field: "likes",
                    min: 0,
                    max: i64::from(u32::MAX),
                    value: i64::from(u32::MAX) + 1,
                })?;
            Ok(())
        })
    }

    pub fn comment(
        &self,
        id: EntryId,
        text: &str,
        author_email: Option<&str>,
    ) -> RepoResult<Vec<CommunityPost>> {
        require("comment", text)?;
        let author = author_name(author_email);
        let posts = self.inner.replace(id, |post| {
            let floor = post.comments.iter().map(|c| c.id).max();
            post.comments.push(Comment {
                id: ids::next_id(floor),
                author: author.clone(),
                text: text.to_string(),
                created_at: Utc::now(),
            });
        })?;
        info!(post = %id, %author, "Comment added");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryKeyValueStore;
    use crate::repositories::test_support::{memory_store, InterleavingStore};
    use crate::repositories::RepoError;
    use assert_matches::assert_matches;
    use mindcare_core::domain::PostCategory;
    use mindcare_core::ports::KeyValueStore;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn form(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "Any tips for exam week?".to_string(),
            category: PostCategory::StudyStress,
        }
    }

    #[test]
    fn publish_records_author_and_defaults() {
        let repo = CommunityRepository::new(memory_store(), 3);
        let posts = repo.publish(form("Exams"), Some("sam.lee@uni.edu")).unwrap();

        let post = &posts[0];
        assert_eq!(post.author, "sam.lee");
        assert_eq!(post.author_email, "sam.lee@uni.edu");
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn anonymous_posts_are_attributed_to_anonymous() {
        let repo = CommunityRepository::new(memory_store(), 3);
        let posts = repo.publish(form("Hello"), None).unwrap();
        assert_eq!(posts[0].author, "Anonymous");
        assert_eq!(posts[0].author_email, "");
    }

    #[test]
    fn posts_without_a_title_are_rejected() {
        let repo = CommunityRepository::new(memory_store(), 3);
        assert_matches!(repo.publish(form(" "), None), Err(RepoError::Validation(_)));
        assert!(repo.posts().is_empty());
    }

    #[test]
    fn likes_only_go_up() {
        let repo = CommunityRepository::new(memory_store(), 3);
        let id = repo.publish(form("Exams"), None).unwrap()[0].id;
        repo.like(id).unwrap();
        let posts = repo.like(id).unwrap();
        assert_eq!(posts[0].likes, 2);
    }

    #[test]
    fn like_at_the_counter_limit_is_refused() {
        let inner = Arc::new(MemoryKeyValueStore::new());
        let repo = CommunityRepository::new(RecordStore::new(inner.clone()), 3);
        let id = repo.publish(form("Exams"), None).unwrap()[0].id;

        let raw = inner.read(keys::COMMUNITY_POSTS).unwrap().contents.unwrap();
        let mut posts: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        posts[0]["likes"] = u32::MAX.into();
        let saturated = serde_json::to_string(&posts).unwrap();
        inner.write(keys::COMMUNITY_POSTS, &saturated).unwrap();

        assert_matches!(
            repo.like(id),
            Err(RepoError::Validation(ValidationError::OutOfRange { field: "likes", .. }))
        );
        assert_eq!(
            inner.read(keys::COMMUNITY_POSTS).unwrap().contents.as_deref(),
            Some(saturated.as_str())
        );
        assert_eq!(repo.posts()[0].likes, u32::MAX);
    }

    #[test]
    fn interleaved_likes_are_both_counted() {
        let inner = Arc::new(MemoryKeyValueStore::new());
        let other_tab = CommunityRepository::new(RecordStore::new(inner.clone()), 3);
        let id = other_tab.publish(form("Exams"), None).unwrap()[0].id;

        // The other tab likes the post between our read and our write.
        let racing = InterleavingStore {
            inner: inner.clone(),
            interruptions: AtomicUsize::new(1),
            interloper: |backend: &MemoryKeyValueStore| {
                let raw = backend.read(keys::COMMUNITY_POSTS).unwrap().contents.unwrap();
                let mut posts: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
                let likes = posts[0]["likes"].as_u64().unwrap();
                posts[0]["likes"] = (likes + 1).into();
                backend
                    .write(keys::COMMUNITY_POSTS, &serde_json::to_string(&posts).unwrap())
                    .unwrap();
            },
        };
        let this_tab = CommunityRepository::new(RecordStore::new(Arc::new(racing)), 3);
        let posts = this_tab.like(id).unwrap();

        assert_eq!(posts[0].likes, 2);
        assert_eq!(other_tab.posts()[0].likes, 2);
    }

    #[test]
    fn comments_get_distinct_ids_and_author() {
        let repo = CommunityRepository::new(memory_store(), 3);
        let id = repo.publish(form("Exams"), None).unwrap()[0].id;
        repo.comment(id, "You've got this", Some("kim@uni.edu")).unwrap();
        let posts = repo.comment(id, "Same here", None).unwrap();

        let comments = &posts[0].comments;
        assert_eq!(comments.len(), 2);
        assert!(comments[0].id < comments[1].id);
        assert_eq!(comments[0].author, "kim");
        assert_eq!(comments[1].author, "Anonymous");
    }

    #[test]
    fn blank_comments_are_rejected() {
        let repo = CommunityRepository::new(memory_store(), 3);
        let id = repo.publish(form("Exams"), None).unwrap()[0].id;
        assert_matches!(repo.comment(id, "\n", None), Err(RepoError::Validation(_)));
        assert!(repo.posts()[0].comments.is_empty());
    }
}
