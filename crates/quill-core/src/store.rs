//! [`ContentStore`]: the canonical post, comment and like collections.
//!
//! Every mutating method writes the records it touched through the
//! [`Persistence`] adapter before returning. New state is staged on a copy and
//! only swapped in once the write has succeeded, so a storage failure leaves
//! memory matching what is on disk.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
  Entity, Error, Result,
  comment::{Comment, CommentId, CommentView, Reply},
  image::image_url,
  kv::KvStore,
  like::{EntityKind, LikeBook, LikeTarget},
  persist::Persistence,
  post::{Post, PostDraft, PostId, PostPatch, PostView, require_text},
  user::{User, UserId},
};

// ─── Id clock ────────────────────────────────────────────────────────────────

/// Hands out millisecond-timestamp ids that strictly increase even when two
/// are requested within the same millisecond.
#[derive(Debug, Default, Clone, Copy)]
struct IdClock {
  last: i64,
}

impl IdClock {
  fn observe(&mut self, id: i64) { self.last = self.last.max(id); }

  fn next(&mut self, now: DateTime<Utc>) -> i64 {
    let id = now.timestamp_millis().max(self.last.saturating_add(1));
    self.last = id;
    id
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

pub struct ContentStore<K> {
  persist:  Persistence<K>,
  /// Newest first by insertion.
  posts:    Vec<Post>,
  /// Per post, newest comment first.
  comments: BTreeMap<PostId, Vec<Comment>>,
  likes:    LikeBook,
  clock:    IdClock,
}

impl<K: KvStore> ContentStore<K> {
  /// Load the persisted collections; missing records start empty.
  pub fn open(persist: Persistence<K>) -> Result<Self> {
    let keys = persist.keys().clone();
    let posts: Vec<Post> = persist.load(&keys.posts())?;
    let comments: BTreeMap<PostId, Vec<Comment>> = persist.load(&keys.comments())?;
    let likes: LikeBook = persist.load(&keys.likes())?;

    let mut clock = IdClock::default();
    for post in &posts {
      clock.observe(post.id);
    }
    for comment in comments.values().flatten() {
      comment.thread_ids().for_each(|id| clock.observe(id));
    }

    info!(posts = posts.len(), "opened content store");
    Ok(Self { persist, posts, comments, likes, clock })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All posts, newest first by `date`. Posts sharing a date keep their
  /// stored order.
  pub fn list_posts(&self) -> Vec<PostView> {
    let mut posts: Vec<&Post> = self.posts.iter().collect();
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts.into_iter().map(|p| self.materialize(p)).collect()
  }

  pub fn get_post(&self, id: PostId) -> Option<PostView> {
    self.find(id).map(|p| self.materialize(p))
  }

  pub fn len(&self) -> usize { self.posts.len() }

  pub fn is_empty(&self) -> bool { self.posts.is_empty() }

  /// The comment thread of `post_id`, newest first. Empty for an unknown post.
  pub fn comments(&self, post_id: PostId) -> Vec<CommentView> {
    self
      .comments
      .get(&post_id)
      .map(|list| {
        list
          .iter()
          .map(|c| CommentView::materialize(c, &self.likes))
          .collect()
      })
      .unwrap_or_default()
  }

  pub fn like_count(&self, target: &LikeTarget) -> usize { self.likes.count(target) }

  pub fn has_liked(&self, target: &LikeTarget, user: UserId) -> bool {
    self.likes.contains(target, user)
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  /// Create a post attributed to `author` and put it at the front of the
  /// collection.
  pub fn create_post(&mut self, draft: PostDraft, author: Option<&User>) -> Result<PostView> {
    let Some(author) = author else {
      debug!("post creation rejected: no current user");
      return Err(Error::Unauthenticated);
    };
    let draft = draft.validated()?;

    let now = Utc::now();
    let mut clock = self.clock;
    let image = draft
      .image
      .unwrap_or_else(|| image_url(&draft.title, &draft.categories));
    let post = Post {
      id:         clock.next(now),
      title:      draft.title,
      excerpt:    draft.excerpt,
      content:    draft.content,
      image:      Some(image),
      read_time:  draft.read_time,
      categories: draft.categories,
      author:     author.snapshot(),
      date:       now,
      views:      0,
      shares:     0,
    };

    let mut posts = Vec::with_capacity(self.posts.len() + 1);
    posts.push(post.clone());
    posts.extend(self.posts.iter().cloned());
    self.commit_posts(posts)?;
    self.clock = clock;

    debug!(post_id = post.id, author_id = author.id, "created post");
    Ok(self.materialize(&post))
  }

  /// Overwrite the fields present in `patch`.
  pub fn update_post(&mut self, id: PostId, patch: PostPatch) -> Result<PostView> {
    let index = self.position(id).ok_or(Error::NotFound(Entity::Post(id)))?;

    let mut posts = self.posts.clone();
    patch.apply(&mut posts[index])?;
    self.commit_posts(posts)?;

    debug!(post_id = id, "updated post");
    Ok(self.materialize(&self.posts[index]))
  }

  /// Remove a post together with its comments and every like-set that
  /// pointed into it. Deleting an absent id succeeds without doing anything.
  /// A failed write leaves the post in place.
  pub fn delete_post(&mut self, id: PostId) -> Result<()> {
    let Some(index) = self.position(id) else {
      debug!(post_id = id, "delete of unknown post ignored");
      return Ok(());
    };

    let mut posts = self.posts.clone();
    posts.remove(index);

    let mut comments = self.comments.clone();
    let removed = comments.remove(&id).unwrap_or_default();

    let mut likes = self.likes.clone();
    likes.forget(&LikeTarget::post(id));
    for comment_id in removed.iter().flat_map(Comment::thread_ids) {
      likes.forget(&LikeTarget::comment(comment_id));
    }

    // The post goes last: if any write fails it is still present, and
    // deleting it again finishes the cascade.
    self.commit_likes(likes)?;
    if !removed.is_empty() {
      self.commit_comments(comments)?;
    }
    self.commit_posts(posts)?;

    debug!(post_id = id, comments = removed.len(), "deleted post");
    Ok(())
  }

  /// Add one to the view counter and return the new value.
  pub fn record_view(&mut self, id: PostId) -> Result<u64> {
    self.bump(id, |post| {
      post.views = post.views.saturating_add(1);
      post.views
    })
  }

  /// Add one to the share counter and return the new value.
  pub fn record_share(&mut self, id: PostId) -> Result<u64> {
    self.bump(id, |post| {
      post.shares = post.shares.saturating_add(1);
      post.shares
    })
  }

  /// Append already-built posts, skipping ids that are taken. Used to seed
  /// an empty store. Returns how many were added.
  pub fn import_posts(&mut self, incoming: Vec<Post>) -> Result<usize> {
    let mut posts = self.posts.clone();
    let mut clock = self.clock;
    let mut added = 0;
    for post in incoming {
      if posts.iter().any(|p| p.id == post.id) {
        continue;
      }
      clock.observe(post.id);
      posts.push(post);
      added += 1;
    }
    if added > 0 {
      self.commit_posts(posts)?;
      self.clock = clock;
    }
    info!(added, "imported posts");
    Ok(added)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  /// Put a new comment at the front of the post's thread.
  pub fn add_comment(
    &mut self,
    post_id: PostId,
    content: &str,
    author: Option<&User>,
  ) -> Result<Comment> {
    let Some(author) = author else {
      debug!(post_id, "comment rejected: no current user");
      return Err(Error::Unauthenticated);
    };
    require_text("content", content)?;
    if self.find(post_id).is_none() {
      return Err(Error::NotFound(Entity::Post(post_id)));
    }

    let mut clock = self.clock;
    let now = Utc::now();
    let comment = Comment {
      id:      clock.next(now),
      content: content.trim().to_owned(),
      author:  author.snapshot(),
      date:    now,
      replies: Vec::new(),
    };

    let mut comments = self.comments.clone();
    comments.entry(post_id).or_default().insert(0, comment.clone());
    self.commit_comments(comments)?;
    self.clock = clock;

    debug!(post_id, comment_id = comment.id, "added comment");
    Ok(comment)
  }

  /// Append a reply under an existing top-level comment.
  pub fn add_reply(
    &mut self,
    post_id: PostId,
    comment_id: CommentId,
    content: &str,
    author: Option<&User>,
  ) -> Result<Reply> {
    let Some(author) = author else {
      debug!(post_id, comment_id, "reply rejected: no current user");
      return Err(Error::Unauthenticated);
    };
    require_text("content", content)?;
    if self.find(post_id).is_none() {
      return Err(Error::NotFound(Entity::Post(post_id)));
    }

    let mut comments = self.comments.clone();
    let parent = comments
      .get_mut(&post_id)
      .and_then(|list| list.iter_mut().find(|c| c.id == comment_id))
      .ok_or(Error::NotFound(Entity::Comment(comment_id)))?;

    let mut clock = self.clock;
    let now = Utc::now();
    let reply = Reply {
      id:      clock.next(now),
      content: content.trim().to_owned(),
      author:  author.snapshot(),
      date:    now,
    };
    parent.replies.push(reply.clone());

    self.commit_comments(comments)?;
    self.clock = clock;

    debug!(post_id, comment_id, reply_id = reply.id, "added reply");
    Ok(reply)
  }

  // ── Likes ─────────────────────────────────────────────────────────────────

  /// Flip `user`'s membership in the like-set of `target` and return the new
  /// like count.
  pub fn toggle_like(&mut self, target: LikeTarget, user: Option<UserId>) -> Result<usize> {
    let Some(user) = user else {
      debug!(key = %target.key(), "like rejected: no current user");
      return Err(Error::Unauthenticated);
    };
    self.ensure_exists(&target)?;

    let mut likes = self.likes.clone();
    let count = likes.toggle(&target, user);
    self.commit_likes(likes)?;

    debug!(key = %target.key(), user_id = user, count, "toggled like");
    Ok(count)
  }

  /// Drop all in-memory state. The caller is responsible for the records.
  pub(crate) fn reset(&mut self) {
    self.posts.clear();
    self.comments.clear();
    self.likes = LikeBook::default();
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn find(&self, id: PostId) -> Option<&Post> { self.posts.iter().find(|p| p.id == id) }

  fn position(&self, id: PostId) -> Option<usize> { self.posts.iter().position(|p| p.id == id) }

  fn ensure_exists(&self, target: &LikeTarget) -> Result<()> {
    let exists = match target.kind {
      EntityKind::Post => self.find(target.id).is_some(),
      EntityKind::Comment => self
        .comments
        .values()
        .flatten()
        .any(|c| c.thread_ids().any(|id| id == target.id)),
    };
    if exists {
      return Ok(());
    }
    Err(Error::NotFound(match target.kind {
      EntityKind::Post => Entity::Post(target.id),
      EntityKind::Comment => Entity::Comment(target.id),
    }))
  }

  fn bump(&mut self, id: PostId, f: impl FnOnce(&mut Post) -> u64) -> Result<u64> {
    let index = self.position(id).ok_or(Error::NotFound(Entity::Post(id)))?;
    let mut posts = self.posts.clone();
    let value = f(&mut posts[index]);
    self.commit_posts(posts)?;
    Ok(value)
  }

  fn materialize(&self, post: &Post) -> PostView {
    PostView {
      post:     post.clone(),
      likes:    self.likes.count(&LikeTarget::post(post.id)),
      comments: self.comments(post.id),
    }
  }

  fn commit_posts(&mut self, posts: Vec<Post>) -> Result<()> {
    self.persist.save(&self.persist.keys().posts(), &posts)?;
    self.posts = posts;
    Ok(())
  }

  fn commit_comments(&mut self, comments: BTreeMap<PostId, Vec<Comment>>) -> Result<()> {
    self.persist.save(&self.persist.keys().comments(), &comments)?;
    self.comments = comments;
    Ok(())
  }

  fn commit_likes(&mut self, likes: LikeBook) -> Result<()> {
    self.persist.save(&self.persist.keys().likes(), &likes)?;
    self.likes = likes;
    Ok(())
  }
}
