//! [`Blog`]: the owned application object tying the content store, the
//! session and the reader's preferences to one storage backend.
//!
//! Construct it once at start-up and hand it to whatever drives the UI or the
//! API. Mutations that need a user read the session at call time.

use std::sync::Arc;

use tracing::debug;

use crate::{
  Error, Result,
  comment::{Comment, CommentId, CommentView, Reply},
  kv::KvStore,
  like::LikeTarget,
  persist::{Persistence, StorageKeys},
  post::{Post, PostDraft, PostId, PostPatch, PostView},
  session::{Credentials, IdentityProvider, MockIdentity, Session},
  store::ContentStore,
  user::User,
  views::{self, ALL_CATEGORIES, CategoryCount, TopicStat},
};

pub struct Blog<K, P = MockIdentity> {
  persist:           Persistence<K>,
  content:           ContentStore<K>,
  session:           Session<K>,
  identity:          P,
  dark_mode:         bool,
  selected_category: String,
}

impl<K: KvStore, P: IdentityProvider> Blog<K, P> {
  /// Load every record under `keys` from `kv`.
  pub fn open(kv: Arc<K>, keys: StorageKeys, identity: P) -> Result<Self> {
    let persist = Persistence::new(kv, keys);
    let content = ContentStore::open(persist.clone())?;
    let session = Session::open(persist.clone())?;
    let dark_mode: bool = persist.load(&persist.keys().theme())?;
    let selected_category: Option<String> =
      persist.load(&persist.keys().selected_category())?;

    Ok(Self {
      persist,
      content,
      session,
      identity,
      dark_mode,
      selected_category: selected_category.unwrap_or_else(|| ALL_CATEGORIES.to_owned()),
    })
  }

  // ── Session ───────────────────────────────────────────────────────────────

  pub fn current_user(&self) -> Option<&User> { self.session.current() }

  /// Authenticate through the identity provider and make the result the
  /// current user.
  pub fn login(&mut self, credentials: &Credentials) -> Result<&User> {
    let user = self.identity.authenticate(credentials)?;
    self.session.login(user)
  }

  pub fn logout(&mut self) -> Result<()> { self.session.logout() }

  fn require_user(&self) -> Result<&User> {
    self.session.current().ok_or(Error::Unauthenticated)
  }

  // ── Content ───────────────────────────────────────────────────────────────

  pub fn list_posts(&self) -> Vec<PostView> { self.content.list_posts() }

  pub fn get_post(&self, id: PostId) -> Option<PostView> { self.content.get_post(id) }

  pub fn comments(&self, post_id: PostId) -> Vec<CommentView> { self.content.comments(post_id) }

  pub fn create_post(&mut self, draft: PostDraft) -> Result<PostView> {
    self.content.create_post(draft, self.session.current())
  }

  /// Editing requires a logged-in user.
  pub fn update_post(&mut self, id: PostId, patch: PostPatch) -> Result<PostView> {
    self.require_user()?;
    self.content.update_post(id, patch)
  }

  /// Deleting requires a logged-in user; an unknown id is still a no-op.
  pub fn delete_post(&mut self, id: PostId) -> Result<()> {
    self.require_user()?;
    self.content.delete_post(id)
  }

  pub fn add_comment(&mut self, post_id: PostId, content: &str) -> Result<Comment> {
    self.content.add_comment(post_id, content, self.session.current())
  }

  pub fn add_reply(
    &mut self,
    post_id: PostId,
    comment_id: CommentId,
    content: &str,
  ) -> Result<Reply> {
    self
      .content
      .add_reply(post_id, comment_id, content, self.session.current())
  }

  pub fn toggle_like(&mut self, target: LikeTarget) -> Result<usize> {
    let user = self.session.current().map(|u| u.id);
    self.content.toggle_like(target, user)
  }

  /// Whether the current user likes `target`; `false` when logged out.
  pub fn has_liked(&self, target: &LikeTarget) -> bool {
    self
      .session
      .current()
      .is_some_and(|u| self.content.has_liked(target, u.id))
  }

  pub fn like_count(&self, target: &LikeTarget) -> usize { self.content.like_count(target) }

  pub fn record_view(&mut self, id: PostId) -> Result<u64> { self.content.record_view(id) }

  pub fn record_share(&mut self, id: PostId) -> Result<u64> { self.content.record_share(id) }

  /// Load generated posts when the store holds none. Returns how many were
  /// added.
  pub fn seed_if_empty(&mut self, posts: Vec<Post>) -> Result<usize> {
    if !self.content.is_empty() {
      debug!(posts = self.content.len(), "store not empty; seeding skipped");
      return Ok(0);
    }
    self.content.import_posts(posts)
  }

  // ── Derived views ─────────────────────────────────────────────────────────

  pub fn trending_topics(&self, limit: usize) -> Vec<TopicStat> {
    views::trending_topics(&self.content.list_posts(), limit)
  }

  pub fn popular_posts(&self, limit: usize) -> Vec<PostView> {
    views::popular_posts(&self.content.list_posts(), limit)
      .into_iter()
      .cloned()
      .collect()
  }

  pub fn category_counts(&self) -> Vec<CategoryCount> {
    views::category_counts(&self.content.list_posts())
  }

  /// Posts in the selected category, newest first.
  pub fn visible_posts(&self) -> Vec<PostView> {
    views::filter_by_category(&self.content.list_posts(), &self.selected_category)
      .into_iter()
      .cloned()
      .collect()
  }

  // ── Preferences ───────────────────────────────────────────────────────────

  pub fn dark_mode(&self) -> bool { self.dark_mode }

  pub fn set_dark_mode(&mut self, dark: bool) -> Result<()> {
    self.persist.save(&self.persist.keys().theme(), &dark)?;
    self.dark_mode = dark;
    Ok(())
  }

  /// Flip the theme and return the new setting.
  pub fn toggle_theme(&mut self) -> Result<bool> {
    self.set_dark_mode(!self.dark_mode)?;
    Ok(self.dark_mode)
  }

  pub fn selected_category(&self) -> &str { &self.selected_category }

  pub fn set_selected_category(&mut self, category: &str) -> Result<()> {
    let category = match category.trim() {
      "" => ALL_CATEGORIES,
      name => name,
    };
    self
      .persist
      .save(&self.persist.keys().selected_category(), category)?;
    self.selected_category = category.to_owned();
    Ok(())
  }

  /// Remove every record and return to an empty, logged-out state. Memory
  /// is reset even if removing a record fails; the failure is still
  /// returned.
  pub fn clear_all(&mut self) -> Result<()> {
    let cleared = self.persist.clear_all();
    self.content.reset();
    self.session.reset();
    self.dark_mode = false;
    self.selected_category = ALL_CATEGORIES.to_owned();
    cleared
  }
}
