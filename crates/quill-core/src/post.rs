//! Posts, the drafts they are created from, and the patches that edit them.
//!
//! A stored [`Post`] holds no like counter and no comments. Both live in
//! their own records and are joined in when a [`PostView`] is materialised, so
//! the displayed counts can never drift from the like-sets and comment lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, comment::CommentView, user::Author};

pub type PostId = i64;

// ─── Stored post ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:         PostId,
  pub title:      String,
  pub excerpt:    String,
  /// Opaque body text; may carry simple markup the store never inspects.
  pub content:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub read_time:  Option<String>,
  pub categories: Vec<String>,
  /// Fixed at creation.
  pub author:     Author,
  pub date:       DateTime<Utc>,
  #[serde(default)]
  pub views:      u64,
  #[serde(default)]
  pub shares:     u64,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The caller-supplied part of a new post. Id, author, date and counters are
/// assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
  pub title:      String,
  pub excerpt:    String,
  pub content:    String,
  #[serde(default)]
  pub categories: Vec<String>,
  #[serde(default)]
  pub image:      Option<String>,
  #[serde(default)]
  pub read_time:  Option<String>,
}

impl PostDraft {
  pub fn new(
    title: impl Into<String>,
    excerpt: impl Into<String>,
    content: impl Into<String>,
    categories: impl IntoIterator<Item = impl Into<String>>,
  ) -> Self {
    Self {
      title:      title.into(),
      excerpt:    excerpt.into(),
      content:    content.into(),
      categories: categories.into_iter().map(Into::into).collect(),
      image:      None,
      read_time:  None,
    }
  }

  /// Check required fields and normalise categories.
  pub(crate) fn validated(mut self) -> Result<Self> {
    require_text("title", &self.title)?;
    require_text("excerpt", &self.excerpt)?;
    require_text("content", &self.content)?;
    self.categories = normalize_categories(self.categories)?;
    Ok(self)
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// A partial edit. Every `Some` field overwrites; `None` fields are kept.
/// Identity, authorship, creation date and counters cannot be patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
  #[serde(default)]
  pub title:      Option<String>,
  #[serde(default)]
  pub excerpt:    Option<String>,
  #[serde(default)]
  pub content:    Option<String>,
  #[serde(default)]
  pub categories: Option<Vec<String>>,
  #[serde(default)]
  pub image:      Option<String>,
  #[serde(default)]
  pub read_time:  Option<String>,
}

impl PostPatch {
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.excerpt.is_none()
      && self.content.is_none()
      && self.categories.is_none()
      && self.image.is_none()
      && self.read_time.is_none()
  }

  /// Validate every present field, then apply them all. Nothing is written
  /// to `post` if any field is rejected.
  pub(crate) fn apply(self, post: &mut Post) -> Result<()> {
    if let Some(title) = &self.title {
      require_text("title", title)?;
    }
    if let Some(excerpt) = &self.excerpt {
      require_text("excerpt", excerpt)?;
    }
    if let Some(content) = &self.content {
      require_text("content", content)?;
    }
    let categories = self.categories.map(normalize_categories).transpose()?;

    if let Some(title) = self.title {
      post.title = title;
    }
    if let Some(excerpt) = self.excerpt {
      post.excerpt = excerpt;
    }
    if let Some(content) = self.content {
      post.content = content;
    }
    if let Some(categories) = categories {
      post.categories = categories;
    }
    if let Some(image) = self.image {
      post.image = Some(image);
    }
    if let Some(read_time) = self.read_time {
      post.read_time = Some(read_time);
    }
    Ok(())
  }
}

// ─── Materialised view ───────────────────────────────────────────────────────

/// A post joined with its like count and comment thread. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
  #[serde(flatten)]
  pub post:     Post,
  pub likes:    usize,
  pub comments: Vec<CommentView>,
}

impl PostView {
  pub fn comment_count(&self) -> usize { self.comments.len() }

  /// Likes plus top-level comments; the score trending topics rank by.
  pub fn engagement(&self) -> u64 { (self.likes + self.comment_count()) as u64 }
}

// ─── Validation helpers ──────────────────────────────────────────────────────

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::blank(field));
  }
  Ok(())
}

/// Trim names, drop blanks and duplicates (first occurrence wins), and
/// require at least one category to remain.
fn normalize_categories(categories: Vec<String>) -> Result<Vec<String>> {
  let mut out: Vec<String> = Vec::with_capacity(categories.len());
  for category in categories {
    let name = category.trim();
    if !name.is_empty() && !out.iter().any(|c| c == name) {
      out.push(name.to_owned());
    }
  }
  if out.is_empty() {
    return Err(Error::ValidationFailed {
      field:  "categories",
      reason: "select at least one category",
    });
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn draft_rejects_blank_fields() {
    let err = PostDraft::new("  ", "B", "C", ["Tech"]).validated().unwrap_err();
    assert!(matches!(err, Error::ValidationFailed { field: "title", .. }));

    let err = PostDraft::new("A", "B", "\n\t", ["Tech"]).validated().unwrap_err();
    assert!(matches!(err, Error::ValidationFailed { field: "content", .. }));
  }

  #[test]
  fn draft_normalises_categories() {
    let draft = PostDraft::new("A", "B", "C", [" Tech ", "Design", "Tech", ""])
      .validated()
      .unwrap();
    assert_eq!(draft.categories, ["Tech", "Design"]);

    let err = PostDraft::new("A", "B", "C", [" "]).validated().unwrap_err();
    assert!(matches!(err, Error::ValidationFailed { field: "categories", .. }));
  }

  #[test]
  fn rejected_patch_leaves_post_untouched() {
    let mut post = Post {
      id:         1,
      title:      "Old".into(),
      excerpt:    "E".into(),
      content:    "C".into(),
      image:      None,
      read_time:  None,
      categories: vec!["Tech".into()],
      author:     Author {
        id:     1,
        name:   "Demo User".into(),
        avatar: String::new(),
        role:   "Writer".into(),
      },
      date:       Utc::now(),
      views:      0,
      shares:     0,
    };
    let before = post.clone();

    let patch = PostPatch {
      title: Some("New".into()),
      content: Some(" ".into()),
      ..Default::default()
    };
    assert!(patch.apply(&mut post).is_err());
    assert_eq!(post, before);
  }
}
