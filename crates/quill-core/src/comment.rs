//! Comments and their single level of replies.
//!
//! A [`Reply`] has no `replies` field, so deeper nesting cannot be expressed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  like::{LikeBook, LikeTarget},
  user::Author,
};

pub type CommentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:      CommentId,
  pub content: String,
  pub author:  Author,
  pub date:    DateTime<Utc>,
  /// Oldest first.
  #[serde(default)]
  pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
  pub id:      CommentId,
  pub content: String,
  pub author:  Author,
  pub date:    DateTime<Utc>,
}

impl Comment {
  /// Ids of this comment and all of its replies.
  pub fn thread_ids(&self) -> impl Iterator<Item = CommentId> + '_ {
    std::iter::once(self.id).chain(self.replies.iter().map(|r| r.id))
  }
}

/// A comment or reply with its like count resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
  pub id:      CommentId,
  pub content: String,
  pub author:  Author,
  pub date:    DateTime<Utc>,
  pub likes:   usize,
  /// Always empty for a reply.
  #[serde(default)]
  pub replies: Vec<CommentView>,
}

impl CommentView {
  pub(crate) fn materialize(comment: &Comment, likes: &LikeBook) -> Self {
    Self {
      id:      comment.id,
      content: comment.content.clone(),
      author:  comment.author.clone(),
      date:    comment.date,
      likes:   likes.count(&LikeTarget::comment(comment.id)),
      replies: comment
        .replies
        .iter()
        .map(|reply| Self {
          id:      reply.id,
          content: reply.content.clone(),
          author:  reply.author.clone(),
          date:    reply.date,
          likes:   likes.count(&LikeTarget::comment(reply.id)),
          replies: Vec::new(),
        })
        .collect(),
    }
  }
}
