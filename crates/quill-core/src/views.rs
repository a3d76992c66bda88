//! Derived views over the post collection.
//!
//! Pure functions, recomputed from scratch on every call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{image::image_url, post::PostView};

/// How many entries the sidebar widgets show.
pub const DEFAULT_TOP_N: usize = 4;

/// The category name meaning "no filter".
pub const ALL_CATEGORIES: &str = "All";

// ─── Trending topics ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicStat {
  pub name:        String,
  /// Posts carrying this category.
  pub count:       usize,
  /// Sum of likes plus comments over those posts.
  pub engagement:  u64,
  pub latest_post: DateTime<Utc>,
  pub image:       String,
}

/// Categories ranked by engagement, highest first, at most `limit` of them.
/// Equal engagement keeps the order in which categories were first seen.
pub fn trending_topics(posts: &[PostView], limit: usize) -> Vec<TopicStat> {
  let mut topics: Vec<TopicStat> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();

  for view in posts {
    let engagement = view.engagement();
    for category in &view.post.categories {
      match index.get(category.as_str()) {
        Some(&i) => {
          let topic = &mut topics[i];
          topic.count += 1;
          topic.engagement += engagement;
          topic.latest_post = topic.latest_post.max(view.post.date);
        }
        None => {
          index.insert(category, topics.len());
          topics.push(TopicStat {
            name: category.clone(),
            count: 1,
            engagement,
            latest_post: view.post.date,
            image: String::new(),
          });
        }
      }
    }
  }

  topics.sort_by(|a, b| b.engagement.cmp(&a.engagement));
  topics.truncate(limit);
  for topic in &mut topics {
    topic.image = image_url(&topic.name, std::slice::from_ref(&topic.name));
  }
  topics
}

// ─── Popular posts ───────────────────────────────────────────────────────────

/// Posts ranked by views, highest first, at most `limit` of them. Equal view
/// counts keep their input order.
pub fn popular_posts(posts: &[PostView], limit: usize) -> Vec<&PostView> {
  let mut ranked: Vec<&PostView> = posts.iter().collect();
  ranked.sort_by(|a, b| b.post.views.cmp(&a.post.views));
  ranked.truncate(limit);
  ranked
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
  pub name:  String,
  pub count: usize,
}

/// Post count per category, in first-seen order.
pub fn category_counts(posts: &[PostView]) -> Vec<CategoryCount> {
  let mut counts: Vec<CategoryCount> = Vec::new();
  for category in posts.iter().flat_map(|v| &v.post.categories) {
    match counts.iter_mut().find(|c| &c.name == category) {
      Some(c) => c.count += 1,
      None => counts.push(CategoryCount { name: category.clone(), count: 1 }),
    }
  }
  counts
}

/// Keep posts in `category`. [`ALL_CATEGORIES`] or an empty name keeps all.
pub fn filter_by_category<'a, I>(posts: I, category: &str) -> Vec<&'a PostView>
where
  I: IntoIterator<Item = &'a PostView>,
{
  let category = category.trim();
  let everything = category.is_empty() || category.eq_ignore_ascii_case(ALL_CATEGORIES);
  posts
    .into_iter()
    .filter(|v| everything || v.post.categories.iter().any(|c| c == category))
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;
  use crate::{
    comment::CommentView,
    post::Post,
    user::Author,
  };

  fn author() -> Author {
    Author { id: 1, name: "Demo User".into(), avatar: String::new(), role: "Writer".into() }
  }

  fn view(id: i64, categories: &[&str], likes: usize, comments: usize, views: u64) -> PostView {
    let date = Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap();
    PostView {
      post: Post {
        id,
        title: format!("Post {id}"),
        excerpt: String::new(),
        content: String::new(),
        image: None,
        read_time: None,
        categories: categories.iter().map(|c| c.to_string()).collect(),
        author: author(),
        date,
        views,
        shares: 0,
      },
      likes,
      comments: (0..comments)
        .map(|i| CommentView {
          id: i as i64,
          content: "hi".into(),
          author: author(),
          date,
          likes: 0,
          replies: Vec::new(),
        })
        .collect(),
    }
  }

  #[test]
  fn trending_sums_likes_and_comments_per_category() {
    let posts = vec![
      view(1, &["Tech"], 5, 2, 0),
      view(2, &["Tech"], 1, 0, 0),
      view(3, &["Design"], 10, 0, 0),
    ];
    let topics = trending_topics(&posts, DEFAULT_TOP_N);
    let ranked: Vec<(&str, u64, usize)> =
      topics.iter().map(|t| (t.name.as_str(), t.engagement, t.count)).collect();
    assert_eq!(ranked, [("Design", 10, 1), ("Tech", 8, 2)]);
    assert_eq!(topics[1].latest_post, posts[1].post.date);
    assert!(topics[0].image.contains("design-design"));
  }

  #[test]
  fn trending_ties_keep_first_seen_order_and_truncate() {
    let posts = vec![
      view(1, &["Cloud", "Mobile"], 3, 0, 0),
      view(2, &["Security"], 3, 0, 0),
      view(3, &["AI & ML"], 1, 0, 0),
      view(4, &["DevOps"], 9, 0, 0),
    ];
    let names: Vec<String> =
      trending_topics(&posts, 4).into_iter().map(|t| t.name).collect();
    assert_eq!(names, ["DevOps", "Cloud", "Mobile", "Security"]);
  }

  #[test]
  fn popular_ranks_by_views_only() {
    let posts = vec![
      view(1, &["Tech"], 0, 0, 100),
      view(2, &["Tech"], 50, 0, 5),
      view(3, &["Tech"], 0, 0, 50),
      view(4, &["Tech"], 0, 0, 200),
    ];
    let views: Vec<u64> = popular_posts(&posts, 3).iter().map(|v| v.post.views).collect();
    assert_eq!(views, [200, 100, 50]);
  }

  #[test]
  fn popular_ties_keep_input_order() {
    let posts = vec![view(1, &["A"], 0, 0, 7), view(2, &["A"], 0, 0, 7), view(3, &["A"], 0, 0, 9)];
    let ids: Vec<i64> = popular_posts(&posts, 4).iter().map(|v| v.post.id).collect();
    assert_eq!(ids, [3, 1, 2]);
  }

  #[test]
  fn counts_and_filter() {
    let posts = vec![
      view(1, &["Tech", "Design"], 0, 0, 0),
      view(2, &["Tech"], 0, 0, 0),
    ];
    assert_eq!(
      category_counts(&posts),
      [
        CategoryCount { name: "Tech".into(), count: 2 },
        CategoryCount { name: "Design".into(), count: 1 },
      ]
    );
    assert_eq!(filter_by_category(&posts, "all").len(), 2);
    assert_eq!(filter_by_category(&posts, "").len(), 2);
    let design = filter_by_category(&posts, "Design");
    assert_eq!(design.len(), 1);
    assert_eq!(design[0].post.id, 1);
  }
}
