//! Free-text search over titles, excerpts, categories and author names.

use crate::post::PostView;

/// Shorter queries return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// Case-insensitive substring search. Results keep the input order.
pub fn search<'a, I>(posts: I, query: &str) -> Vec<&'a PostView>
where
  I: IntoIterator<Item = &'a PostView>,
{
  let needle = query.trim().to_lowercase();
  if needle.chars().count() < MIN_QUERY_LEN {
    return Vec::new();
  }
  posts.into_iter().filter(|v| matches(v, &needle)).collect()
}

fn matches(view: &PostView, needle: &str) -> bool {
  let post = &view.post;
  post.title.to_lowercase().contains(needle)
    || post.excerpt.to_lowercase().contains(needle)
    || post.categories.iter().any(|c| c.to_lowercase().contains(needle))
    || post.author.name.to_lowercase().contains(needle)
}
