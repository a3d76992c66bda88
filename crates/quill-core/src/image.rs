//! Deterministic placeholder-image URLs derived from post text.

/// Lower-case `text` and collapse each whitespace run into a single `-`.
fn slug(text: &str) -> String {
  text.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// `"{title}-{category-category…}"`, slugged.
pub fn image_seed(title: &str, categories: &[String]) -> String {
  let categories: Vec<String> = categories.iter().map(|c| slug(c)).collect();
  format!("{}-{}", slug(title), categories.join("-"))
}

pub fn image_url(title: &str, categories: &[String]) -> String {
  format!("https://picsum.photos/seed/{}/800/400", image_seed(title, categories))
}
