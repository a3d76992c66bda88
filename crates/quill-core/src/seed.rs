//! Sample content for an empty store.

use chrono::{DateTime, Datelike as _, Months, TimeDelta, Utc};
use rand::{
  Rng,
  seq::{IndexedRandom as _, SliceRandom as _},
};

use crate::{image::image_url, post::Post, user::Author};

/// Categories sample posts are drawn from.
pub const TOPICS: [&str; 10] = [
  "Technology",
  "Development",
  "Design",
  "AI & ML",
  "Mobile",
  "Web Dev",
  "Cloud",
  "Security",
  "Data Science",
  "DevOps",
];

const SECTIONS: [(&str, &str); 8] = [
  (
    "Introduction",
    "Welcome to our comprehensive guide on {topic}. In this article, we'll explore the fundamental concepts, best practices, and advanced techniques that make {topic} such a powerful tool in modern development.",
  ),
  (
    "Key Concepts",
    "Understanding the core principles of {topic} is essential for any developer looking to master this technology. Let's break down the most important concepts you need to know.",
  ),
  (
    "Getting Started",
    "Before diving deep into {topic}, let's set up our development environment and understand the basic requirements.",
  ),
  (
    "Best Practices",
    "Following established best practices in {topic} will help you write cleaner, more maintainable code.",
  ),
  (
    "Advanced Techniques",
    "Once you've mastered the basics, these advanced {topic} techniques will help you tackle more complex challenges.",
  ),
  (
    "Real-World Examples",
    "Let's look at some practical examples of {topic} in action and how to apply the concepts we've discussed.",
  ),
  (
    "Common Challenges",
    "When working with {topic}, you might encounter several common challenges. Here's how to address them effectively.",
  ),
  (
    "Future Trends",
    "The {topic} ecosystem is constantly evolving. Stay ahead of the curve by understanding upcoming developments in this field.",
  ),
];

const EXCERPTS: [&str; 6] = [
  "Discover the essential concepts and best practices in {topic}.",
  "A comprehensive guide to understanding {topic} and its practical applications.",
  "Deep dive into {topic}: tips, tricks, and advanced techniques for developers of all skill levels.",
  "Everything you need to know about {topic}, from basic concepts to advanced implementations.",
  "Learn how to leverage {topic} to build scalable and maintainable applications.",
  "Explore the latest trends and innovations in {topic} development.",
];

fn authors() -> Vec<Author> {
  [
    (1, "Demo User", "Senior Developer"),
    (2, "Jane Smith", "UX Designer"),
    (3, "Mike Johnson", "Tech Lead"),
    (4, "Sarah Wilson", "Full Stack Developer"),
    (5, "David Brown", "DevOps Engineer"),
  ]
  .into_iter()
  .map(|(id, name, role)| Author {
    id,
    name: name.to_owned(),
    avatar: format!("https://picsum.photos/seed/author{id}/100/100"),
    role: role.to_owned(),
  })
  .collect()
}

fn title<R: Rng + ?Sized>(rng: &mut R, topic: &str, year: i32) -> String {
  match rng.random_range(0..8) {
    0 => format!("Complete Guide to {topic}"),
    1 => format!("{topic} Best Practices in {year}"),
    2 => format!("Understanding {topic}: A Comprehensive Guide"),
    3 => format!("Getting Started with {topic}"),
    4 => format!("Advanced {topic} Techniques"),
    5 => format!("Mastering {topic}"),
    6 => format!("{topic} for Beginners"),
    _ => format!("Modern {topic} Solutions"),
  }
}

/// Four to six shuffled sections, each an `<h2>` heading and a paragraph.
fn content<R: Rng + ?Sized>(rng: &mut R, topic: &str) -> String {
  let mut sections = SECTIONS.to_vec();
  sections.shuffle(rng);
  let take = rng.random_range(4..=6);
  sections
    .into_iter()
    .take(take)
    .map(|(heading, body)| format!("<h2>{heading}</h2>\n<p>{}</p>", body.replace("{topic}", topic)))
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// One or two distinct categories.
fn categories<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
  let mut topics = TOPICS.to_vec();
  topics.shuffle(rng);
  let take = rng.random_range(1..=2);
  topics.into_iter().take(take).map(str::to_owned).collect()
}

/// Generate `count` posts dated within the three months before `now`, with
/// ids `1..=count`, newest first.
pub fn generate_posts<R: Rng + ?Sized>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<Post> {
  let authors = authors();
  let start = now.checked_sub_months(Months::new(3)).unwrap_or(now);
  let span_ms = (now - start).num_milliseconds().max(0);

  let mut posts: Vec<Post> = (1..=count as i64)
    .map(|id| {
      let topic = TOPICS.choose(rng).copied().unwrap_or("Technology");
      let author = authors.choose(rng).cloned().unwrap_or_else(|| authors[0].clone());
      let title = title(rng, topic, now.year());
      let categories = categories(rng);
      let excerpt = EXCERPTS.choose(rng).copied().unwrap_or(EXCERPTS[0]);
      Post {
        id,
        excerpt: excerpt.replace("{topic}", topic),
        content: content(rng, topic),
        image: Some(image_url(&title, &categories)),
        read_time: Some(format!("{} min", rng.random_range(5..15))),
        title,
        categories,
        author,
        date: start + TimeDelta::milliseconds(rng.random_range(0..=span_ms)),
        views: rng.random_range(0..1000),
        shares: rng.random_range(0..50),
      }
    })
    .collect();

  posts.sort_by(|a, b| b.date.cmp(&a.date));
  posts
}
