//! Handlers for `/preferences`: the theme and the selected category.

use axum::{Json, extract::State};
use quill_core::{Blog, kv::KvStore, session::IdentityProvider};
use serde::{Deserialize, Serialize};

use crate::{SharedBlog, error::ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
  pub dark_mode:         bool,
  pub selected_category: String,
}

impl Preferences {
  fn of<K: KvStore, P: IdentityProvider>(blog: &Blog<K, P>) -> Self {
    Self {
      dark_mode:         blog.dark_mode(),
      selected_category: blog.selected_category().to_owned(),
    }
  }
}

/// Fields to change; absent fields are kept.
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesPatch {
  pub dark_mode:         Option<bool>,
  pub selected_category: Option<String>,
}

/// `GET /preferences`
pub async fn get<K, P>(State(blog): State<SharedBlog<K, P>>) -> Json<Preferences>
where
  K: KvStore,
  P: IdentityProvider,
{
  Json(Preferences::of(&*blog.lock().await))
}

/// `PUT /preferences`
pub async fn update<K, P>(
  State(blog): State<SharedBlog<K, P>>,
  Json(patch): Json<PreferencesPatch>,
) -> Result<Json<Preferences>, ApiError>
where
  K: KvStore,
  P: IdentityProvider,
{
  let mut blog = blog.lock().await;
  if let Some(dark) = patch.dark_mode {
    blog.set_dark_mode(dark)?;
  }
  if let Some(category) = &patch.selected_category {
    blog.set_selected_category(category)?;
  }
  Ok(Json(Preferences::of(&*blog)))
}
