use super::validation::{IntegerInput, Validator, REQUIRED};
use crate::auth::{require_user, Identity};
use crate::error::{Error, Result};
use crate::models::{Bookmark, Category, RecipeRecord};
use crate::store;
use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

pub const INCORRECT_PK_TYPE: &str = "Incorrect type. Expected pk value.";

/// The slice of a recipe shown inside a bookmark.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookmarkedRecipe {
    pub id: i32,
    pub title: String,
    pub image: Option<String>,
    pub difficulty: String,
    pub cooking_time: i32,
    pub servings: i32,
    pub category: Category,
    pub likes_count: usize,
    pub liked: bool,
}

impl BookmarkedRecipe {
    pub fn build(record: &RecipeRecord, identity: Option<&Identity>) -> Self {
        let recipe = &record.recipe;
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            image: recipe.image.clone(),
            difficulty: recipe.difficulty.clone(),
            cooking_time: recipe.cooking_time,
            servings: recipe.servings,
            category: recipe.parsed_category(),
            likes_count: record.likes_count(),
            liked: record.is_liked_by(identity),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookmarkResponse {
    pub id: i32,
    pub recipe: BookmarkedRecipe,
    pub created_at: DateTime<Utc>,
}

impl BookmarkResponse {
    pub fn build(bookmark: &Bookmark, record: &RecipeRecord, identity: Option<&Identity>) -> Self {
        Self {
            id: bookmark.id,
            recipe: BookmarkedRecipe::build(record, identity),
            created_at: bookmark.created_at.and_utc(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookmarkRequest {
    #[schema(value_type = i32)]
    pub recipe_id: Option<IntegerInput>,
}

impl BookmarkRequest {
    pub fn validate(&self) -> Result<i32> {
        let mut v = Validator::default();
        let recipe_id = match &self.recipe_id {
            Some(raw) => {
                let id = raw.to_i32();
                if id.is_none() {
                    v.error("recipe_id", INCORRECT_PK_TYPE);
                }
                id
            }
            None => {
                v.error("recipe_id", REQUIRED);
                None
            }
        };

        v.finish()?;
        recipe_id.ok_or_else(|| Error::invalid("recipe_id", REQUIRED))
    }
}

/// Bookmark a recipe for the requesting user.
pub fn create_bookmark(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    request: &BookmarkRequest,
) -> Result<BookmarkResponse> {
    let (user_id, _) = require_user(identity)?;
    let recipe_id = request.validate()?;

    let bookmark = store::bookmarks::create_bookmark(conn, user_id, recipe_id)?;
    let recipe = store::recipes::get_recipe(conn, recipe_id)?;
    let record = store::recipes::load_record(conn, recipe)?;

    Ok(BookmarkResponse::build(&bookmark, &record, identity))
}

/// The requesting user's bookmarks, newest first.
pub fn list_bookmarks(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
) -> Result<Vec<BookmarkResponse>> {
    let (user_id, _) = require_user(identity)?;
    let rows = store::bookmarks::list_bookmarks(conn, user_id)?;

    Ok(rows
        .iter()
        .map(|(bookmark, record)| BookmarkResponse::build(bookmark, record, identity))
        .collect())
}

pub fn delete_bookmark(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    bookmark_id: i32,
) -> Result<()> {
    let (user_id, _) = require_user(identity)?;
    store::bookmarks::delete_bookmark(conn, user_id, bookmark_id)
}

#[derive(OpenApi)]
#[openapi(components(schemas(BookmarkRequest, BookmarkResponse, BookmarkedRecipe)))]
pub struct ApiDoc;
