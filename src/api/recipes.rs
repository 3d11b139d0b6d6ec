use super::validation::{double_option, IntegerInput, Validator, REQUIRED};
use crate::auth::{require_user, Identity};
use crate::error::{Error, Result};
use crate::models::{Category, Ingredient, NewRecipe, Recipe, RecipeChangeset, RecipeRecord};
use crate::store;
use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

pub const TITLE_MAX_LENGTH: usize = 255;
pub const DIFFICULTY_MAX_LENGTH: usize = 50;
pub const IMAGE_MAX_LENGTH: usize = 100;
pub const DEFAULT_DIFFICULTY: &str = "medium";
pub const DEFAULT_COOKING_TIME: i32 = 0;
pub const DEFAULT_SERVINGS: i32 = 1;
pub const LIKES_READ_ONLY: &str = "Likes can only be changed by liking or unliking the recipe.";

/// Full recipe representation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    /// Author's username, null for unattributed recipes or deleted accounts
    pub author: Option<String>,
    pub likes_count: usize,
    /// Whether the requesting user has liked this recipe
    pub liked: bool,
    pub title: String,
    pub description: String,
    /// Stored list, entries as written. A non-list stored value reads as `[]`.
    #[schema(value_type = Vec<Ingredient>)]
    pub ingredients: Vec<serde_json::Value>,
    #[schema(value_type = Vec<String>)]
    pub steps: Vec<serde_json::Value>,
    pub image: Option<String>,
    pub difficulty: String,
    pub cooking_time: i32,
    pub servings: i32,
    pub category: Category,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    /// Ids of users who liked this recipe
    pub likes: Vec<i32>,
}

impl RecipeResponse {
    pub fn build(record: &RecipeRecord, identity: Option<&Identity>) -> Self {
        let recipe = &record.recipe;
        Self {
            id: recipe.id,
            author: record.author.clone(),
            likes_count: record.likes_count(),
            liked: record.is_liked_by(identity),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredient_list(),
            steps: recipe.step_list(),
            image: recipe.image.clone(),
            difficulty: recipe.difficulty.clone(),
            cooking_time: recipe.cooking_time,
            servings: recipe.servings,
            category: recipe.parsed_category(),
            views: recipe.views,
            created_at: recipe.created_at.and_utc(),
            likes: record.likes.iter().copied().collect(),
        }
    }
}

/// Writable recipe fields. Every field is optional on the wire; which ones are required
/// depends on whether the write is full or partial. `likes` is accepted only so that a
/// write carrying it can be rejected; the like set changes through [`toggle_like`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Vec<Ingredient>>)]
    pub ingredients: Option<serde_json::Value>,
    #[schema(value_type = Option<Vec<String>>)]
    pub steps: Option<serde_json::Value>,
    /// Path of an already uploaded image. Null clears it.
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    pub difficulty: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub cooking_time: Option<IntegerInput>,
    #[schema(value_type = Option<i32>)]
    pub servings: Option<IntegerInput>,
    pub category: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub views: Option<IntegerInput>,
    /// Read-only. Any value other than null is a validation error.
    #[schema(value_type = Option<Vec<i32>>)]
    pub likes: Option<serde_json::Value>,
}

impl RecipeRequest {
    /// Validate a create or full replace. `title` is required.
    pub fn validate(&self) -> Result<RecipeChangeset> {
        self.validate_fields(true)
    }

    /// Validate a partial update. Only the fields present are checked.
    pub fn validate_partial(&self) -> Result<RecipeChangeset> {
        self.validate_fields(false)
    }

    fn validate_fields(&self, full: bool) -> Result<RecipeChangeset> {
        let mut v = Validator::default();
        let mut changes = RecipeChangeset::default();

        match &self.title {
            Some(title) => changes.title = v.text("title", title, Some(TITLE_MAX_LENGTH), false),
            None if full => v.error("title", REQUIRED),
            None => {}
        }

        if let Some(description) = &self.description {
            changes.description = v.text("description", description, None, true);
        }

        if let Some(ingredients) = &self.ingredients {
            changes.ingredients = encode_list::<Ingredient>(
                &mut v,
                "ingredients",
                ingredients,
                "Expected a list of {quantity, item} objects.",
            );
        }

        if let Some(steps) = &self.steps {
            changes.steps =
                encode_list::<String>(&mut v, "steps", steps, "Expected a list of strings.");
        }

        match &self.image {
            Some(Some(image)) => {
                changes.image = v
                    .text("image", image, Some(IMAGE_MAX_LENGTH), true)
                    .map(|path| (!path.is_empty()).then_some(path));
            }
            Some(None) => changes.image = Some(None),
            None => {}
        }

        if let Some(difficulty) = &self.difficulty {
            changes.difficulty =
                v.text("difficulty", difficulty, Some(DIFFICULTY_MAX_LENGTH), false);
        }

        if let Some(cooking_time) = &self.cooking_time {
            changes.cooking_time = v.integer("cooking_time", cooking_time);
        }

        if let Some(servings) = &self.servings {
            changes.servings = v.integer("servings", servings);
        }

        if let Some(category) = &self.category {
            match category.parse::<Category>() {
                Ok(category) => changes.category = Some(category.as_str().to_string()),
                Err(e) => v.error("category", e.to_string()),
            }
        }

        if let Some(views) = &self.views {
            changes.views = v.integer("views", views);
        }

        if self.likes.is_some() {
            v.error("likes", LIKES_READ_ONLY);
        }

        v.finish()?;
        Ok(changes)
    }
}

/// Check a JSON list against its entry type and re-encode it for storage.
fn encode_list<T: Serialize + DeserializeOwned>(
    v: &mut Validator,
    field: &str,
    value: &serde_json::Value,
    reason: &str,
) -> Option<String> {
    let entries: Vec<T> = match serde_json::from_value(value.clone()) {
        Ok(entries) => entries,
        Err(_) => {
            v.error(field, reason);
            return None;
        }
    };

    match serde_json::to_string(&entries) {
        Ok(json) => Some(json),
        Err(e) => {
            v.error(field, e.to_string());
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ViewResponse {
    pub views: i32,
}

/// Create a recipe authored by the requesting user.
pub fn create_recipe(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    request: &RecipeRequest,
) -> Result<RecipeResponse> {
    let (author_id, _) = require_user(identity)?;
    insert(conn, Some(author_id), identity, request)
}

/// Create a recipe with no author, for administrative seeding.
pub fn create_unattributed_recipe(
    conn: &mut SqliteConnection,
    request: &RecipeRequest,
) -> Result<RecipeResponse> {
    insert(conn, None, None, request)
}

fn insert(
    conn: &mut SqliteConnection,
    author_id: Option<i32>,
    identity: Option<&Identity>,
    request: &RecipeRequest,
) -> Result<RecipeResponse> {
    let changes = request.validate()?;

    let new_recipe = NewRecipe {
        author_id,
        title: changes.title.as_deref().unwrap_or_default(),
        description: changes.description.as_deref().unwrap_or_default(),
        ingredients: changes.ingredients.clone().unwrap_or_else(|| "[]".to_string()),
        steps: changes.steps.clone().unwrap_or_else(|| "[]".to_string()),
        image: changes.image.as_ref().and_then(|image| image.as_deref()),
        difficulty: changes.difficulty.as_deref().unwrap_or(DEFAULT_DIFFICULTY),
        cooking_time: changes.cooking_time.unwrap_or(DEFAULT_COOKING_TIME),
        servings: changes.servings.unwrap_or(DEFAULT_SERVINGS),
        category: changes
            .category
            .as_deref()
            .unwrap_or(Category::default().as_str()),
        views: changes.views.unwrap_or(0),
        created_at: store::now(),
    };

    let recipe = store::recipes::insert_recipe(conn, &new_recipe)?;
    let record = store::recipes::load_record(conn, recipe)?;
    Ok(RecipeResponse::build(&record, identity))
}

pub fn get_recipe(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    id: i32,
) -> Result<RecipeResponse> {
    let recipe = store::recipes::get_recipe(conn, id)?;
    let record = store::recipes::load_record(conn, recipe)?;
    Ok(RecipeResponse::build(&record, identity))
}

/// All recipes, newest first, optionally limited to one category.
pub fn list_recipes(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    category: Option<Category>,
) -> Result<Vec<RecipeResponse>> {
    let recipes = store::recipes::list_recipes(conn, category)?;
    let records = store::recipes::load_records(conn, recipes)?;
    Ok(records
        .iter()
        .map(|record| RecipeResponse::build(record, identity))
        .collect())
}

/// Only a recipe's author may change or delete it.
fn authored_recipe(conn: &mut SqliteConnection, user_id: i32, id: i32) -> Result<Recipe> {
    let recipe = store::recipes::get_recipe(conn, id)?;
    if recipe.author_id != Some(user_id) {
        return Err(Error::Forbidden);
    }
    Ok(recipe)
}

/// Update a recipe. A full update (`partial == false`) requires `title`; fields that are
/// left out keep their stored values either way.
pub fn update_recipe(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    id: i32,
    request: &RecipeRequest,
    partial: bool,
) -> Result<RecipeResponse> {
    let (user_id, _) = require_user(identity)?;
    let changes = if partial {
        request.validate_partial()?
    } else {
        request.validate()?
    };

    authored_recipe(conn, user_id, id)?;
    let recipe = store::recipes::update_recipe(conn, id, &changes)?;
    let record = store::recipes::load_record(conn, recipe)?;
    Ok(RecipeResponse::build(&record, identity))
}

pub fn delete_recipe(conn: &mut SqliteConnection, identity: Option<&Identity>, id: i32) -> Result<()> {
    let (user_id, _) = require_user(identity)?;
    authored_recipe(conn, user_id, id)?;
    store::recipes::delete_recipe(conn, id)
}

/// Like the recipe if the requesting user has not yet, unlike it otherwise.
pub fn toggle_like(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    id: i32,
) -> Result<LikeResponse> {
    let (user_id, _) = require_user(identity)?;
    let liked = store::recipes::toggle_like(conn, id, user_id)?;
    let recipe = store::recipes::get_recipe(conn, id)?;
    let record = store::recipes::load_record(conn, recipe)?;
    Ok(LikeResponse {
        liked,
        likes_count: record.likes_count(),
    })
}

pub fn record_view(conn: &mut SqliteConnection, id: i32) -> Result<ViewResponse> {
    let views = store::recipes::increment_views(conn, id)?;
    Ok(ViewResponse { views })
}

#[derive(OpenApi)]
#[openapi(components(schemas(RecipeRequest, RecipeResponse, LikeResponse, ViewResponse)))]
pub struct ApiDoc;
