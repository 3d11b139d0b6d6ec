use crate::auth::{verify_password, Identity};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn check_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub created_at: NaiveDateTime,
}

/// Recipe category. Stored as its lowercase name.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dessert,
    Appetizer,
    Snack,
    #[default]
    Main,
    Beverage,
    Salad,
    Soup,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Dessert,
        Category::Appetizer,
        Category::Snack,
        Category::Main,
        Category::Beverage,
        Category::Salad,
        Category::Soup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Dessert => "dessert",
            Category::Appetizer => "appetizer",
            Category::Snack => "snack",
            Category::Main => "main",
            Category::Beverage => "beverage",
            Category::Salad => "salad",
            Category::Soup => "soup",
        }
    }

    /// Human readable name for menus and headings.
    pub fn label(self) -> &'static str {
        match self {
            Category::Dessert => "Dessert",
            Category::Appetizer => "Appetizer",
            Category::Snack => "Snack",
            Category::Main => "Main course",
            Category::Beverage => "Beverage",
            Category::Salad => "Salad",
            Category::Soup => "Soup",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\"{0}\" is not a valid choice.")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// Ingredient structure for the JSON ingredients column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    #[serde(default)]
    pub quantity: String,
    pub item: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: i32,
    pub author_id: Option<i32>,
    pub title: String,
    pub description: String,
    /// Raw JSON as stored. May hold legacy or corrupted data.
    pub ingredients: String,
    /// Raw JSON as stored. May hold legacy or corrupted data.
    pub steps: String,
    pub image: Option<String>,
    pub difficulty: String,
    pub cooking_time: i32,
    pub servings: i32,
    pub category: String,
    pub views: i32,
    pub created_at: NaiveDateTime,
}

impl Recipe {
    /// Stored ingredients as a list. Anything that is not a JSON array reads as empty;
    /// an array comes back entry for entry as stored.
    pub fn ingredient_list(&self) -> Vec<serde_json::Value> {
        decode_list(self.id, "ingredients", &self.ingredients)
    }

    /// Stored steps as a list, with the same leniency as [`Recipe::ingredient_list`].
    pub fn step_list(&self) -> Vec<serde_json::Value> {
        decode_list(self.id, "steps", &self.steps)
    }

    pub fn parsed_category(&self) -> Category {
        self.category.parse().unwrap_or_else(|_| {
            tracing::warn!(
                recipe_id = self.id,
                category = %self.category,
                "unknown stored category, reading as main"
            );
            Category::Main
        })
    }
}

fn decode_list(recipe_id: i32, column: &str, raw: &str) -> Vec<serde_json::Value> {
    match serde_json::from_str(raw) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!(recipe_id, column, "stored value is not a list, reading as empty list");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(recipe_id, column, error = %e, "stored value is not JSON, reading as empty list");
            Vec::new()
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: Option<i32>,
    pub title: &'a str,
    pub description: &'a str,
    pub ingredients: String,
    pub steps: String,
    pub image: Option<&'a str>,
    pub difficulty: &'a str,
    pub cooking_time: i32,
    pub servings: i32,
    pub category: &'a str,
    pub views: i32,
    pub created_at: NaiveDateTime,
}

/// Column updates for a recipe. `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub image: Option<Option<String>>,
    pub difficulty: Option<String>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub category: Option<String>,
    pub views: Option<i32>,
}

impl RecipeChangeset {
    pub fn is_empty(&self) -> bool {
        *self == RecipeChangeset::default()
    }
}

/// A recipe together with the relations its representations read.
#[derive(Debug, Clone)]
pub struct RecipeRecord {
    pub recipe: Recipe,
    /// Author's username, `None` once the author account is gone.
    pub author: Option<String>,
    /// Ids of users who liked the recipe.
    pub likes: BTreeSet<i32>,
}

impl RecipeRecord {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, identity: Option<&Identity>) -> bool {
        identity
            .filter(|identity| identity.is_authenticated())
            .and_then(Identity::user_id)
            .is_some_and(|user_id| self.likes.contains(&user_id))
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_likes)]
pub struct NewRecipeLike {
    pub recipe_id: i32,
    pub user_id: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::bookmarks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Bookmark {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::bookmarks)]
pub struct NewBookmark {
    pub user_id: i32,
    pub recipe_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Comment {
    pub id: i32,
    pub recipe_id: i32,
    pub author_id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment<'a> {
    pub recipe_id: i32,
    pub author_id: i32,
    pub text: &'a str,
    pub created_at: NaiveDateTime,
}

/// A stored recipe with default column values, for unit tests.
#[cfg(test)]
pub(crate) fn sample_recipe(id: i32) -> Recipe {
    Recipe {
        id,
        author_id: None,
        title: "Tomato Soup".to_string(),
        description: String::new(),
        ingredients: "[]".to_string(),
        steps: "[]".to_string(),
        image: None,
        difficulty: "medium".to_string(),
        cooking_time: 0,
        servings: 1,
        category: "main".to_string(),
        views: 0,
        created_at: chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .naive_utc(),
    }
}
