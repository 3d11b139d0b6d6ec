use crate::error::{Error, Result};
use crate::models::{Category, NewRecipe, NewRecipeLike, Recipe, RecipeChangeset, RecipeRecord};
use crate::schema::{bookmarks, comments, recipe_likes, recipes, users};
use diesel::dsl::exists;
use diesel::prelude::*;
use std::collections::{BTreeSet, HashMap};

pub fn insert_recipe(conn: &mut SqliteConnection, new_recipe: &NewRecipe<'_>) -> Result<Recipe> {
    let recipe = diesel::insert_into(recipes::table)
        .values(new_recipe)
        .returning(Recipe::as_returning())
        .get_result(conn)?;

    tracing::info!(recipe_id = recipe.id, author_id = ?recipe.author_id, "created recipe");
    Ok(recipe)
}

pub fn get_recipe(conn: &mut SqliteConnection, id: i32) -> Result<Recipe> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::NotFound("recipe"))
}

pub fn recipe_exists(conn: &mut SqliteConnection, id: i32) -> Result<bool> {
    Ok(diesel::select(exists(recipes::table.find(id))).get_result::<bool>(conn)?)
}

/// All recipes, newest first.
pub fn list_recipes(conn: &mut SqliteConnection, category: Option<Category>) -> Result<Vec<Recipe>> {
    let mut query = recipes::table
        .select(Recipe::as_select())
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .into_boxed();

    if let Some(category) = category {
        query = query.filter(recipes::category.eq(category.as_str()));
    }

    Ok(query.load(conn)?)
}

pub fn update_recipe(
    conn: &mut SqliteConnection,
    id: i32,
    changes: &RecipeChangeset,
) -> Result<Recipe> {
    // An empty SET clause is a query builder error
    if changes.is_empty() {
        return get_recipe(conn, id);
    }

    diesel::update(recipes::table.find(id))
        .set(changes)
        .returning(Recipe::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or(Error::NotFound("recipe"))
}

/// Delete a recipe along with its bookmarks, comments and likes.
pub fn delete_recipe(conn: &mut SqliteConnection, id: i32) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        let removed_bookmarks = diesel::delete(bookmarks::table.filter(bookmarks::recipe_id.eq(id)))
            .execute(conn)?;
        let removed_comments = diesel::delete(comments::table.filter(comments::recipe_id.eq(id)))
            .execute(conn)?;
        let removed_likes = diesel::delete(recipe_likes::table.filter(recipe_likes::recipe_id.eq(id)))
            .execute(conn)?;

        let deleted = diesel::delete(recipes::table.find(id)).execute(conn)?;
        if deleted == 0 {
            return Err(Error::NotFound("recipe"));
        }

        tracing::info!(
            recipe_id = id,
            bookmarks = removed_bookmarks,
            comments = removed_comments,
            likes = removed_likes,
            "deleted recipe"
        );
        Ok(())
    })
}

pub fn load_record(conn: &mut SqliteConnection, recipe: Recipe) -> Result<RecipeRecord> {
    let mut records = load_records(conn, vec![recipe])?;
    records.pop().ok_or(Error::NotFound("recipe"))
}

/// Attach author usernames and like sets, two queries regardless of how many recipes.
pub fn load_records(conn: &mut SqliteConnection, rows: Vec<Recipe>) -> Result<Vec<RecipeRecord>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let author_ids: Vec<i32> = rows.iter().filter_map(|r| r.author_id).collect();

    let authors: HashMap<i32, String> = if author_ids.is_empty() {
        HashMap::new()
    } else {
        users::table
            .filter(users::id.eq_any(&author_ids))
            .select((users::id, users::username))
            .load::<(i32, String)>(conn)?
            .into_iter()
            .collect()
    };

    let mut likes: HashMap<i32, BTreeSet<i32>> = HashMap::new();
    for (recipe_id, user_id) in recipe_likes::table
        .filter(recipe_likes::recipe_id.eq_any(&recipe_ids))
        .select((recipe_likes::recipe_id, recipe_likes::user_id))
        .load::<(i32, i32)>(conn)?
    {
        likes.entry(recipe_id).or_default().insert(user_id);
    }

    Ok(rows
        .into_iter()
        .map(|recipe| RecipeRecord {
            author: recipe.author_id.and_then(|id| authors.get(&id).cloned()),
            likes: likes.remove(&recipe.id).unwrap_or_default(),
            recipe,
        })
        .collect())
}

pub fn count_likes(conn: &mut SqliteConnection, recipe_id: i32) -> Result<i64> {
    Ok(recipe_likes::table
        .filter(recipe_likes::recipe_id.eq(recipe_id))
        .count()
        .get_result::<i64>(conn)?)
}

pub fn is_liked(conn: &mut SqliteConnection, recipe_id: i32, user_id: i32) -> Result<bool> {
    Ok(
        diesel::select(exists(recipe_likes::table.find((recipe_id, user_id))))
            .get_result::<bool>(conn)?,
    )
}

/// Add or remove a user from a recipe's like set. Idempotent.
pub fn set_liked(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    user_id: i32,
    liked: bool,
) -> Result<()> {
    if !recipe_exists(conn, recipe_id)? {
        return Err(Error::NotFound("recipe"));
    }

    if liked {
        diesel::insert_or_ignore_into(recipe_likes::table)
            .values(&NewRecipeLike { recipe_id, user_id })
            .execute(conn)?;
    } else {
        diesel::delete(recipe_likes::table.find((recipe_id, user_id))).execute(conn)?;
    }

    Ok(())
}

/// Flip a user's like on a recipe, returning whether it is now liked.
pub fn toggle_like(conn: &mut SqliteConnection, recipe_id: i32, user_id: i32) -> Result<bool> {
    conn.transaction::<_, Error, _>(|conn| {
        let liked = !is_liked(conn, recipe_id, user_id)?;
        set_liked(conn, recipe_id, user_id, liked)?;
        tracing::debug!(recipe_id, user_id, liked, "toggled like");
        Ok(liked)
    })
}

/// Bump the view counter, returning the new count.
pub fn increment_views(conn: &mut SqliteConnection, recipe_id: i32) -> Result<i32> {
    diesel::update(recipes::table.find(recipe_id))
        .set(recipes::views.eq(recipes::views + 1))
        .returning(recipes::views)
        .get_result(conn)
        .optional()?
        .ok_or(Error::NotFound("recipe"))
}
