use super::{is_foreign_key_violation, is_unique_violation, now, recipes::load_records};
use crate::error::{Error, Result};
use crate::models::{Bookmark, NewBookmark, Recipe, RecipeRecord};
use crate::schema::{bookmarks, recipes};
use diesel::prelude::*;

pub const DUPLICATE_BOOKMARK: &str = "The fields user, recipe must make a unique set.";

pub(crate) fn missing_recipe(recipe_id: i32) -> Error {
    Error::invalid(
        "recipe_id",
        format!("Invalid pk \"{recipe_id}\" - object does not exist."),
    )
}

/// Bookmark a recipe for a user.
///
/// An unknown recipe is a validation error on `recipe_id`. A second bookmark of the same
/// recipe loses on the unique index, even when two requests race past the existence check.
pub fn create_bookmark(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<Bookmark> {
    conn.transaction::<_, Error, _>(|conn| {
        if !super::recipes::recipe_exists(conn, recipe_id)? {
            return Err(missing_recipe(recipe_id));
        }

        let new_bookmark = NewBookmark {
            user_id,
            recipe_id,
            created_at: now(),
        };

        match diesel::insert_into(bookmarks::table)
            .values(&new_bookmark)
            .returning(Bookmark::as_returning())
            .get_result(conn)
        {
            Ok(bookmark) => {
                tracing::info!(bookmark_id = bookmark.id, user_id, recipe_id, "created bookmark");
                Ok(bookmark)
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(user_id, recipe_id, "rejected duplicate bookmark");
                Err(Error::invalid("non_field_errors", DUPLICATE_BOOKMARK))
            }
            Err(e) if is_foreign_key_violation(&e) => Err(missing_recipe(recipe_id)),
            Err(e) => Err(e.into()),
        }
    })
}

/// A user's bookmarks with their recipes, newest first.
pub fn list_bookmarks(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Vec<(Bookmark, RecipeRecord)>> {
    let rows: Vec<(Bookmark, Recipe)> = bookmarks::table
        .inner_join(recipes::table)
        .filter(bookmarks::user_id.eq(user_id))
        .order((bookmarks::created_at.desc(), bookmarks::id.desc()))
        .select((Bookmark::as_select(), Recipe::as_select()))
        .load(conn)?;

    let (marks, bookmarked): (Vec<Bookmark>, Vec<Recipe>) = rows.into_iter().unzip();
    let records = load_records(conn, bookmarked)?;

    Ok(marks.into_iter().zip(records).collect())
}

pub fn count_bookmarks(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<i64> {
    Ok(bookmarks::table
        .filter(bookmarks::user_id.eq(user_id))
        .filter(bookmarks::recipe_id.eq(recipe_id))
        .count()
        .get_result::<i64>(conn)?)
}

/// Remove one of the user's bookmarks. Someone else's bookmark is reported as not found.
pub fn delete_bookmark(conn: &mut SqliteConnection, user_id: i32, bookmark_id: i32) -> Result<()> {
    let deleted = diesel::delete(
        bookmarks::table
            .filter(bookmarks::id.eq(bookmark_id))
            .filter(bookmarks::user_id.eq(user_id)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(Error::NotFound("bookmark"));
    }

    tracing::info!(bookmark_id, user_id, "deleted bookmark");
    Ok(())
}
