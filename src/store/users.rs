use super::{is_unique_violation, now};
use crate::error::{Error, Result};
use crate::models::{NewUser, User};
use crate::schema::{bookmarks, comments, recipe_likes, recipes, users};
use diesel::prelude::*;

pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// Insert a user. The caller hashes the password.
pub fn create_user(conn: &mut SqliteConnection, username: &str, password_hash: &str) -> Result<User> {
    let new_user = NewUser {
        username,
        password_hash,
        created_at: now(),
    };

    match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(conn)
    {
        Ok(user) => {
            tracing::info!(user_id = user.id, "created user");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => Err(Error::invalid("username", DUPLICATE_USERNAME)),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user(conn: &mut SqliteConnection, id: i32) -> Result<User> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::NotFound("user"))
}

pub fn find_user_by_username(conn: &mut SqliteConnection, username: &str) -> Result<Option<User>> {
    Ok(users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?)
}

/// Delete a user. Their bookmarks, comments and likes go with them; recipes they
/// authored stay and lose their author.
pub fn delete_user(conn: &mut SqliteConnection, id: i32) -> Result<()> {
    conn.transaction::<_, Error, _>(|conn| {
        let removed_bookmarks = diesel::delete(bookmarks::table.filter(bookmarks::user_id.eq(id)))
            .execute(conn)?;
        let removed_comments = diesel::delete(comments::table.filter(comments::author_id.eq(id)))
            .execute(conn)?;
        let removed_likes = diesel::delete(recipe_likes::table.filter(recipe_likes::user_id.eq(id)))
            .execute(conn)?;
        let orphaned = diesel::update(recipes::table.filter(recipes::author_id.eq(id)))
            .set(recipes::author_id.eq(None::<i32>))
            .execute(conn)?;

        let deleted = diesel::delete(users::table.find(id)).execute(conn)?;
        if deleted == 0 {
            return Err(Error::NotFound("user"));
        }

        tracing::info!(
            user_id = id,
            bookmarks = removed_bookmarks,
            comments = removed_comments,
            likes = removed_likes,
            orphaned_recipes = orphaned,
            "deleted user"
        );
        Ok(())
    })
}
