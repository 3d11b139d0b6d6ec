use super::{is_foreign_key_violation, now, recipes::recipe_exists};
use crate::error::{Error, Result};
use crate::models::{Comment, NewComment};
use crate::schema::{comments, users};
use diesel::prelude::*;

pub fn create_comment(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    author_id: i32,
    text: &str,
) -> Result<Comment> {
    conn.transaction::<_, Error, _>(|conn| {
        if !recipe_exists(conn, recipe_id)? {
            return Err(Error::NotFound("recipe"));
        }

        let new_comment = NewComment {
            recipe_id,
            author_id,
            text,
            created_at: now(),
        };

        match diesel::insert_into(comments::table)
            .values(&new_comment)
            .returning(Comment::as_returning())
            .get_result(conn)
        {
            Ok(comment) => {
                tracing::info!(comment_id = comment.id, recipe_id, author_id, "created comment");
                Ok(comment)
            }
            Err(e) if is_foreign_key_violation(&e) => Err(Error::NotFound("recipe")),
            Err(e) => Err(e.into()),
        }
    })
}

pub fn get_comment(conn: &mut SqliteConnection, id: i32) -> Result<Comment> {
    comments::table
        .find(id)
        .select(Comment::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::NotFound("comment"))
}

/// A recipe's comments with their authors' usernames, oldest first.
pub fn list_comments(conn: &mut SqliteConnection, recipe_id: i32) -> Result<Vec<(Comment, String)>> {
    if !recipe_exists(conn, recipe_id)? {
        return Err(Error::NotFound("recipe"));
    }

    Ok(comments::table
        .inner_join(users::table)
        .filter(comments::recipe_id.eq(recipe_id))
        .order((comments::created_at.asc(), comments::id.asc()))
        .select((Comment::as_select(), users::username))
        .load(conn)?)
}

pub fn delete_comment(conn: &mut SqliteConnection, id: i32) -> Result<()> {
    let deleted = diesel::delete(comments::table.find(id)).execute(conn)?;
    if deleted == 0 {
        return Err(Error::NotFound("comment"));
    }

    tracing::info!(comment_id = id, "deleted comment");
    Ok(())
}
