use super::validation::Validator;
use crate::auth::{require_user, Identity};
use crate::error::{Error, Result};
use crate::models::Comment;
use crate::store;
use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    /// Username of the commenter
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn build(comment: &Comment, author: &str) -> Self {
        Self {
            id: comment.id,
            author: author.to_string(),
            text: comment.text.clone(),
            created_at: comment.created_at.and_utc(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    pub text: Option<String>,
}

/// Comment on a recipe as the requesting user.
pub fn create_comment(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    recipe_id: i32,
    request: &CommentRequest,
) -> Result<CommentResponse> {
    let (author_id, username) = require_user(identity)?;

    let mut v = Validator::default();
    let text = v.required_text("text", request.text.as_deref(), None);
    v.finish()?;
    let text = text.unwrap_or_default();

    let comment = store::comments::create_comment(conn, recipe_id, author_id, &text)?;
    Ok(CommentResponse::build(&comment, username))
}

/// A recipe's comments, oldest first.
pub fn list_comments(conn: &mut SqliteConnection, recipe_id: i32) -> Result<Vec<CommentResponse>> {
    let rows = store::comments::list_comments(conn, recipe_id)?;
    Ok(rows
        .iter()
        .map(|(comment, author)| CommentResponse::build(comment, author))
        .collect())
}

/// Delete a comment. Only its author may.
pub fn delete_comment(
    conn: &mut SqliteConnection,
    identity: Option<&Identity>,
    comment_id: i32,
) -> Result<()> {
    let (user_id, _) = require_user(identity)?;

    let comment = store::comments::get_comment(conn, comment_id)?;
    if comment.author_id != user_id {
        return Err(Error::Forbidden);
    }

    store::comments::delete_comment(conn, comment_id)
}

#[derive(OpenApi)]
#[openapi(components(schemas(CommentRequest, CommentResponse)))]
pub struct ApiDoc;
