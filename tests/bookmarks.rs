mod common;

use common::{recipe, setup, user};
use potluck::api::bookmarks::{self, BookmarkRequest};
use potluck::api::recipes;
use potluck::api::validation::REQUIRED;
use potluck::store::bookmarks::DUPLICATE_BOOKMARK;
use potluck::{store, Error, FieldError, Identity};

fn request(recipe_id: i32) -> BookmarkRequest {
    BookmarkRequest {
        recipe_id: Some(recipe_id.into()),
    }
}

#[test]
fn test_bookmark_owner_comes_from_identity() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let bob = user(&mut conn, "bob");
    let soup = recipe(&mut conn, &alice, "Soup");

    let created = bookmarks::create_bookmark(&mut conn, Some(&bob), &request(soup.id)).unwrap();
    assert_eq!(created.recipe.id, soup.id);
    assert_eq!(created.recipe.title, "Soup");

    assert_eq!(bookmarks::list_bookmarks(&mut conn, Some(&bob)).unwrap().len(), 1);
    assert!(bookmarks::list_bookmarks(&mut conn, Some(&alice)).unwrap().is_empty());
}

#[test]
fn test_nested_recipe_reflects_viewer_likes() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let soup = recipe(&mut conn, &alice, "Soup");

    recipes::toggle_like(&mut conn, Some(&alice), soup.id).unwrap();
    let created = bookmarks::create_bookmark(&mut conn, Some(&alice), &request(soup.id)).unwrap();
    assert!(created.recipe.liked);
    assert_eq!(created.recipe.likes_count, 1);
}

#[test]
fn test_duplicate_bookmark_keeps_one_row() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let soup = recipe(&mut conn, &alice, "Soup");

    bookmarks::create_bookmark(&mut conn, Some(&alice), &request(soup.id)).unwrap();
    let err = bookmarks::create_bookmark(&mut conn, Some(&alice), &request(soup.id)).unwrap_err();
    assert_eq!(
        err.field_errors(),
        &[FieldError::new("non_field_errors", DUPLICATE_BOOKMARK)]
    );

    let user_id = alice.user_id().unwrap();
    assert_eq!(
        store::bookmarks::count_bookmarks(&mut conn, user_id, soup.id).unwrap(),
        1
    );
}

#[test]
fn test_unknown_recipe_creates_nothing() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");

    let err = bookmarks::create_bookmark(&mut conn, Some(&alice), &request(4242)).unwrap_err();
    assert_eq!(
        err.field_errors(),
        &[FieldError::new(
            "recipe_id",
            "Invalid pk \"4242\" - object does not exist."
        )]
    );

    let err =
        bookmarks::create_bookmark(&mut conn, Some(&alice), &BookmarkRequest::default()).unwrap_err();
    assert_eq!(err.field_errors(), &[FieldError::new("recipe_id", REQUIRED)]);

    assert!(bookmarks::list_bookmarks(&mut conn, Some(&alice)).unwrap().is_empty());
}

#[test]
fn test_anonymous_cannot_bookmark() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let soup = recipe(&mut conn, &alice, "Soup");

    assert!(matches!(
        bookmarks::create_bookmark(&mut conn, Some(&Identity::Anonymous), &request(soup.id)),
        Err(Error::Unauthenticated)
    ));
    assert!(matches!(
        bookmarks::list_bookmarks(&mut conn, None),
        Err(Error::Unauthenticated)
    ));
}

#[test]
fn test_delete_only_own_bookmark() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let bob = user(&mut conn, "bob");
    let soup = recipe(&mut conn, &alice, "Soup");

    let created = bookmarks::create_bookmark(&mut conn, Some(&alice), &request(soup.id)).unwrap();

    assert!(matches!(
        bookmarks::delete_bookmark(&mut conn, Some(&bob), created.id),
        Err(Error::NotFound("bookmark"))
    ));
    bookmarks::delete_bookmark(&mut conn, Some(&alice), created.id).unwrap();
    assert!(bookmarks::list_bookmarks(&mut conn, Some(&alice)).unwrap().is_empty());

    // Bookmarking again after removal is allowed
    bookmarks::create_bookmark(&mut conn, Some(&alice), &request(soup.id)).unwrap();
}
