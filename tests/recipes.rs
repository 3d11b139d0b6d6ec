mod common;

use common::{recipe, recipe_request, setup, user};
use diesel::prelude::*;
use potluck::api::bookmarks::{self, BookmarkRequest};
use potluck::api::comments::{self, CommentRequest};
use potluck::api::recipes::{self, RecipeRequest};
use potluck::models::Category;
use potluck::schema::recipes as recipes_table;
use potluck::{store, Error, Identity};
use serde_json::json;

#[test]
fn test_create_applies_defaults() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");

    let created = recipe(&mut conn, &alice, "Toast");
    assert_eq!(created.author.as_deref(), Some("alice"));
    assert_eq!(created.description, "");
    assert!(created.ingredients.is_empty());
    assert!(created.steps.is_empty());
    assert_eq!(created.image, None);
    assert_eq!(created.difficulty, "medium");
    assert_eq!(created.cooking_time, 0);
    assert_eq!(created.servings, 1);
    assert_eq!(created.category, Category::Main);
    assert_eq!(created.views, 0);
    assert_eq!(created.likes_count, 0);
    assert!(!created.liked);
}

#[test]
fn test_create_requires_identity() {
    let mut conn = setup();
    let request = recipe_request(json!({"title": "Toast"}));

    assert!(matches!(
        recipes::create_recipe(&mut conn, None, &request),
        Err(Error::Unauthenticated)
    ));
    assert!(matches!(
        recipes::create_recipe(&mut conn, Some(&Identity::Anonymous), &request),
        Err(Error::Unauthenticated)
    ));
    assert!(recipes::list_recipes(&mut conn, None, None).unwrap().is_empty());
}

#[test]
fn test_unattributed_recipe_has_no_author() {
    let mut conn = setup();
    let created = recipes::create_unattributed_recipe(
        &mut conn,
        &recipe_request(json!({"title": "House Salad", "category": "salad"})),
    )
    .unwrap();

    assert_eq!(created.author, None);
    assert_eq!(created.category, Category::Salad);
}

#[test]
fn test_invalid_category_stores_nothing() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");

    let err = recipes::create_recipe(
        &mut conn,
        Some(&alice),
        &recipe_request(json!({"title": "Brunch", "category": "brunch"})),
    )
    .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "category");
    assert!(recipes::list_recipes(&mut conn, None, None).unwrap().is_empty());
}

#[test]
fn test_corrupted_lists_read_as_empty() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let created = recipes::create_recipe(
        &mut conn,
        Some(&alice),
        &recipe_request(json!({
            "title": "Bread",
            "ingredients": [{"quantity": "500 g", "item": "flour"}],
            "steps": ["Knead.", "Bake."],
        })),
    )
    .unwrap();
    assert_eq!(created.ingredients.len(), 1);
    assert_eq!(created.steps, vec![json!("Knead."), json!("Bake.")]);

    diesel::update(recipes_table::table.find(created.id))
        .set((
            recipes_table::ingredients.eq("\"flour, water\""),
            recipes_table::steps.eq("{broken"),
        ))
        .execute(&mut *conn)
        .unwrap();

    let read = recipes::get_recipe(&mut conn, None, created.id).unwrap();
    assert!(read.ingredients.is_empty());
    assert!(read.steps.is_empty());

    let json = serde_json::to_value(&read).unwrap();
    assert_eq!(json["ingredients"], json!([]));
    assert_eq!(json["steps"], json!([]));
}

#[test]
fn test_stored_list_entries_read_back_unchanged() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let created = recipe(&mut conn, &alice, "Omelette");

    diesel::update(recipes_table::table.find(created.id))
        .set((
            recipes_table::ingredients
                .eq(r#"[{"quantity": 2, "item": "eggs"}, {"item": "salt", "note": "pinch"}]"#),
            recipes_table::steps.eq(r#"["Stir.", 3]"#),
        ))
        .execute(&mut *conn)
        .unwrap();

    let read = recipes::get_recipe(&mut conn, None, created.id).unwrap();
    assert_eq!(
        read.ingredients,
        vec![
            json!({"quantity": 2, "item": "eggs"}),
            json!({"item": "salt", "note": "pinch"}),
        ]
    );
    assert_eq!(read.steps, vec![json!("Stir."), json!(3)]);
}

#[test]
fn test_toggle_like_moves_count_by_one() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let bob = user(&mut conn, "bob");
    let soup = recipe(&mut conn, &alice, "Soup");

    let liked = recipes::toggle_like(&mut conn, Some(&bob), soup.id).unwrap();
    assert!(liked.liked);
    assert_eq!(liked.likes_count, 1);

    let as_bob = recipes::get_recipe(&mut conn, Some(&bob), soup.id).unwrap();
    assert!(as_bob.liked);
    assert_eq!(as_bob.likes_count, 1);
    assert_eq!(as_bob.likes, vec![bob.user_id().unwrap()]);

    let as_alice = recipes::get_recipe(&mut conn, Some(&alice), soup.id).unwrap();
    assert!(!as_alice.liked);

    let anonymous = recipes::get_recipe(&mut conn, Some(&Identity::Anonymous), soup.id).unwrap();
    assert!(!anonymous.liked);
    assert_eq!(anonymous.likes_count, 1);

    let unliked = recipes::toggle_like(&mut conn, Some(&bob), soup.id).unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.likes_count, 0);
}

#[test]
fn test_like_is_idempotent_per_user() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let soup = recipe(&mut conn, &alice, "Soup");
    let user_id = alice.user_id().unwrap();

    store::recipes::set_liked(&mut conn, soup.id, user_id, true).unwrap();
    store::recipes::set_liked(&mut conn, soup.id, user_id, true).unwrap();
    assert_eq!(store::recipes::count_likes(&mut conn, soup.id).unwrap(), 1);

    assert!(matches!(
        recipes::toggle_like(&mut conn, Some(&alice), 9999),
        Err(Error::NotFound("recipe"))
    ));
}

#[test]
fn test_record_view_increments() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let soup = recipe(&mut conn, &alice, "Soup");

    assert_eq!(recipes::record_view(&mut conn, soup.id).unwrap().views, 1);
    assert_eq!(recipes::record_view(&mut conn, soup.id).unwrap().views, 2);
    assert_eq!(recipes::get_recipe(&mut conn, None, soup.id).unwrap().views, 2);
    assert!(recipes::record_view(&mut conn, 9999).is_err());
}

#[test]
fn test_list_filters_by_category_newest_first() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");

    for (title, category) in [("Cake", "dessert"), ("Stew", "main"), ("Pie", "dessert")] {
        recipes::create_recipe(
            &mut conn,
            Some(&alice),
            &recipe_request(json!({"title": title, "category": category})),
        )
        .unwrap();
    }

    let all = recipes::list_recipes(&mut conn, None, None).unwrap();
    let titles: Vec<_> = all.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Pie", "Stew", "Cake"]);

    let desserts = recipes::list_recipes(&mut conn, None, Some(Category::Dessert)).unwrap();
    let titles: Vec<_> = desserts.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Pie", "Cake"]);
}

#[test]
fn test_only_author_may_update() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let bob = user(&mut conn, "bob");
    let soup = recipe(&mut conn, &alice, "Soup");

    let patch = recipe_request(json!({"servings": "6", "image": "recipes/soup.jpg"}));
    assert!(matches!(
        recipes::update_recipe(&mut conn, Some(&bob), soup.id, &patch, true),
        Err(Error::Forbidden)
    ));

    let updated = recipes::update_recipe(&mut conn, Some(&alice), soup.id, &patch, true).unwrap();
    assert_eq!(updated.servings, 6);
    assert_eq!(updated.title, "Soup");
    assert_eq!(updated.image.as_deref(), Some("recipes/soup.jpg"));

    // Full updates need a title
    let err = recipes::update_recipe(&mut conn, Some(&alice), soup.id, &patch, false).unwrap_err();
    assert_eq!(err.field_errors()[0].field, "title");

    let cleared = recipes::update_recipe(
        &mut conn,
        Some(&alice),
        soup.id,
        &recipe_request(json!({"image": null})),
        true,
    )
    .unwrap();
    assert_eq!(cleared.image, None);

    let unchanged =
        recipes::update_recipe(&mut conn, Some(&alice), soup.id, &RecipeRequest::default(), true)
            .unwrap();
    assert_eq!(unchanged.servings, 6);
}

#[test]
fn test_delete_removes_dependents() {
    let mut conn = setup();
    let alice = user(&mut conn, "alice");
    let bob = user(&mut conn, "bob");
    let soup = recipe(&mut conn, &alice, "Soup");

    recipes::toggle_like(&mut conn, Some(&bob), soup.id).unwrap();
    bookmarks::create_bookmark(
        &mut conn,
        Some(&bob),
        &BookmarkRequest {
            recipe_id: Some(soup.id.into()),
        },
    )
    .unwrap();
    comments::create_comment(
        &mut conn,
        Some(&bob),
        soup.id,
        &CommentRequest {
            text: Some("Yum".to_string()),
        },
    )
    .unwrap();

    assert!(matches!(
        recipes::delete_recipe(&mut conn, Some(&bob), soup.id),
        Err(Error::Forbidden)
    ));
    recipes::delete_recipe(&mut conn, Some(&alice), soup.id).unwrap();

    assert!(matches!(
        recipes::get_recipe(&mut conn, None, soup.id),
        Err(Error::NotFound("recipe"))
    ));
    assert!(bookmarks::list_bookmarks(&mut conn, Some(&bob)).unwrap().is_empty());
    assert_eq!(store::recipes::count_likes(&mut conn, soup.id).unwrap(), 0);
    assert!(store::recipes::is_liked(&mut conn, soup.id, bob.user_id().unwrap()).is_ok_and(|l| !l));
}
