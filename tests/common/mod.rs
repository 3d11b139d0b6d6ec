//! Shared setup for the integration tests: a migrated in-memory database and a few
//! fixtures.

#![allow(dead_code)]

use potluck::api::recipes::{self, RecipeRequest, RecipeResponse};
use potluck::config::INSECURE_PASSWORD_HASHING_VAR;
use potluck::db::{create_pool, DbConn};
use potluck::store;
use potluck::{Config, Identity};

/// A fresh database with every migration applied, behind its only connection.
pub fn setup() -> DbConn {
    std::env::set_var(INSECURE_PASSWORD_HASHING_VAR, "1");
    potluck::telemetry::init_test_telemetry();

    let pool = create_pool(&Config::in_memory()).expect("in-memory pool");
    pool.get().expect("connection")
}

/// Insert a user directly, skipping password hashing.
pub fn user(conn: &mut DbConn, username: &str) -> Identity {
    let user = store::users::create_user(conn, username, "not-a-real-hash").expect("create user");
    Identity::from(&user)
}

pub fn recipe_request(body: serde_json::Value) -> RecipeRequest {
    serde_json::from_value(body).expect("recipe request")
}

pub fn recipe(conn: &mut DbConn, author: &Identity, title: &str) -> RecipeResponse {
    recipes::create_recipe(
        conn,
        Some(author),
        &recipe_request(serde_json::json!({ "title": title })),
    )
    .expect("create recipe")
}
