//! JSON representations of the entities, and the operations that read and write them.
//!
//! Every operation takes the requesting identity explicitly. Reads derive `likes_count`,
//! `liked` and author usernames at call time; writes validate the whole request before
//! touching the store.

pub mod bookmarks;
pub mod comments;
pub mod recipes;
pub mod users;
pub mod validation;

use crate::error::FieldError;
use crate::models::{Category, Ingredient};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field detail for validation failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// Generate the OpenAPI document by merging all module schemas
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(components(schemas(ErrorResponse, FieldError, Ingredient, Category)))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        users::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        bookmarks::ApiDoc::openapi(),
        comments::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
