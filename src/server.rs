//! JSON HTTP API over [`MealPlanner`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::category::Category;
use crate::errors::PlannerError;
use crate::planner::MealPlanner;
use crate::shopping_list::ShoppingList;
use crate::types::{FilterOptions, Recipe};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipesResponse {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShoppingListRequest {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListResponse {
    pub categories: ShoppingList,
    pub share_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub ingredient: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategorizeResponse {
    pub category: Category,
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundResponse {
    pub image_url: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = match self {
            PlannerError::Validation(_) => StatusCode::BAD_REQUEST,
            PlannerError::Generation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.to_string())
    }
}

async fn generate_recipes(
    State(planner): State<Arc<MealPlanner>>,
    payload: Result<Json<FilterOptions>, JsonRejection>,
) -> Response {
    let Json(filters) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            log::warn!("Rejected generation request: {}", rejection.body_text());
            return PlannerError::Validation(rejection.body_text()).into_response();
        }
    };

    match planner.submit_filters(&filters).await {
        Ok(recipes) => Json(RecipesResponse { recipes }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn shopping_list(
    State(planner): State<Arc<MealPlanner>>,
    Json(request): Json<ShoppingListRequest>,
) -> Json<ShoppingListResponse> {
    let categories = planner.build_shopping_list(&request.recipes).await;
    let share_text = categories.share_text();
    Json(ShoppingListResponse {
        categories,
        share_text,
    })
}

async fn categorize_ingredient(
    State(planner): State<Arc<MealPlanner>>,
    Json(request): Json<CategorizeRequest>,
) -> Json<CategorizeResponse> {
    let category = planner.categorize(&request.ingredient).await;
    Json(CategorizeResponse {
        category,
        label: category.label().to_string(),
    })
}

async fn generate_background(State(planner): State<Arc<MealPlanner>>) -> Response {
    match planner.background_image().await {
        Some(image_url) => Json(BackgroundResponse { image_url }).into_response(),
        None => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error generating background image",
        ),
    }
}

pub fn router(planner: Arc<MealPlanner>) -> Router {
    Router::new()
        .route("/api/generate-recipes", post(generate_recipes))
        .route("/api/shopping-list", post(shopping_list))
        .route("/api/categorize-ingredient", post(categorize_ingredient))
        .route("/api/generate-background", get(generate_background))
        .with_state(planner)
}

pub async fn serve(planner: Arc<MealPlanner>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(planner)).await
}
