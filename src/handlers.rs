// src/handlers.rs
use axum::Json;
use axum::extract::{Path, State};
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::AppError;
use crate::extractor::AppQuery;
use crate::filters::{
    ImpactValueParams, PageParams, ProductListingParams, StoreProductListingParams,
};
use crate::impact::{ImpactKind, MaterialComponent, calculate_category_impact};
use crate::models::*;
use crate::pagination::Connection;
use crate::services::{self, ProductQuery};
use crate::state::AppState;

// --- DEPARTAMENTY I KATEGORIE ---

pub async fn list_departments_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Department>>, AppError> {
    tracing::info!("Obsłużono zapytanie GET /api/departments");

    let departments = services::fetch_departments(&app_state.db_pool).await?;
    if departments.is_empty() {
        tracing::warn!("Brak departamentów w bazie danych");
        return Err(AppError::NotFound("Nie znaleziono departamentów".to_string()));
    }

    Ok(Json(departments))
}

pub async fn get_department_handler(
    State(app_state): State<Arc<AppState>>,
    Path(department_id): Path<i32>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<DepartmentWithProducts>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/departments/{} z parametrami: {:?}",
        department_id,
        params
    );

    let page = params.page_request(app_state.market_page_policy())?;

    let department = services::find_department(&app_state.db_pool, department_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Nie znaleziono departamentu o ID: {}", department_id);
            AppError::NotFound("Departament nie został znaleziony".to_string())
        })?;

    let (products, total_count) =
        services::fetch_department_products(&app_state.db_pool, department_id, page.offset_params())
            .await?;

    Ok(Json(DepartmentWithProducts {
        department,
        products: page.wrap(products, total_count),
    }))
}

pub async fn list_department_categories_handler(
    State(app_state): State<Arc<AppState>>,
    Path(department_id): Path<i32>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<DepartmentCategoriesPage>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/departments/{}/categories z parametrami: {:?}",
        department_id,
        params
    );

    let page = params.page_request(app_state.market_page_policy())?;

    let department = services::find_department(&app_state.db_pool, department_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Departament nie został znaleziony".to_string()))?;

    let (categories, total_count) = services::fetch_department_categories(
        &app_state.db_pool,
        department_id,
        page.offset_params(),
    )
    .await?;

    Ok(Json(DepartmentCategoriesPage {
        department,
        department_categories: page.wrap(categories, total_count),
    }))
}

pub async fn list_product_categories_handler(
    State(app_state): State<Arc<AppState>>,
    Path(department_category_id): Path<i32>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<ProductCategoriesPage>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/department-categories/{}/product-categories z parametrami: {:?}",
        department_category_id,
        params
    );

    let page = params.page_request(app_state.market_page_policy())?;

    let department_category =
        services::find_department_category(&app_state.db_pool, department_category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Kategoria departamentu nie została znaleziona".to_string())
            })?;

    let (categories, total_count) = services::fetch_product_categories(
        &app_state.db_pool,
        department_category_id,
        page.offset_params(),
    )
    .await?;

    Ok(Json(ProductCategoriesPage {
        department_category,
        product_categories: page.wrap(categories, total_count),
    }))
}

// --- PRODUKTY ---

pub async fn list_products_handler(
    State(app_state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ProductListingParams>,
) -> Result<Json<Connection<Product>>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/products z parametrami: {:?}",
        params
    );

    let page = params.page_request(app_state.market_page_policy())?;
    let query = ProductQuery {
        is_active: params.is_active(),
        product_category_id: None,
        sort_by: params.order_by(),
        direction: params.direction(),
    };

    let (products, total_count) =
        services::fetch_products(&app_state.db_pool, query, page.offset_params()).await?;

    Ok(Json(page.wrap(products, total_count)))
}

pub async fn get_product_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
) -> Result<Json<Product>, AppError> {
    tracing::info!("Obsłużono zapytanie GET /api/products/{}", product_id);

    services::find_product(&app_state.db_pool, product_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            tracing::warn!("Nie znaleziono produktu o ID: {}", product_id);
            AppError::NotFound("Produkt nie został znaleziony".to_string())
        })
}

pub async fn list_category_products_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_category_id): Path<i32>,
    AppQuery(params): AppQuery<ProductListingParams>,
) -> Result<Json<Connection<Product>>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/product-categories/{}/products z parametrami: {:?}",
        product_category_id,
        params
    );

    let page = params.page_request(app_state.market_page_policy())?;

    if services::find_product_category(&app_state.db_pool, product_category_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(
            "Kategoria produktu nie została znaleziona".to_string(),
        ));
    }

    // Lista kategorii pokazuje tylko aktywne produkty
    let query = ProductQuery {
        is_active: Some(true),
        product_category_id: Some(product_category_id),
        sort_by: params.order_by(),
        direction: params.direction(),
    };

    let (products, total_count) =
        services::fetch_products(&app_state.db_pool, query, page.offset_params()).await?;

    Ok(Json(page.wrap(products, total_count)))
}

// --- SKLEP ---

pub async fn list_store_products_handler(
    State(app_state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<StoreProductListingParams>,
) -> Result<Json<Connection<StoreProduct>>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/store/products z parametrami: {:?}",
        params
    );

    let page = params.page_request(app_state.store_page_policy())?;

    let (products, total_count) = services::fetch_store_products(
        &app_state.db_pool,
        params.is_active(),
        None,
        page.offset_params(),
    )
    .await?;

    Ok(Json(page.wrap(products, total_count)))
}

pub async fn list_subcategory_products_handler(
    State(app_state): State<Arc<AppState>>,
    Path(subcategory_id): Path<i32>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<StoreSubCategoryWithProducts>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/store/subcategories/{}/products z parametrami: {:?}",
        subcategory_id,
        params
    );

    let page = params.page_request(app_state.store_page_policy())?;

    let subcategory = services::find_store_subcategory(&app_state.db_pool, subcategory_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Podkategoria nie została znaleziona".to_string()))?;

    let (products, total_count) = services::fetch_store_products(
        &app_state.db_pool,
        Some(true),
        Some(subcategory_id),
        page.offset_params(),
    )
    .await?;

    Ok(Json(StoreSubCategoryWithProducts {
        subcategory,
        products: page.wrap(products, total_count),
    }))
}

// --- WPŁYW NA ŚRODOWISKO ---

pub async fn get_category_impact_handler(
    State(app_state): State<Arc<AppState>>,
    Path(product_category_id): Path<i32>,
) -> Result<Json<CategoryImpactResponse>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/product-categories/{}/impact",
        product_category_id
    );

    let category = services::find_product_category(&app_state.db_pool, product_category_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                "Nie znaleziono kategorii produktu o ID: {}",
                product_category_id
            );
            AppError::NotFound("Kategoria produktu nie została znaleziona".to_string())
        })?;

    let materials: Vec<MaterialComponent> =
        services::fetch_category_materials(&app_state.db_pool, product_category_id)
            .await?
            .into_iter()
            .map(MaterialComponent::from)
            .collect();

    let estimate = calculate_category_impact(&materials, category.average_weight.unwrap_or(0.0))?;

    tracing::debug!(
        "Wpływ kategorii {}: {} kg CO2, {} l wody ({} materiałów)",
        category.id,
        estimate.total_co2_savings_kg,
        estimate.total_water_savings_lt,
        estimate.material_breakdown.len()
    );

    Ok(Json(CategoryImpactResponse {
        product_category_id: category.id,
        product_category_name: category.product_category_name,
        estimate,
    }))
}

pub async fn list_material_impacts_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<MaterialImpactEstimate>>, AppError> {
    tracing::info!("Obsłużono zapytanie GET /api/materials/impacts");

    let materials = services::get_material_impacts(&app_state).await?;
    Ok(Json(materials))
}

pub async fn get_impact_message_handler(
    State(app_state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    AppQuery(params): AppQuery<ImpactValueParams>,
) -> Result<Json<ImpactMessage>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/impact-messages/{} z parametrami: {:?}",
        kind,
        params
    );

    let kind = ImpactKind::from_str(&kind)
        .map_err(|_| AppError::NotFound(format!("Nieznany rodzaj wpływu: {}", kind)))?;
    let value = params.checked_value()?;

    let message = services::find_impact_message(&app_state.db_pool, kind, value).await?;
    Ok(Json(message))
}
