// src/services.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::impact::{ImpactKind, closest_impact_message};
use crate::models::{
    CategoryMaterialRow, Department, DepartmentCategory, ImpactMessage, MaterialImpactEstimate,
    Product, ProductCategory, ProductSortField, SortDirection, StoreProduct, StoreSubCategory,
};
use crate::pagination::OffsetParams;
use crate::state::AppState;

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.name, p.description, p.price, p.has_offer, p.offer_price, p.seller_id,
    p.brand, p.color, p.images, p.is_active, p.is_exchangeable, p.product_category_id,
    p.condition, p.condition_description, p.created_at, p.updated_at
"#;

const STORE_PRODUCT_COLUMNS: &str = r#"
    sp.id, sp.name, sp.description, sp.price, sp.stock, sp.images, sp.subcategory_id,
    sp.seller_id, sp.is_active, sp.created_at, sp.updated_at
"#;

// --- DEPARTAMENTY ---

pub async fn fetch_departments(pool: &PgPool) -> Result<Vec<Department>, AppError> {
    let departments = sqlx::query_as::<_, Department>(
        r#"
        SELECT id, department_name, department_image, href
        FROM departments
        ORDER BY department_name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(departments)
}

pub async fn find_department(pool: &PgPool, id: i32) -> Result<Option<Department>, AppError> {
    let department = sqlx::query_as::<_, Department>(
        "SELECT id, department_name, department_image, href FROM departments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(department)
}

/// Aktywne produkty ze wszystkich kategorii departamentu, najnowsze pierwsze.
pub async fn fetch_department_products(
    pool: &PgPool,
    department_id: i32,
    offset: OffsetParams,
) -> Result<(Vec<Product>, i64), AppError> {
    let total_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM products p
        JOIN product_categories pc ON pc.id = p.product_category_id
        JOIN department_categories dc ON dc.id = pc.department_category_id
        WHERE dc.department_id = $1 AND p.is_active = TRUE AND p.deleted_at IS NULL
        "#,
    )
    .bind(department_id)
    .fetch_one(pool)
    .await?;

    let products = sqlx::query_as::<_, Product>(&format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM products p
        JOIN product_categories pc ON pc.id = p.product_category_id
        JOIN department_categories dc ON dc.id = pc.department_category_id
        WHERE dc.department_id = $1 AND p.is_active = TRUE AND p.deleted_at IS NULL
        ORDER BY p.created_at DESC, p.id ASC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(department_id)
    .bind(offset.take)
    .bind(offset.skip)
    .fetch_all(pool)
    .await?;

    Ok((products, total_count))
}

pub async fn fetch_department_categories(
    pool: &PgPool,
    department_id: i32,
    offset: OffsetParams,
) -> Result<(Vec<DepartmentCategory>, i64), AppError> {
    let total_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM department_categories WHERE department_id = $1",
    )
    .bind(department_id)
    .fetch_one(pool)
    .await?;

    let categories = sqlx::query_as::<_, DepartmentCategory>(
        r#"
        SELECT id, department_category_name, department_id, href
        FROM department_categories
        WHERE department_id = $1
        ORDER BY department_category_name ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(department_id)
    .bind(offset.take)
    .bind(offset.skip)
    .fetch_all(pool)
    .await?;

    Ok((categories, total_count))
}

// --- KATEGORIE ---

pub async fn find_department_category(
    pool: &PgPool,
    id: i32,
) -> Result<Option<DepartmentCategory>, AppError> {
    let category = sqlx::query_as::<_, DepartmentCategory>(
        r#"
        SELECT id, department_category_name, department_id, href
        FROM department_categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

pub async fn fetch_product_categories(
    pool: &PgPool,
    department_category_id: i32,
    offset: OffsetParams,
) -> Result<(Vec<ProductCategory>, i64), AppError> {
    let total_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM product_categories WHERE department_category_id = $1",
    )
    .bind(department_category_id)
    .fetch_one(pool)
    .await?;

    let categories = sqlx::query_as::<_, ProductCategory>(
        r#"
        SELECT id, product_category_name, department_category_id, keywords, size,
               average_weight, weight_unit, href
        FROM product_categories
        WHERE department_category_id = $1
        ORDER BY product_category_name ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(department_category_id)
    .bind(offset.take)
    .bind(offset.skip)
    .fetch_all(pool)
    .await?;

    Ok((categories, total_count))
}

pub async fn find_product_category(
    pool: &PgPool,
    id: i32,
) -> Result<Option<ProductCategory>, AppError> {
    let category = sqlx::query_as::<_, ProductCategory>(
        r#"
        SELECT id, product_category_name, department_category_id, keywords, size,
               average_weight, weight_unit, href
        FROM product_categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Skład materiałowy kategorii: najpierw materiał główny, potem wg udziału.
pub async fn fetch_category_materials(
    pool: &PgPool,
    product_category_id: i32,
) -> Result<Vec<CategoryMaterialRow>, AppError> {
    let materials = sqlx::query_as::<_, CategoryMaterialRow>(
        r#"
        SELECT m.material_type, pcm.quantity, pcm.unit,
               m.estimated_co2_savings_kg, m.estimated_water_savings_lt
        FROM product_category_materials pcm
        JOIN material_impact_estimates m ON m.id = pcm.material_id
        WHERE pcm.product_category_id = $1
        ORDER BY pcm.is_primary DESC, pcm.quantity DESC, m.material_type ASC
        "#,
    )
    .bind(product_category_id)
    .fetch_all(pool)
    .await?;

    Ok(materials)
}

// --- PRODUKTY ---

pub async fn find_product(pool: &PgPool, id: i32) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1 AND p.deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductQuery {
    pub is_active: Option<bool>,
    pub product_category_id: Option<i32>,
    pub sort_by: ProductSortField,
    pub direction: SortDirection,
}

fn push_product_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
    builder.push(" WHERE p.deleted_at IS NULL");
    if let Some(is_active) = query.is_active {
        builder.push(" AND p.is_active = ").push_bind(is_active);
    }
    if let Some(category_id) = query.product_category_id {
        builder
            .push(" AND p.product_category_id = ")
            .push_bind(category_id);
    }
}

pub async fn fetch_products(
    pool: &PgPool,
    query: ProductQuery,
    offset: OffsetParams,
) -> Result<(Vec<Product>, i64), AppError> {
    let mut count_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM products p");
    push_product_filters(&mut count_builder, &query);
    let total_count: i64 = count_builder
        .build_query_scalar()
        .fetch_one(pool)
        .await?;

    let mut data_builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products p"));
    push_product_filters(&mut data_builder, &query);
    // Kolumna i kierunek pochodzą z enumów, nie z danych użytkownika
    data_builder.push(format!(
        " ORDER BY p.{} {}, p.id ASC",
        query.sort_by, query.direction
    ));
    data_builder.push(" LIMIT ").push_bind(offset.take);
    data_builder.push(" OFFSET ").push_bind(offset.skip);

    let products: Vec<Product> = data_builder.build_query_as().fetch_all(pool).await?;

    Ok((products, total_count))
}

// --- SKLEP ---

pub async fn find_store_subcategory(
    pool: &PgPool,
    id: i32,
) -> Result<Option<StoreSubCategory>, AppError> {
    let subcategory = sqlx::query_as::<_, StoreSubCategory>(
        "SELECT id, sub_category, store_category_id FROM store_sub_categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(subcategory)
}

fn push_store_product_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    is_active: Option<bool>,
    subcategory_id: Option<i32>,
) {
    builder.push(" WHERE sp.deleted_at IS NULL");
    if let Some(is_active) = is_active {
        builder.push(" AND sp.is_active = ").push_bind(is_active);
    }
    if let Some(subcategory_id) = subcategory_id {
        builder
            .push(" AND sp.subcategory_id = ")
            .push_bind(subcategory_id);
    }
}

pub async fn fetch_store_products(
    pool: &PgPool,
    is_active: Option<bool>,
    subcategory_id: Option<i32>,
    offset: OffsetParams,
) -> Result<(Vec<StoreProduct>, i64), AppError> {
    let mut count_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM store_products sp");
    push_store_product_filters(&mut count_builder, is_active, subcategory_id);
    let total_count: i64 = count_builder
        .build_query_scalar()
        .fetch_one(pool)
        .await?;

    let mut data_builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {STORE_PRODUCT_COLUMNS} FROM store_products sp"));
    push_store_product_filters(&mut data_builder, is_active, subcategory_id);
    data_builder.push(" ORDER BY sp.created_at DESC, sp.id ASC");
    data_builder.push(" LIMIT ").push_bind(offset.take);
    data_builder.push(" OFFSET ").push_bind(offset.skip);

    let products: Vec<StoreProduct> = data_builder.build_query_as().fetch_all(pool).await?;

    Ok((products, total_count))
}

// --- WPŁYW NA ŚRODOWISKO ---

/// Pobiera tabelę współczynników oszczędności dla materiałów.
///
/// Wynik trafia do cache'u, bo tabela jest praktycznie statyczna.
pub async fn get_material_impacts(
    app_state: &AppState,
) -> Result<Vec<MaterialImpactEstimate>, AppError> {
    if let Some(cached) = app_state.material_impacts_cache.get(&()).await {
        tracing::info!("Cache HIT dla tabeli wpływu materiałów");
        return Ok(cached);
    }

    tracing::info!("Cache MISS dla tabeli wpływu materiałów. Pobieranie z bazy.");

    let materials = sqlx::query_as::<_, MaterialImpactEstimate>(
        r#"
        SELECT id, material_type, estimated_co2_savings_kg, estimated_water_savings_lt
        FROM material_impact_estimates
        ORDER BY material_type ASC
        "#,
    )
    .fetch_all(&app_state.db_pool)
    .await?;

    if materials.is_empty() {
        tracing::warn!("Tabela wpływu materiałów jest pusta");
        return Err(AppError::NotFound(
            "Nie znaleziono materiałów z danymi o wpływie".to_string(),
        ));
    }

    app_state
        .material_impacts_cache
        .insert((), materials.clone())
        .await;

    Ok(materials)
}

/// Znajduje komunikat dla wartości: najpierw przedział, który ją zawiera,
/// a w razie jego braku najbliższy sąsiedni przedział.
pub async fn find_impact_message(
    pool: &PgPool,
    kind: ImpactKind,
    value: f64,
) -> Result<ImpactMessage, AppError> {
    let table = kind.table();

    let containing = sqlx::query_as::<_, ImpactMessage>(&format!(
        "SELECT id, min, max, message1, message2, message3 FROM {table} \
         WHERE min <= $1 AND max >= $1 ORDER BY min ASC LIMIT 1"
    ))
    .bind(value)
    .fetch_optional(pool)
    .await?;

    if let Some(message) = containing {
        return Ok(message);
    }

    tracing::debug!(
        "Brak przedziału {} zawierającego wartość {}, szukam najbliższego",
        table,
        value
    );

    let lower = sqlx::query_as::<_, ImpactMessage>(&format!(
        "SELECT id, min, max, message1, message2, message3 FROM {table} \
         WHERE min <= $1 ORDER BY min DESC LIMIT 1"
    ))
    .bind(value)
    .fetch_optional(pool)
    .await?;

    let higher = sqlx::query_as::<_, ImpactMessage>(&format!(
        "SELECT id, min, max, message1, message2, message3 FROM {table} \
         WHERE min > $1 ORDER BY min ASC LIMIT 1"
    ))
    .bind(value)
    .fetch_optional(pool)
    .await?;

    closest_impact_message(value, lower, higher).ok_or_else(|| {
        AppError::NotFound("Nie znaleziono odpowiednika dla podanej wartości".to_string())
    })
}
