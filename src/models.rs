// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::impact::{ImpactEstimate, MaterialComponent, RangeBound};
use crate::pagination::Connection;

// --- KATALOG: DEPARTAMENTY I KATEGORIE ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i32,
    pub department_name: String,
    pub department_image: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCategory {
    pub id: i32,
    pub department_category_name: String,
    pub department_id: i32,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: i32,
    pub product_category_name: String,
    pub department_category_id: i32,
    pub keywords: Vec<String>,
    pub size: Option<String>,
    pub average_weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub href: Option<String>,
}

/// Departament wraz z produktami ze wszystkich jego kategorii.
#[derive(Debug, Serialize)]
pub struct DepartmentWithProducts {
    #[serde(flatten)]
    pub department: Department,
    pub products: Connection<Product>,
}

/// Departament jako kontekst (breadcrumb) dla listy jego kategorii.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCategoriesPage {
    pub department: Department,
    pub department_categories: Connection<DepartmentCategory>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoriesPage {
    pub department_category: DepartmentCategory,
    pub product_categories: Connection<ProductCategory>,
}

// --- PRODUKTY MARKETPLACE ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub has_offer: bool,
    pub offer_price: Option<i64>,
    pub seller_id: Uuid,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub images: Vec<String>,
    pub is_active: bool,
    pub is_exchangeable: bool,
    pub product_category_id: i32,
    pub condition: String,
    pub condition_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kolumny, po których można sortować listę produktów.
/// `Display` zwraca nazwę kolumny w bazie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum ProductSortField {
    #[default]
    #[strum(serialize = "createdAt", to_string = "created_at")]
    CreatedAt,
    #[strum(serialize = "price")]
    Price,
    #[strum(serialize = "name")]
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum SortDirection {
    #[strum(serialize = "asc", to_string = "ASC")]
    Asc,
    #[default]
    #[strum(serialize = "desc", to_string = "DESC")]
    Desc,
}

// --- SKLEP ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreSubCategory {
    pub id: i32,
    pub sub_category: String,
    pub store_category_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoreProduct {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i32,
    pub images: Vec<String>,
    pub subcategory_id: i32,
    pub seller_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSubCategoryWithProducts {
    #[serde(flatten)]
    pub subcategory: StoreSubCategory,
    pub products: Connection<StoreProduct>,
}

// --- WPŁYW NA ŚRODOWISKO ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaterialImpactEstimate {
    pub id: i32,
    #[serde(rename = "materialType")]
    pub material_type: String,
    #[serde(rename = "estimatedCo2SavingsKG")]
    pub estimated_co2_savings_kg: f64,
    #[serde(rename = "estimatedWaterSavingsLT")]
    pub estimated_water_savings_lt: f64,
}

/// Wiersz złączenia product_category_materials z material_impact_estimates.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryMaterialRow {
    pub material_type: String,
    pub quantity: f64,
    pub unit: String,
    pub estimated_co2_savings_kg: f64,
    pub estimated_water_savings_lt: f64,
}

impl From<CategoryMaterialRow> for MaterialComponent {
    fn from(row: CategoryMaterialRow) -> Self {
        MaterialComponent {
            material_type: row.material_type,
            quantity: row.quantity,
            unit: row.unit,
            estimated_co2_savings_kg: row.estimated_co2_savings_kg,
            estimated_water_savings_lt: row.estimated_water_savings_lt,
        }
    }
}

/// Komunikat o równoważniku oszczędności (CO2 lub woda) dla przedziału wartości.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImpactMessage {
    pub id: i32,
    pub min: f64,
    pub max: f64,
    pub message1: Option<String>,
    pub message2: Option<String>,
    pub message3: Option<String>,
}

impl RangeBound for ImpactMessage {
    fn lower_bound(&self) -> f64 {
        self.min
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryImpactResponse {
    pub product_category_id: i32,
    pub product_category_name: String,
    #[serde(flatten)]
    pub estimate: ImpactEstimate,
}
