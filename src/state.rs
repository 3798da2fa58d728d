// src/state.rs

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::{AppConfig, PageSizeDefaults};
use crate::filters::PageSizePolicy;
use crate::models::MaterialImpactEstimate;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub page_sizes: PageSizeDefaults,
    // Tabela materiałów zmienia się rzadko, trzymamy ją pod jednym kluczem
    pub material_impacts_cache: Cache<(), Vec<MaterialImpactEstimate>>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &AppConfig) -> Self {
        AppState {
            db_pool,
            page_sizes: config.page_sizes.clone(),
            material_impacts_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(config.material_cache_ttl)
                .build(),
        }
    }

    pub fn market_page_policy(&self) -> PageSizePolicy {
        PageSizePolicy {
            default: self.page_sizes.market,
            max: self.page_sizes.max,
        }
    }

    pub fn store_page_policy(&self) -> PageSizePolicy {
        PageSizePolicy {
            default: self.page_sizes.store,
            max: self.page_sizes.max,
        }
    }
}
