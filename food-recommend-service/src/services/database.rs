//! Food catalogue sources.

use crate::models::FoodRecord;
use crate::services::metrics::DB_QUERY_DURATION;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Every food with a positive calorie value. Filtering happens in process.
#[async_trait]
pub trait FoodSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<FoodRecord>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;

    fn name(&self) -> &'static str;
}

const SELECT_FOODS: &str = "\
SELECT CAST(id AS SIGNED) AS id, \
       name, \
       CAST(ROUND(calories) AS SIGNED) AS calories, \
       COALESCE(category, '') AS category, \
       COALESCE(portion_label, '') AS portion_label \
FROM foods \
WHERE calories > 0";

/// MySQL connection pool wrapper.
#[derive(Clone)]
pub struct MySqlFoodSource {
    pool: MySqlPool,
}

impl MySqlFoodSource {
    #[instrument(skip(database_url), fields(service = "food-recommend-service"))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        info!(max_connections = max_connections, "Connecting to MySQL");

        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("MySQL connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl FoodSource for MySqlFoodSource {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<FoodRecord>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["fetch_foods"])
            .start_timer();

        let foods = sqlx::query_as::<_, FoodRecord>(SELECT_FOODS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load foods: {}", e)))?;

        timer.observe_duration();
        info!(food_count = foods.len(), "Loaded food catalogue");
        Ok(foods)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mysql"
    }
}

/// In-memory catalogue for local runs without a database and for tests.
#[derive(Debug, Clone)]
pub struct StaticFoodSource {
    foods: Vec<FoodRecord>,
}

impl StaticFoodSource {
    pub fn new(foods: Vec<FoodRecord>) -> Self {
        Self { foods }
    }

    /// The sample menu the service shipped with before it had a database.
    pub fn sample() -> Self {
        Self::new(vec![
            FoodRecord::new(101, "현미밥", 320, "밥류", "1공기 (210g)"),
            FoodRecord::new(102, "미역국", 80, "국 및 탕류", "1그릇 (250ml)"),
            FoodRecord::new(103, "계란말이", 120, "구이류", "2조각 (80g)"),
            FoodRecord::new(201, "연어덮밥", 540, "밥류", "1인분 (300g)"),
            FoodRecord::new(202, "시금치나물", 40, "나물류", "1접시 (100g)"),
            FoodRecord::new(301, "닭가슴살 샐러드", 350, "샐러드류", "1인분 (250g)"),
            FoodRecord::new(302, "현미밥", 160, "밥류", "1/2공기 (105g)"),
            FoodRecord::new(303, "두부된장국", 90, "국 및 탕류", "1그릇 (250ml)"),
        ])
    }
}

#[async_trait]
impl FoodSource for StaticFoodSource {
    async fn fetch_all(&self) -> Result<Vec<FoodRecord>, AppError> {
        Ok(self
            .foods
            .iter()
            .filter(|f| f.calories > 0)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
