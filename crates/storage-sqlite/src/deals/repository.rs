use async_trait::async_trait;
use diesel::dsl::{count_star, exists};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use fxdeals_core::deals::{DealRepositoryTrait, FxDeal};
use fxdeals_core::Result;

use super::model::FxDealDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::fx_deals;
use crate::schema::fx_deals::dsl::*;

/// Diesel-backed deal store. Reads use the pool, writes go through the writer actor.
pub struct DealRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DealRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        DealRepository { pool, writer }
    }
}

#[async_trait]
impl DealRepositoryTrait for DealRepository {
    fn exists_by_id(&self, deal_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = diesel::select(exists(fx_deals.filter(deal_unique_id.eq(deal_id))))
            .get_result::<bool>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(found)
    }

    async fn insert_deal(&self, deal: FxDeal) -> Result<FxDeal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FxDeal> {
                let row = FxDealDB::from(deal);
                let inserted = diesel::insert_into(fx_deals::table)
                    .values(&row)
                    .returning(FxDealDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                debug!("Stored deal {}", inserted.deal_unique_id);
                FxDeal::try_from(inserted)
            })
            .await
    }

    fn get_deal(&self, deal_id: &str) -> Result<Option<FxDeal>> {
        let mut conn = get_connection(&self.pool)?;
        let row = fx_deals
            .find(deal_id)
            .select(FxDealDB::as_select())
            .first::<FxDealDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(FxDeal::try_from).transpose()
    }

    fn count_deals(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let total = fx_deals
            .select(count_star())
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(total)
    }
}
