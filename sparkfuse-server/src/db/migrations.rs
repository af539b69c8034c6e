mod embedded {
    refinery::embed_migrations!("migrations");
}

use super::Db;
use super::error::StoreResult;

impl Db {
    /// Bring the `accounts` schema up to date. Safe to run on every start.
    pub async fn init(&self) -> StoreResult<()> {
        let mut client = self.get_client().await?;
        let report = embedded::migrations::runner().run_async(&mut **client).await?;

        for m in report.applied_migrations() {
            tracing::info!(migration = %m, "applied migration");
        }
        Ok(())
    }
}
