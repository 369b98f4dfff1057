use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::models::user::UserSchema;
use crate::page::{BannerExpiry, RegistrationPage};

/// Shared handle to the single page instance. Handlers hold the lock only
/// for the synchronous reaction to one event.
#[derive(Clone)]
pub struct AppState {
    page: Arc<Mutex<RegistrationPage>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self::from_page(RegistrationPage::new(
            UserSchema::new(config.min_age),
            config.banner_ttl,
        ))
    }

    pub fn from_page(page: RegistrationPage) -> Self {
        Self {
            page: Arc::new(Mutex::new(page)),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, RegistrationPage> {
        self.page.lock().await
    }

    /// Clears the success banner after its delay unless a newer one replaced it.
    pub fn schedule_banner_expiry(&self, expiry: BannerExpiry) {
        let page = Arc::clone(&self.page);
        tokio::spawn(async move {
            tokio::time::sleep(expiry.after).await;
            page.lock().await.expire_banner(expiry.ticket);
        });
    }
}
