use std::sync::Arc;

use crate::application::services::AccountService;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
}
