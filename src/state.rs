use std::sync::Arc;

use crate::services::auth_flow::AuthFlow;
use crate::services::mailer::Notifier;
use crate::services::token::TokenService;
use crate::store::AccountStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub flow: AuthFlow,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        tokens: TokenService,
    ) -> Self {
        let flow = AuthFlow::new(store.clone(), notifier, tokens);
        AppState { store, flow }
    }
}
