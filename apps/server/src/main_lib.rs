use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use worthline_core::{
    accounts::{AccountService, AccountServiceTrait},
    ledger::{LedgerService, LedgerServiceTrait},
    quotes::{MarketDataClient, QuoteService, QuoteServiceTrait},
    CashFlowService, CashFlowServiceTrait, SnapshotService, SnapshotServiceTrait, WealthService,
    WealthServiceTrait,
};
use worthline_market_data::{MarketDataProvider, YahooProvider};
use worthline_storage_sqlite::{db, AccountRepository, LedgerRepository, QuoteRepository};

use crate::config::Config;

pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub quote_service: Arc<dyn QuoteServiceTrait>,
    pub wealth_service: Arc<dyn WealthServiceTrait>,
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
    pub cash_flow_service: Arc<dyn CashFlowServiceTrait>,
}

pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = YahooProvider::new()?;
    build_state_with_provider(config, Arc::new(provider)).await
}

/// Wires storage, services and the given price source together.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let (pool, writer) = db::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let account_repository = Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let ledger_repository = Arc::new(LedgerRepository::new(pool.clone(), writer.clone()));
    let quote_repository = Arc::new(QuoteRepository::new(pool, writer));

    tracing::info!("Using market data provider {}", provider.id());
    let quote_service: Arc<dyn QuoteServiceTrait> = Arc::new(QuoteService::new(
        quote_repository,
        MarketDataClient::new(provider),
    ));

    let account_service: Arc<dyn AccountServiceTrait> =
        Arc::new(AccountService::new(account_repository.clone()));
    let ledger_service = Arc::new(LedgerService::new(
        ledger_repository.clone(),
        account_service.clone(),
    ));
    let wealth_service = Arc::new(WealthService::new(
        account_repository.clone(),
        ledger_repository.clone(),
        quote_service.clone(),
    ));
    let snapshot_service = Arc::new(SnapshotService::new(
        account_repository,
        ledger_repository.clone(),
        quote_service.clone(),
    ));
    let cash_flow_service = Arc::new(CashFlowService::new(ledger_repository));

    Ok(Arc::new(AppState {
        account_service,
        ledger_service,
        quote_service,
        wealth_service,
        snapshot_service,
        cash_flow_service,
    }))
}
