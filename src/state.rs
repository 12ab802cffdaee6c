use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::build_shared_http_client;
use crate::clients::gemini::GeminiClient;
use crate::clients::gnews::GNewsClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, AuthService, DiscussionService, NewsService, SeaOrmAuthService,
    SentimentAnalyzer, VaderAnalyzer,
};

/// Connect timeout for the shared HTTP client. Read timeouts are per client.
const HTTP_CONNECT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub gnews: GNewsClient,

    pub gemini: GeminiClient,

    pub sentiment: Arc<dyn SentimentAnalyzer>,

    pub auth_service: Arc<dyn AuthService>,

    pub account_service: Arc<AccountService>,

    pub news_service: Arc<NewsService>,

    pub discussion_service: Arc<DiscussionService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // One pooled client for both external APIs.
        let http_client = build_shared_http_client(HTTP_CONNECT_TIMEOUT_SECONDS)?;
        let gnews = GNewsClient::with_shared_client(http_client.clone(), &config.news);
        let gemini = GeminiClient::with_shared_client(http_client, &config.chat);

        let sentiment: Arc<dyn SentimentAnalyzer> = Arc::new(VaderAnalyzer);
        let config = Arc::new(RwLock::new(config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config.clone()))
            as Arc<dyn AuthService + Send + Sync + 'static>;
        let account_service = Arc::new(AccountService::new(store.clone()));
        let news_service = Arc::new(NewsService::new(
            store.clone(),
            gnews.clone(),
            sentiment.clone(),
        ));
        let discussion_service = Arc::new(DiscussionService::new(store.clone(), gemini.clone()));

        Ok(Self {
            config,
            store,
            gnews,
            gemini,
            sentiment,
            auth_service,
            account_service,
            news_service,
            discussion_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
