use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;

use race_results_lambda::config::Config;
use race_results_lambda::credentials::{KmsDecryptor, resolve_secret};
use race_results_lambda::error::RaceResultsError;
use race_results_lambda::handler::{self, AppContext};
use race_results_lambda::model::api_gateway::ApiGatewayRequest;
use race_results_lambda::progress::MySqlProgressStore;
use race_results_lambda::zwift::ZwiftAccount;

/// Cold start: read config, decrypt secrets, build the shared clients.
async fn build_context() -> Result<AppContext, RaceResultsError> {
    let config = Config::from_env()?;
    let kms = KmsDecryptor::from_env().await;

    let (zwift_password, db_password) = tokio::try_join!(
        resolve_secret(&kms, config.zwift_password_encrypted.as_deref()),
        resolve_secret(&kms, config.db_password_encrypted.as_deref()),
    )?;
    let zwift_password = zwift_password
        .ok_or_else(|| RaceResultsError::Configuration("ZWIFTPW must be set".to_string()))?;

    let account = ZwiftAccount::new(config.zwift_user.clone(), zwift_password, config.zwift_world_id);
    let store = MySqlProgressStore::connect_lazy(
        &config.db_host,
        &config.db_user,
        &config.db_name,
        db_password.as_deref(),
    );
    info!(db_host = %config.db_host, db_name = %config.db_name, world_id = config.zwift_world_id, "Initialized clients");

    Ok(AppContext::new(Arc::new(account), Arc::new(store)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize structured logging with tracing
    let _ = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::INFO)
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();

    let ctx = build_context().await?;
    let ctx = &ctx;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiGatewayRequest>| async move {
        handler::handler(ctx, event).await
    }))
    .await
}
