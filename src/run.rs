//! Application execution logic.
//!
//! Runs the configured action: serve the webhook until a shutdown signal,
//! or send one message and print the platform's response.

use serde_json::Value;
use thiserror::Error;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use whatsapp_api::client::{ClientError, MessageClient};
use whatsapp_api::config::{Action, ValidatedConfig};
use whatsapp_api::http::ReqwestClient;
use whatsapp_api::inbound::NormalizedMessage;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Sending a message failed.
    #[error("Failed to send message: {0}")]
    Send(#[source] ClientError),

    /// The webhook server failed.
    #[error("Webhook server failed: {0}")]
    Serve(#[source] ClientError),

    /// The platform response could not be printed.
    #[error("Failed to render response: {0}")]
    Output(#[source] serde_json::Error),
}

/// Executes the configured action.
///
/// # Errors
///
/// Returns an error if:
/// - A send fails (validation, upload, transport or platform error)
/// - The webhook server cannot bind or fails while running
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let client = build_client(&config);

    match config.action {
        Action::Serve => serve(&client).await,
        Action::SendText {
            to,
            body,
            preview_url,
        } => {
            let response = client
                .send_text(&to, &body, preview_url)
                .await
                .map_err(RunError::Send)?;
            print_response(&response)
        }
        Action::SendMedia { to, options } => {
            let response = client
                .send_media(&to, &options)
                .await
                .map_err(RunError::Send)?;
            print_response(&response)
        }
    }
}

/// Builds the message client from validated config.
fn build_client(config: &ValidatedConfig) -> MessageClient<ReqwestClient> {
    let client = MessageClient::new(ReqwestClient::new(), config.credentials.clone())
        .with_api_base(config.api_base.as_str())
        .with_timeout(config.timeout);

    match &config.webhook {
        Some(webhook) => client.with_webhook(webhook.clone()),
        None => client,
    }
}

/// Serves the webhook until Ctrl+C or SIGTERM.
///
/// # Coverage Note
///
/// Excluded from coverage because it waits for process signals.
#[cfg(not(tarpaulin_include))]
async fn serve(client: &MessageClient<ReqwestClient>) -> Result<(), RunError> {
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping...");
        trigger.cancel();
    });

    client
        .serve_webhook(log_message, shutdown)
        .await
        .map_err(RunError::Serve)
}

/// Handler used by `serve`: logs each inbound text message.
fn log_message(message: &NormalizedMessage) {
    tracing::info!(
        "Message {} from {} ({}): {}",
        message.message.id,
        message.message.from,
        message.sender_name().unwrap_or("unknown"),
        message.text_body().unwrap_or_default()
    );
}

fn render_response(response: &Value) -> Result<String, RunError> {
    serde_json::to_string_pretty(response).map_err(RunError::Output)
}

fn print_response(response: &Value) -> Result<(), RunError> {
    println!("{}", render_response(response)?);
    Ok(())
}

#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
