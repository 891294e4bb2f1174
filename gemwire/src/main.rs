#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod tools;

use args::Args;
use clap::Parser;
use gemwire_config::Config;
use gemwire_llm::types::THOUGHT_SIGNATURE;
use gemwire_llm::{CallOptions, ContentChoice, GeminiClient, Message};
use tokio_util::sync::CancellationToken;

const FALLBACK_MODEL: &str = "gemini-3-pro-preview";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    gemwire_telemetry::init(&config.logging)?;

    // Flags override the file
    if let Some(key) = args.api_key.clone() {
        config.provider.api_key = Some(key.into());
    }
    if let Some(base_url) = args.base_url.clone() {
        config.provider.base_url = Some(base_url);
    }
    config.validate()?;

    let model = args
        .model
        .clone()
        .or_else(|| config.provider.default_model.clone())
        .unwrap_or_else(|| FALLBACK_MODEL.to_owned());

    let client = GeminiClient::from_config(&config.provider)
        .map_err(|e| anyhow::anyhow!("{e}; pass --api-key or set GEMINI_API_KEY"))?;

    let capabilities = client.capabilities(&model);
    tracing::info!(
        model = %model,
        base_url = %client.base_url(),
        thought_signatures = capabilities.thought_signatures,
        "starting gemwire"
    );

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    run(&client, &shutdown, &model, &args).await
}

/// Two-call exchange: prompt, run requested tools, send results back
async fn run(client: &GeminiClient, cancel: &CancellationToken, model: &str, args: &Args) -> anyhow::Result<()> {
    let options = CallOptions::default()
        .with_tools(tools::definitions())
        .with_max_tokens(args.max_tokens);

    let mut history = vec![Message::user(args.prompt.clone())];

    println!("> {}", args.prompt);

    let first = client
        .generate_content_with_cancel(cancel, model, &history, &options)
        .await?;

    let Some(choice) = first.choices.first() else {
        anyhow::bail!("model returned no candidates");
    };
    print_choice(choice);

    if choice.tool_calls.is_empty() {
        print_usage(choice);
        return Ok(());
    }

    let results: Vec<_> = choice.tool_calls.iter().map(tools::execute).collect();
    for result in &results {
        println!("[tool result] {} -> {}", result.name, result.content);
    }

    history.push(Message::from_choice(choice));
    history.push(Message::tool_results(results));

    let second = client
        .generate_content_with_cancel(cancel, model, &history, &options)
        .await?;

    let Some(answer) = second.choices.first() else {
        anyhow::bail!("model returned no candidates for the follow-up");
    };
    print_choice(answer);
    print_usage(answer);

    Ok(())
}

fn print_choice(choice: &ContentChoice) {
    if let Some(thinking) = &choice.thinking_content {
        println!("[thinking] {thinking}");
    }
    if let Some(signature) = &choice.thought_signature {
        println!("[{THOUGHT_SIGNATURE}] {}", abbreviate(signature));
    }
    for call in &choice.tool_calls {
        let signed = call.thought_signature.as_deref().map_or("unsigned", abbreviate);
        println!(
            "[tool call] {} {}({}) signature={signed}",
            call.id, call.function.name, call.function.arguments
        );
    }
    if !choice.content.is_empty() {
        println!("{}", choice.content);
    }
    tracing::debug!(stop_reason = %choice.stop_reason, "choice received");
}

fn print_usage(choice: &ContentChoice) {
    if let Some(usage) = choice.usage() {
        println!(
            "[usage] prompt={} completion={} total={} thinking={}",
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens,
            usage.thinking_tokens.unwrap_or(0)
        );
    }
}

/// Signatures are long base64 blobs; show the head only
fn abbreviate(signature: &str) -> &str {
    signature
        .char_indices()
        .nth(16)
        .map_or(signature, |(end, _)| &signature[..end])
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("cancelling in-flight request");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviate_keeps_short_signatures() {
        assert_eq!(abbreviate("sig1"), "sig1");
    }

    #[test]
    fn abbreviate_cuts_long_signatures() {
        assert_eq!(abbreviate("CiQBxyz0123456789abcdef"), "CiQBxyz012345678");
    }
}
