//! User Agent - interactive entry point
//!
//! Reads one line at a time from stdin and prints the agent's answer.

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_agent::agent::{build_system_prompt, Agent, Transcript};
use user_agent::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they don't interleave with answers on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!("Loaded configuration: deployment={}", config.deployment);

    let agent = Agent::from_config(&config)?;
    let mut transcript = Transcript::with_system_prompt(build_system_prompt(agent.tools()));

    let mut stdout = io::stdout();
    stdout
        .write_all(b"\nUser Management Agent\nType 'exit' or 'quit' to end the conversation.\n")
        .await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        transcript.push_user(input);
        match agent.get_completion(&mut transcript).await {
            Ok(reply) => {
                let text = format!("\nAssistant: {}\n", reply.text_content());
                stdout.write_all(text.as_bytes()).await?;
            }
            Err(e) => {
                error!("Exchange failed: {}", e);
                let text = format!("\nError: {}\n", e);
                stdout.write_all(text.as_bytes()).await?;
            }
        }
    }

    stdout.write_all(b"\nGoodbye!\n").await?;
    stdout.flush().await?;
    Ok(())
}
