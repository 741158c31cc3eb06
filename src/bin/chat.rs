use duet_assistant::{build_orchestrator, logging, AssistantConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    logging::init_tracing();

    let config = AssistantConfig::from_env()?;
    let orchestrator = build_orchestrator(&config).await?;

    info!("Interactive chat starting");
    println!("System Online. (Type 'quit' to exit)");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"\nUser: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();

        if query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        let reply = orchestrator.run_cycle(query).await;
        println!("AI: {}", reply);
    }

    Ok(())
}
