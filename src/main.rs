#[tokio::main]
async fn main() -> askbot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("askbot=info,serenity=warn"),
    )
    .init();
    log::info!("Starting askbot Discord bot");

    match askbot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {e}");
            Err(e)
        }
    }
}
