use wmibot::{config::Config, init, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    wmibot::logging::init()?;

    let config = Config::from_env()?;
    let clients = init(config).await?;

    run(clients).await?;

    Ok(())
}
