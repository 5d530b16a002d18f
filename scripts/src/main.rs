use clap::Parser;
use scripts::{cli::Cli, errors::ScriptError, utils::setup_client};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        lcd_url,
        chain_id,
        deployments_path,
        signer,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .init();

    let client = setup_client(&lcd_url, &chain_id).await?;

    command.run(&client, &signer, deployments_path).await
}
