use clap::{Parser, Subcommand};
use eyre::{bail, WrapErr};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "transfer-cli")]
#[command(about = "Operator CLI for the token transfer API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Show the token balance of an address
    Balance { address: String },
    /// Send tokens plus the native tip to an address
    Transfer {
        /// Token amount in display units, e.g. 0.01
        amount: String,
        wallet_address: String,
    },
    /// Health, then balance of the recipient, then a small transfer
    Smoke {
        wallet_address: String,
        #[arg(long, default_value = "0.01")]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            print_json(&get(&client, &format!("{}/health", base)).await?)?;
        }
        Commands::Balance { address } => {
            print_json(&get(&client, &format!("{}/balance/{}", base, address)).await?)?;
        }
        Commands::Transfer {
            amount,
            wallet_address,
        } => {
            print_json(&transfer(&client, base, &amount, &wallet_address).await?)?;
        }
        Commands::Smoke {
            wallet_address,
            amount,
        } => {
            println!("1/3 health");
            print_json(&get(&client, &format!("{}/health", base)).await?)?;

            println!("2/3 balance of {}", wallet_address);
            print_json(&get(&client, &format!("{}/balance/{}", base, wallet_address)).await?)?;

            println!("3/3 transfer {} to {}", amount, wallet_address);
            let outcome = transfer(&client, base, &amount, &wallet_address).await?;
            print_json(&outcome)?;

            if outcome["totalTransactions"] != json!(2) {
                bail!("smoke test: expected two transactions");
            }
            println!("smoke test passed");
        }
    }

    Ok(())
}

async fn get(client: &reqwest::Client, url: &str) -> eyre::Result<Value> {
    let res = client.get(url).send().await.wrap_err("request failed")?;
    read(res).await
}

async fn transfer(
    client: &reqwest::Client,
    base: &str,
    amount: &str,
    wallet_address: &str,
) -> eyre::Result<Value> {
    let res = client
        .post(format!("{}/transfer", base))
        .json(&json!({ "amount": amount, "walletAddress": wallet_address }))
        .send()
        .await
        .wrap_err("request failed")?;
    read(res).await
}

async fn read(res: reqwest::Response) -> eyre::Result<Value> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        bail!("API returned status {}: {}", status, text);
    }
    serde_json::from_str(&text).wrap_err("response is not JSON")
}

fn print_json(value: &Value) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
