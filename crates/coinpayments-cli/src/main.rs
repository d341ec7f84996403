use clap::{Parser, Subcommand};
use coinpayments::constants::{DEFAULT_FIAT, DEFAULT_LIST_LIMIT};
use coinpayments::{ClientConfig, CoinPaymentsClient, Envelope, Params, RatesOptions, ResponseFormat};
use tracing_subscriber::EnvFilter;

/// Query a CoinPayments merchant account.
///
/// Credentials are read from COINPAYMENTS_PUBLIC_KEY and
/// COINPAYMENTS_PRIVATE_KEY (a `.env` file is honored).
#[derive(Parser)]
#[command(name = "coinpayments", version)]
struct Cli {
    /// Response format requested from the server
    #[arg(long, env = "COINPAYMENTS_FORMAT", default_value = "json")]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Basic account information
    Info,
    /// Exchange rates
    Rates {
        /// Include cryptocurrencies that are not accepted
        #[arg(long)]
        all: bool,
    },
    /// Wallet balances
    Balances {
        /// Include zero balances
        #[arg(long)]
        all: bool,
    },
    /// Balance of a single coin
    Coin { coin: String },
    /// Currencies accepted by the merchant
    Accepted {
        /// Leave fiat currencies out
        #[arg(long)]
        no_fiat: bool,
    },
    /// Price of a coin in another currency
    Rate {
        coin: String,
        #[arg(default_value = DEFAULT_FIAT)]
        base: String,
    },
    /// Every balance converted into one currency
    Fiat {
        #[arg(default_value = DEFAULT_FIAT)]
        base: String,
        #[arg(long)]
        only_accepted: bool,
    },
    /// Recent payment ids
    Txs {
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        newer: u64,
    },
    /// Any command, with `key=value` params in order
    Call {
        cmd: String,
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s}"))
}

fn print_envelope(envelope: Envelope) -> coinpayments::Result<()> {
    match envelope {
        Envelope::Structured(resp) => {
            let result = resp.into_result()?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Envelope::Raw(text) => println!("{text}"),
    }
    Ok(())
}

async fn run(cli: Cli) -> coinpayments::Result<()> {
    let format: ResponseFormat = cli.format.parse()?;
    let config = ClientConfig::from_env()?.with_format(format);
    tracing::debug!(?config, "loaded configuration");
    let client = CoinPaymentsClient::new(config)?;

    match cli.command {
        Command::Info => print_envelope(client.get_basic_info().await?)?,
        Command::Rates { all } => {
            let options = RatesOptions {
                only_accepted: !all,
                ..RatesOptions::default()
            };
            print_envelope(client.rates(options).await?)?;
        }
        Command::Balances { all } => print_envelope(client.balances(all).await?)?,
        Command::Coin { coin } => {
            let resp = client.coin_balance(&coin).await?;
            print_envelope(Envelope::Structured(resp))?;
        }
        Command::Accepted { no_fiat } => {
            for code in client.accepted_currencies(!no_fiat).await? {
                println!("{code}");
            }
        }
        Command::Rate { coin, base } => {
            let rate = client.conversion_fiat(&coin, &base, None).await?;
            println!("1 {} = {rate} {}", coin.to_uppercase(), base.to_uppercase());
        }
        Command::Fiat {
            base,
            only_accepted,
        } => {
            let sheet = client.balances_fiat(&base, only_accepted, false).await?;
            let base = base.to_uppercase();
            for (coin, value) in &sheet.converted {
                println!("{coin:>8}  {value:>16.2} {base}");
            }
            println!("{:>8}  {:>16.2} {base}", "total", sheet.total());
            for (coin, reason) in &sheet.skipped {
                eprintln!("skipped {coin}: {reason}");
            }
        }
        Command::Txs { limit, newer } => {
            print_envelope(client.get_tx_ids(limit, newer, Params::new()).await?)?;
        }
        Command::Call { cmd, params } => {
            let params: Params = params.into_iter().collect();
            print_envelope(client.api_call(&cmd, params).await?)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
