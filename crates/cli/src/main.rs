//! Command Line Interface for the pool ledger.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pool_ledger_api::{ApiServer, AppState, AuthConfig, AuthState, ServerConfig};
use pool_ledger_data::gateways::{HttpGovernanceGateway, HttpTokenLedger};
use pool_ledger_data::repositories::SnapshotRepository;
use pool_ledger_domain::value_objects::{PoolId, Principal};
use pool_ledger_engine::prelude::*;
use prettytable::{Table, row};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pool-ledger")]
#[command(about = "Risk pool ledger service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "POOL_LEDGER_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        /// Principal administering pools
        #[arg(long, env = "POOL_LEDGER_OWNER")]
        owner: String,

        /// Principal of the cover service
        #[arg(long, env = "POOL_LEDGER_COVER_SERVICE")]
        cover_service: Option<String>,

        /// Principal of the governance service
        #[arg(long, env = "POOL_LEDGER_GOVERNANCE")]
        governance: Option<String>,

        /// Comma separated `key=principal` list
        #[arg(long, env = "POOL_LEDGER_API_KEYS", default_value = "")]
        api_keys: String,

        /// Snapshot file restored at start and written after each change
        #[arg(long, env = "POOL_LEDGER_SNAPSHOT")]
        snapshot: Option<PathBuf>,

        /// Governance service base URL (in-memory when absent)
        #[arg(long, env = "POOL_LEDGER_GOVERNANCE_URL")]
        governance_url: Option<String>,

        /// Token ledger base URL (in-memory when absent)
        #[arg(long, env = "POOL_LEDGER_TOKEN_LEDGER_URL")]
        token_ledger_url: Option<String>,

        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,
    },
    /// Print the pools held in a snapshot
    Inspect {
        /// Snapshot file
        #[arg(long, env = "POOL_LEDGER_SNAPSHOT")]
        snapshot: PathBuf,

        /// Also list the deposits of this pool
        #[arg(long)]
        pool: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            owner,
            cover_service,
            governance,
            api_keys,
            snapshot,
            governance_url,
            token_ledger_url,
            no_cors,
        } => {
            let access = AccessConfig {
                owner: Principal::new(owner),
                cover_service: cover_service.map(Principal::new),
                governance: governance.map(Principal::new),
            };

            let repository = snapshot.map(|path| Arc::new(SnapshotRepository::new(path)));
            let saved = match &repository {
                Some(repository) => repository.load().await?,
                None => {
                    warn!("No snapshot configured; state is lost on exit");
                    None
                }
            };

            let governance: Arc<dyn GovernanceGateway> = match governance_url {
                Some(url) => {
                    info!(url = %url, "Using remote governance");
                    Arc::new(HttpGovernanceGateway::new(url)?)
                }
                None => Arc::new(InMemoryGovernance::new()),
            };
            let token_ledger: Arc<dyn TokenLedger> = match token_ledger_url {
                Some(url) => {
                    info!(url = %url, "Using remote token ledger");
                    Arc::new(HttpTokenLedger::new(url)?)
                }
                None => Arc::new(InMemoryTokenLedger::new()),
            };

            let auth = AuthConfig::from_key_list(&api_keys).context("invalid API key list")?;
            if auth.api_keys.is_empty() {
                warn!("No API keys configured; every mutation will be rejected");
            }

            let clock = Arc::new(SystemClock);
            let ledger = match saved {
                Some(snapshot) => {
                    PoolLedger::from_snapshot(snapshot, clock, access, governance, token_ledger)
                }
                None => PoolLedger::new(
                    Arc::new(LedgerStore::new()),
                    clock,
                    access,
                    governance,
                    token_ledger,
                ),
            };
            let mut state = AppState::new(Arc::new(ledger), AuthState::new(auth));
            if let Some(repository) = repository {
                state = state.with_snapshots(repository);
            }

            let config = ServerConfig {
                bind,
                enable_cors: !no_cors,
            };
            ApiServer::new(config, state).run().await?;
        }
        Commands::Inspect { snapshot, pool } => {
            let repository = SnapshotRepository::new(&snapshot);
            let Some(snapshot) = repository.load().await? else {
                bail!("no snapshot at {}", repository.path().display());
            };

            let mut table = Table::new();
            table.add_row(row![
                "ID", "Name", "Risk", "APY %", "Min days", "TVL", "TCP", "Split %", "Active",
                "Deposits", "Covers", "Claims paid", "Accruals paid"
            ]);
            for entry in &snapshot.pools {
                let p = &entry.pool;
                table.add_row(row![
                    p.id,
                    p.pool_name,
                    p.risk_type,
                    p.apy,
                    p.min_period,
                    p.tvl,
                    p.tcp,
                    p.percentage_split_balance.value(),
                    p.is_active,
                    p.deposits.len(),
                    entry.covers.len(),
                    p.claims_paid,
                    p.accruals_paid
                ]);
            }
            println!("Pools ({}):", snapshot.pools.len());
            table.printstd();
            if let Some(access) = &snapshot.access {
                println!(
                    "Owner: {}  Cover service: {}  Governance: {}",
                    access.owner,
                    access.cover_service.as_ref().map_or("-".to_string(), ToString::to_string),
                    access.governance.as_ref().map_or("-".to_string(), ToString::to_string)
                );
            }

            if let Some(pool_id) = pool {
                let entry = snapshot
                    .pools
                    .iter()
                    .find(|e| e.pool.id == PoolId(pool_id))
                    .with_context(|| format!("pool {} not in snapshot", pool_id))?;

                let mut deposits = Table::new();
                deposits.add_row(row!["LP", "Status", "Amount", "Accrued", "Start", "Expiry"]);
                for deposit in entry.pool.deposits.values() {
                    deposits.add_row(row![
                        deposit.lp,
                        format!("{:?}", deposit.status),
                        deposit.amount,
                        deposit.accrued_payout,
                        format_time(deposit.start_date),
                        format_time(deposit.expiry_date)
                    ]);
                }
                println!("\nDeposits in pool {}:", pool_id);
                deposits.printstd();
            }
        }
    }

    Ok(())
}

fn format_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
