//! stakeibc Callback Processor CLI
//!
//! Operator entry point for inspecting the ledger and replaying ICA
//! acknowledgements against it.
//!
//! Run modes:
//!   stakeibc-callbacks demo                      - Run both callbacks against a memory ledger
//!   stakeibc-callbacks seed <file.json>          - Load host zones and records
//!   stakeibc-callbacks encode-args <kind> <json> - Encode callback args to hex
//!   stakeibc-callbacks ack <kind> <args-hex>     - Dispatch one acknowledgement
//!   stakeibc-callbacks show <entity> <id>        - Print a host zone or record
//!   stakeibc-callbacks stats                     - Print ledger counts

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use stakeibc_callbacks::common::{self, StakeIbcConfig, StakeIbcError, StoreBackend};
use stakeibc_callbacks::{
    Acknowledgement, AcknowledgementResult, CallbackArgs, CallbackKind, CallbackRegistry,
    DelegateCallback, DepositRecord, HostZone, Keeper, LedgerStore, MemoryLedgerStore, Packet,
    RedemptionCallback, SplitDelegation, SqliteLedgerStore, UserRedemptionRecord,
};

#[derive(Parser)]
#[command(name = "stakeibc-callbacks")]
#[command(about = "Replay ICA acknowledgements against the stakeibc ledger")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a delegate and a redemption acknowledgement against a memory ledger
    Demo,

    /// Load host zones and records from a JSON file
    Seed {
        /// Path to a JSON file with `host_zones`, `deposit_records`, `user_redemption_records`
        file: String,
    },

    /// Encode callback args given as JSON to hex
    EncodeArgs {
        #[arg(value_enum)]
        kind: KindArg,
        /// Callback args as JSON
        json: String,
    },

    /// Dispatch one acknowledgement
    Ack {
        #[arg(value_enum)]
        kind: KindArg,

        /// Hex-encoded callback args attached to the packet
        args_hex: String,

        /// Acknowledgement JSON (`{"result":"..."}` or `{"error":"..."}`); omit for a failed ack
        #[arg(short, long)]
        ack: Option<String>,

        #[arg(long, default_value = "icacontroller")]
        port: String,

        #[arg(long, default_value = "channel-0")]
        channel: String,

        #[arg(long, default_value = "1")]
        sequence: u64,
    },

    /// Print a host zone or record as JSON
    Show {
        #[arg(value_enum)]
        entity: EntityArg,
        /// Chain ID for host zones, numeric ID for records
        id: String,
    },

    /// Print ledger counts
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Delegate,
    Redemption,
}

impl From<KindArg> for CallbackKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Delegate => CallbackKind::Delegate,
            KindArg::Redemption => CallbackKind::Redemption,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EntityArg {
    HostZone,
    Deposit,
    Redemption,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LedgerSeed {
    host_zones: Vec<HostZone>,
    deposit_records: Vec<DepositRecord>,
    user_redemption_records: Vec<UserRedemptionRecord>,
}

fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error [{}]: {}", e.error_code(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> common::Result<()> {
    let config = StakeIbcConfig::from_env()?;
    common::init_from_config(&config)?;
    config.print_summary();
    common::log_system_event(
        "stakeibc callback processor started",
        serde_json::json!({
            "network": format!("{:?}", config.network),
            "persistent": !config.store.is_volatile(),
        }),
    );

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::EncodeArgs { kind, json } => cmd_encode_args(kind.into(), &json),
        Commands::Seed { file } => cmd_seed(open_store(&config)?.as_mut(), &file),
        Commands::Ack {
            kind,
            args_hex,
            ack,
            port,
            channel,
            sequence,
        } => {
            let packet = Packet::new(port, channel, sequence);
            let mut store = open_store(&config)?;
            cmd_ack(store.as_mut(), kind.into(), &args_hex, ack.as_deref(), &packet)
        }
        Commands::Show { entity, id } => cmd_show(open_store(&config)?.as_ref(), entity, &id),
        Commands::Stats => {
            println!("{}", open_store(&config)?.stats()?);
            Ok(())
        }
    }
}

fn open_store(config: &StakeIbcConfig) -> common::Result<Box<dyn LedgerStore>> {
    Ok(match &config.store {
        StoreBackend::Memory => {
            tracing::warn!(
                target: "stakeibc::system",
                "using in-memory ledger store, changes are discarded on exit"
            );
            Box::new(MemoryLedgerStore::new())
        }
        StoreBackend::Sqlite { path } => Box::new(SqliteLedgerStore::new(path)?),
    })
}

fn cmd_seed(store: &mut dyn LedgerStore, file: &str) -> common::Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let seed: LedgerSeed = serde_json::from_str(&contents)
        .map_err(|e| StakeIbcError::validation(format!("invalid seed file: {}", e)))?;

    for zone in &seed.host_zones {
        if !zone.is_balanced() {
            return Err(StakeIbcError::validation(format!(
                "host zone {} staked_bal does not match validator delegations",
                zone.chain_id
            )));
        }
        store.set_host_zone(zone)?;
    }
    for record in &seed.deposit_records {
        store.set_deposit_record(record)?;
    }
    for record in &seed.user_redemption_records {
        store.set_user_redemption_record(record)?;
    }

    println!("{}", store.stats()?);
    Ok(())
}

fn cmd_encode_args(kind: CallbackKind, json: &str) -> common::Result<()> {
    let invalid = |e: serde_json::Error| StakeIbcError::validation(format!("invalid {} args: {}", kind, e));
    let args = match kind {
        CallbackKind::Delegate => CallbackArgs::from(serde_json::from_str::<DelegateCallback>(json).map_err(invalid)?),
        CallbackKind::Redemption => CallbackArgs::from(serde_json::from_str::<RedemptionCallback>(json).map_err(invalid)?),
    };

    let bytes = args.encode().map_err(stakeibc_callbacks::CallbackError::from)?;
    println!("{}", hex::encode(bytes));
    Ok(())
}

fn cmd_ack(
    store: &mut dyn LedgerStore,
    kind: CallbackKind,
    args_hex: &str,
    ack_json: Option<&str>,
    packet: &Packet,
) -> common::Result<()> {
    let args = hex::decode(args_hex)
        .map_err(|e| StakeIbcError::validation(format!("invalid args hex: {}", e)))?;
    let ack = ack_json.and_then(|json| Acknowledgement::result_from_bytes(json.as_bytes()));

    let registry = CallbackRegistry::with_default_callbacks();
    let mut keeper = Keeper::new(store);
    registry.dispatch(kind.as_str(), &mut keeper, packet, ack.as_ref(), &args)?;

    println!("{} callback applied for {}", kind, packet.correlation_id());
    Ok(())
}

fn cmd_show(store: &dyn LedgerStore, entity: EntityArg, id: &str) -> common::Result<()> {
    let parse_id = || {
        id.parse::<u64>()
            .map_err(|_| StakeIbcError::validation(format!("record id must be numeric: {}", id)))
    };

    let value = match entity {
        EntityArg::HostZone => serde_json::to_value(store.get_host_zone(id)?),
        EntityArg::Deposit => serde_json::to_value(store.get_deposit_record(parse_id()?)?),
        EntityArg::Redemption => serde_json::to_value(store.get_user_redemption_record(parse_id()?)?),
    }
    .map_err(|e| StakeIbcError::validation(e.to_string()))?;

    if value.is_null() {
        return Err(StakeIbcError::validation(format!("not found: {}", id)));
    }

    println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
    Ok(())
}

/// Walk both callbacks through success and failure on a fresh ledger
fn run_demo() -> common::Result<()> {
    let mut store = MemoryLedgerStore::new();
    store.set_host_zone(&HostZone::new("GAIA", ["cosmosvaloper1a", "cosmosvaloper1b"]))?;
    store.set_deposit_record(&DepositRecord::new(1, "GAIA", 3_000, "uatom"))?;
    store.set_user_redemption_record(&UserRedemptionRecord::new(10, "stride1alice", "cosmos1alice", 500, "GAIA"))?;
    store.set_user_redemption_record(&UserRedemptionRecord::new(11, "stride1bob", "cosmos1bob", 700, "GAIA"))?;

    println!("\n=== stakeibc Callback Demo ===\n");
    println!("Before: {}", store.stats()?);

    let registry = CallbackRegistry::with_default_callbacks();
    let success = AcknowledgementResult::default();

    let delegate = CallbackArgs::from(DelegateCallback {
        host_zone_id: "GAIA".to_string(),
        deposit_record_id: 1,
        split_delegations: vec![
            SplitDelegation::new("cosmosvaloper1a", 2_000),
            SplitDelegation::new("cosmosvaloper1b", 1_000),
        ],
    });
    let packet = Packet::new("icacontroller-GAIA.DELEGATION", "channel-0", 1);
    let mut keeper = Keeper::new(&mut store);
    let outcome = registry.dispatch_args(&mut keeper, &packet, Some(&success), &delegate);
    println!("delegate   (ack ok)  -> {:?}", outcome);

    for (record_id, ack, sequence) in [(10, Some(&success), 2), (11, None, 3)] {
        let args = CallbackArgs::from(RedemptionCallback { user_redemption_record_id: record_id });
        let packet = Packet::new("icacontroller-GAIA.REDEMPTION", "channel-1", sequence);
        let outcome = registry.dispatch_args(&mut keeper, &packet, ack, &args);
        println!(
            "redemption (ack {}) -> {:?}",
            if ack.is_some() { "ok" } else { "nil" },
            outcome
        );
    }

    if let Some(zone) = store.get_host_zone("GAIA")? {
        println!("\nGAIA staked_bal: {} (balanced: {})", zone.staked_bal, zone.is_balanced());
    }
    println!("After: {}", store.stats()?);
    println!("\n=== Demo Complete ===");
    Ok(())
}
