//! Bank account simulation binary
//!
//! Opens one account, runs a fixed script of operations against it and
//! prints each outcome followed by the transaction history.

use account_core::{
    display::{format_history, format_money, history_json},
    spawn_account_actor_with_metrics, Account, AccountHandle, AccountId, Config, Error, Metrics,
    TransactionRecord,
};
use chrono::Local;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

/// The account the script talks to
enum Driver {
    /// Lock-guarded account
    Shared(Account),
    /// Single-writer actor
    Actor(AccountHandle),
}

impl Driver {
    fn id(&self) -> &AccountId {
        match self {
            Driver::Shared(account) => account.id(),
            Driver::Actor(handle) => handle.id(),
        }
    }

    async fn deposit(&self, amount: Decimal) -> account_core::Result<TransactionRecord> {
        match self {
            Driver::Shared(account) => account.deposit(amount),
            Driver::Actor(handle) => handle.deposit(amount).await,
        }
    }

    async fn withdraw(&self, amount: Decimal) -> account_core::Result<TransactionRecord> {
        match self {
            Driver::Shared(account) => account.withdraw(amount),
            Driver::Actor(handle) => handle.withdraw(amount).await,
        }
    }

    async fn balance(&self) -> account_core::Result<Decimal> {
        match self {
            Driver::Shared(account) => Ok(account.balance()),
            Driver::Actor(handle) => handle.balance().await,
        }
    }

    async fn history(&self) -> account_core::Result<Vec<TransactionRecord>> {
        match self {
            Driver::Shared(account) => Ok(account.history()),
            Driver::Actor(handle) => handle.history().await,
        }
    }

    /// Final consistency check for the shared account, mailbox shutdown for the actor
    async fn finish(self) -> account_core::Result<()> {
        match self {
            Driver::Shared(account) => account.verify(),
            Driver::Actor(handle) => handle.shutdown().await,
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn print_balance(driver: &Driver) -> account_core::Result<()> {
    println!("Current Balance: ${}", format_money(driver.balance().await?));
    Ok(())
}

async fn run_deposit(driver: &Driver, amount: Decimal) -> account_core::Result<()> {
    match driver.deposit(amount).await {
        Ok(record) => println!(
            "💰 Successfully deposited ${}. Current Balance: ${}",
            format_money(record.amount),
            format_money(record.resulting_balance)
        ),
        Err(Error::InvalidAmount { .. }) => {
            eprintln!("❌ Deposit failed: Amount must be positive.")
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

async fn run_withdraw(driver: &Driver, amount: Decimal) -> account_core::Result<()> {
    match driver.withdraw(amount).await {
        Ok(record) => println!(
            "💸 Successfully withdrew ${}. Current Balance: ${}",
            format_money(record.amount),
            format_money(record.resulting_balance)
        ),
        Err(Error::InvalidAmount { .. }) => {
            eprintln!("❌ Withdrawal failed: Amount must be positive.")
        }
        Err(Error::InsufficientFunds {
            requested,
            available,
        }) => eprintln!(
            "🛑 Withdrawal failed: Insufficient funds. Requested: ${}, Available: ${}",
            format_money(requested),
            format_money(available)
        ),
        Err(e) => return Err(e),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_tracing(&config);

    tracing::info!(service = %config.service_name, actor = config.actor.enabled, "Starting");

    println!("--- Starting Bank Account Simulation ---");

    let metrics = if config.metrics.enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    let driver = if config.actor.enabled {
        Driver::Actor(spawn_account_actor_with_metrics(
            config.account.id.as_str(),
            config.account.initial_deposit,
            config.actor.mailbox_capacity,
            metrics.clone(),
        ))
    } else {
        let account = Account::open(config.account.id.as_str(), config.account.initial_deposit);
        match &metrics {
            Some(metrics) => Driver::Shared(account.with_metrics(metrics.clone())),
            None => Driver::Shared(account),
        }
    };

    if config.account.initial_deposit <= Decimal::ZERO {
        eprintln!("❌ Deposit failed: Amount must be positive.");
    }
    println!(
        "✅ New account created: {} with initial balance: ${}",
        driver.id(),
        format_money(driver.balance().await?)
    );

    // 1. Check balance
    println!("\n--- ACTION: Check Balance (Initial) ---");
    print_balance(&driver).await?;

    // 2. Deposit
    let deposit_amount = dec!(250.50);
    println!("\n--- ACTION: Deposit ${} ---", format_money(deposit_amount));
    run_deposit(&driver, deposit_amount).await?;

    println!("\n--- CHECK: Balance after Deposit ---");
    print_balance(&driver).await?;

    // 3. Withdraw
    let withdrawal_amount = dec!(125.00);
    println!("\n--- ACTION: Withdraw ${} ---", format_money(withdrawal_amount));
    run_withdraw(&driver, withdrawal_amount).await?;

    println!("\n--- CHECK: Balance after Withdrawal ---");
    print_balance(&driver).await?;

    // 4. Overdraft attempt
    let overdraft_amount = dec!(5000.00);
    println!("\n--- ACTION: Withdraw ${} (exceeds balance) ---", format_money(overdraft_amount));
    run_withdraw(&driver, overdraft_amount).await?;

    println!("\n--- CHECK: Balance after rejected Withdrawal ---");
    print_balance(&driver).await?;

    // Transaction history
    let history = driver.history().await?;
    println!();
    print!("{}", format_history(driver.id(), &history, &Local));

    if config.output.json {
        println!("\n--- HISTORY (JSON) ---");
        println!("{}", history_json(&history)?);
    }

    if let Some(metrics) = &metrics {
        println!("\n--- METRICS ---");
        print!("{}", metrics.render()?);
    }

    driver.finish().await?;

    println!("\n--- Simulation Complete ---");
    Ok(())
}
