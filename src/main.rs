//! Trade-in pricing operator CLI
//!
//! Quotes trade-ins against the storefront database:
//! - single quotes (audited to the pricing history)
//! - quote grids and active model listings
//! - pricing history read-back and migrations

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};
use tradein_pricing::config::AppConfig;
use tradein_pricing::database::{create_pool, run_migrations};
use tradein_pricing::models::{DeviceCondition, StorageCapacity};
use tradein_pricing::services::{AuditTrailService, PricingHistoryRecorder};
use tradein_pricing::{AppError, AppResult, AppState};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tradein-pricing")]
#[command(about = "Trade-in pricing backend CLI")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price one trade-in and record it in the pricing history
    Quote {
        #[arg(long)]
        model_id: Uuid,
        /// 64GB, 128GB, 256GB, 512GB or 1TB
        #[arg(long)]
        storage: String,
        /// excellent, good, fair or poor
        #[arg(long)]
        condition: String,
    },
    /// Price every storage and condition pair for a model
    Grid {
        #[arg(long)]
        model_id: Uuid,
    },
    /// List models open for trade-in
    Models,
    /// Show recent quotes for a model
    History {
        #[arg(long)]
        model_id: Uuid,
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tradein_pricing={},sqlx=warn", config.log_level).into());
    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    info!("Environment: {}", config.environment);

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    if let Command::Migrate = cli.command {
        info!("Running database migrations from {}...", config.database.migrations_path);
        run_migrations(&pool, &config.database.migrations_path).await?;
        info!("Database migrations completed successfully");
        return Ok(());
    }

    // Audit pipeline: quotes flow to the recorder over a channel
    let (recorder, history_sender) = PricingHistoryRecorder::channel(config.history_buffer);
    let app_state = AppState::new(pool, history_sender);

    let mut recorder = recorder.with_writer(app_state.history_repo.clone());
    if let Some(dir) = &config.audit_log_dir {
        let audit_trail = AuditTrailService::new(dir.clone()).map_err(|e| {
            error!("Failed to initialize audit trail: {}", e);
            e
        })?;
        recorder = recorder.with_writer(Arc::new(audit_trail));
    }
    let recorder_handle = tokio::spawn(recorder.start());

    let outcome = run(&cli, &app_state).await;

    // Closing the last sender lets the recorder drain and stop
    drop(app_state);
    if let Err(e) = recorder_handle.await {
        error!("Pricing history recorder task failed: {}", e);
    }

    outcome
}

async fn run(cli: &Cli, state: &AppState) -> AppResult<()> {
    match &cli.command {
        Command::Quote {
            model_id,
            storage,
            condition,
        } => {
            let storage = StorageCapacity::parse(storage);
            let condition = DeviceCondition::parse(condition);
            let quote = state
                .trade_in_service
                .calculate(*model_id, &storage, &condition)
                .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("Trade-in value: {}", quote.final_value);
                println!("  base price          {}", quote.base_price);
                println!("  time decay          {}", quote.time_decay);
                println!("  supply/demand       x{} (ratio {})", quote.supply_demand_multiplier, quote.supply_demand_ratio);
                println!("  market position     x{} (position {})", quote.market_position_multiplier, quote.market_position);
                println!("  seasonal            x{}", quote.seasonal_multiplier);
                println!("  storage {:<11} x{}", storage, quote.storage_value);
                println!("  condition {:<9} x{}", condition, quote.condition_multiplier);
                println!("  bounds              [{}, {}]", quote.min_value, quote.max_value);
                println!("  months since release {}", quote.months_since_release);
            }
        }
        Command::Grid { model_id } => {
            let grid = state.trade_in_service.quote_grid(*model_id, Utc::now()).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                for quote in grid {
                    println!(
                        "{:<6} {:<10} {}",
                        quote.storage, quote.condition, quote.calculation.final_value
                    );
                }
            }
        }
        Command::Models => {
            let models = state.trade_in_service.list_active_models().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&models)?);
            } else {
                for model in models {
                    println!(
                        "{}  {:<32} released {}  base {}",
                        model.id,
                        model.display_name(),
                        model.release_date,
                        model.base_trade_in_value
                    );
                }
            }
        }
        Command::History { model_id, limit } => {
            let entries = state.history_repo.find_by_model(*model_id, *limit).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!(
                        "{}  {:<6} {:<10} {}",
                        entry.calculated_at, entry.storage_capacity, entry.device_condition, entry.final_value
                    );
                }
            }
        }
        Command::Migrate => {}
    }

    Ok(())
}
