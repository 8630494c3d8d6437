use std::process::ExitCode;

use clap::Parser;
use engine::{
    DashboardOptions, Engine, Identity, MemoryStore, NewCategory, NewTransaction,
    SessionIdentity, SqlStore, TransactionFilter, User, aggregation::Period,
    validation::DATE_FORMAT,
};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use serde_json::json;

use cli::{Cli, Command};
use error::Result;
use settings::{Database, Settings};

mod cli;
mod error;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::new(&cli.config)?;
    if let Some(level) = cli.level.clone() {
        settings.app.level = level;
    }
    if let Some(database) = cli.database.as_deref() {
        settings.database = Database::from_flag(database);
    }
    if let Some(id) = cli.user.clone() {
        settings.user = Some(settings::User {
            id,
            ..settings.user.unwrap_or_default()
        });
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "ledgerly={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let engine = build_engine(&settings.database).await?;
    let identity = match settings.user.clone() {
        Some(user) => SessionIdentity::signed_in(User {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
        }),
        None => SessionIdentity::new(),
    };

    execute(&engine, &identity, &settings, cli.command).await
}

async fn build_engine(database: &Database) -> Result<Engine> {
    let builder = Engine::builder();
    let builder = match database {
        Database::Memory => {
            tracing::debug!("using in-memory store");
            builder.store(MemoryStore::new())
        }
        Database::Sqlite(path) => {
            tracing::debug!("using sqlite database {path}");
            let url = format!("sqlite:{path}?mode=rwc");
            let connection = sea_orm::Database::connect(url).await?;
            Migrator::up(&connection, None).await?;
            builder.store(SqlStore::new(connection))
        }
    };
    Ok(builder.build())
}

async fn execute(
    engine: &Engine,
    identity: &dyn Identity,
    settings: &Settings,
    command: Command,
) -> Result<()> {
    let user_id = || identity.require_user_id();
    match command {
        Command::Categories => print(&engine.list_categories(&user_id()?).await?),
        Command::AddCategory(args) => {
            let mut input = NewCategory::new(args.name, args.description, args.color);
            if let Some(limit) = args.limit {
                input = input.spending_limit(limit);
            }
            let id = engine.create_category(&user_id()?, &input).await?;
            print(&json!({ "id": id }))
        }
        Command::DeleteCategory { id } => {
            engine.delete_category(&user_id()?, &id).await?;
            print(&json!({ "deleted": id }))
        }
        Command::Bootstrap => {
            let outcome = engine.bootstrap_default_categories(&user_id()?).await?;
            print(&json!({ "outcome": outcome, "message": outcome.message() }))
        }
        Command::Add(args) => {
            let date = args
                .date
                .unwrap_or_else(|| engine.today().format(DATE_FORMAT).to_string());
            let mut input = NewTransaction::new(
                args.kind,
                args.amount,
                date,
                args.category,
                args.description,
            );
            if let Some(method) = args.payment_method {
                input = input.payment_method(method);
            }
            if args.recurring {
                input = input.recurring(args.months);
            }
            let id = engine.create_transaction(&user_id()?, &input).await?;
            print(&json!({ "id": id }))
        }
        Command::Delete { id } => {
            engine.delete_transaction(&user_id()?, &id).await?;
            print(&json!({ "deleted": id }))
        }
        Command::List(args) => {
            let filter = TransactionFilter {
                start_date: args.from,
                end_date: args.to,
                category_id: args.category,
                kind: args.kind,
            };
            print(&engine.filter_transactions(&user_id()?, &filter).await?)
        }
        Command::Dashboard(args) => {
            let mut options: DashboardOptions = settings.dashboard.options();
            if let Some(days) = args.days {
                options = options.period(Period::from_days(days));
            }
            if let Some(kind) = args.kind {
                options = options.kind(kind);
            }
            print(&engine.dashboard_for(identity, &options).await?)
        }
    }
}

fn print(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
