//! `foodlog` - CLI for the food log
//!
//! This binary adds, edits, lists and deletes logged foods from the terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;

use foodlog::cli::{
    render, AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ListCommand,
    OutputFormat, ShowCommand,
};
use foodlog::record::NutritionTotals;
use foodlog::{
    init_logging, AppState, Category, Config, DeleteOutcome, Error, FoodForm, FormController,
    ListView, RecordId, RecordStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(cmd) => handle_add(&open_state(config)?, cmd).await,
        Command::Edit(cmd) => handle_edit(&open_state(config)?, cmd).await,
        Command::List(cmd) => handle_list(&open_state(config)?, &cmd).await,
        Command::Show(cmd) => handle_show(&open_state(config)?, &cmd).await,
        Command::Delete(cmd) => handle_delete(&open_state(config)?, &cmd).await,
        Command::Categories => {
            handle_categories();
            Ok(())
        }
        Command::Status(cmd) => handle_status(&open_state(config)?, cmd.json).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_state(config: Config) -> anyhow::Result<AppState> {
    AppState::init(config).context("opening the food store")
}

async fn handle_add(state: &AppState, cmd: AddCommand) -> anyhow::Result<()> {
    let mut form = FoodForm::new();
    form.food_name = cmd.name;
    cmd.fields.apply_to(&mut form);

    let record = FormController::new(state.clone()).submit(&form).await?;
    match cmd.format {
        OutputFormat::Plain => println!("Added {} ({})", record.food_name, record.id),
        format => print!("{}", render::record(&record, format)?),
    }
    Ok(())
}

async fn handle_edit(state: &AppState, cmd: EditCommand) -> anyhow::Result<()> {
    let id = RecordId::from(cmd.id);
    let current = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| Error::not_found(&id))?;

    let mut form = FoodForm::from_record(&current);
    if let Some(name) = cmd.name {
        form.food_name = name;
    }
    cmd.fields.apply_to(&mut form);
    if cmd.no_image {
        form.image = None;
    }

    let record = FormController::new(state.clone()).submit(&form).await?;
    match cmd.format {
        OutputFormat::Plain => println!("Updated {} ({})", record.food_name, record.id),
        format => print!("{}", render::record(&record, format)?),
    }
    Ok(())
}

async fn handle_list(state: &AppState, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut view = ListView::new(state);
    view.on_focus().await;
    if let Some(search) = &cmd.search {
        view.set_search(search.as_str());
    }

    if cmd.group {
        print!("{}", render::groups(&view.grouped(), cmd.format)?);
    } else {
        print!("{}", render::records(&view.visible(), cmd.format)?);
    }
    if cmd.format == OutputFormat::Json {
        println!();
    }

    if cmd.totals {
        print!("{}", render::totals(&view.totals(), cmd.format)?);
        if cmd.format == OutputFormat::Json {
            println!();
        }
    }
    Ok(())
}

async fn handle_show(state: &AppState, cmd: &ShowCommand) -> anyhow::Result<()> {
    let id = RecordId::from(cmd.id.as_str());
    let record = state
        .store
        .get(&id)
        .await
        .ok_or_else(|| Error::not_found(&id))?;
    print!("{}", render::record(&record, cmd.format)?);
    if cmd.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

/// Ask on the terminal; anything but `y`/`yes` declines.
fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn handle_delete(state: &AppState, cmd: &DeleteCommand) -> anyhow::Result<()> {
    let id = RecordId::from(cmd.id.as_str());
    let controller = FormController::new(state.clone());

    let outcome = if cmd.yes {
        controller.delete(&id, |_: &str| true).await?
    } else {
        if let Some(record) = state.store.get(&id).await {
            println!("{} ({})", record.food_name, record.id);
        }
        controller.delete(&id, ask).await?
    };

    match outcome {
        DeleteOutcome::Deleted(record) => println!("Deleted {} ({})", record.food_name, record.id),
        DeleteOutcome::Cancelled => println!("Cancelled."),
        DeleteOutcome::NotFound => bail!("no food record with id {id}"),
    }
    Ok(())
}

fn handle_categories() {
    for category in Category::ALL {
        println!("{:<14} {}", category.label(), category.color());
    }
}

async fn handle_status(state: &AppState, json: bool) -> anyhow::Result<()> {
    let records = state.store.load().await;
    let totals = NutritionTotals::from_records(&records);
    let config = &state.config;

    if json {
        let status = serde_json::json!({
            "backend": state.store.name(),
            "store_path": config.store_path(),
            "images_dir": state.images.dir(),
            "records": records.len(),
            "total_calories": totals.calories,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("foodlog status");
        println!("--------------");
        println!("Backend:       {}", state.store.name());
        println!("Store:         {}", config.store_path().display());
        println!("Images:        {}", state.images.dir().display());
        println!("Records:       {}", records.len());
        println!("Calories:      {:.1} kcal", totals.calories);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Backend:            {}", config.storage.backend);
                println!("  Document:           {}", config.document_path().display());
                println!("  Database:           {}", config.database_path().display());
                println!("  Images:             {}", config.images_dir().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
