//! Command-line driver for the board service.
//!
//! # Responsibility
//! - Exercise `kanban_core` end to end against the configured SQLite file.
//! - Print the board after every command so results are easy to eyeball.
//!
//! Usage:
//! ```text
//! kanban_cli [show]
//! kanban_cli add <column> <text...>
//! kanban_cli move <from-column> <from-index> <to-column> <to-index>
//! kanban_cli edit <card-id> <text...>
//! kanban_cli delete <card-id>
//! ```

use kanban_core::db::open_db;
use kanban_core::{
    init_logging, Board, BoardService, CardId, CardPosition, ColumnId, CoreConfig, DragResult,
    PersistReport, SqliteCardStore,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<(), String> {
    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path).map_err(|err| format!("open board db: {err}"))?;
    let store = SqliteCardStore::try_new(conn).map_err(|err| err.to_string())?;
    let mut service = BoardService::hydrate(store)
        .await
        .map_err(|err| format!("load board: {err}"))?;

    let report = match args.first().map(String::as_str) {
        None | Some("show") => None,
        Some("add") => {
            let column = parse_column(args.get(1))?;
            let text = args.get(2..).unwrap_or_default().join(" ");
            let added = service
                .add_card(column, text)
                .await
                .map_err(|err| err.to_string())?;
            println!("added {}", added.value.id);
            Some(added.report)
        }
        Some("move") => {
            let source = CardPosition::new(parse_column(args.get(1))?, parse_index(args.get(2))?);
            let destination =
                CardPosition::new(parse_column(args.get(3))?, parse_index(args.get(4))?);
            let moved = service
                .move_card(&DragResult::new(source, Some(destination)))
                .await
                .map_err(|err| err.to_string())?;
            Some(moved.report)
        }
        Some("edit") => {
            let card_id = parse_card_id(args.get(1))?;
            let text = args.get(2..).unwrap_or_default().join(" ");
            let edited = service
                .edit_card(&card_id, text)
                .await
                .map_err(|err| err.to_string())?;
            Some(edited.report)
        }
        Some("delete") => {
            let card_id = parse_card_id(args.get(1))?;
            let deleted = service
                .delete_card(&card_id)
                .await
                .map_err(|err| err.to_string())?;
            Some(deleted.report)
        }
        Some(other) => return Err(format!("unknown command `{other}`")),
    };

    if let Some(report) = report {
        print_report(&report);
    }
    print_board(service.board());
    Ok(())
}

fn parse_column(value: Option<&String>) -> Result<ColumnId, String> {
    value
        .ok_or_else(|| "missing column (todo|progress|done)".to_string())?
        .parse::<ColumnId>()
        .map_err(|err| err.to_string())
}

fn parse_index(value: Option<&String>) -> Result<usize, String> {
    let raw = value.ok_or_else(|| "missing index".to_string())?;
    raw.parse::<usize>()
        .map_err(|_| format!("index must be a non-negative integer, got `{raw}`"))
}

fn parse_card_id(value: Option<&String>) -> Result<CardId, String> {
    value
        .map(|raw| CardId::new(raw.as_str()))
        .ok_or_else(|| "missing card id".to_string())
}

fn print_report(report: &PersistReport) {
    for (column, err) in report.failures() {
        eprintln!("warning: column `{column}` not saved: {err}");
    }
}

fn print_board(board: &Board) {
    for column in board.columns() {
        println!("{} ({})", column.title, column.len());
        for (index, card) in column.cards.iter().enumerate() {
            println!("  {index}. [{}] {}", card.id, card.text);
        }
    }
}
