use std::{collections::HashSet, io::BufRead};

use artic_core::{
    record::RecordId,
    table::{TableEvent, TableProps},
};
use crossbeam_channel::Sender;

use crate::view::SharedProps;

pub const HELP: &str = "\
commands:
  n, >        next page
  p, <        previous page
  g N         go to page N
  t ID [ID..] toggle rows
  a           check every row on the page
  c           uncheck every row on the page
  s           select the first N rows of the page
  r           retry the last page load
  q           quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    GoTo(usize),
    Toggle(Vec<RecordId>),
    CheckAll,
    UncheckAll,
    BulkSelect,
    Retry,
    Quit,
    DialogInput(String),
    DialogCancel,
}

/// Parse one input line.  While the bulk-select dialog is open every line
/// is its input.
pub fn parse(line: &str, dialog_open: bool) -> Result<Command, String> {
    let line = line.trim();
    if dialog_open {
        return Ok(match line {
            "x" => Command::DialogCancel,
            input => Command::DialogInput(input.to_string()),
        });
    }

    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some("n" | ">") => Command::Next,
        Some("p" | "<") => Command::Previous,
        Some("g") => {
            let number = words
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .ok_or_else(|| "expected a page number".to_string())?;
            Command::GoTo(number)
        }
        Some("t") => {
            let ids = words
                .map(|id| id.parse::<u64>().map(RecordId))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| format!("bad row id: {err}"))?;
            if ids.is_empty() {
                return Err("expected at least one row id".to_string());
            }
            Command::Toggle(ids)
        }
        Some("a") => Command::CheckAll,
        Some("c") => Command::UncheckAll,
        Some("s") => Command::BulkSelect,
        Some("r") => Command::Retry,
        Some("q") => Command::Quit,
        Some(other) => return Err(format!("unknown command {other:?}")),
        None => return Err("empty command".to_string()),
    };
    Ok(command)
}

/// Translate a command into the events a table view would emit for it.
pub fn events(command: Command, props: Option<&TableProps>) -> Vec<TableEvent> {
    match command {
        Command::Quit => vec![TableEvent::Shutdown],
        Command::Retry => vec![TableEvent::Retry],
        Command::BulkSelect => vec![TableEvent::OpenBulkSelect],
        Command::DialogCancel => vec![TableEvent::CancelBulkSelect],
        Command::DialogInput(input) => vec![
            TableEvent::BulkSelectInput(input),
            TableEvent::ConfirmBulkSelect,
        ],
        Command::GoTo(number) => vec![TableEvent::PageChange {
            index: number.saturating_sub(1),
        }],
        command => props
            .map(|props| page_events(command, props))
            .unwrap_or_default(),
    }
}

fn page_events(command: Command, props: &TableProps) -> Vec<TableEvent> {
    match command {
        Command::Next => {
            let last = props.total_pages.unwrap_or(usize::MAX);
            if props.page_number < last {
                vec![TableEvent::PageChange {
                    index: props.page_number,
                }]
            } else {
                Vec::new()
            }
        }
        Command::Previous if props.page_number > 1 => vec![TableEvent::PageChange {
            index: props.page_number - 2,
        }],
        Command::CheckAll | Command::UncheckAll | Command::Toggle(_) => {
            selection_events(command, props)
        }
        _ => Vec::new(),
    }
}

/// Selection changes carry the page their rows were drawn from, so the table
/// can drop them if another page has been loaded since.
fn selection_events(command: Command, props: &TableProps) -> Vec<TableEvent> {
    let Some(page) = props.rows_page else {
        return Vec::new();
    };
    let selection = match command {
        Command::CheckAll => props.rows.clone(),
        Command::UncheckAll => Vec::new(),
        Command::Toggle(ids) => {
            let toggled: HashSet<RecordId> = ids.into_iter().collect();
            let checked: HashSet<RecordId> = props.selection.iter().map(|row| row.id).collect();
            for id in &toggled {
                if !props.rows.iter().any(|row| row.id == *id) {
                    log::warn!("row {id} is not on this page");
                }
            }
            props
                .rows
                .iter()
                .filter(|row| checked.contains(&row.id) != toggled.contains(&row.id))
                .cloned()
                .collect()
        }
        _ => return Vec::new(),
    };
    vec![TableEvent::SelectionChange { page, selection }]
}

/// Feed commands from `input` to the table until quit or end of input.
pub fn read_commands(input: impl BufRead, sender: Sender<TableEvent>, props: SharedProps) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("failed to read input: {err}");
                break;
            }
        };
        let dialog_open = props
            .lock()
            .as_ref()
            .is_some_and(|props| props.dialog.is_some());
        let command = match parse(&line, dialog_open) {
            Ok(command) => command,
            Err(err) => {
                log::warn!("{err}");
                println!("{HELP}");
                continue;
            }
        };
        let quit = command == Command::Quit;
        let events = events(command, props.lock().as_ref());
        for event in events {
            if sender.send(event).is_err() {
                return;
            }
        }
        if quit {
            return;
        }
    }
    let _ = sender.send(TableEvent::Shutdown);
}
