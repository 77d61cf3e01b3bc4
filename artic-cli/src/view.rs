use std::{
    io::{self, Write},
    sync::Arc,
};

use artic_core::{
    record::Record,
    table::{TableProps, TableView},
};
use parking_lot::Mutex;

/// Last frame drawn, shared with the input thread so it can turn row toggles
/// into full page selections.
pub type SharedProps = Arc<Mutex<Option<TableProps>>>;

const TITLE_WIDTH: usize = 32;
const ORIGIN_WIDTH: usize = 14;
const ARTIST_WIDTH: usize = 28;
const INSCRIPTIONS_WIDTH: usize = 16;

pub struct TerminalView<W: Write> {
    out: W,
    shared: SharedProps,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, shared: SharedProps) -> Self {
        Self { out, shared }
    }

    fn draw(&mut self, props: &TableProps) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "Selected Rows: {}", props.selected_count)?;

        let last_row = (props.first + props.rows.len()).min(props.total_records);
        match props.total_pages {
            Some(total_pages) => write!(
                out,
                "Page {}/{} (rows {}-{} of {})",
                props.page_number,
                total_pages,
                props.first + 1,
                last_row,
                props.total_records
            )?,
            None => write!(out, "Page {}", props.page_number)?,
        }
        if props.loading {
            write!(out, "  loading...")?;
        }
        writeln!(out)?;
        if let Some(error) = &props.error {
            writeln!(out, "error: {error} (r to retry)")?;
        }

        writeln!(
            out,
            "    {:>7}  {}  {}  {}  {}  {:>5}  {:>5}",
            "id",
            cell("Title", TITLE_WIDTH),
            cell("Place of Origin", ORIGIN_WIDTH),
            cell("Artist", ARTIST_WIDTH),
            cell("Inscriptions", INSCRIPTIONS_WIDTH),
            "Start",
            "End"
        )?;
        for row in &props.rows {
            let checked = props.selection.iter().any(|sel| sel.id == row.id);
            writeln!(out, "{}", format_row(row, checked))?;
        }

        if let Some(dialog) = &props.dialog {
            writeln!(out, "-- Custom Row Selection --")?;
            writeln!(out, "Enter number of rows, or x to cancel.")?;
            if !dialog.input.is_empty() && !dialog.can_confirm {
                writeln!(out, "{:?} is not a positive number.", dialog.input)?;
            }
        }
        out.flush()
    }
}

impl<W: Write> TableView for TerminalView<W> {
    fn render(&mut self, props: &TableProps) {
        if let Err(err) = self.draw(props) {
            log::error!("failed to draw table: {err}");
        }
        self.shared.lock().replace(props.clone());
    }
}

fn format_row(row: &Record, checked: bool) -> String {
    format!(
        "[{}] {:>7}  {}  {}  {}  {}  {:>5}  {:>5}",
        if checked { 'x' } else { ' ' },
        row.id,
        cell(&row.title, TITLE_WIDTH),
        cell(&row.origin, ORIGIN_WIDTH),
        cell(&row.artist, ARTIST_WIDTH),
        cell(row.inscriptions_display(), INSCRIPTIONS_WIDTH),
        year(row.date_start),
        year(row.date_end),
    )
}

fn year(date: Option<i32>) -> String {
    date.map(|y| y.to_string()).unwrap_or_default()
}

/// Single-line, fixed-width rendering of `text`.
fn cell(text: &str, width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let mut out: String = if flat.chars().count() > width {
        flat.chars()
            .take(width.saturating_sub(1))
            .chain(Some('…'))
            .collect()
    } else {
        flat
    };
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use artic_core::{record::RecordId, table::DialogProps};

    fn record(id: u64, title: &str) -> Arc<Record> {
        Arc::new(Record {
            id: RecordId(id),
            title: title.into(),
            origin: "Japan".into(),
            artist: "Katsushika Hokusai\nJapanese, 1760-1849".into(),
            inscriptions: None,
            date_start: Some(1830),
            date_end: Some(1833),
        })
    }

    fn props() -> TableProps {
        let rows = vec![record(13, "Under the Wave off Kanagawa"), record(14, "Fuji")];
        TableProps {
            selection: vec![rows[1].clone()],
            rows,
            total_records: 100,
            loading: false,
            first: 12,
            rows_page: Some(2),
            selected_count: 3,
            page_number: 2,
            total_pages: Some(9),
            rows_per_page: 12,
            dialog: None,
            error: None,
        }
    }

    fn render(props: &TableProps) -> (String, SharedProps) {
        let shared = SharedProps::default();
        let mut out = Vec::new();
        TerminalView::new(&mut out, shared.clone()).render(props);
        (String::from_utf8(out).unwrap(), shared)
    }

    #[test]
    fn draws_rows_with_checkboxes() {
        let (text, shared) = render(&props());

        assert!(text.contains("Selected Rows: 3"));
        assert!(text.contains("Page 2/9 (rows 13-14 of 100)"));
        assert!(text.contains("[ ]      13  Under the Wave off Kanagawa"));
        assert!(text.contains("[x]      14  Fuji"));
        assert!(text.contains("Katsushika Hokusai Japanese"));
        assert!(text.contains("—"));
        assert!(!text.contains("loading"));
        assert_eq!(shared.lock().as_ref().map(|p| p.page_number), Some(2));
    }

    #[test]
    fn draws_loading_error_and_dialog() {
        let mut props = props();
        props.loading = true;
        props.error = Some("connection reset".into());
        props.dialog = Some(DialogProps {
            input: "abc".into(),
            can_confirm: false,
        });
        let (text, _) = render(&props);

        assert!(text.contains("loading..."));
        assert!(text.contains("error: connection reset"));
        assert!(text.contains("Custom Row Selection"));
        assert!(text.contains("\"abc\" is not a positive number."));
    }

    #[test]
    fn cells_are_fixed_width() {
        assert_eq!(cell("abc", 5), "abc  ");
        assert_eq!(cell("abcdefgh", 5), "abcd…");
        assert_eq!(cell("a\nb", 3), "a b");
    }
}
