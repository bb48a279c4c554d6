use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;
use weekgrid_model::grid::{COLUMNS, Cell, WeekGrid};

use crate::config::Config;

const INPUT_MARK: &str = "____";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    show_blank_rows: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.color && io::stdout().is_terminal(),
            show_blank_rows: cfg.grid.show_blank_rows,
        }
    }

    pub fn plain(show_blank_rows: bool) -> Self {
        Self {
            color: false,
            show_blank_rows,
        }
    }

    #[tracing::instrument(skip(self, out, grid), fields(week_start = %grid.week_start))]
    pub fn print_grid<W: Write>(&self, out: &mut W, grid: &WeekGrid) -> anyhow::Result<()> {
        writeln!(
            out,
            "{}  (week of {})",
            grid.title,
            grid.week_start.format("%Y-%m-%d")
        )?;

        let numbers = grid
            .headers
            .iter()
            .map(|header| {
                let text = header.day_number.to_string();
                if !header.is_today {
                    text
                } else if self.color {
                    self.paint(&text, "1;33")
                } else {
                    format!("*{text}*")
                }
            })
            .collect::<Vec<_>>();
        let names = grid
            .headers
            .iter()
            .map(|header| header.weekday.clone())
            .collect::<Vec<_>>();

        let mut body = grid
            .rows
            .iter()
            .map(|cells| cells.iter().map(|cell| self.cell_text(cell)).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        if !self.show_blank_rows {
            let visible = grid
                .rows
                .iter()
                .rposition(|cells| cells.iter().any(|cell| !cell.is_blank()))
                .map_or(0, |idx| idx + 1);
            body.truncate(visible);
        }

        if grid.overflow.iter().any(|count| *count > 0) {
            body.push(
                grid.overflow
                    .iter()
                    .map(|count| {
                        if *count > 0 {
                            self.paint(&format!("+{count} more"), "2")
                        } else {
                            String::new()
                        }
                    })
                    .collect(),
            );
        }

        write_table(out, vec![numbers, names], body)?;
        Ok(())
    }

    fn cell_text(&self, cell: &Cell) -> String {
        match cell {
            Cell::Task {
                title,
                completed: true,
                ..
            } => self.paint(&format!("[x] {title}"), "32"),
            Cell::Task { title, .. } => format!("[ ] {title}"),
            Cell::Input { .. } => INPUT_MARK.to_string(),
            Cell::Blank => String::new(),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    header_rows: Vec<Vec<String>>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let mut widths = vec![0usize; COLUMNS];

    for row in header_rows.iter().chain(rows.iter()) {
        for (idx, cell) in row.iter().enumerate().take(COLUMNS) {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for row in &header_rows {
        write_row(&mut writer, row, &widths)?;
    }

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = width)?;
    }
    writeln!(writer)?;

    for row in &rows {
        write_row(&mut writer, row, &widths)?;
    }

    Ok(())
}

fn write_row<W: Write>(writer: &mut W, row: &[String], widths: &[usize]) -> anyhow::Result<()> {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        let cell = row.get(idx).map(String::as_str).unwrap_or_default();
        let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
        let padding = width.saturating_sub(visible_width);
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
    }
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use weekgrid_model::{Action, GridOptions, PlannerState, render_week};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date")
    }

    fn render(state: &PlannerState, renderer: &Renderer) -> String {
        let grid = render_week(state, today(), &GridOptions::default());
        let mut out = Vec::new();
        renderer.print_grid(&mut out, &grid).expect("render grid");
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn strips_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[32m[x] done\x1b[0m"), "[x] done");
    }

    #[test]
    fn prints_headers_and_marks_today() {
        let state = PlannerState::new(today());
        let text = render(&state, &Renderer::plain(false));
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "October 2026  (week of 2026-10-12)");
        assert!(lines[1].starts_with("12"));
        assert!(lines[1].contains("*14*"));
        assert!(lines[2].starts_with("Monday"));
        assert!(lines[3].starts_with("---"));
        // One input row; blank rows trimmed.
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4].matches(INPUT_MARK).count(), 7);
    }

    #[test]
    fn shows_tasks_and_cascade_input() {
        let mut state = PlannerState::new(today());
        let thursday = NaiveDate::from_ymd_opt(2026, 10, 15).expect("valid date");
        state.dispatch(
            Action::AddTask {
                day: thursday.into(),
                title: "Buy milk".to_string(),
            },
            today(),
        );
        state.dispatch(Action::ToggleComplete { day: thursday.into() }, today());

        let text = render(&state, &Renderer::plain(false));
        let lines = text.lines().collect::<Vec<_>>();
        assert!(lines[4].contains("[x] Buy milk"));
        assert_eq!(lines[5].trim(), INPUT_MARK);
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn keeps_blank_rows_when_asked() {
        let state = PlannerState::new(today());
        let text = render(&state, &Renderer::plain(true));
        assert_eq!(text.lines().count(), 4 + GridOptions::default().rows);
    }
}
