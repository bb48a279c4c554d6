use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};
use weekgrid_model::grid::{GridOptions, render_week};
use weekgrid_model::store::{Action, Outcome, PlannerState};
use weekgrid_model::task::Task;

use crate::config::Config;
use crate::datetime::{CellRef, parse_cell_ref};
use crate::render::Renderer;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "toggle", "done", "delete", "rm", "next", "prev", "today", "show", "dump", "help",
        "quit", "exit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { cell: CellRef, title: String },
    Toggle { cell: CellRef },
    Delete { cell: CellRef },
    Next,
    Prev,
    Today,
    Show,
    Dump,
    Help,
    Quit,
}

/// Blank lines and `#` comments parse to `None`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map(|(head, rest)| (head, rest.trim()))
        .unwrap_or((line, ""));
    let head = head.to_ascii_lowercase();
    let known = known_command_names();
    let command = expand_command_abbrev(head.as_str(), &known)
        .ok_or_else(|| anyhow!("unknown command: {head} (try 'help')"))?;
    debug!(token = %head, expanded = %command, "resolved command token");

    let parsed = match command {
        "add" => {
            let (cell, title) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("usage: add <cell> <title>"))?;
            Command::Add {
                cell: parse_cell_ref(cell)?,
                title: title.trim().to_string(),
            }
        }
        "toggle" | "done" => Command::Toggle {
            cell: parse_cell_ref(require_arg(rest, command)?)?,
        },
        "delete" | "rm" => Command::Delete {
            cell: parse_cell_ref(require_arg(rest, command)?)?,
        },
        "next" => Command::Next,
        "prev" => Command::Prev,
        "today" => Command::Today,
        "show" => Command::Show,
        "dump" => Command::Dump,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(Some(parsed))
}

fn require_arg<'a>(rest: &'a str, command: &str) -> anyhow::Result<&'a str> {
    if rest.is_empty() {
        return Err(anyhow!("usage: {command} <cell>"));
    }
    Ok(rest)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive planner session: owns the state snapshot and re-renders after each change.
pub struct Session<W: Write> {
    state: PlannerState,
    options: GridOptions,
    renderer: Renderer,
    today: NaiveDate,
    prompt: bool,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(cfg: &Config, today: NaiveDate, reference: NaiveDate, renderer: Renderer, out: W) -> Self {
        Self {
            state: PlannerState::new(reference).with_max_title_len(cfg.tasks.max_title_len),
            options: cfg.grid_options(),
            renderer,
            today,
            prompt: false,
            out,
        }
    }

    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn into_output(self) -> W {
        self.out
    }

    #[instrument(skip(self, input))]
    pub fn run_lines<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        self.show()?;

        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(self.out, "weekgrid> ")?;
                self.out.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("failed to read command")?;

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    warn!(error = %err, line = %line, "rejected command");
                    writeln!(self.out, "error: {err:#}")?;
                    continue;
                }
            };

            if self.execute(command)? == Flow::Quit {
                break;
            }
        }

        info!(revision = self.state.revision(), tasks = self.state.len(), "session finished");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        let week_start = self.state.week_start();
        let action = match command {
            Command::Add { cell, title } => Action::AddTask {
                day: cell.resolve(week_start, self.today).into(),
                title,
            },
            Command::Toggle { cell } => Action::ToggleComplete {
                day: cell.resolve(week_start, self.today).into(),
            },
            Command::Delete { cell } => Action::DeleteTask {
                day: cell.resolve(week_start, self.today).into(),
            },
            Command::Next => Action::next_week(),
            Command::Prev => Action::previous_week(),
            Command::Today => Action::GoToToday,
            Command::Show => {
                self.show()?;
                return Ok(Flow::Continue);
            }
            Command::Dump => {
                self.dump()?;
                return Ok(Flow::Continue);
            }
            Command::Help => {
                print_help(&mut self.out)?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        let outcome = self.state.dispatch(action, self.today);
        match outcome {
            Outcome::RejectedPast { day } => debug!(%day, "ignored add on a past date"),
            Outcome::Missing { day } => debug!(%day, "no task at cell"),
            _ => {}
        }
        if outcome.changed() {
            self.show()?;
        }

        Ok(Flow::Continue)
    }

    fn show(&mut self) -> anyhow::Result<()> {
        let grid = render_week(&self.state, self.today, &self.options);
        self.renderer.print_grid(&mut self.out, &grid)
    }

    fn dump(&mut self) -> anyhow::Result<()> {
        let by_date = self
            .state
            .tasks()
            .iter()
            .map(|(day, task)| (day.to_string(), task))
            .collect::<BTreeMap<String, &Task>>();
        serde_json::to_writer_pretty(&mut self.out, &by_date).context("failed to encode tasks")?;
        writeln!(self.out)?;
        Ok(())
    }
}

fn print_help<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(
        out,
        "commands:\n  \
         add <cell> <title>   put a task in a cell\n  \
         toggle <cell>        flip completed (alias: done)\n  \
         delete <cell>        remove a task (alias: rm)\n  \
         next | prev          move one week\n  \
         today                jump to the current week\n  \
         show                 redraw the grid\n  \
         dump                 print tasks as JSON\n  \
         quit                 leave (alias: exit)\n\
         cells: mon, tue/1 (one row down), 2026-10-19, today"
    )?;
    Ok(())
}
