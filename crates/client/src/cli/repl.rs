//! Interactive console loop.
//!
//! Each input line is parsed into a [`ReplCommand`], applied to the
//! [`RegistrationConsole`], and the screen is re-rendered. A command that
//! is still running after [`PENDING_RENDER_DELAY`] gets an early render
//! showing its loading or pending state, and input read from then on until
//! it finishes is refused.

use std::io::Write;
use std::time::Duration;

use registrar_core::console::{ConsoleView, FormField};
use registrar_core::users::User;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::cli::OutputFormat;
use crate::console::RegistrationConsole;
use crate::error::{ClientError, Result};
use crate::output::{json, pretty};

/// How long a command may run before the in-flight screen is drawn.
pub const PENDING_RENDER_DELAY: Duration = Duration::from_millis(100);

const HELP: &str = "\
Commands:
  list                  refetch and show users
  first <text>          set the first name field
  last <text>           set the last name field
  submit                add the user, or save changes when editing
  cancel                leave edit mode and clear the form
  edit <id|row#>        load a user into the form
  type <text>           change the search box without searching
  search [text]         search for the typed (or given) text
  delete <id|row#>      ask to delete a user
  confirm | dismiss     answer the delete prompt
  focus                 simulate regaining window focus
  status                show mutation status
  help                  show this help
  quit                  exit";

/// Refers to a user either by displayed row number (1-based) or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
    Index(usize),
    Id(String),
}

impl RowRef {
    fn parse(arg: &str) -> Option<Self> {
        if arg.is_empty() {
            return None;
        }
        match arg.parse::<usize>() {
            Ok(n) if n > 0 => Some(RowRef::Index(n)),
            _ => Some(RowRef::Id(arg.to_string())),
        }
    }

    /// Finds the referenced user among the displayed rows.
    pub fn resolve<'a>(&self, rows: &'a [User]) -> Option<&'a User> {
        match self {
            RowRef::Index(n) => n.checked_sub(1).and_then(|i| rows.get(i)),
            RowRef::Id(id) => rows.iter().find(|user| &user.id == id),
        }
    }
}

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    First(String),
    Last(String),
    Submit,
    Cancel,
    Edit(RowRef),
    Type(String),
    /// `None` commits what was typed; `Some` types and commits.
    Search(Option<String>),
    Delete(RowRef),
    Confirm,
    Dismiss,
    Focus,
    Status,
    Help,
    Quit,
}

/// What the loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Render(Option<String>),
    Quit,
}

/// Parses one input line. Field text keeps its inner spacing.
pub fn parse_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let row = |usage: &str| {
        RowRef::parse(rest).ok_or_else(|| ClientError::InvalidInput(format!("usage: {}", usage)))
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => ReplCommand::List,
        "first" => ReplCommand::First(rest.to_string()),
        "last" => ReplCommand::Last(rest.to_string()),
        "submit" => ReplCommand::Submit,
        "cancel" => ReplCommand::Cancel,
        "edit" => ReplCommand::Edit(row("edit <id|row#>")?),
        "type" => ReplCommand::Type(rest.to_string()),
        "search" if rest.is_empty() => ReplCommand::Search(None),
        "search" => ReplCommand::Search(Some(rest.to_string())),
        "delete" | "rm" => ReplCommand::Delete(row("delete <id|row#>")?),
        "confirm" | "y" | "yes" => ReplCommand::Confirm,
        "dismiss" | "n" | "no" => ReplCommand::Dismiss,
        "focus" => ReplCommand::Focus,
        "status" => ReplCommand::Status,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        "" => return Err(ClientError::InvalidInput("empty command".to_string())),
        other => {
            return Err(ClientError::InvalidInput(format!(
                "unknown command '{}', try 'help'",
                other
            )))
        }
    };
    Ok(command)
}

/// Applies `command` to the console.
///
/// Backend failures become messages rather than errors, so the loop keeps
/// running.
pub async fn execute(console: &mut RegistrationConsole, command: ReplCommand) -> Result<Step> {
    let message = match command {
        ReplCommand::List => {
            console.mount().await;
            None
        }
        ReplCommand::First(text) => {
            console.set_field(FormField::FirstName, text);
            None
        }
        ReplCommand::Last(text) => {
            console.set_field(FormField::LastName, text);
            None
        }
        ReplCommand::Submit => match console.submit().await {
            Ok(user) => Some(format!("Saved {}", user.full_name())),
            Err(err) => Some(format!("Error: {}", err)),
        },
        ReplCommand::Cancel => {
            console.cancel();
            None
        }
        ReplCommand::Edit(row) => {
            let view = console.view().await;
            let user = row
                .resolve(view.rows())
                .ok_or_else(|| not_shown(&row))?
                .clone();
            console.edit(&user);
            None
        }
        ReplCommand::Type(text) => {
            console.type_search(text);
            None
        }
        ReplCommand::Search(text) => {
            match text {
                Some(text) => console.search_for(text).await,
                None => console.commit_search().await,
            };
            None
        }
        ReplCommand::Delete(row) => {
            let id = match &row {
                RowRef::Index(_) => {
                    let view = console.view().await;
                    row.resolve(view.rows())
                        .ok_or_else(|| not_shown(&row))?
                        .id
                        .clone()
                }
                RowRef::Id(id) => id.clone(),
            };
            console.request_delete(id);
            None
        }
        ReplCommand::Confirm => match console.confirm_delete().await {
            Ok(Some(id)) => Some(format!("Deleted user {}", id)),
            Ok(None) => Some("Nothing to confirm.".to_string()),
            Err(err) => Some(format!("Error: {}", err)),
        },
        ReplCommand::Dismiss => {
            console.dismiss_delete();
            None
        }
        ReplCommand::Focus => {
            if !console.on_focus().await {
                Some("Refetch on focus is disabled.".to_string())
            } else {
                None
            }
        }
        ReplCommand::Status => Some(pretty::format_status(&console.view().await)),
        ReplCommand::Help => Some(HELP.to_string()),
        ReplCommand::Quit => return Ok(Step::Quit),
    };
    Ok(Step::Render(message))
}

fn not_shown(row: &RowRef) -> ClientError {
    match row {
        RowRef::Index(n) => ClientError::InvalidInput(format!("no row {}", n)),
        RowRef::Id(id) => ClientError::InvalidInput(format!("no displayed user with id {}", id)),
    }
}

/// Renders the console screen in the requested format.
pub fn render(view: &ConsoleView, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(view.rows()),
        OutputFormat::Pretty => pretty::format_view(view),
    }
}

/// Console input and output, and whether input is still open.
struct Terminal<'a, R, W> {
    lines: Lines<R>,
    input_open: bool,
    out: &'a mut W,
    format: OutputFormat,
}

impl<R, W> Terminal<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Runs `command`, drawing the in-flight screen once if it outlasts
    /// [`PENDING_RENDER_DELAY`]. Once that screen is up, lines read before
    /// the command finishes are refused; earlier type-ahead waits its turn.
    ///
    /// The outer result fails only on terminal I/O.
    async fn drive(
        &mut self,
        console: &mut RegistrationConsole,
        command: ReplCommand,
    ) -> std::io::Result<Result<Step>> {
        let monitor = console.monitor();
        let work = execute(console, command);
        tokio::pin!(work);
        let in_flight = async {
            tokio::time::sleep(PENDING_RENDER_DELAY).await;
            monitor.view().await
        };
        tokio::pin!(in_flight);
        let mut rendered = false;

        loop {
            tokio::select! {
                biased;
                step = &mut work => return Ok(step),
                view = &mut in_flight, if !rendered => {
                    rendered = true;
                    writeln!(self.out, "{}", render(&view, self.format))?;
                }
                line = self.lines.next_line(), if rendered && self.input_open => match line? {
                    Some(line) if !line.trim().is_empty() => writeln!(
                        self.out,
                        "Busy: '{}' ignored, a request is still running",
                        line.trim()
                    )?,
                    Some(_) => {}
                    None => self.input_open = false,
                },
            }
        }
    }

    async fn show(
        &mut self,
        console: &RegistrationConsole,
        message: Option<String>,
    ) -> std::io::Result<()> {
        writeln!(self.out, "{}", render(&console.view().await, self.format))?;
        if let Some(message) = message {
            writeln!(self.out, "\n{}", message)?;
        }
        Ok(())
    }
}

/// Runs the console until `quit` or end of input, writing screens to `out`.
pub async fn run<R, W>(
    console: &mut RegistrationConsole,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut terminal = Terminal {
        lines: input.lines(),
        input_open: true,
        out,
        format,
    };

    // The initial load is a `list` like any other.
    let mut next = Some(ReplCommand::List);
    loop {
        let command = match next.take() {
            Some(command) => Ok(command),
            None if terminal.input_open => match terminal.lines.next_line().await? {
                Some(line) => parse_command(&line),
                None => break,
            },
            None => break,
        };

        let step = match command {
            Ok(command) => terminal.drive(console, command).await?,
            Err(err) => Err(err),
        };

        match step {
            Ok(Step::Quit) => break,
            Ok(Step::Render(message)) => terminal.show(console, message).await?,
            Err(err) => anstream::eprintln!("{}", err),
        }
    }

    tracing::debug!("Console closed");
    Ok(())
}
