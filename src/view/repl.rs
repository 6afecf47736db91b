//! Line-oriented front end for [`PackingView`]: polls on a timer and reads
//! commands from stdin in the same loop.

use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use super::{render, Outcome, PackingView, Store};

pub const HELP: &str = "\
Commands:
  trip add <name>                 create a trip and switch to it
  trip use <id>                   switch trips
  trip rm <id>                    delete a trip with its categories and items
  cat add <name>                  add a category to the current trip
  cat toggle <id>                 collapse or expand a category
  item add <cat-id> <name> [@who] add an item, optionally assigned
  item toggle <id>                mark an item packed or unpacked
  item rm <id>                    delete an item
  refresh                         reload from the server now
  help                            show this text
  quit                            leave
Ids may be shortened to any unique prefix.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTrip(String),
    UseTrip(String),
    RemoveTrip(String),
    AddCategory(String),
    ToggleCategory(String),
    AddItem {
        category: String,
        name: String,
        assigned_to: Option<String>,
    },
    ToggleItem(String),
    RemoveItem(String),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("no {kind} matches `{prefix}`")]
    NotFound { kind: &'static str, prefix: String },
    #[error("`{prefix}` matches more than one {kind}")]
    Ambiguous { kind: &'static str, prefix: String },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = split_word(line);
        let (verb, args) = split_word(rest);

        match (head, verb) {
            ("help", _) | ("?", _) => Ok(Self::Help),
            ("quit", _) | ("exit", _) | ("q", _) => Ok(Self::Quit),
            ("refresh", _) => Ok(Self::Refresh),
            ("trip", "add") => non_empty(args, "trip add <name>").map(Self::AddTrip),
            ("trip", "use") => non_empty(args, "trip use <id>").map(Self::UseTrip),
            ("trip", "rm") => non_empty(args, "trip rm <id>").map(Self::RemoveTrip),
            ("cat", "add") => non_empty(args, "cat add <name>").map(Self::AddCategory),
            ("cat", "toggle") => non_empty(args, "cat toggle <id>").map(Self::ToggleCategory),
            ("item", "add") => parse_add_item(args),
            ("item", "toggle") => non_empty(args, "item toggle <id>").map(Self::ToggleItem),
            ("item", "rm") => non_empty(args, "item rm <id>").map(Self::RemoveItem),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn non_empty(args: &str, usage: &'static str) -> Result<String, CommandError> {
    if args.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(args.to_string())
    }
}

fn parse_add_item(args: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "item add <cat-id> <name> [@who]";
    let (category, rest) = split_word(args);
    if category.is_empty() || rest.is_empty() {
        return Err(CommandError::Usage(USAGE));
    }

    let (name, assigned_to) = match rest.rsplit_once('@') {
        Some((name, who)) if !who.trim().is_empty() => {
            (name.trim(), Some(who.trim().to_string()))
        }
        _ => (rest, None),
    };
    if name.is_empty() {
        return Err(CommandError::Usage(USAGE));
    }

    Ok(Command::AddItem {
        category: category.to_string(),
        name: name.to_string(),
        assigned_to,
    })
}

fn resolve<I>(kind: &'static str, prefix: &str, ids: I) -> Result<Uuid, CommandError>
where
    I: IntoIterator<Item = Uuid>,
{
    let prefix = prefix.to_ascii_lowercase();
    let mut matches = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(CommandError::NotFound { kind, prefix }),
        (Some(_), Some(_)) => Err(CommandError::Ambiguous { kind, prefix }),
    }
}

fn trip_ids(store: &Store) -> Vec<Uuid> {
    store.trips().iter().map(|t| t.id()).collect()
}

fn category_ids(store: &Store) -> Vec<Uuid> {
    store
        .current_trip()
        .map(|t| t.categories.iter().map(|c| c.id()).collect())
        .unwrap_or_default()
}

fn item_ids(store: &Store) -> Vec<Uuid> {
    store
        .current_trip()
        .map(|t| {
            t.categories
                .iter()
                .flat_map(|c| c.items.iter().map(|i| i.id))
                .collect()
        })
        .unwrap_or_default()
}

/// Runs one command. Returns `false` once the user asks to quit.
pub async fn execute(view: &PackingView, command: Command) -> Result<bool, CommandError> {
    let store = view.snapshot().await;
    let outcome = match command {
        Command::Quit => return Ok(false),
        Command::Help => {
            println!("{HELP}");
            return Ok(true);
        }
        Command::Refresh => {
            view.load().await;
            Outcome::Saved
        }
        Command::AddTrip(name) => view.add_trip(&name).await,
        Command::UseTrip(prefix) => {
            view.select_trip(resolve("trip", &prefix, trip_ids(&store))?)
                .await;
            Outcome::Saved
        }
        Command::RemoveTrip(prefix) => {
            let id = resolve("trip", &prefix, trip_ids(&store))?;
            view.delete_trip(id).await
        }
        Command::AddCategory(name) => view.add_category(&name).await,
        Command::ToggleCategory(prefix) => {
            view.toggle_category(resolve("category", &prefix, category_ids(&store))?)
                .await;
            Outcome::Saved
        }
        Command::AddItem {
            category,
            name,
            assigned_to,
        } => {
            let category_id = resolve("category", &category, category_ids(&store))?;
            view.add_item(category_id, &name, assigned_to.as_deref())
                .await
        }
        Command::ToggleItem(prefix) => {
            let id = resolve("item", &prefix, item_ids(&store))?;
            view.toggle_item(id).await
        }
        Command::RemoveItem(prefix) => {
            let id = resolve("item", &prefix, item_ids(&store))?;
            view.delete_item(id).await
        }
    };

    if let Outcome::SavedLocally(error) = &outcome {
        println!("! Could not save to the server ({error}); the change is only local for now.");
    }
    Ok(true)
}

/// Loads immediately, then every `interval`, while handling stdin commands.
pub async fn run(view: PackingView, interval: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = Screen::default();

    println!("Connected to {}. Type `help` for commands.", view.base_url());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                view.load().await;
                screen.show(&view.snapshot().await, false);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(command) => match execute(&view, command).await {
                        Ok(true) => screen.show(&view.snapshot().await, true),
                        Ok(false) => break,
                        Err(e) => println!("! {e}"),
                    },
                    Err(e) => println!("! {e}"),
                }
            }
        }
    }

    tracing::debug!("Watch loop finished");
    Ok(())
}

/// Remembers the last dashboard printed so polls only redraw on change.
#[derive(Default)]
struct Screen {
    last: Option<String>,
}

impl Screen {
    fn show(&mut self, store: &Store, force: bool) {
        let text = render::dashboard(store);
        if force || self.last.as_deref() != Some(text.as_str()) {
            print!("{text}");
            self.last = Some(text);
        }
    }
}
