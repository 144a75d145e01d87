use crate::command::{Command, HELP};
use rustyline::{DefaultEditor, error::ReadlineError};
use std::path::Path;
use thiserror::Error as ThisError;
use verdictmap::{
    Error,
    catalogue::GeometryCatalogue,
    config::Config,
    core::obs::metrics_report,
    export::GeoJsonExporter,
    session::{BrowseSession, MapSession, PageView, RegionTable},
    store::SqliteStore,
};

const PROMPT: &str = "verdictmap> ";

/// Widest a single cell is printed before it is cut.
const CELL_WIDTH: usize = 40;

///
/// ShellError
///

#[derive(Debug, ThisError)]
pub enum ShellError {
    #[error(transparent)]
    Setup(#[from] Error),

    #[error("line editor: {0}")]
    Readline(#[from] ReadlineError),
}

///
/// Shell
///

struct Shell {
    browse: BrowseSession<SqliteStore>,
    map: Option<MapSession>,
    config: Config,
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(config: &Config) -> Result<(), ShellError> {
    let mut shell = Shell::open(config)?;
    let mut editor = DefaultEditor::new()?;
    println!("{HELP}");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = editor.add_history_entry(line.as_str()) {
                        tracing::debug!(%err, "history entry not recorded");
                    }
                }
                match Command::parse(&line) {
                    Ok(Some(cmd)) => {
                        if let Flow::Quit = shell.dispatch(cmd) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(usage) => eprintln!("{usage}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

impl Shell {
    fn open(config: &Config) -> Result<Self, Error> {
        let store = SqliteStore::open(&config.database_path)?;
        let mut browse = BrowseSession::new(store).with_page_size(config.page_size_nonzero()?);
        if config.debug {
            browse = browse.debug();
        }

        // the map is optional; browsing works without a catalogue
        let map = match GeometryCatalogue::load(&config.geometry_path) {
            Ok(catalogue) => {
                tracing::info!(regions = catalogue.len(), "geometry catalogue loaded");
                let map = MapSession::new(catalogue);
                Some(if config.debug { map.debug() } else { map })
            }
            Err(err) => {
                tracing::warn!(%err, "geometry catalogue unavailable; map commands disabled");
                None
            }
        };

        Ok(Self {
            browse,
            map,
            config: config.clone(),
        })
    }

    fn dispatch(&mut self, cmd: Command) -> Flow {
        let result = match cmd {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Jids => self.browse.list_jids().map(|jids| {
                for jid in jids {
                    println!("{jid}");
                }
            }),
            Command::Search(jid) => self.search(&jid),
            Command::Page(n) => self.browse.show_page(n).map(print_page),
            Command::First => self.browse.first_page().map(print_page),
            Command::Last => self.browse.last_page().map(print_page),
            Command::Next => self.browse.next_page().map(print_page),
            Command::Previous => self.browse.previous_page().map(print_page),
            Command::Open(row) => self.open_row(row),
            Command::Year(label) => self.select_year(&label),
            Command::Export(path) => self.with_map(|map| {
                map.export(&GeoJsonExporter::to_file(&path))
                    .map(|_| println!("wrote {}", path.display()))
            }),
            Command::Metrics => print_metrics(),
        };

        if let Err(err) = result {
            eprintln!("{}", err.user_message());
        }

        Flow::Continue
    }

    fn search(&mut self, jid: &str) -> Result<(), Error> {
        let outcome = self.browse.search_by_jid(jid)?;
        if outcome.is_empty() {
            println!("No data match the query!");
        } else {
            println!(
                "{} rows in {} pages for {}",
                outcome.total_rows, outcome.page_count, outcome.jid
            );
        }

        self.browse.current_page().map(print_page)
    }

    fn open_row(&self, row: usize) -> Result<(), Error> {
        // rows are shown 1-based
        let jid = match row.checked_sub(1) {
            Some(idx) => self.browse.jid_at(idx)?,
            None => None,
        };

        match jid {
            Some(jid) => {
                println!("{jid}");
                println!("{}", graph_line(&self.config.graph_image_path(&jid)));
            }
            None => println!("row {row} is not on this page"),
        }

        Ok(())
    }

    fn select_year(&mut self, label: &str) -> Result<(), Error> {
        let Self { browse, map, .. } = self;

        match map {
            Some(map) => map.select_year_label(browse.store(), label).map(print_table),
            None => Err(no_catalogue()),
        }
    }

    fn with_map<T>(&self, f: impl FnOnce(&MapSession) -> Result<T, Error>) -> Result<T, Error> {
        self.map.as_ref().map_or_else(|| Err(no_catalogue()), f)
    }
}

fn no_catalogue() -> Error {
    Error::new(
        verdictmap::error::ErrorKind::Catalogue,
        verdictmap::error::ErrorOrigin::Catalogue,
        "no geometry catalogue is loaded",
    )
}

fn print_page(view: PageView<'_>) {
    let state = view.state;
    println!(
        "page {} of {} ({} rows)",
        state.current(),
        state.page_count(),
        state.total_rows()
    );
    println!("  # | {}", view.columns.names().join(" | "));

    for (offset, row) in view.rows().iter().enumerate() {
        let cells: Vec<String> = row
            .values()
            .iter()
            .map(|v| cell(&v.to_string()))
            .collect();
        println!("{:>3} | {}", offset + 1, cells.join(" | "));
    }
}

fn print_table(table: &RegionTable) {
    println!(
        "year {}: {} of {} regions have counts",
        table.year, table.summary.matched, table.summary.geometries
    );
    for record in &table.records {
        match record.count {
            Some(count) => println!("  {:<8} {count}", record.region_name),
            None => println!("  {:<8} -", record.region_name),
        }
    }
    if !table.summary.dropped_aggregates.is_empty() {
        println!(
            "  not on the map: {}",
            table.summary.dropped_aggregates.join(", ")
        );
    }
}

fn graph_line(path: &Path) -> String {
    if path.is_file() {
        format!("knowledge graph: {}", path.display())
    } else {
        format!("knowledge graph: {} (not found)", path.display())
    }
}

fn print_metrics() -> Result<(), Error> {
    let report = serde_json::to_string_pretty(&metrics_report())?;
    println!("{report}");

    Ok(())
}

fn cell(text: &str) -> String {
    if text.chars().count() > CELL_WIDTH {
        let cut: String = text.chars().take(CELL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        text.to_string()
    }
}
