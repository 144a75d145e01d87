use std::path::PathBuf;

///
/// Command
/// One shell line, parsed.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Jids,
    Search(String),
    Page(usize),
    First,
    Last,
    Next,
    Previous,
    Open(usize),
    Year(String),
    Export(PathBuf),
    Metrics,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  jids              list judgment ids
  search <jid>      load every row of one judgment
  page <n>          show page n
  first | last      jump to the first or last page
  next | prev       move one page
  open <row>        judgment id and graph image of row <row> on this page
  year <107..110>   join that year's counts onto the region map
  export <path>     write the current region map as GeoJSON
  metrics           print session counters
  help              this text
  quit              leave";

impl Command {
    /// Parse one input line. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let cmd = match word.to_ascii_lowercase().as_str() {
            "jids" => Self::Jids,
            "search" => Self::Search(required(rest, "search <jid>")?.to_string()),
            "page" => Self::Page(number(rest, "page <n>")?),
            "first" => Self::First,
            "last" => Self::Last,
            "next" | "n" => Self::Next,
            "prev" | "previous" | "p" => Self::Previous,
            "open" => Self::Open(number(rest, "open <row>")?),
            "year" => Self::Year(required(rest, "year <107..110>")?.to_string()),
            "export" => Self::Export(PathBuf::from(required(rest, "export <path>")?)),
            "metrics" => Self::Metrics,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}'; try 'help'")),
        };

        Ok(Some(cmd))
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn number(rest: &str, usage: &str) -> Result<usize, String> {
    required(rest, usage)?
        .parse()
        .map_err(|_| format!("usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_no_command() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn search_keeps_the_whole_jid() {
        assert_eq!(
            Command::parse("search  110,台上,1 "),
            Ok(Some(Command::Search("110,台上,1".to_string())))
        );
    }

    #[test]
    fn navigation_words_and_aliases() {
        assert_eq!(Command::parse("NEXT"), Ok(Some(Command::Next)));
        assert_eq!(Command::parse("p"), Ok(Some(Command::Previous)));
        assert_eq!(Command::parse("page 3"), Ok(Some(Command::Page(3))));
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn bad_arguments_report_usage() {
        assert_eq!(Command::parse("page x"), Err("usage: page <n>".to_string()));
        assert_eq!(
            Command::parse("search"),
            Err("usage: search <jid>".to_string())
        );
        assert!(Command::parse("frobnicate").is_err());
    }
}
