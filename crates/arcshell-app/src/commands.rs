use anyhow::{Result, bail};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Address-bar entry: a URL, a bare domain, or search text.
    Open(String),
    /// A new tab on the given input, or on the default URL.
    New(Option<String>),
    /// A link activated inside the current page.
    Click(String),
    Back,
    Forward,
    Reload,
    ZoomIn,
    ZoomOut,
    /// Open `newtab` or an internal page by name.
    Tab(String),
    /// Focus the tab at this index.
    Switch(usize),
    /// Focus the landing tab, opening one if needed.
    Home,
    Close,
    Bookmark,
    Tabs,
    Show,
    Profile(ProfileCommand),
    Help,
    Quit,
}

/// `profile` subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileCommand {
    List,
    Add { name: String, email: Option<String> },
    Switch(String),
    Delete(String),
}

pub const HELP: &str = "\
open <url|text>   navigate the current tab (or search)
new [url|text]    open a new tab (default page without argument)
click <url>       activate a link in the current page
back | forward | reload
zoom in|out
tab <name>        newtab, history, bookmarks, settings, ...
switch <n>        focus tab n (see `tabs`)
home              focus the new-tab page
close             close the current tab
bookmark          bookmark the current web page
tabs              list open tabs
show              print the current page
profile list | add <name> [email] | switch <name> | delete <name>
quit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let needs_arg = |name: &str| -> Result<String> {
        if rest.is_empty() {
            bail!("{name} needs an argument");
        }
        Ok(rest.to_string())
    };

    let cmd = match verb {
        "open" | "o" => Command::Open(needs_arg("open")?),
        "new" => Command::New(Some(rest.to_string()).filter(|r| !r.is_empty())),
        "click" => Command::Click(needs_arg("click")?),
        "back" => Command::Back,
        "forward" => Command::Forward,
        "reload" => Command::Reload,
        "zoom" => match rest {
            "in" | "+" => Command::ZoomIn,
            "out" | "-" => Command::ZoomOut,
            _ => bail!("usage: zoom in|out"),
        },
        "tab" => Command::Tab(needs_arg("tab")?),
        "switch" => match rest.parse() {
            Ok(index) => Command::Switch(index),
            Err(_) => bail!("usage: switch <tab number>"),
        },
        "home" => Command::Home,
        "profile" => Command::Profile(parse_profile(rest)?),
        "close" => Command::Close,
        "bookmark" => Command::Bookmark,
        "tabs" => Command::Tabs,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command: {other}"),
    };
    Ok(Some(cmd))
}

fn parse_profile(args: &str) -> Result<ProfileCommand> {
    let (sub, rest) = match args.split_once(char::is_whitespace) {
        Some((sub, rest)) => (sub, rest.trim()),
        None => (args, ""),
    };
    let name = || -> Result<String> {
        if rest.is_empty() {
            bail!("profile {sub} needs a name");
        }
        Ok(rest.to_string())
    };
    Ok(match sub {
        "" | "list" => ProfileCommand::List,
        "add" => {
            let mut words: Vec<&str> = rest.split_whitespace().collect();
            let has_email = words.len() > 1 && words.last().is_some_and(|w| w.contains('@'));
            let email = if has_email { words.pop() } else { None };
            if words.is_empty() {
                bail!("profile add needs a name");
            }
            ProfileCommand::Add {
                name: words.join(" "),
                email: email.map(str::to_string),
            }
        },
        "switch" => ProfileCommand::Switch(name()?),
        "delete" => ProfileCommand::Delete(name()?),
        other => bail!("unknown profile command: {other}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_none() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn open_keeps_spaces() {
        assert_eq!(
            parse("open rust borrow checker").unwrap(),
            Some(Command::Open("rust borrow checker".into()))
        );
    }

    #[test]
    fn click_takes_url() {
        assert_eq!(
            parse("click internal://clear-history").unwrap(),
            Some(Command::Click("internal://clear-history".into()))
        );
    }

    #[test]
    fn zoom_directions() {
        assert_eq!(parse("zoom in").unwrap(), Some(Command::ZoomIn));
        assert_eq!(parse("zoom out").unwrap(), Some(Command::ZoomOut));
        assert!(parse("zoom sideways").is_err());
    }

    #[test]
    fn new_tab_argument_is_optional() {
        assert_eq!(parse("new").unwrap(), Some(Command::New(None)));
        assert_eq!(
            parse("new example.com").unwrap(),
            Some(Command::New(Some("example.com".into())))
        );
    }

    #[test]
    fn switch_takes_an_index() {
        assert_eq!(parse("switch 2").unwrap(), Some(Command::Switch(2)));
        assert!(parse("switch two").is_err());
        assert!(parse("switch").is_err());
        assert_eq!(parse("home").unwrap(), Some(Command::Home));
    }

    #[test]
    fn profile_subcommands() {
        assert_eq!(parse("profile").unwrap(), Some(Command::Profile(ProfileCommand::List)));
        assert_eq!(
            parse("profile add Work Account work@example.com").unwrap(),
            Some(Command::Profile(ProfileCommand::Add {
                name: "Work Account".into(),
                email: Some("work@example.com".into()),
            }))
        );
        assert_eq!(
            parse("profile add Bob").unwrap(),
            Some(Command::Profile(ProfileCommand::Add {
                name: "Bob".into(),
                email: None,
            }))
        );
        assert_eq!(
            parse("profile switch Work Account").unwrap(),
            Some(Command::Profile(ProfileCommand::Switch("Work Account".into())))
        );
        assert!(parse("profile delete").is_err());
        assert!(parse("profile rename x").is_err());
    }

    #[test]
    fn missing_argument_is_error() {
        assert!(parse("open").is_err());
        assert!(parse("tab").is_err());
    }

    #[test]
    fn unknown_verb_is_error() {
        let err = parse("launch rockets").unwrap_err();
        assert!(err.to_string().contains("launch"));
    }

    #[test]
    fn bare_verbs() {
        for (line, cmd) in [
            ("back", Command::Back),
            ("forward", Command::Forward),
            ("reload", Command::Reload),
            ("close", Command::Close),
            ("bookmark", Command::Bookmark),
            ("tabs", Command::Tabs),
            ("show", Command::Show),
            ("quit", Command::Quit),
        ] {
            assert_eq!(parse(line).unwrap(), Some(cmd));
        }
    }
}
