use std::fmt;

use crate::Commands;

mod meta;
pub mod movies;
pub mod news;

/// Who made a cog and which version it is, shown at the bottom of `help`.
#[derive(Debug, Clone, Copy)]
pub struct About {
    pub category: &'static str,
    pub version: &'static str,
    pub author: Option<&'static str>,
}

impl fmt::Display for About {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.category, self.version)?;
        if let Some(author) = self.author {
            write!(f, " by {author}")?;
        }
        Ok(())
    }
}

pub const ABOUTS: [About; 3] = [meta::ABOUT, movies::ABOUT, news::ABOUT];

pub struct Cog {
    pub commands: Commands,
    pub about: About,
}

impl Cog {
    pub fn new(commands: Commands, about: About) -> Self {
        Self { commands, about }
    }
}

// This is a hacky sort of cog framework around poise's commands.
pub fn commands() -> Commands {
    let cogs = [meta::cog(), movies::cog(), news::cog()];

    let mut result = vec![];
    for cog in cogs {
        for command in cog.commands {
            result.push(poise::Command {
                category: Some(cog.about.category.to_string()),
                ..command
            });
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_a_category_and_unique_name() {
        let commands = commands();
        let mut names: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            ["help", "movie", "news", "newssetup", "setapi"]
        );
        assert!(commands.iter().all(|c| c.category.is_some()));
    }

    #[test]
    fn news_group_has_its_subcommands() {
        let commands = commands();
        let news = commands.iter().find(|c| c.name == "news").unwrap();
        let mut subcommands: Vec<_> = news.subcommands.iter().map(|c| c.name.as_str()).collect();
        subcommands.sort_unstable();
        assert_eq!(subcommands, ["countrycodes", "global", "top", "topglobal"]);
    }

    #[test]
    fn about_lines_name_version_and_author() {
        assert_eq!(news::ABOUT.to_string(), "News v0.0.1 by flare#0001");
        assert_eq!(movies::ABOUT.to_string(), "Movies v0.0.1");
    }
}
