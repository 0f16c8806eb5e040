use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::BTreeSet;

use colored::Colorize;
use lingo_application::translation::LANGUAGES;
use lingo_core::scene::SceneCatalog;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::COMMANDS;

/// rustyline helper: completes slash commands and their arguments
/// (scene ids, role ids, languages, modes).
#[derive(Clone, Default)]
pub struct CliHelper;

impl Helper for CliHelper {}

/// Values accepted by a command's argument, or `None` for free text.
fn argument_values(command: &str) -> Option<Vec<String>> {
    let catalog = SceneCatalog::builtin();
    let values = match command {
        "/enter" => catalog.scenes().iter().map(|s| s.id.clone()).collect(),
        "/role" => catalog
            .scenes()
            .iter()
            .flat_map(|s| s.characters.iter().map(|c| c.id.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        "/langs" => LANGUAGES.iter().map(|l| l.id.to_string()).collect(),
        "/mode" => to_strings(&["flashcard", "quiz", "spelling"]),
        "/practice" => to_strings(&["all", "easy", "medium", "hard"]),
        "/bilingual" | "/wordpanel" => to_strings(&["on", "off"]),
        _ => return None,
    };
    Some(values)
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Completion candidates for `line` (already cut at the cursor), with the
/// byte offset the candidates replace from.
fn candidates(line: &str) -> (usize, Vec<String>) {
    if !line.starts_with('/') {
        return (0, Vec::new());
    }

    let Some((command, rest)) = line.split_once(' ') else {
        let names = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| cmd.to_string())
            .collect();
        return (0, names);
    };

    // Only the last word is completed; `/langs` takes two.
    let start = line.rfind(' ').map_or(0, |i| i + 1);
    let word = &line[start..];
    let words_before = rest[..rest.len() - word.len()].split_whitespace().count();
    let max_words = if command == "/langs" { 2 } else { 1 };
    if words_before >= max_words {
        return (start, Vec::new());
    }

    let values = argument_values(command)
        .unwrap_or_default()
        .into_iter()
        .filter(|v| v.starts_with(word))
        .collect();
    (start, values)
}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, values) = candidates(&line[..pos]);
        let pairs = values
            .into_iter()
            .map(|value| Pair {
                display: value.clone(),
                replacement: value,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_once(' ') {
            Some((command, rest)) if line.starts_with('/') => {
                Owned(format!("{} {}", command.bright_cyan(), rest.bright_white()))
            }
            None if line.starts_with('/') => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, values) = candidates(line);
        let typed = line.len() - start;
        values
            .into_iter()
            .find(|v| v.len() > typed)
            .map(|v| v[typed..].to_string())
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_complete_from_start() {
        let (start, values) = candidates("/pr");
        assert_eq!(start, 0);
        assert_eq!(values, vec!["/prev", "/progress", "/practice"]);
    }

    #[test]
    fn test_scene_ids_complete_after_enter() {
        let (start, values) = candidates("/enter ta");
        assert_eq!(start, 7);
        assert_eq!(values, vec!["taxi"]);

        let (_, all) = candidates("/enter ");
        assert_eq!(all.len(), SceneCatalog::builtin().scenes().len());
    }

    #[test]
    fn test_role_ids_are_deduplicated() {
        let (_, values) = candidates("/role ");
        let unique: BTreeSet<_> = values.iter().collect();
        assert_eq!(unique.len(), values.len());
        assert!(values.contains(&"doctor".to_string()));
    }

    #[test]
    fn test_langs_completes_both_arguments_only() {
        assert_eq!(candidates("/langs e").1, vec!["en", "es"]);
        assert_eq!(candidates("/langs en j").1, vec!["ja"]);
        assert!(candidates("/langs en ja f").1.is_empty());
    }

    #[test]
    fn test_free_text_is_not_completed() {
        assert!(candidates("/translate he").1.is_empty());
        assert!(candidates("hello").1.is_empty());
    }
}
