//! REPL command parsing.

use lingo_application::ReviewMode;
use lingo_application::pronunciation::Difficulty;

/// Every slash command, used for completion and hints.
pub const COMMANDS: &[&str] = &[
    "/help",
    "/scenes",
    "/enter",
    "/leave",
    "/roles",
    "/role",
    "/dialogue",
    "/phrases",
    "/phrase",
    "/send",
    "/bilingual",
    "/wordpanel",
    "/immersive",
    "/escape",
    "/card",
    "/next",
    "/prev",
    "/reveal",
    "/master",
    "/mode",
    "/progress",
    "/translate",
    "/langs",
    "/swap",
    "/thistory",
    "/tclear",
    "/fav",
    "/load",
    "/practice",
    "/record",
    "/stop",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    ListScenes,
    EnterScene(String),
    LeaveScene,
    ListRoles,
    SelectRole(String),
    ShowDialogue,
    ListPhrases,
    PickPhrase(usize),
    SendPending,
    SetBilingual(bool),
    SetWordPanel(bool),
    ToggleImmersive,
    ExternalEscape,
    ShowCard,
    NextCard,
    PreviousCard,
    Reveal,
    ToggleMastered,
    SetReviewMode(ReviewMode),
    ShowProgress,
    Translate(String),
    SetLanguages { source: String, target: String },
    SwapLanguages,
    TranslationHistory,
    ClearTranslationHistory,
    ToggleFavorite(u64),
    LoadTranslation(u64),
    StartPractice(Option<Difficulty>),
    RecordAttempt,
    StopPractice,
    /// Plain text typed into the dialogue.
    Say(String),
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Command::Quit;
    }
    if !line.starts_with('/') {
        return Command::Say(line.to_string());
    }

    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match name {
        "/help" => Command::Help,
        "/scenes" => Command::ListScenes,
        "/enter" => require_arg(rest, "/enter <scene-id>", |id| Command::EnterScene(id.to_string())),
        "/leave" => Command::LeaveScene,
        "/roles" => Command::ListRoles,
        "/role" => require_arg(rest, "/role <role-id>", |id| Command::SelectRole(id.to_string())),
        "/dialogue" => Command::ShowDialogue,
        "/phrases" => Command::ListPhrases,
        "/phrase" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::PickPhrase(n - 1),
            _ => Command::Invalid("Usage: /phrase <number>".to_string()),
        },
        "/send" => Command::SendPending,
        "/bilingual" => parse_switch(rest, "/bilingual on|off", Command::SetBilingual),
        "/wordpanel" => parse_switch(rest, "/wordpanel on|off", Command::SetWordPanel),
        "/immersive" => Command::ToggleImmersive,
        "/escape" => Command::ExternalEscape,
        "/card" => Command::ShowCard,
        "/next" => Command::NextCard,
        "/prev" => Command::PreviousCard,
        "/reveal" => Command::Reveal,
        "/master" => Command::ToggleMastered,
        "/mode" => match rest {
            "flashcard" => Command::SetReviewMode(ReviewMode::Flashcard),
            "quiz" => Command::SetReviewMode(ReviewMode::Quiz),
            "spelling" => Command::SetReviewMode(ReviewMode::Spelling),
            _ => Command::Invalid("Usage: /mode flashcard|quiz|spelling".to_string()),
        },
        "/progress" => Command::ShowProgress,
        "/translate" => require_arg(rest, "/translate <text>", |text| {
            Command::Translate(text.to_string())
        }),
        "/langs" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [source, target] => Command::SetLanguages {
                source: source.to_string(),
                target: target.to_string(),
            },
            _ => Command::Invalid("Usage: /langs <source> <target>".to_string()),
        },
        "/swap" => Command::SwapLanguages,
        "/thistory" => Command::TranslationHistory,
        "/tclear" => Command::ClearTranslationHistory,
        "/fav" => parse_id(rest, "/fav <id>", Command::ToggleFavorite),
        "/load" => parse_id(rest, "/load <id>", Command::LoadTranslation),
        "/practice" => match rest {
            "" | "all" => Command::StartPractice(None),
            "easy" => Command::StartPractice(Some(Difficulty::Easy)),
            "medium" => Command::StartPractice(Some(Difficulty::Medium)),
            "hard" => Command::StartPractice(Some(Difficulty::Hard)),
            _ => Command::Invalid("Usage: /practice [all|easy|medium|hard]".to_string()),
        },
        "/record" => Command::RecordAttempt,
        "/stop" => Command::StopPractice,
        other => Command::Invalid(format!("Unknown command: {other}")),
    }
}

fn require_arg(rest: &str, usage: &str, build: impl FnOnce(&str) -> Command) -> Command {
    if rest.is_empty() {
        Command::Invalid(format!("Usage: {usage}"))
    } else {
        build(rest)
    }
}

fn parse_switch(rest: &str, usage: &str, build: impl FnOnce(bool) -> Command) -> Command {
    match rest {
        "on" => build(true),
        "off" => build(false),
        _ => Command::Invalid(format!("Usage: {usage}")),
    }
}

fn parse_id(rest: &str, usage: &str, build: impl FnOnce(u64) -> Command) -> Command {
    rest.parse()
        .map(build)
        .unwrap_or_else(|_| Command::Invalid(format!("Usage: {usage}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_dialogue() {
        assert_eq!(parse("  Hi there "), Command::Say("Hi there".to_string()));
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(parse("/enter taxi"), Command::EnterScene("taxi".to_string()));
        assert_eq!(parse("/phrase 2"), Command::PickPhrase(1));
        assert_eq!(parse("/bilingual off"), Command::SetBilingual(false));
        assert_eq!(
            parse("/langs en ja"),
            Command::SetLanguages {
                source: "en".to_string(),
                target: "ja".to_string()
            }
        );
        assert_eq!(
            parse("/translate Good night!"),
            Command::Translate("Good night!".to_string())
        );
        assert_eq!(parse("/tclear"), Command::ClearTranslationHistory);
        assert_eq!(
            parse("/practice hard"),
            Command::StartPractice(Some(Difficulty::Hard))
        );
    }

    #[test]
    fn test_bad_arguments_are_reported() {
        assert!(matches!(parse("/enter"), Command::Invalid(_)));
        assert!(matches!(parse("/phrase 0"), Command::Invalid(_)));
        assert!(matches!(parse("/fav abc"), Command::Invalid(_)));
        assert!(matches!(parse("/bilingual maybe"), Command::Invalid(_)));
        assert!(matches!(parse("/dance"), Command::Invalid(_)));
    }

    #[test]
    fn test_every_listed_command_parses() {
        for name in COMMANDS {
            let parsed = parse(name);
            if let Command::Invalid(message) = parsed {
                assert!(message.starts_with("Usage"), "{name}: {message}");
            }
        }
    }
}
