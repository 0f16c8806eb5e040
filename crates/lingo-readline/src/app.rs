use std::sync::Arc;

use colored::Colorize;
use lingo_application::pronunciation::{
    AttemptOutcome, Difficulty, PronunciationPractice, SimulatedMicrophone,
};
use lingo_application::translation::{TranslationDesk, TranslationProvider, language};
use lingo_application::{
    DialogueFeed, DisplayEnvironment, HeadlessDisplay, RenderedTurn, SceneSessionController,
    SessionOptions, WordReviewPanel,
};
use lingo_core::config::LingoConfig;
use lingo_core::scene::SceneCatalog;
use lingo_core::session::{NoticeLevel, Sender, SessionEvent};
use lingo_core::{LingoError, Result};
use tokio::sync::broadcast::error::RecvError;

use crate::command::Command;

/// A scene the learner is currently in, with its views.
struct ActiveScene {
    scene_id: String,
    controller: SceneSessionController,
    feed: DialogueFeed,
    review: WordReviewPanel,
}

/// REPL state: at most one active scene plus the standalone tools.
pub struct App {
    config: LingoConfig,
    display: Arc<HeadlessDisplay>,
    scene: Option<ActiveScene>,
    desk: TranslationDesk,
    practice: PronunciationPractice,
}

/// What the main loop should do after a command.
pub enum Flow {
    Continue,
    Quit,
}

impl App {
    pub fn new(config: LingoConfig, translator: Arc<dyn TranslationProvider>) -> Self {
        let practice = PronunciationPractice::new(
            Arc::new(SimulatedMicrophone::new()),
            config.timing.clone(),
            config.reply_seed,
        );
        Self {
            config,
            display: Arc::new(HeadlessDisplay::new()),
            scene: None,
            desk: TranslationDesk::new(translator),
            practice,
        }
    }

    pub fn prompt(&self) -> String {
        if self.practice.is_active() {
            return "practice>> ".to_string();
        }
        match &self.scene {
            Some(active) => format!("{}>> ", active.scene_id),
            None => ">> ".to_string(),
        }
    }

    pub async fn handle(&mut self, command: Command) -> Flow {
        match self.dispatch(command).await {
            Ok(flow) => flow,
            Err(e) => {
                print_error(&e);
                Flow::Continue
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Quit => {
                self.leave_scene().await;
                self.practice.exit();
                return Ok(Flow::Quit);
            }
            Command::Help => print_help(),
            Command::Invalid(message) => println!("{}", message.yellow()),
            Command::ListScenes => list_scenes(),
            Command::EnterScene(id) => self.enter_scene(&id).await,
            Command::LeaveScene => {
                if self.leave_scene().await {
                    println!("{}", "Back to the scene list.".bright_black());
                }
            }
            Command::Translate(text) => {
                self.desk.set_source_text(text);
                match self.desk.translate().await? {
                    Some(record) => println!(
                        "{} {}",
                        format!("[{}→{}]", record.source_lang, record.target_lang).bright_black(),
                        record.target_text.bright_blue()
                    ),
                    None => println!("{}", "请输入要翻译的文本".yellow()),
                }
            }
            Command::SetLanguages { source, target } => {
                self.desk.set_source_lang(&source)?;
                self.desk.set_target_lang(&target)?;
                print_languages(&self.desk);
            }
            Command::SwapLanguages => {
                self.desk.swap_languages();
                print_languages(&self.desk);
            }
            Command::TranslationHistory => {
                for record in self.desk.history() {
                    let star = if self.desk.is_favorite(record.id) { "★" } else { " " };
                    println!(
                        "{} #{} {} → {}",
                        star.yellow(),
                        record.id,
                        record.source_text,
                        record.target_text.bright_blue()
                    );
                }
            }
            Command::ToggleFavorite(id) => {
                if self.desk.toggle_favorite(id)? {
                    println!("{}", "已添加到收藏".green());
                } else {
                    println!("{}", "已取消收藏".bright_black());
                }
            }
            Command::ClearTranslationHistory => {
                self.desk.clear_history();
                println!("{}", "历史记录已清空".green());
            }
            Command::LoadTranslation(id) => {
                self.desk.load_from_history(id)?;
                print_languages(&self.desk);
                println!("{}", self.desk.source_text());
                println!("{}", self.desk.translated_text().bright_blue());
            }
            Command::StartPractice(filter) => self.start_practice(filter).await?,
            Command::RecordAttempt => self.record_attempt().await?,
            Command::StopPractice => {
                self.practice.exit();
                println!("{}", "Practice stopped, microphone closed.".bright_black());
            }
            scene_command => self.dispatch_scene(scene_command).await?,
        }
        Ok(Flow::Continue)
    }

    /// Commands that need an active scene.
    async fn dispatch_scene(&mut self, command: Command) -> Result<()> {
        let Some(active) = self.scene.as_mut() else {
            println!("{}", "Enter a scene first (/scenes, /enter <id>).".yellow());
            return Ok(());
        };

        match command {
            Command::ListRoles => {
                let state = active.controller.snapshot().await;
                for character in &state.scene.characters {
                    println!(
                        "  {} {} ({}) - {}",
                        character.avatar,
                        character.name.bold(),
                        character.id,
                        character.description.bright_black()
                    );
                }
            }
            Command::SelectRole(role) => {
                if active.controller.select_role(&role).await {
                    print_turns(&active.feed.render().await?);
                } else {
                    println!("{}", format!("No role '{role}' in this scene.").yellow());
                }
            }
            Command::Say(text) => {
                active.feed.set_input(text);
                if let Some(hint) = active.feed.typo_hint() {
                    println!("{}", hint.to_string().yellow());
                }
                send_pending(active).await?;
            }
            Command::SendPending => send_pending(active).await?,
            Command::ShowDialogue => print_turns(&active.feed.render().await?),
            Command::ListPhrases => {
                for (i, phrase) in active.feed.quick_phrases().await?.iter().enumerate() {
                    println!("  {}. {}", i + 1, phrase);
                }
            }
            Command::PickPhrase(index) => {
                let phrases = active.feed.quick_phrases().await?;
                match phrases.get(index) {
                    Some(phrase) => {
                        active.feed.pick_quick_phrase(phrase);
                        println!("{} {}", "Ready to send (/send):".bright_black(), phrase);
                    }
                    None => println!("{}", "No such phrase.".yellow()),
                }
            }
            Command::SetBilingual(enabled) => active.feed.set_bilingual_mode(enabled).await?,
            Command::SetWordPanel(visible) => {
                active.controller.set_show_word_panel(visible).await;
            }
            Command::ToggleImmersive => {
                active.controller.toggle_immersive_mode().await;
            }
            Command::ExternalEscape => self.display.simulate_external_exit(),
            Command::ShowCard => print_card(&active.review),
            Command::NextCard => {
                active.review.next();
                print_card(&active.review);
            }
            Command::PreviousCard => {
                active.review.previous();
                print_card(&active.review);
            }
            Command::Reveal => {
                active.review.toggle_reveal();
                print_card(&active.review);
            }
            Command::ToggleMastered => {
                if active.review.toggle_current_mastered().is_some() {
                    print_card(&active.review);
                }
            }
            Command::SetReviewMode(mode) => {
                active.review.set_mode(mode);
                if !mode.is_available() {
                    println!("{}", format!("{}模式即将推出", mode.label()).yellow());
                }
            }
            Command::ShowProgress => println!(
                "{}/{} mastered ({}%)",
                active.review.mastered_count(),
                active.review.words().len(),
                active.review.progress_percentage()
            ),
            other => {
                return Err(LingoError::internal(format!(
                    "Command not routed: {other:?}"
                )));
            }
        }
        Ok(())
    }

    async fn enter_scene(&mut self, scene_id: &str) {
        self.leave_scene().await;

        println!("{}", "Loading scene...".bright_black());
        let options = SessionOptions::from_config(&self.config, self.display.clone());
        let controller = match SceneSessionController::load_scene(scene_id, options).await {
            Ok(controller) => controller,
            Err(e) => {
                // Redirect-and-notify: stay on the scene list.
                print_error(&e);
                list_scenes();
                return;
            }
        };

        let context = controller.context();
        let (feed, review) = match (
            DialogueFeed::attach(context.clone()),
            WordReviewPanel::attach(&context).await,
        ) {
            (Ok(feed), Ok(review)) => (feed, review),
            (Err(e), _) | (_, Err(e)) => {
                print_error(&e);
                return;
            }
        };

        spawn_event_printer(&controller);
        let state = controller.snapshot().await;
        println!(
            "{} {}",
            state.scene.title.bright_magenta().bold(),
            format!("[{}]", state.scene.level).bright_black()
        );
        println!("{}", state.scene.description.bright_black());
        println!("{}", "Pick a role with /role <id> (see /roles).".bright_black());

        self.scene = Some(ActiveScene {
            scene_id: state.scene.id.clone(),
            controller,
            feed,
            review,
        });
    }

    /// Drops the active scene, cancelling its pending replies.
    async fn leave_scene(&mut self) -> bool {
        if self.display.is_fullscreen() {
            if let Err(e) = self.display.exit_fullscreen().await {
                tracing::warn!("[App] Failed to leave full screen: {}", e);
            }
        }
        self.scene.take().is_some()
    }

    async fn start_practice(&mut self, filter: Option<Difficulty>) -> Result<()> {
        self.practice.start(filter).await?;
        println!(
            "{}",
            format!(
                "{} words. Use /record for each word, /stop to quit.",
                self.practice.words().len()
            )
            .bright_black()
        );
        self.print_practice_word();
        Ok(())
    }

    async fn record_attempt(&mut self) -> Result<()> {
        println!("{}", "Recording...".bright_black());
        match self.practice.record_attempt().await? {
            AttemptOutcome::Advanced { score, .. } => {
                print_score(score);
                self.print_practice_word();
            }
            AttemptOutcome::Finished { score, stats } => {
                print_score(score);
                println!(
                    "{}",
                    format!("练习完成！你的平均分为：{}分", stats.average_score).green()
                );
                let history = self.practice.history();
                println!(
                    "{}",
                    format!(
                        "Days: {}  Words: {}  Average: {}  Best: {}",
                        history.days().len(),
                        history.total_words(),
                        history.average_score(),
                        history.highest_score()
                    )
                    .bright_black()
                );
            }
        }
        Ok(())
    }

    fn print_practice_word(&self) {
        if let Some(word) = self.practice.current_word() {
            println!(
                "{} {}",
                word.word.bold(),
                format!("({})", word.difficulty.label()).bright_black()
            );
        }
    }
}

async fn send_pending(active: &mut ActiveScene) -> Result<()> {
    if active.feed.submit().await?.is_none() && !active.feed.input().trim().is_empty() {
        println!("{}", "Pick a role before speaking (/roles).".yellow());
    }
    Ok(())
}

/// Prints partner replies and notices as they arrive.
fn spawn_event_printer(controller: &SceneSessionController) {
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::TurnAppended { turn }) if turn.sender == Sender::Ai => {
                    println!("\n{}", turn.text.bright_blue());
                    if let Some(translation) = turn.translation {
                        println!("{}", translation.bright_black());
                    }
                }
                Ok(SessionEvent::ImmersiveChanged { enabled }) => {
                    let label = if enabled { "Immersive mode on" } else { "Immersive mode off" };
                    println!("\n{}", label.bright_magenta());
                }
                Ok(SessionEvent::Notice { level, message }) => print_notice(level, &message),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn list_scenes() {
    for scene in SceneCatalog::builtin().scenes() {
        println!(
            "  {:<12} {} {}",
            scene.id.bold(),
            scene.title,
            format!("[{}]", scene.level).bright_black()
        );
    }
}

fn print_turns(turns: &[RenderedTurn]) {
    for turn in turns {
        let header = format!("{} {}", turn.avatar, turn.speaker);
        match turn.sender {
            Sender::User => {
                println!("{}", header.green());
                println!("{}", turn.text.green());
            }
            Sender::Ai => {
                println!("{}", header.bright_magenta());
                println!("{}", turn.text.bright_blue());
            }
        }
        if let Some(translation) = &turn.translation {
            println!("{}", translation.bright_black());
        }
        println!();
    }
}

fn print_card(review: &WordReviewPanel) {
    let Some(word) = review.current() else {
        println!("{}", "No words in this scene.".bright_black());
        return;
    };
    let mark = if review.is_mastered(word.id) { "✓" } else { " " };
    println!(
        "{} {}/{}  {} {}",
        mark.green(),
        review.index() + 1,
        review.words().len(),
        word.word.bold(),
        word.pronunciation.bright_black()
    );
    if review.is_revealed() {
        println!("  {}", word.meaning.bright_blue());
        println!("  {}", word.example.bright_black());
    }
}

fn print_languages(desk: &TranslationDesk) {
    let name = |id: &str| language(id).map(|l| format!("{} {}", l.flag, l.name));
    println!(
        "{} → {}",
        name(desk.source_lang()).unwrap_or_default(),
        name(desk.target_lang()).unwrap_or_default()
    );
}

fn print_score(score: u32) {
    let text = format!("Score: {score}");
    if score >= 80 {
        println!("{}", text.green());
    } else {
        println!("{}", text.yellow());
    }
}

fn print_notice(level: NoticeLevel, message: &str) {
    match level {
        NoticeLevel::Info => println!("\n{}", message.bright_black()),
        NoticeLevel::Success => println!("\n{}", message.green()),
        NoticeLevel::Warning => println!("\n{}", message.yellow()),
        NoticeLevel::Error => println!("\n{}", message.red()),
    }
}

fn print_error(error: &LingoError) {
    eprintln!("{}", format!("Error: {error}").red());
}

fn print_help() {
    let lines = [
        ("/scenes, /enter <id>, /leave", "browse and enter scenes"),
        ("/roles, /role <id>", "pick your role"),
        ("<text>, /phrases, /phrase <n>, /send", "talk"),
        ("/dialogue, /bilingual on|off", "review the conversation"),
        ("/immersive, /escape, /wordpanel on|off", "display"),
        ("/card, /next, /prev, /reveal, /master", "word review"),
        ("/mode <m>, /progress", "review mode and progress"),
        ("/translate <text>, /langs <s> <t>, /swap", "translation"),
        ("/thistory, /fav <id>, /load <id>, /tclear", "translation history"),
        ("/practice [level], /record, /stop", "pronunciation practice"),
        ("quit", "exit"),
    ];
    for (usage, what) in lines {
        println!("  {:<44} {}", usage.bright_cyan(), what.bright_black());
    }
}
