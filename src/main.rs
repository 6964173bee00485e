//! TyporaX CLI
//!
//! Terminal front end for the practice backend:
//! - Browse folders and lessons
//! - Spaced-repetition review and sentence mastery
//! - Vocabulary and fill-in-the-blank drills
//! - Lesson tests and their history

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use typorax::assessment::export::export_file_name;
use typorax::assessment::export_to_file;
use typorax::client::{
    LessonTests, PracticeBackend, PracticeSession, SaveStatus, TyporaClient, WordbankSession,
};
use typorax::config::{generate_default_config, Config};
use typorax::practice::table::{highlight_keywords, parse_pasted_table};
use typorax::practice::{BlankOutcome, PracticeMode, Rating, SubmitOutcome};
use typorax::preferences::{AddFlashcard, Flashcard, PreferenceStore};

#[derive(Parser)]
#[command(name = "typorax")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Practice sentences, vocabulary and lesson tests from your TyporaX notes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List folders
    Folders,

    /// List lessons in a folder
    Files {
        #[arg(short, long)]
        folder: String,
    },

    /// Show mastery and review status of a lesson
    Status {
        #[arg(short, long)]
        folder: String,
        #[arg(short = 'x', long)]
        file: String,
    },

    /// Spaced-repetition review of the due sentences
    Review {
        #[arg(short, long)]
        folder: String,
        #[arg(short = 'x', long)]
        file: String,
    },

    /// Walk the sentences of a lesson, fill in their blanks, or quiz them in reverse
    Sentences {
        #[arg(short, long)]
        folder: String,
        #[arg(short = 'x', long)]
        file: String,
        /// Show the translation and type the original
        #[arg(long, conflicts_with = "blanks")]
        reverse: bool,
        /// Hide one or two words of each sentence
        #[arg(long)]
        blanks: bool,
    },

    /// Type the words of the wordbank
    Vocab {
        /// Practice your logged typos instead
        #[arg(long)]
        personalized: bool,
        /// Word to resume from
        #[arg(long, default_value = "0")]
        resume: usize,
    },

    /// Fill-in-the-blank drill from the wordbank examples
    FillBlanks,

    /// Take a test on a lesson
    Test {
        #[arg(short, long)]
        folder: String,
        #[arg(short = 'x', long)]
        file: String,
    },

    /// Show the test history of a lesson
    History {
        #[arg(short, long)]
        folder: String,
        #[arg(short = 'x', long)]
        file: String,
        /// Export the history as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Clear all practice progress of a lesson
    Reset {
        #[arg(short, long)]
        folder: String,
        #[arg(short = 'x', long)]
        file: String,
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Manage flashcards
    Flashcards {
        #[command(subcommand)]
        action: Option<FlashcardAction>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum FlashcardAction {
    /// List saved flashcards
    List,
    /// Save a lesson sentence as a flashcard
    Add {
        #[arg(short, long)]
        folder: String,
        #[arg(short = 'x', long)]
        file: String,
        /// Sentence number, starting at 1
        #[arg(short, long)]
        number: usize,
    },
    /// Add every row of a pasted markdown table
    Import {
        /// File holding the table, header and separator first
        path: PathBuf,
    },
    /// Write all flashcards to a JSON file
    Export { path: PathBuf },
}

/// Line-based input from the terminal
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and read one line; `None` at end of input
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        eprint!("{}", label);
        Ok(self.lines.next_line().await?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_default();
    if let Some(url) = cli.url {
        config.client.base_url = url;
    }
    typorax::logging::init(&config.logging, "");

    let client = TyporaClient::new(config.client_config())?;

    match cli.command {
        Commands::Folders => {
            let folders = client.list_folders().await.context(unreachable_hint(&config))?;
            if folders.is_empty() {
                println!("No folders yet.");
            }
            for folder in folders {
                println!("{}", folder);
            }
        }

        Commands::Files { folder } => {
            for file in client.list_files(&folder).await? {
                println!("{}", file);
            }
        }

        Commands::Status { folder, file } => {
            let session = open_session(&client, &config, &folder, &file).await?;
            let summary = session.summary();
            let now = Utc::now();

            println!("{}/{}", folder, file);
            println!();
            println!("  Sentences:  {}", session.sentences().len());
            println!(
                "  Mastered:   {}/{} ({}%, {:?})",
                summary.mastered, summary.total, summary.percentage, summary.tier
            );
            println!("  Due:        {}", session.review_queue(now).len());
            if let Some(level) = session.level() {
                println!("  Level:      {}", level);
            }
            if !session.keywords().is_empty() {
                println!("  Keywords:   {}", session.keywords().join(", "));
            }
            if summary.complete {
                println!();
                println!("Every sentence is mastered in every mode.");
            }
        }

        Commands::Review { folder, file } => {
            let mut session = open_session(&client, &config, &folder, &file).await?;
            let mut prompt = Prompt::new();
            let queue = session.review_queue(Utc::now());

            if queue.is_empty() {
                println!("Nothing to review. Come back later.");
                return Ok(());
            }

            for (position, index) in queue.iter().copied().enumerate() {
                let pair = session.sentences()[index].clone();
                println!();
                println!("[{}/{}] {}", position + 1, queue.len(), pair.target_lang);
                if prompt.ask("  Enter to show the translation ").await?.is_none() {
                    break;
                }
                println!("  {}", pair.native_lang);

                let rating = loop {
                    let Some(answer) = prompt.ask("  Rate (h)ard, (m)edium, (e)asy, q to stop: ").await? else {
                        break None;
                    };
                    if answer.trim() == "q" {
                        break None;
                    }
                    match answer.parse::<Rating>() {
                        Ok(rating) => break Some(rating),
                        Err(e) => eprintln!("  {}", e),
                    }
                };
                let Some(rating) = rating else { break };

                match session.rate(index, rating, Utc::now()).await {
                    Ok(level) => println!("  Level {}", level),
                    Err(e) => eprintln!("  Failed to save progress: {}", e),
                }
            }

            print_stats(&session);
        }

        Commands::Sentences {
            folder,
            file,
            reverse,
            blanks,
        } => {
            let mut session = open_session(&client, &config, &folder, &file).await?;
            let mut prompt = Prompt::new();
            let mut rng = rand::thread_rng();
            let total = session.sentences().len();

            for index in 0..total {
                let pair = session.sentences()[index].clone();
                println!();

                if reverse {
                    let badge = mastered_badge(&session, PracticeMode::Reverse, index);
                    println!("[{}/{}] {}{}", index + 1, total, pair.native_lang, badge);
                    let Some(answer) = prompt.ask("  Type the original, Enter to skip, q to stop: ").await? else {
                        break;
                    };
                    match answer.trim() {
                        "q" => break,
                        "" => {
                            println!("  {}", pair.target_lang);
                            continue;
                        }
                        _ => {}
                    }

                    match session.check_reverse_answer(index, &answer).await {
                        Ok(check) if check.correct => {
                            println!("  Correct!");
                            if check.progress.is_some_and(|p| p.newly_mastered) {
                                println!("  Mastered");
                            }
                        }
                        Ok(check) => println!("  Try again or check the answer: {}", check.expected),
                        Err(e) => eprintln!("  Failed to save progress: {}", e),
                    }
                } else if blanks {
                    let blanked = session.blank_sentence(index, &mut rng)?;
                    let badge = mastered_badge(&session, PracticeMode::Blank, index);
                    println!("[{}/{}] {}{}", index + 1, total, blanked.text, badge);
                    println!("      {}", pair.native_lang);
                    if !blanked.has_blanks() {
                        continue;
                    }

                    let Some(answer) = prompt
                        .ask("  Missing words, Enter to reveal, q to stop: ")
                        .await?
                    else {
                        break;
                    };
                    match answer.trim() {
                        "q" => break,
                        "" => {
                            println!("  {}", blanked.original);
                            continue;
                        }
                        _ => {}
                    }

                    if !session.check_blanks(&blanked, &answer) {
                        println!("  Not quite: {}", blanked.original);
                        continue;
                    }
                    println!("  Correct!");
                    if session.record().is_mastered(PracticeMode::Blank, index) {
                        continue;
                    }
                    let Some(answer) = prompt.ask("  (m)ark mastered, Enter next: ").await? else {
                        break;
                    };
                    if answer.trim() == "m" {
                        if let Err(e) = session.mark_mastered(PracticeMode::Blank, index).await {
                            eprintln!("  Failed to save progress: {}", e);
                        }
                    }
                } else {
                    let highlighted =
                        highlight_keywords(&pair.target_lang, session.keywords(), |k| format!("[{}]", k));
                    let badge = mastered_badge(&session, PracticeMode::Sentence, index);
                    println!("[{}/{}] {}{}", index + 1, total, highlighted, badge);
                    println!("      {}", pair.native_lang);

                    let Some(answer) = prompt
                        .ask("  (m)astered, (f)lashcard, Enter next, q to stop: ")
                        .await?
                    else {
                        break;
                    };
                    match answer.trim() {
                        "q" => break,
                        "m" => {}
                        "f" => {
                            add_flashcard(&folder, &file, &pair)?;
                            continue;
                        }
                        _ => continue,
                    }
                    if let Err(e) = session.mark_mastered(PracticeMode::Sentence, index).await {
                        eprintln!("  Failed to save progress: {}", e);
                    }
                }
            }

            let summary = session.summary();
            println!();
            println!("Progress: {}/{} ({}%)", summary.mastered, summary.total, summary.percentage);
            print_stats(&session);
        }

        Commands::Vocab {
            personalized,
            resume,
        } => {
            let backend: Arc<dyn PracticeBackend> = Arc::new(client);
            let words = WordbankSession::new(backend);
            let mut vocab = words.vocab_session(resume).await?;
            if personalized {
                words.enter_personalized(&mut vocab).await?;
            }
            let mut prompt = Prompt::new();

            while let Some(word) = vocab.current().cloned() {
                let (index, len) = vocab.progress();
                println!();
                println!("[{}/{}] {}", index + 1, len, word.english);

                let Some(answer) = prompt.ask("  Dutch (? to reveal, q to stop): ").await? else {
                    break;
                };
                let outcome = match answer.trim() {
                    "q" => break,
                    "?" => {
                        println!("  {}", vocab.reveal()?.dutch);
                        vocab.next()?
                    }
                    _ => vocab.submit(&answer, Utc::now())?,
                };

                match outcome {
                    SubmitOutcome::Correct => {
                        println!("  Correct!");
                        vocab.next()?;
                    }
                    SubmitOutcome::Incorrect => println!("  Not quite, try again"),
                    _ => {}
                }

                for status in words.flush_typos(&mut vocab).await {
                    if let SaveStatus::Failed(message) = status {
                        eprintln!("  Could not save typo: {}", message);
                    }
                }
            }

            if vocab.is_finished() {
                println!();
                println!("All words done.");
            } else if !vocab.is_personalized() {
                println!("Resume with: typorax vocab --resume {}", vocab.last_completed());
            }
        }

        Commands::FillBlanks => {
            let backend: Arc<dyn PracticeBackend> = Arc::new(client);
            let words = WordbankSession::new(backend);
            let mut blanks = words.fill_blanks_session().await?;
            let mut prompt = Prompt::new();

            while let Some(question) = blanks.current() {
                println!();
                println!("[{}/{}] {}", question.number, question.total, question.sentence);
                println!("  Hint: {}", question.hint);

                let Some(answer) = prompt.ask("  Word (q to stop): ").await? else {
                    break;
                };
                if answer.trim() == "q" {
                    break;
                }

                let outcome = blanks.check(&answer)?;
                match &outcome {
                    BlankOutcome::Correct { example, .. } => println!("  Correct! {}", example),
                    BlankOutcome::Incorrect { word, example, .. } => {
                        println!("  The answer was '{}': {}", word, example)
                    }
                }
                if let Some(SaveStatus::Failed(message)) = words.save_missed(&outcome).await {
                    eprintln!("  {}", message);
                }
            }

            let summary = blanks.summary();
            println!();
            println!(
                "Score: {}/{} ({}%)",
                summary.score, summary.answered, summary.percentage
            );
            println!(
                "Words completed: {}/{} ({}%)",
                summary.completed, summary.total_words, summary.progress_percentage
            );
            println!("{}", summary.message);
        }

        Commands::Test { folder, file } => {
            let backend: Arc<dyn PracticeBackend> = Arc::new(client);
            let tests = LessonTests::new(backend, &folder, &file);
            let generated = tests.generate().await?;
            if generated.questions.is_empty() {
                bail!("No Dutch/English table found in {}", file);
            }

            let mut prompt = Prompt::new();
            let mut answers = Vec::new();
            for (i, question) in generated.questions.iter().enumerate() {
                println!();
                println!("{}. {}", i + 1, question.english);
                let answer = prompt.ask("   Dutch: ").await?.unwrap_or_default();
                answers.push(answer);
            }

            let submission = tests
                .submit(
                    &generated.questions,
                    &answers,
                    config.practice.max_points,
                    Utc::now(),
                )
                .await?;

            println!();
            for (i, q) in submission.attempt.questions.iter().enumerate() {
                println!("{}. {} ({}/{})", i + 1, q.dutch, q.points, q.max_points);
                println!("   {}", q.display_feedback());
            }
            println!();
            println!("Score: {}%", submission.attempt.score);
            if submission.used_local_fallback {
                println!("(Scored offline: exact matches only)");
            }
            if !submission.saved {
                eprintln!("The result could not be saved.");
            }
        }

        Commands::History { folder, file, csv } => {
            let backend: Arc<dyn PracticeBackend> = Arc::new(client);
            let history = LessonTests::new(backend, &folder, &file).history().await?;

            if history.tests.is_empty() {
                println!("No tests taken for {} yet.", file);
                return Ok(());
            }

            println!("{:<6} {:<12} {:>6} {:>10}", "Test", "Date", "Score", "Points");
            println!("{}", "-".repeat(37));
            for (i, attempt) in history.tests.iter().enumerate() {
                println!(
                    "{:<6} {:<12} {:>5}% {:>4}/{:<5}",
                    i + 1,
                    attempt.date.format("%Y-%m-%d"),
                    attempt.score,
                    attempt.earned_points(),
                    attempt.total_points
                );
            }
            if let Some(best) = history.best_score() {
                println!();
                println!("Best: {}%", best);
            }

            if let Some(path) = csv {
                let path = if path.is_dir() {
                    path.join(export_file_name(&file))
                } else {
                    path
                };
                export_to_file(&history.tests, &path)?;
                println!("Exported to {:?}", path);
            }
        }

        Commands::Reset { folder, file, yes } => {
            if !yes {
                let mut prompt = Prompt::new();
                let answer = prompt
                    .ask(&format!("Clear all progress of {}/{}? [y/N] ", folder, file))
                    .await?
                    .unwrap_or_default();
                if !answer.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            client.reset_progress(&folder, &file).await?;
            println!("Progress reset.");
        }

        Commands::Flashcards { action } => {
            let store = PreferenceStore::open_default()?;
            match action.unwrap_or(FlashcardAction::List) {
                FlashcardAction::List => {
                    let cards = store.load()?.flashcards;
                    if cards.is_empty() {
                        println!("No flashcards yet.");
                    }
                    for (i, card) in cards.iter().enumerate() {
                        println!("{}. {}  |  {}", i + 1, card.target_lang, card.native_lang);
                    }
                }
                FlashcardAction::Add {
                    folder,
                    file,
                    number,
                } => {
                    let text = client.load_text(&folder, &file).await?;
                    let Some(pair) = number.checked_sub(1).and_then(|i| text.sentences.get(i)) else {
                        bail!("{} has {} sentences", file, text.sentences.len());
                    };
                    add_flashcard(&folder, &file, pair)?;
                }
                FlashcardAction::Import { path } => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {:?}", path))?;
                    let pairs = parse_pasted_table(&text);
                    if pairs.is_empty() {
                        bail!("No rows with both columns filled in {:?}", path);
                    }
                    let file = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let added = store.import_flashcards(&pairs, "", &file, Utc::now())?;
                    println!("Imported {} of {} rows", added, pairs.len());
                }
                FlashcardAction::Export { path } => {
                    let count = store.export_flashcards(&path)?;
                    println!("Exported {} flashcards to {:?}", count, path);
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            if let Some(path) = output {
                std::fs::write(&path, content)?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", content);
            }
        }
    }

    Ok(())
}

async fn open_session(
    client: &TyporaClient,
    config: &Config,
    folder: &str,
    file: &str,
) -> anyhow::Result<PracticeSession> {
    let backend: Arc<dyn PracticeBackend> = Arc::new(client.clone());
    let session = PracticeSession::load(backend, folder, file, Utc::now())
        .await
        .with_context(|| format!("loading {}/{}", folder, file))?;
    Ok(session.with_mastery_threshold(config.practice.mastery_threshold))
}

fn add_flashcard(
    folder: &str,
    file: &str,
    pair: &typorax::practice::SentencePair,
) -> anyhow::Result<()> {
    let store = PreferenceStore::open_default()?;
    let card = Flashcard::from_sentence(pair, folder, file, Utc::now());
    match store.add_flashcard(card)? {
        AddFlashcard::Added => println!("  Added to flashcards!"),
        AddFlashcard::AlreadyPresent => println!("  Already in your flashcards"),
    }
    Ok(())
}

fn mastered_badge(session: &PracticeSession, mode: PracticeMode, index: usize) -> &'static str {
    if session.record().is_mastered(mode, index) {
        "  (mastered)"
    } else {
        ""
    }
}

fn print_stats(session: &PracticeSession) {
    let stats = session.stats();
    println!(
        "Correct {}/{} ({}%), time {}",
        stats.correct,
        stats.attempts,
        stats.accuracy(),
        stats.elapsed_display(Utc::now())
    );
}

fn unreachable_hint(config: &Config) -> String {
    format!(
        "cannot reach the TyporaX backend at {} (start it with: typorax-api)",
        config.client.base_url
    )
}
