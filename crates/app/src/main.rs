use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::Question;
use quiz_core::wordlist;
use services::{
    Progress, QuizService, QuizState, QuizSummary, SentenceConfig, SentenceService,
};

#[derive(Debug)]
enum ArgsError {
    MissingWordlist,
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingWordlist => write!(f, "a wordlist file is required"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    wordlist: PathBuf,
    api_key: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut wordlist = None;
        let mut api_key = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-key" => {
                    let value = args.next().ok_or(ArgsError::MissingValue {
                        flag: "--api-key",
                    })?;
                    api_key = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => wordlist = Some(PathBuf::from(arg)),
            }
        }

        Ok(Self {
            wordlist: wordlist.ok_or(ArgsError::MissingWordlist)?,
            api_key,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- <wordlist.txt> [--api-key <key>]");
    eprintln!();
    eprintln!("Wordlist format: one `term [meaning]` per line.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_AI_API_KEY, QUIZ_AI_BASE_URL, QUIZ_AI_MODEL");
}

fn print_question(question: &Question, progress: Progress) {
    println!();
    println!(
        "Question {} / {}",
        progress.question_number, progress.total
    );
    println!("What is the meaning of: {}?", question.term());
    println!("Context: {}", question.prompt_text());
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
    print!("Your answer (1-{}, or q to end): ", question.options().len());
    let _ = io::stdout().flush();
}

fn print_summary(summary: &QuizSummary) {
    println!();
    if summary.aborted {
        println!("Quiz ended early: {} of {} answered.", summary.answered, summary.total);
    } else {
        println!("Quiz finished!");
    }
    println!(
        "Score: {} / {} correct.",
        summary.correct_count(),
        summary.answered
    );

    if summary.mistakes.is_empty() {
        if summary.answered > 0 {
            println!("Excellent, no incorrect answers.");
        }
        return;
    }

    println!("Items to review:");
    for mistake in &summary.mistakes {
        println!(
            "  {} = {} (you chose: {})",
            mistake.term, mistake.correct_meaning, mistake.chosen_meaning
        );
    }
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|err| {
        eprintln!("{err}");
        print_usage();
        err
    })?;

    let text = std::fs::read_to_string(&args.wordlist)
        .map_err(|err| format!("cannot read {}: {err}", args.wordlist.display()))?;
    let pairs = wordlist::parse(&text);
    log::info!(
        "loaded {} vocabulary pairs from {}",
        pairs.len(),
        args.wordlist.display()
    );

    let config = args
        .api_key
        .map(SentenceConfig::new)
        .or_else(SentenceConfig::from_env);
    if config.is_none() {
        eprintln!("note: no API key configured, example sentences will be placeholders");
    }
    let source = Arc::new(SentenceService::new(config));

    let mut quiz = QuizService::new(source);
    println!("Preparing the first question…");
    quiz.start(pairs).await?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        match quiz.state() {
            QuizState::AwaitingAnswer => {
                let (Some(question), Some(progress)) =
                    (quiz.current_question().cloned(), quiz.progress())
                else {
                    break;
                };
                print_question(&question, progress);

                let Some(line) = read_line(&mut input)? else {
                    quiz.abort();
                    continue;
                };
                if line.eq_ignore_ascii_case("q") {
                    quiz.abort();
                    continue;
                }
                let chosen = match line.parse::<usize>().ok().and_then(|n| {
                    question.options().get(n.checked_sub(1)?)
                }) {
                    Some(option) => option.clone(),
                    None => {
                        println!("Please enter a number between 1 and {}.", question.options().len());
                        continue;
                    }
                };

                let feedback = quiz.submit_answer(chosen)?;
                if feedback.correct {
                    println!(
                        "Correct! {} means '{}'.",
                        question.term(),
                        question.correct_meaning()
                    );
                } else {
                    println!(
                        "Incorrect. The correct meaning of {} is '{}'.",
                        question.term(),
                        question.correct_meaning()
                    );
                }
            }
            QuizState::ShowingFeedback => {
                print!("Press Enter for the next question (q to end): ");
                let _ = io::stdout().flush();
                let Some(line) = read_line(&mut input)? else {
                    quiz.abort();
                    continue;
                };
                if line.eq_ignore_ascii_case("q") {
                    quiz.abort();
                    continue;
                }
                if !quiz.next_question_ready() {
                    println!("Loading next question…");
                }
                quiz.advance().await?;
            }
            QuizState::Finished => {
                if let Some(summary) = quiz.summary() {
                    print_summary(summary);
                }
                break;
            }
            QuizState::NotStarted => break,
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
