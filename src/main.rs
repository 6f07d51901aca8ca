use lms_quiz_client::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{QuizAction, QuizSummary},
    services::{
        attempt_session::{AttemptSession, SessionState, SessionView, SubmitReason},
        autosave_scheduler::SaveStatus,
        quiz_service::QuizEntry,
        result_renderer::{OptionMark, ResultView, ReviewOutcome},
        session_runner::SessionRunner,
    },
};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: <letter> answer | n next | p previous | g <n> go to | s submit | q quit";
const USAGE: &str = "usage: lms-quiz <attempt-id> | lms-quiz --quiz <quiz-id> | lms-quiz --list";

#[derive(Debug, PartialEq, Eq)]
enum Launch {
    Attempt(String),
    Quiz(String),
    List,
}

fn parse_args(args: &[String]) -> Option<Launch> {
    match args {
        [flag] if flag == "--list" => Some(Launch::List),
        [flag, quiz_id] if flag == "--quiz" => Some(Launch::Quiz(quiz_id.clone())),
        [attempt_id] if !attempt_id.starts_with("--") => Some(Launch::Attempt(attempt_id.clone())),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(launch) = parse_args(&args) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let state = match AppState::new(Config::from_env()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            std::process::exit(2);
        }
    };
    println!("Signed in as {}", state.user.display_name());

    let attempt_id = match launch {
        Launch::Attempt(attempt_id) => attempt_id,
        Launch::Quiz(quiz_id) => match open_quiz(&state, &quiz_id).await {
            Ok(QuizEntry::TakeAttempt { attempt_id })
            | Ok(QuizEntry::ReviewResult { attempt_id }) => attempt_id,
            Err(e) => {
                eprintln!("Cannot open quiz: {}", e.user_message());
                std::process::exit(1);
            }
        },
        Launch::List => {
            if let Err(e) = list_quizzes(&state).await {
                eprintln!("Cannot list quizzes: {}", e.user_message());
                std::process::exit(1);
            }
            return;
        }
    };

    let mut session = state.open_session(&attempt_id);
    if let Err(e) = session.load().await {
        eprintln!("Attempt not available: {}", e.user_message());
        std::process::exit(1);
    }

    if *session.state() == SessionState::Submitted {
        match session.result_view().await {
            Ok(view) => render_result(&view),
            Err(e) => println!("Already submitted. Result not available yet: {}", e.user_message()),
        }
        return;
    }

    take_attempt(&state, session).await;
}

/// Starts or resumes the quiz, or points at the finished attempt.
async fn open_quiz(state: &AppState, quiz_id: &str) -> AppResult<QuizEntry> {
    let quizzes = state.quiz_service.list_my_quizzes().await?;
    let quiz = quizzes
        .iter()
        .find(|q| q.id == quiz_id)
        .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' is not assigned to you", quiz_id)))?;
    state.quiz_service.enter(quiz).await
}

async fn list_quizzes(state: &AppState) -> AppResult<()> {
    let quizzes = state.quiz_service.list_my_quizzes().await?;
    if quizzes.is_empty() {
        println!("No quizzes assigned.");
    }
    for quiz in &quizzes {
        println!("{}", quiz_line(quiz));
    }
    Ok(())
}

fn quiz_line(quiz: &QuizSummary) -> String {
    let duration = quiz
        .duration_minutes
        .map_or_else(|| "untimed".to_string(), |m| format!("{} min", m));
    let action = match quiz.action() {
        QuizAction::Start => "start".to_string(),
        QuizAction::Continue { .. } => "continue".to_string(),
        QuizAction::ViewResult { .. } => match quiz.attempt.as_ref().and_then(|a| a.percentage) {
            Some(percentage) => format!("done, {:.0}%", percentage),
            None => "done".to_string(),
        },
    };
    format!(
        "{}{} | {} | {} | {}",
        quiz.id,
        if quiz.practice { " (practice)" } else { "" },
        quiz.title,
        duration,
        action
    )
}

async fn take_attempt(state: &AppState, session: AttemptSession) {
    let runner = SessionRunner::start(session, state.config.tick_interval());
    println!("{}", HELP);
    render(&runner.view().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut watch = tokio::time::interval(state.config.tick_interval());
    let mut confirm_pending = false;
    let session = runner.session();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = watch.tick() => {
                if session.lock().await.state().is_terminal() {
                    println!("Time is up, your answers were submitted.");
                    break;
                }
                continue;
            }
        };
        let Ok(Some(line)) = line else {
            break;
        };
        let command = line.trim().to_string();

        if session.lock().await.state().is_terminal() {
            break;
        }

        if confirm_pending {
            confirm_pending = false;
            if command.eq_ignore_ascii_case("y") {
                if let Err(e) = runner.submit(SubmitReason::UserRequested).await {
                    println!("Submit failed: {} (type s to retry)", e.user_message());
                }
            } else {
                println!("Submission cancelled.");
            }
        } else {
            match command.as_str() {
                "q" => break,
                "n" => {
                    session.lock().await.next();
                }
                "p" => {
                    session.lock().await.previous();
                }
                "s" => {
                    let summary = session.lock().await.summary();
                    println!(
                        "Answered {}/{}{}. Submit? [y/N]",
                        summary.answered,
                        summary.total,
                        if summary.unanswered > 0 {
                            format!(", {} unanswered", summary.unanswered)
                        } else {
                            String::new()
                        }
                    );
                    confirm_pending = true;
                    continue;
                }
                cmd if cmd.starts_with("g ") => match cmd[2..].trim().parse::<usize>() {
                    Ok(n) if n > 0 => {
                        session.lock().await.navigate(n - 1);
                    }
                    _ => println!("{}", HELP),
                },
                cmd if cmd.len() == 1 && cmd.chars().all(|c| c.is_ascii_alphabetic()) => {
                    let index = (cmd.to_ascii_uppercase().as_bytes()[0] - b'A') as usize;
                    let mut guard = session.lock().await;
                    let option_count = guard
                        .view()
                        .current
                        .map_or(0, |q| q.options.len());
                    if index < option_count {
                        if let Err(e) = guard.select_current(index) {
                            println!("{}", e.user_message());
                        }
                    } else {
                        println!("No option {} on this question", cmd.to_ascii_uppercase());
                    }
                }
                _ => println!("{}", HELP),
            }
        }

        if session.lock().await.state().is_terminal() {
            break;
        }
        render(&runner.view().await);
    }

    let submitted = *session.lock().await.state() == SessionState::Submitted;
    if submitted {
        match session.lock().await.result_view().await {
            Ok(view) => render_result(&view),
            Err(e) => println!("Submitted. Result not available yet: {}", e.user_message()),
        }
    }
    runner.shutdown().await;
}

fn render(view: &SessionView) {
    let Some(question) = &view.current else {
        return;
    };
    let save = match view.save_status {
        SaveStatus::Saving => " (saving...)",
        SaveStatus::Saved => " (saved)",
        SaveStatus::Failed | SaveStatus::Idle => "",
    };
    println!();
    println!(
        "{} | {}{} | question {}/{}{}",
        view.quiz_title.as_deref().unwrap_or("Quiz"),
        view.remaining_label,
        if view.urgent { " !" } else { "" },
        question.number,
        view.total_questions,
        save
    );
    println!("{}", question.content);
    if let Some(url) = &question.media_url {
        println!("[media] {}", url);
    }
    for option in &question.options {
        let marker = if option.selected { "*" } else { " " };
        println!(" {} {}. {}", marker, option.label, option.text);
    }
    if let Some(error) = &view.last_error {
        println!("! {}", error);
    }
}

fn render_result(view: &ResultView) {
    println!();
    println!(
        "{}: {}/{} ({:.0}%) - {}",
        view.quiz_title.as_deref().unwrap_or("Result"),
        view.score,
        view.total_questions,
        view.percentage,
        view.grade.label()
    );
    for question in &view.questions {
        let outcome = match question.outcome {
            ReviewOutcome::Correct => "correct",
            ReviewOutcome::Incorrect => "wrong",
            ReviewOutcome::Unanswered => "unanswered",
        };
        println!("{}. [{}] {}", question.number, outcome, question.content);
        for option in &question.options {
            let marker = match option.mark {
                OptionMark::Correct => "+",
                OptionMark::WrongChoice => "x",
                OptionMark::Neutral => " ",
            };
            println!("   {} {}. {}", marker, option.label, option.text);
        }
        if let Some(explanation) = &question.explanation {
            println!("   > {}", explanation);
        }
    }
}
