//! Line-oriented practice loop over stdin/stdout.

use std::io::{self, BufRead, Write};

use sat_core::model::{ParsedQuestion, QuestionCategory};
use services::{Notice, PracticeController};

enum Input {
    Answer(String),
    Next,
    Previous,
    Another,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" => None,
            ":n" | ":next" => Some(Self::Next),
            ":p" | ":prev" => Some(Self::Previous),
            ":r" | ":another" => Some(Self::Another),
            ":q" | ":quit" => Some(Self::Quit),
            answer => Some(Self::Answer(answer.to_string())),
        }
    }
}

fn render(out: &mut impl Write, controller: &PracticeController) -> io::Result<()> {
    let session = controller.session();
    let Some(question) = session.question() else {
        return writeln!(out, "No question loaded.");
    };
    if session.current_index() == 0 {
        render_passage(out, question)?;
    }
    let Some(item) = session.current_item() else {
        return writeln!(out, "The model did not return any questions. Try :another.");
    };

    let progress = controller.progress();
    writeln!(out, "\nQuestion {} of {}", progress.index + 1, progress.total)?;
    if let Some(sentence) = &item.sentence {
        writeln!(out, "Sentence: {sentence}")?;
    }
    if let Some(span) = &item.underlined_span {
        writeln!(out, "Underlined: {span}")?;
    }
    if !item.question_text.is_empty() {
        writeln!(out, "{}", item.question_text)?;
    }
    if item.choices.is_empty() {
        writeln!(out, "(no answer choices could be read)")?;
    }
    for choice in &item.choices {
        writeln!(out, "  {}", choice.labeled())?;
    }
    Ok(())
}

fn render_passage(out: &mut impl Write, question: &ParsedQuestion) -> io::Result<()> {
    if let Some(passage) = question.passage.as_deref().filter(|p| !p.trim().is_empty()) {
        writeln!(out, "\n{passage}")?;
    }
    Ok(())
}

fn show(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    writeln!(out, "[{notice}]")
}

/// Load a question set, then read answers and navigation commands until `:quit`.
///
/// # Errors
///
/// Returns an I/O error if the terminal cannot be read or written.
pub async fn run(
    controller: &mut PracticeController,
    category: QuestionCategory,
) -> io::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    writeln!(
        out,
        "{} practice. Type a letter or choice text to answer; :n next, :p previous, :r another, :q quit.",
        category.label()
    )?;

    load(&mut out, controller, category).await?;

    for line in stdin.lock().lines() {
        let Some(input) = Input::parse(&line?) else {
            continue;
        };
        match input {
            Input::Quit => break,
            Input::Another => load(&mut out, controller, category).await?,
            Input::Next => {
                if controller.next() {
                    render(&mut out, controller)?;
                } else {
                    writeln!(out, "Already at the last question.")?;
                }
            }
            Input::Previous => {
                if controller.previous() {
                    render(&mut out, controller)?;
                } else {
                    writeln!(out, "Already at the first question.")?;
                }
            }
            Input::Answer(answer) => {
                let before = controller.progress().index;
                controller.select_answer(answer);
                match controller.check_answer() {
                    Ok(check) => {
                        show(&mut out, &Notice::for_check(&check))?;
                        if controller.progress().index != before {
                            render(&mut out, controller)?;
                        }
                    }
                    Err(err) => show(&mut out, &Notice::for_practice_error(&err))?,
                }
            }
        }
        out.flush()?;
    }
    Ok(())
}

async fn load(
    out: &mut impl Write,
    controller: &mut PracticeController,
    category: QuestionCategory,
) -> io::Result<()> {
    writeln!(out, "Fetching a question...")?;
    match controller.request_category(category).await {
        Ok(_) => render(out, controller),
        Err(err) => show(out, &Notice::for_practice_error(&err)),
    }
}
