//! The prompt engine.
//!
//! Drives every question in a registry sequentially: present a styled
//! question line, read an answer, apply when/coerce/validate, accumulate
//! responses. A validation rejection re-presents the same question; no
//! partial response survives a failed attempt. Question i+1 is never
//! begun until question i's response is durably recorded.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::broadcast;

use crate::completion::Completer;
use crate::config::SessionOptions;
use crate::error::{PromptError, Result};
use crate::line::{LineInterface, StdioLineInterface};
use crate::masked::MaskedReader;
use crate::question::{AnswerKind, HandlerOutcome};
use crate::registry::{RegisteredQuestion, Registry};
use crate::response::{Response, Responses};
use crate::signal::{LifecycleEvent, SignalCoordinator};
use crate::style::{Styler, clear_screen_sequence};

/// One read attempt's outcome: a usable line, or a request to redraw the
/// delimiter and read again.
enum Input {
    Line(String),
    Redraw,
}

/// The sequential prompt engine for one session.
///
/// A session must fully resolve or reject before another begins; two
/// concurrent engines over one line interface would race on cursor state
/// and prompt text, which the `&mut` receiver on [`run`](Self::run) rules
/// out.
#[derive(Debug)]
pub struct Prompter<R, W> {
    line: LineInterface<R, W>,
    styler: Styler,
    options: SessionOptions,
    completer: Completer,
    coordinator: Arc<SignalCoordinator>,
    interrupts: broadcast::Receiver<LifecycleEvent>,
    signal_task: Option<tokio::task::JoinHandle<()>>,
}

impl Prompter<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Build an engine over the process standard streams.
    ///
    /// Binds OS signal forwarding to this engine's coordinator, so every
    /// stdio session receives interrupts regardless of how many sessions
    /// preceded it. The forwarding task is aborted when the engine is
    /// dropped.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn stdio(options: SessionOptions) -> Self {
        #[cfg_attr(not(unix), allow(unused_mut))]
        let mut prompter = Self::new(options, StdioLineInterface::stdio());
        #[cfg(unix)]
        {
            prompter.signal_task = Some(crate::signal::bind_os_signals(&prompter.coordinator));
        }
        prompter
    }
}

impl<R, W> Drop for Prompter<R, W> {
    fn drop(&mut self) {
        if let Some(task) = self.signal_task.take() {
            task.abort();
        }
    }
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Build an engine over an explicit line interface.
    ///
    /// Initializes the completion resolver from the configured source and
    /// arms a signal coordinator sharing the interface's closed flag,
    /// subscribed to every event a session reacts to. No OS signals are
    /// bound; tests deliver lifecycle events through
    /// [`coordinator`](Self::coordinator).
    #[must_use]
    pub fn new(options: SessionOptions, line: LineInterface<R, W>) -> Self {
        let coordinator = Arc::new(SignalCoordinator::with_closed_flag(line.closed_flag()));
        coordinator.toggle(Some(&[
            LifecycleEvent::Exit,
            LifecycleEvent::FatalError,
            LifecycleEvent::Interrupt,
        ]));
        let interrupts = coordinator.listen();
        Self {
            styler: Styler::new(options.colorize),
            completer: Completer::new(options.completion.clone()),
            line,
            options,
            coordinator,
            interrupts,
            signal_task: None,
        }
    }

    /// The session options.
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The signal coordinator owned by this engine.
    #[must_use]
    pub fn coordinator(&self) -> Arc<SignalCoordinator> {
        Arc::clone(&self.coordinator)
    }

    /// Resolve completion candidates for a partial input line.
    ///
    /// Exposed for the host line-editing primitive; an asynchronous
    /// source failure is fatal to this attempt only.
    pub async fn complete(&self, line: &str) -> Result<Vec<String>> {
        self.completer.resolve(line).await
    }

    /// Present every question in the registry, in ascending id order, and
    /// resolve with the ordered responses.
    ///
    /// # Errors
    ///
    /// Fails with [`PromptError::Config`] when the line interface is
    /// already closed before the session starts, [`PromptError::Closed`]
    /// when it closes mid-session, and [`PromptError::Interrupted`] when
    /// the user confirms an interrupt-exit while `exit_on_interrupt` is
    /// disabled. Validation rejections never surface here; the engine
    /// re-presents the question instead.
    pub async fn run(&mut self, registry: &Registry) -> Result<Vec<Response>> {
        if self.line.is_closed() {
            return Err(PromptError::config(
                "line interface closed before session start",
            ));
        }

        let mut questions = registry.get_all();
        questions.sort_by_key(|q| q.id);

        let mut responses = Responses::new();
        for rq in &questions {
            if let Some(condition) = &rq.question.when {
                if !condition.evaluate(&responses).await.is_truthy() {
                    tracing::debug!(name = %rq.question.name, id = rq.id, "question skipped");
                    continue;
                }
            }
            let response = self.drive_question(rq, &responses).await?;
            self.log(&format!("recorded answer for '{}'", response.name));
            responses.push(response);
        }
        Ok(responses.into_vec())
    }

    /// Like [`run`](Self::run), additionally invoking `callback` with the
    /// responses on success.
    pub async fn run_with<F>(&mut self, registry: &Registry, callback: F) -> Result<Vec<Response>>
    where
        F: FnOnce(&[Response]),
    {
        let responses = self.run(registry).await?;
        callback(&responses);
        Ok(responses)
    }

    /// Present one question until it yields a recorded response.
    async fn drive_question(
        &mut self,
        rq: &RegisteredQuestion,
        responses: &Responses,
    ) -> Result<Response> {
        let question = Arc::clone(&rq.question);
        let delimiter = self.styler.apply(
            &self.options.prompt_delimiter.text,
            &self.options.prompt_delimiter.tags,
        );
        let question_line = format!("{delimiter} {}\n", question.message);
        let input_delimiter = self.options.line_delimiter();
        let input_prompt = self.styler.apply(&input_delimiter.text, &input_delimiter.tags);

        self.line.write_str(&question_line).await?;
        self.line.set_prompt(input_prompt.clone());

        loop {
            let raw = if question.masked {
                // Masked entry bypasses the `clear` keyword and the
                // empty-line redraw; every keystroke of a secret is data.
                match MaskedReader::new(self.options.mask_char)
                    .read(&mut self.line, &input_prompt)
                    .await
                {
                    Ok(raw) => raw,
                    Err(PromptError::Interrupted) => {
                        if self.confirm_exit().await? {
                            return Err(PromptError::Interrupted);
                        }
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            } else {
                self.line.draw_prompt().await?;
                match self.next_line().await? {
                    Input::Line(raw) => raw,
                    Input::Redraw => continue,
                }
            };

            if !question.masked && raw.is_empty() && question.default_value.is_none() {
                continue;
            }

            match self.evaluate(rq, raw, responses).await? {
                Some(response) => return Ok(response),
                None => continue,
            }
        }
    }

    /// Await one line of input or a lifecycle event, whichever comes
    /// first.
    async fn next_line(&mut self) -> Result<Input> {
        enum Woken {
            Line(Result<String>),
            Event(std::result::Result<LifecycleEvent, broadcast::error::RecvError>),
        }

        loop {
            let woken = tokio::select! {
                line = self.line.read_line() => Woken::Line(line),
                event = self.interrupts.recv() => Woken::Event(event),
            };
            match woken {
                Woken::Line(line) => {
                    let raw = line?;
                    if let Some(hook) = &self.options.input_hook {
                        hook(&raw);
                    }
                    if raw.eq_ignore_ascii_case("clear") {
                        let sequence = clear_screen_sequence();
                        self.line.write_str(&sequence).await?;
                        self.line.flush().await?;
                        return Ok(Input::Redraw);
                    }
                    return Ok(Input::Line(raw));
                }
                Woken::Event(Ok(LifecycleEvent::Interrupt)) => {
                    if self.confirm_exit().await? {
                        return Err(PromptError::Interrupted);
                    }
                    return Ok(Input::Redraw);
                }
                Woken::Event(_) => {
                    // Exit notices and channel lag are not input. A fatal
                    // fault closes the interface, which surfaces as
                    // `Closed` on the next read.
                }
            }
        }
    }

    /// Pause the session for a yes/no exit confirmation.
    ///
    /// Returns `true` when the user confirmed; with `exit_on_interrupt`
    /// enabled the process terminates before this returns.
    async fn confirm_exit(&mut self) -> Result<bool> {
        let delimiter = self.styler.apply(
            &self.options.prompt_delimiter.text,
            &self.options.prompt_delimiter.tags,
        );
        let confirmation = format!("\n{delimiter} Exit {}? (y/n) ", self.options.app_name);
        self.line.write_str(&confirmation).await?;
        self.line.flush().await?;

        // Input typed before the interrupt belongs to the question, not to
        // the confirmation; stash it around the confirmation read.
        let partial = self.line.take_pending();
        let answer = self.line.read_line().await?;
        if parse_confirm(&answer) == Some(true) {
            self.line.flush().await?;
            if self.options.exit_on_interrupt {
                tracing::info!("exit confirmed");
                std::process::exit(0);
            }
            return Ok(true);
        }
        // Declined: resume exactly where we left off.
        self.line.set_pending(partial);
        self.line.write_str("\n").await?;
        Ok(false)
    }

    /// Coerce and validate one answer attempt.
    ///
    /// Returns `None` when the attempt was rejected and the question must
    /// be re-presented.
    async fn evaluate(
        &mut self,
        rq: &RegisteredQuestion,
        raw: String,
        responses: &Responses,
    ) -> Result<Option<Response>> {
        let question = Arc::clone(&rq.question);

        let answer = if let Some(default) = question
            .default_value
            .as_ref()
            .filter(|_| raw.is_empty())
        {
            default.clone()
        } else if let Some(coercer) = &question.coerce {
            match coercer.apply(&raw, responses).await {
                Ok(value) => value,
                Err(e) => {
                    self.report_error(&e.to_string()).await?;
                    return Ok(None);
                }
            }
        } else {
            match default_coerce(question.kind, &raw) {
                Ok(value) => value,
                Err(message) => {
                    self.report_error(&message).await?;
                    return Ok(None);
                }
            }
        };

        let outcome = match &question.validate {
            Some(validator) => validator.evaluate(&answer, responses).await,
            None => HandlerOutcome::Bool(true),
        };
        if !outcome.is_truthy() {
            let message = outcome.message().map_or_else(
                || format!("'{raw}' is not a valid answer for '{}'", question.name),
                ToString::to_string,
            );
            self.report_error(&message).await?;
            return Ok(None);
        }

        Ok(Some(Response {
            id: rq.id,
            name: question.name.clone(),
            kind: question.kind,
            message: question.message.clone(),
            answer,
            raw,
            valid: true,
        }))
    }

    /// Print a colorized error label plus message through the error
    /// styling path.
    async fn report_error(&mut self, message: &str) -> Result<()> {
        if let Some(hook) = &self.options.error_hook {
            hook(message);
        }
        tracing::debug!(message, "answer rejected");
        let delimiter = self.styler.apply(
            &self.options.error_delimiter.text,
            &self.options.error_delimiter.tags,
        );
        self.line.write_str(&format!("{delimiter} {message}\n")).await?;
        self.line.flush().await
    }

    fn log(&self, message: &str) {
        if let Some(hook) = &self.options.log_hook {
            hook(message);
        }
        tracing::debug!(message);
    }
}

/// Default coercion per answer kind when no coerce handler is supplied.
fn default_coerce(kind: AnswerKind, raw: &str) -> std::result::Result<Value, String> {
    match kind {
        AnswerKind::String => Ok(Value::String(raw.to_string())),
        AnswerKind::Number => {
            let trimmed = raw.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Value::from(int));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("'{raw}' is not a number"))
        }
        AnswerKind::Confirm => parse_confirm(raw)
            .map(Value::Bool)
            .ok_or_else(|| format!("'{raw}' is not a yes/no answer")),
    }
}

/// Parse a yes/no answer. Accepts y/yes/true and n/no/false, case
/// insensitively.
fn parse_confirm(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}
