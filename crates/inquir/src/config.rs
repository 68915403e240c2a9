//! Session configuration.
//!
//! Options are merged once at construction (explicit values over defaults)
//! and may be shallow-merged afterwards with [`SessionOptions::update`].

use std::fmt;
use std::sync::Arc;

use crate::completion::CompletionSource;
use crate::style::StyleTag;

/// Default application name.
pub const DEFAULT_APP_NAME: &str = "Inquir";

/// Default masking character for secret entry.
pub const DEFAULT_MASK_CHAR: char = '*';

/// A short styled prefix printed before a line of output or input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterSpec {
    /// The delimiter text, including any trailing space.
    pub text: String,
    /// Style tags applied to the text.
    pub tags: Vec<StyleTag>,
}

impl DelimiterSpec {
    /// Create a delimiter with the given text and tags.
    #[must_use]
    pub fn new(text: impl Into<String>, tags: impl Into<Vec<StyleTag>>) -> Self {
        Self {
            text: text.into(),
            tags: tags.into(),
        }
    }
}

/// Hook invoked with a raw line of user input before the engine acts on it.
pub type InputHook = dyn Fn(&str) + Send + Sync;

/// Hook invoked with a log or error line before default handling.
pub type LogHook = dyn Fn(&str) + Send + Sync;

/// Process-wide prompting configuration.
#[derive(Clone)]
pub struct SessionOptions {
    /// Application name, used to derive the input-line delimiter.
    pub app_name: String,
    /// Delimiter printed before each question.
    pub prompt_delimiter: DelimiterSpec,
    /// Delimiter printed before each validation error.
    pub error_delimiter: DelimiterSpec,
    /// Delimiter printed before the interactive input line. Derived from
    /// the application name when unset.
    pub line_delimiter: Option<DelimiterSpec>,
    /// Whether styled output carries ANSI color sequences.
    pub colorize: bool,
    /// Completion source for the line interface.
    pub completion: CompletionSource,
    /// Masking glyph for secret entry.
    pub mask_char: char,
    /// Whether a confirmed interrupt terminates the process. Disable to
    /// make the engine reject with `PromptError::Interrupted` instead.
    pub exit_on_interrupt: bool,
    /// Override handler observing each raw input line.
    pub input_hook: Option<Arc<InputHook>>,
    /// Override handler observing each log line.
    pub log_hook: Option<Arc<LogHook>>,
    /// Override handler observing each error line.
    pub error_hook: Option<Arc<LogHook>>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            prompt_delimiter: DelimiterSpec::new("[?]", [StyleTag::Yellow, StyleTag::Dim]),
            error_delimiter: DelimiterSpec::new("[!]", [StyleTag::Red, StyleTag::Bold]),
            line_delimiter: None,
            colorize: true,
            completion: CompletionSource::None,
            mask_char: DEFAULT_MASK_CHAR,
            exit_on_interrupt: true,
            input_hook: None,
            log_hook: None,
            error_hook: None,
        }
    }
}

impl SessionOptions {
    /// Create session options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the question delimiter.
    #[must_use]
    pub fn prompt_delimiter(mut self, delimiter: DelimiterSpec) -> Self {
        self.prompt_delimiter = delimiter;
        self
    }

    /// Set the error delimiter.
    #[must_use]
    pub fn error_delimiter(mut self, delimiter: DelimiterSpec) -> Self {
        self.error_delimiter = delimiter;
        self
    }

    /// Set the input-line delimiter explicitly.
    #[must_use]
    pub fn line_delimiter_spec(mut self, delimiter: DelimiterSpec) -> Self {
        self.line_delimiter = Some(delimiter);
        self
    }

    /// Enable or disable colorized output.
    #[must_use]
    pub const fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Set the completion source.
    #[must_use]
    pub fn completion(mut self, source: CompletionSource) -> Self {
        self.completion = source;
        self
    }

    /// Set the masking glyph.
    #[must_use]
    pub const fn mask_char(mut self, mask: char) -> Self {
        self.mask_char = mask;
        self
    }

    /// Set whether a confirmed interrupt terminates the process.
    #[must_use]
    pub const fn exit_on_interrupt(mut self, exit: bool) -> Self {
        self.exit_on_interrupt = exit;
        self
    }

    /// Observe each raw input line before the engine acts on it.
    #[must_use]
    pub fn input_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.input_hook = Some(Arc::new(hook));
        self
    }

    /// Observe each log line before default handling.
    #[must_use]
    pub fn log_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.log_hook = Some(Arc::new(hook));
        self
    }

    /// Observe each error line before default handling.
    #[must_use]
    pub fn error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.error_hook = Some(Arc::new(hook));
        self
    }

    /// The input-line delimiter: the configured one, or `<name>> ` derived
    /// from the lowercased application name.
    #[must_use]
    pub fn line_delimiter(&self) -> DelimiterSpec {
        self.line_delimiter.clone().unwrap_or_else(|| {
            DelimiterSpec::new(
                format!("{}> ", self.app_name.to_lowercase()),
                [StyleTag::Grey],
            )
        })
    }

    /// Shallow-merge new values over the current options.
    ///
    /// Only fields present in the update replace current values.
    pub fn update(&mut self, update: OptionsUpdate) {
        if let Some(name) = update.app_name {
            self.app_name = name;
        }
        if let Some(delimiter) = update.prompt_delimiter {
            self.prompt_delimiter = delimiter;
        }
        if let Some(delimiter) = update.error_delimiter {
            self.error_delimiter = delimiter;
        }
        if let Some(delimiter) = update.line_delimiter {
            self.line_delimiter = Some(delimiter);
        }
        if let Some(colorize) = update.colorize {
            self.colorize = colorize;
        }
        if let Some(completion) = update.completion {
            self.completion = completion;
        }
        if let Some(mask) = update.mask_char {
            self.mask_char = mask;
        }
        if let Some(exit) = update.exit_on_interrupt {
            self.exit_on_interrupt = exit;
        }
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("app_name", &self.app_name)
            .field("prompt_delimiter", &self.prompt_delimiter)
            .field("error_delimiter", &self.error_delimiter)
            .field("line_delimiter", &self.line_delimiter)
            .field("colorize", &self.colorize)
            .field("completion", &self.completion)
            .field("mask_char", &self.mask_char)
            .field("exit_on_interrupt", &self.exit_on_interrupt)
            .finish_non_exhaustive()
    }
}

/// A partial set of options for [`SessionOptions::update`].
#[derive(Debug, Clone, Default)]
pub struct OptionsUpdate {
    /// New application name.
    pub app_name: Option<String>,
    /// New question delimiter.
    pub prompt_delimiter: Option<DelimiterSpec>,
    /// New error delimiter.
    pub error_delimiter: Option<DelimiterSpec>,
    /// New input-line delimiter.
    pub line_delimiter: Option<DelimiterSpec>,
    /// New colorize flag.
    pub colorize: Option<bool>,
    /// New completion source.
    pub completion: Option<CompletionSource>,
    /// New masking glyph.
    pub mask_char: Option<char>,
    /// New interrupt-exit flag.
    pub exit_on_interrupt: Option<bool>,
}

impl OptionsUpdate {
    /// Create an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the application name.
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Update the colorize flag.
    #[must_use]
    pub const fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = Some(colorize);
        self
    }

    /// Update the completion source.
    #[must_use]
    pub fn completion(mut self, source: CompletionSource) -> Self {
        self.completion = Some(source);
        self
    }

    /// Update the masking glyph.
    #[must_use]
    pub const fn mask_char(mut self, mask: char) -> Self {
        self.mask_char = Some(mask);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = SessionOptions::default();
        assert_eq!(options.app_name, "Inquir");
        assert_eq!(options.prompt_delimiter.text, "[?]");
        assert!(options.colorize);
        assert!(options.exit_on_interrupt);
        assert_eq!(options.mask_char, '*');
    }

    #[test]
    fn line_delimiter_derived_from_app_name() {
        let options = SessionOptions::new().app_name("Wizard");
        assert_eq!(options.line_delimiter().text, "wizard> ");
    }

    #[test]
    fn line_delimiter_explicit_wins() {
        let options = SessionOptions::new()
            .line_delimiter_spec(DelimiterSpec::new(":: ", [StyleTag::Cyan]));
        assert_eq!(options.line_delimiter().text, ":: ");
    }

    #[test]
    fn update_is_shallow_merge() {
        let mut options = SessionOptions::new().app_name("Wizard").colorize(false);
        options.update(OptionsUpdate::new().colorize(true));

        // Untouched fields survive the merge.
        assert_eq!(options.app_name, "Wizard");
        assert!(options.colorize);
    }
}
