//! Integration tests for completion resolution.

use futures::FutureExt;
use inquir::{Completer, CompletionSource, LineInterface, PromptError, Prompter, SessionOptions};
use tokio::io::{BufReader, duplex};

#[tokio::test]
async fn fixed_source_prefix_filters() {
    let completer = Completer::new(CompletionSource::fixed(["add", "remove", "list"]));
    assert_eq!(completer.resolve("a").await.expect("resolve"), ["add"]);
    assert_eq!(
        completer.resolve("").await.expect("resolve"),
        ["add", "remove", "list"]
    );
    assert!(completer.resolve("z").await.expect("resolve").is_empty());
}

#[tokio::test]
async fn engine_exposes_the_configured_source() {
    let options = SessionOptions::new()
        .colorize(false)
        .completion(CompletionSource::fixed(["add", "remove", "list"]));

    let (_input_tx, input_rx) = duplex(64);
    let (output_tx, _output_rx) = duplex(64);
    let line = LineInterface::new(BufReader::new(input_rx), output_tx);
    let prompter = Prompter::new(options, line);

    assert_eq!(prompter.complete("a").await.expect("resolve"), ["add"]);
    assert_eq!(prompter.complete("li").await.expect("resolve"), ["list"]);
}

#[tokio::test]
async fn sync_source_is_called_per_line() {
    let completer = Completer::new(CompletionSource::sync(|line: &str| {
        vec![format!("{line}-one"), "other".to_string()]
    }));
    assert_eq!(completer.resolve("x").await.expect("resolve"), ["x-one"]);
}

#[tokio::test]
async fn async_source_error_is_fatal_to_the_attempt_only() {
    let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = std::sync::Arc::clone(&calls);
    let completer = Completer::new(CompletionSource::async_fn(move |line: &str| {
        let counter = std::sync::Arc::clone(&counter);
        let line = line.to_string();
        async move {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if line == "boom" {
                Err(PromptError::completion("backend unavailable"))
            } else {
                Ok(vec!["steady".to_string()])
            }
        }
        .boxed()
    }));

    let err = completer.resolve("boom").await.expect_err("fails");
    assert!(matches!(err, PromptError::Completion { .. }));

    // The resolver is reusable after a failed attempt.
    assert_eq!(completer.resolve("ste").await.expect("resolve"), ["steady"]);
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}
