//! Integration tests for ptyexpect
//!
//! These assume a POSIX environment: /bin/sh, /dev/null and friends.

#![cfg(unix)]

use ptyexpect::{Error, Pattern, Session};
use std::time::{Duration, Instant};

fn quiet() -> ptyexpect::SessionBuilder {
    Session::builder().flush_buffer(false)
}

async fn wait_for_exit(session: &Session) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while session.is_running() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(!session.is_running(), "child should have exited by now");
}

#[tokio::test]
async fn pid_set_after_spawn() {
    let session = quiet()
        .timeout(Duration::from_secs(1))
        .spawn("ls /dev && sleep 5")
        .expect("failed to spawn");

    assert!(session.pid() > 0);
    assert!(session.is_running());
}

#[tokio::test]
async fn match_advances_discard_cursor() {
    // POSIX specifies /dev/null must exist; the listing entries that sort
    // before it become the discarded preamble.
    let mut session = quiet()
        .timeout(Duration::from_secs(5))
        .spawn("ls /dev && sleep 5")
        .expect("failed to spawn");

    let m = session
        .expect(Pattern::regex("null").unwrap())
        .await
        .expect("pattern not found");

    assert_eq!(m.matched, "null");
    assert!(!m.discarded.is_empty());
}

#[tokio::test]
async fn second_expect_does_not_rematch() {
    let mut session = quiet()
        .timeout(Duration::from_secs(1))
        .spawn("printf 'alpha MARKER beta\\n' && sleep 5")
        .expect("failed to spawn");

    let m = session.expect("MARKER").await.expect("first match failed");
    assert!(m.discarded.contains("alpha"));

    // The matched bytes are consumed; the same pattern now times out.
    match session.expect("MARKER").await {
        Err(Error::MatchTimeout { .. }) => {}
        other => panic!("expected MatchTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn expect_returns_promptly_on_match() {
    let mut session = quiet()
        .timeout(Duration::from_secs(10))
        .spawn("echo quick && sleep 5")
        .expect("failed to spawn");

    let start = Instant::now();
    session.expect("quick").await.expect("pattern not found");
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn timeout_elapses_before_failing() {
    let mut session = quiet()
        .timeout(Duration::from_millis(500))
        .spawn("sleep 5")
        .expect("failed to spawn");

    let start = Instant::now();
    let result = session.expect("neverAppears").await;
    let elapsed = start.elapsed();

    match result {
        Err(Error::MatchTimeout { duration }) => {
            assert_eq!(duration, Duration::from_millis(500));
        }
        other => panic!("expected MatchTimeout, got {other:?}"),
    }
    assert!(elapsed >= Duration::from_millis(500), "failed instantly");
    assert!(elapsed < Duration::from_secs(4), "waited past the deadline");
}

#[tokio::test]
async fn timeout_leaves_buffer_untouched() {
    let mut session = quiet()
        .timeout(Duration::from_millis(500))
        .spawn("printf 'kept output' && sleep 5")
        .expect("failed to spawn");

    let _ = session.expect("absent").await;

    // A failed expect with force off discards nothing.
    let m = session.expect("kept").await.expect("buffer was consumed");
    assert_eq!(m.matched, "kept");
}

#[tokio::test]
async fn process_death_resolves_promptly() {
    let mut session = quiet()
        .timeout(Duration::from_secs(10))
        .spawn("echo bye")
        .expect("failed to spawn");

    let start = Instant::now();
    let result = session.expect("neverAppears").await;

    assert!(matches!(result, Err(Error::MatchTimeout { .. })));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn force_match_tolerates_binary_garbage() {
    let mut session = quiet()
        .timeout(Duration::from_secs(1))
        .buffer_size(1024)
        .spawn("dd if=/dev/urandom bs=1024 count=1")
        .expect("failed to spawn");

    session
        .expect_with(Pattern::regex("probablyNotThere").unwrap(), true)
        .await
        .expect("forced expect must not fail on binary output");
}

#[tokio::test]
async fn force_match_consumes_live_window() {
    let mut session = quiet()
        .timeout(Duration::from_millis(500))
        .spawn("printf 'garbage data' && sleep 5")
        .expect("failed to spawn");

    let m = session
        .expect_with("nope", true)
        .await
        .expect("forced expect failed");
    assert!(m.matched.contains("garbage"));
    assert!(m.discarded.is_empty());

    assert_eq!(session.buffer().await, "");
}

#[tokio::test]
async fn force_match_as_session_default() {
    let mut session = quiet()
        .timeout(Duration::from_millis(500))
        .force_match(true)
        .spawn("printf 'whatever' && sleep 5")
        .expect("failed to spawn");

    // The session policy applies without a per-call override.
    session.expect("nope").await.expect("forced expect failed");
}

#[tokio::test]
async fn clear_buffer_empties_live_window() {
    let session = quiet()
        .timeout(Duration::from_secs(1))
        .spawn("ls /dev && sleep 5")
        .expect("failed to spawn");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!session.buffer().await.is_empty());

    session.clear_buffer().await;
    assert_eq!(session.buffer().await, "");
}

#[tokio::test]
async fn send_and_receive_echo() {
    let mut session = quiet()
        .timeout(Duration::from_secs(10))
        .spawn("cat")
        .expect("failed to spawn cat");

    session
        .send_line("Hello from test")
        .await
        .expect("failed to send");

    let m = session.expect("Hello").await.expect("echo not received");
    assert_eq!(m.matched, "Hello");
}

#[tokio::test]
async fn send_after_exit_fails() {
    let session = quiet()
        .timeout(Duration::from_secs(5))
        .spawn("sh")
        .expect("failed to spawn sh");

    session.send_line("exit").await.expect("failed to send exit");
    wait_for_exit(&session).await;

    match session.send(b"anything").await {
        Err(Error::ProcessNotRunning) => {}
        other => panic!("expected ProcessNotRunning, got {other:?}"),
    }
}

#[tokio::test]
async fn kill_running_process() {
    let session = quiet()
        .timeout(Duration::from_secs(1))
        .spawn("sleep 5")
        .expect("failed to spawn");

    let accepted = session.kill(libc::SIGTERM).expect("kill failed");
    assert!(accepted);

    wait_for_exit(&session).await;
}

#[tokio::test]
async fn kill_dead_process_fails() {
    let session = quiet()
        .timeout(Duration::from_secs(1))
        .spawn("true")
        .expect("failed to spawn");

    wait_for_exit(&session).await;

    match session.kill(libc::SIGTERM) {
        Err(Error::ProcessNotRunning) => {}
        other => panic!("expected ProcessNotRunning, got {other:?}"),
    }
}

#[tokio::test]
async fn winsize_reports_dimensions() {
    let session = quiet()
        .timeout(Duration::from_secs(1))
        .spawn("sleep 2")
        .expect("failed to spawn");

    let (rows, cols) = session.winsize().expect("winsize failed");
    assert!(rows > 0);
    assert!(cols > 0);
}

#[tokio::test]
async fn resize_applies_to_pty() {
    let session = quiet()
        .timeout(Duration::from_secs(1))
        .spawn("sleep 2")
        .expect("failed to spawn");

    session.resize(40, 120).expect("resize failed");
    assert_eq!(session.winsize().expect("winsize failed"), (40, 120));
}

#[tokio::test]
async fn empty_command_rejected() {
    match Session::spawn("   ") {
        Err(Error::InvalidArgument(_)) => {}
        other => panic!("expected InvalidArgument, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn regex_captures_are_returned() {
    let mut session = quiet()
        .timeout(Duration::from_secs(5))
        .spawn("echo Email: user@example.com && sleep 2")
        .expect("failed to spawn");

    let m = session
        .expect(Pattern::regex(r"(\w+)@(\w+)\.(\w+)").unwrap())
        .await
        .expect("pattern not found");

    assert_eq!(m.captures[0], "user@example.com");
    assert_eq!(m.captures[1], "user");
    assert_eq!(m.captures[2], "example");
    assert_eq!(m.captures[3], "com");
}

#[tokio::test]
async fn sequential_expects_walk_the_stream() {
    let mut session = quiet()
        .timeout(Duration::from_secs(5))
        .spawn("printf 'First\\nSecond\\n' && sleep 2")
        .expect("failed to spawn");

    let first = session.expect("First").await.expect("First not found");
    assert_eq!(first.matched, "First");

    let second = session.expect("Second").await.expect("Second not found");
    assert_eq!(second.matched, "Second");
    // "First" was consumed before "Second" was matched.
    assert!(!second.discarded.contains("First"));
}

#[tokio::test]
async fn wait_reaps_exit_status() {
    let mut session = quiet()
        .timeout(Duration::from_secs(5))
        .spawn("echo done")
        .expect("failed to spawn");

    let status = session.wait().await.expect("wait failed");
    assert!(status.success());
    assert!(!session.is_running());
}

#[tokio::test]
async fn pty_size_option_sets_initial_dimensions() {
    // Only observable when stdout is not a tty (otherwise the parent's
    // size takes precedence right after spawn), which holds under cargo
    // test's captured output.
    let session = quiet()
        .timeout(Duration::from_secs(1))
        .pty_size(30, 100)
        .spawn("sleep 2")
        .expect("failed to spawn");

    let (rows, cols) = session.winsize().expect("winsize failed");
    assert!(rows > 0 && cols > 0);
}
