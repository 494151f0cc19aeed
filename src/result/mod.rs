//! Result types for expect operations

mod error;

pub use error::Error;

/// Result of a successful (or forced) pattern match.
///
/// `expect` returns both halves of the region it consumed: the text that
/// was skipped to reach the match (`discarded`) and the match itself
/// (`matched`). Both are gone from the live window afterwards; a second
/// identical expect will not see them again.
///
/// # Examples
///
/// ```no_run
/// use ptyexpect::Session;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::spawn("ls /dev && sleep 5")?;
/// let m = session.expect("null").await?;
///
/// // Directory entries listed before /dev/null.
/// println!("skipped: {}", m.discarded);
/// println!("matched: {}", m.matched);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExpectMatch {
    /// Output that preceded the match, consumed along with it.
    ///
    /// For a forced match this is empty and the whole live window lands in
    /// `matched` instead.
    pub discarded: String,

    /// The matched text itself.
    pub matched: String,

    /// Captured groups for regex patterns.
    ///
    /// Index 0 is the full match, index 1 onward the capture groups.
    /// Empty for exact-string patterns and forced matches.
    pub captures: Vec<String>,
}
