use std::io;

use crate::error::LsError;
use crate::results::Section;

/// Receives listing output as it is produced.
///
/// Implement this to render sections: a terminal formatter, a JSON writer,
/// or a test collector. Sections arrive in final order, non-directory
/// arguments first, then each directory depth-first.
///
/// # Errors
///
/// An `Err` from [`section`](SectionSink::section) stops the listing and is
/// returned from `run()` as [`LsError::Output`].
///
/// # Example
///
/// ```rust
/// use parls::{Section, SectionSink};
///
/// struct NameCounter(usize);
///
/// impl SectionSink for NameCounter {
///     fn section(&mut self, section: Section) -> std::io::Result<()> {
///         self.0 += section.entries.len();
///         Ok(())
///     }
/// }
/// ```
pub trait SectionSink {
    /// Consume one section.
    fn section(&mut self, section: Section) -> io::Result<()>;

    /// Called once per failing path, at the point the failure happens.
    ///
    /// The default ignores it; the error is also collected in the
    /// [`Report`](crate::Report).
    fn error(&mut self, _error: &LsError) {}
}

/// Collects sections in emission order.
impl SectionSink for Vec<Section> {
    fn section(&mut self, section: Section) -> io::Result<()> {
        self.push(section);
        Ok(())
    }
}
