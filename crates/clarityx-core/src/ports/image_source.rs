//! Image source port for loading images from various sources.

use crate::domain::{ImageInfo, UnreadableImage};

/// Port for loading images from a source.
///
/// Sources enumerate their entries up front so a batch can hand them out to
/// workers by index. Loading an entry decodes it; a decode failure is an
/// [`UnreadableImage`] rather than an empty buffer.
pub trait ImageSource: Send + Sync {
    /// Returns the identifiers of every image in this source, in batch order.
    fn entries(&self) -> Vec<String>;

    /// Loads and decodes one entry.
    ///
    /// # Errors
    ///
    /// Returns [`UnreadableImage`] if the entry cannot be read or decoded.
    fn load(&self, entry: &str) -> Result<ImageInfo, UnreadableImage>;

    /// Returns an iterator that loads every entry in order.
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, UnreadableImage>> + Send + '_> {
        Box::new(self.entries().into_iter().map(move |entry| self.load(&entry)))
    }

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize> {
        Some(self.entries().len())
    }
}
