//! Configuration options for encoding sniffing.
//!
//! This module provides [`SniffOptions`] and [`SniffOptionsBuilder`]
//! for bounding how much of a document each detection stage looks at.
//!
//! ## Example
//!
//! ```rust
//! use sniffrs::{EncodingSniffer, SniffOptions};
//!
//! // Using default options
//! let sniffer = EncodingSniffer::new(SniffOptions::default());
//!
//! // Using builder for custom options
//! let options = SniffOptions::builder()
//!     .prescan_bytes(1024)
//!     .locale_fallback(false)
//!     .build();
//!
//! let sniffer = EncodingSniffer::new(options);
//! ```

/// Configuration options for the [`EncodingSniffer`](crate::EncodingSniffer).
///
/// ## Creating Options
///
/// ### Using Default
///
/// ```rust
/// use sniffrs::SniffOptions;
///
/// let options = SniffOptions::default();
/// assert_eq!(options.prescan_bytes, 10 * 1024);
/// ```
///
/// ### Using Builder
///
/// ```rust
/// use sniffrs::SniffOptions;
///
/// let options = SniffOptions::builder()
///     .detector_window(4096)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffOptions {
    /// Number of leading bytes the `<meta>` prescan may look at.
    ///
    /// A charset declaration further into the document than this is not seen. Well-formed
    /// documents declare it within the first kilobyte.
    ///
    /// Default: `10240`
    pub prescan_bytes: usize,

    /// Number of leading bytes handed to the statistical detector.
    ///
    /// Larger windows improve the guess on short-lived legacy pages at the cost of time
    /// spent in the detector.
    ///
    /// Default: `51200`
    pub detector_window: usize,

    /// Consult the host locale when no other stage produced an encoding.
    ///
    /// When `false` the pipeline goes straight from the caller's fallback to `windows-1252`,
    /// which keeps results independent of the environment.
    ///
    /// Default: `true`
    pub locale_fallback: bool,
}

impl Default for SniffOptions {
    fn default() -> Self {
        Self {
            prescan_bytes: 10 * 1024,
            detector_window: 50 * 1024,
            locale_fallback: true,
        }
    }
}

impl SniffOptions {
    /// Creates a new builder for SniffOptions
    pub fn builder() -> SniffOptionsBuilder {
        SniffOptionsBuilder::default()
    }
}

/// Builder for [`SniffOptions`].
///
/// ## Example
///
/// ```rust
/// use sniffrs::SniffOptions;
///
/// let options = SniffOptions::builder()
///     .prescan_bytes(2048)
///     .detector_window(8192)
///     .locale_fallback(false)
///     .build();
/// assert!(!options.locale_fallback);
/// ```
#[derive(Debug, Default)]
pub struct SniffOptionsBuilder {
    prescan_bytes: Option<usize>,
    detector_window: Option<usize>,
    locale_fallback: Option<bool>,
}

impl SniffOptionsBuilder {
    /// Set the prescan prefix length
    pub fn prescan_bytes(mut self, bytes: usize) -> Self {
        self.prescan_bytes = Some(bytes);
        self
    }

    /// Set the statistical detector window
    pub fn detector_window(mut self, bytes: usize) -> Self {
        self.detector_window = Some(bytes);
        self
    }

    /// Enable or disable the host locale stage
    pub fn locale_fallback(mut self, enabled: bool) -> Self {
        self.locale_fallback = Some(enabled);
        self
    }

    /// Build the SniffOptions
    pub fn build(self) -> SniffOptions {
        let defaults = SniffOptions::default();
        SniffOptions {
            prescan_bytes: self.prescan_bytes.unwrap_or(defaults.prescan_bytes),
            detector_window: self.detector_window.unwrap_or(defaults.detector_window),
            locale_fallback: self.locale_fallback.unwrap_or(defaults.locale_fallback),
        }
    }
}
