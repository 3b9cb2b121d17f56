//! # CLI Module
//!
//! Command-line entry points. The binary parses its flags and hands them to
//! [`shuffle`], which wires configuration, authentication, the blob store and
//! the reconciler together and turns any failure into a non-zero exit.
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotify-shuffler                         # queue 10 new tracks
//! spotify-shuffler -n 50                   # queue 50 new tracks
//! spotify-shuffler -f                      # re-read the library first
//! spotify-shuffler -p                      # forget what was queued before
//! spotify-shuffler --creds-path ~/creds.yaml
//! ```

mod shuffle;

pub use shuffle::shuffle;
