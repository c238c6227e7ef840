//! Configuration for itemforge
//!
//! A profile is an explicit, immutable configuration value passed to
//! attribute constructors. Attributes copy the profile at construction
//! time; changing a profile afterwards never affects already-constructed
//! attributes.

/// Error propagation mode for value validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// The first validation failure aborts the assignment with an error;
    /// nothing is merged into the attribute's accumulator
    #[default]
    Strict,

    /// Validation failures are recorded on the attribute's accumulator and
    /// the assignment returns normally with the stored value unchanged
    Silent,
}

/// Profile shared by attributes of one model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    // -------------------------------------------------------------------------
    // Composite Formatting
    // -------------------------------------------------------------------------
    /// Segment separator used when checking a formatted value against its
    /// template's segment count
    pub delimiter: char,

    // -------------------------------------------------------------------------
    // Error Handling
    // -------------------------------------------------------------------------
    /// How validation failures propagate
    pub mode: ErrorMode,

    // -------------------------------------------------------------------------
    // Update Token
    // -------------------------------------------------------------------------
    /// Token length used when an update-token attribute does not configure
    /// its own
    pub token_length: usize,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            delimiter: '#',
            mode: ErrorMode::Strict,
            token_length: 6,
        }
    }
}

impl Profile {
    /// Create a new profile builder
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder::default()
    }

    /// Convenience: the default profile with silent error handling
    pub fn silent() -> Profile {
        Profile {
            mode: ErrorMode::Silent,
            ..Profile::default()
        }
    }
}

/// Builder for Profile
#[derive(Default)]
pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    /// Set the composite-format segment delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.profile.delimiter = delimiter;
        self
    }

    /// Set the error propagation mode
    pub fn mode(mut self, mode: ErrorMode) -> Self {
        self.profile.mode = mode;
        self
    }

    /// Set the default update-token length
    pub fn token_length(mut self, length: usize) -> Self {
        self.profile.token_length = length;
        self
    }

    pub fn build(self) -> Profile {
        self.profile
    }
}
