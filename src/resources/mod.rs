//! Idempotent resource primitives (check + apply pattern).
pub mod backup;
pub mod framework;
pub mod helpers;
pub mod package;
pub mod stow;
pub mod symlink;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// This method should:
    /// - Create parent directories if needed
    /// - Update the resource to match the desired state
    /// - Return the appropriate `ResourceChange` result
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// failing external commands, or missing prerequisites.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource (package, symlink, stow module, …).
///
/// # Examples
///
/// ```
/// use dotfiles_setup::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "/other/path".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g., its source does not exist).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped (e.g., target is a protected directory).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Resources that can determine their own current state.
///
/// # Examples
///
/// ```ignore
/// // All resources follow the same check-then-apply pattern:
/// if resource.needs_change()? {
///     resource.apply()?;
/// }
/// ```
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined due to I/O
    /// failures or permission issues.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from `current_state()`.
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

impl<T: Applicable + ?Sized> Applicable for &T {
    fn description(&self) -> String {
        (**self).description()
    }

    fn apply(&self) -> Result<ResourceChange> {
        (**self).apply()
    }
}

impl<T: Resource + ?Sized> Resource for &T {
    fn current_state(&self) -> Result<ResourceState> {
        (**self).current_state()
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    struct TestResource {
        state: ResourceState,
    }

    impl Applicable for TestResource {
        fn description(&self) -> String {
            "test resource".to_string()
        }

        fn apply(&self) -> Result<ResourceChange> {
            Ok(ResourceChange::Applied)
        }
    }

    impl Resource for TestResource {
        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }
    }

    #[test]
    fn needs_change_for_missing_resource() {
        let resource = TestResource {
            state: ResourceState::Missing,
        };
        assert!(resource.needs_change().unwrap());
    }

    #[test]
    fn needs_change_for_incorrect_resource() {
        let resource = TestResource {
            state: ResourceState::Incorrect {
                current: "wrong".to_string(),
            },
        };
        assert!(resource.needs_change().unwrap());
    }

    #[test]
    fn no_change_for_correct_or_invalid_resource() {
        for state in [
            ResourceState::Correct,
            ResourceState::Invalid {
                reason: "source missing".to_string(),
            },
        ] {
            assert!(!TestResource { state }.needs_change().unwrap());
        }
    }
}
