use crate::options::ListOptions;

/// Which names a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Hide every name starting with `.`.
    #[default]
    Default,
    /// Show dotfiles except the `.` and `..` links.
    AlmostAll,
    /// Show everything.
    All,
}

impl Visibility {
    pub fn include(self, name: &str) -> bool {
        match self {
            Self::All       => true,
            Self::AlmostAll => !is_dot_link(name),
            Self::Default   => !name.starts_with('.'),
        }
    }

    /// Whether recursive listing descends into a subdirectory called `name`.
    ///
    /// Stricter than [`include`](Self::include): hidden directories are only
    /// entered when everything is shown, and the dot links never are.
    pub fn descends(self, name: &str) -> bool {
        if is_dot_link(name) {
            return false;
        }
        self == Self::All || !name.starts_with('.')
    }
}

/// Whether `name` survives filtering under `options`.
pub fn include(name: &str, options: &ListOptions) -> bool {
    options.visibility().include(name)
}

fn is_dot_link(name: &str) -> bool {
    name == "." || name == ".."
}
