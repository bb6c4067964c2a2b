use serde::{Deserialize, Serialize};

/// The closed set of labels an expense or budget rule can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub(crate) enum ExpenseCategory {
    Housing,
    Utilities,
    Groceries,
    Transport,
    Health,
    Entertainment,
    Dining,
    Shopping,
    Savings,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Groceries => "Groceries",
            Self::Transport => "Transport",
            Self::Health => "Health",
            Self::Entertainment => "Entertainment",
            Self::Dining => "Dining",
            Self::Shopping => "Shopping",
            Self::Savings => "Savings",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup by label. Unknown labels yield `None`.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
    }

    pub(crate) fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Housing,
            Self::Utilities,
            Self::Groceries,
            Self::Transport,
            Self::Health,
            Self::Entertainment,
            Self::Dining,
            Self::Shopping,
            Self::Savings,
            Self::Other,
        ]
    }

    /// Next category in enumeration order, wrapping around.
    pub(crate) fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub(crate) fn prev(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        if idx == 0 {
            all[all.len() - 1]
        } else {
            all[idx - 1]
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
