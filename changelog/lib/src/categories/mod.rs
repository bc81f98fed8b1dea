//! Section category registry.
//!
//! Defines the 13 categories a version block can be divided into, ordered by
//! display priority, along with the lookups used by the transform passes and
//! the fragment parser:
//!
//! - heading text → category (case-insensitive)
//! - commit type + scope + breaking flag → category
//!
//! ## Examples
//!
//! ```
//! use changelog_lib::categories::{by_heading, by_keyword};
//!
//! assert_eq!(by_heading("bug fixes").map(|c| c.priority), Some(3));
//! assert_eq!(by_keyword("chore", Some("deps"), false).heading, "Dependencies");
//! assert_eq!(by_keyword("feat", None, true).heading, "Breaking Changes");
//! ```

mod types;

pub use types::Category;

use std::collections::HashMap;

use lazy_static::lazy_static;

pub static BREAKING_CHANGES: Category = Category {
    heading: "Breaking Changes",
    priority: 1,
    keywords: &[],
    description: "Backward-incompatible changes",
};

pub static FEATURES: Category = Category {
    heading: "Features",
    priority: 2,
    keywords: &["feat"],
    description: "New functionality",
};

pub static BUG_FIXES: Category = Category {
    heading: "Bug Fixes",
    priority: 3,
    keywords: &["fix"],
    description: "Bug corrections",
};

pub static PERFORMANCE: Category = Category {
    heading: "Performance",
    priority: 4,
    keywords: &["perf"],
    description: "Performance improvements",
};

pub static DOCUMENTATION: Category = Category {
    heading: "Documentation",
    priority: 5,
    keywords: &["docs"],
    description: "Documentation changes",
};

pub static REFACTORING: Category = Category {
    heading: "Refactoring",
    priority: 6,
    keywords: &["refactor"],
    description: "Code restructuring",
};

pub static TESTS: Category = Category {
    heading: "Tests",
    priority: 7,
    keywords: &["test"],
    description: "Test additions or modifications",
};

pub static BUILD_SYSTEM: Category = Category {
    heading: "Build System",
    priority: 8,
    keywords: &["build"],
    description: "Build configuration changes",
};

pub static CI: Category = Category {
    heading: "CI",
    priority: 9,
    keywords: &["ci"],
    description: "Continuous integration changes",
};

pub static DEPENDENCIES: Category = Category {
    heading: "Dependencies",
    priority: 10,
    keywords: &["deps"],
    description: "Dependency updates",
};

pub static MAINTENANCE: Category = Category {
    heading: "Maintenance",
    priority: 11,
    keywords: &["chore", "style"],
    description: "General maintenance",
};

pub static REVERTS: Category = Category {
    heading: "Reverts",
    priority: 12,
    keywords: &["revert"],
    description: "Reverted changes",
};

pub static OTHER: Category = Category {
    heading: "Other",
    priority: 13,
    keywords: &[],
    description: "Uncategorized changes",
};

/// All categories ordered by priority (ascending).
pub static CATEGORIES: [&Category; 13] = [
    &BREAKING_CHANGES,
    &FEATURES,
    &BUG_FIXES,
    &PERFORMANCE,
    &DOCUMENTATION,
    &REFACTORING,
    &TESTS,
    &BUILD_SYSTEM,
    &CI,
    &DEPENDENCIES,
    &MAINTENANCE,
    &REVERTS,
    &OTHER,
];

lazy_static! {
    static ref BY_HEADING: HashMap<String, &'static Category> = CATEGORIES
        .iter()
        .map(|category| (category.heading.to_lowercase(), *category))
        .collect();
    static ref BY_KEYWORD: HashMap<&'static str, &'static Category> = CATEGORIES
        .iter()
        .flat_map(|category| category.keywords.iter().map(move |kw| (*kw, *category)))
        .collect();
}

/// Returns every category, ordered by priority.
pub fn all_categories() -> &'static [&'static Category] {
    &CATEGORIES
}

/// Returns the display headings of every category, in priority order.
pub fn all_headings() -> Vec<&'static str> {
    CATEGORIES.iter().map(|category| category.heading).collect()
}

/// Looks up a category by its heading text (case-insensitive exact match).
pub fn by_heading(heading: &str) -> Option<&'static Category> {
    BY_HEADING.get(&heading.to_lowercase()).copied()
}

/// Returns `true` if the heading names a known category.
pub fn is_valid_heading(heading: &str) -> bool {
    by_heading(heading).is_some()
}

/// Resolves a conventional commit type to a category.
///
/// Resolution order:
/// 1. `breaking` always yields [`BREAKING_CHANGES`]
/// 2. `chore` with scope `deps` yields [`DEPENDENCIES`]
/// 3. the keyword table
/// 4. [`OTHER`] for anything unrecognized
pub fn by_keyword(kind: &str, scope: Option<&str>, breaking: bool) -> &'static Category {
    if breaking {
        return &BREAKING_CHANGES;
    }

    if kind == "chore" && scope == Some("deps") {
        return &DEPENDENCIES;
    }

    BY_KEYWORD.get(kind).copied().unwrap_or(&OTHER)
}
