//! Properties of slug derivation and uniqueness

use content_store::identity::{is_path_safe, slugify, unique_in};
use proptest::prelude::*;

proptest! {
    #[test]
    fn slugify_is_deterministic(name in any::<String>()) {
        prop_assert_eq!(slugify(&name), slugify(&name));
    }

    #[test]
    fn slugify_is_idempotent(name in any::<String>()) {
        let once = slugify(&name);
        prop_assert_eq!(slugify(&once), once);
    }

    #[test]
    fn slugify_output_is_url_safe(name in any::<String>()) {
        let slug = slugify(&name);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
        prop_assert!(slug.is_empty() || is_path_safe(&slug));
    }

    #[test]
    fn unique_in_never_returns_taken(
        base in "[a-z]{1,6}",
        taken in proptest::collection::vec("[a-z]{1,6}(-[0-9]{1,2})?", 0..20),
    ) {
        let scope: Vec<&str> = taken.iter().map(String::as_str).collect();
        let chosen = unique_in(scope.iter().copied(), &base);
        prop_assert!(!scope.contains(&chosen.as_str()));
        let prefix = format!("{}-", base);
        prop_assert!(chosen == base || chosen.starts_with(&prefix));
    }

    #[test]
    fn sequential_inserts_count_up(base in "[a-z]{1,8}", n in 1usize..12) {
        let mut scope: Vec<String> = Vec::new();
        for i in 0..n {
            let next = unique_in(scope.iter().map(String::as_str), &base);
            let expected = if i == 0 { base.clone() } else { format!("{}-{}", base, i) };
            prop_assert_eq!(&next, &expected);
            scope.push(next);
        }
    }
}
