//! Property-based tests for avatar path generation

use profile_core::{SelectedFile, UserId};
use profile_ui::{format_avatar_path, generate_avatar_path};
use proptest::prelude::*;

proptest! {
    /// Property: a generated path is `{user}-{fraction}.{ext}` with the
    /// fraction in [0, 1) and the extension taken after the last dot
    #[test]
    fn generated_path_has_expected_shape(
        user in "[a-f0-9-]{1,36}",
        stem in "[A-Za-z0-9_. ]{0,20}",
        ext in "[A-Za-z0-9]{1,5}",
    ) {
        let file = SelectedFile::new(format!("{stem}.{ext}"), vec![]);
        let path = generate_avatar_path(&UserId::new(user.clone()), &file);

        let prefix = format!("{user}-");
        let suffix = format!(".{ext}");
        let rest = path.as_str().strip_prefix(&prefix).unwrap();
        let fraction: f64 = rest.strip_suffix(&suffix).unwrap().parse().unwrap();
        prop_assert!((0.0..1.0).contains(&fraction));
    }

    /// Property: the fraction is written in full, so it parses back exactly
    #[test]
    fn formatted_fraction_round_trips(fraction in 0.0f64..1.0) {
        let path = format_avatar_path(&UserId::new("u1"), fraction, "jpg");

        let middle = path
            .as_str()
            .strip_prefix("u1-")
            .and_then(|rest| rest.strip_suffix(".jpg"))
            .unwrap();
        prop_assert_eq!(middle.parse::<f64>().unwrap(), fraction);
    }

    /// Property: paths for two uploads of the same file differ
    #[test]
    fn repeated_generation_is_distinct(name in "[a-z]{1,8}\\.png") {
        let file = SelectedFile::new(name, vec![1, 2, 3]);
        let user = UserId::new("u1");

        let first = generate_avatar_path(&user, &file);
        let second = generate_avatar_path(&user, &file);
        prop_assert_ne!(first, second);
    }
}
