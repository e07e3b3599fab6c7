//! Property-based tests for attachment filename derivation.

use certificate_service::routes::attachment_filename;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn derivation_is_deterministic(name in "\\PC{0,40}") {
        prop_assert_eq!(attachment_filename(&name), attachment_filename(&name));
    }

    #[test]
    fn only_spaces_are_replaced(name in "[A-Za-z0-9 '.,&éü-]{1,40}") {
        let filename = attachment_filename(&name);
        let stem = filename.strip_suffix("_certificate.pdf").unwrap();

        prop_assert!(!stem.contains(' '));
        prop_assert_eq!(stem.chars().count(), name.chars().count());
        for (original, derived) in name.chars().zip(stem.chars()) {
            if original == ' ' {
                prop_assert_eq!(derived, '_');
            } else {
                prop_assert_eq!(derived, original);
            }
        }
    }
}
