//! Property tests for the integrity digest.

use std::fs;

use proptest::prelude::*;

use msgstore_export::digest::sha256_file;

proptest! {
    #[test]
    fn digest_is_stable_across_reads(data in proptest::collection::vec(any::<u8>(), 0..16384)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msgstore.db");
        fs::write(&path, &data).unwrap();

        prop_assert_eq!(sha256_file(&path).unwrap(), sha256_file(&path).unwrap());
    }

    #[test]
    fn digest_detects_any_single_byte_flip(
        data in proptest::collection::vec(any::<u8>(), 1..16384),
        index in any::<prop::sample::Index>(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msgstore.db");
        fs::write(&path, &data).unwrap();
        let original = sha256_file(&path).unwrap();

        let mut tampered = data;
        let at = index.index(tampered.len());
        tampered[at] ^= 0xFF;
        fs::write(&path, &tampered).unwrap();

        prop_assert_ne!(sha256_file(&path).unwrap(), original);
    }
}
