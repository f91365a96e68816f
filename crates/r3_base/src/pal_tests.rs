/* 📖 # PAL contract tests

The rename engine is tested against MockPal and runs against RealPal, so both must agree on
the contract. Each check here is written once against `&dyn Pal` and run for both
implementations over the same tree:

    foo1
    foo2
    bar/
    bar/foo3
*/

#[cfg(test)]
mod pal_contract_tests {
    use crate::pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
    use std::fs;
    use tempfile::TempDir;

    fn mock_tree() -> MockPal {
        let mock = MockPal::new();
        mock.add_file("foo1");
        mock.add_file("foo2");
        mock.add_file("bar/foo3");
        mock
    }

    fn real_tree() -> (TempDir, RealPal) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        fs::write(temp_dir.path().join("foo1"), "").unwrap();
        fs::write(temp_dir.path().join("foo2"), "").unwrap();
        fs::create_dir(temp_dir.path().join("bar")).unwrap();
        fs::write(temp_dir.path().join("bar/foo3"), "").unwrap();
        let pal = RealPal::new(temp_dir.path().to_path_buf());
        (temp_dir, pal)
    }

    fn sorted_children(pal: &dyn Pal, path: &str) -> Vec<FilePath> {
        let mut children = pal
            .read_directory(&FilePath::from(path))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        children.sort();
        children
    }

    fn check_listing(pal: &dyn Pal) {
        assert_eq!(
            sorted_children(pal, ""),
            vec![
                FilePath::from("bar"),
                FilePath::from("foo1"),
                FilePath::from("foo2"),
            ]
        );
        assert_eq!(sorted_children(pal, "bar"), vec![FilePath::from("bar/foo3")]);
        assert!(pal.read_directory(&FilePath::from("foo1")).is_err());
        assert!(pal.read_directory(&FilePath::from("missing")).is_err());
    }

    fn check_directory_tests(pal: &dyn Pal) {
        assert!(pal.is_directory(&FilePath::root()).unwrap());
        assert!(pal.is_directory(&FilePath::from("bar")).unwrap());
        assert!(!pal.is_directory(&FilePath::from("bar/foo3")).unwrap());
        assert!(!pal.is_directory(&FilePath::from("missing")).unwrap());
    }

    fn check_rename_directory_moves_children(pal: &dyn Pal) {
        pal.rename(&FilePath::from("bar"), &FilePath::from("qux"))
            .unwrap();

        assert!(!pal.file_exists(&FilePath::from("bar")).unwrap());
        assert!(pal.file_exists(&FilePath::from("qux/foo3")).unwrap());
        // The old child path is gone with its parent.
        assert!(
            pal.rename(&FilePath::from("bar/foo3"), &FilePath::from("bar/baz3"))
                .is_err()
        );
    }

    #[test]
    fn test_mock_listing() {
        check_listing(&mock_tree());
    }

    #[test]
    fn test_real_listing() {
        let (_temp_dir, pal) = real_tree();
        check_listing(&pal);
    }

    #[test]
    fn test_mock_directory_tests() {
        check_directory_tests(&mock_tree());
    }

    #[test]
    fn test_real_directory_tests() {
        let (_temp_dir, pal) = real_tree();
        check_directory_tests(&pal);
    }

    #[test]
    fn test_mock_rename_directory_moves_children() {
        check_rename_directory_moves_children(&mock_tree());
    }

    #[test]
    fn test_real_rename_directory_moves_children() {
        let (_temp_dir, pal) = real_tree();
        check_rename_directory_moves_children(&pal);
    }

    #[test]
    fn test_pal_handle_deref() {
        let handle = PalHandle::new(mock_tree());
        let _clone = handle.clone();
        assert!(handle.file_exists(&FilePath::from("bar/foo3")).unwrap());
    }
}
