use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Temporary file that is removed when dropped
pub struct TestFile {
    path: PathBuf,
}

impl TestFile {
    /// Create an empty path in the temp dir, unique per test name and process
    pub fn new(test_name: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "witness_test_{}_{}_{}.txt",
            test_name,
            std::process::id(),
            n
        ));
        Self { path }
    }

    /// Create the file with the given contents
    pub fn with_contents(test_name: &str, contents: &str) -> Self {
        let file = Self::new(test_name);
        fs::write(&file.path, contents).expect("Failed to write test file");
        file
    }

    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.path).expect("Failed to read test file")
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Consistent, distinct test records
pub fn generate_test_items(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("test_item_{:06}", i).into_bytes())
        .collect()
}
