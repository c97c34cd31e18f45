// Helper method to format bytes in human-readable form
pub fn bytes2hr(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes2hr() {
        assert_eq!(bytes2hr(512), "512 bytes");
        assert_eq!(bytes2hr(2048), "2.00 KB");
        assert_eq!(bytes2hr(3 * 1024 * 1024 / 2), "1.50 MB");
        assert_eq!(bytes2hr(1024 * 1024 * 1024), "1.00 GB");
    }
}
