use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PhotofitError::unsupported_format("x")
            .to_string()
            .contains("unsupported image format:")
    );
    assert!(
        PhotofitError::invalid_crop("x")
            .to_string()
            .contains("invalid crop state:")
    );
    assert!(
        PhotofitError::encode("x")
            .to_string()
            .contains("encode failure:")
    );
    assert!(
        PhotofitError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert_eq!(PhotofitError::NoCropSelected.to_string(), "no crop selected");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PhotofitError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_encode_failures_are_retryable() {
    assert!(PhotofitError::encode("empty canvas").is_retryable());
    assert!(!PhotofitError::NoCropSelected.is_retryable());
    assert!(!PhotofitError::invalid_crop("zero area").is_retryable());
    assert!(!PhotofitError::unsupported_format("gif").is_retryable());
}
