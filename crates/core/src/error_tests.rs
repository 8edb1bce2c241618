use super::*;

#[test]
fn exit_code_mapping_matches_spec_table() {
    assert_eq!(ErrorKind::InvalidInput.exit_code(), 2);
    assert_eq!(ErrorKind::NotFound.exit_code(), 3);
    assert_eq!(ErrorKind::Conflict.exit_code(), 4);
    assert_eq!(ErrorKind::Precondition.exit_code(), 5);
    assert_eq!(ErrorKind::Timeout.exit_code(), 6);
    assert_eq!(ErrorKind::Internal.exit_code(), 1);
}

#[test]
fn error_display_includes_kind_and_message() {
    let err = Error::not_found("app 'foo' is not installed");
    let rendered = err.to_string();
    assert!(rendered.contains("not_found"));
    assert!(rendered.contains("app 'foo' is not installed"));
}

#[test]
fn error_carries_cause_chain() {
    use std::error::Error as _;
    let io_err = std::io::Error::other("disk full");
    let err = Error::internal("write failed").with_cause(io_err);
    assert!(err.source().is_some());
}
