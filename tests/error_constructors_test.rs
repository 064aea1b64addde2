use strompris::error::StromprisError;

#[test]
fn error_constructors() {
    assert!(matches!(
        StromprisError::config("x"),
        StromprisError::Config { .. }
    ));
    assert!(matches!(StromprisError::io("x"), StromprisError::Io { .. }));
    assert!(matches!(
        StromprisError::serialization("x"),
        StromprisError::Serialization { .. }
    ));
    assert!(matches!(
        StromprisError::validation("f", "m"),
        StromprisError::Validation { .. }
    ));
    assert!(matches!(
        StromprisError::upstream_unavailable("x"),
        StromprisError::UpstreamUnavailable { .. }
    ));
    assert!(matches!(
        StromprisError::malformed_response("x"),
        StromprisError::MalformedResponse { .. }
    ));
    assert!(matches!(
        StromprisError::auth(Some(401), "x"),
        StromprisError::Auth { status: Some(401), .. }
    ));
    assert!(matches!(
        StromprisError::submission_failed(None, "x"),
        StromprisError::SubmissionFailed { status: None, .. }
    ));
    assert!(matches!(StromprisError::locked("x"), StromprisError::Locked { .. }));
}

#[test]
fn io_errors_convert() {
    let err: StromprisError = std::io::Error::other("disk full").into();
    assert!(matches!(err, StromprisError::Io { .. }));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn display_messages() {
    let e = StromprisError::validation("zone", "Unknown pricing zone: SE3");
    assert_eq!(e.to_string(), "Validation error: zone - Unknown pricing zone: SE3");
    let e = StromprisError::submission_failed(Some(500), "boom");
    assert!(e.to_string().contains("HTTP 500"));
}
