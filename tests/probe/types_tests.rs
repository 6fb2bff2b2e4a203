use clientprobe::core::probe::{ClientKind, ProbeError, ProbeOutcome};

#[test]
fn test_client_order_and_names() {
    let names: Vec<&str> = ClientKind::ALL.iter().map(|k| k.name()).collect();
    assert_eq!(names, vec!["ureq", "isahc", "curl"]);

    let positions: Vec<usize> = ClientKind::ALL.iter().map(|k| k.position()).collect();
    assert_eq!(positions, vec![1, 2, 3]);

    assert_eq!(ClientKind::Isahc.to_string(), "isahc");
    assert_eq!(ClientKind::Curl.feature(), "client-curl");
}

#[test]
fn test_availability_follows_features() {
    assert_eq!(ClientKind::Ureq.is_available(), cfg!(feature = "client-ureq"));
    assert_eq!(ClientKind::Isahc.is_available(), cfg!(feature = "client-isahc"));
    assert_eq!(ClientKind::Curl.is_available(), cfg!(feature = "client-curl"));
}

#[test]
fn test_outcome_status_text() {
    let cases = vec![
        (ProbeOutcome::NotInstalled, "not installed"),
        (ProbeOutcome::Status(200), "SUCCESS HTTP 200"),
        (ProbeOutcome::Error, "ERROR"),
        (ProbeOutcome::Status(403), "FAILED HTTP 403"),
        (ProbeOutcome::Status(302), "FAILED HTTP 302"),
    ];

    for (outcome, expected) in cases {
        assert_eq!(outcome.status_text(), expected, "for {:?}", outcome);
    }
}

#[test]
fn test_outcome_sentinels() {
    assert_eq!(ProbeOutcome::NotInstalled.status_code(), None);
    assert_eq!(ProbeOutcome::Error.status_code(), Some(0));
    assert_eq!(ProbeOutcome::Status(418).status_code(), Some(418));

    assert!(ProbeOutcome::Status(200).is_success());
    assert!(!ProbeOutcome::Status(204).is_success());
    assert!(!ProbeOutcome::Error.is_success());

    assert_eq!(ProbeOutcome::Status(403).label(), "blocked");
    assert_eq!(ProbeOutcome::default(), ProbeOutcome::NotInstalled);
}

#[test]
fn test_probe_error_messages() {
    assert_eq!(
        ProbeError::Transport("timed out".to_string()).to_string(),
        "request failed: timed out"
    );
    assert_eq!(ProbeError::InvalidStatus(70000).to_string(), "unexpected status code 70000");
}
