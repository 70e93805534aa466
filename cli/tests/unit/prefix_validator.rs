//! Prefix validator tests.

use provctl_cli::application::services::prefix_validator::PrefixValidator;
use provctl_cli::domain::{Rejection, Verdict};
use provctl_common::{ValidationVerdict, VerdictReason};

use crate::helpers::{ScriptedApi, rejected, valid};

#[tokio::test]
async fn valid_prefix_yields_derived_hostname() {
    let api = ScriptedApi::new().verdict(valid());
    let verdict = PrefixValidator::new(&api, "instances.local")
        .validate("  web1 ")
        .await;
    assert_eq!(
        verdict,
        Verdict::Valid {
            hostname: "web1.instances.local".into()
        }
    );
    assert_eq!(api.calls(), ["validate web1"]);
}

#[tokio::test]
async fn server_hostname_wins_over_derived_one() {
    let api = ScriptedApi::new().verdict(ValidationVerdict {
        hostname: Some("web1.lab.example".into()),
        ..rejected(VerdictReason::Ping)
    });
    let verdict = PrefixValidator::new(&api, "instances.local")
        .validate("web1")
        .await;
    assert_eq!(
        verdict,
        Verdict::Rejected(Rejection::HostReachable {
            hostname: "web1.lab.example".into()
        })
    );
}

#[tokio::test]
async fn unknown_reason_uses_server_message() {
    let api = ScriptedApi::new().verdict(ValidationVerdict {
        message: Some("prefix too long".into()),
        ..rejected(VerdictReason::Other("length".into()))
    });
    let verdict = PrefixValidator::new(&api, "instances.local")
        .validate("web1")
        .await;
    assert_eq!(verdict.failure_message().as_deref(), Some("prefix too long"));
    assert_eq!(verdict.code(), "other");
}

#[tokio::test]
async fn blank_input_skips_the_request() {
    let api = ScriptedApi::new();
    let verdict = PrefixValidator::new(&api, "instances.local")
        .validate("\t ")
        .await;
    assert_eq!(verdict, Verdict::Rejected(Rejection::EmptyPrefix));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn transport_error_is_unavailable_not_valid() {
    let api = ScriptedApi::new().verdict_error();
    let verdict = PrefixValidator::new(&api, "instances.local")
        .validate("web1")
        .await;
    assert_eq!(verdict, Verdict::Unavailable);
    assert!(!verdict.is_valid());
}

#[tokio::test]
async fn every_call_is_a_fresh_request() {
    let api = ScriptedApi::new().verdict(valid()).verdict(rejected(VerdictReason::Cache));
    let validator = PrefixValidator::new(&api, "instances.local");
    assert!(validator.validate("web1").await.is_valid());
    assert!(!validator.validate("web1").await.is_valid());
    assert_eq!(api.count("validate"), 2);
}
