use ox_tokenproc::{ResolutionError, TokenReplacer};
use serde_json::json;

#[test]
fn test_self_reference_hits_depth_limit() {
    let config = json!({"loop": "${loop}"});
    let mut replacer = TokenReplacer::with_diagnostic_sink(&config, Vec::new());

    assert_eq!(replacer.process_line("${loop}"), "${loop}");
    assert_eq!(replacer.failure_count(), 1);
    assert!(matches!(
        replacer.diagnostics().failures()[0].error,
        ResolutionError::CyclicReference { depth: 32, .. }
    ));
}

#[test]
fn test_three_way_cycle() {
    let config = json!({"a": "<${b}>", "b": "<${c}>", "c": "<${a}>"});
    let mut replacer = TokenReplacer::with_diagnostic_sink(&config, Vec::new()).with_max_depth(6);

    assert_eq!(replacer.process_line("start ${b} end"), "start ${b} end");
    assert_eq!(replacer.failure_count(), 1);
    assert!(replacer.diagnostics().failed_tokens().contains("${b}"));
}

#[test]
fn test_wide_fan_out_is_not_a_cycle() {
    // Each level references the next twice; 64 expansions, but only 7 levels deep.
    let config = json!({
        "l0": "x",
        "l1": "${l0}${l0}",
        "l2": "${l1}${l1}",
        "l3": "${l2}${l2}",
        "l4": "${l3}${l3}",
        "l5": "${l4}${l4}",
        "l6": "${l5}${l5}",
    });
    let mut replacer = TokenReplacer::with_diagnostic_sink(&config, Vec::new());
    let out = replacer.process_line("${l6}");
    assert_eq!(out, "x".repeat(64));
    assert!(replacer.all_resolved());
}

#[test]
fn test_unterminated_token_is_plain_text() {
    let config = json!({"a": "1"});
    let mut replacer = TokenReplacer::with_diagnostic_sink(&config, Vec::new());
    assert_eq!(replacer.process_line("${a"), "${a");
    assert_eq!(replacer.process_line("$ {a}"), "$ {a}");
    assert_eq!(replacer.token_count(), 0);
    assert!(replacer.all_resolved());
}
