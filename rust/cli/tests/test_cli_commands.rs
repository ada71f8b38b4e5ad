//! End-to-end checks through `fairdeal_cli::run`.

fn run(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["fairdeal"];
    argv.extend_from_slice(args);
    let code = fairdeal_cli::run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn help_goes_to_stdout_with_success() {
    let (code, out, _) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(out.contains("deal"));
    assert!(out.contains("play"));
}

#[test]
fn unknown_command_prints_usage() {
    let (code, out, err) = run(&["shuffle"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Usage: fairdeal <command> [options]"));
    assert!(err.contains("  eval"));
}

#[test]
fn eval_reports_category_and_best_five() {
    let (code, out, err) = run(&["eval", "Ah Kd 2c 2d Kh 9s 5c"]);
    assert_eq!(code, 0, "stderr={}", err);
    assert!(out.starts_with("Hand: two pair ["), "{}", out);
}

#[test]
fn eval_compares_wheel_with_six_high_straight() {
    let (code, out, _) = run(&["eval", "As 2h 3d 4c 5s", "--against", "2s 3h 4d 5c 6s"]);
    assert_eq!(code, 0);
    assert!(out.contains("Result: second hand wins"), "{}", out);
}

#[test]
fn eval_rejects_bad_cards() {
    let (code, out, err) = run(&["eval", "Ah", "1x"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.starts_with("Error: Invalid input"), "{}", err);
}

#[test]
fn deal_with_small_keys_verifies_all_envelopes() {
    let (code, out, err) = run(&["deal", "--players", "2", "--seed", "5", "--key-bits", "1024"]);
    assert_eq!(code, 0, "stderr={}", err);
    assert!(out.contains("Envelopes: 4 verified, 0 rejected"), "{}", out);
}

#[test]
fn deal_prints_the_dealer_key() {
    let (code, out, _) = run(&["deal", "--seed", "5", "--key-bits", "1024", "--pem"]);
    assert_eq!(code, 0);
    assert!(out.starts_with("-----BEGIN PUBLIC KEY-----"), "{}", out);
}

#[test]
fn deal_refuses_undersized_keys() {
    let (code, _, err) = run(&["deal", "--key-bits", "512"]);
    assert_eq!(code, 2);
    assert!(err.contains("key_bits"), "{}", err);
}
